//! Road Test entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use road_test::Settings;
    use road_test::audio::{AudioManager, SoundEffect};
    use road_test::camera::Camera;
    use road_test::consts::MAX_DT;
    use road_test::hud;
    use road_test::platform::{BrowserClock, Clock, KeyboardState};
    use road_test::renderer::{RenderState, shapes};
    use road_test::sim::{
        Course, GameEvent, RigPose, SessionState, Snapshot, VehicleRig, tick,
    };

    /// Simulator instance holding all state
    struct Game {
        course: Course,
        session: SessionState,
        rig: VehicleRig,
        pose: RigPose,
        camera: Camera,
        keys: KeyboardState,
        clock: BrowserClock,
        audio: AudioManager,
        settings: Settings,
        render_state: Option<RenderState>,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(settings: Settings, aspect: f32) -> Self {
            let course = Course::standard();
            let rig = VehicleRig::fallback();
            let mut session = SessionState::new(&course, Default::default(), rig.footprint());
            session.camera_mode = settings.camera_mode;
            let camera = Camera::new(session.camera_mode, &session.vehicle, aspect);

            let mut audio = AudioManager::new();
            audio.set_volume(settings.effect_volume());

            let clock = BrowserClock::new();
            let last_time = clock.now_ms();

            Self {
                course,
                session,
                rig,
                pose: RigPose::default(),
                camera,
                keys: KeyboardState::default(),
                clock,
                audio,
                settings,
                render_state: None,
                last_time,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Advance one frame
        fn update(&mut self) {
            let now = self.clock.now_ms();
            let dt = self.clock.delta_s(self.last_time).min(MAX_DT);
            self.last_time = now;

            let input = self.keys.sample();
            tick(&mut self.session, &self.course, &input, dt, now);
            self.pose.advance(&self.session.vehicle, dt);
            self.camera.follow(self.session.camera_mode, &self.session.vehicle);

            for event in self.session.drain_events() {
                self.on_event(&event);
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = now;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = now - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (59000.0 / elapsed).round() as u32;
                }
            }
        }

        fn on_event(&self, event: &GameEvent) {
            match event {
                GameEvent::ManeuverStarted(m) => log::debug!("{} started", m.as_str()),
                GameEvent::ManeuverPassed(m) => log::info!("{} passed", m.as_str()),
                _ => {}
            }
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };

            let mut dynamic = shapes::vehicle_mesh(&self.rig, &self.session.vehicle, &self.pose);
            if self.session.maneuvers.emergency.is_signalled() {
                dynamic.extend(shapes::stop_signal_mesh(&self.course));
            }

            match render_state.render(self.camera.view_proj(), &dynamic) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let snapshot = Snapshot::capture(&self.session);
            let h = &snapshot.hud;

            set_text(document, "hud-speed", &hud::speed_text(h.speed));
            set_text(document, "hud-timer", &hud::timer_text(h.time_remaining));
            set_text(document, "hud-section", &hud::section_text(h));
            set_text(document, "hud-score", &h.score.to_string());
            set_text(document, "hud-progress", &hud::progress_text(h));
            set_text(document, "hud-view", self.session.camera_mode.as_str());

            if let Some(el) = document.get_element_by_id("hud-fps") {
                let _ = el
                    .class_list()
                    .toggle_with_force("hidden", !self.settings.show_fps);
                el.set_text_content(Some(&self.fps.to_string()));
            }

            // Emergency-stop indicator
            if let Some(el) = document.get_element_by_id("hud-stop") {
                let _ = el
                    .class_list()
                    .toggle_with_force("active", h.emergency_signalled);
            }

            if let Some(el) = document.get_element_by_id("overlay") {
                match hud::overlay_text(h) {
                    Some(text) => {
                        let _ = el.class_list().remove_1("hidden");
                        set_text(document, "overlay-text", &text);
                    }
                    None => {
                        let _ = el.class_list().add_1("hidden");
                    }
                }
            }
        }

        fn start(&mut self) {
            self.session.start(&self.course);
            self.after_reset();
        }

        fn retry(&mut self) {
            self.session.retry(&self.course);
            self.after_reset();
        }

        fn after_reset(&mut self) {
            self.pose = RigPose::default();
            self.camera.snap(self.session.camera_mode, &self.session.vehicle);
            self.last_time = self.clock.now_ms();
            self.audio.resume();
        }

        fn toggle_view(&mut self) {
            self.session.toggle_camera_mode();
            self.camera.snap(self.session.camera_mode, &self.session.vehicle);
            self.settings.camera_mode = self.session.camera_mode;
            self.settings.save();
            log::info!("Camera: {}", self.session.camera_mode.as_str());
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.camera.set_aspect(width, height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Size the canvas backing store to its CSS box times the pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Road Test starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        let (width, height) = fit_canvas(&window, &canvas);
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(
            settings,
            width as f32 / height as f32,
        )));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        let course_vertices = shapes::course_mesh(&game.borrow().course);
                        match RenderState::new(surface, &adapter, width, height, &course_vertices)
                            .await
                        {
                            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Failed to create device: {e}"),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {e}"),
                }
            }
            Err(e) => log::error!("Failed to create surface: {e}"),
        }

        setup_keyboard(game.clone());
        setup_buttons(&document, game.clone());
        setup_focus_handlers(game.clone());
        setup_resize(canvas, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.class_list().remove_1("hidden");
        }

        request_animation_frame(game);

        log::info!("Road Test running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        for (event_name, down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.keys.set_key(&event.code(), down) {
                    // Keep arrows from scrolling the page
                    event.prevent_default();
                }
                if down && event.code() == "KeyC" && !event.repeat() {
                    g.toggle_view();
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let handlers: [(&str, fn(&mut Game)); 3] = [
            ("btn-start", Game::start),
            ("btn-retry", Game::retry),
            ("btn-view", Game::toggle_view),
        ];

        for (id, handler) in handlers {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing button #{id}");
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                handler(&mut game.borrow_mut());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur: release held keys so the car does not keep driving
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.keys.clear();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.audio.set_muted(false);
                let now = g.clock.now_ms();
                g.last_time = now;
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::UiEvent| {
            let (width, height) = fit_canvas(&window_clone, &canvas);
            game.borrow_mut().resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Road Test (native) starting...");
    log::info!("Native mode runs a scripted drive - run with `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => road_test::Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Invalid tuning in {path}: {e}, using defaults");
                road_test::Tuning::default()
            }),
            Err(e) => {
                log::warn!("Could not read {path}: {e}, using defaults");
                road_test::Tuning::default()
            }
        },
        None => road_test::Tuning::default(),
    };
    log::debug!("Tuning: {}", tuning.to_json());

    scripted_drive(tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the acceleration straight and stop, then dump the final snapshot
#[cfg(not(target_arch = "wasm32"))]
fn scripted_drive(tuning: road_test::Tuning) {
    use road_test::platform::{Clock, ManualClock};
    use road_test::sim::{ControlSignal, Course, SessionState, Snapshot, VehicleRig, tick};

    const DT: f32 = 1.0 / 60.0;

    let course = Course::standard();
    let rig = VehicleRig::fallback();
    let mut session = SessionState::new(&course, tuning, rig.footprint());
    let mut clock = ManualClock::new(0.0);
    session.start(&course);

    let phases = [
        (ControlSignal::throttle(), 2.5),
        (ControlSignal::braking(), 3.0),
        (ControlSignal::default(), 0.5),
    ];
    for (input, seconds) in phases {
        let frames = (seconds / DT).round() as usize;
        for _ in 0..frames {
            clock.advance(DT);
            tick(&mut session, &course, &input, DT, clock.now_ms());
            for event in session.drain_events() {
                log::info!("{:?}", event);
            }
            if session.is_terminal() {
                break;
            }
        }
    }

    match serde_json::to_string_pretty(&Snapshot::capture(&session)) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
}
