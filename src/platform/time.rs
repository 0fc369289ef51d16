//! Monotonic clocks
//!
//! The session only ever sees `dt` and `now_ms`; where they come from is
//! decided here.

/// Monotonic time source in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;

    /// Seconds since `last_ms`, never negative
    fn delta_s(&self, last_ms: f64) -> f32 {
        ((self.now_ms() - last_ms).max(0.0) / 1000.0) as f32
    }
}

/// Clock advanced by hand (native runs and tests)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    now_ms: f64,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self { now_ms: start_ms }
    }

    pub fn advance(&mut self, dt_s: f32) {
        self.now_ms += f64::from(dt_s.max(0.0)) * 1000.0;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

/// `performance.now()`, falling back to `Date.now()` when the Performance
/// API is missing
#[cfg(target_arch = "wasm32")]
pub struct BrowserClock {
    performance: Option<web_sys::Performance>,
}

#[cfg(target_arch = "wasm32")]
impl BrowserClock {
    pub fn new() -> Self {
        let performance = web_sys::window().and_then(|w| w.performance());
        if performance.is_none() {
            log::warn!("Performance API unavailable, using Date.now()");
        }
        Self { performance }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for BrowserClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now(),
            None => js_sys::Date::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let mut clock = ManualClock::new(1000.0);
        clock.advance(0.5);
        assert_eq!(clock.now_ms(), 1500.0);
        assert!((clock.delta_s(1000.0) - 0.5).abs() < 1e-6);

        // Never runs backwards
        clock.advance(-1.0);
        assert_eq!(clock.now_ms(), 1500.0);
        assert_eq!(clock.delta_s(2000.0), 0.0);
    }
}
