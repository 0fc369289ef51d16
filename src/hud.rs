//! HUD text derived from snapshots
//!
//! Pure formatting; the driver copies these strings into the DOM.

use crate::sim::{HudSnapshot, Maneuver, ManeuverStatus, Outcome};

/// Speed readout: forward speed times ten, rounded
pub fn speed_text(speed: f32) -> String {
    ((speed.max(0.0) * 10.0).round() as i32).to_string()
}

/// Whole seconds left on the countdown
pub fn timer_text(time_remaining: f32) -> String {
    (time_remaining.max(0.0).floor() as i32).to_string()
}

/// Section line, e.g. "Hill Waiting Start". Shows the maneuver in progress,
/// otherwise the next one along the course not yet passed.
pub fn section_text(hud: &HudSnapshot) -> String {
    let next = hud.active.unwrap_or_else(|| {
        Maneuver::DRIVING_ORDER
            .into_iter()
            .find(|m| hud.maneuver(*m).status != ManeuverStatus::Passed)
            .unwrap_or(Maneuver::TTurn)
    });
    let entry = hud.maneuver(next);

    let mut text = format!("{} {}", entry.maneuver.as_str(), entry.label);
    if entry.maneuver == Maneuver::TTurn {
        if let Some(remaining) = hud.t_turn_remaining {
            text.push_str(&format!(" ({:.0}s)", remaining.ceil()));
        }
    }
    text
}

/// Count of passed maneuvers, e.g. "2/4"
pub fn progress_text(hud: &HudSnapshot) -> String {
    let passed = hud
        .maneuvers
        .iter()
        .filter(|e| e.status == ManeuverStatus::Passed)
        .count();
    format!("{passed}/{}", hud.maneuvers.len())
}

/// Result overlay, shown once the attempt is over
pub fn overlay_text(hud: &HudSnapshot) -> Option<String> {
    match hud.outcome? {
        Outcome::Failed(reason) => Some(format!("FAIL: {reason}")),
        Outcome::Passed => Some("PASS".to_string()),
    }
}
