use std::f64::consts::PI;

const FLASH_DURATION_SECS: f64 = 1.6;
const FLASH_PULSES: f64 = 3.0;

#[derive(Clone, Debug, PartialEq)]
struct ActiveFlash {
    key: String,
    started_at: f64,
}

/// Bounded highlight pulse on a single chart cell.
///
/// Holds at most one running flash. Starting a new one supersedes the old one, and
/// the handle clears itself once the duration has elapsed, so the frame loop stops
/// requesting repaints without any extra bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct FlashAnimation {
    active: Option<ActiveFlash>,
}

impl FlashAnimation {
    pub fn start(&mut self, key: String, now: f64) {
        self.active = Some(ActiveFlash {
            key,
            started_at: now,
        });
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn key(&self) -> Option<&str> {
        self.active.as_ref().map(|flash| flash.key.as_str())
    }

    /// Blend intensity in `[0, 1]` at `now`, or `None` once finished (which also clears it).
    pub fn sample(&mut self, now: f64) -> Option<f32> {
        let flash = self.active.as_ref()?;
        let elapsed = (now - flash.started_at).max(0.0);
        if elapsed >= FLASH_DURATION_SECS {
            self.active = None;
            return None;
        }

        let t = elapsed / FLASH_DURATION_SECS;
        let envelope = 1.0 - ease_in_out_cubic(t);
        let pulse = (t * FLASH_PULSES * PI).sin().powi(2);
        Some((envelope * (0.35 + 0.65 * pulse)).clamp(0.0, 1.0) as f32)
    }
}

fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
