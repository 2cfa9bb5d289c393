//! Adaptive quality controller
//!
//! Samples realized frame rate over a rolling half-second window and trades
//! visual fidelity for throughput with hysteresis: sustained FPS below the
//! low threshold drops to reduced quality (smaller particle budget, no
//! additive glow, lower render backing scale); recovery above the higher
//! threshold restores full quality. Pure control loop - it never touches
//! gameplay state.

/// FPS below this switches to reduced quality
const LOW_FPS: f32 = 50.0;
/// FPS above this restores full quality (hysteresis gap prevents flapping)
const HIGH_FPS: f32 = 57.0;
/// Sampling window in seconds
const SAMPLE_WINDOW: f32 = 0.5;

/// Cosmetic scale applied in reduced mode
const REDUCED_FX_SCALE: f32 = 0.56;
/// Render backing-store scale in reduced mode
const REDUCED_RENDER_SCALE: f32 = 0.86;

#[derive(Debug, Clone)]
pub struct QualityController {
    low_fps: f32,
    high_fps: f32,
    window: f32,
    sample_time: f32,
    sample_frames: u32,
    fps: f32,
    reduced: bool,
}

impl Default for QualityController {
    fn default() -> Self {
        Self::new(LOW_FPS, HIGH_FPS)
    }
}

impl QualityController {
    pub fn new(low_fps: f32, high_fps: f32) -> Self {
        Self {
            low_fps,
            high_fps,
            window: SAMPLE_WINDOW,
            sample_time: 0.0,
            sample_frames: 0,
            fps: 60.0,
            reduced: false,
        }
    }

    /// Record one rendered frame. Returns `Some(reduced)` when the window
    /// closed with a mode change, `None` otherwise.
    pub fn sample(&mut self, frame_delta: f32) -> Option<bool> {
        self.sample_time += frame_delta;
        self.sample_frames += 1;
        if self.sample_time < self.window {
            return None;
        }

        self.fps = self.sample_frames as f32 / self.sample_time;
        self.sample_time = 0.0;
        self.sample_frames = 0;

        if !self.reduced && self.fps < self.low_fps {
            self.reduced = true;
            log::info!("quality: dropping to reduced ({:.1} fps)", self.fps);
            return Some(true);
        }
        if self.reduced && self.fps > self.high_fps {
            self.reduced = false;
            log::info!("quality: restoring full ({:.1} fps)", self.fps);
            return Some(false);
        }
        None
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn reduced(&self) -> bool {
        self.reduced
    }

    /// Multiplier for particle budgets and cosmetic burst counts.
    pub fn particle_scale(&self) -> f32 {
        if self.reduced { REDUCED_FX_SCALE } else { 1.0 }
    }

    /// Additive glow composition is the first thing to go.
    pub fn glow_enabled(&self) -> bool {
        !self.reduced
    }

    /// Backing-resolution scale for the renderer.
    pub fn render_scale(&self) -> f32 {
        if self.reduced {
            REDUCED_RENDER_SCALE
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(q: &mut QualityController, fps: f32, seconds: f32) -> Vec<bool> {
        let dt = 1.0 / fps;
        let frames = (seconds / dt) as usize;
        let mut toggles = Vec::new();
        for _ in 0..frames {
            if let Some(change) = q.sample(dt) {
                toggles.push(change);
            }
        }
        toggles
    }

    #[test]
    fn sustained_low_fps_drops_quality() {
        let mut q = QualityController::default();
        let toggles = feed(&mut q, 40.0, 1.0);
        assert_eq!(toggles, vec![true]);
        assert!(q.reduced());
        assert!(!q.glow_enabled());
        assert!(q.render_scale() < 1.0);
    }

    #[test]
    fn brief_dip_inside_window_does_not_toggle() {
        let mut q = QualityController::default();
        // A handful of slow frames, window never closes on a low average.
        for _ in 0..5 {
            q.sample(1.0 / 30.0);
        }
        let toggles = feed(&mut q, 120.0, 0.5);
        assert!(toggles.is_empty() || !q.reduced());
    }

    #[test]
    fn hysteresis_holds_between_thresholds() {
        let mut q = QualityController::default();
        feed(&mut q, 40.0, 1.0);
        assert!(q.reduced());

        // 53 fps is above the drop threshold but below the restore one.
        feed(&mut q, 53.0, 2.0);
        assert!(q.reduced());

        feed(&mut q, 60.0, 1.0);
        assert!(!q.reduced());
    }

    #[test]
    fn fps_estimate_tracks_the_window() {
        let mut q = QualityController::default();
        feed(&mut q, 48.0, 1.0);
        assert!((q.fps() - 48.0).abs() < 2.0);
    }
}
