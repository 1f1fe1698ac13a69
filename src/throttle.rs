//! Publish gate for externally visible state
//!
//! Physics runs every frame on true elapsed time; what the renderer sees is
//! republished at most once per `1000 / frame_rate` milliseconds.

/// Leaky-bucket gate admitting at most one publish per interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGate {
    interval_ms: f64,
    last_publish_ms: Option<f64>,
}

impl FrameGate {
    /// Gate for a target frame rate. A rate of 0 admits every frame.
    pub fn new(frame_rate: f32) -> Self {
        let interval_ms = if frame_rate > 0.0 {
            1000.0 / frame_rate as f64
        } else {
            0.0
        };
        Self {
            interval_ms,
            last_publish_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Returns true (and records the publish) if `now_ms` may publish
    pub fn admit(&mut self, now_ms: f64) -> bool {
        let open = match self.last_publish_ms {
            None => true,
            Some(last) => now_ms - last >= self.interval_ms,
        };
        if open {
            self.last_publish_ms = Some(now_ms);
        }
        open
    }

    /// Record a publish that bypassed the gate (phase changes, final frames)
    pub fn force(&mut self, now_ms: f64) {
        self.last_publish_ms = Some(now_ms);
    }

    /// Change the target rate, keeping the last publish time
    pub fn set_frame_rate(&mut self, frame_rate: f32) {
        let last = self.last_publish_ms;
        *self = Self::new(frame_rate);
        self.last_publish_ms = last;
    }
}
