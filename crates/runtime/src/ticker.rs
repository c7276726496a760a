use std::time::Duration;

use crate::frame::Frame;

/// Owned repaint loop.
///
/// The owner advances the ticker explicitly; once stopped it yields no further
/// frames until started again, so cancellation is deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrameTicker {
    running: bool,
    last: Option<Frame>,
}

impl FrameTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh run; frame indices restart at zero.
    pub fn start(&mut self) {
        self.running = true;
        self.last = None;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.last
    }

    /// Produces the next frame, or `None` while stopped.
    pub fn tick(&mut self, dt: Duration) -> Option<Frame> {
        if !self.running {
            return None;
        }
        let frame = match self.last {
            Some(prev) => prev.next(dt),
            None => Frame::first(dt),
        };
        self.last = Some(frame);
        Some(frame)
    }
}
