use std::time::Duration;

/// Metadata for one repaint of the globe.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 0-based frame index since the ticker started.
    pub index: u64,
    /// Time since the previous frame.
    pub dt: Duration,
    /// Time since the ticker started, at the end of this frame.
    pub elapsed: Duration,
}

impl Frame {
    pub fn first(dt: Duration) -> Self {
        Self {
            index: 0,
            dt,
            elapsed: dt,
        }
    }

    pub fn next(self, dt: Duration) -> Self {
        Self {
            index: self.index + 1,
            dt,
            elapsed: self.elapsed + dt,
        }
    }

    pub fn dt_s(&self) -> f64 {
        self.dt.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use std::time::Duration;

    #[test]
    fn next_advances_index_and_elapsed() {
        let f0 = Frame::first(Duration::from_millis(16));
        let f1 = f0.next(Duration::from_millis(20));
        assert_eq!(f1.index, 1);
        assert_eq!(f1.elapsed, Duration::from_millis(36));
        assert_eq!(f1.dt, Duration::from_millis(20));
    }
}
