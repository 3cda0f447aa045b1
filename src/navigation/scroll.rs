/// Hides the breadcrumb bar on downward scroll and shows it again on the
/// way back up.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    threshold: f64,
    last_offset: f64,
    hidden: bool,
}

impl ScrollTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_offset: 0.0,
            hidden: false,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Feed a new vertical offset. Returns the new visibility state
    /// (`Some(true)` = hidden) when it changed.
    pub fn update(&mut self, offset: f64) -> Option<bool> {
        let previous = self.last_offset;
        self.last_offset = offset;

        let hide = if offset > previous && offset > self.threshold {
            true
        } else if offset < previous || offset <= self.threshold {
            false
        } else {
            return None;
        };

        if hide == self.hidden {
            None
        } else {
            self.hidden = hide;
            Some(hide)
        }
    }
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(100.0)
    }
}
