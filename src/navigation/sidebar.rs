/// Viewports narrower than this are mobile: opening the sidebar there also
/// shows the overlay.
pub const MOBILE_BREAKPOINT: u32 = 768;
pub const ESCAPE_KEY: &str = "Escape";

/// Open/closed state of the navigation sidebar and its mobile overlay.
///
/// Every transition returns whether it changed anything, so opening an open
/// sidebar or closing a closed one is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarState {
    breakpoint: u32,
    viewport_width: Option<u32>,
    open: bool,
    overlay: bool,
}

impl SidebarState {
    pub fn new(breakpoint: u32) -> Self {
        Self {
            breakpoint,
            viewport_width: None,
            open: false,
            overlay: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay
    }

    /// Last width reported by a resize; unknown widths count as desktop.
    pub fn viewport_width(&self) -> Option<u32> {
        self.viewport_width
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport_width.is_some_and(|width| width < self.breakpoint)
    }

    /// The overlay is decided once, at opening time.
    pub fn open(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        self.overlay = self.is_mobile();
        true
    }

    pub fn close(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        self.overlay = false;
        true
    }

    /// Returns the new open state.
    pub fn toggle(&mut self) -> bool {
        if self.open {
            self.close();
        } else {
            self.open();
        }
        self.open
    }

    /// Escape closes an open sidebar.
    pub fn key_pressed(&mut self, key: &str) -> bool {
        key == ESCAPE_KEY && self.close()
    }

    /// Records the width; growing to desktop size closes the sidebar.
    pub fn resized(&mut self, width: u32) -> bool {
        self.viewport_width = Some(width);
        width >= self.breakpoint && self.close()
    }
}

impl Default for SidebarState {
    fn default() -> Self {
        Self::new(MOBILE_BREAKPOINT)
    }
}
