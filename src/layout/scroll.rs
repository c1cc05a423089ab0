// Per-surface scroll position
//
// Lives inside each View so it survives resizes: the window manager only
// moves surfaces, it never recreates them, and with them the scroll offset
// and follow mode stay put.

/// Scroll offset over `total` lines shown through a `viewport`-line window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    offset: usize,
    total: usize,
    viewport: usize,
    /// Stick to the bottom as content grows; scrolling up turns it off
    pub follow: bool,
}

impl ScrollState {
    /// Scroll state that tracks the bottom of the content
    pub fn following() -> Self {
        Self {
            offset: 0,
            total: 0,
            viewport: 0,
            follow: true,
        }
    }

    /// Scroll state that stays where the user left it
    pub fn manual() -> Self {
        Self {
            follow: false,
            ..Self::following()
        }
    }

    /// Refresh content and viewport sizes after a render or resize
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;

        if self.follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    pub fn scroll_up(&mut self) {
        if self.offset > 0 {
            self.offset -= 1;
            self.follow = false;
        }
    }

    pub fn scroll_down(&mut self) {
        if self.offset < self.max_offset() {
            self.offset += 1;
        }
        if self.offset >= self.max_offset() {
            self.follow = true;
        }
    }

    pub fn page_up(&mut self) {
        self.offset = self.offset.saturating_sub(self.viewport.max(1));
        self.follow = false;
    }

    pub fn page_down(&mut self) {
        self.offset = (self.offset + self.viewport.max(1)).min(self.max_offset());
        if self.offset >= self.max_offset() {
            self.follow = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.follow = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.follow = true;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Visible line range `[start, end)`
    pub fn visible_range(&self) -> (usize, usize) {
        (self.offset, (self.offset + self.viewport).min(self.total))
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::manual()
    }
}
