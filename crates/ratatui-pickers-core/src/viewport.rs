/// Vertical scroll position of a row-based view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportState {
    pub y: u32,
    pub viewport_h: u16,
    pub content_h: u32,
}

impl ViewportState {
    pub fn set_viewport(&mut self, h: u16) {
        self.viewport_h = h;
        self.clamp();
    }

    pub fn set_content(&mut self, h: u32) {
        self.content_h = h;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.y = self.y.min(self.max_y());
    }

    pub fn scroll_y_by(&mut self, delta: i32) {
        let next = self.y as i64 + delta as i64;
        self.y = next.clamp(0, self.max_y() as i64) as u32;
    }

    /// Scrolls the least amount needed for `row` to be on screen.
    pub fn ensure_visible(&mut self, row: u32) {
        let h = self.viewport_h as u32;
        if h == 0 {
            return;
        }
        if row < self.y {
            self.y = row;
        } else if row >= self.y + h {
            self.y = row + 1 - h;
        }
        self.clamp();
    }

    /// Rows moved by one page step.
    pub fn page(&self) -> u32 {
        (self.viewport_h.saturating_sub(1) as u32).max(1)
    }

    /// Visible window as a half-open row range.
    pub fn visible_rows(&self) -> std::ops::Range<u32> {
        let end = self.y.saturating_add(self.viewport_h as u32).min(self.content_h);
        self.y.min(end)..end
    }

    pub fn is_scrollable(&self) -> bool {
        self.content_h > self.viewport_h as u32
    }

    fn max_y(&self) -> u32 {
        self.content_h.saturating_sub(self.viewport_h as u32)
    }
}
