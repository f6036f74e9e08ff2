use glam::Vec2;
use parking_lot::RwLock;

/// Thread-safe snapshot of the two input collaborators: scroll offset and
/// cursor position. Event handlers write whenever the platform delivers an
/// event; the frame updater reads the latest values once per frame, so the
/// last write before a frame wins.
#[derive(Debug)]
pub struct InputState {
    scroll_offset: RwLock<f32>,
    cursor: RwLock<Vec2>,
    viewport: RwLock<(u32, u32)>,
}

impl InputState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            scroll_offset: RwLock::new(0.0),
            cursor: RwLock::new(Vec2::ZERO),
            viewport: RwLock::new((width.max(1), height.max(1))),
        }
    }

    /// Records a new viewport size, clamping away zero-area dimensions.
    pub fn set_viewport(&self, width: u32, height: u32) {
        *self.viewport.write() = (width.max(1), height.max(1));
    }

    pub fn viewport(&self) -> (u32, u32) {
        *self.viewport.read()
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport.read().1 as f32
    }

    /// Replaces the scroll offset with an absolute value; offsets never go
    /// negative.
    pub fn set_scroll_offset(&self, offset: f32) {
        *self.scroll_offset.write() = offset.max(0.0);
    }

    /// Accumulates a wheel delta in pixels, keeping the offset inside
    /// `[0, max_scroll]`.
    pub fn apply_scroll_delta(&self, delta: f32, max_scroll: f32) {
        let mut offset = self.scroll_offset.write();
        *offset = (*offset + delta).clamp(0.0, max_scroll.max(0.0));
    }

    pub fn scroll_offset(&self) -> f32 {
        *self.scroll_offset.read()
    }

    /// Stores a cursor position given in window pixels, normalized so both
    /// axes land in `[-0.5, 0.5]` with `(0, 0)` at the window center.
    pub fn set_cursor_from_pixels(&self, position: Vec2) {
        let (width, height) = self.viewport();
        let normalized = Vec2::new(
            position.x / width as f32 - 0.5,
            position.y / height as f32 - 0.5,
        );
        *self.cursor.write() = normalized.clamp(Vec2::splat(-0.5), Vec2::splat(0.5));
    }

    pub fn cursor(&self) -> Vec2 {
        *self.cursor.read()
    }

    /// Reads every field once so a frame sees one coherent snapshot.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            scroll_offset: self.scroll_offset(),
            cursor: self.cursor(),
            viewport_height: self.viewport_height(),
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Per-frame view of the input state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    pub scroll_offset: f32,
    pub cursor: Vec2,
    pub viewport_height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_normalized_around_the_center() {
        let input = InputState::new(800, 600);
        input.set_cursor_from_pixels(Vec2::new(400.0, 300.0));
        assert_eq!(input.cursor(), Vec2::ZERO);
        input.set_cursor_from_pixels(Vec2::new(800.0, 0.0));
        assert_eq!(input.cursor(), Vec2::new(0.5, -0.5));
    }

    #[test]
    fn cursor_outside_the_window_is_clamped() {
        let input = InputState::new(800, 600);
        input.set_cursor_from_pixels(Vec2::new(1200.0, -50.0));
        assert_eq!(input.cursor(), Vec2::new(0.5, -0.5));
    }

    #[test]
    fn scroll_accumulates_and_clamps() {
        let input = InputState::new(800, 600);
        input.apply_scroll_delta(400.0, 1200.0);
        assert_eq!(input.scroll_offset(), 400.0);
        input.apply_scroll_delta(2000.0, 1200.0);
        assert_eq!(input.scroll_offset(), 1200.0);
        input.apply_scroll_delta(-5000.0, 1200.0);
        assert_eq!(input.scroll_offset(), 0.0);
    }

    #[test]
    fn absolute_scroll_never_goes_negative() {
        let input = InputState::default();
        input.set_scroll_offset(-12.0);
        assert_eq!(input.scroll_offset(), 0.0);
    }

    #[test]
    fn zero_viewport_is_clamped_to_one() {
        let input = InputState::new(0, 0);
        assert_eq!(input.viewport(), (1, 1));
        input.set_viewport(0, 720);
        assert_eq!(input.viewport(), (1, 720));
    }
}
