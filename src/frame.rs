use glam::Vec2;

use crate::input::InputSnapshot;

/// Radians of x-axis rotation accumulated per second of elapsed time.
pub const ROTATION_SPEED_X: f32 = 0.1;
/// Radians of y-axis rotation accumulated per second of elapsed time.
pub const ROTATION_SPEED_Y: f32 = 0.12;
/// First-order filter rate pulling the camera rig toward the cursor target.
pub const PARALLAX_RATE: f32 = 5.0;

/// Advances the showcase by one display refresh.
///
/// Everything mutable lives here: the previous clock sample and the eased
/// camera-rig offset. Rotations and the scroll-driven camera height are
/// recomputed from absolute inputs every frame, so replaying a frame with
/// identical inputs yields identical output.
#[derive(Debug, Clone)]
pub struct FrameUpdater {
    object_distance: f32,
    previous_time: f32,
    rig_offset: Vec2,
}

impl FrameUpdater {
    pub fn new(object_distance: f32) -> Self {
        Self {
            object_distance,
            previous_time: 0.0,
            rig_offset: Vec2::ZERO,
        }
    }

    /// Computes the transforms for one frame.
    ///
    /// `elapsed` is seconds since startup from a monotonic clock. Two calls
    /// with the same elapsed time leave the rig untouched because the delta
    /// collapses to zero.
    pub fn advance(&mut self, elapsed: f32, input: &InputSnapshot) -> FrameTransforms {
        let delta = elapsed - self.previous_time;
        self.previous_time = elapsed;

        // Same formula for every display object: absolute, not accumulated.
        let rotation = Vec2::new(elapsed * ROTATION_SPEED_X, elapsed * ROTATION_SPEED_Y);

        let viewport_height = input.viewport_height.max(1.0);
        let camera_y = -(input.scroll_offset / viewport_height) * self.object_distance;

        let target = Vec2::new(input.cursor.x, -input.cursor.y);
        self.rig_offset += (target - self.rig_offset) * PARALLAX_RATE * delta;

        FrameTransforms {
            rotation,
            camera_y,
            rig_offset: self.rig_offset,
        }
    }

    pub fn rig_offset(&self) -> Vec2 {
        self.rig_offset
    }
}

/// Output of one updater step, consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    /// Rotation angles (radians) applied to every display object.
    pub rotation: Vec2,
    /// Vertical camera offset driven by the scroll position.
    pub camera_y: f32,
    /// Horizontal/vertical parallax offset of the camera rig.
    pub rig_offset: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn snapshot(scroll_offset: f32, cursor: Vec2, viewport_height: f32) -> InputSnapshot {
        InputSnapshot {
            scroll_offset,
            cursor,
            viewport_height,
        }
    }

    #[test]
    fn rotation_is_linear_in_elapsed_time() {
        let mut updater = FrameUpdater::new(4.0);
        let frame = updater.advance(10.0, &snapshot(0.0, Vec2::ZERO, 800.0));
        assert!((frame.rotation.x - 1.0).abs() < 1e-6);
        assert!((frame.rotation.y - 1.2).abs() < 1e-6);
    }

    #[test]
    fn camera_height_is_a_pure_function_of_scroll() {
        let mut updater = FrameUpdater::new(4.0);
        let at_top = updater.advance(0.1, &snapshot(0.0, Vec2::ZERO, 800.0));
        assert_eq!(at_top.camera_y, 0.0);

        let scrolled = updater.advance(0.2, &snapshot(400.0, Vec2::ZERO, 800.0));
        assert!((scrolled.camera_y - -2.0).abs() < 1e-6);

        // Scrolling back up restores the exact height: nothing accumulates.
        let restored = updater.advance(0.3, &snapshot(0.0, Vec2::ZERO, 800.0));
        assert_eq!(restored.camera_y, 0.0);
    }

    #[test]
    fn replaying_a_frame_changes_nothing() {
        let mut updater = FrameUpdater::new(4.0);
        let input = snapshot(120.0, Vec2::new(0.3, -0.2), 800.0);
        let first = updater.advance(2.0, &input);
        let second = updater.advance(2.0, &input);
        assert_eq!(first.rotation, second.rotation);
        assert_eq!(first.rig_offset, second.rig_offset);
    }

    #[test]
    fn rig_step_fraction_matches_the_filter_rate() {
        let mut updater = FrameUpdater::new(4.0);
        updater.advance(0.0, &snapshot(0.0, Vec2::ZERO, 800.0));
        let frame = updater.advance(0.01, &snapshot(0.0, Vec2::new(0.4, 0.0), 800.0));
        // One step from rest covers rate * delta of the remaining distance.
        assert!((frame.rig_offset.x - 0.4 * PARALLAX_RATE * 0.01).abs() < 1e-6);
    }

    #[test]
    fn rig_converges_monotonically_toward_the_cursor_target() {
        let mut updater = FrameUpdater::new(4.0);
        let cursor = Vec2::new(0.25, -0.4);
        let target = Vec2::new(0.25, 0.4);
        let mut previous_distance = f32::INFINITY;
        for frame_index in 1..=300 {
            let elapsed = frame_index as f32 / 60.0;
            let frame = updater.advance(elapsed, &snapshot(0.0, cursor, 800.0));
            let distance = (target - frame.rig_offset).length();
            assert!(distance <= previous_distance);
            previous_distance = distance;
        }
        assert!(previous_distance < 1e-3);
    }

    #[test]
    fn vertical_parallax_is_inverted() {
        let mut updater = FrameUpdater::new(4.0);
        updater.advance(0.0, &snapshot(0.0, Vec2::ZERO, 800.0));
        let frame = updater.advance(0.1, &snapshot(0.0, Vec2::new(0.0, 0.5), 800.0));
        assert!(frame.rig_offset.y > 0.0);
    }

    #[test]
    fn degenerate_viewport_height_does_not_blow_up() {
        let mut updater = FrameUpdater::new(4.0);
        let frame = updater.advance(0.1, &snapshot(100.0, Vec2::ZERO, 0.0));
        assert!(frame.camera_y.is_finite());
    }
}
