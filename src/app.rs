use glam::{Mat4, Vec2, Vec3};

use crate::frame::{FrameTransforms, FrameUpdater};
use crate::input::InputSnapshot;
use crate::render::{CameraParams, LightParams};
use crate::scene::{Scene, Settings};

/// Distance from the camera to the plane of the section meshes.
pub const CAMERA_DISTANCE: f32 = 6.0;

/// Viewport assumed by the headless simulation.
const SUMMARY_VIEWPORT_HEIGHT: f32 = 720.0;
const SUMMARY_FRAME_RATE: f32 = 60.0;
/// Cursor held steady through a simulated session.
const SUMMARY_CURSOR: Vec2 = Vec2::new(0.25, -0.25);

/// Builds the camera for a frame: the rig's parallax offset shifts the eye
/// laterally, the scroll offset moves it down the section stack, and the
/// camera always faces -z.
pub fn camera_params(
    settings: &Settings,
    transforms: &FrameTransforms,
    aspect: f32,
) -> CameraParams {
    let eye = Vec3::new(
        transforms.rig_offset.x,
        transforms.camera_y + transforms.rig_offset.y,
        CAMERA_DISTANCE,
    );
    let view = Mat4::look_to_rh(eye, Vec3::NEG_Z, Vec3::Y);
    let proj = Mat4::perspective_rh(settings.fov.to_radians(), aspect.max(0.01), 0.1, 100.0);
    CameraParams {
        view,
        proj,
        position: eye,
    }
}

pub fn light_params(settings: &Settings) -> LightParams {
    LightParams {
        direction: settings.light_direction.normalize_or_zero(),
        color: settings.light_color,
    }
}

/// Result of a headless run.
#[derive(Debug, Clone, Copy)]
pub struct SummaryState {
    pub transforms: FrameTransforms,
    pub frames: u32,
}

/// Drives the frame updater through `frames` simulated frames at 60 Hz with
/// a scripted input sweep: scroll moves linearly from the top to the last
/// section while the cursor is held at a fixed offset. This is the exact
/// update path the interactive loop runs, minus the GPU.
pub fn simulate(scene: &Scene, frames: u32) -> SummaryState {
    let mut updater = FrameUpdater::new(scene.settings.object_distance);
    let max_scroll = scene.max_scroll(SUMMARY_VIEWPORT_HEIGHT);

    let mut transforms = updater.advance(
        0.0,
        &InputSnapshot {
            scroll_offset: 0.0,
            cursor: SUMMARY_CURSOR,
            viewport_height: SUMMARY_VIEWPORT_HEIGHT,
        },
    );
    for frame in 1..=frames {
        let elapsed = frame as f32 / SUMMARY_FRAME_RATE;
        let scroll_offset = max_scroll * frame as f32 / frames as f32;
        transforms = updater.advance(
            elapsed,
            &InputSnapshot {
                scroll_offset,
                cursor: SUMMARY_CURSOR,
                viewport_height: SUMMARY_VIEWPORT_HEIGHT,
            },
        );
    }

    SummaryState { transforms, frames }
}

pub fn print_summary(scene: &Scene, state: &SummaryState) {
    let rotation = state.transforms.rotation;
    println!("Final frame state after {} frames:", state.frames);
    for section in &scene.sections {
        println!(
            " - {} rot=({:.2}, {:.2}) pos=({:.2}, {:.2}, {:.2})",
            section.name,
            rotation.x,
            rotation.y,
            section.position.x,
            section.position.y,
            section.position.z
        );
    }
    println!(
        "Camera y={:.2} rig=({:.2}, {:.2})",
        state.transforms.camera_y, state.transforms.rig_offset.x, state.transforms.rig_offset.y
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_eye_composes_scroll_and_parallax() {
        let settings = Settings::default();
        let transforms = FrameTransforms {
            rotation: Vec2::ZERO,
            camera_y: -2.0,
            rig_offset: Vec2::new(0.1, 0.3),
        };
        let camera = camera_params(&settings, &transforms, 16.0 / 9.0);
        assert_eq!(camera.position, Vec3::new(0.1, -1.7, CAMERA_DISTANCE));
    }

    #[test]
    fn light_direction_is_normalized() {
        let light = light_params(&Settings::default());
        assert!((light.direction.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn simulation_reaches_the_last_section() {
        let scene = Scene::builtin();
        let state = simulate(&scene, 240);

        // Four simulated seconds of rotation.
        assert!((state.transforms.rotation.x - 0.4).abs() < 1e-4);
        assert!((state.transforms.rotation.y - 0.48).abs() < 1e-4);

        // Scroll sweeps to the last section: two viewport heights down.
        assert!((state.transforms.camera_y - -8.0).abs() < 1e-3);

        // The rig has long since converged on the cursor target.
        assert!((state.transforms.rig_offset - Vec2::new(0.25, 0.25)).length() < 1e-3);
    }

    #[test]
    fn zero_frames_leaves_everything_at_rest() {
        let scene = Scene::builtin();
        let state = simulate(&scene, 0);
        assert_eq!(state.transforms.rotation, Vec2::ZERO);
        assert_eq!(state.transforms.camera_y, 0.0);
    }
}
