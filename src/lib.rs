//! Core modules for the scroll stage showcase.
//!
//! The crate exposes high level building blocks that can be composed to
//! build scroll-driven 3D landing scenes.  The frame update logic is kept
//! independent of rendering and platform integration so that it stays
//! testable and easy to drive headlessly.

pub mod app;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod render;
pub mod scene;

pub use frame::{FrameTransforms, FrameUpdater};
pub use geometry::MeshData;
pub use input::{InputSnapshot, InputState};
pub use render::{CameraParams, LightParams, Renderer};
pub use scene::{Scene, Section, Settings, ShapeKind};
