mod camera;
pub mod geometry;
mod renderer;
pub mod scene;
mod screen_block;
mod tracer;
mod util;

pub use crate::renderer::{
    RenderJob, RenderProgress, RenderSettings, RenderSetupError, TileProgress, render,
};
pub use camera::Camera;
pub use scene::Scene;
pub use tracer::{RayTracer, TracerSettings};
pub use util::{BLACK, Color, WHITE};
