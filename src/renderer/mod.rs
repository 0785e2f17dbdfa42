mod machinery;
mod worker;

use std::num::NonZeroU32;

use bon::bon;
use thiserror::Error;

pub use crate::renderer::machinery::{RenderProgress, TileProgress, render};
use crate::{
    camera::Camera,
    scene::{Intersectable, Scene},
    tracer::TracerSettings,
};

#[derive(Copy, Clone, Debug)]
pub struct RenderSettings {
    pub tile_size: NonZeroU32,
    /// Camera rays averaged per pixel. With a single sample the ray goes through the pixel center.
    pub sample_count: NonZeroU32,
    pub tracer: TracerSettings,
}

const DEFAULT_TILE_SIZE: NonZeroU32 = NonZeroU32::new(64).unwrap();

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            tile_size: DEFAULT_TILE_SIZE,
            sample_count: NonZeroU32::MIN,
            tracer: TracerSettings::default(),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RenderSetupError {
    #[error("Render job has no scene")]
    MissingScene,
    #[error("Render job has no camera")]
    MissingCamera,
}

/// Everything a render needs, checked to be complete.
#[derive(Clone, Debug)]
pub struct RenderJob<O: Intersectable> {
    scene: Scene<O>,
    camera: Camera,
    settings: RenderSettings,
}

#[bon]
impl<O: Intersectable> RenderJob<O> {
    #[builder]
    pub fn new(
        scene: Option<Scene<O>>,
        camera: Option<Camera>,
        #[builder(default)] settings: RenderSettings,
    ) -> Result<Self, RenderSetupError> {
        Ok(RenderJob {
            scene: scene.ok_or(RenderSetupError::MissingScene)?,
            camera: camera.ok_or(RenderSetupError::MissingCamera)?,
            settings,
        })
    }
}

impl<O: Intersectable> RenderJob<O> {
    pub fn scene(&self) -> &Scene<O> {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        geometry::{ScreenSize, WorldPoint, WorldVector},
        scene::Geometries,
    };
    use assert2::{assert, let_assert};

    fn camera() -> Camera {
        Camera::builder()
            .center(WorldPoint::origin())
            .forward(WorldVector::new(0.0, 0.0, -1.0))
            .up(WorldVector::new(0.0, 1.0, 0.0))
            .resolution(ScreenSize::new(4, 3))
            .build()
            .unwrap()
    }

    #[test]
    fn complete_job() {
        let_assert!(
            Ok(job) = RenderJob::builder()
                .scene(Scene::builder().object(Geometries::new()).build())
                .camera(camera())
                .build()
        );
        assert!(job.settings().sample_count.get() == 1);
        assert!(job.camera().resolution() == ScreenSize::new(4, 3));
    }

    #[test]
    fn missing_scene() {
        let result = RenderJob::<Geometries>::builder().camera(camera()).build();
        let_assert!(Err(RenderSetupError::MissingScene) = result);
    }

    #[test]
    fn missing_camera() {
        let result = RenderJob::builder()
            .scene(Scene::builder().object(Geometries::new()).build())
            .build();
        let_assert!(Err(RenderSetupError::MissingCamera) = result);
    }
}
