//! The seam between the globe and whatever draws it.

use std::time::Duration;

use layers::{Bar, ConnectionPath, DensitySample, HeatSample, Label, TransactionArc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::OrbitCamera;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("globe view is already mounted")]
    AlreadyMounted,
    #[error("globe view is not mounted")]
    NotMounted,
    #[error("scene backend error: {0}")]
    Backend(String),
}

/// Drawing surface size in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Camera target in globe terms; altitude is in globe radii above the surface.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfView {
    pub lat: f64,
    pub lng: f64,
    pub altitude: f64,
}

impl Default for PointOfView {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lng: 0.0,
            altitude: 2.5,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

/// One live 3D scene.
///
/// The five `bind_*` calls replace a channel's whole dataset. An empty slice
/// clears the channel.
pub trait GlobeScene: Send {
    fn set_size(&mut self, surface: Surface);

    fn set_point_of_view(&mut self, pov: PointOfView, transition: Duration);

    fn set_camera(&mut self, camera: &OrbitCamera);

    fn bind_density(&mut self, samples: &[DensitySample]);

    fn bind_heat(&mut self, samples: &[HeatSample]);

    fn bind_paths(&mut self, paths: &[ConnectionPath]);

    fn bind_bars(&mut self, bars: &[Bar]);

    fn bind_labels(&mut self, labels: &[Label]);

    fn add_object(&mut self, id: ObjectId, arc: &TransactionArc);

    fn update_object(&mut self, id: ObjectId, scale: f64, opacity: f64);

    fn remove_object(&mut self, id: ObjectId);

    /// Releases every resource held by the scene.
    fn dispose(&mut self);
}

pub trait SceneFactory: Send {
    fn create(&mut self, surface: Surface) -> Result<Box<dyn GlobeScene>, SceneError>;
}
