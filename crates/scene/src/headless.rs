//! A scene that draws nothing and records what it was told.
//!
//! Used by the headless viewer and by tests; the state handle stays readable
//! after the scene itself is boxed and owned by a view.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use layers::{Bar, ConnectionPath, DensitySample, HeatSample, Label, TransactionArc};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::backend::{GlobeScene, ObjectId, PointOfView, SceneError, SceneFactory, Surface};
use crate::camera::OrbitCamera;

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectState {
    pub arc: TransactionArc,
    pub scale: f64,
    pub opacity: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct HeadlessState {
    pub surface: Option<Surface>,
    pub pov: Option<PointOfView>,
    pub camera: Option<OrbitCamera>,
    pub density: Vec<DensitySample>,
    pub heat: Vec<HeatSample>,
    pub paths: Vec<ConnectionPath>,
    pub bars: Vec<Bar>,
    pub labels: Vec<Label>,
    pub objects: BTreeMap<ObjectId, ObjectState>,
    /// Number of times any channel was re-bound.
    pub binds: u64,
    pub disposed: bool,
}

pub struct HeadlessScene {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessScene {
    pub fn new(state: Arc<Mutex<HeadlessState>>) -> Self {
        Self { state }
    }
}

impl GlobeScene for HeadlessScene {
    fn set_size(&mut self, surface: Surface) {
        self.state.lock().surface = Some(surface);
    }

    fn set_point_of_view(&mut self, pov: PointOfView, transition: Duration) {
        debug!(?pov, ?transition, "point of view");
        self.state.lock().pov = Some(pov);
    }

    fn set_camera(&mut self, camera: &OrbitCamera) {
        self.state.lock().camera = Some(*camera);
    }

    fn bind_density(&mut self, samples: &[DensitySample]) {
        let mut s = self.state.lock();
        s.density = samples.to_vec();
        s.binds += 1;
    }

    fn bind_heat(&mut self, samples: &[HeatSample]) {
        let mut s = self.state.lock();
        s.heat = samples.to_vec();
        s.binds += 1;
    }

    fn bind_paths(&mut self, paths: &[ConnectionPath]) {
        let mut s = self.state.lock();
        s.paths = paths.to_vec();
        s.binds += 1;
    }

    fn bind_bars(&mut self, bars: &[Bar]) {
        let mut s = self.state.lock();
        s.bars = bars.to_vec();
        s.binds += 1;
    }

    fn bind_labels(&mut self, labels: &[Label]) {
        let mut s = self.state.lock();
        s.labels = labels.to_vec();
        s.binds += 1;
    }

    fn add_object(&mut self, id: ObjectId, arc: &TransactionArc) {
        trace!(?id, "add arc");
        self.state.lock().objects.insert(
            id,
            ObjectState {
                arc: arc.clone(),
                scale: 0.0,
                opacity: 0.0,
            },
        );
    }

    fn update_object(&mut self, id: ObjectId, scale: f64, opacity: f64) {
        if let Some(obj) = self.state.lock().objects.get_mut(&id) {
            obj.scale = scale;
            obj.opacity = opacity;
        }
    }

    fn remove_object(&mut self, id: ObjectId) {
        self.state.lock().objects.remove(&id);
    }

    fn dispose(&mut self) {
        let mut s = self.state.lock();
        s.objects.clear();
        s.disposed = true;
        debug!("headless scene disposed");
    }
}

/// Creates headless scenes that all report into one shared state.
#[derive(Default, Clone)]
pub struct HeadlessFactory {
    state: Arc<Mutex<HeadlessState>>,
    created: Arc<Mutex<usize>>,
}

impl HeadlessFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HeadlessState {
        self.state.lock().clone()
    }

    pub fn scenes_created(&self) -> usize {
        *self.created.lock()
    }
}

impl SceneFactory for HeadlessFactory {
    fn create(&mut self, surface: Surface) -> Result<Box<dyn GlobeScene>, SceneError> {
        *self.created.lock() += 1;
        {
            let mut s = self.state.lock();
            *s = HeadlessState::default();
            s.surface = Some(surface);
        }
        Ok(Box::new(HeadlessScene::new(Arc::clone(&self.state))))
    }
}
