//! Render Adapter.
//!
//! `GlobeView` owns the single scene handle, the repaint ticker and the
//! transient arcs. Nothing keeps running after `unmount`.

use std::time::Duration;

use catalog::{Talent, Transaction};
use layers::{DisplayModes, LayerDatasets, LayerKind, TransactionArc};
use runtime::{Frame, FrameTicker};
use tracing::{debug, info};

use crate::animation::TransientArcs;
use crate::backend::{GlobeScene, ObjectId, PointOfView, SceneError, SceneFactory, Surface};
use crate::camera::OrbitCamera;
use crate::picking::{PickEvent, resolve_click};

pub struct GlobeView {
    factory: Box<dyn SceneFactory>,
    scene: Option<Box<dyn GlobeScene>>,
    surface: Surface,
    resize_attached: bool,
    ticker: FrameTicker,
    camera: OrbitCamera,
    modes: DisplayModes,
    datasets: LayerDatasets,
    arcs: TransientArcs,
    hovered: Option<(LayerKind, usize)>,
    selected: Option<Talent>,
}

impl GlobeView {
    pub fn new(factory: Box<dyn SceneFactory>) -> Self {
        Self {
            factory,
            scene: None,
            surface: Surface::new(0, 0),
            resize_attached: false,
            ticker: FrameTicker::new(),
            camera: OrbitCamera::default(),
            modes: DisplayModes::default(),
            datasets: LayerDatasets::default(),
            arcs: TransientArcs::default(),
            hovered: None,
            selected: None,
        }
    }

    pub fn with_transient_capacity(mut self, capacity: usize) -> Self {
        self.arcs = TransientArcs::with_capacity(capacity);
        self
    }

    pub fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    /// Creates the scene. Mounting an already mounted view is an error; a
    /// view can be mounted again after `unmount`.
    pub fn mount(&mut self, surface: Surface) -> Result<(), SceneError> {
        if self.scene.is_some() {
            return Err(SceneError::AlreadyMounted);
        }
        let mut scene = self.factory.create(surface)?;
        self.surface = surface;
        self.camera = OrbitCamera::default();
        scene.set_size(surface);
        scene.set_point_of_view(PointOfView::default(), Duration::ZERO);
        scene.set_camera(&self.camera);
        self.scene = Some(scene);
        self.bind_all();
        self.resize_attached = true;
        self.ticker.start();
        info!(width = surface.width, height = surface.height, "globe mounted");
        Ok(())
    }

    /// Re-binds all five channels on the existing scene.
    pub fn update(&mut self, datasets: LayerDatasets, modes: DisplayModes) {
        self.datasets = datasets;
        self.modes = modes;
        self.bind_all();
    }

    fn bind_all(&mut self) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let (d, m) = (&self.datasets, self.modes);
        scene.bind_density(gate(m.density, &d.density));
        scene.bind_heat(gate(m.heat, &d.heat));
        scene.bind_paths(gate(m.paths, &d.paths));
        scene.bind_bars(gate(m.bars, &d.bars));
        scene.bind_labels(gate(m.labels, &d.labels));
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface = Surface::new(width, height);
        if self.resize_attached
            && let Some(scene) = self.scene.as_mut()
        {
            scene.set_size(self.surface);
        }
    }

    /// Stops the ticker, detaches resize handling, clears transient arcs and
    /// releases the scene. Safe to call more than once.
    pub fn unmount(&mut self) {
        let Some(mut scene) = self.scene.take() else {
            return;
        };
        self.ticker.stop();
        self.resize_attached = false;
        for id in self.arcs.clear() {
            scene.remove_object(id);
        }
        scene.dispose();
        self.hovered = None;
        info!("globe unmounted");
    }

    /// Adds an animated arc for `tx`.
    pub fn add_transient_arc(&mut self, tx: &Transaction) -> Result<ObjectId, SceneError> {
        let scene = self.scene.as_mut().ok_or(SceneError::NotMounted)?;
        let arc = TransactionArc::from_transaction(tx);
        let (id, evicted) = self.arcs.insert(arc);
        if let Some(old) = evicted {
            scene.remove_object(old);
        }
        if let Some(entry) = self.arcs.get(id) {
            scene.add_object(id, &entry.arc);
        }
        debug!(?id, tx = %tx.id, "transient arc added");
        Ok(id)
    }

    /// Advances the camera and arc animations by one frame.
    pub fn tick(&mut self, dt: Duration) -> Option<Frame> {
        let frame = self.ticker.tick(dt)?;
        let scene = self.scene.as_mut()?;
        self.camera.advance(frame.dt_s());
        scene.set_camera(&self.camera);
        for (id, scale, opacity) in self.arcs.advance(frame.dt) {
            scene.update_object(id, scale, opacity);
        }
        Some(frame)
    }

    pub fn click(&mut self, kind: LayerKind, index: usize) -> PickEvent {
        let event = resolve_click(&self.datasets, kind, index);
        if let PickEvent::Selected(talent) = &event {
            debug!(talent = %talent.id, "talent selected");
            self.selected = Some(talent.clone());
        }
        event
    }

    /// `None` clears the hover.
    pub fn hover(&mut self, item: Option<(LayerKind, usize)>) {
        self.hovered = item;
    }

    pub fn hovered(&self) -> Option<(LayerKind, usize)> {
        self.hovered
    }

    pub fn selected_talent(&self) -> Option<&Talent> {
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.camera.auto_rotate = enabled;
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn datasets(&self) -> &LayerDatasets {
        &self.datasets
    }

    pub fn display_modes(&self) -> DisplayModes {
        self.modes
    }

    pub fn transient_arcs(&self) -> &TransientArcs {
        &self.arcs
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }
}

fn gate<T>(enabled: bool, items: &[T]) -> &[T] {
    if enabled { items } else { &[] }
}

impl Drop for GlobeView {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessFactory;
    use catalog::{CatalogSource, InMemoryCatalog, TransactionStatus};
    use foundation::{GeoPoint, Timestamp};
    use layers::{FilterState, derive};

    fn view() -> (GlobeView, HeadlessFactory) {
        let factory = HeadlessFactory::new();
        (GlobeView::new(Box::new(factory.clone())), factory)
    }

    fn tx(id: &str) -> Transaction {
        Transaction {
            id: id.into(),
            talent_id: "t".into(),
            buyer_id: "b".into(),
            amount: 500.0,
            status: TransactionStatus::Completed,
            payment_intent_id: String::new(),
            created_at: Timestamp(0),
            source: GeoPoint::new(40.7, -74.0).unwrap(),
            destination: GeoPoint::new(51.5, -0.1).unwrap(),
        }
    }

    async fn datasets() -> LayerDatasets {
        let talents = InMemoryCatalog::seeded().fetch_talents().await.unwrap();
        derive(&talents, &FilterState::new())
    }

    #[test]
    fn mount_sets_initial_viewpoint_and_rejects_second_mount() {
        let (mut v, factory) = view();
        v.mount(Surface::new(800, 600)).unwrap();
        let state = factory.state();
        assert_eq!(state.pov, Some(PointOfView::default()));
        assert_eq!(state.surface, Some(Surface::new(800, 600)));
        assert_eq!(v.mount(Surface::new(1, 1)), Err(SceneError::AlreadyMounted));
        assert_eq!(factory.scenes_created(), 1);
    }

    #[tokio::test]
    async fn update_rebinds_without_new_scene_and_honors_modes() {
        let (mut v, factory) = view();
        v.mount(Surface::new(800, 600)).unwrap();
        let mut modes = DisplayModes::default();
        modes.set(LayerKind::Paths, false);
        v.update(datasets().await, modes);
        let state = factory.state();
        assert_eq!(state.bars.len(), 3);
        assert!(state.paths.is_empty());
        assert_eq!(factory.scenes_created(), 1);
    }

    #[test]
    fn unmount_is_idempotent_and_stops_everything() {
        let (mut v, factory) = view();
        v.mount(Surface::new(800, 600)).unwrap();
        v.add_transient_arc(&tx("a")).unwrap();
        v.unmount();
        v.unmount();
        assert!(factory.state().disposed);
        assert!(factory.state().objects.is_empty());
        assert!(v.transient_arcs().is_empty());
        assert!(!v.is_ticking());
        assert!(v.tick(Duration::from_millis(16)).is_none());
        v.resize(10, 10);
        assert_eq!(factory.state().surface, Some(Surface::new(800, 600)));
    }

    #[test]
    fn arcs_need_a_mounted_view() {
        let (mut v, factory) = view();
        assert_eq!(v.add_transient_arc(&tx("a")), Err(SceneError::NotMounted));
        v.mount(Surface::new(800, 600)).unwrap();
        v.unmount();
        assert_eq!(v.add_transient_arc(&tx("b")), Err(SceneError::NotMounted));
        assert!(factory.state().objects.is_empty());
    }

    #[test]
    fn arcs_animate_over_two_seconds() {
        let (mut v, factory) = view();
        v.mount(Surface::new(800, 600)).unwrap();
        let id = v.add_transient_arc(&tx("a")).unwrap();
        v.tick(Duration::from_millis(500));
        let obj = factory.state().objects[&id].clone();
        assert_eq!((obj.scale, obj.opacity), (0.25, 0.5));
        v.tick(Duration::from_millis(1500));
        let obj = factory.state().objects[&id].clone();
        assert_eq!((obj.scale, obj.opacity), (1.0, 1.0));
        // Completed arcs stay in the scene.
        v.tick(Duration::from_millis(16));
        assert!(factory.state().objects.contains_key(&id));
    }

    #[test]
    fn transient_arcs_are_capped() {
        let factory = HeadlessFactory::new();
        let mut v = GlobeView::new(Box::new(factory.clone())).with_transient_capacity(2);
        v.mount(Surface::new(800, 600)).unwrap();
        let first = v.add_transient_arc(&tx("a")).unwrap();
        v.add_transient_arc(&tx("b")).unwrap();
        v.add_transient_arc(&tx("c")).unwrap();
        let objects = factory.state().objects;
        assert_eq!(objects.len(), 2);
        assert!(!objects.contains_key(&first));
    }

    #[test]
    fn camera_auto_rotates_with_ticks() {
        let (mut v, factory) = view();
        v.mount(Surface::new(800, 600)).unwrap();
        v.tick(Duration::from_secs(2));
        let cam = factory.state().camera.unwrap();
        assert!((cam.pov.lng - 6.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn label_click_selects_talent() {
        let (mut v, _) = view();
        v.mount(Surface::new(800, 600)).unwrap();
        v.update(datasets().await, DisplayModes::default());
        let expected = v.datasets().labels[2].text.clone();
        assert!(matches!(v.click(LayerKind::Labels, 2), PickEvent::Selected(_)));
        assert_eq!(v.selected_talent().map(|t| t.name.clone()), Some(expected));
        assert_eq!(v.click(LayerKind::Labels, 9), PickEvent::Miss);
    }
}
