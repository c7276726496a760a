pub mod animation;
pub mod backend;
pub mod camera;
pub mod headless;
pub mod picking;
pub mod view;

pub use animation::{ArcAnimation, MAX_TRANSIENT_ARCS, TransientArcs};
pub use backend::{GlobeScene, ObjectId, PointOfView, SceneError, SceneFactory, Surface};
pub use camera::OrbitCamera;
pub use headless::{HeadlessFactory, HeadlessScene, HeadlessState};
pub use picking::PickEvent;
pub use view::GlobeView;
