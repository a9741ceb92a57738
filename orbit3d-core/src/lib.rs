/// Orbit3D Core Library - software 3D pipeline and flight simulation
///
/// This library provides the stateless pieces of the renderer: vector and
/// matrix math, transform builders, the camera, mesh data, the OBJ loader and
/// the projection pipeline that turns meshes into depth-sorted screen
/// triangles. The spacecraft/planet physics and starfield live here too so the
/// host only has to read input and draw.

pub mod camera;
pub mod config;
pub mod flight;
pub mod geometry;
pub mod math;
pub mod obj;
pub mod pipeline;
pub mod space;
pub mod transform;

// Re-export commonly used types
pub use camera::{Camera, CameraMode, FreeFlyInput};
pub use config::PipelineConfig;
pub use flight::{Planet, RenderOrder, ShipControls, Spacecraft};
pub use geometry::{Mesh, Rgb, Triangle};
pub use math::{Matrix4, Vector3};
pub use obj::ObjError;
pub use pipeline::{Pipeline, ProjectedTriangle, ScreenPoint};
pub use space::Starfield;
