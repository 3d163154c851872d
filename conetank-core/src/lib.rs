/// ConeTank Core Library - liquid volume and meshes for an inverted truncated cone
///
/// This library is the stateless engine behind the calculators: the volume
/// formula, surface-of-revolution sampling for the vessel and the liquid,
/// tank profiles, input handling, and the camera math used to draw them.

pub mod compute;
pub mod error;
pub mod frustum;
pub mod geometry;
pub mod inputs;
pub mod mesh;
pub mod profile;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use compute::{compute, compute_with, TankSnapshot};
pub use error::{Result, TankError};
pub use frustum::{liquid_volume, Frustum};
pub use geometry::{Cap, Mesh, Triangle, Vertex};
pub use inputs::{parse_assignments, Assignment, Parameter, TankInputs};
pub use mesh::{liquid_surface, revolve, vessel_surface, MeshResolution, SurfaceGrid};
pub use profile::{SliderRange, TankProfile};
pub use projection::{Camera, ProjectionMode};
pub use transform::{OrbitView, Transform};
