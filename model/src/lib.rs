pub mod error;
pub mod mesh;
pub mod mtl;
pub mod obj;
pub mod sphere;
pub mod tangent;
mod vertex;

pub use error::{ElementKind, ObjError};
pub use mesh::{FaceOutOfRange, IndexedMesh, MeshBuilder};
pub use mtl::MaterialMaps;
pub use obj::{load_obj, LoadedModel, ObjModel, ObjOptions, ObjParser, PolygonPolicy};
pub use sphere::UvSphere;
pub use tangent::{compute_tangents, TangentError, TangentReport};
pub use vertex::{Face, Vertex};
