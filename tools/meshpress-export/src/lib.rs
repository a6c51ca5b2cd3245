//! meshpress-export library
//!
//! Loads glTF meshes, compresses them with `meshpress-codec` and saves the
//! result as `.mpmesh` containers.

pub mod config;
pub mod error;
pub mod formats;
pub mod mesh;

pub use config::{ExportConfig, load_config, resolve_config};
pub use error::ExportError;
pub use mesh::{OptimizeReport, derive_output_path, load_gltf, load_mesh, optimize_file, save_mesh};
