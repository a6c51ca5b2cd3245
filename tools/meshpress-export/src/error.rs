//! Export error types

use meshpress_codec::CodecError;
use std::path::PathBuf;

/// Errors the export pipeline reports to its caller
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The source has no file identity to derive an output path from
    #[error("{0:?} is not an asset file - cannot determine save path")]
    NoAssetPath(PathBuf),

    #[error("unsupported mesh format {0:?} (use .gltf or .glb)")]
    UnsupportedFormat(PathBuf),

    /// The mesh failed a codec precondition
    #[error(transparent)]
    Codec(#[from] CodecError),
}
