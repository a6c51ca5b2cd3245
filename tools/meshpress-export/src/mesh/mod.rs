//! Mesh optimizer (glTF -> .mpmesh)

mod gltf;

pub use gltf::load_gltf;

use anyhow::{Context, Result};
use meshpress_codec::{CompressedMesh, PackedAttributes, PackedPosition, compress_mesh};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::{ExportConfig, OutputSection};
use crate::error::ExportError;
use crate::formats::{read_mesh, write_mesh};

/// Unpacked bytes per vertex: position f32x3, normal f32x3, tangent f32x4, uv f32x2
pub const SOURCE_VERTEX_SIZE: usize = 48;

/// Summary of one optimized mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeReport {
    pub output: PathBuf,
    pub vertex_count: usize,
    pub index_count: usize,
    /// Vertex bytes before packing
    pub source_vertex_bytes: usize,
    /// Vertex bytes after packing (both streams)
    pub packed_vertex_bytes: usize,
}

/// Output path for an optimized mesh: `<dir>/<name><suffix>.<extension>`
///
/// `dir` is the configured output directory or the source asset's directory.
pub fn derive_output_path(
    input: &Path,
    mesh_name: &str,
    output: &OutputSection,
) -> Result<PathBuf, ExportError> {
    let stem = input
        .file_stem()
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| ExportError::NoAssetPath(input.to_path_buf()))?;

    let name = if mesh_name.is_empty() {
        stem.to_string_lossy()
    } else {
        mesh_name.into()
    };

    let directory = match &output.directory {
        Some(directory) => directory.as_path(),
        None => input.parent().unwrap_or_else(|| Path::new("")),
    };

    Ok(directory.join(format!("{name}{}.{}", output.suffix, output.extension)))
}

fn check_extension(input: &Path) -> Result<(), ExportError> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "gltf" | "glb" => Ok(()),
        _ => Err(ExportError::UnsupportedFormat(input.to_path_buf())),
    }
}

/// Optimize a glTF/GLB mesh and save it
///
/// Writes to `output` if given, else to [`derive_output_path`]. Nothing is
/// written when loading, compression or path derivation fails.
pub fn optimize_file(
    input: &Path,
    output: Option<&Path>,
    config: &ExportConfig,
) -> Result<OptimizeReport> {
    check_extension(input)?;
    let source = load_gltf(input)?;
    let mesh = compress_mesh(&source, &config.codec.options()).map_err(ExportError::from)?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => derive_output_path(input, &source.name, &config.output)?,
    };
    save_mesh(&mesh, &output)?;

    let vertex_count = mesh.vertex_count();
    let report = OptimizeReport {
        output,
        vertex_count,
        index_count: mesh.indices.len(),
        source_vertex_bytes: vertex_count * SOURCE_VERTEX_SIZE,
        packed_vertex_bytes: vertex_count * (PackedPosition::STRIDE + PackedAttributes::STRIDE),
    };

    tracing::info!(
        "Optimized mesh: {} vertices, {} indices, vertex data {} -> {} bytes",
        report.vertex_count,
        report.index_count,
        report.source_vertex_bytes,
        report.packed_vertex_bytes
    );

    Ok(report)
}

/// Write a compressed mesh to disk, creating parent directories
pub fn save_mesh(mesh: &CompressedMesh, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    write_mesh(&mut writer, mesh)?;
    writer.flush()?;
    Ok(())
}

/// Read a saved .mpmesh file
pub fn load_mesh(path: &Path) -> Result<CompressedMesh> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read mesh: {:?}", path))?;
    read_mesh(&bytes).with_context(|| format!("Invalid mesh file: {:?}", path))
}
