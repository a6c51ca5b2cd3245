//! glTF/GLB mesh loading

use anyhow::{Context, Result};
use meshpress_codec::{Aabb, IndexFormat, SourceMesh, SubMesh};
use std::path::Path;

/// Load the first mesh of a glTF/GLB file
///
/// All triangle primitives are concatenated into one vertex array, one
/// submesh per primitive, with absolute indices. Missing UVs on some
/// primitives are filled with zeros; missing normals or tangents are left
/// for the codec to reject.
pub fn load_gltf(input: &Path) -> Result<SourceMesh> {
    let (document, buffers, _images) =
        gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

    let mesh = document
        .meshes()
        .next()
        .context("No meshes found in glTF")?;

    let name = mesh
        .name()
        .map(str::to_string)
        .or_else(|| {
            input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_default();

    let mut source = SourceMesh {
        name,
        ..SourceMesh::default()
    };
    let mut primitive_uvs: Vec<(usize, Option<Vec<[f32; 2]>>)> = Vec::new();
    let mut wide_indices = false;

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            tracing::warn!(
                "Skipping primitive {} with mode {:?} (only triangles are supported)",
                primitive.index(),
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        // Positions (required)
        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .context("No positions in primitive")?
            .collect();
        let vertex_count = u32::try_from(positions.len()).context("Primitive too large")?;
        let first_vertex = u32::try_from(source.positions.len()).context("Mesh too large")?;

        if let Some(normals) = reader.read_normals() {
            source.normals.extend(normals);
        }

        // Tangents - vec4: xyz=tangent direction, w=handedness sign (+1 or -1)
        if let Some(tangents) = reader.read_tangents() {
            source.tangents.extend(tangents);
        }

        let uvs: Option<Vec<[f32; 2]>> = reader
            .read_tex_coords(0)
            .map(|iter| iter.into_f32().collect());
        primitive_uvs.push((positions.len(), uvs));

        if primitive
            .indices()
            .is_some_and(|accessor| accessor.data_type() == gltf::accessor::DataType::U32)
        {
            wide_indices = true;
        }

        // Unindexed primitives get a trivial index list
        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().map(|i| i + first_vertex).collect(),
            None => (first_vertex..first_vertex + vertex_count).collect(),
        };

        source.submeshes.push(SubMesh {
            index_start: u32::try_from(source.indices.len()).context("Too many indices")?,
            index_count: u32::try_from(indices.len()).context("Too many indices")?,
            base_vertex: 0,
            first_vertex,
            vertex_count,
        });
        source.indices.extend(indices);
        source.positions.extend(positions);
    }

    if primitive_uvs.iter().any(|(_, uvs)| uvs.is_some()) {
        for (count, uvs) in primitive_uvs {
            match uvs {
                Some(uvs) => source.uvs.extend(uvs),
                None => source.uvs.extend(std::iter::repeat_n([0.0, 0.0], count)),
            }
        }
    }

    let max_u16_vertices = IndexFormat::U16.max_value() as usize + 1;
    source.index_format = if wide_indices || source.positions.len() > max_u16_vertices {
        IndexFormat::U32
    } else {
        IndexFormat::U16
    };
    source.bounds = Aabb::from_points(&source.positions).unwrap_or_default();

    tracing::info!(
        "Loaded mesh {:?}: {} vertices, {} indices, {} submeshes, {:?} indices",
        source.name,
        source.positions.len(),
        source.indices.len(),
        source.submeshes.len(),
        source.index_format
    );

    Ok(source)
}
