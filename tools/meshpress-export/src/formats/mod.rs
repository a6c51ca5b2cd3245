//! MeshPress binary container (.mpmesh)
//!
//! Little-endian, tightly packed. Vertex and index streams are written as
//! their GPU byte views, so they can be uploaded without conversion.
//!
//! # Layout
//! ```text
//! 0x00: magic "MPQT"
//! 0x04: version u16
//! 0x06: index_format u8 (0 = u16, 1 = u32)
//! 0x07: padding u8
//! 0x08: vertex_count u32
//! 0x0C: index_count u32
//! 0x10: submesh_count u32
//! 0x14: name_len u32
//! 0x18: bounds min f32x3, max f32x3
//! 0x30: name (name_len bytes, UTF-8)
//! var:  stream A (vertex_count * 8)
//! var:  stream B (vertex_count * 12)
//! var:  index data (index_count * 2 or 4)
//! var:  submesh table (submesh_count * 20)
//! ```

use anyhow::{Context, Result, bail, ensure};
use glam::Vec3;
use meshpress_codec::{
    Aabb, CompressedMesh, IndexBuffer, IndexFormat, PackedAttributes, PackedPosition, SubMesh,
};
use std::io::Write;

pub const MESH_MAGIC: [u8; 4] = *b"MPQT";
pub const MESH_VERSION: u16 = 1;

/// Bytes per submesh table entry
pub const SUBMESH_SIZE: usize = 20;

/// Container header (48 bytes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHeader {
    pub version: u16,
    pub index_format: IndexFormat,
    pub vertex_count: u32,
    pub index_count: u32,
    pub submesh_count: u32,
    pub name_len: u32,
    pub bounds: Aabb,
}

fn index_format_to_u8(format: IndexFormat) -> u8 {
    match format {
        IndexFormat::U16 => 0,
        IndexFormat::U32 => 1,
    }
}

fn index_format_from_u8(value: u8) -> Option<IndexFormat> {
    match value {
        0 => Some(IndexFormat::U16),
        1 => Some(IndexFormat::U32),
        _ => None,
    }
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn f32_at(bytes: &[u8], offset: usize) -> f32 {
    f32::from_bits(u32_at(bytes, offset))
}

fn vec3_at(bytes: &[u8], offset: usize) -> Vec3 {
    Vec3::new(
        f32_at(bytes, offset),
        f32_at(bytes, offset + 4),
        f32_at(bytes, offset + 8),
    )
}

impl MeshHeader {
    pub const SIZE: usize = 48;

    pub fn for_mesh(mesh: &CompressedMesh) -> Result<Self> {
        Ok(Self {
            version: MESH_VERSION,
            index_format: mesh.indices.format(),
            vertex_count: u32::try_from(mesh.vertex_count()).context("Too many vertices")?,
            index_count: u32::try_from(mesh.indices.len()).context("Too many indices")?,
            submesh_count: u32::try_from(mesh.submeshes.len()).context("Too many submeshes")?,
            name_len: u32::try_from(mesh.name.len()).context("Mesh name too long")?,
            bounds: mesh.bounds,
        })
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&MESH_MAGIC);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6] = index_format_to_u8(self.index_format);
        bytes[8..12].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.index_count.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.submesh_count.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.name_len.to_le_bytes());
        let bounds = self.bounds.min.to_array().into_iter().chain(self.bounds.max.to_array());
        for (i, value) in bounds.enumerate() {
            let offset = 24 + i * 4;
            bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ensure!(bytes.len() >= Self::SIZE, "Truncated header ({} bytes)", bytes.len());
        ensure!(bytes[0..4] == MESH_MAGIC, "Not a MeshPress mesh (bad magic)");

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        ensure!(version == MESH_VERSION, "Unsupported mesh version {version}");

        let index_format = index_format_from_u8(bytes[6])
            .with_context(|| format!("Unknown index format {}", bytes[6]))?;

        Ok(Self {
            version,
            index_format,
            vertex_count: u32_at(bytes, 8),
            index_count: u32_at(bytes, 12),
            submesh_count: u32_at(bytes, 16),
            name_len: u32_at(bytes, 20),
            bounds: Aabb {
                min: vec3_at(bytes, 24),
                max: vec3_at(bytes, 36),
            },
        })
    }

    /// Size of everything after the header
    pub fn body_len(&self) -> usize {
        let vertices = self.vertex_count as usize;
        self.name_len as usize
            + vertices * (PackedPosition::STRIDE + PackedAttributes::STRIDE)
            + self.index_count as usize * self.index_format.size()
            + self.submesh_count as usize * SUBMESH_SIZE
    }
}

/// Write a complete compressed mesh
pub fn write_mesh<W: Write>(w: &mut W, mesh: &CompressedMesh) -> Result<()> {
    let header = MeshHeader::for_mesh(mesh)?;
    w.write_all(&header.to_bytes())?;
    w.write_all(mesh.name.as_bytes())?;

    w.write_all(mesh.position_bytes())?;
    w.write_all(mesh.attribute_bytes())?;
    w.write_all(mesh.indices.as_bytes())?;

    for submesh in &mesh.submeshes {
        for value in [
            submesh.index_start,
            submesh.index_count,
            submesh.base_vertex,
            submesh.first_vertex,
            submesh.vertex_count,
        ] {
            w.write_all(&value.to_le_bytes())?;
        }
    }

    Ok(())
}

/// Read a complete compressed mesh
pub fn read_mesh(bytes: &[u8]) -> Result<CompressedMesh> {
    let header = MeshHeader::from_bytes(bytes)?;
    let body = &bytes[MeshHeader::SIZE..];
    if body.len() < header.body_len() {
        bail!(
            "Truncated mesh: expected {} bytes after header, found {}",
            header.body_len(),
            body.len()
        );
    }

    let vertex_count = header.vertex_count as usize;
    let (name, body) = body.split_at(header.name_len as usize);
    let name = String::from_utf8(name.to_vec()).context("Mesh name is not UTF-8")?;

    let (stream_a, body) = body.split_at(vertex_count * PackedPosition::STRIDE);
    let positions = bytemuck::pod_collect_to_vec::<u8, PackedPosition>(stream_a);

    let (stream_b, body) = body.split_at(vertex_count * PackedAttributes::STRIDE);
    let attributes = bytemuck::pod_collect_to_vec::<u8, PackedAttributes>(stream_b);

    let index_bytes = header.index_count as usize * header.index_format.size();
    let (index_data, body) = body.split_at(index_bytes);
    let indices = match header.index_format {
        IndexFormat::U16 => IndexBuffer::U16(bytemuck::pod_collect_to_vec(index_data)),
        IndexFormat::U32 => IndexBuffer::U32(bytemuck::pod_collect_to_vec(index_data)),
    };

    let submeshes = body
        .chunks_exact(SUBMESH_SIZE)
        .take(header.submesh_count as usize)
        .map(|c| SubMesh {
            index_start: u32_at(c, 0),
            index_count: u32_at(c, 4),
            base_vertex: u32_at(c, 8),
            first_vertex: u32_at(c, 12),
            vertex_count: u32_at(c, 16),
        })
        .collect();

    Ok(CompressedMesh {
        name,
        positions,
        attributes,
        indices,
        submeshes,
        bounds: header.bounds,
    })
}
