//! Programmatic glTF generation for integration tests.
//!
//! Builds a single-mesh document whose primitives carry any subset of NORMAL,
//! TANGENT and TEXCOORD_0, with u16, u32 or no indices. The document is
//! emitted as GLB or as a `.gltf` + `.bin` pair.

mod glb_assembly;

use std::collections::BTreeMap;

use gltf_json as json;
use json::validation::Checked::Valid;

/// Index data of one primitive
#[derive(Clone)]
pub enum Indices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

/// Vertex data of one primitive
#[derive(Clone, Default)]
pub struct PrimitiveData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub tangents: Option<Vec<[f32; 4]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub indices: Option<Indices>,
}

/// Unit quad in the XY plane facing +Z, tangent +X
pub fn quad(offset: [f32; 3], handedness: f32) -> PrimitiveData {
    let [ox, oy, oz] = offset;
    PrimitiveData {
        positions: vec![
            [ox, oy, oz],
            [ox + 1.0, oy, oz],
            [ox + 1.0, oy + 1.0, oz],
            [ox, oy + 1.0, oz],
        ],
        normals: Some(vec![[0.0, 0.0, 1.0]; 4]),
        tangents: Some(vec![[1.0, 0.0, 0.0, handedness]; 4]),
        uvs: Some(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
        indices: Some(Indices::U16(vec![0, 1, 2, 0, 2, 3])),
    }
}

/// Buffer, views and accessors accumulated while packing primitives
#[derive(Default)]
struct BinaryData {
    buffer: Vec<u8>,
    views: Vec<json::buffer::View>,
    accessors: Vec<json::Accessor>,
}

impl BinaryData {
    fn push_accessor(
        &mut self,
        bytes: &[u8],
        count: usize,
        component_type: json::accessor::ComponentType,
        type_: json::accessor::Type,
        target: json::buffer::Target,
        bounds: Option<([f32; 3], [f32; 3])>,
    ) -> json::Index<json::Accessor> {
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(bytes);
        while !self.buffer.len().is_multiple_of(4) {
            self.buffer.push(0);
        }

        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: bytes.len().into(),
            byte_offset: Some(offset.into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: Some(Valid(target)),
        });

        let (min, max) = match bounds {
            Some((min, max)) => (
                Some(json::Value::Array(min.into_iter().map(json::Value::from).collect())),
                Some(json::Value::Array(max.into_iter().map(json::Value::from).collect())),
            ),
            None => (None, None),
        };

        self.accessors.push(json::Accessor {
            buffer_view: Some(json::Index::new(self.views.len() as u32 - 1)),
            byte_offset: Some(0u64.into()),
            count: count.into(),
            component_type: Valid(json::accessor::GenericComponentType(component_type)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min,
            max,
            name: None,
            normalized: false,
            sparse: None,
        });
        json::Index::new(self.accessors.len() as u32 - 1)
    }

    fn push_floats<const N: usize>(
        &mut self,
        data: &[[f32; N]],
        type_: json::accessor::Type,
    ) -> json::Index<json::Accessor> {
        let flat: Vec<f32> = data.iter().flatten().copied().collect();
        self.push_accessor(
            bytemuck::cast_slice(&flat),
            data.len(),
            json::accessor::ComponentType::F32,
            type_,
            json::buffer::Target::ArrayBuffer,
            None,
        )
    }

    fn push_positions(&mut self, positions: &[[f32; 3]]) -> json::Index<json::Accessor> {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for p in positions {
            for a in 0..3 {
                min[a] = min[a].min(p[a]);
                max[a] = max[a].max(p[a]);
            }
        }
        self.push_accessor(
            bytemuck::cast_slice(positions),
            positions.len(),
            json::accessor::ComponentType::F32,
            json::accessor::Type::Vec3,
            json::buffer::Target::ArrayBuffer,
            Some((min, max)),
        )
    }

    fn push_indices(&mut self, indices: &Indices) -> json::Index<json::Accessor> {
        let (bytes, count, component_type) = match indices {
            Indices::U16(data) => (
                bytemuck::cast_slice::<u16, u8>(data),
                data.len(),
                json::accessor::ComponentType::U16,
            ),
            Indices::U32(data) => (
                bytemuck::cast_slice::<u32, u8>(data),
                data.len(),
                json::accessor::ComponentType::U32,
            ),
        };
        self.push_accessor(
            bytes,
            count,
            component_type,
            json::accessor::Type::Scalar,
            json::buffer::Target::ElementArrayBuffer,
            None,
        )
    }
}

/// Build the glTF document and its binary buffer
fn build_document(mesh_name: &str, primitives: &[PrimitiveData]) -> (json::Root, Vec<u8>) {
    let mut data = BinaryData::default();

    let mut mesh_primitives = Vec::with_capacity(primitives.len());
    for primitive in primitives {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            Valid(json::mesh::Semantic::Positions),
            data.push_positions(&primitive.positions),
        );
        if let Some(normals) = &primitive.normals {
            attributes.insert(
                Valid(json::mesh::Semantic::Normals),
                data.push_floats(normals, json::accessor::Type::Vec3),
            );
        }
        if let Some(tangents) = &primitive.tangents {
            attributes.insert(
                Valid(json::mesh::Semantic::Tangents),
                data.push_floats(tangents, json::accessor::Type::Vec4),
            );
        }
        if let Some(uvs) = &primitive.uvs {
            attributes.insert(
                Valid(json::mesh::Semantic::TexCoords(0)),
                data.push_floats(uvs, json::accessor::Type::Vec2),
            );
        }
        let indices = primitive
            .indices
            .as_ref()
            .map(|indices| data.push_indices(indices));

        mesh_primitives.push(json::mesh::Primitive {
            attributes,
            extensions: Default::default(),
            extras: Default::default(),
            indices,
            material: None,
            mode: Valid(json::mesh::Mode::Triangles),
            targets: None,
        });
    }

    let meshes = vec![json::Mesh {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some(mesh_name.to_string()),
        primitives: mesh_primitives,
        weights: None,
    }];

    // Byte length is set on assembly
    let buffers = vec![json::Buffer {
        byte_length: 0u64.into(),
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        uri: None,
    }];

    let root = json::Root {
        accessors: data.accessors,
        animations: Vec::new(),
        asset: json::Asset {
            copyright: None,
            extensions: Default::default(),
            extras: Default::default(),
            generator: Some("meshpress-export-test".to_string()),
            min_version: None,
            version: "2.0".to_string(),
        },
        buffers,
        buffer_views: data.views,
        cameras: Vec::new(),
        extensions: Default::default(),
        extras: Default::default(),
        extensions_required: Vec::new(),
        extensions_used: Vec::new(),
        images: Vec::new(),
        materials: Vec::new(),
        meshes,
        nodes: Vec::new(),
        samplers: Vec::new(),
        scene: None,
        scenes: Vec::new(),
        skins: Vec::new(),
        textures: Vec::new(),
    };

    (root, data.buffer)
}

/// Generate a GLB containing one mesh named `mesh_name`
pub fn generate_glb(mesh_name: &str, primitives: &[PrimitiveData]) -> Vec<u8> {
    let (root, buffer) = build_document(mesh_name, primitives);
    glb_assembly::assemble_glb(&root, &buffer)
}

/// Generate a `.gltf` document referencing `bin_uri`, plus the `.bin` contents
pub fn generate_gltf(
    mesh_name: &str,
    primitives: &[PrimitiveData],
    bin_uri: &str,
) -> (String, Vec<u8>) {
    let (root, buffer) = build_document(mesh_name, primitives);
    let document = glb_assembly::assemble_gltf(&root, &buffer, bin_uri);
    (document, buffer)
}
