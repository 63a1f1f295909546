// src/test_util.rs
//! In-memory map builder for unit tests.

use crate::lump::{LumpKind, BSP_VERSION, HEADER_SIZE, LUMP_COUNT};

fn push_f32(data: &mut Vec<u8>, value: f32) {
    data.extend_from_slice(&value.to_le_bytes());
}

fn push_i32(data: &mut Vec<u8>, value: i32) {
    data.extend_from_slice(&value.to_le_bytes());
}

fn push_i16(data: &mut Vec<u8>, value: i16) {
    data.extend_from_slice(&value.to_le_bytes());
}

fn push_u16(data: &mut Vec<u8>, value: u16) {
    data.extend_from_slice(&value.to_le_bytes());
}

/// Builds a texture lump holding non-embedded mip-texture headers.
pub fn miptex_lump(textures: &[(&str, u32, u32)]) -> Vec<u8> {
    let mut lump = Vec::new();
    push_i32(&mut lump, textures.len() as i32);
    let table_end = 4 + textures.len() * 4;
    for i in 0..textures.len() {
        push_i32(&mut lump, (table_end + i * 40) as i32);
    }
    for (name, width, height) in textures {
        let mut raw = [0u8; 16];
        for (slot, b) in raw.iter_mut().zip(name.bytes()) {
            *slot = b;
        }
        lump.extend_from_slice(&raw);
        lump.extend_from_slice(&width.to_le_bytes());
        lump.extend_from_slice(&height.to_le_bytes());
        lump.extend_from_slice(&[0u8; 16]);
    }
    lump
}

/// Accumulates lump payloads and lays them out behind a valid header.
pub struct BspBuilder {
    lumps: Vec<Vec<u8>>,
}

impl BspBuilder {
    pub fn new() -> Self {
        BspBuilder {
            lumps: vec![Vec::new(); LUMP_COUNT],
        }
    }

    fn lump(&mut self, kind: LumpKind) -> &mut Vec<u8> {
        &mut self.lumps[kind.index()]
    }

    pub fn raw_lump(mut self, kind: LumpKind, bytes: Vec<u8>) -> Self {
        *self.lump(kind) = bytes;
        self
    }

    pub fn entities(self, text: &str) -> Self {
        self.raw_lump(LumpKind::Entities, text.as_bytes().to_vec())
    }

    pub fn textures(self, textures: &[(&str, u32, u32)]) -> Self {
        self.raw_lump(LumpKind::Textures, miptex_lump(textures))
    }

    pub fn plane(mut self, normal: [f32; 3], distance: f32) -> Self {
        let lump = self.lump(LumpKind::Planes);
        for v in normal {
            push_f32(lump, v);
        }
        push_f32(lump, distance);
        push_i32(lump, 0);
        self
    }

    pub fn vertex(mut self, position: [f32; 3]) -> Self {
        let lump = self.lump(LumpKind::Vertices);
        for v in position {
            push_f32(lump, v);
        }
        self
    }

    pub fn edge(mut self, a: u16, b: u16) -> Self {
        let lump = self.lump(LumpKind::Edges);
        push_u16(lump, a);
        push_u16(lump, b);
        self
    }

    pub fn surf_edge(mut self, value: i32) -> Self {
        push_i32(self.lump(LumpKind::SurfEdges), value);
        self
    }

    pub fn texinfo(mut self, s: [f32; 4], t: [f32; 4], miptex: i32, flags: i32) -> Self {
        let lump = self.lump(LumpKind::TexInfo);
        for v in s.iter().chain(t.iter()) {
            push_f32(lump, *v);
        }
        push_i32(lump, miptex);
        push_i32(lump, flags);
        self
    }

    pub fn face(
        mut self,
        plane: u16,
        side: u16,
        first_edge: i32,
        edge_count: u16,
        texinfo: u16,
        light_offset: i32,
    ) -> Self {
        let lump = self.lump(LumpKind::Faces);
        push_u16(lump, plane);
        push_u16(lump, side);
        push_i32(lump, first_edge);
        push_u16(lump, edge_count);
        push_u16(lump, texinfo);
        lump.extend_from_slice(&[0, 255, 255, 255]);
        push_i32(lump, light_offset);
        self
    }

    pub fn lighting(self, bytes: Vec<u8>) -> Self {
        self.raw_lump(LumpKind::Lighting, bytes)
    }

    pub fn visibility(self, bytes: Vec<u8>) -> Self {
        self.raw_lump(LumpKind::Visibility, bytes)
    }

    pub fn clip_node(mut self, plane: i32, children: [i16; 2]) -> Self {
        let lump = self.lump(LumpKind::ClipNodes);
        push_i32(lump, plane);
        push_i16(lump, children[0]);
        push_i16(lump, children[1]);
        self
    }

    pub fn node(mut self, plane: i32, children: [i16; 2]) -> Self {
        let lump = self.lump(LumpKind::Nodes);
        push_i32(lump, plane);
        push_i16(lump, children[0]);
        push_i16(lump, children[1]);
        for _ in 0..6 {
            push_i16(lump, 0);
        }
        push_u16(lump, 0);
        push_u16(lump, 0);
        self
    }

    pub fn leaf(self, contents: i32, vis_offset: i32) -> Self {
        self.leaf_with_marks(contents, vis_offset, 0, 0)
    }

    pub fn leaf_with_marks(
        mut self,
        contents: i32,
        vis_offset: i32,
        first_mark_surface: u16,
        mark_surface_count: u16,
    ) -> Self {
        let lump = self.lump(LumpKind::Leaves);
        push_i32(lump, contents);
        push_i32(lump, vis_offset);
        for _ in 0..6 {
            push_i16(lump, 0);
        }
        push_u16(lump, first_mark_surface);
        push_u16(lump, mark_surface_count);
        lump.extend_from_slice(&[0u8; 4]);
        self
    }

    pub fn mark_surface(mut self, face: u16) -> Self {
        push_u16(self.lump(LumpKind::MarkSurfaces), face);
        self
    }

    pub fn model(
        mut self,
        origin: [f32; 3],
        head_nodes: [i32; 4],
        vis_leaves: i32,
        first_face: i32,
        face_count: i32,
    ) -> Self {
        let lump = self.lump(LumpKind::Models);
        for v in [-4096.0f32, -4096.0, -4096.0, 4096.0, 4096.0, 4096.0] {
            push_f32(lump, v);
        }
        for v in origin {
            push_f32(lump, v);
        }
        for node in head_nodes {
            push_i32(lump, node);
        }
        push_i32(lump, vis_leaves);
        push_i32(lump, first_face);
        push_i32(lump, face_count);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut data = Vec::new();
        push_i32(&mut data, BSP_VERSION);

        let mut offset = HEADER_SIZE;
        for payload in &self.lumps {
            push_i32(&mut data, offset as i32);
            push_i32(&mut data, payload.len() as i32);
            offset += payload.len();
        }
        for payload in self.lumps {
            data.extend_from_slice(&payload);
        }
        data
    }
}

/// A 32x32 lit square on the z = 0 plane, textured with the world X/Y axes,
/// plus a sky face sharing the same winding. Lighting holds the 3x3 samples
/// of the lit face. The point hull is a single node: empty above the plane,
/// solid below.
pub fn square_room() -> BspBuilder {
    BspBuilder::new()
        .entities("{\"classname\" \"worldspawn\" \"wad\" \"\\half-life\\valve\\halflife.wad;decals.wad\"}")
        .textures(&[("floor", 64, 64), ("sky", 256, 256)])
        .plane([0.0, 0.0, 1.0], 0.0)
        .vertex([0.0, 0.0, 0.0])
        .vertex([32.0, 0.0, 0.0])
        .vertex([32.0, 32.0, 0.0])
        .vertex([0.0, 32.0, 0.0])
        // Edge 0 is the customary unused slot.
        .edge(0, 0)
        .edge(0, 1)
        .edge(1, 2)
        .edge(2, 3)
        .edge(3, 0)
        .surf_edge(1)
        .surf_edge(2)
        .surf_edge(3)
        .surf_edge(4)
        .texinfo([1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], 0, 0)
        .texinfo([1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], 1, 1)
        .face(0, 0, 0, 4, 0, 0)
        .face(0, 0, 0, 4, 1, -1)
        .lighting((0..27).collect())
        .node(0, [-2, -1])
        .leaf(-2, -1)
        .leaf(-1, -1)
        .model([0.0, 0.0, 0.0], [0, 0, 0, 0], 0, 0, 2)
}
