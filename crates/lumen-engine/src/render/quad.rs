use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Clip-space vertex of the full-screen quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 3],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Strip order: BL, BR, TL, TR.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-1.0, -1.0, 0.0] },
    QuadVertex { pos: [1.0, -1.0, 0.0] },
    QuadVertex { pos: [-1.0, 1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0, 0.0] },
];

pub const QUAD_TOPOLOGY: wgpu::PrimitiveTopology = wgpu::PrimitiveTopology::TriangleStrip;

/// GPU-resident quad covering the whole viewport.
///
/// The vertex buffer is released when the mesh is dropped.
pub struct QuadMesh {
    vbo: wgpu::Buffer,
}

impl QuadMesh {
    pub fn new(device: &wgpu::Device) -> Self {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self { vbo }
    }

    pub fn vertex_count(&self) -> u32 {
        QUAD_VERTICES.len() as u32
    }

    /// Binds the vertex buffer to slot 0 and draws the strip.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vbo.slice(..));
        rpass.draw(0..self.vertex_count(), 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_covers_clip_space() {
        let xs: Vec<f32> = QUAD_VERTICES.iter().map(|v| v.pos[0]).collect();
        let ys: Vec<f32> = QUAD_VERTICES.iter().map(|v| v.pos[1]).collect();
        assert_eq!(xs, [-1.0, 1.0, -1.0, 1.0]);
        assert_eq!(ys, [-1.0, -1.0, 1.0, 1.0]);
        assert!(QUAD_VERTICES.iter().all(|v| v.pos[2] == 0.0));
    }

    #[test]
    fn strip_triangles_share_the_diagonal() {
        // Triangles (0,1,2) and (1,2,3) both contain BR and TL.
        let t0 = [QUAD_VERTICES[0], QUAD_VERTICES[1], QUAD_VERTICES[2]];
        let t1 = [QUAD_VERTICES[1], QUAD_VERTICES[2], QUAD_VERTICES[3]];
        for shared in [QUAD_VERTICES[1], QUAD_VERTICES[2]] {
            assert!(t0.contains(&shared) && t1.contains(&shared));
        }
    }

    #[test]
    fn layout_is_tightly_packed_vec3() {
        let l = QuadVertex::layout();
        assert_eq!(l.array_stride, 12);
        assert_eq!(l.attributes.len(), 1);
        assert_eq!(l.attributes[0].shader_location, 0);
        assert_eq!(l.attributes[0].offset, 0);
        assert_eq!(l.attributes[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(std::mem::size_of_val(&QUAD_VERTICES), 48);
    }
}
