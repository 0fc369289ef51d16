//! Vertex types for 3D rendering

use bytemuck::{Pod, Zeroable};

/// Flat-shaded vertex with position, normal and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: (std::mem::size_of::<[f32; 3]>() * 2) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for course and vehicle elements
pub mod colors {
    /// 0xRRGGBB to RGBA
    pub const fn hex(rgb: u32) -> [f32; 4] {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    pub const SKY: [f32; 4] = hex(0xbdd7ff);
    pub const GROUND: [f32; 4] = hex(0x24364a);
    pub const WALL: [f32; 4] = hex(0x333333);
    pub const RAMP: [f32; 4] = hex(0x355a6a);
    pub const LINE: [f32; 4] = hex(0xffffff);
    pub const ACCEL_LINE: [f32; 4] = hex(0xf2c14e);
    pub const EMERGENCY_ZONE: [f32; 4] = hex(0x8a3b3b);
    pub const EMERGENCY_ACTIVE: [f32; 4] = hex(0xff3030);
    pub const JUNCTION_EXIT: [f32; 4] = hex(0x2f8f5b);
    pub const BODY: [f32; 4] = hex(0x2dd36f);
    pub const WHEEL: [f32; 4] = hex(0x111111);
}
