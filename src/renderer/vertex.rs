//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
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
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// `0xRRGGBB` to RGBA
pub const fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xFF) as f32 / 255.0,
        ((rgb >> 8) & 0xFF) as f32 / 255.0,
        (rgb & 0xFF) as f32 / 255.0,
        alpha,
    ]
}

/// Same color with its alpha multiplied
pub fn faded(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Colors for game elements
pub mod colors {
    use super::hex;

    // === Scenery ===
    pub const SKY: [f32; 4] = hex(0x87CEEB, 1.0);
    pub const GRASS: [f32; 4] = hex(0x4CAF50, 1.0);
    pub const GROUND: [f32; 4] = hex(0x8D6E63, 1.0);
    pub const CLOUD: [f32; 4] = hex(0xFFFFFF, 0.6);

    // === Bus ===
    pub const BUS_BODY: [f32; 4] = hex(0xFFC107, 1.0);
    pub const BUS_STRIPE: [f32; 4] = hex(0x212121, 1.0);
    pub const WINDOW: [f32; 4] = hex(0xB3E5FC, 1.0);
    pub const TIRE: [f32; 4] = hex(0x263238, 1.0);
    pub const HUB: [f32; 4] = hex(0x9E9E9E, 1.0);
    pub const HEADLIGHT: [f32; 4] = hex(0xFFF59D, 1.0);

    // === Dino ===
    pub const DINO_BODY: [f32; 4] = hex(0x2E7D32, 1.0);
    pub const DINO_BELLY: [f32; 4] = hex(0x81C784, 1.0);
    pub const EYE: [f32; 4] = hex(0xFFFFFF, 1.0);
    pub const PUPIL: [f32; 4] = hex(0x000000, 1.0);
    pub const TOOTH: [f32; 4] = hex(0xFFFFFF, 1.0);
    pub const RAGE_RING: [f32; 4] = hex(0xFFA500, 1.0);
    pub const SPEED_LINE: [f32; 4] = hex(0xFFFFFF, 1.0);

    // === Obstacles ===
    pub const ROCK: [f32; 4] = hex(0x757575, 1.0);
    pub const ROCK_LIGHT: [f32; 4] = hex(0xBDBDBD, 1.0);
    pub const CONE: [f32; 4] = hex(0xFF6D00, 1.0);
    pub const CONE_STRIPE: [f32; 4] = hex(0xFFFFFF, 1.0);
    pub const CONE_BASE: [f32; 4] = hex(0x424242, 1.0);
    pub const SKIN: [f32; 4] = hex(0xFFCC80, 1.0);
    pub const SHIRT: [f32; 4] = hex(0x1E88E5, 1.0);
    pub const TROUSERS: [f32; 4] = hex(0x37474F, 1.0);

    // === Gem ===
    pub const GEM: [f32; 4] = hex(0x00BCD4, 1.0);
    pub const GEM_LIGHT: [f32; 4] = hex(0x80DEEA, 1.0);
    pub const GEM_GLINT: [f32; 4] = hex(0xFFFFFF, 0.9);

    // === Sparks ===
    pub const SPARK_CRASH: [f32; 4] = hex(0xFFA500, 1.0);
    pub const SPARK_SMASH: [f32; 4] = hex(0x888888, 1.0);
    pub const SPARK_HONK: [f32; 4] = hex(0xFFFFFF, 1.0);
    pub const SPARK_EAT: [f32; 4] = hex(0xFF0000, 1.0);
    pub const SPARK_GEM: [f32; 4] = hex(0x00FFFF, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_channels() {
        assert_eq!(hex(0xFF0000, 1.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex(0x00FF00, 0.5), [0.0, 1.0, 0.0, 0.5]);
        let sky = colors::SKY;
        assert!((sky[0] - 135.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::desc().array_stride, 24);
    }
}
