//! WebGPU rendering module
//!
//! A frame goes snapshot → [`DrawCmd`] list → triangle list → GPU. Only the
//! last step touches wgpu, so everything before it is testable headless.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, pixel_to_ndc};
pub use scene::{DrawCmd, Glyph, SceneOptions, build_scene};
pub use shapes::tessellate;
pub use vertex::Vertex;

use crate::sim::Snapshot;

/// Triangles for one frame of the game world
pub fn frame_vertices(snapshot: &Snapshot<'_>, opts: &SceneOptions) -> Vec<Vertex> {
    tessellate(&build_scene(snapshot, opts))
}

/// Compose, tessellate and present one frame
pub fn render_frame(
    render_state: &mut RenderState,
    snapshot: &Snapshot<'_>,
    opts: &SceneOptions,
) -> Result<(), wgpu::SurfaceError> {
    let vertices = frame_vertices(snapshot, opts);
    render_state.render(&vertices, snapshot.field)
}
