//! WebGPU rendering module
//!
//! Flat-shaded boxes with a depth buffer. Course geometry is uploaded once;
//! the vehicle is rebuilt every frame from its rig.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
