pub mod animate;
pub mod buffer;
pub mod carve;
pub mod color;
pub mod curve;
pub mod lattice;
pub mod math;
pub mod shaders;
pub mod sketches;
