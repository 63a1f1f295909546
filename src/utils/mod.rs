pub mod geometry;
pub mod util;

pub use geometry::{BoundingBox, Vec3};
