pub mod extent;
pub mod geometry;

pub use extent::Extent;
