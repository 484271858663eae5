pub mod idle;
pub mod transform;

pub use idle::IdleMotion;
pub use transform::{Placement, PlacementMapper};
