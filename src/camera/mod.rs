pub mod capture;

pub use capture::{Camera, ThreadedCamera};
