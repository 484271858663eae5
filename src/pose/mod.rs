pub mod detection;
#[cfg(feature = "desktop")]
pub mod detector;
pub mod landmark;
#[cfg(feature = "desktop")]
pub mod preprocess;
pub mod smooth;

pub use detection::Detection;
#[cfg(feature = "desktop")]
pub use detector::OnnxLandmarkDetector;
pub use landmark::{Landmark, LandmarkIndex, LandmarkSet};
#[cfg(feature = "desktop")]
pub use preprocess::{preprocess_frame, LANDMARK_INPUT_SIZE};
pub use smooth::LandmarkSmoother;
