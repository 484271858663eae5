pub mod overlay;
pub mod window;

pub use overlay::SKELETON_CONNECTIONS;
pub use window::PreviewWindow;
