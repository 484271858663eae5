pub mod character;
pub mod model;

pub use character::CharacterNode;
pub use model::{load_character_model, Aabb, CharacterModel};
