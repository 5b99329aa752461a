pub mod normalizer;
pub mod key;
pub mod tree;
pub mod engine;

pub use normalizer::*;
pub use key::*;
pub use tree::*;
pub use engine::*;
