pub mod scanner;
pub mod walker;

pub use scanner::*;
pub use walker::*;
