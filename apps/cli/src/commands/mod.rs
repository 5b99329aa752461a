pub mod classify;
pub mod rules;
pub mod config;

pub use classify::*;
pub use rules::*;
pub use config::*;
