pub mod error;
pub mod dictionary;
pub mod pattern;
pub mod entry;
pub mod hierarchy;
pub mod folder_matcher;
pub mod condition;
pub mod rule;
pub mod config;

pub use error::*;
pub use dictionary::*;
pub use pattern::*;
pub use entry::*;
pub use hierarchy::*;
pub use folder_matcher::*;
pub use condition::*;
pub use rule::*;
pub use config::*;
