use thiserror::Error;
use std::path::PathBuf;

use topdrawer_types::{IndexBuildError, TopDrawerError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid command arguments: {message}")]
    InvalidArgs { message: String },

    #[error("Root directory problem: {path}: {message}")]
    Root { path: PathBuf, message: String },

    #[error("Rule set cannot be indexed: {0}")]
    RuleSet(#[from] IndexBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Core library error: {0}")]
    Core(#[from] TopDrawerError),
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_args<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgs {
            message: message.into(),
        }
    }

    pub fn root<S: Into<String>>(path: PathBuf, message: S) -> Self {
        Self::Root {
            path,
            message: message.into(),
        }
    }

    /// Get user-friendly error message for display
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => format!("⚙️ Configuration Error: {}", message),
            Self::InvalidArgs { message } => format!("❌ Invalid Arguments: {}", message),
            Self::Root { path, message } => format!("📁 Root Error ({}): {}", path.display(), message),
            Self::RuleSet(e) => format!("📝 Rule Error: {}", e),
            Self::Io(e) => format!("💾 File System Error: {}", e),
            Self::Json(e) => format!("📄 Data Format Error: {}", e),
            Self::Core(e) => format!("🔧 Internal Error: {}", e),
        }
    }

    /// Get error code for programmatic handling
    pub fn error_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 10,
            Self::InvalidArgs { .. } => 11,
            Self::Root { .. } => 12,
            Self::RuleSet(_) => 20,
            Self::Io(_) => 30,
            Self::Json(_) => 31,
            Self::Core(_) => 40,
        }
    }

    /// Get suggestions for resolving the error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config { .. } => vec![
                "Check your configuration file syntax".to_string(),
                "Use 'topdrawer config show <profile>' to inspect settings".to_string(),
            ],
            Self::InvalidArgs { .. } => vec![
                "Check command syntax with 'topdrawer --help'".to_string(),
            ],
            Self::Root { .. } => vec![
                "Ensure the directory exists and is readable".to_string(),
                "Pass roots explicitly or configure them in the profile".to_string(),
            ],
            Self::RuleSet(_) => vec![
                "Every rule needs at least one condition".to_string(),
                "Run 'topdrawer rules check' to see which rule is rejected".to_string(),
            ],
            Self::Io(_) => vec![
                "Check file permissions".to_string(),
                "Try with '--verbose' for detailed logging".to_string(),
            ],
            Self::Json(_) => vec![
                "Validate JSON file syntax".to_string(),
            ],
            Self::Core(_) => vec![
                "Try with '--verbose' for detailed logging".to_string(),
                "Report this issue if it persists".to_string(),
            ],
        }
    }
}

// Helper function to display error with suggestions
pub fn display_error_with_help(error: &CliError) {
    eprintln!("{}", error.user_message());

    let suggestions = error.suggestions();
    if !suggestions.is_empty() {
        eprintln!("\n💡 Suggestions:");
        for (i, suggestion) in suggestions.iter().enumerate() {
            eprintln!("  {}. {}", i + 1, suggestion);
        }
    }
}
