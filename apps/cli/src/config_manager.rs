use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Result, Context};
use serde_json::Value;
use tracing::{debug, info, warn};

use topdrawer_types::{decode_all_reporting, Config, Rule};

pub type CliRule = Rule<Value>;

pub struct ConfigManager {
    config_dir: PathBuf,
    default_config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_file: Option<PathBuf>) -> Result<Self> {
        let (config_dir, default_config_path) = if let Some(path) = config_file {
            let dir = path.parent()
                .ok_or_else(|| anyhow::anyhow!("Invalid config file path"))?
                .to_path_buf();
            (dir, path)
        } else {
            Self::default_config_paths()?
        };

        // Ensure config directory exists
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .context("Failed to create configuration directory")?;
            info!("Created configuration directory: {}", config_dir.display());
        }

        Ok(Self {
            config_dir,
            default_config_path,
        })
    }

    fn default_config_paths() -> Result<(PathBuf, PathBuf)> {
        use std::env;

        let config_dir = match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("topdrawer"),
            _ => {
                let home = env::var("HOME")
                    .or_else(|_| env::var("USERPROFILE"))
                    .context("Failed to determine home directory")?;
                PathBuf::from(home).join(".config").join("topdrawer")
            }
        };
        let default_config = config_dir.join("config.json");

        Ok((config_dir, default_config))
    }

    pub fn load_config(&self, profile: Option<&str>) -> Result<Config> {
        let config_path = match profile {
            Some(name) => self.get_profile_path(name),
            None => self.default_config_path.clone(),
        };

        debug!("Loading configuration from: {}", config_path.display());

        if !config_path.exists() {
            if let Some(name) = profile.filter(|p| *p != "default") {
                anyhow::bail!("Profile '{}' not found at: {}", name, config_path.display());
            }
            // Create default config if it doesn't exist
            let default_config = Config::default();
            self.save_config_to_path(&config_path, &default_config)?;
            info!("Created default configuration at: {}", config_path.display());
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    /// Decodes the rules of a profile. Entries that fail to decode are
    /// logged and left out.
    pub fn load_rules(&self, config: &Config) -> Vec<CliRule> {
        let (rules, skipped) = decode_all_reporting::<CliRule>(&config.rules);
        for (index, error) in &skipped {
            warn!("Skipping rule #{}: {}", index, error);
        }
        debug!("Decoded {} rules ({} skipped)", rules.len(), skipped.len());
        rules
    }

    pub fn save_config(&self, profile: &str, config: &Config) -> Result<()> {
        let config_path = self.get_profile_path(profile);
        self.save_config_to_path(&config_path, config)
    }

    fn save_config_to_path(&self, path: &Path, config: &Config) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let json = serde_json::to_string_pretty(config)
            .context("Failed to serialize configuration")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        debug!("Configuration saved to: {}", path.display());
        Ok(())
    }

    pub fn get_profile_path(&self, profile: &str) -> PathBuf {
        if profile == "default" {
            self.default_config_path.clone()
        } else {
            self.config_dir.join(format!("{}.json", profile))
        }
    }

    pub fn list_profiles(&self) -> Result<Vec<String>> {
        let mut profiles = Vec::new();

        // Always include default if it exists
        if self.default_config_path.exists() {
            profiles.push("default".to_string());
        }

        let default_stem = self.default_config_path.file_stem().and_then(|s| s.to_str());

        // Scan for other profile files
        if self.config_dir.exists() {
            let entries = fs::read_dir(&self.config_dir)
                .context("Failed to read configuration directory")?;

            for entry in entries {
                let entry = entry.context("Failed to read directory entry")?;
                let path = entry.path();

                if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        if Some(stem) != default_stem {
                            profiles.push(stem.to_string());
                        }
                    }
                }
            }
        }

        profiles.sort();
        Ok(profiles)
    }

    pub fn profile_exists(&self, profile: &str) -> Result<bool> {
        let path = self.get_profile_path(profile);
        Ok(path.exists())
    }

    pub fn delete_profile(&self, profile: &str) -> Result<()> {
        if profile == "default" {
            anyhow::bail!("Cannot delete default profile");
        }

        let path = self.get_profile_path(profile);

        if !path.exists() {
            anyhow::bail!("Profile '{}' does not exist", profile);
        }

        fs::remove_file(&path)
            .with_context(|| format!("Failed to delete profile file: {}", path.display()))?;

        info!("Deleted profile: {}", profile);
        Ok(())
    }

    pub fn get_config_dir(&self) -> &Path {
        &self.config_dir
    }
}
