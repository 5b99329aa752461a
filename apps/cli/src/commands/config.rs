use anyhow::{Result, Context};
use tracing::info;

use topdrawer_types::Config;
use crate::commands::rules::print_rule;
use crate::{ConfigAction, config_manager::ConfigManager};

pub fn config_command(
    action: ConfigAction,
    config_manager: &ConfigManager,
) -> Result<()> {
    match action {
        ConfigAction::List => list_profiles(config_manager),
        ConfigAction::Show { profile } => show_profile(profile, config_manager),
        ConfigAction::Create { profile, from } => create_profile(profile, from, config_manager),
        ConfigAction::Delete { profile } => delete_profile(profile, config_manager),
    }
}

fn list_profiles(config_manager: &ConfigManager) -> Result<()> {
    info!("Listing available profiles");

    let profiles = config_manager.list_profiles()
        .context("Failed to list profiles")?;

    if profiles.is_empty() {
        println!("No configuration profiles found in {}.", config_manager.get_config_dir().display());
        println!("Create a new profile with: topdrawer config create <name>");
        return Ok(());
    }

    println!("📋 Available Configuration Profiles:");
    for (i, profile) in profiles.iter().enumerate() {
        let marker = if profile == "default" { " (default)" } else { "" };
        println!("  {}. {}{}", i + 1, profile, marker);
    }

    println!("\nUse 'topdrawer config show <profile>' to view profile details.");

    Ok(())
}

fn show_profile(profile_name: String, config_manager: &ConfigManager) -> Result<()> {
    info!("Showing profile: {}", profile_name);

    let config = config_manager.load_config(Some(&profile_name))
        .with_context(|| format!("Failed to load profile '{}'", profile_name))?;

    println!("📄 Profile: {}", profile_name);
    println!("{}", "=".repeat(50));

    println!("\n📁 Roots ({}):", config.roots.len());
    if config.roots.is_empty() {
        println!("  (none configured)");
    } else {
        for (i, root) in config.roots.iter().enumerate() {
            println!("  {}. {}", i + 1, root.display());
        }
    }

    let rules = config_manager.load_rules(&config);
    println!("\n📝 Rules ({} of {} readable):", rules.len(), config.rules.len());
    if rules.is_empty() {
        println!("  (no rules configured)");
    }
    for (i, rule) in rules.iter().enumerate() {
        print_rule(i + 1, rule);
    }

    println!("\n⚙️ Scan Options:");
    println!("  Follow links: {}",
             if config.options.follow_links { "Yes" } else { "No" });
    println!("  Hidden files: {}",
             if config.options.include_hidden { "Included" } else { "Skipped" });
    println!("  Max depth: {}",
             config.options.max_depth.map(|d| d.to_string()).unwrap_or("Unlimited".to_string()));
    if !config.options.excluded_names.is_empty() {
        println!("  Excluded folders: {}", config.options.excluded_names.join(", "));
    }

    println!("\n🔤 Key Normalization:");
    println!("  Unicode normalization: {}",
             if config.options.key_normalization.normalize_unicode { "Enabled" } else { "Disabled" });
    println!("  Case normalization: {}",
             if config.options.key_normalization.normalize_case { "Enabled" } else { "Disabled" });

    Ok(())
}

fn create_profile(
    profile_name: String,
    from_profile: Option<String>,
    config_manager: &ConfigManager,
) -> Result<()> {
    info!("Creating profile: {}", profile_name);

    if config_manager.profile_exists(&profile_name)? {
        anyhow::bail!("Profile '{}' already exists", profile_name);
    }

    let base_config = if let Some(from) = from_profile {
        println!("📋 Copying from profile: {}", from);
        config_manager.load_config(Some(&from))
            .with_context(|| format!("Failed to load base profile '{}'", from))?
    } else {
        println!("📋 Creating new profile with default settings");
        Config::default()
    };

    config_manager.save_config(&profile_name, &base_config)
        .with_context(|| format!("Failed to save profile '{}'", profile_name))?;

    println!("✅ Profile '{}' created successfully", profile_name);
    println!("  {}", config_manager.get_profile_path(&profile_name).display());

    Ok(())
}

fn delete_profile(profile_name: String, config_manager: &ConfigManager) -> Result<()> {
    info!("Deleting profile: {}", profile_name);

    if profile_name == "default" {
        anyhow::bail!("Cannot delete the default profile");
    }

    if !config_manager.profile_exists(&profile_name)? {
        anyhow::bail!("Profile '{}' does not exist", profile_name);
    }

    print!("⚠️  Delete profile '{}'? This cannot be undone. (y/N): ", profile_name);
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    if input != "y" && input != "yes" {
        println!("Deletion cancelled.");
        return Ok(());
    }

    config_manager.delete_profile(&profile_name)
        .with_context(|| format!("Failed to delete profile '{}'", profile_name))?;

    println!("✅ Profile '{}' deleted successfully", profile_name);

    Ok(())
}
