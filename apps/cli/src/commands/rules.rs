use anyhow::{Result, Context};
use serde_json::Value;
use tracing::info;

use topdrawer_matcher::ClassificationEngine;
use topdrawer_types::{
    decode_all_reporting, DictionaryRepresentable, FileCondition, FolderContentsMatcher,
    HierarchyPredicate, StringPattern,
};
use crate::config_manager::{CliRule, ConfigManager};
use crate::error::CliError;
use crate::{AddRuleArgs, RulesAction};

pub fn rules_command(action: RulesAction, config_manager: &ConfigManager) -> Result<()> {
    match action {
        RulesAction::List { profile } => list_rules(profile, config_manager),
        RulesAction::Check { profile } => check_rules(profile, config_manager),
        RulesAction::Add(args) => add_rule(args, config_manager),
    }
}

fn list_rules(profile: Option<String>, config_manager: &ConfigManager) -> Result<()> {
    let config = config_manager.load_config(profile.as_deref())?;
    let rules = config_manager.load_rules(&config);

    println!("📝 Rules ({}):", rules.len());
    if rules.is_empty() {
        println!("  (no rules configured)");
    }
    for (i, rule) in rules.iter().enumerate() {
        print_rule(i + 1, rule);
    }

    Ok(())
}

pub fn print_rule(number: usize, rule: &CliRule) {
    let enabled_marker = if rule.enabled { "✅" } else { "❌" };
    println!("  {}. {} {}", number, enabled_marker, rule.display_name());
    for condition in &rule.conditions {
        println!("     - {}", describe_condition(condition));
    }
    println!("     → {}", rule.payload);
}

fn check_rules(profile: Option<String>, config_manager: &ConfigManager) -> Result<()> {
    let config = config_manager.load_config(profile.as_deref())?;
    info!("Checking {} rule dictionaries", config.rules.len());

    let (rules, skipped) = decode_all_reporting::<CliRule>(&config.rules);

    println!("🔍 Decoded {} of {} rules", rules.len(), config.rules.len());
    for (index, error) in &skipped {
        println!("  ⚠️  #{} skipped: {}", index, error);
    }

    let engine = ClassificationEngine::new(rules, config.options.key_normalization.clone())
        .map_err(CliError::from)?;
    let stats = engine.stats();

    println!(
        "✅ Indexed {} rules into {} buckets ({} with folder conditions, {} checked for every file)",
        stats.rules, stats.buckets, stats.context_dependent_rules, stats.unkeyed_rules
    );

    Ok(())
}

fn add_rule(args: AddRuleArgs, config_manager: &ConfigManager) -> Result<()> {
    let profile = args.profile.clone().unwrap_or_else(|| "default".to_string());
    let mut config = config_manager.load_config(Some(&profile))?;

    let payload: Value = serde_json::from_str(&args.payload)
        .map_err(|e| CliError::invalid_args(format!("payload is not valid JSON: {}", e)))?;

    let conditions = conditions_from_args(&args);
    if conditions.is_empty() {
        return Err(CliError::invalid_args("a rule needs at least one condition").into());
    }

    let mut rule = CliRule::new(conditions, payload);
    if let Some(label) = args.label {
        rule = rule.with_label(label);
    }

    config.rules.push(Value::Object(rule.to_dictionary()));
    config_manager
        .save_config(&profile, &config)
        .with_context(|| format!("Failed to save profile '{}'", profile))?;

    println!("✅ Added rule to profile '{}':", profile);
    print_rule(config.rules.len(), &rule);

    Ok(())
}

fn conditions_from_args(args: &AddRuleArgs) -> Vec<FileCondition> {
    let mut conditions = Vec::new();

    if let Some(name) = &args.name {
        conditions.push(FileCondition::Name(StringPattern::matching(name.as_str())));
    }
    if let Some(ext) = &args.ext {
        conditions.push(FileCondition::Ext(StringPattern::matching(ext.as_str())));
    }
    if let Some(full_name) = &args.full_name {
        conditions.push(FileCondition::FullName(StringPattern::matching(full_name.as_str())));
    }
    if let Some(folder) = &args.in_folder {
        conditions.push(FileCondition::HierarchyContains(HierarchyPredicate::folder_with_name(
            StringPattern::matching(folder.as_str()),
        )));
    }
    if let Some(ext) = &args.parent_has_ext {
        conditions.push(FileCondition::ParentContains(FolderContentsMatcher::files_with_extension(
            ext.as_str(),
        )));
    }
    if let Some(ext) = &args.parent_lacks_ext {
        conditions.push(FileCondition::ParentDoesntContain(
            FolderContentsMatcher::files_with_extension(ext.as_str()),
        ));
    }
    if let Some(folder) = &args.parent_has_folder {
        conditions.push(FileCondition::ParentContains(FolderContentsMatcher::folders_with_name(
            folder.as_str(),
        )));
    }

    conditions
}

pub fn describe_condition(condition: &FileCondition) -> String {
    match condition {
        FileCondition::Name(pattern) => format!("name {}", describe_pattern(pattern)),
        FileCondition::Ext(pattern) => format!("extension {}", describe_pattern(pattern)),
        FileCondition::FullName(pattern) => format!("full name {}", describe_pattern(pattern)),
        FileCondition::HierarchyContains(HierarchyPredicate::FolderWithName(pattern)) => {
            format!("inside a folder named {}", describe_pattern(pattern))
        }
        FileCondition::ParentContains(matcher) => format!("folder contains {}", describe_matcher(matcher)),
        FileCondition::ParentDoesntContain(matcher) => {
            format!("folder doesn't contain {}", describe_matcher(matcher))
        }
    }
}

fn describe_pattern(pattern: &StringPattern) -> String {
    match pattern {
        StringPattern::Matching(value) => format!("is \"{}\"", value),
    }
}

fn describe_matcher(matcher: &FolderContentsMatcher) -> String {
    match matcher {
        FolderContentsMatcher::FilesWithExtension(ext) => format!("files with extension \"{}\"", ext),
        FolderContentsMatcher::FilesWithNameAndExtension { name, ext } => {
            format!("a file named \"{}.{}\"", name, ext)
        }
        FolderContentsMatcher::FoldersWithName(name) => format!("a folder named \"{}\"", name),
    }
}
