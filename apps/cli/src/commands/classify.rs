use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::{Result, Context};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, debug};

use topdrawer_matcher::ClassificationEngine;
use topdrawer_scanner::{summarize, ClassificationSummary, ClassifiedFile, DirectoryWalker, TreeClassifier};
use crate::config_manager::ConfigManager;
use crate::error::CliError;
use crate::progress::ProgressReporter;

#[derive(Debug, Serialize)]
pub struct ClassificationReport {
    pub generated_at: String,
    pub roots: Vec<RootReport>,
}

#[derive(Debug, Serialize)]
pub struct RootReport {
    pub root: PathBuf,
    pub summary: ClassificationSummary,
    pub files: Vec<FileReport>,
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    pub rules: Vec<MatchedRule>,
}

#[derive(Debug, Serialize)]
pub struct MatchedRule {
    pub id: String,
    pub label: Option<String>,
    pub payload: Value,
}

pub fn classify_command(
    roots: Vec<PathBuf>,
    output_file: Option<PathBuf>,
    profile: Option<String>,
    include_unmatched: bool,
    config_manager: &ConfigManager,
) -> Result<()> {
    info!("Starting classification");

    let config = config_manager.load_config(profile.as_deref())?;

    // Use provided roots or fall back to config
    let roots = if roots.is_empty() {
        if config.roots.is_empty() {
            return Err(CliError::config(
                "No root directories specified. Pass roots or configure them in the profile.",
            )
            .into());
        }
        config.roots.clone()
    } else {
        roots
    };

    for root in &roots {
        if !root.is_dir() {
            return Err(CliError::root(root.clone(), "not an existing directory").into());
        }
    }

    let rules = config_manager.load_rules(&config);
    let engine = ClassificationEngine::new(rules, config.options.key_normalization.clone())
        .map_err(CliError::from)?;
    let classifier = TreeClassifier::new(Arc::new(engine));
    let walker = DirectoryWalker::new(config.options.clone());

    let mut report = ClassificationReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        roots: Vec::with_capacity(roots.len()),
    };

    for root in &roots {
        let root_report = classify_root(root, &walker, &classifier, include_unmatched)?;
        print_root_report(&root_report);
        report.roots.push(root_report);
    }

    if let Some(output_path) = output_file {
        save_report(&report, &output_path)
            .context("Failed to save classification report")?;
        info!("Classification report saved to: {}", output_path.display());
    }

    Ok(())
}

fn classify_root(
    root: &Path,
    walker: &DirectoryWalker,
    classifier: &TreeClassifier<Value>,
    include_unmatched: bool,
) -> Result<RootReport> {
    let progress = ProgressReporter::new_spinner("classification");
    progress.set_message(format!("Reading {}", root.display()));

    let folder = walker.walk(root)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to read {}", root.display()))?;

    progress.set_message(format!("Classifying {} files", folder.file_count()));
    let results = classifier.classify(&folder);
    let summary = summarize(&results);
    progress.finish_with_message("Classification completed");

    debug!("{}: {:?}", root.display(), summary);

    let files = results
        .iter()
        .filter(|r| include_unmatched || r.is_matched())
        .map(file_report)
        .collect();

    Ok(RootReport {
        root: root.to_path_buf(),
        summary,
        files,
    })
}

fn file_report(result: &ClassifiedFile<'_, Value>) -> FileReport {
    FileReport {
        path: result.file.path.clone(),
        rules: result
            .matches
            .iter()
            .map(|rule| MatchedRule {
                id: rule.id.to_string(),
                label: rule.label.clone(),
                payload: rule.payload.clone(),
            })
            .collect(),
    }
}

fn print_root_report(report: &RootReport) {
    println!("\n=== {} ===", report.root.display());
    println!(
        "Files: {}, matched: {}, rule hits: {}",
        report.summary.files, report.summary.matched_files, report.summary.rule_hits
    );

    for file in &report.files {
        if file.rules.is_empty() {
            println!("  {} (no match)", file.path);
            continue;
        }
        let names: Vec<String> = file
            .rules
            .iter()
            .map(|r| r.label.clone().unwrap_or_else(|| r.id.clone()))
            .collect();
        println!("  {} -> {}", file.path, names.join(", "));
    }
}

fn save_report(report: &ClassificationReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize classification report")?;

    std::fs::write(output_path, json)
        .context("Failed to write classification report")?;

    Ok(())
}
