//! Command implementations for the Vitrine CLI.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use log::{debug, info, warn};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{EngineConfig, ProviderKind};
use crate::engine::DiscoverEngine;
use crate::error::{Result, VitrineError};
use crate::patterns::{FamilyCount, PatternCatalog, PatternFamily};
use crate::taxonomy::CategoryRegistry;

/// Execute a CLI command.
pub async fn execute_command(args: VitrineArgs) -> Result<()> {
    let config = load_config(&args)?;
    match &args.command {
        Command::Classify(input) => classify_titles(input, config, &args).await,
        Command::Patterns(input) => detect_patterns(input, config, &args),
        Command::Analyze(analyze_args) => analyze_titles(analyze_args, config, &args).await,
        Command::Validate => validate_configuration(&config, &args),
    }
}

/// Build the engine configuration from the config file and command line overrides.
pub fn load_config(args: &VitrineArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            EngineConfig::from_path(path)?
        }
        None => EngineConfig::default(),
    };

    if let Some(taxonomy) = &args.taxonomy {
        config.taxonomy = Some(taxonomy.clone());
    }
    if let Some(patterns) = &args.patterns {
        config.patterns = Some(patterns.clone());
    }
    if args.threads.is_some() {
        config.threads = args.threads;
    }
    if args.no_semantic {
        config.semantic.enabled = false;
        config.embedding.provider = ProviderKind::None;
    }

    config.validate()?;
    Ok(config)
}

/// Read one title per line; blank lines are kept so indices stay aligned.
///
/// A line that is not valid UTF-8 becomes an empty title.
pub fn read_titles(path: &Path) -> Result<Vec<String>> {
    let content = if path == Path::new("-") {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        buffer
    } else {
        fs::read(path).map_err(|e| {
            VitrineError::invalid_argument(format!("cannot read {}: {e}", path.display()))
        })?
    };

    let mut lines: Vec<&[u8]> = content.split(|&b| b == b'\n').collect();
    if content.is_empty() || content.ends_with(b"\n") {
        lines.pop();
    }

    let titles: Vec<String> = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            String::from_utf8(line.to_vec()).unwrap_or_else(|e| {
                warn!(
                    "{} line {}: invalid UTF-8 ({e}), treated as an empty title",
                    path.display(),
                    i + 1
                );
                String::new()
            })
        })
        .collect();
    info!("Read {} titles from {}", titles.len(), path.display());
    Ok(titles)
}

/// Classify titles.
async fn classify_titles(input: &InputArgs, config: EngineConfig, args: &VitrineArgs) -> Result<()> {
    let titles = read_titles(&input.input)?;
    let engine = DiscoverEngine::from_config(config)?;
    let results = engine.classify(&titles).await;

    output_result(
        "Titles classified",
        &ClassifyOutput {
            results,
            labels: category_labels(engine.registry()),
        },
        args,
    )
}

/// Detect patterns in titles.
fn detect_patterns(input: &InputArgs, config: EngineConfig, args: &VitrineArgs) -> Result<()> {
    let titles = read_titles(&input.input)?;
    let engine = DiscoverEngine::from_config(config)?;
    let matches = engine.detect(&titles);

    output_result("Patterns detected", &PatternsOutput { matches }, args)
}

/// Full batch analysis.
async fn analyze_titles(
    analyze_args: &AnalyzeArgs,
    config: EngineConfig,
    args: &VitrineArgs,
) -> Result<()> {
    let titles = read_titles(&analyze_args.input)?;
    let engine = DiscoverEngine::from_config(config)?;
    let mut report = engine.analyze(&titles).await?;

    if analyze_args.summary_only {
        report.classifications.clear();
        report.pattern_matches.clear();
    }

    output_result(
        "Analysis complete",
        &AnalyzeOutput {
            report,
            labels: category_labels(engine.registry()),
        },
        args,
    )
}

/// Load and cross-check the taxonomy and pattern catalog.
fn validate_configuration(config: &EngineConfig, args: &VitrineArgs) -> Result<()> {
    let registry = match &config.taxonomy {
        Some(path) => CategoryRegistry::from_path(path)?,
        None => CategoryRegistry::builtin()?,
    };
    let catalog = match &config.patterns {
        Some(path) => PatternCatalog::from_path(path)?,
        None => PatternCatalog::builtin()?,
    };
    catalog.validate_against(&registry)?;

    let result = ValidationResult {
        taxonomy_source: registry.source().to_string(),
        taxonomy_version: registry.version().map(str::to_string),
        categories: registry.len(),
        keywords: registry.categories().iter().map(|c| c.keywords.len()).sum(),
        anchors: registry.categories().iter().map(|c| c.anchors.len()).sum(),
        catalog_source: catalog.source().to_string(),
        catalog_version: catalog.version().map(str::to_string),
        patterns: catalog.len(),
        families: PatternFamily::ALL
            .iter()
            .map(|&family| FamilyCount {
                family,
                count: catalog.family(family).count(),
            })
            .collect(),
    };

    output_result("Configuration validated", &result, args)
}

fn category_labels(registry: &CategoryRegistry) -> BTreeMap<String, String> {
    registry
        .categories()
        .iter()
        .map(|c| (c.id.clone(), c.display_label()))
        .collect()
}
