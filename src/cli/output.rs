//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classifier::ClassificationResult;
use crate::cli::args::{OutputFormat, VitrineArgs};
use crate::engine::BatchReport;
use crate::error::Result;
use crate::patterns::{FamilyCount, PatternInsight, PatternMatch};

/// Types with a human-readable rendering.
pub trait HumanOutput {
    fn print_human(&self, args: &VitrineArgs);
}

/// Result structure for the classify command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyOutput {
    pub results: Vec<ClassificationResult>,
    /// Display label per category id.
    #[serde(skip)]
    pub labels: BTreeMap<String, String>,
}

/// Result structure for the patterns command.
#[derive(Debug, Serialize, Deserialize)]
pub struct PatternsOutput {
    pub matches: Vec<PatternMatch>,
}

/// Result structure for the analyze command.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeOutput {
    #[serde(flatten)]
    pub report: BatchReport,
    #[serde(skip)]
    pub labels: BTreeMap<String, String>,
}

/// Result structure for the validate command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResult {
    pub taxonomy_source: String,
    pub taxonomy_version: Option<String>,
    pub categories: usize,
    pub keywords: usize,
    pub anchors: usize,
    pub catalog_source: String,
    pub catalog_version: Option<String>,
    pub patterns: usize,
    pub families: Vec<FamilyCount>,
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &VitrineArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.print_human(args);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &VitrineArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

impl HumanOutput for ClassifyOutput {
    fn print_human(&self, args: &VitrineArgs) {
        println!("Classification Results:");
        println!("═══════════════════════");
        for (i, result) in self.results.iter().enumerate() {
            print_classification(i, result, &self.labels, args);
        }
    }
}

impl HumanOutput for PatternsOutput {
    fn print_human(&self, _args: &VitrineArgs) {
        println!("Detected Patterns:");
        println!("══════════════════");
        for (i, found) in self.matches.iter().enumerate() {
            println!();
            println!("[{}] {}", i + 1, found.title);
            if found.is_empty() {
                println!("    (no pattern)");
            } else {
                println!("    {}", found.matched_pattern_ids.join(", "));
            }
        }
    }
}

impl HumanOutput for AnalyzeOutput {
    fn print_human(&self, args: &VitrineArgs) {
        let report = &self.report;
        println!("Analysis Report");
        println!("═══════════════");
        println!("Generated: {}", report.generated_at.to_rfc3339());
        println!("Titles: {}", report.total_titles);
        println!(
            "Semantic scoring: {}",
            if report.semantic_available { "on" } else { "off (keyword only)" }
        );

        println!();
        println!("Distribution:");
        for share in &report.distribution.categories {
            println!(
                "  {:<40} {:>6} {:>7.2}%",
                label(&self.labels, &share.category_id),
                share.count,
                share.percentage
            );
        }
        println!(
            "  High confidence: {}  Low confidence: {}  Multi-category: {}",
            report.distribution.high_confidence,
            report.distribution.low_confidence,
            report.distribution.multi_category
        );

        for (id, insight) in &report.insights {
            if insight.titles_count > 0 {
                print_insight(label(&self.labels, id), insight);
            }
        }

        if args.verbosity() > 1 && !report.classifications.is_empty() {
            println!();
            println!("Titles:");
            for (i, result) in report.classifications.iter().enumerate() {
                print_classification(i, result, &self.labels, args);
            }
        }
    }
}

impl HumanOutput for ValidationResult {
    fn print_human(&self, _args: &VitrineArgs) {
        println!("Configuration OK");
        println!("════════════════");
        println!(
            "Taxonomy: {} (version {})",
            self.taxonomy_source,
            self.taxonomy_version.as_deref().unwrap_or("-")
        );
        println!(
            "  {} categories, {} keywords, {} anchors",
            self.categories, self.keywords, self.anchors
        );
        println!(
            "Patterns: {} (version {})",
            self.catalog_source,
            self.catalog_version.as_deref().unwrap_or("-")
        );
        println!("  {} patterns", self.patterns);
        for family in &self.families {
            println!("    {:<12} {}", family.family.as_str(), family.count);
        }
    }
}

fn print_classification(
    index: usize,
    result: &ClassificationResult,
    labels: &BTreeMap<String, String>,
    args: &VitrineArgs,
) {
    println!();
    println!("[{}] {}", index + 1, result.title);
    println!(
        "    Primary:   {} (confidence {:.3}, margin {:.3})",
        label(labels, &result.primary_category),
        result.confidence,
        result.margin
    );
    if !result.secondary_categories.is_empty() {
        let secondaries: Vec<&str> = result
            .secondary_categories
            .iter()
            .map(|id| label(labels, id))
            .collect();
        println!("    Secondary: {}", secondaries.join(", "));
    }
    if !result.semantic_available {
        println!("    (keyword only)");
    }
    if args.verbosity() > 2 {
        for score in &result.scores {
            println!(
                "      {:<24} keyword {:.3}  semantic {:.3}  combined {:.3}",
                score.category_id, score.keyword, score.semantic, score.combined
            );
        }
    }
}

fn print_insight(name: &str, insight: &PatternInsight) {
    println!();
    println!("{name} ({} titles)", insight.titles_count);
    if let Some(family) = insight.dominant_family {
        println!("  Dominant family: {family}");
    }
    for pattern in &insight.top_patterns {
        println!(
            "  {:<32} {:>5} {:>7.2}%",
            pattern.pattern_id, pattern.count, pattern.percentage
        );
    }
    if let Some((min, max)) = insight.length_range {
        println!(
            "  Length: avg {:.1}, range {min}-{max}",
            insight.avg_length
        );
    }
    for advice in &insight.advice {
        println!("  • {advice}");
    }
}

fn label<'a>(labels: &'a BTreeMap<String, String>, id: &'a str) -> &'a str {
    labels.get(id).map(String::as_str).unwrap_or(id)
}
