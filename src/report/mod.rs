pub mod render;
pub mod types;

pub use render::{render, MARKER};
pub use types::{Band, ScoreReport};

use crate::tools::ToolResult;
use colored::Colorize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Score a run: every tool with findings deducts its weight from 100.
pub fn score(results: &[ToolResult]) -> ScoreReport {
    let flagged: Vec<&ToolResult> = results.iter().filter(|r| r.has_findings).collect();
    let deducted: u32 = flagged.iter().map(|r| r.tool.weight).sum();
    let score = 100u32.saturating_sub(deducted);

    ScoreReport {
        score,
        band: Band::from_score(score),
        deducted,
        findings: flagged.len(),
    }
}

/// Append `score` and `has_findings` to the GitHub Actions output file.
///
/// Without an output file (local runs) the values are only logged.
#[instrument(skip(report), fields(score = report.score))]
pub fn write_outputs(report: &ScoreReport, output_file: Option<&Path>) -> Result<(), ReportError> {
    let lines = format!(
        "score={}\nhas_findings={}\n",
        report.score,
        report.has_findings()
    );

    match output_file {
        None => {
            debug!(outputs = %lines.trim_end(), "no job output file, skipping");
            Ok(())
        }
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(lines.as_bytes())?;
            info!(path = %path.display(), "wrote job outputs");
            Ok(())
        }
    }
}

/// Write the rendered comment body to a file.
pub fn write_body(body: &str, path: &Path) -> Result<(), ReportError> {
    std::fs::write(path, body)?;
    Ok(())
}

/// Print a per-tool summary with colors.
///
/// Goes to stderr so stdout stays reserved for the comment body in dry runs.
///
/// Python Doctor: 72/100 (Needs work)
///   FINDINGS  🔍 Ruff (lint + style)  -20
///   PASS      🔷 mypy (type check)
pub fn print_terminal_summary(results: &[ToolResult], report: &ScoreReport) {
    eprintln!();
    eprintln!(
        "Python Doctor: {}/100 ({})",
        report.score,
        colorize_band(report.band)
    );
    for result in results {
        let tool = &result.tool;
        if result.has_findings {
            eprintln!(
                "  {}  {} ({})  -{}",
                "FINDINGS".red().bold(),
                tool.label,
                tool.description,
                tool.weight
            );
        } else {
            eprintln!("  {}      {} ({})", "PASS".green(), tool.label, tool.description);
        }
    }
    eprintln!();
}

fn colorize_band(band: Band) -> colored::ColoredString {
    match band {
        Band::Great => band.label().green().bold(),
        Band::Good => band.label().cyan().bold(),
        Band::NeedsWork => band.label().yellow().bold(),
        Band::Critical => band.label().red().bold(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tools::ToolSpec;
    use std::path::PathBuf;

    pub fn tool(id: &str, weight: u32) -> ToolSpec {
        ToolSpec {
            id: id.to_string(),
            label: id.to_string(),
            description: format!("{id} check"),
            result_path: PathBuf::from(format!("/tmp/pydoctor_{id}.txt")),
            weight,
        }
    }

    /// The default seven tools, with findings for the ids in `dirty`.
    pub fn default_results(dirty: &[&str]) -> Vec<ToolResult> {
        [
            ("ruff", 20),
            ("mypy", 20),
            ("bandit", 20),
            ("vulture", 15),
            ("radon", 15),
            ("sqlfluff", 8),
            ("markdownlint", 2),
        ]
        .into_iter()
        .map(|(id, weight)| {
            if dirty.contains(&id) {
                ToolResult::with_findings(tool(id, weight), format!("{id}: 1 problem"))
            } else {
                ToolResult::clean(tool(id, weight))
            }
        })
        .collect()
    }

    #[test]
    fn test_clean_run_scores_100() {
        let report = score(&default_results(&[]));
        assert_eq!(report.score, 100);
        assert_eq!(report.band, Band::Great);
        assert!(!report.has_findings());
    }

    #[test]
    fn test_ruff_and_sqlfluff_deduct_28() {
        let report = score(&default_results(&["ruff", "sqlfluff"]));
        assert_eq!(report.deducted, 28);
        assert_eq!(report.score, 72);
        assert_eq!(report.band, Band::NeedsWork);
        assert_eq!(report.findings, 2);
    }

    #[test]
    fn test_all_dirty_scores_zero() {
        let all = ["ruff", "mypy", "bandit", "vulture", "radon", "sqlfluff", "markdownlint"];
        let report = score(&default_results(&all));
        assert_eq!(report.score, 0);
        assert_eq!(report.band, Band::Critical);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let results = vec![
            ToolResult::with_findings(tool("a", 80), "x".to_string()),
            ToolResult::with_findings(tool("b", 80), "y".to_string()),
        ];
        let report = score(&results);
        assert_eq!(report.deducted, 160);
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_score_is_monotonic_as_findings_grow() {
        let order = ["markdownlint", "sqlfluff", "radon", "vulture", "bandit", "mypy", "ruff"];
        let mut previous = 100;
        for n in 0..=order.len() {
            let current = score(&default_results(&order[..n])).score;
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn test_write_outputs_appends() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("github_output");
        std::fs::write(&path, "earlier=1\n").unwrap();

        let report = score(&default_results(&["ruff", "sqlfluff"]));
        write_outputs(&report, Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "earlier=1\nscore=72\nhas_findings=true\n");
    }

    #[test]
    fn test_write_outputs_without_file() {
        let report = score(&default_results(&[]));
        write_outputs(&report, None).unwrap();
    }

    #[test]
    fn test_terminal_summary_does_not_panic() {
        let results = default_results(&["bandit"]);
        let report = score(&results);
        print_terminal_summary(&results, &report);
    }
}
