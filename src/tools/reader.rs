use regex::{Regex, RegexBuilder};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, instrument};

use super::types::{ToolResult, ToolSpec};
use super::ToolRegistry;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Failed to read result file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid noise pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Output that tools print on a clean run. Anchored to the start of the file.
const DEFAULT_NOISE: &[&str] = &[
    r"^no python files",
    r"^no sql files",
    r"^no issues",
    r"^success",
    r"^\s*$",
];

/// Ordered rules that classify a trimmed result file as clean.
///
/// The empty check runs first, then each pattern in order. Patterns are
/// case-insensitive and matched against the whole trimmed text without the
/// multi-line flag, so `^` anchors the start of the file, not each line.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    patterns: Vec<Regex>,
}

impl NoiseFilter {
    /// Built-in patterns followed by `extra`. Unanchored extras get a leading `^`.
    pub fn new(extra: &[String]) -> Result<Self, ReaderError> {
        let mut patterns = Vec::with_capacity(DEFAULT_NOISE.len() + extra.len());
        for pattern in DEFAULT_NOISE {
            patterns.push(compile(pattern)?);
        }
        for pattern in extra {
            if pattern.starts_with('^') {
                patterns.push(compile(pattern)?);
            } else {
                patterns.push(compile(&format!("^(?:{pattern})"))?);
            }
        }
        Ok(Self { patterns })
    }

    pub fn is_noise(&self, trimmed: &str) -> bool {
        trimmed.is_empty() || self.patterns.iter().any(|re| re.is_match(trimmed))
    }
}

fn compile(pattern: &str) -> Result<Regex, ReaderError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ReaderError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Read and classify one tool's result file.
///
/// A missing file is clean. Any other read failure (permissions, invalid
/// UTF-8) is an error: scoring it as clean would hide a broken CI step.
#[instrument(skip(tool, noise), fields(tool = %tool.id, path = %tool.result_path.display()))]
pub fn read(tool: &ToolSpec, noise: &NoiseFilter) -> Result<ToolResult, ReaderError> {
    let raw = match std::fs::read_to_string(&tool.result_path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("result file missing, treating as clean");
            return Ok(ToolResult::clean(tool.clone()));
        }
        Err(source) => {
            return Err(ReaderError::Read {
                path: tool.result_path.clone(),
                source,
            })
        }
    };

    let trimmed = trim_content(&raw);
    if noise.is_noise(trimmed) {
        debug!(bytes = raw.len(), "result file is noise, treating as clean");
        return Ok(ToolResult::clean(tool.clone()));
    }

    debug!(chars = trimmed.chars().count(), "tool reported findings");
    Ok(ToolResult::with_findings(tool.clone(), trimmed.to_string()))
}

/// Trim whitespace and any byte-order mark, which `str::trim` keeps.
fn trim_content(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Read every tool in registry order.
pub fn read_all(registry: &ToolRegistry, noise: &NoiseFilter) -> Result<Vec<ToolResult>, ReaderError> {
    registry.tools().iter().map(|tool| read(tool, noise)).collect()
}
