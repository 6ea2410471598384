pub mod reader;
pub mod types;

pub use reader::NoiseFilter;
pub use types::{ToolResult, ToolSpec};

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, ToolConfig};

/// Weights across the registry must add up to this so a clean run scores 100.
pub const TOTAL_WEIGHT: u32 = 100;

#[derive(Debug, Error)]
pub enum ToolsError {
    #[error("Tool registry is empty")]
    Empty,

    #[error("Duplicate tool id in registry: {0}")]
    DuplicateId(String),

    #[error("Tool weights must sum to 100, got {0}")]
    WeightSum(u32),
}

/// (id, label, description, weight) for the built-in analyzers.
const DEFAULT_TOOLS: &[(&str, &str, &str, u32)] = &[
    ("ruff", "🔍 Ruff", "lint + style", 20),
    ("mypy", "🔷 mypy", "type check", 20),
    ("bandit", "🔒 Bandit", "security", 20),
    ("vulture", "🪦 Vulture", "dead code", 15),
    ("radon", "📐 Radon", "complexity", 15),
    ("sqlfluff", "🗄️ SQLFluff", "SQL", 8),
    ("markdownlint", "📝 markdownlint", "Markdown", 2),
];

/// Immutable, validated list of tools for one run.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    /// Validate and wrap a list of tools. Order is preserved.
    pub fn new(tools: Vec<ToolSpec>) -> Result<Self, ToolsError> {
        if tools.is_empty() {
            return Err(ToolsError::Empty);
        }

        let mut seen = HashSet::new();
        for tool in &tools {
            if !seen.insert(tool.id.as_str()) {
                return Err(ToolsError::DuplicateId(tool.id.clone()));
            }
        }

        let total: u32 = tools.iter().map(|t| t.weight).sum();
        if total != TOTAL_WEIGHT {
            return Err(ToolsError::WeightSum(total));
        }

        Ok(Self { tools })
    }

    /// The built-in Python tool set, with result files under `results_dir`.
    pub fn defaults(results_dir: &Path) -> Result<Self, ToolsError> {
        let tools = DEFAULT_TOOLS
            .iter()
            .map(|(id, label, description, weight)| ToolSpec {
                id: id.to_string(),
                label: label.to_string(),
                description: description.to_string(),
                result_path: results_dir.join(format!("pydoctor_{id}.txt")),
                weight: *weight,
            })
            .collect();
        Self::new(tools)
    }

    /// Build the registry from config: `[[tools]]` replaces the defaults wholesale.
    pub fn from_config(config: &Config) -> Result<Self, ToolsError> {
        let results_dir = config.results_dir();
        if config.tools.is_empty() {
            debug!(dir = %results_dir.display(), "using default tool registry");
            return Self::defaults(&results_dir);
        }

        debug!(count = config.tools.len(), "using tool registry from config");
        let tools = config
            .tools
            .iter()
            .map(|t| tool_from_config(t, &results_dir))
            .collect();
        Self::new(tools)
    }

    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }
}

fn tool_from_config(tool: &ToolConfig, results_dir: &Path) -> ToolSpec {
    let file = tool
        .file
        .clone()
        .unwrap_or_else(|| format!("pydoctor_{}.txt", tool.id).into());
    ToolSpec {
        id: tool.id.clone(),
        label: tool.label.clone().unwrap_or_else(|| tool.id.clone()),
        description: tool.description.clone().unwrap_or_default(),
        // join() keeps absolute paths as-is
        result_path: results_dir.join(file),
        weight: tool.weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tool_spec(id: &str, weight: u32) -> ToolSpec {
        ToolSpec {
            id: id.to_string(),
            label: id.to_string(),
            description: String::new(),
            result_path: PathBuf::from(format!("/tmp/{id}.txt")),
            weight,
        }
    }

    #[test]
    fn test_default_weights_sum_to_100() {
        let registry = ToolRegistry::defaults(Path::new("/tmp")).unwrap();
        let total: u32 = registry.tools().iter().map(|t| t.weight).sum();
        assert_eq!(total, TOTAL_WEIGHT);
        assert_eq!(registry.tools().len(), 7);
    }

    #[test]
    fn test_default_result_paths() {
        let registry = ToolRegistry::defaults(Path::new("/tmp")).unwrap();
        let ruff = &registry.tools()[0];
        assert_eq!(ruff.id, "ruff");
        assert_eq!(ruff.result_path, PathBuf::from("/tmp/pydoctor_ruff.txt"));
        let last = registry.tools().last().unwrap();
        assert_eq!(last.id, "markdownlint");
        assert_eq!(last.weight, 2);
    }

    #[test]
    fn test_rejects_bad_weight_sum() {
        let err = ToolRegistry::new(vec![tool_spec("a", 50), tool_spec("b", 40)]).unwrap_err();
        assert!(matches!(err, ToolsError::WeightSum(90)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = ToolRegistry::new(vec![tool_spec("a", 50), tool_spec("a", 50)]).unwrap_err();
        assert!(matches!(err, ToolsError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn test_rejects_empty_registry() {
        assert!(matches!(ToolRegistry::new(vec![]), Err(ToolsError::Empty)));
    }

    #[test]
    fn test_registry_from_config_tools() {
        let config: Config = toml::from_str(
            r#"
[results]
dir = "/work/out"

[[tools]]
id = "clippy"
label = "📎 Clippy"
description = "lint"
weight = 70

[[tools]]
id = "audit"
file = "/abs/audit.txt"
weight = 20

[[tools]]
id = "fmt"
file = "custom/fmt.txt"
weight = 10
"#,
        )
        .unwrap();
        let registry = ToolRegistry::from_config(&config).unwrap();
        let tools = registry.tools();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0].label, "📎 Clippy");
        assert_eq!(tools[0].result_path, PathBuf::from("/work/out/pydoctor_clippy.txt"));
        assert_eq!(tools[1].label, "audit");
        assert_eq!(tools[1].result_path, PathBuf::from("/abs/audit.txt"));
        assert_eq!(tools[2].result_path, PathBuf::from("/work/out/custom/fmt.txt"));
    }
}
