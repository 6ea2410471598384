use std::path::PathBuf;

/// A static-analysis tool whose output file feeds the health score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Stable identifier (e.g., "ruff")
    pub id: String,
    /// Display label, usually prefixed with an emoji
    pub label: String,
    /// Short description shown next to the label (e.g., "lint + style")
    pub description: String,
    /// Where the CI step wrote this tool's output
    pub result_path: PathBuf,
    /// Points deducted from 100 when this tool reports findings
    pub weight: u32,
}

/// Outcome of reading one tool's result file.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub tool: ToolSpec,
    /// Trimmed file content; `None` when the tool is clean
    pub content: Option<String>,
    pub has_findings: bool,
}

impl ToolResult {
    pub fn clean(tool: ToolSpec) -> Self {
        Self {
            tool,
            content: None,
            has_findings: false,
        }
    }

    pub fn with_findings(tool: ToolSpec, content: String) -> Self {
        Self {
            tool,
            content: Some(content),
            has_findings: true,
        }
    }
}
