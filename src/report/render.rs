use super::types::ScoreReport;
use crate::tools::{ToolResult, ToolSpec};

/// Leading line of every comment this tool posts. Used to find our own comments.
pub const MARKER: &str = "<!-- python-doctor -->";

/// Per-tool output limit inside its collapsible section.
pub const MAX_SECTION_CHARS: usize = 8_000;

/// Whole-body limit, below GitHub's 65,536 comment limit.
pub const MAX_COMMENT_CHARS: usize = 60_000;

const TRUNCATION_NOTICE: &str =
    "\n\n⚠️ _Comment truncated — total output exceeded GitHub's 65 536-char limit._";

const BAR_SEGMENTS: u32 = 10;

/// Render the PR comment body. Pure: same input, same bytes.
///
/// Lengths are counted in chars so truncation never splits a code point.
pub fn render(results: &[ToolResult], report: &ScoreReport) -> String {
    let (findings, clean): (Vec<&ToolResult>, Vec<&ToolResult>) =
        results.iter().partition(|r| r.has_findings);

    let passed = if clean.is_empty() {
        String::new()
    } else {
        let labels: Vec<&str> = clean.iter().map(|r| r.tool.label.as_str()).collect();
        format!("\n**Passed:** {}\n", labels.join(" · "))
    };

    let sections: Vec<String> = findings
        .iter()
        .map(|r| render_section(&r.tool, r.content.as_deref().unwrap_or_default()))
        .collect();

    let body = [
        MARKER.to_string(),
        format!("## 🐍 Python Doctor {}", report.band.emoji()),
        String::new(),
        format!(
            "**Health Score: {}/100** — {}",
            report.score,
            report.band.label()
        ),
        format!("`{}`", score_bar(report.score)),
        passed,
        "---".to_string(),
        String::new(),
        sections.join("\n\n"),
    ]
    .join("\n");

    truncate_body(body)
}

/// Ten segments, one filled per 10 points; halves round up.
fn score_bar(score: u32) -> String {
    let filled = ((score.min(100) + 5) / 10).min(BAR_SEGMENTS);
    let empty = BAR_SEGMENTS - filled;
    format!(
        "{}{}",
        "█".repeat(filled as usize),
        "░".repeat(empty as usize)
    )
}

fn render_section(tool: &ToolSpec, content: &str) -> String {
    let header = format!("{} ({})", tool.label, tool.description);
    let total = content.chars().count();
    let body = if total > MAX_SECTION_CHARS {
        let kept: String = content.chars().take(MAX_SECTION_CHARS).collect();
        format!(
            "{kept}\n\n… _(truncated — {} chars omitted)_",
            total - MAX_SECTION_CHARS
        )
    } else {
        content.to_string()
    };

    [
        "<details>".to_string(),
        format!("<summary><strong>{header}</strong></summary>"),
        String::new(),
        "```".to_string(),
        body,
        "```".to_string(),
        "</details>".to_string(),
    ]
    .join("\n")
}

/// Cut an oversized body so that body + notice fits in MAX_COMMENT_CHARS.
fn truncate_body(body: String) -> String {
    if body.chars().count() <= MAX_COMMENT_CHARS {
        return body;
    }
    let keep = MAX_COMMENT_CHARS - TRUNCATION_NOTICE.chars().count();
    let mut truncated: String = body.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_NOTICE);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::score;
    use crate::report::tests::{default_results, tool};

    #[test]
    fn test_render_starts_with_marker() {
        let results = default_results(&["ruff"]);
        let body = render(&results, &score(&results));
        assert!(body.starts_with("<!-- python-doctor -->\n## 🐍 Python Doctor 🙂\n"));
    }

    #[test]
    fn test_render_header_and_passed_line() {
        let results = default_results(&["ruff", "sqlfluff"]);
        let report = score(&results);
        let body = render(&results, &report);

        assert!(body.contains("**Health Score: 72/100** — Needs work"));
        assert!(body.contains("`███████░░░`"));
        assert!(body.contains(
            "\n**Passed:** mypy · bandit · vulture · radon · markdownlint\n"
        ));
        assert!(body.contains("## 🐍 Python Doctor 😐"));
    }

    #[test]
    fn test_render_sections_in_registry_order() {
        let results = default_results(&["ruff", "sqlfluff"]);
        let body = render(&results, &score(&results));

        let expected_ruff = "<details>\n<summary><strong>ruff (ruff check)</strong></summary>\n\n```\nruff: 1 problem\n```\n</details>";
        let expected_sql = "<details>\n<summary><strong>sqlfluff (sqlfluff check)</strong></summary>\n\n```\nsqlfluff: 1 problem\n```\n</details>";
        assert!(body.ends_with(&format!("---\n\n{expected_ruff}\n\n{expected_sql}")));
    }

    #[test]
    fn test_render_without_passed_tools() {
        let results = vec![ToolResult::with_findings(tool("only", 100), "boom".to_string())];
        let body = render(&results, &score(&results));
        assert!(!body.contains("**Passed:**"));
        assert!(body.contains("**Health Score: 0/100** — Critical\n`░░░░░░░░░░`\n\n---\n"));
    }

    #[test]
    fn test_score_bar_rounding() {
        assert_eq!(score_bar(100), "██████████");
        assert_eq!(score_bar(0), "░░░░░░░░░░");
        assert_eq!(score_bar(75), "████████░░");
        assert_eq!(score_bar(74), "███████░░░");
        assert_eq!(score_bar(4), "░░░░░░░░░░");
    }

    #[test]
    fn test_section_truncated_at_8000_chars() {
        let content = "x".repeat(20_000);
        let section = render_section(&tool("ruff", 20), &content);
        assert!(section.contains("… _(truncated — 12000 chars omitted)_"));
        assert!(section.contains(&format!("```\n{}\n\n…", "x".repeat(8_000))));
        assert!(!section.contains(&"x".repeat(8_001)));
    }

    #[test]
    fn test_section_truncation_counts_chars_not_bytes() {
        let content = "é".repeat(8_010);
        let section = render_section(&tool("ruff", 20), &content);
        assert!(section.contains("10 chars omitted"));
    }

    #[test]
    fn test_section_at_limit_is_not_truncated() {
        let content = "y".repeat(MAX_SECTION_CHARS);
        let section = render_section(&tool("ruff", 20), &content);
        assert!(!section.contains("truncated"));
    }

    #[test]
    fn test_body_truncated_at_60000_chars() {
        let results: Vec<ToolResult> = (0..10)
            .map(|i| ToolResult::with_findings(tool(&format!("t{i}"), 10), "z".repeat(7_900)))
            .collect();
        let body = render(&results, &score(&results));

        assert_eq!(body.chars().count(), MAX_COMMENT_CHARS);
        assert!(body.ends_with(TRUNCATION_NOTICE));
        assert!(body.starts_with(MARKER));
    }

    #[test]
    fn test_small_body_is_untouched() {
        let body = "short".to_string();
        assert_eq!(truncate_body(body.clone()), body);
    }

    #[test]
    fn test_render_is_deterministic() {
        let results = default_results(&["mypy", "radon"]);
        let report = score(&results);
        assert_eq!(render(&results, &report), render(&results, &report));
    }
}
