/// Qualitative band for a health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Great,
    Good,
    NeedsWork,
    Critical,
}

impl Band {
    /// Lower bounds are inclusive and checked top-down.
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Band::Great,
            75.. => Band::Good,
            50.. => Band::NeedsWork,
            _ => Band::Critical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Great => "Great",
            Band::Good => "Good",
            Band::NeedsWork => "Needs work",
            Band::Critical => "Critical",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Band::Great => "😊",
            Band::Good => "🙂",
            Band::NeedsWork => "😐",
            Band::Critical => "😟",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Weighted health score for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreReport {
    /// 0..=100
    pub score: u32,
    pub band: Band,
    /// Sum of weights of tools with findings (may exceed 100 for custom registries)
    pub deducted: u32,
    /// Number of tools with findings
    pub findings: usize,
}

impl ScoreReport {
    pub fn has_findings(&self) -> bool {
        self.findings > 0
    }
}
