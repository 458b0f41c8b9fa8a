//! Domain entities for CodeDarpan.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping of language names to cumulative byte size, in response body order.
pub type LanguageBreakdown = IndexMap<String, u64>;

/// Request payload sent to the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Repository URL to analyze.
    pub url: String,
}

/// Repository metadata reported by the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDetails {
    /// Stargazer count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Dominant language as reported by the hosting provider.
    pub primary_language: String,
    /// Bytes of code per language.
    #[serde(default)]
    pub language_breakdown: LanguageBreakdown,
}

/// Report returned by the analysis service for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Aggregate score, 0-100.
    pub score: u32,
    /// Short label describing the repository's character.
    pub persona: String,
    /// Natural-language summary of the project.
    pub summary: String,
    /// Repository metadata.
    pub details: RepoDetails,
    /// Ordered improvement suggestions.
    #[serde(default)]
    pub roadmap: Vec<String>,
}

/// Colour band a score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// Score of 90 or more.
    Good,
    /// Score above 60 and below 90.
    Warning,
    /// Score of 60 or less.
    Critical,
}

impl ScoreBand {
    /// Classify a score into its band.
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            Self::Good
        } else if score > 60 {
            Self::Warning
        } else {
            Self::Critical
        }
    }

    /// Hex colour used for the score ring.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Good => "#4ade80",
            Self::Warning => "#facc15",
            Self::Critical => "#f87171",
        }
    }

    /// RGB components of [`ScoreBand::color`].
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Good => (0x4a, 0xde, 0x80),
            Self::Warning => (0xfa, 0xcc, 0x15),
            Self::Critical => (0xf8, 0x71, 0x71),
        }
    }

    /// Lowercase label for the band.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}
