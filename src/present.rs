//! Display helpers shared by the front ends.

use std::fmt;

use chrono::{DateTime, Utc};

/// Colour band for a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    /// 90 and above.
    High,
    /// 70 to 89.
    Medium,
    Low,
}

impl QualityTier {
    pub fn of(score: u8) -> Self {
        match score {
            90.. => QualityTier::High,
            70..=89 => QualityTier::Medium,
            _ => QualityTier::Low,
        }
    }

    /// ANSI colour code used by the terminal front end.
    pub fn ansi_color(self) -> &'static str {
        match self {
            QualityTier::High => "\x1b[32m",
            QualityTier::Medium => "\x1b[33m",
            QualityTier::Low => "\x1b[31m",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QualityTier::High => "high",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
        };
        f.write_str(s)
    }
}

/// "Mar 15, 2025"
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y").to_string()
}

/// "Showing 1 dataset" / "Showing 4 datasets"
pub fn results_summary(count: usize) -> String {
    let noun = if count == 1 { "dataset" } else { "datasets" };
    format!("Showing {count} {noun}")
}
