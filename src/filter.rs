use crate::config::HarvestConfig;
use crate::errors::{HarvestError, HarvestResult};
use regex::Regex;

/// Classifies rendered pages as bot-challenge pages.
///
/// A page is challenged if it contains any literal marker or matches any pattern.
/// Callers check this before handing a page to the extractor.
#[derive(Debug, Clone)]
pub struct ChallengeDetector {
    markers: Vec<String>,
    patterns: Vec<Regex>,
}

impl Default for ChallengeDetector {
    fn default() -> Self {
        Self {
            markers: HarvestConfig::default().challenge_markers,
            patterns: Vec::new(),
        }
    }
}

impl ChallengeDetector {
    /// Create a detector from literal markers and regex patterns
    pub fn new(markers: Vec<String>, patterns: &[String]) -> HarvestResult<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let regex = Regex::new(pattern).map_err(|e| {
                HarvestError::Config(format!("invalid challenge pattern {pattern:?}: {e}"))
            })?;
            compiled.push(regex);
        }

        Ok(Self {
            markers,
            patterns: compiled,
        })
    }

    pub fn from_config(config: &HarvestConfig) -> HarvestResult<Self> {
        Self::new(config.challenge_markers.clone(), &config.challenge_patterns)
    }

    /// True if the page is a challenge page and must not be extracted from
    pub fn is_challenged(&self, html: &str) -> bool {
        if self.markers.iter().any(|marker| html.contains(marker.as_str())) {
            return true;
        }
        self.patterns.iter().any(|regex| regex.is_match(html))
    }
}
