//! Scraper configuration, loaded from a per-municipality directory.
//!
//! Decision-keyword patterns and ignore lists are configuration data, not
//! engine logic: every municipality words its minutes differently.

use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub config: GeneralConfig,
    pub vote_patterns: VotePatterns,
    pub ignore_patterns: Vec<String>,
    pub primary_bodies: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub matching: MatchingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    pub fuzzy_threshold: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty_json: bool,
}

/// Keyword lists for inferring vote decisions, item decisions, and matter
/// result status from free-text minutes. Matching is lowercase substring.
#[derive(Debug, Clone)]
pub struct VotePatterns {
    pub approve: Vec<String>,
    pub reject: Vec<String>,
    pub abstain: Vec<String>,
    pub absent: Vec<String>,
    pub passed: Vec<String>,
    pub failed: Vec<String>,
    pub adopted: Vec<String>,
    pub rejected: Vec<String>,
    pub in_progress: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct VotePatternsFile {
    #[serde(default)]
    decisions: HashMap<String, Vec<String>>,
    #[serde(default)]
    item_decisions: HashMap<String, Vec<String>>,
    #[serde(default)]
    matter_status: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct IgnoreFile {
    patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct BodiesFile {
    bodies: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            matching: MatchingConfig { fuzzy_threshold: 90 },
            output: OutputConfig { pretty_json: true },
        }
    }
}

impl Default for VotePatterns {
    fn default() -> Self {
        Self {
            approve: strings(&["approve", "in favor", "favor", "yes", "aye"]),
            reject: strings(&["reject", "oppose", "against", "no", "nay"]),
            abstain: strings(&["abstain", "recuse", "non-voting"]),
            absent: strings(&["absent", "excused", "not present"]),
            passed: strings(&["passed", "adopted", "carried", "approved"]),
            failed: strings(&["failed", "defeated", "not carried"]),
            adopted: strings(&["adopted", "enacted", "approved", "passed"]),
            rejected: strings(&["rejected", "vetoed", "failed"]),
            in_progress: strings(&["referred", "held", "in committee", "first reading", "pending"]),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            config: GeneralConfig::default(),
            vote_patterns: VotePatterns::default(),
            ignore_patterns: strings(&[
                "call to order",
                "roll call",
                "approval of the agenda",
                "public comment",
                "adjournment",
            ]),
            primary_bodies: strings(&["City Council"]),
        }
    }
}

impl ScraperConfig {
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join("scraper_config.toml");
        let config_str = fs::read_to_string(&config_path)?;
        let config: GeneralConfig = toml::from_str(&config_str)?;
        if config.matching.fuzzy_threshold > 100 {
            return Err(anyhow!(
                "fuzzy_threshold must be within 0-100, got {}",
                config.matching.fuzzy_threshold
            ));
        }

        let vote_patterns_path = path.join("vote_patterns.yaml");
        let vote_patterns_str = fs::read_to_string(&vote_patterns_path)?;
        let vote_patterns_file: VotePatternsFile = serde_yaml::from_str(&vote_patterns_str)?;
        let vote_patterns = parse_vote_patterns(vote_patterns_file);

        let ignore_path = path.join("ignore_patterns.yaml");
        let ignore_str = fs::read_to_string(&ignore_path)?;
        let ignore_file: IgnoreFile = serde_yaml::from_str(&ignore_str)?;

        let bodies_path = path.join("primary_bodies.yaml");
        let bodies_str = fs::read_to_string(&bodies_path)?;
        let bodies_file: BodiesFile = serde_yaml::from_str(&bodies_str)?;

        Ok(Self {
            config,
            vote_patterns,
            ignore_patterns: ignore_file
                .patterns
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            primary_bodies: bodies_file.bodies,
        })
    }
}

fn parse_vote_patterns(file: VotePatternsFile) -> VotePatterns {
    let defaults = VotePatterns::default();
    VotePatterns {
        approve: pick(&file.decisions, "approve", defaults.approve),
        reject: pick(&file.decisions, "reject", defaults.reject),
        abstain: pick(&file.decisions, "abstain", defaults.abstain),
        absent: pick(&file.decisions, "absent", defaults.absent),
        passed: pick(&file.item_decisions, "passed", defaults.passed),
        failed: pick(&file.item_decisions, "failed", defaults.failed),
        adopted: pick(&file.matter_status, "adopted", defaults.adopted),
        rejected: pick(&file.matter_status, "rejected", defaults.rejected),
        in_progress: pick(&file.matter_status, "in_progress", defaults.in_progress),
    }
}

fn pick(map: &HashMap<String, Vec<String>>, key: &str, fallback: Vec<String>) -> Vec<String> {
    match map.get(key) {
        Some(entries) => entries.iter().map(|e| e.to_lowercase()).collect(),
        None => fallback,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config_dir(dir: &Path) {
        fs::write(
            dir.join("scraper_config.toml"),
            "[matching]\nfuzzy_threshold = 85\n\n[output]\npretty_json = false\n",
        )
        .unwrap();
        fs::write(
            dir.join("vote_patterns.yaml"),
            "decisions:\n  approve: [\"Aye\", \"In Favor\"]\nitem_decisions:\n  failed: [\"motion failed\"]\n",
        )
        .unwrap();
        fs::write(
            dir.join("ignore_patterns.yaml"),
            "patterns:\n  - \"Roll Call\"\n  - \"adjournment\"\n",
        )
        .unwrap();
        fs::write(
            dir.join("primary_bodies.yaml"),
            "bodies:\n  - \"City Council\"\n  - \"Select Budget Committee\"\n",
        )
        .unwrap();
    }

    #[test]
    fn loads_full_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_config_dir(dir.path());
        let config = ScraperConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.config.matching.fuzzy_threshold, 85);
        assert!(!config.config.output.pretty_json);
        assert_eq!(config.vote_patterns.approve, vec!["aye", "in favor"]);
        assert_eq!(config.vote_patterns.failed, vec!["motion failed"]);
        // Entries absent from the file keep the built-in defaults.
        assert_eq!(config.vote_patterns.reject, VotePatterns::default().reject);
        assert_eq!(config.ignore_patterns, vec!["roll call", "adjournment"]);
        assert_eq!(config.primary_bodies.len(), 2);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_config_dir(dir.path());
        fs::write(
            dir.path().join("scraper_config.toml"),
            "[matching]\nfuzzy_threshold = 150\n\n[output]\npretty_json = true\n",
        )
        .unwrap();
        assert!(ScraperConfig::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ScraperConfig::load_from_dir(dir.path()).is_err());
    }
}
