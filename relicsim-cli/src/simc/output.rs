//! Reader for the engine's `json2` output.
use anyhow::{Context, Result};
use relicsim_core::MetricSample;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Top-level keys copied into the metadata file when present.
pub const METADATA_KEYS: [&str; 6] = [
    "version",
    "build_date",
    "build_time",
    "git_revision",
    "ptr_enabled",
    "beta_enabled",
];

#[derive(Debug, Deserialize)]
struct RawOutput {
    sim: RawSim,
    #[serde(flatten)]
    top_level: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawSim {
    #[serde(default)]
    players: Vec<RawPlayer>,
    #[serde(default)]
    profilesets: Option<RawProfilesets>,
}

#[derive(Debug, Deserialize)]
struct RawPlayer {
    name: String,
    collected_data: RawCollected,
}

#[derive(Debug, Deserialize)]
struct RawCollected {
    dps: RawMean,
}

#[derive(Debug, Deserialize)]
struct RawMean {
    mean: f64,
}

#[derive(Debug, Deserialize)]
struct RawProfilesets {
    #[serde(default)]
    results: Vec<RawProfilesetResult>,
}

#[derive(Debug, Deserialize)]
struct RawProfilesetResult {
    name: String,
    mean: f64,
}

/// DPS results and build information of one engine run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    samples: Vec<MetricSample>,
    build_info: Map<String, Value>,
}

impl EngineOutput {
    /// Parse engine output. Players come first, then profilesets, each in
    /// file order.
    ///
    /// # Errors
    ///
    /// Fails when the document lacks the `sim` section or a result misses
    /// its name or mean.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawOutput = serde_json::from_str(json).context("unexpected engine output")?;
        let mut samples: Vec<MetricSample> = raw
            .sim
            .players
            .into_iter()
            .map(|p| MetricSample::new(p.name, p.collected_data.dps.mean))
            .collect();
        if let Some(profilesets) = raw.sim.profilesets {
            samples.extend(
                profilesets
                    .results
                    .into_iter()
                    .map(|r| MetricSample::new(r.name, r.mean)),
            );
        }
        let build_info = raw
            .top_level
            .into_iter()
            .filter(|(key, _)| METADATA_KEYS.contains(&key.as_str()))
            .collect();
        Ok(Self {
            samples,
            build_info,
        })
    }

    /// Read and parse the engine output at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read engine output {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    #[must_use]
    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    /// Build information merged with `extra`; `extra` wins on key clashes.
    #[must_use]
    pub fn metadata(&self, extra: Map<String, Value>) -> Map<String, Value> {
        let mut meta = self.build_info.clone();
        meta.extend(extra);
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_output() -> String {
        json!({
            "version": "735-01",
            "build_date": "Jan 10 2018",
            "build_time": "12:00:00",
            "git_revision": "abc123",
            "ptr_enabled": 0,
            "beta_enabled": 0,
            "report_path": "ignored",
            "sim": {
                "players": [
                    { "name": "Template", "collected_data": { "dps": { "mean": 1000.5 } } }
                ],
                "profilesets": {
                    "results": [
                        { "name": "Weapon Item Level_5", "mean": 1050.0 },
                        { "name": "Light Speed_1", "mean": 1004.0 }
                    ]
                }
            }
        })
        .to_string()
    }

    #[test]
    fn collects_players_then_profilesets() {
        let output = EngineOutput::from_json(&sample_output()).unwrap();
        let labels: Vec<&str> = output.samples().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Template", "Weapon Item Level_5", "Light Speed_1"]);
        assert!((output.samples()[0].value - 1000.5).abs() < f64::EPSILON);
    }

    #[test]
    fn metadata_keeps_build_keys_and_extras() {
        let output = EngineOutput::from_json(&sample_output()).unwrap();
        let mut extra = Map::new();
        extra.insert("crucibleweight".to_string(), json!("cruweight^1^ilvl^1^end"));
        let meta = output.metadata(extra);
        assert_eq!(meta.len(), 7);
        assert_eq!(meta["build_date"], json!("Jan 10 2018"));
        assert_eq!(meta["crucibleweight"], json!("cruweight^1^ilvl^1^end"));
        assert!(!meta.contains_key("report_path"));
    }

    #[test]
    fn runs_without_profilesets_still_parse() {
        let output = EngineOutput::from_json(
            r#"{ "sim": { "players": [ { "name": "Template", "collected_data": { "dps": { "mean": 1.0 } } } ] } }"#,
        )
        .unwrap();
        assert_eq!(output.samples().len(), 1);
        assert!(output.metadata(Map::new()).is_empty());
    }

    #[test]
    fn missing_sim_section_is_an_error() {
        assert!(EngineOutput::from_json(r#"{ "version": "1" }"#).is_err());
    }
}
