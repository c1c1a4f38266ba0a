//! Folder layout and engine settings, read from a `simc.json` style file.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Engine location, thread count and the folders every workflow reads from
/// or writes to. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimcConfig {
    #[serde(default = "SimcConfig::default_simc_path")]
    pub simc_path: PathBuf,
    #[serde(default = "SimcConfig::default_threads")]
    pub threads: u32,
    #[serde(default = "SimcConfig::default_profiles_folder")]
    pub profiles_folder: PathBuf,
    #[serde(default = "SimcConfig::default_generated_folder")]
    pub generated_folder: PathBuf,
    #[serde(default = "SimcConfig::default_logs_folder")]
    pub logs_folder: PathBuf,
    #[serde(default = "SimcConfig::default_reports_folder")]
    pub reports_folder: PathBuf,
    #[serde(default = "SimcConfig::default_config_folder")]
    pub config_folder: PathBuf,
}

/// Files produced for one relic simulation batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPaths {
    pub simc_input: PathBuf,
    pub engine_log: PathBuf,
    pub engine_json: PathBuf,
    pub report: PathBuf,
    pub meta: PathBuf,
}

impl SimcConfig {
    #[must_use]
    pub fn default_simc_path() -> PathBuf {
        PathBuf::from("simc")
    }

    #[must_use]
    pub fn default_threads() -> u32 {
        std::thread::available_parallelism()
            .ok()
            .and_then(|n| u32::try_from(n.get()).ok())
            .unwrap_or(1)
    }

    #[must_use]
    pub fn default_profiles_folder() -> PathBuf {
        PathBuf::from("profiles")
    }

    #[must_use]
    pub fn default_generated_folder() -> PathBuf {
        PathBuf::from("generated")
    }

    #[must_use]
    pub fn default_logs_folder() -> PathBuf {
        PathBuf::from("logs")
    }

    #[must_use]
    pub fn default_reports_folder() -> PathBuf {
        PathBuf::from("reports")
    }

    #[must_use]
    pub fn default_config_folder() -> PathBuf {
        PathBuf::from("config")
    }

    /// Load the settings file, or fall back to defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not a JSON object of the
    /// expected shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse settings {}", path.display()))
    }

    #[must_use]
    pub fn relic_list(&self) -> PathBuf {
        self.profiles_folder
            .join("RelicSimulation")
            .join("RelicList.json")
    }

    #[must_use]
    pub fn relic_template(&self, class_folder: &str, template: &str) -> PathBuf {
        self.profiles_folder
            .join("RelicSimulation")
            .join(class_folder)
            .join(format!("RelicSimulation_{template}.simc"))
    }

    #[must_use]
    pub fn fightstyle_profile(&self, fightstyle: &str) -> PathBuf {
        self.profiles_folder
            .join("Fightstyles")
            .join(format!("Fightstyle_{fightstyle}.simc"))
    }

    #[must_use]
    pub fn relic_engine_config(&self) -> PathBuf {
        self.config_folder.join("SimcRelicConfig.simc")
    }

    #[must_use]
    pub fn batch_paths(&self, batch_name: &str) -> BatchPaths {
        BatchPaths {
            simc_input: self.generated_folder.join(format!("{batch_name}.simc")),
            engine_log: self.logs_folder.join(format!("{batch_name}.log")),
            engine_json: self.logs_folder.join(format!("{batch_name}.json")),
            report: self.reports_folder.join(format!("{batch_name}.json")),
            meta: self
                .reports_folder
                .join("meta")
                .join(format!("{batch_name}.json")),
        }
    }
}

impl Default for SimcConfig {
    fn default() -> Self {
        Self {
            simc_path: Self::default_simc_path(),
            threads: Self::default_threads(),
            profiles_folder: Self::default_profiles_folder(),
            generated_folder: Self::default_generated_folder(),
            logs_folder: Self::default_logs_folder(),
            reports_folder: Self::default_reports_folder(),
            config_folder: Self::default_config_folder(),
        }
    }
}
