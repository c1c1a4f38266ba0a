//! Relic simulation workflow: generate profilesets, run the engine, turn
//! its output into a report, metadata and a weight string.
use anyhow::{Context, Result};
use log::{error, info};
use relicsim_core::{
    AnalysisConfig, AnalysisError, Analyzer, BatchAnalysis, BatchTarget, RelicList, WeightString,
    build_profilesets, weapon_item_id,
};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SimcConfig;
use crate::logging::LogSink;
use crate::reports::{data_table, write_json};
use crate::simc::{EngineOutput, SimcRunner};

/// Metadata key holding the weight string.
pub const WEIGHT_META_KEY: &str = "crucibleweight";

/// Outcome of analyzing one batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub config: AnalysisConfig,
    pub analysis: BatchAnalysis,
    pub weights: Option<WeightString>,
}

/// Where an analysis reads from and writes to.
#[derive(Debug, Clone)]
pub struct AnalyzePaths {
    pub input: PathBuf,
    pub report: PathBuf,
    pub meta: Option<PathBuf>,
}

/// Read and parse a relic list file.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed.
pub fn load_relic_list(path: &Path) -> Result<RelicList> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read relic list {}", path.display()))?;
    RelicList::from_json(&raw)
        .with_context(|| format!("failed to parse relic list {}", path.display()))
}

/// Full relic simulation for one class folder, template, spec and fight
/// style.
///
/// # Errors
///
/// Fails when inputs are missing, the engine fails or the results cannot be
/// analyzed; the error names the batch.
pub fn run_relic(
    settings: &SimcConfig,
    class_folder: &str,
    target: &BatchTarget<'_>,
) -> Result<BatchOutcome> {
    let batch = target.batch_name();
    let list = load_relic_list(&settings.relic_list())?;
    let paths = settings.batch_paths(&batch);

    info!("Summarizing input:");
    info!("-- Class: {class_folder}");
    info!("-- Profile: {}", target.template);
    info!("-- Specialization: {}", target.spec);
    info!("-- Fightstyle: {}", target.fightstyle);

    info!("Writing profilesets to {}!", paths.simc_input.display());
    let contents = build_profilesets(&list, target)
        .with_context(|| format!("{batch}: profileset generation"))?;
    create_parent(&paths.simc_input)?;
    fs::write(&paths.simc_input, contents)
        .with_context(|| format!("failed to write {}", paths.simc_input.display()))?;

    create_parent(&paths.engine_log)?;
    info!("Starting simulations, this may take a while!");
    let args = vec![
        settings.relic_engine_config().display().to_string(),
        format!("output={}", paths.engine_log.display()),
        format!("json2={}", paths.engine_json.display()),
        settings.fightstyle_profile(target.fightstyle).display().to_string(),
        settings
            .relic_template(class_folder, target.template)
            .display()
            .to_string(),
        paths.simc_input.display().to_string(),
    ];
    SimcRunner::new(settings)
        .run(&args)
        .with_context(|| format!("{batch}: simulation failed"))?;

    analyze_output(
        &list,
        target.spec,
        &AnalyzePaths {
            input: paths.engine_json,
            report: paths.report,
            meta: Some(paths.meta),
        },
    )
    .with_context(|| format!("{batch}: analysis failed"))
}

/// Analyze existing engine output and write the report and, if asked, the
/// metadata file.
///
/// A zero item level increment only drops the weight string; the report is
/// still written.
///
/// # Errors
///
/// Fails when the output cannot be read, the batch cannot be analyzed, the
/// spec is unknown or a file cannot be written.
pub fn analyze_output(
    list: &RelicList,
    spec: &str,
    paths: &AnalyzePaths,
) -> Result<BatchOutcome> {
    let output = EngineOutput::read(&paths.input)?;
    let config = AnalysisConfig::with_step_size(list.config.item_level_steps);
    let analyzer = Analyzer::new(&config);
    let mut sink = LogSink::default();

    info!(
        "Converting {} to {}...",
        paths.input.display(),
        paths.report.display()
    );
    let analysis = analyzer
        .analyze(output.samples(), &mut sink)
        .with_context(|| format!("failed to analyze {}", paths.input.display()))?;

    let catalog = list.catalog_for(spec)?;
    let weights = match weapon_item_id(list.weapon(spec)?) {
        None => {
            info!("Weapon for {spec} has no item id; skipping weight string");
            None
        }
        Some(item_id) => {
            info!("Generating CrucibleWeight string...");
            match analyzer.encode_weights(&analysis, &catalog, item_id, &mut sink) {
                Ok(weights) => {
                    info!("{weights}");
                    Some(weights)
                }
                Err(err @ AnalysisError::DegenerateNormalization { .. }) => {
                    error!("{err}; weight string omitted");
                    None
                }
                Err(err) => return Err(err).context("failed to encode weights"),
            }
        }
    };

    if sink.warnings() > 0 {
        info!("{} analysis warnings; see above", sink.warnings());
    }

    if let Some(meta_path) = &paths.meta {
        info!(
            "Extract metadata from {} to {}...",
            paths.input.display(),
            meta_path.display()
        );
        let mut extra = Map::new();
        if let Some(weights) = &weights {
            extra.insert(WEIGHT_META_KEY.to_string(), Value::String(weights.to_string()));
        }
        write_json(meta_path, &output.metadata(extra))?;
    }

    write_json(&paths.report, &data_table(&analysis, &config))?;

    Ok(BatchOutcome {
        config,
        analysis,
        weights,
    })
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}
