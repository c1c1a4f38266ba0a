//! Report and metadata files, plus the console summary.
use anyhow::{Context, Result};
use colored::Colorize;
use relicsim_core::numbers::format_decimal;
use relicsim_core::{AnalysisConfig, BatchAnalysis, Curve, WeightString};
use serde::Serialize;
use serde_json::{Value, json};
use std::fs;
use std::io::Write;
use std::path::Path;

/// DataTable rows for a batch: a header of column types, then one row per
/// curve holding `(value - baseline, rank label)` pairs padded with
/// `0, ""` to the widest curve.
///
/// Rows run stepped curve first, other curves by name, gain curve last.
#[must_use]
pub fn data_table(analysis: &BatchAnalysis, config: &AnalysisConfig) -> Vec<Value> {
    let mut rows: Vec<(String, Vec<(f64, String)>)> = Vec::new();
    let to_points = |curve: &Curve| -> Vec<(f64, String)> {
        curve
            .iter()
            .map(|(rank, value)| (value, rank.to_string()))
            .collect()
    };

    if let Some(stepped) = analysis.curves.get(&config.stepped_curve) {
        rows.push((config.stepped_curve.clone(), to_points(stepped)));
    }
    let excluded = [config.stepped_curve.as_str(), config.gain_curve.as_str()];
    for (name, curve) in analysis.curves.iter_except(&excluded) {
        rows.push((name.clone(), to_points(curve)));
    }
    rows.push((
        config.gain_curve.clone(),
        analysis
            .gain
            .points()
            .iter()
            .map(|p| (p.value, format_decimal(p.percent)))
            .collect(),
    ));

    let width = rows
        .iter()
        .map(|(_, points)| points.len())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut header = vec![json!({ "type": "string" })];
    for _ in 0..width {
        header.push(json!({ "type": "number" }));
        header.push(json!({ "type": "string" }));
    }

    let mut table = vec![Value::Array(header)];
    for (name, points) in rows {
        let mut row = vec![json!(name)];
        for (value, label) in &points {
            row.push(json!(value - analysis.baseline));
            row.push(json!(label));
        }
        for _ in points.len()..width {
            row.push(json!(0));
            row.push(json!(""));
        }
        table.push(Value::Array(row));
    }
    table
}

/// Write `value` as pretty JSON, creating parent folders.
///
/// # Errors
///
/// Fails when the folder or file cannot be written.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let payload = serde_json::to_string_pretty(value)?;
    fs::write(path, payload).with_context(|| format!("failed to write {}", path.display()))
}

/// Human readable outcome of one batch.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_summary(
    out: &mut dyn Write,
    batch_name: &str,
    analysis: &BatchAnalysis,
    config: &AnalysisConfig,
    weights: Option<&WeightString>,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Relic Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;
    writeln!(out, "Batch: {batch_name}")?;
    writeln!(out, "Baseline DPS: {:.0}", analysis.baseline)?;
    writeln!(out, "Curves: {}", analysis.curves.len())?;
    writeln!(
        out,
        "{} kept up to +{} (reference {:.0})",
        config.stepped_curve, analysis.cutoff.bound, analysis.cutoff.reference_max
    )?;
    if let Some(last) = analysis.gain.last() {
        writeln!(
            out,
            "{}: {} points up to {}%",
            config.gain_curve,
            analysis.gain.len(),
            format_decimal(last.percent)
        )?;
    }
    match weights {
        Some(weights) => writeln!(out, "Weights: {}", weights.as_str().green())?,
        None => writeln!(out, "Weights: {}", "not generated".yellow())?,
    }
    Ok(())
}
