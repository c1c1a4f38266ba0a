//! Weighted composite of per-fight-style combinator reports.
use anyhow::{Context, Result, bail};
use log::{info, warn};
use relicsim_core::numbers::round_f64_to_i64;
use relicsim_core::{CombinedTable, CompositeKey, WeightedTable, combine_tables};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct RawModel {
    #[serde(rename = "Fightstyle_model")]
    fightstyle_model: Map<String, Value>,
}

/// Fight style weights of a composite model file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeModel {
    pub fightstyle_model: Vec<(String, f64)>,
}

impl CompositeModel {
    /// Parse a model document. Fights keep the order they are written in.
    ///
    /// # Errors
    ///
    /// Fails when there is no `Fightstyle_model` object or a weight is not a
    /// number.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawModel = serde_json::from_str(json).context("unexpected composite model")?;
        let mut fightstyle_model = Vec::with_capacity(raw.fightstyle_model.len());
        for (fight, weight) in raw.fightstyle_model {
            let Some(weight) = weight.as_f64() else {
                bail!("weight of {fight} is not a number: {weight}");
            };
            fightstyle_model.push((fight, weight));
        }
        Ok(Self { fightstyle_model })
    }

    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read model {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to parse model {}", path.display()))
    }

    /// Fights that take part, i.e. with a weight above zero.
    pub fn active_fights(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fightstyle_model
            .iter()
            .filter(|(_, weight)| *weight > 0.0)
            .map(|(fight, weight)| (fight.as_str(), *weight))
    }
}

/// Per-fight inputs of a composite run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRequest {
    pub reports_dir: PathBuf,
    pub profile: String,
}

impl CompositeRequest {
    #[must_use]
    pub fn report_csv(&self, fight: &str) -> PathBuf {
        self.reports_dir
            .join(format!("Combinator_{fight}_{}.csv", self.profile))
    }

    #[must_use]
    pub fn report_meta(&self, fight: &str) -> PathBuf {
        self.reports_dir
            .join("meta")
            .join(format!("Combinator_{fight}_{}.json", self.profile))
    }

    #[must_use]
    pub fn default_output(&self) -> PathBuf {
        self.reports_dir
            .join(format!("Combinator_Composite_{}.csv", self.profile))
    }
}

/// Check that every active fight has a report and metadata, all from one
/// engine build and of one length. Returns the weighted tables in model
/// file order.
///
/// # Errors
///
/// Fails on the first missing file, unreadable file, build date mismatch or
/// row count mismatch.
pub fn verify_reports(
    model: &CompositeModel,
    request: &CompositeRequest,
) -> Result<Vec<WeightedTable>> {
    let mut tables = Vec::new();
    let mut build_date: Option<String> = None;
    let mut row_count: Option<usize> = None;

    for (fight, weight) in model.active_fights() {
        let csv_path = request.report_csv(fight);
        if !csv_path.is_file() {
            bail!("report missing: {}", csv_path.display());
        }
        let meta_path = request.report_meta(fight);
        if !meta_path.is_file() {
            bail!("report meta missing: {}", meta_path.display());
        }

        let date = read_build_date(&meta_path)?;
        match &build_date {
            None => build_date = Some(date),
            Some(expected) if *expected != date => bail!(
                "{} was built on {date:?} but earlier reports on {expected:?}",
                meta_path.display()
            ),
            Some(_) => {}
        }

        let contents = fs::read_to_string(&csv_path)
            .with_context(|| format!("failed to read {}", csv_path.display()))?;
        let lines = count_rows(&contents);
        match row_count {
            None => row_count = Some(lines),
            Some(expected) if expected != lines => bail!(
                "{} has {lines} rows but earlier reports have {expected}",
                csv_path.display()
            ),
            Some(_) => {}
        }

        info!("Model {fight} : {weight}");
        tables.push(WeightedTable {
            weight,
            rows: parse_rows(&contents, &csv_path),
        });
    }
    Ok(tables)
}

/// Verify, combine and write the composite CSV, replacing `output` if it
/// exists.
///
/// # Errors
///
/// Propagates verification and write failures.
pub fn run_composite(
    model: &CompositeModel,
    request: &CompositeRequest,
    output: &Path,
) -> Result<CombinedTable> {
    info!("Verifying all reports needed...");
    let tables = verify_reports(model, request)?;
    info!("Combining data from {} csv files...", tables.len());
    let combined = combine_tables(&tables);

    info!("Writing data in {}...", output.display());
    let file =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    write_csv(&mut writer, &combined)?;
    writer.flush()?;
    Ok(combined)
}

/// `k1,k2,k3,value` lines with integer values.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_csv(out: &mut dyn Write, table: &CombinedTable) -> Result<()> {
    for (key, value) in table.rows() {
        writeln!(out, "{key},{}", round_f64_to_i64(*value))?;
    }
    Ok(())
}

fn read_build_date(meta_path: &Path) -> Result<String> {
    let raw = fs::read_to_string(meta_path)
        .with_context(|| format!("failed to read {}", meta_path.display()))?;
    let meta: Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", meta_path.display()))?;
    Ok(meta
        .get("build_date")
        .map(|date| date.as_str().map_or_else(|| date.to_string(), str::to_string))
        .unwrap_or_default())
}

/// Records in a combinator CSV, blank lines included.
fn count_rows(contents: &str) -> usize {
    contents.lines().count()
}

/// Fields of one CSV record. Double-quoted fields may hold commas and `""`
/// escapes; the quotes are stripped. Records never span lines.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Rows of a combinator CSV. Blank lines and short rows are skipped, the
/// latter with a warning; values that are not numbers count as 0.
fn parse_rows(contents: &str, source: &Path) -> Vec<(CompositeKey, f64)> {
    let mut rows = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let columns = split_record(line);
        if columns.len() < 4 {
            warn!(
                "{}:{}: expected 4 columns, found {}; skipping",
                source.display(),
                index + 1,
                columns.len()
            );
            continue;
        }
        let value = columns[3].trim().parse::<f64>().unwrap_or(0.0);
        rows.push((
            CompositeKey::new(columns[0].as_str(), columns[1].as_str(), columns[2].as_str()),
            value,
        ));
    }
    rows
}
