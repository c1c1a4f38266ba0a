//! Fixed names and tuning constants shared by the analysis pipeline.
//!
//! Everything that the engine output or the addon format depends on lives
//! here so the defaults in [`crate::config::AnalysisConfig`] have a single
//! source.

// Engine labels ------------------------------------------------------------
pub const BASELINE_LABEL: &str = "Template";
pub const STEPPED_CURVE_NAME: &str = "Weapon Item Level";
pub const GAIN_CURVE_NAME: &str = "% DPS Gain";

// Catalog ------------------------------------------------------------------
pub const SIMPLE_TRAIT_CATEGORY: &str = "Crucible";
pub const BASELINE_TRAIT_RANK: u32 = 4;
pub const PRIMARY_RANK_MIN: u32 = 5;
pub const PRIMARY_RANK_MAX: u32 = 7;
pub const SIMPLE_RANK_MIN: u32 = 1;
pub const SIMPLE_RANK_MAX: u32 = 3;

// Curve tuning -------------------------------------------------------------
pub const DEFAULT_STEP_SIZE: u32 = 5;
pub const REFERENCE_RANK: u32 = 3;
pub const RANK_OFFSET: u32 = 4;
pub const PERCENT_GRID_START: f64 = 0.5;
pub const PERCENT_GRID_END: f64 = 200.0;
pub const PERCENT_GRID_STEP: f64 = 0.5;
pub const STEPPED_DECIMALS: i32 = 0;
pub const WEIGHT_DECIMALS: i32 = 2;

// Weight string ------------------------------------------------------------
pub const WEIGHT_PREFIX: &str = "cruweight";
pub const WEIGHT_DELIMITER: &str = "^";
pub const WEIGHT_RANK_SEPARATOR: &str = " ";
pub const WEIGHT_ITEM_LEVEL_TOKEN: &str = "ilvl";
pub const WEIGHT_ITEM_LEVEL_UNIT: &str = "1";
pub const WEIGHT_TERMINATOR: &str = "end";
