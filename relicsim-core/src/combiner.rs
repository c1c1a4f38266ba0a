//! Weighted merge of per-fight-style result tables.
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::numbers::round_to;

/// Three-part row key (`class, spec, setup` columns of a combinator table).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CompositeKey(pub String, pub String, pub String);

impl CompositeKey {
    #[must_use]
    pub fn new(a: impl Into<String>, b: impl Into<String>, c: impl Into<String>) -> Self {
        Self(a.into(), b.into(), c.into())
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0, self.1, self.2)
    }
}

/// Rows of one input table and the weight it contributes with.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTable {
    pub weight: f64,
    pub rows: Vec<(CompositeKey, f64)>,
}

/// Accumulated rows, in the order keys were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedTable {
    rows: Vec<(CompositeKey, f64)>,
    index: HashMap<CompositeKey, usize>,
}

impl CombinedTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `round(weight * raw)` to the row under `key`.
    pub fn accumulate(&mut self, key: &CompositeKey, weight: f64, raw: f64) {
        let contribution = round_to(weight * raw, 0);
        if let Some(&position) = self.index.get(key) {
            self.rows[position].1 += contribution;
        } else {
            self.index.insert(key.clone(), self.rows.len());
            self.rows.push((key.clone(), contribution));
        }
    }

    #[must_use]
    pub fn get(&self, key: &CompositeKey) -> Option<f64> {
        self.index.get(key).map(|&position| self.rows[position].1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[(CompositeKey, f64)] {
        &self.rows
    }
}

/// Merge `tables`, rounding every weighted contribution before it is summed.
#[must_use]
pub fn combine_tables(tables: &[WeightedTable]) -> CombinedTable {
    let mut combined = CombinedTable::new();
    for table in tables {
        for (key, raw) in &table.rows {
            combined.accumulate(key, table.weight, *raw);
        }
    }
    combined
}
