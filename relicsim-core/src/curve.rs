//! Curve storage shared by every pipeline stage.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Rank → metric value. Rank 0 is the baseline and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curve {
    points: BTreeMap<u32, f64>,
}

impl Curve {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous one. Rank 0 is refused.
    pub fn insert(&mut self, rank: u32, value: f64) -> Option<f64> {
        if rank == 0 {
            return None;
        }
        self.points.insert(rank, value)
    }

    #[must_use]
    pub fn get(&self, rank: u32) -> Option<f64> {
        self.points.get(&rank).copied()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(u32, f64) -> bool) {
        self.points.retain(|rank, value| keep(*rank, *value));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn min_rank(&self) -> Option<u32> {
        self.points.keys().next().copied()
    }

    #[must_use]
    pub fn max_rank(&self) -> Option<u32> {
        self.points.keys().next_back().copied()
    }

    /// Value at the `position`-th rank in ascending order (1-based).
    #[must_use]
    pub fn nth_value(&self, position: u32) -> Option<f64> {
        let index = usize::try_from(position.checked_sub(1)?).ok()?;
        self.points.values().nth(index).copied()
    }

    /// Ranks in ascending order.
    pub fn ranks(&self) -> impl Iterator<Item = u32> + '_ {
        self.points.keys().copied()
    }

    /// `(rank, value)` pairs in ascending rank order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.points.iter().map(|(rank, value)| (*rank, *value))
    }
}

impl FromIterator<(u32, f64)> for Curve {
    fn from_iter<I: IntoIterator<Item = (u32, f64)>>(iter: I) -> Self {
        let mut curve = Self::new();
        for (rank, value) in iter {
            curve.insert(rank, value);
        }
        curve
    }
}

/// Named curves of one batch. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveSet {
    curves: BTreeMap<String, Curve>,
}

impl CurveSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Curve registered under `name`, created empty on first use.
    pub fn entry(&mut self, name: &str) -> &mut Curve {
        self.curves.entry(name.to_string()).or_default()
    }

    pub fn insert(&mut self, name: impl Into<String>, curve: Curve) -> Option<Curve> {
        self.curves.insert(name.into(), curve)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Curve> {
        self.curves.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Curve> {
        self.curves.get_mut(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Curves sorted by name.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Curve> {
        self.curves.iter()
    }

    /// Curves other than `excluded`, sorted by name.
    pub fn iter_except<'a>(
        &'a self,
        excluded: &'a [&'a str],
    ) -> impl Iterator<Item = (&'a String, &'a Curve)> + 'a {
        self.curves
            .iter()
            .filter(move |(name, _)| !excluded.contains(&name.as_str()))
    }
}

impl<'a> IntoIterator for &'a CurveSet {
    type Item = (&'a String, &'a Curve);
    type IntoIter = btree_map::Iter<'a, String, Curve>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}

/// One point of the percent-gain reference curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainPoint {
    pub percent: f64,
    pub value: f64,
}

/// Percent gain → absolute metric value, ascending by percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GainCurve {
    points: Vec<GainPoint>,
}

impl GainCurve {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, percent: f64, value: f64) {
        self.points.push(GainPoint { percent, value });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<GainPoint> {
        self.points.last().copied()
    }

    #[must_use]
    pub fn points(&self) -> &[GainPoint] {
        &self.points
    }
}
