//! Decoding of raw profileset labels emitted by the engine.

/// What a single result label refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLabel<'a> {
    /// The unmodified reference configuration.
    Baseline,
    /// `<curve>_<rank>`; rank is always at least 1.
    CurveSample { curve: &'a str, rank: u32 },
    /// Auxiliary series or malformed labels.
    Unrecognized,
}

/// Classify `label`. An exact match of `baseline_label` wins over the
/// `<curve>_<rank>` form; the rank is split off at the last underscore.
#[must_use]
pub fn decode_label<'a>(label: &'a str, baseline_label: &str) -> SampleLabel<'a> {
    if label == baseline_label {
        return SampleLabel::Baseline;
    }
    let Some((curve, digits)) = label.rsplit_once('_') else {
        return SampleLabel::Unrecognized;
    };
    if curve.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return SampleLabel::Unrecognized;
    }
    match digits.parse::<u32>() {
        Ok(rank) if rank > 0 => SampleLabel::CurveSample { curve, rank },
        _ => SampleLabel::Unrecognized,
    }
}
