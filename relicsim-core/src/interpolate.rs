//! Linear densification of the stepped item level curve.
use crate::analysis::AnalysisError;
use crate::config::ConfigError;
use crate::constants::STEPPED_DECIMALS;
use crate::curve::Curve;
use crate::numbers::{round_to, u32_to_f64};

/// Fill every rank between adjacent multiples of `step` by linear
/// interpolation. The segment below the first step starts at `baseline`.
///
/// Ranks that are not multiples of `step` are dropped first. Sampled values
/// are kept as-is; interpolated ones are rounded to whole numbers.
///
/// # Errors
///
/// Returns `AnalysisError::MissingStep` when a sampled step has no sample
/// one step below it, and `AnalysisError::Config` for a zero step size.
pub fn interpolate_steps(
    curve: &mut Curve,
    curve_name: &str,
    baseline: f64,
    step: u32,
) -> Result<(), AnalysisError> {
    if step == 0 {
        return Err(AnalysisError::Config(ConfigError::MinViolation {
            field: "step_size",
            min: 1,
            value: step,
        }));
    }
    curve.retain(|rank, _| rank % step == 0);
    let sampled: Vec<(u32, f64)> = curve.iter().collect();
    let divisor = u32_to_f64(step);

    for &(rank, value) in &sampled {
        let floor = rank - step;
        let prev = if floor == 0 {
            baseline
        } else {
            curve.get(floor).ok_or_else(|| AnalysisError::MissingStep {
                curve: curve_name.to_string(),
                rank: floor,
            })?
        };
        let increment = (value - prev) / divisor;
        for i in 1..step {
            let interpolated = prev + u32_to_f64(i) * increment;
            curve.insert(floor + i, round_to(interpolated, STEPPED_DECIMALS));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stepped(points: &[(u32, f64)]) -> Curve {
        points.iter().copied().collect()
    }

    #[test]
    fn densifies_between_steps() {
        let mut curve = stepped(&[(5, 1050.0), (10, 1120.0)]);
        interpolate_steps(&mut curve, "Weapon Item Level", 1000.0, 5).unwrap();
        assert_eq!(curve.ranks().collect::<Vec<_>>(), (1..=10).collect::<Vec<_>>());
        assert_eq!(curve.get(1), Some(1010.0));
        assert_eq!(curve.get(4), Some(1040.0));
        assert_eq!(curve.get(5), Some(1050.0));
        assert_eq!(curve.get(6), Some(1064.0));
        assert_eq!(curve.get(9), Some(1106.0));
        assert_eq!(curve.get(10), Some(1120.0));
    }

    #[test]
    fn endpoints_survive_and_midpoints_lie_on_the_line() {
        let (a, b) = (1033.0, 1071.0);
        let mut curve = stepped(&[(4, a), (8, b)]);
        interpolate_steps(&mut curve, "Weapon Item Level", 1000.0, 4).unwrap();
        assert_eq!(curve.get(4), Some(a));
        assert_eq!(curve.get(8), Some(b));
        for i in 1..4_u32 {
            let exact = a + f64::from(i) * (b - a) / 4.0;
            let actual = curve.get(4 + i).unwrap();
            assert!((actual - exact).abs() <= 0.5, "rank {}", 4 + i);
        }
    }

    #[test]
    fn interpolated_values_round_half_away_from_zero() {
        let mut curve = stepped(&[(4, 1033.0), (8, 1071.0)]);
        interpolate_steps(&mut curve, "Weapon Item Level", 1000.0, 4).unwrap();
        // increments of 9.5: 1042.5, 1052.0, 1061.5
        assert_eq!(curve.get(5), Some(1043.0));
        assert_eq!(curve.get(6), Some(1052.0));
        assert_eq!(curve.get(7), Some(1062.0));
        // 1000 + 8.25 * i below the first step
        assert_eq!(curve.get(1), Some(1008.0));
        assert_eq!(curve.get(2), Some(1017.0));
        assert_eq!(curve.get(3), Some(1025.0));
    }

    #[test]
    fn off_step_ranks_are_removed() {
        let mut curve = stepped(&[(3, 999.0), (5, 1050.0), (7, 999.0)]);
        interpolate_steps(&mut curve, "Weapon Item Level", 1000.0, 5).unwrap();
        assert_eq!(curve.max_rank(), Some(5));
        assert_eq!(curve.get(3), Some(1030.0));
    }

    #[test]
    fn empty_curve_is_a_no_op() {
        let mut curve = Curve::new();
        interpolate_steps(&mut curve, "Weapon Item Level", 1000.0, 5).unwrap();
        assert!(curve.is_empty());
    }

    #[test]
    fn step_size_one_keeps_samples() {
        let mut curve = stepped(&[(1, 1004.0), (2, 1009.0)]);
        interpolate_steps(&mut curve, "Weapon Item Level", 1000.0, 1).unwrap();
        assert_eq!(curve.len(), 2);
    }

    #[test]
    fn gaps_between_steps_are_reported() {
        let mut curve = stepped(&[(5, 1050.0), (15, 1150.0)]);
        let err = interpolate_steps(&mut curve, "Weapon Item Level", 1000.0, 5).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MissingStep {
                curve: "Weapon Item Level".to_string(),
                rank: 10
            }
        );
    }

    #[test]
    fn zero_step_is_refused() {
        let mut curve = stepped(&[(5, 1050.0)]);
        assert!(matches!(
            interpolate_steps(&mut curve, "Weapon Item Level", 1000.0, 0),
            Err(AnalysisError::Config(_))
        ));
    }
}
