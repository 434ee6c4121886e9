//! Page-level statistics derived from the raw runs.

use crate::model::TextRun;

use super::LayoutThresholds;

/// Estimate the horizontal clustering tolerance for a page.
///
/// Takes the mean of the positive gaps between sorted run x-positions and
/// scales it, never going below the configured floor.
pub fn estimate_x_tolerance(runs: &[TextRun], thresholds: &LayoutThresholds) -> f32 {
    let mut xs: Vec<f32> = runs.iter().map(|r| r.x).collect();
    xs.sort_by(f32::total_cmp);

    let gaps: Vec<f32> = xs
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|gap| *gap > 0.0)
        .collect();

    if gaps.is_empty() {
        return thresholds.default_tolerance;
    }

    let mean = gaps.iter().sum::<f32>() / gaps.len() as f32;
    (mean * thresholds.tolerance_factor).max(thresholds.tolerance_floor)
}

/// Median of the positive glyph heights on a page.
///
/// For an even count the upper of the two middle values is used. Returns
/// `None` when no run carries a height.
pub fn median_height(runs: &[TextRun]) -> Option<f32> {
    let mut heights: Vec<f32> = runs
        .iter()
        .map(|r| r.height)
        .filter(|h| *h > 0.0)
        .collect();
    if heights.is_empty() {
        return None;
    }
    heights.sort_by(f32::total_cmp);
    Some(heights[heights.len() / 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32) -> TextRun {
        TextRun::new("t", x, 0.0, "F1", 10.0)
    }

    #[test]
    fn test_tolerance_from_gaps() {
        let t = LayoutThresholds::default();
        // gaps 20, 20, 50
        let runs = vec![at(100.0), at(10.0), at(30.0), at(50.0)];
        assert!((estimate_x_tolerance(&runs, &t) - 45.0).abs() < 0.01);
    }

    #[test]
    fn test_tolerance_floor() {
        let t = LayoutThresholds::default();
        let runs = vec![at(0.0), at(2.0), at(4.0)];
        assert_eq!(estimate_x_tolerance(&runs, &t), 10.0);
    }

    #[test]
    fn test_tolerance_without_gaps() {
        let t = LayoutThresholds::default();
        assert_eq!(estimate_x_tolerance(&[], &t), 15.0);
        assert_eq!(estimate_x_tolerance(&[at(5.0), at(5.0)], &t), 15.0);
    }

    #[test]
    fn test_median_height() {
        let mut runs: Vec<TextRun> = [10.0, 12.0, 0.0, 24.0]
            .iter()
            .map(|h| TextRun::new("t", 0.0, 0.0, "F1", *h))
            .collect();
        assert_eq!(median_height(&runs), Some(12.0));

        runs.truncate(0);
        assert_eq!(median_height(&runs), None);
    }
}
