// Chart reconciler - builds the chart once, then patches it in place
use crate::domain::chart::{ChartOptions, ChartState, Dataset};
use crate::domain::series::{Parameters, Series};
use crate::domain::threshold;

/// Owns the live chart description. The first reconcile builds it; every
/// later one patches the existing state so the underlying widget is never
/// destroyed and recreated.
#[derive(Default)]
pub struct ChartReconciler {
    chart: Option<ChartState>,
}

impl ChartReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ChartState> {
        self.chart.as_ref()
    }

    pub fn reconcile(
        &mut self,
        series: &Series,
        params: &Parameters,
        primary_label: &str,
    ) -> &ChartState {
        match &mut self.chart {
            Some(existing) => {
                Self::patch(existing, series, params, primary_label);
                existing
            }
            empty => empty.insert(Self::build(series, params, primary_label)),
        }
    }

    /// Construct a fresh chart: the series truncated to the first
    /// `max_points` points, per-point colors from classification, and the
    /// threshold repeated as a constant second line.
    pub fn build(series: &Series, params: &Parameters, primary_label: &str) -> ChartState {
        let Series { labels, values } = series.head(params.max_points);
        let point_colors = threshold::point_colors(&values, params.threshold);
        ChartState {
            primary: Dataset::primary(primary_label.to_string(), values, point_colors),
            threshold: Dataset::threshold_line(params.threshold, labels.len()),
            labels,
            options: ChartOptions::default(),
        }
    }

    /// Recompute into the existing chart. Merges the primary dataset's
    /// data, label and point colors without touching fields the renderer
    /// owns; overwrites the threshold values and the labels outright.
    pub fn patch(existing: &mut ChartState, series: &Series, params: &Parameters, primary_label: &str) {
        let Series { labels, values } = series.head(params.max_points);
        existing.primary.point_colors = threshold::point_colors(&values, params.threshold);
        existing.primary.data = values;
        existing.primary.label = primary_label.to_string();
        existing.threshold.data = vec![params.threshold; labels.len()];
        existing.labels = labels;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::SeriesId;

    fn stock_series() -> Series {
        Series::new(
            vec!["t1".into(), "t2".into(), "t3".into()],
            vec![100.0, 110.0, 90.0],
        )
    }

    fn params(threshold: f64, max_points: usize) -> Parameters {
        Parameters {
            series: SeriesId::Stock,
            threshold,
            max_points,
        }
    }

    #[test]
    fn build_classifies_against_the_threshold() {
        let chart = ChartReconciler::build(&stock_series(), &params(105.0, 10), "Close Price");

        assert_eq!(chart.labels, vec!["t1", "t2", "t3"]);
        assert_eq!(chart.primary.data, vec![100.0, 110.0, 90.0]);
        assert_eq!(chart.primary.point_colors, vec!["green", "red", "green"]);
        assert_eq!(chart.threshold.data, vec![105.0, 105.0, 105.0]);
        assert!(chart.threshold.point_colors.is_empty());
    }

    #[test]
    fn build_truncates_to_the_first_points() {
        let chart = ChartReconciler::build(&stock_series(), &params(105.0, 2), "Close Price");

        assert_eq!(chart.labels, vec!["t1", "t2"]);
        assert_eq!(chart.primary.data, vec![100.0, 110.0]);
        assert_eq!(chart.primary.point_colors, vec!["green", "red"]);
        assert_eq!(chart.threshold.data.len(), 2);
    }

    #[test]
    fn build_keeps_everything_when_max_points_covers_the_series() {
        let chart = ChartReconciler::build(&stock_series(), &params(105.0, 99), "Close Price");
        assert_eq!(chart.labels.len(), 3);
    }

    #[test]
    fn patch_after_build_with_same_inputs_is_idempotent() {
        let series = stock_series();
        let p = params(105.0, 2);

        let built = ChartReconciler::build(&series, &p, "Close Price");
        let mut patched = built.clone();
        ChartReconciler::patch(&mut patched, &series, &p, "Close Price");

        assert_eq!(patched, built);
    }

    #[test]
    fn patch_preserves_renderer_owned_fields() {
        let series = stock_series();
        let mut chart = ChartReconciler::build(&series, &params(105.0, 10), "Close Price");
        // The rendering side toggled the primary line off via the legend.
        chart.primary.hidden = true;

        ChartReconciler::patch(&mut chart, &series, &params(95.0, 10), "Close Price");

        assert!(chart.primary.hidden);
        assert_eq!(chart.primary.point_colors, vec!["red", "red", "green"]);
        assert_eq!(chart.threshold.data, vec![95.0, 95.0, 95.0]);
    }

    #[test]
    fn patch_resizes_the_threshold_line_with_the_view() {
        let series = stock_series();
        let mut chart = ChartReconciler::build(&series, &params(105.0, 3), "Close Price");

        ChartReconciler::patch(&mut chart, &series, &params(105.0, 2), "Close Price");

        assert_eq!(chart.labels, vec!["t1", "t2"]);
        assert_eq!(chart.threshold.data, vec![105.0, 105.0]);
    }

    #[test]
    fn reconcile_builds_once_then_patches_in_place() {
        let series = stock_series();
        let mut reconciler = ChartReconciler::new();
        assert!(reconciler.current().is_none());

        reconciler.reconcile(&series, &params(105.0, 10), "Close Price");
        reconciler.reconcile(&series, &params(115.0, 10), "Close Price");

        let chart = reconciler.current().unwrap();
        assert_eq!(chart.threshold.data, vec![115.0, 115.0, 115.0]);
        assert_eq!(
            chart.primary.point_colors,
            vec!["green", "green", "green"],
            "110 does not exceed a 115 threshold"
        );
    }
}
