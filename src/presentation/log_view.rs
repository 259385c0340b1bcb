// Tracing-backed stand-ins for the rendering and notification surfaces
use crate::application::chart_renderer::ChartRenderer;
use crate::application::notifier::UserNotifier;
use crate::domain::chart::ChartState;
use crate::domain::threshold::EXCEEDED_COLOR;
use std::time::Duration;

pub struct LogChartRenderer;

impl ChartRenderer for LogChartRenderer {
    fn redraw(&self, chart: &ChartState) {
        let exceeding = chart
            .primary
            .point_colors
            .iter()
            .filter(|color| *color == EXCEEDED_COLOR)
            .count();
        tracing::info!(
            "redraw: {} - {} points, {} above the threshold line at {}",
            chart.primary.label,
            chart.labels.len(),
            exceeding,
            chart.threshold.data.first().copied().unwrap_or_default()
        );
    }
}

pub struct LogNotifier;

impl UserNotifier for LogNotifier {
    fn notify(&self, message: &str, duration: Duration) {
        tracing::info!("notice ({} ms): {}", duration.as_millis(), message);
    }
}
