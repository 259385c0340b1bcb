// Renderer port - the collaborator that owns pixel output
use crate::domain::chart::ChartState;

/// Consumes the chart description and redraws the widget. The pipeline
/// never inspects the result.
pub trait ChartRenderer: Send + Sync {
    fn redraw(&self, chart: &ChartState);
}
