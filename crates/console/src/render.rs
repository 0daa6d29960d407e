//! Headless chart rendering for the terminal console.
//!
//! Charts render as structured log lines: one at creation with the
//! static styling, then one per redraw with the latest point. The
//! widget layer stays agnostic of this; it only sees [`RenderTarget`].

use fieldsense_core::format;
use fieldsense_ui::chart::{ChartFrame, ChartSpec, RenderTarget};

/// Renders chart updates as tracing events.
#[derive(Debug, Default)]
pub struct TraceChart {
    label: String,
    unit: String,
}

impl TraceChart {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderTarget for TraceChart {
    fn create(&mut self, spec: &ChartSpec) {
        self.label = spec.label.clone();
        self.unit = spec.unit.clone();
        tracing::info!(
            sensor = %spec.sensor_id,
            label = %spec.label,
            color = %spec.color,
            guides = spec.guides.len(),
            "Chart bound",
        );
    }

    fn update(&mut self, frame: &ChartFrame) {
        if let Some((timestamp, value)) = frame.points.last() {
            tracing::debug!(
                label = %self.label,
                latest = %format::format_value(*value, &self.unit),
                at = %timestamp.to_rfc3339(),
                points = frame.points.len(),
                "Chart redraw",
            );
        }
    }
}
