//! Chart adapter: binds rolling-window series to render targets.
//!
//! A chart is created once per sensor at bind time (threshold guide
//! lines included — they are never recomputed per update). Refreshing
//! copies the current series into a [`ChartFrame`] and asks the target
//! for a cheap, non-animated redraw.

use std::collections::HashMap;

use fieldsense_core::sensor;
use fieldsense_core::series::SeriesStore;
use fieldsense_core::threshold::ThresholdMap;
use fieldsense_core::types::Timestamp;

/// Static description of a chart, handed to the target once at bind.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub sensor_id: String,
    pub label: String,
    pub color: String,
    pub unit: String,
    /// Horizontal guide lines at the sensor's min/max thresholds.
    pub guides: Vec<Guide>,
}

/// One static horizontal guide line.
#[derive(Debug, Clone, PartialEq)]
pub struct Guide {
    pub label: String,
    pub value: f64,
}

/// A snapshot of the series data for one redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub points: Vec<(Timestamp, f64)>,
}

/// Rendering seam for one chart widget.
///
/// `create` may run the target's full layout/animation pipeline;
/// `update` must redraw in place without replaying animations, so
/// real-time refreshes stay cheap.
pub trait RenderTarget {
    fn create(&mut self, spec: &ChartSpec);
    fn update(&mut self, frame: &ChartFrame);
}

struct BoundChart {
    target: Box<dyn RenderTarget>,
}

/// Registry of persistent per-sensor charts.
pub struct ChartAdapter {
    thresholds: ThresholdMap,
    charts: HashMap<String, BoundChart>,
}

impl ChartAdapter {
    pub fn new(thresholds: ThresholdMap) -> Self {
        Self {
            thresholds,
            charts: HashMap::new(),
        }
    }

    /// Bind a render target to a sensor and draw whatever the store
    /// already holds. Unknown sensor ids are a no-op.
    pub fn bind(&mut self, sensor_id: &str, mut target: Box<dyn RenderTarget>, store: &SeriesStore) {
        if !sensor::is_known(sensor_id) {
            tracing::debug!(sensor = sensor_id, "Not binding chart for unknown sensor");
            return;
        }

        let mut guides = Vec::new();
        if let Some(threshold) = self.thresholds.get(sensor_id) {
            guides.push(Guide {
                label: format!("Min: {}", threshold.min),
                value: threshold.min,
            });
            guides.push(Guide {
                label: format!("Max: {}", threshold.max),
                value: threshold.max,
            });
        }

        target.create(&ChartSpec {
            sensor_id: sensor_id.to_string(),
            label: sensor::label(sensor_id).to_string(),
            color: sensor::color(sensor_id).to_string(),
            unit: sensor::unit(sensor_id).to_string(),
            guides,
        });

        self.charts
            .insert(sensor_id.to_string(), BoundChart { target });
        self.refresh(sensor_id, store);
    }

    /// Copy the sensor's current series into the chart and redraw.
    /// No-op for sensors without a bound chart.
    pub fn refresh(&mut self, sensor_id: &str, store: &SeriesStore) {
        let Some(chart) = self.charts.get_mut(sensor_id) else {
            return;
        };
        let Some(series) = store.get(sensor_id) else {
            return;
        };

        let frame = ChartFrame {
            points: series.iter().map(|r| (r.timestamp, r.value)).collect(),
        };
        chart.target.update(&frame);
    }

    /// Redraw every bound chart from the store.
    pub fn refresh_all(&mut self, store: &SeriesStore) {
        let bound: Vec<String> = self.charts.keys().cloned().collect();
        for sensor_id in bound {
            self.refresh(&sensor_id, store);
        }
    }

    pub fn is_bound(&self, sensor_id: &str) -> bool {
        self.charts.contains_key(sensor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fieldsense_core::series::Reading;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every call so tests can assert on the draw sequence.
    #[derive(Default)]
    struct Recording {
        created: Vec<ChartSpec>,
        updates: Vec<ChartFrame>,
    }

    struct RecordingTarget(Rc<RefCell<Recording>>);

    impl RenderTarget for RecordingTarget {
        fn create(&mut self, spec: &ChartSpec) {
            self.0.borrow_mut().created.push(spec.clone());
        }

        fn update(&mut self, frame: &ChartFrame) {
            self.0.borrow_mut().updates.push(frame.clone());
        }
    }

    fn reading(n: i64) -> Reading {
        Reading {
            sensor_id: "ph".into(),
            timestamp: Utc.timestamp_opt(1_700_000_000 + n, 0).unwrap(),
            value: n as f64,
            unit: "pH".into(),
        }
    }

    fn thresholds() -> ThresholdMap {
        ThresholdMap::from_json(r#"{"ph": {"min": 6.0, "max": 8.0}}"#).unwrap()
    }

    #[test]
    fn bind_creates_once_with_guides_then_draws_initial_data() {
        let mut store = SeriesStore::new(10);
        store.append("ph", reading(1));

        let rec = Rc::new(RefCell::new(Recording::default()));
        let mut adapter = ChartAdapter::new(thresholds());
        adapter.bind("ph", Box::new(RecordingTarget(rec.clone())), &store);

        let recording = rec.borrow();
        assert_eq!(recording.created.len(), 1);
        let spec = &recording.created[0];
        assert_eq!(spec.label, "pH");
        assert_eq!(spec.guides.len(), 2);
        assert_eq!(spec.guides[0].value, 6.0);
        assert_eq!(spec.guides[1].label, "Max: 8");

        assert_eq!(recording.updates.len(), 1);
        assert_eq!(recording.updates[0].points.len(), 1);
    }

    #[test]
    fn refresh_updates_without_recreating() {
        let mut store = SeriesStore::new(10);
        let rec = Rc::new(RefCell::new(Recording::default()));
        let mut adapter = ChartAdapter::new(thresholds());
        adapter.bind("ph", Box::new(RecordingTarget(rec.clone())), &store);

        store.append("ph", reading(1));
        store.append("ph", reading(2));
        adapter.refresh("ph", &store);

        let recording = rec.borrow();
        assert_eq!(recording.created.len(), 1);
        assert_eq!(recording.updates.last().unwrap().points.len(), 2);
    }

    #[test]
    fn no_guides_without_a_configured_threshold() {
        let store = SeriesStore::new(10);
        let rec = Rc::new(RefCell::new(Recording::default()));
        let mut adapter = ChartAdapter::new(ThresholdMap::default());
        adapter.bind("humidity", Box::new(RecordingTarget(rec.clone())), &store);

        assert!(rec.borrow().created[0].guides.is_empty());
    }

    #[test]
    fn unknown_sensor_binds_and_refreshes_as_noop() {
        let store = SeriesStore::new(10);
        let rec = Rc::new(RefCell::new(Recording::default()));
        let mut adapter = ChartAdapter::new(ThresholdMap::default());

        adapter.bind("geiger", Box::new(RecordingTarget(rec.clone())), &store);
        adapter.refresh("geiger", &store);

        assert!(!adapter.is_bound("geiger"));
        assert!(rec.borrow().created.is_empty());
    }
}
