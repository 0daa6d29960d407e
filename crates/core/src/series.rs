//! Rolling-window series store.
//!
//! Pure logic — no rendering, no networking. Each known sensor owns a
//! bounded sequence of readings; appending past the cap evicts the
//! oldest entry. Callers trigger chart/table refreshes themselves.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::sensor;
use crate::types::Timestamp;

/// One sensor measurement, immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub sensor_id: String,
    pub timestamp: Timestamp,
    pub value: f64,
    pub unit: String,
}

/// Bounded, time-ordered buffer of readings backing one chart.
///
/// Insertion is always at the tail; eviction always from the head.
/// Readings are kept in arrival order — out-of-order or duplicate
/// timestamps are accepted as-is.
#[derive(Debug, Clone)]
pub struct Series {
    readings: VecDeque<Reading>,
    cap: usize,
}

impl Series {
    pub fn new(cap: usize) -> Self {
        Self {
            readings: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Append a reading, evicting from the head if the window is full.
    pub fn push(&mut self, reading: Reading) {
        while self.readings.len() >= self.cap {
            self.readings.pop_front();
        }
        self.readings.push_back(reading);
    }

    /// Replace the whole window, keeping only the most recent `cap` entries.
    pub fn replace(&mut self, readings: Vec<Reading>) {
        self.readings.clear();
        let skip = readings.len().saturating_sub(self.cap);
        self.readings.extend(readings.into_iter().skip(skip));
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Most recent reading, if any.
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }
}

/// Per-sensor series, keyed by the catalog's sensor identifiers.
///
/// Appends for sensors not in the catalog are silently ignored (the
/// server may stream sensors this console does not display).
#[derive(Debug)]
pub struct SeriesStore {
    series: HashMap<&'static str, Series>,
}

impl SeriesStore {
    /// Create a store with one empty series per catalog sensor.
    pub fn new(cap: usize) -> Self {
        let series = sensor::SENSORS
            .iter()
            .map(|s| (s.id, Series::new(cap)))
            .collect();
        Self { series }
    }

    /// Append a reading to the named sensor's window.
    ///
    /// Unknown sensor ids are a no-op.
    pub fn append(&mut self, sensor_id: &str, reading: Reading) {
        match self.series.get_mut(sensor_id) {
            Some(series) => series.push(reading),
            None => {
                tracing::debug!(sensor = sensor_id, "Dropping reading for unknown sensor");
            }
        }
    }

    /// Replace a sensor's window with bulk-loaded history.
    ///
    /// Unknown sensor ids are a no-op.
    pub fn replace(&mut self, sensor_id: &str, readings: Vec<Reading>) {
        if let Some(series) = self.series.get_mut(sensor_id) {
            series.replace(readings);
        }
    }

    pub fn get(&self, sensor_id: &str) -> Option<&Series> {
        self.series.get(sensor_id)
    }

    /// Iterate over every (sensor id, series) pair in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Series)> {
        sensor::SENSORS
            .iter()
            .filter_map(|s| self.series.get(s.id).map(|series| (s.id, series)))
    }
}
