//! User-entered form payloads, validated client-side before submission.
//!
//! A form that fails validation is never sent; the caller surfaces the
//! first message inline next to the form.

use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::sensor;
use crate::types::Timestamp;

/// Payload for the "force anomaly" test modal.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ForceAnomalyForm {
    #[validate(custom(function = known_sensor))]
    pub sensor_name: String,
    #[validate(length(min = 1, message = "Sélectionner un type d'anomalie"))]
    pub anomaly_type: String,
}

/// Payload for the maintenance scheduling modal.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ScheduleMaintenanceForm {
    #[validate(custom(function = known_sensor))]
    pub sensor_name: String,
    #[validate(length(min = 1, message = "Sélectionner un type de maintenance"))]
    pub maintenance_type: String,
    pub scheduled_date: Timestamp,
    #[validate(length(min = 1, message = "Description requise"))]
    pub description: String,
}

impl ScheduleMaintenanceForm {
    /// Full validation, including the date being in the future.
    ///
    /// `now` is passed in so the check is deterministic in tests.
    pub fn validate_at(&self, now: Timestamp) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        if self.scheduled_date <= now {
            return Err(CoreError::Validation(
                "La date planifiée doit être dans le futur".into(),
            ));
        }
        Ok(())
    }
}

/// One sensor's threshold edit from the configuration page.
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = threshold_bounds))]
pub struct ThresholdForm {
    #[validate(custom(function = known_sensor))]
    pub sensor_name: String,
    pub min: f64,
    pub max: f64,
}

fn known_sensor(id: &str) -> Result<(), ValidationError> {
    if sensor::is_known(id) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_sensor"))
    }
}

fn threshold_bounds(form: &ThresholdForm) -> Result<(), ValidationError> {
    if form.min >= form.max {
        return Err(ValidationError::new("min_not_below_max"));
    }
    Ok(())
}
