//! Domain types and pure logic for the FieldSense monitoring console.
//!
//! Everything in this crate is UI-free and network-free: the sensor
//! catalog, rolling-window series store, threshold evaluation, alert
//! types, formatting/CSV utilities, and form validation. Callers are
//! responsible for wiring these into views and transports.

pub mod alert;
pub mod csv;
pub mod error;
pub mod format;
pub mod forms;
pub mod sensor;
pub mod series;
pub mod threshold;
pub mod types;
