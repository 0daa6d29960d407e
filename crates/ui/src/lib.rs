//! View-binding layer for the FieldSense console.
//!
//! No rendering toolkit lives here: charts draw through the
//! [`chart::RenderTarget`] trait, tables and lists are plain bounded
//! collections, and the action controller runs any future. Everything
//! is unit-testable without a UI runtime, and the console binary
//! supplies concrete render targets.

pub mod actions;
pub mod chart;
pub mod logs;
pub mod notify;
pub mod status;
pub mod table;
