//! `fieldsense-console` -- terminal monitoring console.
//!
//! Wires the live event client, the series store, and the view
//! widgets into one running application: history is loaded over REST
//! at startup, then server events stream in over WebSocket and are
//! dispatched to the widgets until shutdown.

pub mod app;
pub mod context;
pub mod ops;
pub mod render;
