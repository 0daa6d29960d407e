//! Network clients for the FieldSense console.
//!
//! [`live`] maintains the persistent WebSocket subscription that feeds
//! the dashboard, [`reconnect`] implements the bounded linear-backoff
//! retry policy, and [`api`] wraps the server's REST action endpoints.

pub mod api;
pub mod live;
pub mod reconnect;
