//! Inbound server event model and dispatch.
//!
//! The server pushes named events over the live connection as JSON
//! envelopes. This crate deserializes them into a strongly-typed
//! [`messages::ServerEvent`] and fans them out to per-channel handlers
//! via [`dispatcher::Dispatcher`].

pub mod dispatcher;
pub mod messages;
