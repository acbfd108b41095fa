//! Modgate API Library
//!
//! This crate provides the HTTP API handlers, error mapping, and
//! application setup.

mod api_doc;

pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::ErrorResponse;
