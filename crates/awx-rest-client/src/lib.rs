//! REST API client for AWX
//!
//! This crate provides an HTTP client for the AWX `/api/v2/` REST API with
//! typed accessors for job templates and workflow job templates. It supports
//! Basic and OAuth2 bearer authentication and validates every model before
//! it is sent.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod resources;
pub mod transport;

pub use auth::*;
pub use client::*;
pub use config::*;
pub use error::*;
pub use resources::*;
pub use transport::*;

pub use awx_rest_api_contract as contract;
