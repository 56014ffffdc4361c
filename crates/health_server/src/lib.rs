//! HTTP surface for the health records backend.
//!
//! `api` is transport-independent and testable without a socket; `server`
//! adapts it to warp.

pub mod api;
pub mod envelope;
pub mod server;

pub use api::{dispatch, ApiContext, ApiRequest, Resource, API_PREFIX};
pub use envelope::{ApiResponse, ResponseStatus};
pub use server::{serve, ServerError};
