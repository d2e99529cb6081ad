//! HTTP inbound adapter exposing REST endpoints.

pub mod account;
pub mod auth;
pub mod error;
pub mod health;
pub mod papers;
pub mod state;

pub use error::ApiResult;
