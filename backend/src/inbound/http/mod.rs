//! HTTP inbound adapter exposing REST endpoints.

pub mod catalog;
pub mod error;
pub mod health;
pub mod history;
pub mod pets;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod validation;

pub use error::ApiResult;
