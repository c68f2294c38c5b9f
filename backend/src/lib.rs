//! Pet vital-stats backend.
//!
//! A hexagonal actix-web service: [`domain`] holds the stats engine and its
//! ports, [`outbound`] the storage adapters and [`inbound`] the HTTP and
//! WebSocket adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
