//! Outbound adapters implementing the driven ports.
//!
//! [`memory`] keeps everything in process and backs tests and local runs;
//! [`persistence`] talks to PostgreSQL through Diesel.

pub mod memory;
pub mod persistence;
