//! Vendor performance tracking
//!
//! Vendor records, the four purchase-order derived performance metrics
//! (on-time delivery rate, average quality rating, fulfillment rate, average
//! response time) and an append-only log of metric snapshots.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod codegen;
pub mod config;
pub mod db;
pub mod errors;
pub mod migrator;
pub mod models;
pub mod performance;
pub mod repositories;
pub mod services;

pub use errors::ServiceError;
pub use models::{OrderLookup, OrderStatus};
pub use performance::PerformanceMetrics;
pub use repositories::PurchaseOrderStore;
pub use services::VendorService;
