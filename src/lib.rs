//! esg-ledger: hash-chained ESG activity ledger
//!
//! Records Environmental/Social/Governance activities for companies and
//! provides:
//! - A global append-only activity log, each record linked to its predecessor by hash
//! - Weighted 0-100 ESG scoring
//! - Sealed point-in-time compliance reports
//! - Dashboard summaries and monthly trends
//! - An HTTP API over whole-collection JSON storage

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod ledger;
pub mod models;
pub mod report;
pub mod scoring;
pub mod service;
pub mod store;

pub use error::{EsgError, Result};
pub use ledger::{ChainVerification, Ledger};
pub use service::EsgService;
