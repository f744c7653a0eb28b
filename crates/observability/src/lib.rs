//! Observability infrastructure for specd
//!
//! This crate provides:
//! - Structured logging via tracing
//! - An optional Prometheus exporter
//! - Per-route HTTP request metrics
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("specd", LogFormat::Pretty)?;
//!
//! // Optional
//! observability::init_metrics(9100)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, RequestMetrics};
