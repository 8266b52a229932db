//! HealthSync Agent Library
//!
//! This library exposes the agent modules for use in tests and other crates.
//!
//! ## Architecture
//!
//! The agent follows a layered design:
//! - Provider: abstract health-data source (platform binding or in-memory fake)
//! - Reader: per-date aggregation of raw records into a metrics snapshot
//! - Sync: the end-to-end orchestrator driving one attempt
//! - Store: durable key-value settings and sync state
//! - Scheduler: named single-flight periodic/one-shot job execution

pub mod config;
pub mod provider;
pub mod reader;
pub mod scheduler;
pub mod store;
pub mod submit;
pub mod sync;
