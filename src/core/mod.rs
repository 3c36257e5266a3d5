//! core
//!
//! Core domain types and configuration for ce-census.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Endpoint, Site, CommitRef, and contact normalization
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Every endpoint is normalized exactly once, at construction
//! - Schemas are strict and self-describing

pub mod config;
pub mod types;
