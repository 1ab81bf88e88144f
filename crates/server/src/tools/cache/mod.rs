//! Cache-related MCP tools.
//!
//! This module provides tools for reading stored analyses.

pub mod domain;
pub mod get;

pub use domain::{CacheDomainParams, domain_impl};
pub use get::{CacheGetParams, get_impl};
