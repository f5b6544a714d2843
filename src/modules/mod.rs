//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the record stores and blob stores the features are built on.

pub mod persistence;
pub mod storage;
