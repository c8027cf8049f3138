//! Core contracts for Moor: the external-command capability that the stores
//! and the CLI depend on. This crate is intentionally small to keep
//! dependency surface minimal.

pub mod runner;
