//! # rotortrace-contracts
//!
//! Shared types and error definitions for the Rotortrace audit core.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate; only data definitions, trivial merges/constructors, and the
//! error taxonomy.

pub mod action;
pub mod config;
pub mod entry;
pub mod error;
pub mod filter;
pub mod revert;
pub mod stats;
