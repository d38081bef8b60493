//! # rotortrace-core
//!
//! The collaborator trait seams consumed by the Rotortrace audit core:
//! `IdentityProvider`, `DurableStore`, and `EnvironmentProbe`.
//!
//! Implementations live with their hosts; the reference in-memory and
//! file-backed stores ship with `rotortrace-audit`.

pub mod traits;

pub use traits::{DurableStore, EnvironmentProbe, IdentityProvider};
