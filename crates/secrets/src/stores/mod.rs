//! Secret store implementations
//!
//! This module provides stores that require no cloud SDK:
//!
//! - [`MemorySecretStore`] - In-process map, for tests and local wiring
//!
//! Cloud stores are available via separate crates:
//!
//! - `aws` - AWS Secrets Manager (smfetch-aws crate)

mod memory;

pub use memory::MemorySecretStore;
