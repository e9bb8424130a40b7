//! Credential storage backends.
//!
//! The production store is [`FileTokenStore`], one AES-256-GCM encrypted file
//! per provider. [`InMemoryTokenStore`] backs tests and ephemeral use.

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::InMemoryTokenStore;
