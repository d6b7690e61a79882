//! # Passforge Registry
//!
//! Persistence boundary for the passforge authoring core:
//! - An async storage gateway with `save`/`get` upsert-by-id semantics
//! - An in-memory backend for tests and development
//! - A registry service orchestrating draft editing round trips, template
//!   publishing and view management
//!
//! The domain model itself performs no I/O; everything here happens strictly
//! before or after a core operation, never interleaved within one.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use passforge_registry::{DefaultRegistry, TemplateRegistry, storage::MemoryStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = Arc::new(MemoryStorage::new());
//! let registry = DefaultRegistry::new(storage);
//!
//! let draft = registry
//!     .create_draft("Battery Passport", "org-1".into(), "alice".into())
//!     .await?;
//! let template = registry.publish_draft(draft.id()).await?;
//!
//! println!("Published {} at version {}", template.id(), template.version());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod registry;
pub mod storage;

pub use error::{RegistryError, Result};
pub use registry::{DefaultRegistry, TemplateRegistry};
pub use storage::{MemoryStorage, RegistryStorage};
