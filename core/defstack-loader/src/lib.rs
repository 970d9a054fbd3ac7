//! Lazy, path-cached loader for defstack definition trees.
//!
//! A [`Loader`] indexes every document under a root once, then materializes
//! defs on demand:
//!
//! ```ignore
//! let config = LoaderConfig::load_from(Path::new("defstack.toml"))?;
//! let mut loader = Loader::open(&config, catalog)?;
//! let main = loader.fetch::<MainDef>("a")?;
//! ```
//!
//! Each path is loaded at most once; later requests, including references
//! from other defs, return the same `Arc`.

mod config;
mod index;
mod loader;
mod store;

pub use config::{ConfigError, LoaderConfig};
pub use index::{EntryState, ResourceIndex};
pub use loader::Loader;
pub use store::{DirStore, DocumentStore, MemoryStore, resource_key};
