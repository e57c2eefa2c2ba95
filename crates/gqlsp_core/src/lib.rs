//! # gqlsp_core
//!
//! Top-level context for the gqlsp caching engine.
//!
//! This crate provides:
//! - [`EngineConfig`], loaded from JSON and validated against an embedded schema
//! - [`Workspace`], which wires the scope cache, schema cache and change
//!   watcher together and owns their lifetime
//! - [`init_logging`], the stderr log subscriber
//!
//! ## Example
//!
//! ```rust,ignore
//! use gqlsp_core::{Collaborators, EngineConfig, Workspace};
//!
//! let config = EngineConfig::from_file("gqlsp.json")?;
//! gqlsp_core::init_logging(&config.log_level);
//!
//! let workspace = Workspace::init("/path/to/project", config, collaborators)?;
//! let info = workspace.schema_for(Some(&file))?;
//! for error in info.all_errors() {
//!     eprintln!("{error}");
//! }
//! workspace.dispose().await;
//! ```

mod config;
mod error;
mod logging;
mod workspace;

pub use config::EngineConfig;
pub use error::EngineError;
pub use logging::init_logging;
pub use workspace::{Collaborators, Workspace};
