//! # gqlsp_vfs
//!
//! File identities shared by every gqlsp crate.
//!
//! This crate provides:
//! - [`FileRef`], a cheap-to-clone identity for a source file
//! - [`DocumentId`], the identity of an in-memory editor document
//! - [`FileIndex`], the validity/membership queries the caches need
//! - [`OsFileIndex`], a `FileIndex` backed by the local file system

mod file;
mod index;

pub use file::{DocumentId, FileRef};
pub use index::{FileIndex, OsFileIndex};
