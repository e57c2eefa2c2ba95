//! Classification of file-system change batches.

use std::collections::{BTreeSet, HashSet};

use gqlsp_scope::ConfigResolver;
use gqlsp_vfs::{FileIndex, FileRef};
use tracing::debug;

use crate::{FileEvent, FileEventKind, FileProperty};

/// File names recognized as project configuration when none are configured.
pub const DEFAULT_CONFIG_FILE_NAMES: &[&str] = &[
    "graphql.config.json",
    "graphql.config.yaml",
    "graphql.config.yml",
    ".graphqlrc",
    ".graphqlrc.json",
    ".graphqlrc.yaml",
    ".graphqlrc.yml",
];

/// The set of recognized configuration file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFileNames {
    names: BTreeSet<String>,
}

impl ConfigFileNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns whether the final path segment of `file` is recognized.
    pub fn matches(&self, file: &FileRef) -> bool {
        file.name().is_some_and(|name| self.contains(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for ConfigFileNames {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE_NAMES.iter().copied())
    }
}

/// Returns whether any event in `events` may change the project configuration.
///
/// Events without a file, or for files outside the project, are ignored.
/// Classification stops at the first relevant event.
pub fn configurations_changed(
    events: &[FileEvent],
    resolver: &dyn ConfigResolver,
    files: &dyn FileIndex,
    names: &ConfigFileNames,
) -> bool {
    let watched_dirs: HashSet<FileRef> = resolver
        .all_configs()
        .into_iter()
        .map(|config| config.dir)
        .filter(|dir| files.is_valid(dir) && files.is_directory(dir))
        .collect();

    events.iter().any(|event| {
        let Some(file) = event.file.as_ref() else {
            return false;
        };
        if !files.is_in_project(file) {
            return false;
        }

        let relevant = if event.is_directory {
            watched_dirs.contains(file)
                || (event.kind == FileEventKind::Create
                    && resolver.find_config_file_in_directory(file).is_some())
        } else {
            match &event.kind {
                FileEventKind::PropertyChange {
                    property: FileProperty::Name,
                    old_value,
                    new_value,
                } => [old_value, new_value]
                    .into_iter()
                    .flatten()
                    .any(|name| names.contains(name)),
                FileEventKind::PropertyChange { .. } => false,
                _ => names.matches(file),
            }
        };

        if relevant {
            debug!("Configuration-relevant change: {:?} on {}", event.kind, file);
        }
        relevant
    })
}
