//! The scope value type.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A predicate over file paths.
///
/// Scopes are kept in a canonical form so that two scopes describing the same
/// construction compare equal regardless of the order they were built in:
/// unions are flattened, deduplicated and never contain [`Scope::Empty`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Contains nothing.
    Empty,
    /// Exactly these files.
    Files(BTreeSet<PathBuf>),
    /// Every file below one of these directories.
    Roots(BTreeSet<PathBuf>),
    /// Every file contained in any member.
    Union(BTreeSet<Scope>),
    /// Files of `base` whose extension is in `extensions` (lowercase).
    FileTypes {
        base: Box<Scope>,
        extensions: BTreeSet<String>,
    },
}

impl Scope {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::files([path.into()])
    }

    pub fn files(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let paths: BTreeSet<_> = paths.into_iter().collect();
        if paths.is_empty() {
            Self::Empty
        } else {
            Self::Files(paths)
        }
    }

    pub fn roots(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        let roots: BTreeSet<_> = roots.into_iter().collect();
        if roots.is_empty() {
            Self::Empty
        } else {
            Self::Roots(roots)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the union of two scopes in canonical form.
    pub fn union(self, other: Scope) -> Scope {
        let mut members = BTreeSet::new();
        for scope in [self, other] {
            match scope {
                Self::Empty => {}
                Self::Union(inner) => members.extend(inner),
                scope => {
                    members.insert(scope);
                }
            }
        }

        match members.len() {
            0 => Self::Empty,
            1 => members.pop_first().unwrap_or(Self::Empty),
            _ => Self::Union(members),
        }
    }

    /// Restricts the scope to files with one of the given extensions.
    ///
    /// Restricting an already restricted scope intersects the allow-lists, so
    /// the result can never admit more file types than either restriction.
    pub fn restrict_to_file_types<I, S>(self, extensions: I) -> Scope
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: BTreeSet<String> = extensions
            .into_iter()
            .map(|ext| ext.as_ref().to_ascii_lowercase())
            .collect();

        match self {
            Self::Empty => Self::Empty,
            Self::FileTypes {
                base,
                extensions: existing,
            } => {
                let extensions: BTreeSet<String> =
                    existing.intersection(&extensions).cloned().collect();
                if extensions.is_empty() {
                    Self::Empty
                } else {
                    Self::FileTypes { base, extensions }
                }
            }
            _ if extensions.is_empty() => Self::Empty,
            base => Self::FileTypes {
                base: Box::new(base),
                extensions,
            },
        }
    }

    /// Returns whether `path` is inside the scope.
    pub fn contains(&self, path: &Path) -> bool {
        match self {
            Self::Empty => false,
            Self::Files(files) => files.contains(path),
            Self::Roots(roots) => roots.iter().any(|root| path.starts_with(root)),
            Self::Union(members) => members.iter().any(|scope| scope.contains(path)),
            Self::FileTypes { base, extensions } => {
                let matches_type = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase()));
                matches_type && base.contains(path)
            }
        }
    }
}
