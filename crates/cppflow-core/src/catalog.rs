//! Test target discovery.
//!
//! A test source `<name><extension>` in the test directory registers the test
//! target `<name><suffix>`, e.g. `vec_test.cpp` becomes `vec_test_unit`.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::{FlowError, Result};
use crate::selection::Selection;

/// Maps test source file names to test target identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    extension: String,
    suffix: String,
}

impl NamingConvention {
    pub fn new(extension: &str, suffix: &str) -> Self {
        Self {
            extension: extension.to_string(),
            suffix: suffix.to_string(),
        }
    }

    /// Returns the target identifier for `file_name`, or `None` when the name
    /// does not end with the extension or has nothing in front of it.
    pub fn target_name(&self, file_name: &str) -> Option<String> {
        let stem = file_name.strip_suffix(self.extension.as_str())?;
        if stem.is_empty() {
            return None;
        }
        Some(format!("{stem}{}", self.suffix))
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self::new(
            crate::constants::DEFAULT_SOURCE_EXTENSION,
            crate::constants::DEFAULT_TARGET_SUFFIX,
        )
    }
}

/// A test target registered with the test runner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestTarget {
    name: String,
    source: PathBuf,
}

impl TestTarget {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The test source file this target was derived from.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl Display for TestTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Test targets found in one directory.
///
/// Targets keep the order in which the platform lists directory entries. That
/// order is not sorted and can differ between filesystems, so index `i` is only
/// meaningful for the catalog it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCatalog {
    targets: Vec<TestTarget>,
}

impl TestCatalog {
    /// Lists `dir` (non-recursively) and derives a target for every regular
    /// file matching `convention`.
    #[instrument(skip(convention))]
    pub fn discover(dir: &Path, convention: &NamingConvention) -> Result<Self> {
        let to_fs_error = |source| FlowError::Filesystem {
            path: dir.to_path_buf(),
            source,
        };

        let mut targets = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(to_fs_error)? {
            let entry = entry.map_err(to_fs_error)?;
            let path = entry.path();

            // Follows symlinks, so linked test sources are kept.
            if !path.is_file() {
                debug!("skip {}: not a file", path.display());
                continue;
            }

            let Some(file_name) = entry.file_name().to_str().map(ToOwned::to_owned) else {
                debug!("skip {}: name is not valid UTF-8", path.display());
                continue;
            };

            match convention.target_name(&file_name) {
                Some(name) => targets.push(TestTarget { name, source: path }),
                None => debug!("skip {}: not a test source", path.display()),
            }
        }

        debug!("discovered {} test targets in {}", targets.len(), dir.display());
        Ok(Self { targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TestTarget> {
        self.targets.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestTarget> {
        self.targets.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(TestTarget::name).collect()
    }

    /// Resolves a menu index. Any index past the last target means "all".
    pub fn select(&self, index: usize) -> Selection {
        match self.targets.get(index) {
            Some(target) => Selection::Single(target.clone()),
            None => Selection::All,
        }
    }
}
