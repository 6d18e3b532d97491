use crate::error::{FeedError, Result};
use crate::parsing::extract_frontmatter;
use crate::types::DocumentHandle;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Discovers post documents in a directory by file extension.
///
/// Nothing is read until [`PostCollector::iter`] is consumed, and each call
/// to `iter` starts a fresh walk. Documents come back in the order the
/// filesystem lists them.
#[derive(Debug, Clone)]
pub struct PostCollector {
    dir: PathBuf,
    extensions: Vec<String>,
    recursive: bool,
}

impl PostCollector {
    pub fn new<S: AsRef<str>>(dir: impl AsRef<Path>, extensions: &[S]) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        let metadata = fs::metadata(&dir).map_err(|error| FeedError::collection(&dir, error))?;
        if !metadata.is_dir() {
            return Err(FeedError::collection(&dir, "not a directory"));
        }

        let extensions = extensions
            .iter()
            .map(|extension| extension.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|extension| !extension.is_empty())
            .collect();

        Ok(Self {
            dir,
            extensions,
            recursive: false,
        })
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn iter(&self) -> Documents<'_> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        Documents {
            collector: self,
            walker: WalkDir::new(&self.dir)
                .min_depth(1)
                .max_depth(max_depth)
                .into_iter(),
        }
    }

    fn matches(&self, path: &Path) -> bool {
        let Some(filename) = path.file_name().map(|name| name.to_string_lossy()) else {
            return false;
        };

        if filename.starts_with('_') {
            return false;
        }

        path.extension()
            .map(|extension| {
                let extension = extension.to_string_lossy().to_lowercase();
                self.extensions.contains(&extension)
            })
            .unwrap_or(false)
    }

    fn load(&self, path: &Path) -> Result<DocumentHandle> {
        let content = fs::read_to_string(path).map_err(|error| FeedError::collection(path, error))?;
        let (frontmatter, _body) = extract_frontmatter(&content, path)?;

        let relative_path = path
            .strip_prefix(&self.dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf());

        tracing::debug!(path = %path.display(), "collected post");

        Ok(DocumentHandle {
            path: path.to_path_buf(),
            relative_path,
            frontmatter,
        })
    }
}

impl<'a> IntoIterator for &'a PostCollector {
    type Item = Result<DocumentHandle>;
    type IntoIter = Documents<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Documents<'a> {
    collector: &'a PostCollector,
    walker: walkdir::IntoIter,
}

impl Iterator for Documents<'_> {
    type Item = Result<DocumentHandle>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(error) => {
                    return Some(Err(FeedError::collection(&self.collector.dir, error)));
                }
            };

            let path = entry.path();

            if !path.is_file() || !self.collector.matches(path) {
                continue;
            }

            return Some(self.collector.load(path));
        }
    }
}
