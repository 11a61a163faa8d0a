//! Filesystem access for the media reconciler

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use eavclean_errors::{Error, FilesystemError};
use walkdir::WalkDir;

/// Metadata needed to account for a deleted file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
}

/// Lazy, one-shot listing of files below a root
pub type FileIter<'a> = Box<dyn Iterator<Item = Result<PathBuf, Error>> + Send + 'a>;

/// Filesystem operations used by the media reconciler
#[async_trait]
pub trait FilesystemWalker: Send + Sync {
    /// Regular files below `root`, as absolute paths
    ///
    /// # Errors
    ///
    /// Fails up front if `root` cannot be read. Errors for individual
    /// entries are yielded by the iterator.
    fn list_files_under<'a>(&'a self, root: &Path) -> Result<FileIter<'a>, Error>;

    async fn stat(&self, path: &Path) -> Result<FileStat, Error>;

    async fn exists(&self, path: &Path) -> bool;

    async fn delete(&self, path: &Path) -> Result<(), Error>;
}

/// The local filesystem
///
/// Directories named in `skip_dirs` are pruned from the walk entirely.
/// Symbolic links are not followed and never listed.
#[derive(Debug, Clone, Default)]
pub struct LocalFilesystem {
    skip_dirs: HashSet<String>,
}

impl LocalFilesystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn skipping_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    fn is_skipped(&self, entry: &walkdir::DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.skip_dirs.contains(name))
    }
}

#[async_trait]
impl FilesystemWalker for LocalFilesystem {
    fn list_files_under<'a>(&'a self, root: &Path) -> Result<FileIter<'a>, Error> {
        let unreadable = |message: String| FilesystemError::RootUnreadable {
            path: root.to_path_buf(),
            message,
        };

        let metadata = std::fs::metadata(root).map_err(|e| unreadable(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(unreadable("not a directory".to_string()).into());
        }
        std::fs::read_dir(root).map_err(|e| unreadable(e.to_string()))?;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.is_skipped(entry));

        let files = walker.filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                Some(Err(FilesystemError::WalkFailed {
                    path,
                    message: err.to_string(),
                }
                .into()))
            }
        });

        Ok(Box::new(files))
    }

    async fn stat(&self, path: &Path) -> Result<FileStat, Error> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| FilesystemError::stat_failed(path, &e))?;
        Ok(FileStat {
            size: metadata.len(),
        })
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn delete(&self, path: &Path) -> Result<(), Error> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| FilesystemError::delete_failed(path, &e).into())
    }
}
