//! In-memory collaborators for reconciler tests

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use eavclean_errors::{Error, FilesystemError, StorageError, ValidationError};
use eavclean_reconcile::{FileIter, FileStat, FilesystemWalker, PathValidator};
use eavclean_store::{ConfigStore, MediaStore};
use eavclean_types::{ConfigPair, MediaFileRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRow {
    pub scope_id: i64,
    pub path: String,
    pub value: Option<String>,
}

#[derive(Default)]
pub struct FakeConfigStore {
    pub rows: Mutex<Vec<ConfigRow>>,
    pub deletes: Mutex<usize>,
    pub fail_deletes: bool,
}

impl FakeConfigStore {
    pub fn with_rows(rows: &[(i64, &str, Option<&str>)]) -> Self {
        Self {
            rows: Mutex::new(
                rows.iter()
                    .map(|(scope_id, path, value)| ConfigRow {
                        scope_id: *scope_id,
                        path: (*path).to_string(),
                        value: value.map(str::to_string),
                    })
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<ConfigRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> usize {
        *self.deletes.lock().unwrap()
    }

    fn record_delete(&self) -> Result<(), Error> {
        *self.deletes.lock().unwrap() += 1;
        if self.fail_deletes {
            return Err(StorageError::QueryFailed {
                message: "lost connection".into(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FakeConfigStore {
    async fn list_distinct_paths(&self) -> Result<Vec<String>, Error> {
        let mut seen = HashSet::new();
        Ok(self
            .rows()
            .into_iter()
            .filter(|row| seen.insert(row.path.clone()))
            .map(|row| row.path)
            .collect())
    }

    async fn list_distinct_default_scope_pairs(&self) -> Result<Vec<ConfigPair>, Error> {
        let mut seen = HashSet::new();
        Ok(self
            .rows()
            .into_iter()
            .filter(|row| row.scope_id == 0)
            .map(|row| ConfigPair {
                path: row.path,
                value: row.value,
            })
            .filter(|pair| seen.insert(pair.clone()))
            .collect())
    }

    async fn count_rows(&self, path: &str, value: &str) -> Result<u64, Error> {
        Ok(self
            .rows()
            .iter()
            .filter(|row| row.path == path && row.value.as_deref() == Some(value))
            .count() as u64)
    }

    async fn delete_rows(&self, path: &str, value: &str, exclude_scope: i64) -> Result<u64, Error> {
        self.record_delete()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| {
            !(row.path == path && row.value.as_deref() == Some(value) && row.scope_id != exclude_scope)
        });
        Ok((before - rows.len()) as u64)
    }

    async fn delete_by_paths(&self, paths: &[String]) -> Result<u64, Error> {
        self.record_delete()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| !paths.contains(&row.path));
        Ok((before - rows.len()) as u64)
    }
}

/// Gallery entity rows keyed by `value_id`, plus the set of value rows
#[derive(Default)]
pub struct FakeMediaStore {
    pub gallery: Mutex<BTreeMap<i64, Option<String>>>,
    pub values: Mutex<HashSet<i64>>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeMediaStore {
    pub fn with_rows(gallery: &[(i64, Option<&str>)], values: &[i64]) -> Self {
        Self {
            gallery: Mutex::new(
                gallery
                    .iter()
                    .map(|(id, value)| (*id, value.map(str::to_string)))
                    .collect(),
            ),
            values: Mutex::new(values.iter().copied().collect()),
            calls: Mutex::default(),
        }
    }

    pub fn gallery_values(&self) -> Vec<Option<String>> {
        self.gallery.lock().unwrap().values().cloned().collect()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn orphaned_ids(&self) -> Vec<i64> {
        let values = self.values.lock().unwrap();
        if values.is_empty() {
            return Vec::new();
        }
        self.gallery
            .lock()
            .unwrap()
            .keys()
            .filter(|id| !values.contains(id))
            .copied()
            .collect()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn list_referenced_files(&self) -> Result<Vec<MediaFileRef>, Error> {
        self.record("list_referenced_files");
        let orphaned = self.orphaned_ids();
        let mut seen = HashSet::new();
        Ok(self
            .gallery
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| !orphaned.contains(id))
            .filter_map(|(_, value)| value.clone())
            .filter(|value| seen.insert(value.clone()))
            .map(MediaFileRef::new)
            .collect())
    }

    async fn count_orphaned_entity_rows(&self) -> Result<u64, Error> {
        self.record("count_orphaned_entity_rows");
        Ok(self.orphaned_ids().len() as u64)
    }

    async fn delete_by_values(&self, values: &[MediaFileRef]) -> Result<u64, Error> {
        self.record("delete_by_values");
        let mut gallery = self.gallery.lock().unwrap();
        let before = gallery.len();
        gallery.retain(|_, value| {
            !value
                .as_deref()
                .is_some_and(|v| values.iter().any(|f| f.as_str() == v))
        });
        Ok((before - gallery.len()) as u64)
    }

    async fn delete_orphaned_entity_rows(&self) -> Result<u64, Error> {
        self.record("delete_orphaned_entity_rows");
        let orphaned = self.orphaned_ids();
        let mut gallery = self.gallery.lock().unwrap();
        for id in &orphaned {
            gallery.remove(id);
        }
        Ok(orphaned.len() as u64)
    }
}

/// Files below a fake root with their sizes
#[derive(Default)]
pub struct FakeFilesystem {
    pub files: Mutex<BTreeMap<PathBuf, u64>>,
    pub undeletable: HashSet<PathBuf>,
    pub unstatable: HashSet<PathBuf>,
    /// Deleting the key also removes the value, as a concurrent cleanup would
    pub removes_also: HashMap<PathBuf, PathBuf>,
    pub unreadable_root: bool,
    pub deleted: Mutex<Vec<PathBuf>>,
}

impl FakeFilesystem {
    pub fn with_files(root: &Path, files: &[(&str, u64)]) -> Self {
        Self {
            files: Mutex::new(
                files
                    .iter()
                    .map(|(path, size)| (root.join(path.trim_start_matches('/')), *size))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    pub fn deleted(&self) -> Vec<PathBuf> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl FilesystemWalker for FakeFilesystem {
    fn list_files_under<'a>(&'a self, root: &Path) -> Result<FileIter<'a>, Error> {
        if self.unreadable_root {
            return Err(FilesystemError::RootUnreadable {
                path: root.to_path_buf(),
                message: "permission denied".into(),
            }
            .into());
        }
        let files: Vec<PathBuf> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|path| path.starts_with(root))
            .cloned()
            .collect();
        Ok(Box::new(files.into_iter().map(Ok)))
    }

    async fn stat(&self, path: &Path) -> Result<FileStat, Error> {
        if self.unstatable.contains(path) {
            return Err(FilesystemError::StatFailed {
                path: path.to_path_buf(),
                message: "io error".into(),
            }
            .into());
        }
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|size| FileStat { size: *size })
            .ok_or_else(|| Error::internal("no such file"))
    }

    async fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    async fn delete(&self, path: &Path) -> Result<(), Error> {
        if self.undeletable.contains(path) {
            return Err(FilesystemError::DeleteFailed {
                path: path.to_path_buf(),
                message: "permission denied".into(),
            }
            .into());
        }
        let mut files = self.files.lock().unwrap();
        files.remove(path);
        if let Some(other) = self.removes_also.get(path) {
            files.remove(other);
        }
        self.deleted.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

/// Validator over a fixed set, with scripted failures
#[derive(Default)]
pub struct FakeValidator {
    pub declared: HashSet<String>,
    pub unavailable_for: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeValidator {
    pub fn declaring(paths: &[&str]) -> Self {
        Self {
            declared: paths.iter().map(|p| (*p).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PathValidator for FakeValidator {
    fn is_valid(&self, path: &str) -> Result<bool, ValidationError> {
        self.calls.lock().unwrap().push(path.to_string());
        if self.unavailable_for.contains(path) {
            return Err(ValidationError::Unavailable {
                reason: "schema service down".into(),
            });
        }
        if path.split('/').count() < 3 {
            return Err(ValidationError::Malformed {
                path: path.to_string(),
                reason: "too short".into(),
            });
        }
        Ok(self.declared.contains(path))
    }
}
