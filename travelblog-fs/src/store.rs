use async_trait::async_trait;
use serde_json::Value;
use std::{
    collections::HashMap,
    io::ErrorKind as IoErrorKind,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use travelblog_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
    record::Record,
};

const FILE_EXTENSION: &str = "json";

/// Document storage backed by one JSON file per collection.
///
/// A collection maps to a file name inside the store's root directory. Collections without an
/// explicit mapping use `<collection>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    files: HashMap<String, String>,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>, files: HashMap<String, String>) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    pub fn builder(root: impl Into<PathBuf>) -> JsonFileStoreBuilder {
        JsonFileStoreBuilder::new(root)
    }

    /// Returns the directory holding the collection files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_name(&self, collection: &str) -> String {
        self.files
            .get(collection)
            .cloned()
            .unwrap_or_else(|| format!("{collection}.{FILE_EXTENSION}"))
    }

    /// Returns the path of the file holding `collection`.
    pub fn path_for(&self, collection: &str) -> PathBuf {
        self.root.join(self.file_name(collection))
    }

    fn collection_for(&self, file_name: &str) -> Option<String> {
        self.files
            .iter()
            .find(|(_, f)| f.as_str() == file_name)
            .map(|(c, _)| c.clone())
            .or_else(|| {
                file_name
                    .strip_suffix(&format!(".{FILE_EXTENSION}"))
                    .filter(|stem| !stem.is_empty() && !stem.starts_with('.'))
                    .map(str::to_string)
            })
    }
}

fn unavailable(path: &Path, err: impl std::fmt::Display) -> DocumentStoreError {
    DocumentStoreError::StorageUnavailable(format!("{}: {err}", path.display()))
}

/// Parses a collection file into records.
fn parse_records(path: &Path, content: &str) -> DocumentStoreResult<Vec<Record>> {
    let value: Value = serde_json::from_str(content).map_err(|e| unavailable(path, e))?;

    let Value::Array(values) = value else {
        return Err(DocumentStoreError::Serialization(format!(
            "{}: expected a JSON array",
            path.display()
        )));
    };

    values.into_iter().map(Record::try_from).collect()
}

#[async_trait]
impl StoreBackend for JsonFileStore {
    async fn load(&self, collection: &str) -> DocumentStoreResult<Vec<Record>> {
        let path = self.path_for(collection);

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| unavailable(&path, e))?;

        parse_records(&path, &content)
    }

    async fn save(&self, collection: &str, records: Vec<Record>) -> DocumentStoreResult<()> {
        let path = self.path_for(collection);
        let content = serde_json::to_string_pretty(&records)?;

        let tmp_path = self
            .root
            .join(format!(".{}-{}.tmp", self.file_name(collection), Uuid::new_v4()));

        fs::write(&tmp_path, content)
            .await
            .map_err(|e| unavailable(&tmp_path, e))?;

        if let Err(e) = fs::rename(&tmp_path, &path).await {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                warn!(path = %tmp_path.display(), error = %cleanup, "failed to remove temp file");
            }

            return Err(unavailable(&path, e));
        }

        debug!(collection, records = records.len(), path = %path.display(), "saved collection");
        Ok(())
    }

    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        let path = self.path_for(name);

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| unavailable(&self.root, e))?;

        match fs::metadata(&path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                info!(collection = name, path = %path.display(), "creating empty collection file");
                self.save(name, Vec::new()).await
            }
            Err(e) => Err(unavailable(&path, e)),
        }
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| unavailable(&self.root, e))?;

        let mut names = Vec::new();

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| unavailable(&self.root, e))?
        {
            if let Some(name) = entry.file_name().to_str().and_then(|f| self.collection_for(f)) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}

/// Builder for [`JsonFileStore`].
///
/// With `create_missing` set, every mapped collection whose file is absent is created as an
/// empty array when the store is built.
#[derive(Debug)]
pub struct JsonFileStoreBuilder {
    root: PathBuf,
    files: HashMap<String, String>,
    create_missing: bool,
}

impl JsonFileStoreBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: HashMap::new(),
            create_missing: false,
        }
    }

    /// Stores `collection` in `file_name` instead of `<collection>.json`.
    pub fn with_file(mut self, collection: &str, file_name: &str) -> Self {
        self.files
            .insert(collection.to_string(), file_name.to_string());
        self
    }

    pub fn create_missing(mut self, create_missing: bool) -> Self {
        self.create_missing = create_missing;
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for JsonFileStoreBuilder {
    type Backend = JsonFileStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let store = JsonFileStore::new(self.root, self.files);

        if self.create_missing {
            let mut collections: Vec<&String> = store.files.keys().collect();
            collections.sort();

            for collection in collections {
                store.create_collection(collection).await.map_err(|e| {
                    DocumentStoreError::Initialization(format!("{collection}: {e}"))
                })?;
            }
        }

        info!(root = %store.root.display(), "opened JSON file store");
        Ok(store)
    }
}
