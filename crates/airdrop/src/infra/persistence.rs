//! Storage for the form inputs.

use {
    crate::domain::{Key, Persistence},
    anyhow::{Context, Result},
    std::{
        collections::{BTreeMap, HashMap},
        fs,
        io,
        path::{Path, PathBuf},
        sync::Mutex,
    },
    tempfile::NamedTempFile,
};

/// Keeps the inputs in a JSON object on disk. Every change rewrites the whole
/// file by atomically replacing it, so a crash never leaves a partially
/// written file behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Loads the inputs saved at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data)
                .with_context(|| format!("malformed storage file {path:?}"))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err).with_context(|| format!("failed to read {path:?}")),
        };
        tracing::debug!(?path, entries = entries.len(), "opened storage");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        let mut updated = entries.clone();
        change(&mut updated);
        if updated == *entries {
            return Ok(());
        }
        self.write(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("failed to create {dir:?}"))?;

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, entries)?;
        file.persist(&self.path)
            .with_context(|| format!("failed to write {:?}", self.path))?;
        Ok(())
    }
}

impl Persistence for FileStore {
    fn get(&self, key: Key) -> Option<String> {
        self.entries.lock().unwrap().get(key.as_str()).cloned()
    }

    fn set(&self, key: Key, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.as_str().to_string(), value.to_string());
        })
    }

    fn remove(&self, key: Key) -> Result<()> {
        self.update(|entries| {
            entries.remove(key.as_str());
        })
    }
}

/// Forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore(Mutex<HashMap<Key, String>>);

impl Persistence for MemoryStore {
    fn get(&self, key: Key) -> Option<String> {
        self.0.lock().unwrap().get(&key).cloned()
    }

    fn set(&self, key: Key, value: &str) -> Result<()> {
        self.0.lock().unwrap().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: Key) -> Result<()> {
        self.0.lock().unwrap().remove(&key);
        Ok(())
    }
}
