// src/persistence.rs

use crate::error::PersistError;
use std::path::{Path, PathBuf};

/// Clave única del snapshot en el almacenamiento local
pub const SNAPSHOT_KEY: &str = "rc_save";

/// Almacenamiento clave-valor de una sola clave para el snapshot del alumno.
/// Escribir reemplaza el valor entero.
pub trait SnapshotStore {
    fn load(&self) -> Result<Option<String>, PersistError>;
    fn save(&mut self, json: &str) -> Result<(), PersistError>;
    fn clear(&mut self) -> Result<(), PersistError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    value: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, PersistError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, json: &str) -> Result<(), PersistError> {
        self.value = Some(json.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        self.value = None;
        Ok(())
    }
}

/// Snapshot en un fichero JSON dentro del directorio de datos
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{SNAPSHOT_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(json)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, json: &str) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Escribe primero a un temporal para no dejar un snapshot a medias
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Copia del snapshot en el storage de eframe (se escribe desde `App::save`)
pub fn write_mirror(storage: &mut dyn eframe::Storage, json: &str) {
    storage.set_string(SNAPSHOT_KEY, json.to_string());
}

pub fn read_mirror(storage: &dyn eframe::Storage) -> Option<String> {
    storage.get_string(SNAPSHOT_KEY)
}
