// src/offline/storage.rs

use super::network::CachedResponse;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Cubos de caché con nombre (uno por versión), cada uno URL -> respuesta.
pub trait CacheStorage {
    fn keys(&self) -> io::Result<Vec<String>>;

    /// Escribe el lote entero en el cubo (lo crea si no existe)
    fn put_all(&mut self, bucket: &str, entries: Vec<(String, CachedResponse)>) -> io::Result<()>;

    fn match_in(&self, bucket: &str, url: &str) -> io::Result<Option<CachedResponse>>;

    fn delete(&mut self, bucket: &str) -> io::Result<bool>;

    /// Busca en todos los cubos, como `caches.match`
    fn match_any(&self, url: &str) -> io::Result<Option<CachedResponse>> {
        for bucket in self.keys()? {
            if let Some(hit) = self.match_in(&bucket, url)? {
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryCacheStorage {
    buckets: BTreeMap<String, BTreeMap<String, CachedResponse>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket_len(&self, bucket: &str) -> usize {
        self.buckets.get(bucket).map(BTreeMap::len).unwrap_or(0)
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn keys(&self) -> io::Result<Vec<String>> {
        Ok(self.buckets.keys().cloned().collect())
    }

    fn put_all(&mut self, bucket: &str, entries: Vec<(String, CachedResponse)>) -> io::Result<()> {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .extend(entries);
        Ok(())
    }

    fn match_in(&self, bucket: &str, url: &str) -> io::Result<Option<CachedResponse>> {
        Ok(self.buckets.get(bucket).and_then(|b| b.get(url)).cloned())
    }

    fn delete(&mut self, bucket: &str) -> io::Result<bool> {
        Ok(self.buckets.remove(bucket).is_some())
    }
}

const INDEX_FILE: &str = "index.json";

/// Un directorio por cubo: los cuerpos van en ficheros nombrados por el
/// sha256 de la URL y `index.json` guarda status y content-type.
/// Una entrada solo es visible cuando aparece en el índice, que se escribe al final.
#[derive(Debug, Clone)]
pub struct DirCacheStorage {
    root: PathBuf,
}

impl DirCacheStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_dir(&self, bucket: &str) -> io::Result<PathBuf> {
        let valid = !bucket.is_empty()
            && bucket != "."
            && bucket != ".."
            && bucket
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid cache bucket name {bucket:?}"),
            ));
        }
        Ok(self.root.join(bucket))
    }

    fn read_index(dir: &Path) -> io::Result<BTreeMap<String, CachedResponse>> {
        match std::fs::read(dir.join(INDEX_FILE)) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(io::Error::from),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err),
        }
    }
}

impl DirCacheStorage {
    /// Escribe los cuerpos y por último el índice. `written` recoge los
    /// ficheros creados para URLs que el índice aún no tenía.
    fn write_entries(
        dir: &Path,
        index: &mut BTreeMap<String, CachedResponse>,
        entries: Vec<(String, CachedResponse)>,
        written: &mut Vec<PathBuf>,
    ) -> io::Result<()> {
        for (url, response) in entries {
            let path = dir.join(body_file(&url));
            std::fs::write(&path, &response.body)?;
            if !index.contains_key(&url) {
                written.push(path);
            }
            index.insert(url, response);
        }

        let tmp = dir.join(format!("{INDEX_FILE}.tmp"));
        std::fs::write(&tmp, serde_json::to_vec(&*index)?)?;
        std::fs::rename(&tmp, dir.join(INDEX_FILE))
    }
}

fn body_file(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

impl CacheStorage for DirCacheStorage {
    fn keys(&self) -> io::Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.path().join(INDEX_FILE).is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn put_all(&mut self, bucket: &str, entries: Vec<(String, CachedResponse)>) -> io::Result<()> {
        let dir = self.bucket_dir(bucket)?;
        std::fs::create_dir_all(&dir)?;

        let mut index = Self::read_index(&dir)?;
        let mut written = Vec::new();
        let result = Self::write_entries(&dir, &mut index, entries, &mut written);
        if result.is_err() {
            // Los cuerpos nuevos sin entrada en el índice se borran
            for path in written {
                if let Err(err) = std::fs::remove_file(&path) {
                    log::warn!("could not remove orphan cache body {}: {err}", path.display());
                }
            }
        }
        result
    }

    fn match_in(&self, bucket: &str, url: &str) -> io::Result<Option<CachedResponse>> {
        let dir = self.bucket_dir(bucket)?;
        let index = Self::read_index(&dir)?;
        let Some(mut response) = index.get(url).cloned() else {
            return Ok(None);
        };
        response.body = std::fs::read(dir.join(body_file(url)))?;
        Ok(Some(response))
    }

    fn delete(&mut self, bucket: &str) -> io::Result<bool> {
        let dir = self.bucket_dir(bucket)?;
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}
