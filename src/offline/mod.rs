//! Caché offline de los assets propios de la app.
//!
//! Cada versión tiene su propio cubo. `install` lo llena entero o no lo toca,
//! `activate` borra los cubos de versiones anteriores y `handle_fetch` sirve
//! primero desde caché las peticiones al origen propio.

pub mod network;
pub mod storage;

pub use network::{CachedResponse, Network};
pub use storage::{CacheStorage, DirCacheStorage, MemoryCacheStorage};

#[cfg(not(target_arch = "wasm32"))]
pub use network::HttpNetwork;

use crate::error::{FetchError, InstallError};
use url::Url;

pub const DEFAULT_CACHE_VERSION: &str = "royal-chronicle-v1";

/// Assets que tienen que estar disponibles sin red
pub fn default_manifest() -> Vec<String> {
    [
        "./",
        "./index.html",
        "./styles.css",
        "./script.js",
        "./images/map.svg",
        "./data/quests.json",
        "./data/bosses.json",
        "./data/artifacts.json",
        "./data/monarch_cards.json",
        "./data/question_bank.json",
        "./manifest.json",
        "./icons/icon-192.png",
        "./icons/icon-512.png",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePhase {
    Installing,
    Failed,
    Active,
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    Cache,
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub response: CachedResponse,
    pub source: ServedFrom,
}

pub struct AssetCache<S: CacheStorage, N: Network> {
    version: String,
    origin: Url,
    manifest: Vec<String>,
    storage: S,
    network: N,
    phase: CachePhase,
}

impl<S: CacheStorage, N: Network> AssetCache<S, N> {
    pub fn new(
        version: impl Into<String>,
        origin: Url,
        manifest: Vec<String>,
        storage: S,
        network: N,
    ) -> Self {
        Self {
            version: version.into(),
            origin,
            manifest,
            storage,
            network,
            phase: CachePhase::Installing,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn phase(&self) -> CachePhase {
        self.phase
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Descarga todo el manifiesto y solo si todo fue bien lo escribe en el
    /// cubo de esta versión. Un fallo deja la caché como estaba.
    pub fn install(&mut self) -> Result<usize, InstallError> {
        self.phase = CachePhase::Installing;
        log::info!(
            "installing {} assets into cache {}",
            self.manifest.len(),
            self.version
        );

        match self.fetch_manifest() {
            Ok(entries) => {
                let count = entries.len();
                if let Err(err) = self.storage.put_all(&self.version, entries) {
                    self.phase = CachePhase::Failed;
                    return Err(err.into());
                }
                Ok(count)
            }
            Err(err) => {
                log::error!("cache {} install abandoned: {err}", self.version);
                self.phase = CachePhase::Failed;
                Err(err)
            }
        }
    }

    fn fetch_manifest(&self) -> Result<Vec<(String, CachedResponse)>, InstallError> {
        let mut entries = Vec::with_capacity(self.manifest.len());
        for path in &self.manifest {
            let url = self.origin.join(path).map_err(|source| InstallError::Fetch {
                path: path.clone(),
                source: FetchError::InvalidUrl {
                    value: path.clone(),
                    source,
                },
            })?;

            let response = self
                .network
                .fetch(&url)
                .map_err(|source| InstallError::Fetch {
                    path: path.clone(),
                    source,
                })?;

            if !response.is_success() {
                return Err(InstallError::Status {
                    url: url.to_string(),
                    status: response.status,
                });
            }
            entries.push((url.to_string(), response));
        }
        Ok(entries)
    }

    /// Toma el control: borra todo cubo que no sea el de esta versión.
    /// Devuelve los nombres borrados.
    pub fn activate(&mut self) -> Result<Vec<String>, FetchError> {
        let mut removed = Vec::new();
        for bucket in self.storage.keys()? {
            if bucket != self.version && self.storage.delete(&bucket)? {
                log::info!("removed stale cache {bucket}");
                removed.push(bucket);
            }
        }
        self.phase = CachePhase::Active;
        Ok(removed)
    }

    /// Marca esta instancia como reemplazada por una versión nueva
    pub fn supersede(&mut self) {
        self.phase = CachePhase::Superseded;
    }

    /// Mismo origen: caché y si no hay, red (sin guardar lo descargado).
    /// Otro origen: siempre red.
    pub fn handle_fetch(&self, raw_url: &str) -> Result<FetchOutcome, FetchError> {
        let url = self.resolve_target(raw_url)?;

        if url.origin() == self.origin.origin() {
            if let Some(response) = self.storage.match_any(url.as_str())? {
                log::debug!("cache hit {url}");
                return Ok(FetchOutcome {
                    response,
                    source: ServedFrom::Cache,
                });
            }
        }

        let response = self.network.fetch(&url)?;
        Ok(FetchOutcome {
            response,
            source: ServedFrom::Network,
        })
    }

    /// URL absoluta tal cual, o ruta que empieza por una sola `/` sobre el origen.
    /// `//host/x` y `/\host/x` cambiarían de host al resolverse.
    fn resolve_target(&self, raw_url: &str) -> Result<Url, FetchError> {
        let invalid = |source| FetchError::InvalidUrl {
            value: raw_url.to_string(),
            source,
        };
        match Url::parse(raw_url) {
            Ok(url) => return Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {}
            Err(source) => return Err(invalid(source)),
        }

        let rest = raw_url
            .strip_prefix('/')
            .ok_or_else(|| FetchError::UnsupportedTarget(raw_url.to_string()))?;
        if rest.starts_with('/') || rest.starts_with('\\') {
            return Err(FetchError::UnsupportedTarget(raw_url.to_string()));
        }
        self.origin.join(raw_url).map_err(invalid)
    }
}
