// src/config.rs

use crate::data::{ContentSource, DirSource, EmbeddedSource};
use crate::error::ConfigError;
use crate::offline::{DEFAULT_CACHE_VERSION, default_manifest};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "royal_chronicle.yaml";

/// Configuración de la app y del proxy offline. Se lee de un YAML opcional
/// y cada campo se puede pisar con una variable de entorno `ROYAL_CHRONICLE_*`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// "embedded", una URL http(s) o un directorio con `data/`
    pub content: String,
    /// Dónde vive el snapshot del alumno
    pub data_dir: PathBuf,
    pub cache_version: String,
    /// Origen propio de la app (para la caché offline)
    pub origin: String,
    pub bind: String,
    pub cache_dir: PathBuf,
    pub manifest: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content: "embedded".into(),
            data_dir: PathBuf::from(".royal_chronicle"),
            cache_version: DEFAULT_CACHE_VERSION.into(),
            origin: "http://127.0.0.1:8000/".into(),
            bind: "127.0.0.1:8080".into(),
            cache_dir: PathBuf::from(".royal_chronicle/cache"),
            manifest: default_manifest(),
        }
    }
}

impl AppConfig {
    /// Carga `ROYAL_CHRONICLE_CONFIG` (o `royal_chronicle.yaml`) y aplica el entorno
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("ROYAL_CHRONICLE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::from_file(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Un fichero que no existe equivale a la configuración por defecto
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        Self::from_yaml(&text).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("ROYAL_CHRONICLE_CONTENT") {
            self.content = v;
        }
        if let Some(v) = var("ROYAL_CHRONICLE_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = var("ROYAL_CHRONICLE_CACHE_VERSION") {
            self.cache_version = v;
        }
        if let Some(v) = var("ROYAL_CHRONICLE_ORIGIN") {
            self.origin = v;
        }
        if let Some(v) = var("ROYAL_CHRONICLE_BIND") {
            self.bind = v;
        }
        if let Some(v) = var("ROYAL_CHRONICLE_CACHE_DIR") {
            self.cache_dir = PathBuf::from(v);
        }
    }

    pub fn origin_url(&self) -> Result<url::Url, ConfigError> {
        url::Url::parse(&self.origin).map_err(|source| ConfigError::InvalidUrl {
            value: self.origin.clone(),
            source,
        })
    }

    pub fn content_source(&self) -> Result<Box<dyn ContentSource>, ConfigError> {
        let content = self.content.trim();
        if content.eq_ignore_ascii_case("embedded") {
            return Ok(Box::new(EmbeddedSource));
        }
        if content.starts_with("http://") || content.starts_with("https://") {
            return self.http_source(content);
        }
        Ok(Box::new(DirSource::new(content)))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn http_source(&self, base: &str) -> Result<Box<dyn ContentSource>, ConfigError> {
        // La URL base debe acabar en '/' para que `join` no se coma el último segmento
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let url = url::Url::parse(&base).map_err(|source| ConfigError::InvalidUrl {
            value: base.clone(),
            source,
        })?;
        Ok(Box::new(crate::data::HttpSource::new(url)))
    }

    #[cfg(target_arch = "wasm32")]
    fn http_source(&self, _base: &str) -> Result<Box<dyn ContentSource>, ConfigError> {
        Ok(Box::new(EmbeddedSource))
    }
}
