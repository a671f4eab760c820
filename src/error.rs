// src/error.rs

use thiserror::Error;

/// Fallos al cargar los ficheros de contenido (quests, cartas, banco de preguntas...)
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("request for {path} failed: {message}")]
    Http { path: String, message: String },
    #[error("{path} answered with HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("{path} is not valid content JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no embedded content for {path}")]
    Missing { path: String },
    #[error("loader thread for {path} panicked")]
    Worker { path: String },
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("snapshot storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid url {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errores de red vistos por la caché offline
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("invalid request url {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request target {0:?} is neither an absolute url nor a path")]
    UnsupportedTarget(String),
    #[error("cache storage failed: {0}")]
    Storage(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("asset {path} could not be fetched: {source}")]
    Fetch {
        path: String,
        #[source]
        source: FetchError,
    },
    #[error("asset {url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("cache bucket could not be written: {0}")]
    Storage(#[from] std::io::Error),
}
