// src/offline/network.rs

use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Respuesta tal y como se guarda en la caché
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(skip)]
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn ok(content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Acceso a red para la caché offline
pub trait Network {
    fn fetch(&self, url: &Url) -> Result<CachedResponse, FetchError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub struct HttpNetwork {
    client: reqwest::blocking::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpNetwork {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for HttpNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Network for HttpNetwork {
    fn fetch(&self, url: &Url) -> Result<CachedResponse, FetchError> {
        let network_err = |err: reqwest::Error| FetchError::Network {
            url: url.to_string(),
            message: err.to_string(),
        };

        let response = self.client.get(url.clone()).send().map_err(network_err)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().map_err(network_err)?.to_vec();

        Ok(CachedResponse {
            status,
            content_type,
            body,
        })
    }
}
