use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use royal_chronicle::config::AppConfig;
use royal_chronicle::error::FetchError;
use royal_chronicle::offline::{
    AssetCache, CachedResponse, DirCacheStorage, HttpNetwork, ServedFrom,
};

const MAX_HEADER_BYTES: usize = 64 * 1024;

type ProxyCache = AssetCache<DirCacheStorage, HttpNetwork>;

struct HttpRequest {
    method: String,
    target: String,
    headers: HashMap<String, String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load()?;
    let origin = config.origin_url()?;

    let mut cache = AssetCache::new(
        config.cache_version.clone(),
        origin.clone(),
        config.manifest.clone(),
        DirCacheStorage::new(&config.cache_dir),
        HttpNetwork::new(),
    );

    // Si la instalación falla, la versión anterior (si existe) sigue sirviendo
    match cache.install() {
        Ok(count) => {
            log::info!("cached {count} assets from {origin}");
            let removed = cache.activate()?;
            if !removed.is_empty() {
                log::info!("dropped old caches: {}", removed.join(", "));
            }
        }
        Err(err) => log::error!("install of {} failed: {err}", cache.version()),
    }

    let listener = TcpListener::bind(&config.bind)?;
    log::info!("offline proxy for {origin} listening on http://{}", config.bind);

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(err) = handle_connection(&cache, stream) {
                    log::warn!("connection error: {err}");
                }
            }
            Err(err) => log::warn!("accept failed: {err}"),
        }
    }
    Ok(())
}

fn handle_connection(cache: &ProxyCache, mut stream: TcpStream) -> Result<(), String> {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .map_err(|e| e.to_string())?;

    let request = match read_http_request(&mut stream) {
        Ok(req) => req,
        Err(err) => {
            write_text_response(&mut stream, 400, &format!("bad request: {err}"));
            return Ok(());
        }
    };

    if request.method == "GET" && request.target == "/health" {
        write_text_response(&mut stream, 200, "ok");
        return Ok(());
    }

    if request.method != "GET" && request.method != "HEAD" {
        write_text_response(&mut stream, 405, "only GET is proxied");
        return Ok(());
    }

    // Solo rutas del propio origen; el proxy no reenvía a otros hosts
    if !request.target.starts_with('/') {
        write_text_response(&mut stream, 400, "only origin-form targets are proxied");
        return Ok(());
    }

    match cache.handle_fetch(&request.target) {
        Ok(outcome) => {
            let via = match outcome.source {
                ServedFrom::Cache => "cache",
                ServedFrom::Network => "network",
            };
            log::debug!(
                "{} {} -> {} ({via}, host {:?})",
                request.method,
                request.target,
                outcome.response.status,
                request.header("host")
            );
            let head_only = request.method == "HEAD";
            write_cached_response(&mut stream, &outcome.response, via, head_only);
        }
        Err(err @ (FetchError::UnsupportedTarget(_) | FetchError::InvalidUrl { .. })) => {
            write_text_response(&mut stream, 400, &format!("bad request: {err}"));
        }
        Err(err) => {
            log::warn!("{} unavailable: {err}", request.target);
            write_text_response(&mut stream, 502, &format!("unavailable offline: {err}"));
        }
    }
    Ok(())
}

fn read_http_request(stream: &mut TcpStream) -> Result<HttpRequest, String> {
    let mut buffer = Vec::with_capacity(4096);
    let mut temp = [0_u8; 1024];

    loop {
        let n = stream
            .read(&mut temp)
            .map_err(|e| format!("could not read request: {e}"))?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&temp[..n]);

        if find_header_end(&buffer).is_some() {
            break;
        }

        if buffer.len() > MAX_HEADER_BYTES {
            return Err("headers too large".into());
        }
    }

    let header_end = find_header_end(&buffer).ok_or_else(|| "incomplete headers".to_string())?;
    let header_text = std::str::from_utf8(&buffer[..header_end])
        .map_err(|_| "headers are not valid UTF-8".to_string())?;

    let mut lines = header_text.split("\r\n");
    let request_line = lines
        .next()
        .ok_or_else(|| "missing request line".to_string())?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| "missing HTTP method".to_string())?
        .to_string();
    let target = parts
        .next()
        .ok_or_else(|| "missing request target".to_string())?
        .to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| "invalid header (no ':')".to_string())?;
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    Ok(HttpRequest {
        method,
        target,
        headers,
    })
}

fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|w| w == b"\r\n\r\n")
}

impl HttpRequest {
    fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(|s| s.as_str())
    }
}

fn write_text_response(stream: &mut TcpStream, status: u16, body: &str) {
    let response = CachedResponse {
        status,
        content_type: Some("text/plain; charset=utf-8".into()),
        body: body.as_bytes().to_vec(),
    };
    write_cached_response(stream, &response, "proxy", false);
}

fn write_cached_response(
    stream: &mut TcpStream,
    response: &CachedResponse,
    via: &str,
    head_only: bool,
) {
    let status = response.status;
    let status_text = match status {
        200 => "OK",
        204 => "No Content",
        304 => "Not Modified",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        502 => "Bad Gateway",
        _ => "Unknown",
    };
    let content_type = response
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    let head = format!(
        "HTTP/1.1 {status} {status_text}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nX-Served-From: {via}\r\nConnection: close\r\n\r\n",
        response.body.len()
    );

    let _ = stream.write_all(head.as_bytes());
    if !head_only {
        let _ = stream.write_all(&response.body);
    }
    let _ = stream.flush();
}
