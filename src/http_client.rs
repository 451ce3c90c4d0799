// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Coalescing HTTP Client
 * Scanner-scoped client with response memoization and singleflight
 * deduplication of concurrent identical requests
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::{Context, Result};
use reqwest::{Client, Method};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ScannerConfig;
use crate::rules::ResponseParts;

/// One memoized request/response exchange. Errors are cached alongside
/// successes so a failing endpoint is hit once per scanner lifetime. The
/// body is pre-read and capped; the streaming handle is gone by the time
/// an exchange is visible to callers.
#[derive(Debug)]
pub struct CachedExchange {
    pub response: Option<ResponseParts>,
    pub body: Vec<u8>,
    pub error: Option<String>,
    pub truncated: bool,
}

impl CachedExchange {
    fn failed(error: String) -> Self {
        Self {
            response: None,
            body: Vec::new(),
            error: Some(error),
            truncated: false,
        }
    }
}

/// HTTP client whose responses are memoized by a canonical fingerprint of
/// `(method, url, sorted headers, body)`. Concurrent callers with the same
/// fingerprint coalesce into one round trip; everyone reads the same
/// cached exchange afterwards.
pub struct CachedHttpClient {
    client: Client,
    cache: RwLock<HashMap<String, Arc<CachedExchange>>>,
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    max_response_bytes: usize,
    cancel: CancellationToken,
}

impl CachedHttpClient {
    pub fn new(config: &ScannerConfig, cancel: CancellationToken) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("nuuskija/", env!("CARGO_PKG_VERSION")))
            .tcp_nodelay(true);

        if config.insecure_skip_verify {
            if config.ca_cert_path.is_some() {
                warn!("--insecure overrides --ca-cert; custom CA certificate will be ignored");
            }
            builder = builder.danger_accept_invalid_certs(true);
        } else if let Some(path) = &config.ca_cert_path {
            let pem = std::fs::read(path)
                .with_context(|| format!("reading CA cert {}", path.display()))?;
            let cert =
                reqwest::Certificate::from_pem(&pem).context("failed to parse CA cert")?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            cache: RwLock::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
            max_response_bytes: config.max_response_bytes,
            cancel,
        })
    }

    /// Execute a request, serving from the cache when an identical request
    /// already ran within this client's lifetime.
    ///
    /// Late callers for an in-flight key park on a per-key barrier and read
    /// the stored exchange once the first caller completes; the underlying
    /// engine sees at most one round trip per fingerprint.
    pub async fn execute(
        &self,
        method: &str,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&str>,
    ) -> Arc<CachedExchange> {
        let key = fingerprint(method, url, headers, body);

        if let Some(hit) = self.cache.read().await.get(&key) {
            debug!("cache hit: {} {}", method, url);
            return Arc::clone(hit);
        }

        let barrier = {
            let mut inflight = self.inflight.lock().await;
            Arc::clone(
                inflight
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };

        let _guard = barrier.lock().await;

        // A coalesced caller lands here after the winner stored its result.
        if let Some(hit) = self.cache.read().await.get(&key) {
            debug!("coalesced: {} {}", method, url);
            return Arc::clone(hit);
        }

        let exchange = Arc::new(self.round_trip(method, url, headers, body).await);

        self.cache
            .write()
            .await
            .insert(key.clone(), Arc::clone(&exchange));
        self.inflight.lock().await.remove(&key);

        exchange
    }

    async fn round_trip(
        &self,
        method: &str,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&str>,
    ) -> CachedExchange {
        let http_method = Method::from_bytes(method.as_bytes()).unwrap_or(Method::GET);

        let mut builder = self.client.request(http_method, url);
        for (key, value) in headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        let send = async {
            let response = builder.send().await;
            match response {
                Ok(response) => {
                    let parts = ResponseParts {
                        status: response.status(),
                        headers: response.headers().clone(),
                    };
                    match self.read_capped(response, url).await {
                        Ok((body, truncated)) => CachedExchange {
                            response: Some(parts),
                            body,
                            error: None,
                            truncated,
                        },
                        Err(e) => {
                            debug!("{} {}: failed to read body: {}", method, url, e);
                            CachedExchange::failed(format!("reading body: {e}"))
                        }
                    }
                }
                Err(e) => {
                    debug!("{} {}: {}", method, url, e);
                    CachedExchange::failed(e.to_string())
                }
            }
        };

        tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!("{} {}: cancelled", method, url);
                CachedExchange::failed("scan cancelled".to_string())
            }
            exchange = send => exchange,
        }
    }

    /// Read the response body up to `max_response_bytes`. Longer bodies
    /// are truncated; matching proceeds on whatever was read.
    async fn read_capped(
        &self,
        mut response: reqwest::Response,
        url: &str,
    ) -> std::result::Result<(Vec<u8>, bool), reqwest::Error> {
        let mut body = Vec::new();
        let mut truncated = false;

        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_response_bytes {
                let take = self.max_response_bytes - body.len();
                body.extend_from_slice(&chunk[..take]);
                truncated = true;
                warn!(
                    "response body for {} exceeds {} bytes, truncating",
                    url, self.max_response_bytes
                );
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok((body, truncated))
    }
}

/// Canonical request fingerprint: SHA-256 over method, url, header
/// key/value pairs in sorted key order, and the body bytes.
pub fn fingerprint(
    method: &str,
    url: &str,
    headers: &HashMap<String, String>,
    body: Option<&str>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(url.as_bytes());

    let mut keys: Vec<&String> = headers.keys().collect();
    keys.sort();
    for key in keys {
        hasher.update(key.as_bytes());
        hasher.update(headers[key].as_bytes());
    }

    if let Some(body) = body {
        hasher.update(body.as_bytes());
    }

    hex::encode(hasher.finalize())
}
