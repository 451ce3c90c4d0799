// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Probe Scanner
 * Fans probes out against a target under a bounded worker pool, evaluates
 * any-of / all-of match semantics and enumerates models on match
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{ScannerConfig, DEFAULT_CONCURRENCY};
use crate::errors::{ModelsError, RequestError};
use crate::extract::extract_strings;
use crate::http_client::CachedHttpClient;
use crate::types::{ModelsRecipe, Probe, Request, ScanResult};

pub struct Scanner {
    client: CachedHttpClient,
    concurrency: usize,
    emit_generator_configs: bool,
    cancel: CancellationToken,
}

impl Scanner {
    /// Build a scanner with its own client, cache and cancellation scope.
    /// The cache lives as long as the scanner: identical requests across
    /// probes and targets hit the network once.
    pub fn new(config: &ScannerConfig) -> Result<Self> {
        let concurrency = if config.concurrency == 0 {
            DEFAULT_CONCURRENCY
        } else {
            config.concurrency
        };

        let cancel = CancellationToken::new();
        let client = CachedHttpClient::new(config, cancel.clone())?;

        Ok(Self {
            client,
            concurrency,
            emit_generator_configs: config.emit_generator_configs,
            cancel,
        })
    }

    /// Token that aborts in-flight workers and HTTP round trips when
    /// cancelled. Workers check it before starting; a cancelled scan
    /// returns whatever results were produced so far.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run every probe against one target, bounded by the concurrency
    /// ceiling. Results come back sorted by descending specificity;
    /// insertion order is preserved among ties.
    pub async fn scan(&self, target: &str, probes: &[Probe]) -> Vec<ScanResult> {
        let results = Mutex::new(Vec::new());

        stream::iter(probes)
            .for_each_concurrent(self.concurrency, |probe| {
                let results = &results;
                async move {
                    if self.cancel.is_cancelled() {
                        return;
                    }

                    let mut probe = probe.clone();
                    probe.apply_defaults();

                    if let Some(result) = self.run_probe(target, &probe).await {
                        results.lock().await.push(result);
                    }
                }
            })
            .await;

        let mut results = results.into_inner();
        results.sort_by(|a, b| b.specificity.cmp(&a.specificity));
        results
    }

    /// Scan targets sequentially; probes within each target run
    /// concurrently.
    pub async fn scan_all(&self, targets: &[String], probes: &[Probe]) -> Vec<ScanResult> {
        let mut results = Vec::new();
        for target in targets {
            results.extend(self.scan(target, probes).await);
        }
        results
    }

    async fn run_probe(&self, target: &str, probe: &Probe) -> Option<ScanResult> {
        let matched_request = if probe.requires_all() {
            self.evaluate_all(target, probe).await?
        } else {
            self.evaluate_any(target, probe).await?
        };

        debug!(
            "probe {} matched {} on {}",
            probe.name, target, matched_request.path
        );

        let mut result = ScanResult {
            target: format!("{target}{}", matched_request.path),
            service: probe.name.clone(),
            matched_request: matched_request.path.clone(),
            category: probe.category.clone(),
            specificity: probe.effective_specificity(),
            ..Default::default()
        };

        if let Some(recipe) = &probe.models {
            match self.fetch_models(target, recipe).await {
                Ok(models) => {
                    info!(
                        "{}: enumerated {} models via {}",
                        probe.name,
                        models.len(),
                        recipe.path
                    );
                    result.models = models;
                }
                Err(e) => result.error = e.to_string(),
            }
        }

        if self.emit_generator_configs {
            result.generator_configs = probe.build_generator_configs(target, &result.models);
        }

        Some(result)
    }

    /// Any-of semantics: requests run in declared order, the first whose
    /// rule conjunction holds wins. Transport and rule errors on one
    /// request do not stop the iteration.
    async fn evaluate_any<'p>(&self, target: &str, probe: &'p Probe) -> Option<&'p Request> {
        for request in &probe.requests {
            match self.execute_request(target, request).await {
                Ok(true) => return Some(request),
                Ok(false) => {}
                Err(e) => debug!("{}: request {} failed: {}", probe.name, request.path, e),
            }
        }
        None
    }

    /// All-of semantics: every request must match; the first request is
    /// the anchor recorded on the result. A probe with zero requests is a
    /// non-match.
    async fn evaluate_all<'p>(&self, target: &str, probe: &'p Probe) -> Option<&'p Request> {
        if probe.requests.is_empty() {
            return None;
        }

        for request in &probe.requests {
            match self.execute_request(target, request).await {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => {
                    debug!("{}: request {} failed: {}", probe.name, request.path, e);
                    return None;
                }
            }
        }

        probe.requests.first()
    }

    /// Execute one probe request through the coalescing cache and check
    /// its rule conjunction against the exchange.
    async fn execute_request(&self, target: &str, request: &Request) -> Result<bool, RequestError> {
        let url = format!("{target}{}", request.path);
        let exchange = self
            .client
            .execute(&request.method, &url, &request.headers, request.body.as_deref())
            .await;

        if let Some(error) = &exchange.error {
            return Err(RequestError::Transport(error.clone()));
        }

        let rules = request.compile_rules()?;
        Ok(rules
            .iter()
            .all(|rule| rule.matches(exchange.response.as_ref(), &exchange.body)))
    }

    /// Enumerate models for a matched probe. The recipe request flows
    /// through the same cache as probe requests, so enumeration is
    /// cache-coherent with matching.
    async fn fetch_models(&self, target: &str, recipe: &ModelsRecipe) -> Result<Vec<String>, ModelsError> {
        let method = if recipe.method.is_empty() {
            "GET"
        } else {
            recipe.method.as_str()
        };
        let url = format!("{target}{}", recipe.path);

        let exchange = self
            .client
            .execute(method, &url, &recipe.headers, recipe.body.as_deref())
            .await;

        if let Some(error) = &exchange.error {
            return Err(ModelsError::Request(error.clone()));
        }

        let status = exchange
            .response
            .as_ref()
            .map(|resp| resp.status.as_u16())
            .unwrap_or(0);
        if status != 200 {
            return Err(ModelsError::BadStatus(status));
        }

        Ok(extract_strings(&exchange.body, &recipe.extract)?)
    }
}
