// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scanner Configuration
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
/// 10 MiB response body ceiling to keep scan memory bounded
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScannerConfig {
    /// Maximum concurrent probe requests per target
    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request HTTP timeout
    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Response bodies beyond this are truncated before matching
    #[validate(range(min = 1))]
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// Custom CA certificate bundle, PEM encoded
    #[serde(default)]
    pub ca_cert_path: Option<PathBuf>,

    /// Materialize generator configs for matched probes that carry a
    /// template
    #[serde(default)]
    pub emit_generator_configs: bool,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            insecure_skip_verify: false,
            ca_cert_path: None,
            emit_generator_configs: false,
        }
    }
}
