// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Target string canonicalization and port extraction. The port feeds the
//! probe catalog pre-sort so port-affine probes run first.

use url::Url;

/// Canonicalize a target: trim whitespace, default to https when no scheme
/// is given, strip trailing slashes. Empty input stays empty. Idempotent.
pub fn normalize_target(target: &str) -> String {
    let target = target.trim();

    if target.is_empty() {
        return String::new();
    }

    let mut normalized = if !target.starts_with("http://") && !target.starts_with("https://") {
        format!("https://{target}")
    } else {
        target.to_string()
    };

    while normalized.ends_with('/') {
        normalized.pop();
    }

    normalized
}

/// Vectorized [`normalize_target`]; empties are dropped.
pub fn normalize_targets(targets: &[String]) -> Vec<String> {
    targets
        .iter()
        .map(|t| normalize_target(t))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Port hint for a target URL: the explicit port when present, otherwise
/// the scheme default (443 for https, 80 for http), otherwise 0.
pub fn extract_port(target: &str) -> u16 {
    let url = match Url::parse(target) {
        Ok(url) => url,
        Err(_) => return 0,
    };

    if let Some(port) = url.port() {
        return port;
    }

    match url.scheme() {
        "https" => 443,
        "http" => 80,
        _ => 0,
    }
}
