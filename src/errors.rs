// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scanner Error Types
 * Typed error handling with thiserror
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while decoding match rules from probe definitions
#[derive(Error, Debug)]
pub enum RuleError {
    /// The rule `type` field names no registered decoder
    #[error("unknown rule type: {0}")]
    UnknownType(String),

    /// The rule `value` field has the wrong scalar type
    #[error("{rule}: value must be {expected}, got {got}")]
    InvalidValue {
        rule: String,
        expected: &'static str,
        got: String,
    },

    /// A rule failed to decode at a given position within a request
    #[error("rule {index}: {source}")]
    Positional {
        index: usize,
        #[source]
        source: Box<RuleError>,
    },
}

/// Errors raised while loading probe definitions
#[derive(Error, Debug)]
pub enum ProbeLoadError {
    #[error("reading probe directory {dir}: {source}")]
    ReadDir {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("reading {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("parsing embedded probe {name}: {source}")]
    ParseEmbedded {
        name: String,
        source: serde_yaml::Error,
    },
}

/// Errors raised while extracting values from a JSON response body
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid jq expression: {0}")]
    InvalidQuery(String),

    #[error("jq execution error: {0}")]
    Execution(String),
}

/// Errors raised during model enumeration for a matched probe
#[derive(Error, Debug)]
pub enum ModelsError {
    #[error("models request failed: {0}")]
    Request(String),

    #[error("models request returned {0}")]
    BadStatus(u16),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Errors raised while evaluating a single probe request
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("executing request: {0}")]
    Transport(String),

    #[error("parsing rules: {0}")]
    Rules(#[from] RuleError),
}
