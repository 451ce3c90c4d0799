// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - LLM Service Fingerprinting Library
 * Exposes the probe engine, loader and output modules
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
pub mod catalog;
pub mod config;
pub mod errors;
pub mod generator;
pub mod output;
pub mod probe_loader;
pub mod target;
pub mod types;

// Match rule registry and evaluators
pub mod rules;

// Coalescing HTTP client and the probe scanner built on it
pub mod http_client;
pub mod scanner;

// JSON path extraction for model enumeration
pub mod extract;
