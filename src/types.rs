// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Probe Model
 * In-memory representation of probe definitions and scan results
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::RuleError;
use crate::generator;
use crate::rules::{RawRule, Rule};

/// Fallback probes, lowest priority
pub const SPECIFICITY_GENERIC: i32 = 1;
/// Broad detection
pub const SPECIFICITY_LOW: i32 = 25;
/// Default
pub const SPECIFICITY_MEDIUM: i32 = 50;
/// Service-specific markers
pub const SPECIFICITY_HIGH: i32 = 75;
/// Definitive identification
pub const SPECIFICITY_EXACT: i32 = 100;

/// Default: match if ANY request succeeds
pub const REQUIRE_ANY: &str = "any";
/// Match only if ALL requests succeed
pub const REQUIRE_ALL: &str = "all";

/// A declarative service fingerprint: one or more HTTP requests plus match
/// rules, loaded from a single YAML document.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Probe {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub port_hint: u16,
    /// 1-100, 0 treated as default (50)
    #[serde(default)]
    pub specificity: i32,
    /// "any" (default) or "all"
    #[serde(default)]
    pub require: String,
    #[serde(default)]
    pub api_docs: String,
    #[serde(default)]
    pub requests: Vec<Request>,
    #[serde(default)]
    pub models: Option<ModelsRecipe>,
    #[serde(default)]
    pub generator: Option<GeneratorSpec>,
}

impl Probe {
    pub fn requires_all(&self) -> bool {
        self.require.eq_ignore_ascii_case(REQUIRE_ALL)
    }

    pub fn effective_specificity(&self) -> i32 {
        if self.specificity <= 0 {
            return SPECIFICITY_MEDIUM;
        }
        self.specificity
    }

    pub fn apply_defaults(&mut self) {
        for request in &mut self.requests {
            request.apply_defaults();
        }
    }

    /// Materialize generator configs for a matched probe, one per
    /// discovered model, or a single config when no models were found.
    pub fn build_generator_configs(&self, target: &str, models: &[String]) -> Vec<GeneratorConfig> {
        let spec = match &self.generator {
            Some(spec) => spec,
            None => return Vec::new(),
        };

        if models.is_empty() {
            return vec![generator::resolve_config(
                &spec.config_template,
                &spec.generator,
                target,
                "",
            )];
        }

        models
            .iter()
            .map(|model| {
                generator::resolve_config(&spec.config_template, &spec.generator, target, model)
            })
            .collect()
    }
}

/// One HTTP request of a probe and the conjunction of rules its response
/// must satisfy.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Request {
    #[serde(rename = "type", default)]
    pub request_type: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(rename = "match", default)]
    pub raw_match: Vec<RawRule>,
}

impl Request {
    pub fn apply_defaults(&mut self) {
        if self.request_type.is_empty() {
            self.request_type = "http".to_string();
        }
        if self.method.is_empty() {
            self.method = "GET".to_string();
        }
    }

    /// Decode the raw match descriptors in order. Fails on the first bad
    /// rule with its position.
    pub fn compile_rules(&self) -> Result<Vec<Box<dyn Rule>>, RuleError> {
        let mut rules = Vec::with_capacity(self.raw_match.len());
        for (index, raw) in self.raw_match.iter().enumerate() {
            let rule = raw.to_rule().map_err(|source| RuleError::Positional {
                index,
                source: Box::new(source),
            })?;
            rules.push(rule);
        }
        Ok(rules)
    }
}

/// Model enumeration recipe: a request plus a jq expression harvesting
/// model identifier strings from its JSON response.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsRecipe {
    pub path: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    pub extract: String,
}

/// Generator block of a probe: names the downstream generator type and
/// carries the config template to materialize per model.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSpec {
    pub generator: String,
    #[serde(default)]
    pub config_template: GeneratorConfig,
}

/// Config handed to the downstream red-team harness after template
/// resolution. `$TARGET` and `$MODEL` placeholders are substituted by
/// [`generator::resolve_config`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(rename = "type", default)]
    pub generator_type: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub response_path: String,
    #[serde(rename = "content_type", default, skip_serializing_if = "String::is_empty")]
    pub response_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub proxy: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeout: u64,
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

/// One matched probe for one target
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanResult {
    pub target: String,
    pub service: String,
    pub matched_request: String,
    pub category: String,
    pub specificity: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generator_configs: Vec<GeneratorConfig>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_all() {
        let cases = [
            ("all", true),
            ("ALL", true),
            ("All", true),
            ("any", false),
            ("ANY", false),
            ("", false),
            ("invalid", false),
        ];

        for (require, expected) in cases {
            let probe = Probe {
                require: require.to_string(),
                ..Default::default()
            };
            assert_eq!(probe.requires_all(), expected, "require={require:?}");
        }
    }

    #[test]
    fn test_effective_specificity() {
        let cases = [(0, 50), (-5, 50), (1, 1), (75, 75), (100, 100)];
        for (input, expected) in cases {
            let probe = Probe {
                specificity: input,
                ..Default::default()
            };
            assert_eq!(probe.effective_specificity(), expected);
        }
    }

    #[test]
    fn test_request_apply_defaults() {
        let mut request = Request::default();
        request.apply_defaults();
        assert_eq!(request.request_type, "http");
        assert_eq!(request.method, "GET");

        let mut request = Request {
            request_type: "http".to_string(),
            method: "POST".to_string(),
            ..Default::default()
        };
        request.apply_defaults();
        assert_eq!(request.method, "POST");
    }

    #[test]
    fn test_compile_rules_positional_error() {
        let request: Request = serde_yaml::from_str(
            r#"
path: /v1/models
match:
  - type: status
    value: 200
  - type: bogus
    value: x
"#,
        )
        .unwrap();

        let err = request.compile_rules().unwrap_err();
        assert!(err.to_string().starts_with("rule 1:"), "got: {err}");
    }

    #[test]
    fn test_probe_yaml_round() {
        let probe: Probe = serde_yaml::from_str(
            r#"
name: ollama
description: Ollama local inference server
category: self-hosted
port_hint: 11434
specificity: 90
requests:
  - path: /api/tags
    match:
      - type: status
        value: 200
models:
  path: /api/tags
  extract: ".models[].name"
"#,
        )
        .unwrap();

        assert_eq!(probe.name, "ollama");
        assert_eq!(probe.port_hint, 11434);
        assert_eq!(probe.effective_specificity(), 90);
        assert!(!probe.requires_all());
        assert_eq!(probe.requests.len(), 1);
        assert!(probe.models.is_some());
    }

    #[test]
    fn test_build_generator_configs_per_model() {
        let probe: Probe = serde_yaml::from_str(
            r#"
name: ollama
requests:
  - path: /api/tags
    match:
      - type: status
        value: 200
generator:
  generator: openai-compatible
  config_template:
    endpoint: $TARGET/v1/chat/completions
    model: $MODEL
"#,
        )
        .unwrap();

        let configs = probe.build_generator_configs(
            "https://host",
            &["llama3:1b".to_string(), "mistral:7b".to_string()],
        );
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].generator_type, "openai-compatible");
        assert_eq!(configs[0].endpoint, "https://host/v1/chat/completions");
        assert_eq!(configs[0].model, "llama3:1b");
        assert_eq!(configs[1].model, "mistral:7b");

        // No models discovered: one config, $MODEL left in place.
        let configs = probe.build_generator_configs("https://host", &[]);
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].model, "$MODEL");
    }
}
