// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Generator-config materialization. Templates carried on probes are
//! resolved into concrete configs for the downstream red-team harness by
//! substituting `$TARGET` and `$MODEL` placeholders.

use std::collections::HashMap;

use crate::types::GeneratorConfig;

/// Resolve a config template against a target and an optional model.
/// The generator type from the probe's `generator` field is stamped onto
/// the resolved config.
pub fn resolve_config(
    template: &GeneratorConfig,
    generator_type: &str,
    target: &str,
    model: &str,
) -> GeneratorConfig {
    let mut config = template.clone();
    config.generator_type = generator_type.to_string();
    config.endpoint = resolve_vars(&config.endpoint, target, model);
    config.api_key = resolve_vars(&config.api_key, target, model);
    config.model = resolve_vars(&config.model, target, model);
    config.body = resolve_vars(&config.body, target, model);
    config.response_path = resolve_vars(&config.response_path, target, model);
    config.proxy = resolve_vars(&config.proxy, target, model);

    if !config.headers.is_empty() {
        let mut resolved = HashMap::with_capacity(config.headers.len());
        for (key, value) in &config.headers {
            resolved.insert(key.clone(), resolve_vars(value, target, model));
        }
        config.headers = resolved;
    }

    config
}

/// `$MODEL` is only substituted when a model is known, so templates stay
/// recognizable in configs built for probes without model enumeration.
fn resolve_vars(s: &str, target: &str, model: &str) -> String {
    let mut resolved = s.replace("$TARGET", target);
    if !model.is_empty() {
        resolved = resolved.replace("$MODEL", model);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_vars() {
        assert_eq!(
            resolve_vars("$TARGET/v1/chat", "https://host", "llama3"),
            "https://host/v1/chat"
        );
        assert_eq!(resolve_vars("model=$MODEL", "https://host", "llama3"), "model=llama3");
        assert_eq!(resolve_vars("model=$MODEL", "https://host", ""), "model=$MODEL");
    }

    #[test]
    fn test_resolve_config_headers_and_type() {
        let mut template = GeneratorConfig {
            endpoint: "$TARGET/api/chat".to_string(),
            ..Default::default()
        };
        template
            .headers
            .insert("Authorization".to_string(), "Bearer $MODEL-key".to_string());

        let config = resolve_config(&template, "ollama", "http://10.0.0.5:11434", "llama3:1b");
        assert_eq!(config.generator_type, "ollama");
        assert_eq!(config.endpoint, "http://10.0.0.5:11434/api/chat");
        assert_eq!(config.headers["Authorization"], "Bearer llama3:1b-key");
    }
}
