// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Probe Catalog Loader
 * Hydrates probe definitions from a directory or the embedded catalog and
 * orders them by port affinity
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::path::Path;
use tracing::debug;

use crate::catalog;
use crate::errors::ProbeLoadError;
use crate::types::Probe;

/// Parse a single probe document
pub fn parse_probe(data: &str) -> Result<Probe, serde_yaml::Error> {
    let mut probe: Probe = serde_yaml::from_str(data)?;
    probe.apply_defaults();
    Ok(probe)
}

/// Load every `.yaml`/`.yml` file under `dir`, one probe per file, in
/// file-name order. The first unreadable or unparseable file aborts the
/// load with an error naming it.
pub fn load_probes_from_dir(dir: &Path) -> Result<Vec<Probe>, ProbeLoadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ProbeLoadError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    paths.sort();

    let mut probes = Vec::new();
    for path in paths {
        if path.is_dir() || !has_yaml_extension(&path) {
            continue;
        }

        let data = std::fs::read_to_string(&path).map_err(|source| ProbeLoadError::ReadFile {
            path: path.clone(),
            source,
        })?;

        let probe = parse_probe(&data).map_err(|source| ProbeLoadError::Parse {
            path: path.clone(),
            source,
        })?;

        probes.push(probe);
    }

    debug!("loaded {} probes from {}", probes.len(), dir.display());
    Ok(probes)
}

/// Load the compiled-in probe catalog
pub fn load_embedded_probes() -> Result<Vec<Probe>, ProbeLoadError> {
    let mut probes = Vec::with_capacity(catalog::EMBEDDED_PROBES.len());
    for (name, data) in catalog::EMBEDDED_PROBES {
        let probe = parse_probe(data).map_err(|source| ProbeLoadError::ParseEmbedded {
            name: name.to_string(),
            source,
        })?;
        probes.push(probe);
    }
    Ok(probes)
}

fn has_yaml_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Stable partition: probes whose `port_hint` equals the target port run
/// first so port-heuristic hits can match early. Relative order among
/// equals is preserved.
pub fn sort_by_port_hint(probes: &[Probe], target_port: u16) -> Vec<Probe> {
    let mut sorted = probes.to_vec();
    sorted.sort_by_key(|probe| probe.port_hint != target_port);
    sorted
}

/// Structural checks for a parsed probe, reported all at once
pub fn validate_probe(probe: &Probe) -> Vec<String> {
    let mut errors = Vec::new();

    if probe.name.is_empty() {
        errors.push("name is required".to_string());
    }

    if probe.requests.is_empty() {
        errors.push("probe must have at least one request".to_string());
    }

    if probe.specificity < 0 || probe.specificity > 100 {
        errors.push(format!(
            "specificity must be 0-100, got {}",
            probe.specificity
        ));
    }

    for (i, request) in probe.requests.iter().enumerate() {
        if request.path.is_empty() {
            errors.push(format!("request {i}: path is required"));
        }
        if request.raw_match.is_empty() {
            errors.push(format!("request {i}: at least one match rule is required"));
        }
        if let Err(e) = request.compile_rules() {
            errors.push(format!("request {i}: {e}"));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID_PROBE: &str = r#"
name: test-service
description: Test probe
category: test
port_hint: 8080
specificity: 75
requests:
  - path: /v1/models
    match:
      - type: status
        value: 200
"#;

    #[test]
    fn test_parse_probe_applies_defaults() {
        let probe = parse_probe(VALID_PROBE).unwrap();
        assert_eq!(probe.name, "test-service");
        assert_eq!(probe.requests[0].request_type, "http");
        assert_eq!(probe.requests[0].method, "GET");
    }

    #[test]
    fn test_load_probes_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.yaml"), VALID_PROBE).unwrap();
        std::fs::write(
            dir.path().join("b.yml"),
            VALID_PROBE.replace("test-service", "other-service"),
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let probes = load_probes_from_dir(dir.path()).unwrap();
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[0].name, "test-service");
        assert_eq!(probes[1].name, "other-service");
    }

    #[test]
    fn test_load_probes_bad_file_aborts_with_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("broken.yaml")).unwrap();
        file.write_all(b"name: [unterminated").unwrap();

        let err = load_probes_from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("broken.yaml"), "got: {err}");
    }

    #[test]
    fn test_load_probes_missing_dir() {
        assert!(load_probes_from_dir(Path::new("/nonexistent/path")).is_err());
    }

    #[test]
    fn test_load_embedded_probes() {
        let probes = load_embedded_probes().unwrap();
        assert!(!probes.is_empty());
        for probe in &probes {
            assert!(
                validate_probe(probe).is_empty(),
                "embedded probe {} is invalid",
                probe.name
            );
        }
    }

    #[test]
    fn test_sort_by_port_hint() {
        let probes = vec![
            Probe {
                name: "generic".to_string(),
                port_hint: 0,
                ..Default::default()
            },
            Probe {
                name: "ollama".to_string(),
                port_hint: 11434,
                ..Default::default()
            },
            Probe {
                name: "vllm".to_string(),
                port_hint: 8000,
                ..Default::default()
            },
        ];

        let sorted = sort_by_port_hint(&probes, 11434);
        assert_eq!(sorted[0].name, "ollama");
        assert_eq!(sorted[1].name, "generic");
        assert_eq!(sorted[2].name, "vllm");

        // No hint matches: order unchanged.
        let sorted = sort_by_port_hint(&probes, 5000);
        assert_eq!(sorted[0].name, "generic");
        assert_eq!(sorted[1].name, "ollama");
        assert_eq!(sorted[2].name, "vllm");
    }

    #[test]
    fn test_validate_probe() {
        let probe = parse_probe(VALID_PROBE).unwrap();
        assert!(validate_probe(&probe).is_empty());

        let empty = Probe::default();
        let errors = validate_probe(&empty);
        assert!(errors.iter().any(|e| e.contains("name is required")));
        assert!(errors.iter().any(|e| e.contains("at least one request")));

        let bad_rule = parse_probe(
            r#"
name: bad
requests:
  - path: /x
    match:
      - type: nonsense
        value: 1
"#,
        )
        .unwrap();
        let errors = validate_probe(&bad_rule);
        assert!(errors.iter().any(|e| e.contains("unknown rule type")));
    }
}
