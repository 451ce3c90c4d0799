// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Match Rule Registry
 * Declarative response predicates with an open decoder registry
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use once_cell::sync::Lazy;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::RuleError;

pub mod body_contains;
pub mod body_prefix;
pub mod content_type;
pub mod header_contains;
pub mod header_prefix;
pub mod status;

pub use body_contains::BodyContainsRule;
pub use body_prefix::BodyPrefixRule;
pub use content_type::ContentTypeRule;
pub use header_contains::HeaderContainsRule;
pub use header_prefix::HeaderPrefixRule;
pub use status::StatusRule;

/// Response metadata visible to match rules. The body is passed separately
/// because the caching client reads and caps it before rules ever run.
#[derive(Debug, Clone)]
pub struct ResponseParts {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl ResponseParts {
    /// First value of a header, looked up case-insensitively. Missing
    /// headers and non-UTF-8 values both read as empty.
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }
}

/// A single predicate over an HTTP response, with optional negation.
///
/// Implementations are pure: no I/O, no interior state. A `None` response
/// means the server emitted no response at all and reads as false before
/// negation.
pub trait Rule: Send + Sync + std::fmt::Debug {
    fn matches(&self, resp: Option<&ResponseParts>, body: &[u8]) -> bool;
    fn rule_type(&self) -> &str;
    fn negated(&self) -> bool;
}

/// Scalar payload of a raw rule. YAML integers arrive signed, unsigned or
/// floating depending on how the document was written; decoders coerce all
/// three numeric forms to int.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl RuleValue {
    fn type_name(&self) -> &'static str {
        match self {
            RuleValue::Int(_) | RuleValue::UInt(_) => "integer",
            RuleValue::Float(_) => "float",
            RuleValue::Str(_) => "string",
        }
    }
}

/// YAML representation of a match rule before decoding to a typed [`Rule`]
#[derive(Debug, Clone, Deserialize)]
pub struct RawRule {
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(default)]
    pub not: bool,
    #[serde(default)]
    pub value: Option<RuleValue>,
    #[serde(default)]
    pub header: Option<String>,
}

/// Decoder callable installed in the registry for one rule type
pub type Decoder = fn(&RawRule) -> Result<Box<dyn Rule>, RuleError>;

static DECODERS: Lazy<std::sync::RwLock<HashMap<String, Decoder>>> = Lazy::new(|| {
    let mut map: HashMap<String, Decoder> = HashMap::new();
    map.insert("status".to_string(), status::decode as Decoder);
    map.insert("body.contains".to_string(), body_contains::decode as Decoder);
    map.insert("body.prefix".to_string(), body_prefix::decode as Decoder);
    map.insert("header.contains".to_string(), header_contains::decode as Decoder);
    map.insert("header.prefix".to_string(), header_prefix::decode as Decoder);
    map.insert("content-type".to_string(), content_type::decode as Decoder);
    std::sync::RwLock::new(map)
});

/// Install a decoder for a rule type. Re-registering a name replaces the
/// previous decoder.
pub fn register(type_name: &str, decoder: Decoder) {
    DECODERS
        .write()
        .expect("rule registry poisoned")
        .insert(type_name.to_string(), decoder);
}

impl RawRule {
    /// Decode through the registry. Unknown rule types are errors, never
    /// silently ignored.
    pub fn to_rule(&self) -> Result<Box<dyn Rule>, RuleError> {
        let decoder = DECODERS
            .read()
            .expect("rule registry poisoned")
            .get(self.rule_type.as_str())
            .copied()
            .ok_or_else(|| RuleError::UnknownType(self.rule_type.clone()))?;
        decoder(self)
    }
}

/// Registered rule type names, for diagnostics
pub fn registered_types() -> Vec<String> {
    let mut types: Vec<String> = DECODERS
        .read()
        .expect("rule registry poisoned")
        .keys()
        .cloned()
        .collect();
    types.sort_unstable();
    types
}

pub(crate) fn value_as_int(rule: &str, value: Option<&RuleValue>) -> Result<i64, RuleError> {
    match value {
        Some(RuleValue::Int(v)) => Ok(*v),
        Some(RuleValue::UInt(v)) => Ok(*v as i64),
        Some(RuleValue::Float(v)) => Ok(*v as i64),
        Some(other) => Err(RuleError::InvalidValue {
            rule: rule.to_string(),
            expected: "int",
            got: other.type_name().to_string(),
        }),
        None => Err(RuleError::InvalidValue {
            rule: rule.to_string(),
            expected: "int",
            got: "nothing".to_string(),
        }),
    }
}

pub(crate) fn value_as_string(rule: &str, value: Option<&RuleValue>) -> Result<String, RuleError> {
    match value {
        Some(RuleValue::Str(v)) => Ok(v.clone()),
        Some(other) => Err(RuleError::InvalidValue {
            rule: rule.to_string(),
            expected: "string",
            got: other.type_name().to_string(),
        }),
        None => Err(RuleError::InvalidValue {
            rule: rule.to_string(),
            expected: "string",
            got: "nothing".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(yaml: &str) -> RawRule {
        serde_yaml::from_str(yaml).expect("raw rule should parse")
    }

    #[test]
    fn test_decode_known_types() {
        let cases = [
            ("type: status\nvalue: 200", "status", false),
            ("type: body.contains\nvalue: models", "body.contains", false),
            ("type: body.contains\nvalue: error\nnot: true", "body.contains", true),
            ("type: body.prefix\nvalue: OK", "body.prefix", false),
            ("type: header.contains\nheader: Server\nvalue: uvicorn", "header.contains", false),
            ("type: header.prefix\nheader: Server\nvalue: llama", "header.prefix", false),
            ("type: content-type\nvalue: application/json", "content-type", false),
        ];

        for (yaml, want_type, want_not) in cases {
            let rule = raw(yaml).to_rule().expect("rule should decode");
            assert_eq!(rule.rule_type(), want_type);
            assert_eq!(rule.negated(), want_not);
        }
    }

    #[test]
    fn test_decode_unknown_type() {
        let err = raw("type: dns.lookup\nvalue: x").to_rule().unwrap_err();
        assert!(matches!(err, RuleError::UnknownType(t) if t == "dns.lookup"));
    }

    #[test]
    fn test_int_coercion_across_yaml_scalar_forms() {
        // 200 as signed, unsigned and floating scalars all decode to the
        // same canonical integer.
        let resp = ResponseParts {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
        };

        for yaml in ["type: status\nvalue: 200", "type: status\nvalue: 200.0"] {
            let rule = raw(yaml).to_rule().expect("status rule should decode");
            assert!(rule.matches(Some(&resp), b""), "yaml form {yaml:?}");
        }

        let unsigned = RawRule {
            rule_type: "status".to_string(),
            not: false,
            value: Some(RuleValue::UInt(200)),
            header: None,
        };
        let rule = unsigned.to_rule().expect("unsigned status should decode");
        assert!(rule.matches(Some(&resp), b""));
    }

    #[test]
    fn test_int_coercion_rejects_strings() {
        let err = raw("type: status\nvalue: \"200\"").to_rule().unwrap_err();
        assert!(matches!(err, RuleError::InvalidValue { .. }));
    }

    #[test]
    fn test_string_value_rejects_integers() {
        let err = raw("type: body.contains\nvalue: 42").to_rule().unwrap_err();
        assert!(matches!(err, RuleError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let err = raw("type: status").to_rule().unwrap_err();
        assert!(matches!(err, RuleError::InvalidValue { .. }));
    }

    #[test]
    fn test_registered_types_include_builtins() {
        let types = registered_types();
        for builtin in [
            "body.contains",
            "body.prefix",
            "content-type",
            "header.contains",
            "header.prefix",
            "status",
        ] {
            assert!(types.iter().any(|t| t == builtin), "missing {builtin}");
        }
    }

    #[test]
    fn test_register_installs_custom_decoder() {
        fn decode_always(raw: &RawRule) -> Result<Box<dyn Rule>, RuleError> {
            #[derive(Debug)]
            struct AlwaysRule {
                rule_type: String,
                not: bool,
            }
            impl Rule for AlwaysRule {
                fn matches(&self, _resp: Option<&ResponseParts>, _body: &[u8]) -> bool {
                    !self.not
                }
                fn rule_type(&self) -> &str {
                    &self.rule_type
                }
                fn negated(&self) -> bool {
                    self.not
                }
            }
            Ok(Box::new(AlwaysRule {
                rule_type: raw.rule_type.clone(),
                not: raw.not,
            }))
        }

        register("always.custom", decode_always);

        let rule = raw("type: always.custom").to_rule().unwrap();
        assert_eq!(rule.rule_type(), "always.custom");
        assert!(rule.matches(None, b""));
    }

    #[test]
    fn test_negation_duality() {
        // For every rule kind, matches(r) == !matches(not r) against the
        // same response, except where header absence makes both sides read
        // through the absent-is-false convention.
        let mut headers = HeaderMap::new();
        headers.insert("server", "uvicorn/0.18.0".parse().unwrap());
        headers.insert("content-type", "application/json".parse().unwrap());
        let resp = ResponseParts {
            status: StatusCode::OK,
            headers,
        };
        let body = b"OK - ready";

        let cases = [
            "type: status\nvalue: 200",
            "type: body.contains\nvalue: ready",
            "type: body.prefix\nvalue: OK",
            "type: header.contains\nheader: Server\nvalue: uvicorn",
            "type: header.prefix\nheader: Server\nvalue: uvicorn",
            "type: content-type\nvalue: application/json",
        ];

        for yaml in cases {
            let plain = raw(yaml).to_rule().unwrap();
            let negated = raw(&format!("{yaml}\nnot: true")).to_rule().unwrap();
            assert_eq!(
                plain.matches(Some(&resp), body),
                !negated.matches(Some(&resp), body),
                "negation duality violated for {yaml:?}"
            );
        }
    }
}
