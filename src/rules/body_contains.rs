// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::errors::RuleError;
use crate::rules::{value_as_string, RawRule, ResponseParts, Rule};

/// Matches when the response body contains the configured substring
#[derive(Debug, Clone)]
pub struct BodyContainsRule {
    rule_type: String,
    not: bool,
    value: String,
}

impl Rule for BodyContainsRule {
    fn matches(&self, _resp: Option<&ResponseParts>, body: &[u8]) -> bool {
        let matched = String::from_utf8_lossy(body).contains(&self.value);
        if self.not {
            return !matched;
        }
        matched
    }

    fn rule_type(&self) -> &str {
        &self.rule_type
    }

    fn negated(&self) -> bool {
        self.not
    }
}

pub(crate) fn decode(raw: &RawRule) -> Result<Box<dyn Rule>, RuleError> {
    let value = value_as_string("body.contains", raw.value.as_ref())?;
    Ok(Box::new(BodyContainsRule {
        rule_type: raw.rule_type.clone(),
        not: raw.not,
        value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_contains_match() {
        let rule = BodyContainsRule {
            rule_type: "body.contains".to_string(),
            not: false,
            value: "models".to_string(),
        };

        assert!(rule.matches(None, br#"{"models": []}"#));
        assert!(!rule.matches(None, br#"{"error": "not found"}"#));
    }

    #[test]
    fn test_body_contains_negated() {
        let rule = BodyContainsRule {
            rule_type: "body.contains".to_string(),
            not: true,
            value: "<!DOCTYPE html".to_string(),
        };

        assert!(rule.matches(None, b"OK"));
        assert!(!rule.matches(None, b"<!DOCTYPE html><body>OK</body>"));
    }
}
