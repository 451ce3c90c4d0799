// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::errors::RuleError;
use crate::rules::{value_as_int, RawRule, ResponseParts, Rule};

/// Matches when the response status code equals the configured value
#[derive(Debug, Clone)]
pub struct StatusRule {
    rule_type: String,
    not: bool,
    status: i64,
}

impl Rule for StatusRule {
    fn matches(&self, resp: Option<&ResponseParts>, _body: &[u8]) -> bool {
        let matched = match resp {
            Some(resp) => i64::from(resp.status.as_u16()) == self.status,
            None => false,
        };
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
    let status = value_as_int("status", raw.value.as_ref())?;
    Ok(Box::new(StatusRule {
        rule_type: raw.rule_type.clone(),
        not: raw.not,
        status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;

    fn resp(status: StatusCode) -> ResponseParts {
        ResponseParts {
            status,
            headers: HeaderMap::new(),
        }
    }

    #[test]
    fn test_status_match() {
        let rule = StatusRule {
            rule_type: "status".to_string(),
            not: false,
            status: 200,
        };

        assert!(rule.matches(Some(&resp(StatusCode::OK)), b""));
        assert!(!rule.matches(Some(&resp(StatusCode::NOT_FOUND)), b""));
    }

    #[test]
    fn test_status_match_negated() {
        let rule = StatusRule {
            rule_type: "status".to_string(),
            not: true,
            status: 404,
        };

        assert!(rule.matches(Some(&resp(StatusCode::OK)), b""));
        assert!(!rule.matches(Some(&resp(StatusCode::NOT_FOUND)), b""));
    }

    #[test]
    fn test_status_missing_response() {
        let rule = StatusRule {
            rule_type: "status".to_string(),
            not: false,
            status: 200,
        };
        assert!(!rule.matches(None, b""));
    }
}
