// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::errors::RuleError;
use crate::rules::{value_as_string, RawRule, ResponseParts, Rule};

/// Matches when the Content-Type header contains the configured MIME
/// substring, compared case-insensitively on both sides so that
/// `application/json` matches `Application/JSON; charset=utf-8`.
///
/// A missing response means the server never answered; the rule reads as
/// false before negation.
#[derive(Debug, Clone)]
pub struct ContentTypeRule {
    rule_type: String,
    not: bool,
    value: String,
}

impl Rule for ContentTypeRule {
    fn matches(&self, resp: Option<&ResponseParts>, _body: &[u8]) -> bool {
        let resp = match resp {
            Some(resp) => resp,
            None => return self.not,
        };

        let content_type = resp.header("Content-Type").to_lowercase();
        let matched = content_type.contains(&self.value.to_lowercase());

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
    let value = value_as_string("content-type", raw.value.as_ref())?;
    Ok(Box::new(ContentTypeRule {
        rule_type: raw.rule_type.clone(),
        not: raw.not,
        value,
    }))
}
