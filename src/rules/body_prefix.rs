// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::errors::RuleError;
use crate::rules::{value_as_string, RawRule, ResponseParts, Rule};

/// Matches when the response body starts with the configured prefix
#[derive(Debug, Clone)]
pub struct BodyPrefixRule {
    rule_type: String,
    not: bool,
    value: String,
}

impl Rule for BodyPrefixRule {
    fn matches(&self, _resp: Option<&ResponseParts>, body: &[u8]) -> bool {
        let matched = body.starts_with(self.value.as_bytes());
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
    let value = value_as_string("body.prefix", raw.value.as_ref())?;
    Ok(Box::new(BodyPrefixRule {
        rule_type: raw.rule_type.clone(),
        not: raw.not,
        value,
    }))
}
