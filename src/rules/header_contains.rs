// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::errors::RuleError;
use crate::rules::{value_as_string, RawRule, ResponseParts, Rule};

/// Matches when the named response header is present and its value
/// contains the configured substring. An absent header reads as false
/// before negation, so a negated rule matches when the header is missing.
#[derive(Debug, Clone)]
pub struct HeaderContainsRule {
    rule_type: String,
    not: bool,
    header: String,
    value: String,
}

impl Rule for HeaderContainsRule {
    fn matches(&self, resp: Option<&ResponseParts>, _body: &[u8]) -> bool {
        let header_val = match resp {
            Some(resp) => resp.header(&self.header),
            None => "",
        };
        if header_val.is_empty() {
            return self.not;
        }
        let matched = header_val.contains(&self.value);
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
    let value = value_as_string("header.contains", raw.value.as_ref())?;
    Ok(Box::new(HeaderContainsRule {
        rule_type: raw.rule_type.clone(),
        not: raw.not,
        header: raw.header.clone().unwrap_or_default(),
        value,
    }))
}
