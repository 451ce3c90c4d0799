// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! JSON path extraction for model enumeration. Probe recipes carry a jq
//! expression; every string the query yields becomes a model identifier,
//! non-string outputs are skipped.

use jaq_interpret::{Ctx, FilterT, ParseCtx, RcIter, Val};

use crate::errors::ExtractError;

/// Run a jq expression over a JSON body and collect its string outputs.
///
/// Non-JSON bodies, unparseable expressions and query runtime errors are
/// all surfaced; a query that yields nothing returns an empty list.
pub fn extract_strings(body: &[u8], expr: &str) -> Result<Vec<String>, ExtractError> {
    let data: serde_json::Value = serde_json::from_slice(body)?;

    let mut defs = ParseCtx::new(Vec::new());
    defs.insert_natives(jaq_core::core());
    defs.insert_defs(jaq_std::std());

    let (main, parse_errs) = jaq_parse::parse(expr, jaq_parse::main());
    let main = match main {
        Some(main) if parse_errs.is_empty() => main,
        _ => return Err(ExtractError::InvalidQuery(expr.to_string())),
    };

    let filter = defs.compile(main);
    if !defs.errs.is_empty() {
        return Err(ExtractError::InvalidQuery(expr.to_string()));
    }

    let inputs = RcIter::new(core::iter::empty());
    let mut values = Vec::new();

    for output in filter.run((Ctx::new([], &inputs), Val::from(data))) {
        match output {
            Ok(Val::Str(s)) => values.push((*s).clone()),
            Ok(_) => {}
            Err(e) => return Err(ExtractError::Execution(e.to_string())),
        }
    }

    Ok(values)
}
