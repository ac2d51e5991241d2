//! Listing artifact generation.
//!
//! The listing is a generated JavaScript data module the page renderer
//! imports to list posts without re-parsing documents at render time. Its
//! body is a single default-exported array literal of plain JSON objects,
//! one per published record, in published order.

use crate::extract::PostRecord;
use anyhow::{Context, Result};

/// Header marking the module as machine-generated.
const HEADER: &str = "// Code generated by postdex. DO NOT EDIT.";

/// Render the published records as the listing module.
pub fn render(records: &[PostRecord]) -> Result<String> {
    let body =
        serde_json::to_string_pretty(records).context("failed to serialize post records")?;
    Ok(format!("{HEADER}\nexport default {body};\n"))
}

/// Parse a listing module back into records. Test-side inverse of
/// `render`, used to pin the round-trip property.
#[cfg(test)]
pub(crate) fn parse(artifact: &str) -> Vec<PostRecord> {
    let body = artifact
        .strip_prefix(HEADER)
        .expect("missing generated header")
        .trim_start()
        .strip_prefix("export default ")
        .expect("missing default export")
        .trim_end()
        .strip_suffix(';')
        .expect("missing trailing semicolon");
    serde_json::from_str(body).expect("listing body is not valid JSON")
}
