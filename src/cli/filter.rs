//! Filter candidate documents with a predicate tree

use super::{check::load_predicate, CliError};
use crate::interchange::document_from_json;
use crate::matcher::Matcher;

/// Options for the filter command
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Predicate tree as JSON text
    pub tree: String,
    /// Candidate documents: a JSON array, or one JSON object
    pub input: String,
}

/// Evaluates the predicate against every candidate and returns the
/// documents that matched, in input order.
pub fn execute_filter(options: &FilterOptions) -> Result<Vec<serde_json::Value>, CliError> {
    let node = load_predicate(&options.tree)?;
    let parsed: serde_json::Value = serde_json::from_str(&options.input)?;
    let candidates = match parsed {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };

    let mut matches = Vec::new();
    for (index, raw) in candidates.iter().enumerate() {
        let doc = document_from_json(raw)?;
        let mut matcher = Matcher::new(&doc);
        if matcher.matches(&node)? {
            log::debug!("document {} matched", index);
            matches.push(raw.clone());
        }
    }
    Ok(matches)
}
