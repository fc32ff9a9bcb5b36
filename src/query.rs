//! Gmail search query construction
//!
//! Filter inputs are validated here so that nothing the operator types can
//! escape the clause it is placed in.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CleanerError, Result};

static OLDER_THAN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A[0-9]+[ymd]\z").unwrap());

/// Label, age and exclusion filter for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub label: String,
    /// Gmail `older_than:` value such as `1y`, `6m` or `30d`
    pub older_than: String,
    /// Additional Gmail search term; matching threads are excluded
    pub exclude: String,
}

/// How the exclusion term is wrapped in the query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExclusionSyntax {
    /// `-{term}`: braces are forbidden inside the term
    #[default]
    Braces,
    /// `-(term)`: parentheses outside quoted phrases must be balanced
    Parens,
}

/// Fixed clauses and grouping used when rendering a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStyle {
    #[serde(default)]
    pub exclusion_syntax: ExclusionSyntax,
    /// Append `-is:starred` so starred threads are never matched
    #[serde(default = "default_exclude_starred")]
    pub exclude_starred: bool,
}

fn default_exclude_starred() -> bool {
    true
}

impl Default for QueryStyle {
    fn default() -> Self {
        Self {
            exclusion_syntax: ExclusionSyntax::default(),
            exclude_starred: default_exclude_starred(),
        }
    }
}

/// A validated Gmail search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Link that opens the same search in the Gmail web UI
    pub fn web_search_url(&self) -> String {
        format!(
            "https://mail.google.com/mail/#search/{}",
            urlencoding::encode(&self.0)
        )
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate `spec` and render it as a Gmail search query
pub fn build_query(spec: &FilterSpec, style: &QueryStyle) -> Result<SearchQuery> {
    validate_label(&spec.label)?;
    validate_older_than(&spec.older_than)?;
    validate_exclude(&spec.exclude, style.exclusion_syntax)?;

    let mut query = format!("label:\"{}\" older_than:{}", spec.label, spec.older_than);
    if style.exclude_starred {
        query.push_str(" -is:starred");
    }
    if !spec.exclude.is_empty() {
        match style.exclusion_syntax {
            ExclusionSyntax::Braces => query.push_str(&format!(" -{{{}}}", spec.exclude)),
            ExclusionSyntax::Parens => query.push_str(&format!(" -({})", spec.exclude)),
        }
    }

    Ok(SearchQuery(query))
}

fn validate_label(label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(CleanerError::Validation(
            "argument 'label' is required".to_string(),
        ));
    }
    if label.contains('"') {
        return Err(CleanerError::Validation(
            "argument 'label' must not contain any double quotes (\")".to_string(),
        ));
    }
    Ok(())
}

fn validate_older_than(older_than: &str) -> Result<()> {
    if older_than.is_empty() {
        return Err(CleanerError::Validation(
            "argument 'older' is required".to_string(),
        ));
    }
    if !OLDER_THAN_PATTERN.is_match(older_than) {
        return Err(CleanerError::Validation(format!(
            "argument 'older' must be of the form '<number><y|m|d>', got '{}'",
            older_than
        )));
    }
    Ok(())
}

fn validate_exclude(exclude: &str, syntax: ExclusionSyntax) -> Result<()> {
    match syntax {
        ExclusionSyntax::Braces => {
            if exclude.contains('{') || exclude.contains('}') {
                return Err(CleanerError::Validation(
                    "argument 'exclude' must not contain braces ({})".to_string(),
                ));
            }
        }
        ExclusionSyntax::Parens => {
            if !parens_balanced(exclude) {
                return Err(CleanerError::Validation(
                    "argument 'exclude' must not contain unbalanced parentheses".to_string(),
                ));
            }
        }
    }

    if exclude.matches('"').count() % 2 != 0 {
        return Err(CleanerError::Validation(
            "argument 'exclude' must not contain unbalanced double quotes (\")".to_string(),
        ));
    }
    Ok(())
}

/// Parentheses outside double quotes must nest and close; quoted ones are literal text
fn parens_balanced(term: &str) -> bool {
    let mut depth: usize = 0;
    let mut quoted = false;
    for c in term.chars() {
        match c {
            '"' => quoted = !quoted,
            _ if quoted => {}
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}
