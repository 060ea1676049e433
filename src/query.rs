//! Parser for the query expressions sent by the dashboard, e.g.
//! `derivative(sum({metric:'sin',group:'all'}[5m]))`.
//!
//! Up to two function calls wrap an optional bracket parameter, which wraps
//! a brace-delimited selector of `key:'value'` pairs.

use crate::metric::LabelFilter;
use log::debug;
use thiserror::Error;

/// Functions applied to each selected series.
pub const FUNCTIONS: &[&str] = &["derivative"];

/// Functions combining all selected series into one.
pub const AGGREGATION_FUNCTIONS: &[&str] = &["sum"];

#[derive(Error, Debug, PartialEq)]
pub enum QueryError {
    #[error("selector {0:?} is not wrapped in braces")]
    UnbracedSelector(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    // Detected but never applied to generated values.
    pub wants_function: bool,
    pub wants_aggregate: bool,
    // Bracket parameter such as `5m`. Not applied either.
    pub window: Option<String>,
    pub filter: LabelFilter,
}

impl QuerySpec {
    /// Like [`parse`], but a selector that isn't wrapped in braces yields an
    /// empty filter, which matches every series.
    pub fn parse_lenient(s: &str) -> Self {
        let (mut spec, selector) = peel(s);
        match parse_selector(selector) {
            Ok(filter) => spec.filter = filter,
            Err(e) => debug!("falling back to empty label filter: {}", e),
        }
        spec
    }
}

pub fn parse(s: &str) -> Result<QuerySpec, QueryError> {
    let (mut spec, selector) = peel(s);
    spec.filter = parse_selector(selector)?;
    Ok(spec)
}

// Strips the function calls and bracket parameter, returning the selector text.
fn peel(s: &str) -> (QuerySpec, &str) {
    let (outer, body) = split_call(s);
    let (inner, body) = split_call(body);
    let (window, selector) = split_bracket(body);
    let spec = QuerySpec {
        wants_function: is_function(outer) || is_function(inner),
        wants_aggregate: is_aggregation(outer),
        window: window.map(str::to_string),
        filter: LabelFilter::new(),
    };
    (spec, selector)
}

fn is_function(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

fn is_aggregation(name: &str) -> bool {
    AGGREGATION_FUNCTIONS.contains(&name)
}

// `name(body)` -> (name, body). Anything else -> ("", s).
fn split_call(s: &str) -> (&str, &str) {
    match (s.strip_suffix(')'), s.find('(')) {
        (Some(stripped), Some(open)) => (&s[..open], &stripped[open + 1..]),
        _ => ("", s),
    }
}

// `base[param]` -> (Some(param), base). Anything else -> (None, s).
fn split_bracket(s: &str) -> (Option<&str>, &str) {
    match (s.strip_suffix(']'), s.find('[')) {
        (Some(stripped), Some(open)) => (Some(&stripped[open + 1..]), &s[..open]),
        _ => (None, s),
    }
}

fn parse_selector(s: &str) -> Result<LabelFilter, QueryError> {
    let inner = s
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| QueryError::UnbracedSelector(s.to_string()))?;

    let mut filter = LabelFilter::new();
    for part in inner.split(',') {
        match part.split_once(':') {
            Some((key, value)) => match unquote(value) {
                Some(value) => {
                    filter.insert(key.to_string(), value.to_string());
                }
                None => debug!("dropping label {:?}: value is not single-quoted", part),
            },
            None => debug!("dropping label {:?}: missing ':'", part),
        }
    }
    Ok(filter)
}

fn unquote(s: &str) -> Option<&str> {
    s.strip_prefix('\'')?.strip_suffix('\'')
}
