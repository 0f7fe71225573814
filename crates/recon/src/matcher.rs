use regex::Regex;
use serde::Deserialize;

use crate::error::{ReconError, Side};

/// Decides whether a header name is selected by a key pattern.
///
/// The reconciler only ever asks "does this header match"; strategies can be
/// swapped without touching the matching loop.
pub trait HeaderMatcher {
    /// The pattern text, for error messages and logs.
    fn pattern(&self) -> &str;

    fn selects(&self, header: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Exact,
    Contains,
    #[default]
    Regex,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Contains => "contains",
            MatchMode::Regex => "regex",
        }
    }
}

/// Built-in key pattern strategies.
#[derive(Debug, Clone)]
pub enum KeyPattern {
    Exact(String),
    Contains(String),
    /// Unanchored search, so `订单.*号` selects `订单编号`.
    Regex(Regex),
}

impl KeyPattern {
    pub fn compile(pattern: &str, mode: MatchMode) -> Result<Self, ReconError> {
        Ok(match mode {
            MatchMode::Exact => KeyPattern::Exact(pattern.to_string()),
            MatchMode::Contains => KeyPattern::Contains(pattern.to_string()),
            MatchMode::Regex => {
                let re = Regex::new(pattern).map_err(|e| ReconError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })?;
                KeyPattern::Regex(re)
            }
        })
    }

    pub fn compile_all<S: AsRef<str>>(
        patterns: &[S],
        mode: MatchMode,
    ) -> Result<Vec<Self>, ReconError> {
        patterns
            .iter()
            .map(|p| KeyPattern::compile(p.as_ref(), mode))
            .collect()
    }
}

impl HeaderMatcher for KeyPattern {
    fn pattern(&self) -> &str {
        match self {
            KeyPattern::Exact(p) | KeyPattern::Contains(p) => p,
            KeyPattern::Regex(re) => re.as_str(),
        }
    }

    fn selects(&self, header: &str) -> bool {
        match self {
            KeyPattern::Exact(p) => header == p,
            KeyPattern::Contains(p) => header.contains(p.as_str()),
            KeyPattern::Regex(re) => re.is_match(header),
        }
    }
}

/// One resolved key: the column it selects in each table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyColumns {
    pub target: usize,
    pub source: usize,
}

/// First header selected by `matcher`.
pub fn find_column<M: HeaderMatcher + ?Sized>(headers: &[String], matcher: &M) -> Option<usize> {
    headers.iter().position(|h| matcher.selects(h))
}

/// Every header selected by any of `matchers`, ascending.
pub fn matching_columns<M: HeaderMatcher>(headers: &[String], matchers: &[M]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| matchers.iter().any(|m| m.selects(h)))
        .map(|(i, _)| i)
        .collect()
}

/// Resolve each key pattern to a (target, source) column pair, in key order.
///
/// For every pattern the target side is checked before the source side.
pub fn resolve_key_columns<M: HeaderMatcher>(
    target_headers: &[String],
    source_headers: &[String],
    keys: &[M],
) -> Result<Vec<KeyColumns>, ReconError> {
    keys.iter()
        .map(|key| -> Result<KeyColumns, ReconError> {
            let target = find_column(target_headers, key).ok_or_else(|| {
                ReconError::KeyFieldNotFound {
                    pattern: key.pattern().to_string(),
                    side: Side::Target,
                }
            })?;
            let source = find_column(source_headers, key).ok_or_else(|| {
                ReconError::KeyFieldNotFound {
                    pattern: key.pattern().to_string(),
                    side: Side::Source,
                }
            })?;
            Ok(KeyColumns { target, source })
        })
        .collect()
}
