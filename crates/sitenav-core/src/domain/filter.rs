//! Filter expressions for model-driven menu options
//!
//! A stored query such as `category__slug=%(category)s, views__gte=10` is
//! first interpolated with the current URL's keyword arguments and then
//! parsed into [`FilterClause`]s. Nothing here evaluates code; clauses are
//! plain data matched against [`Record`] fields or translated to SQL by a
//! store.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::Record;
use super::request::UrlKwargs;
use crate::error::QueryError;

/// Comparison applied by a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    Exact,
    IExact,
    Contains,
    IContains,
    StartsWith,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Lookup {
    pub fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(Lookup::Exact),
            "iexact" => Some(Lookup::IExact),
            "contains" => Some(Lookup::Contains),
            "icontains" => Some(Lookup::IContains),
            "startswith" => Some(Lookup::StartsWith),
            "gt" => Some(Lookup::Gt),
            "gte" => Some(Lookup::Gte),
            "lt" => Some(Lookup::Lt),
            "lte" => Some(Lookup::Lte),
            _ => None,
        }
    }
}

/// One `field__lookup=value` restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Field path; more than one segment walks into nested objects.
    pub path: Vec<String>,
    pub lookup: Lookup,
    pub value: String,
}

impl FilterClause {
    /// Exact match on a field, `__` separating nested segments.
    pub fn equals(field: &str, value: &str) -> Self {
        Self {
            path: field.split("__").map(str::to_string).collect(),
            lookup: Lookup::Exact,
            value: value.to_string(),
        }
    }

    /// Parses a single `key=value` clause.
    pub fn parse(clause: &str) -> Result<Self, QueryError> {
        let parts: Vec<&str> = clause.split('=').collect();
        if parts.len() != 2 {
            return Err(QueryError::MalformedClause(clause.to_string()));
        }
        let key = parts[0].trim();
        let value = parts[1].trim();

        let mut path: Vec<String> = key.split("__").map(str::to_string).collect();
        if path.iter().any(|segment| segment.is_empty()) {
            return Err(QueryError::MalformedClause(clause.to_string()));
        }

        let mut lookup = Lookup::Exact;
        if path.len() > 1 {
            if let Some(found) = path.last().and_then(|s| Lookup::from_suffix(s)) {
                lookup = found;
                path.pop();
            }
        }

        Ok(Self {
            path,
            lookup,
            value: value.to_string(),
        })
    }

    /// Top-level field the clause reads.
    pub fn field(&self) -> &str {
        &self.path[0]
    }

    pub fn matches(&self, record: &Record) -> bool {
        let field = match record.field(&self.path) {
            Some(v) if !v.is_null() => v,
            _ => return false,
        };
        let text = match value_text(field) {
            Some(t) => t,
            None => return false,
        };

        match self.lookup {
            Lookup::Exact => values_equal(field, &self.value),
            Lookup::IExact => text.to_lowercase() == self.value.to_lowercase(),
            Lookup::Contains => text.contains(&self.value),
            Lookup::IContains => text.to_lowercase().contains(&self.value.to_lowercase()),
            Lookup::StartsWith => text.starts_with(&self.value),
            Lookup::Gt => compare_text(field, &self.value) == Ordering::Greater,
            Lookup::Gte => compare_text(field, &self.value) != Ordering::Less,
            Lookup::Lt => compare_text(field, &self.value) == Ordering::Less,
            Lookup::Lte => compare_text(field, &self.value) != Ordering::Greater,
        }
    }
}

/// A sort key; `-name` sorts descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderKey {
    pub path: Vec<String>,
    pub descending: bool,
}

impl OrderKey {
    pub fn field(&self) -> &str {
        &self.path[0]
    }
}

/// Substitutes `%(name)s` placeholders; `%%` is a literal percent sign.
pub fn interpolate(template: &str, kwargs: &UrlKwargs) -> Result<String, QueryError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('%') {
            out.push('%');
            rest = tail;
            continue;
        }

        let inner = after
            .strip_prefix('(')
            .ok_or_else(|| QueryError::MalformedTemplate(format!("stray '%' in '{}'", template)))?;
        let close = inner
            .find(')')
            .ok_or_else(|| QueryError::MalformedTemplate(format!("unclosed placeholder in '{}'", template)))?;
        let name = &inner[..close];
        let tail = inner[close + 1..]
            .strip_prefix('s')
            .ok_or_else(|| QueryError::MalformedTemplate(format!("placeholder '{}' must end in 's'", name)))?;

        let value = kwargs
            .get(name)
            .ok_or_else(|| QueryError::MissingArgument(name.to_string()))?;
        out.push_str(value);
        rest = tail;
    }

    out.push_str(rest);
    Ok(out)
}

/// Parses comma separated clauses. A blank expression has no clauses.
pub fn parse_clauses(expression: &str) -> Result<Vec<FilterClause>, QueryError> {
    if expression.trim().is_empty() {
        return Ok(Vec::new());
    }
    expression.split(',').map(|c| FilterClause::parse(c.trim())).collect()
}

pub fn parse_order_by(expression: &str) -> Vec<OrderKey> {
    expression
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(|key| {
            let (descending, field) = match key.strip_prefix('-') {
                Some(field) => (true, field),
                None => (false, key),
            };
            OrderKey {
                path: field.split("__").map(str::to_string).collect(),
                descending,
            }
        })
        .filter(|key| key.path.iter().all(|s| !s.is_empty()))
        .collect()
}

/// Text form of a field value used for URL arguments and comparisons.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn values_equal(field: &Value, expected: &str) -> bool {
    match field {
        Value::Bool(b) => parse_bool(expected) == Some(*b),
        Value::Number(n) => match (n.as_f64(), expected.parse::<f64>()) {
            (Some(a), Ok(b)) => a == b,
            _ => false,
        },
        other => value_text(other).as_deref() == Some(expected),
    }
}

fn compare_text(field: &Value, expected: &str) -> Ordering {
    if let (Some(a), Ok(b)) = (field.as_f64(), expected.parse::<f64>()) {
        return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    }
    value_text(field).unwrap_or_default().as_str().cmp(expected)
}

/// Ordering used by `order_by`; missing and null values sort first.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => value_text(x).cmp(&value_text(y)),
    }
}
