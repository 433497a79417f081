// ============================================================================
// Sitenav Infrastructure - Pattern Router
// File: crates/sitenav-infrastructure/src/routing/pattern_router.rs
// Description: Route table with `<converter:name>` patterns
// ============================================================================

use std::collections::BTreeSet;

use parking_lot::RwLock;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use sitenav_core::domain::UrlKwargs;
use sitenav_core::routing::{NoReverseMatch, ResolvedPath, RouteEntry, UrlResolver};

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Unknown path converter: {0}")]
    UnknownConverter(String),

    #[error("Route regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Accepted shape of a path argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    Str,
    Int,
    Slug,
    Path,
}

impl Converter {
    fn from_name(name: &str) -> Result<Self, RouteError> {
        match name {
            "str" => Ok(Converter::Str),
            "int" => Ok(Converter::Int),
            "slug" => Ok(Converter::Slug),
            "path" => Ok(Converter::Path),
            other => Err(RouteError::UnknownConverter(other.to_string())),
        }
    }

    fn regex(&self) -> &'static str {
        match self {
            Converter::Str => "[^/]+",
            Converter::Int => "[0-9]+",
            Converter::Slug => "[-a-zA-Z0-9_]+",
            Converter::Path => ".+",
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Argument { name: String, converter: Converter, check: Regex },
}

#[derive(Debug, Clone)]
struct Route {
    name: Option<String>,
    view: String,
    matcher: Regex,
    segments: Vec<Segment>,
}

impl Route {
    fn compile(name: Option<&str>, view: &str, pattern: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut seen = BTreeSet::new();
        let mut rest = pattern;

        while let Some(open) = rest.find('<') {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let close = rest[open..].find('>').ok_or_else(|| invalid("unclosed '<'"))? + open;
            let token = &rest[open + 1..close];
            let (converter, arg) = match token.split_once(':') {
                Some((converter, arg)) => (Converter::from_name(converter)?, arg),
                None => (Converter::Str, token),
            };
            if arg.is_empty() || !arg.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(invalid("argument names must be identifiers"));
            }
            if !seen.insert(arg.to_string()) {
                return Err(invalid("duplicate argument"));
            }
            segments.push(Segment::Argument {
                name: arg.to_string(),
                converter,
                check: Regex::new(&format!("^(?:{})$", converter.regex()))?,
            });
            rest = &rest[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        let mut expression = String::from("^");
        for segment in &segments {
            match segment {
                Segment::Literal(text) => expression.push_str(&regex::escape(text)),
                Segment::Argument { name, converter, .. } => {
                    expression.push_str(&format!("(?P<{}>{})", name, converter.regex()))
                }
            }
        }
        expression.push('$');

        Ok(Self {
            name: name.map(str::to_string),
            view: view.to_string(),
            matcher: Regex::new(&expression)?,
            segments,
        })
    }

    fn arguments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Argument { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    fn capture(&self, path: &str) -> Option<UrlKwargs> {
        let captures = self.matcher.captures(path)?;
        Some(
            self.arguments()
                .filter_map(|arg| captures.name(arg).map(|m| (arg.to_string(), m.as_str().to_string())))
                .collect(),
        )
    }

    /// `None` when the argument set differs or a value is rejected.
    fn build(&self, kwargs: &UrlKwargs) -> Option<String> {
        let wanted: BTreeSet<&str> = self.arguments().collect();
        let given: BTreeSet<&str> = kwargs.keys().map(String::as_str).collect();
        if wanted != given {
            return None;
        }

        let mut path = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Argument { name, check, .. } => {
                    let value = kwargs.get(name)?;
                    if !check.is_match(value) {
                        return None;
                    }
                    path.push_str(value);
                }
            }
        }
        Some(path)
    }
}

/// Ordered route table. Routes may be added after the router is shared.
#[derive(Debug, Default)]
pub struct PatternRouter {
    routes: RwLock<Vec<Route>>,
}

impl PatternRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named route.
    pub fn add(&self, name: &str, view: &str, pattern: &str) -> Result<&Self, RouteError> {
        let route = Route::compile(Some(name), view, pattern)?;
        debug!(name, view, pattern, "Route registered");
        self.routes.write().push(route);
        Ok(self)
    }

    /// Registers a route that resolves but cannot be reversed.
    pub fn add_unnamed(&self, view: &str, pattern: &str) -> Result<&Self, RouteError> {
        let route = Route::compile(None, view, pattern)?;
        self.routes.write().push(route);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }
}

impl UrlResolver for PatternRouter {
    fn resolve(&self, path: &str) -> Option<ResolvedPath> {
        self.routes.read().iter().find_map(|route| {
            route.capture(path).map(|kwargs| ResolvedPath {
                view: route.view.clone(),
                kwargs,
            })
        })
    }

    fn route_table(&self) -> Vec<RouteEntry> {
        self.routes
            .read()
            .iter()
            .filter_map(|route| {
                route.name.as_ref().map(|name| RouteEntry {
                    name: name.clone(),
                    view: route.view.clone(),
                })
            })
            .collect()
    }

    fn route_arguments(&self, name: &str) -> Option<Vec<String>> {
        self.routes
            .read()
            .iter()
            .find(|route| route.name.as_deref() == Some(name))
            .map(|route| route.arguments().map(str::to_string).collect())
    }

    fn reverse(&self, name: &str, kwargs: &UrlKwargs) -> Result<String, NoReverseMatch> {
        let routes = self.routes.read();
        let mut candidates = routes.iter().filter(|route| route.name.as_deref() == Some(name)).peekable();
        if candidates.peek().is_none() {
            return Err(NoReverseMatch::new(name, "no route with this name"));
        }
        candidates
            .find_map(|route| route.build(kwargs))
            .ok_or_else(|| NoReverseMatch::new(name, format!("no pattern accepts arguments {:?}", kwargs)))
    }
}
