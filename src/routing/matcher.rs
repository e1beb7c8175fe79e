//! Route matching logic.
//!
//! # Responsibilities
//! - Compare path word count against template arity
//! - Match literal segments (exact, case-sensitive)
//! - Capture placeholder segments under their declared names
//!
//! # Design Decisions
//! - Matchers are compiled once from a parsed template
//! - Literal slots are checked before anything is captured
//! - No regex to guarantee O(n) matching

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::routing::template::{RouteTemplate, Segment};

/// Parameters captured by a placeholder match, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(String, String)>);

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Look up a captured value by placeholder name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn push(&mut self, name: &str, value: &str) {
        self.0.push((name.to_string(), value.to_string()));
    }
}

impl Serialize for RouteParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A compiled matcher for one route template.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    arity: usize,
    literals: Vec<(usize, String)>,
    captures: Vec<(usize, String)>,
}

impl PathMatcher {
    /// Compile a matcher from a parsed template.
    pub fn compile(template: &RouteTemplate) -> Self {
        let mut literals = Vec::new();
        let mut captures = Vec::new();

        for (index, segment) in template.segments().iter().enumerate() {
            match segment {
                Segment::Literal(word) => literals.push((index, word.clone())),
                Segment::Placeholder(name) => captures.push((index, name.clone())),
            }
        }

        Self {
            arity: template.segments().len(),
            literals,
            captures,
        }
    }

    /// Number of segments a path must have to be a candidate.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Returns the captured params if the path words match this template.
    pub fn matches(&self, words: &[&str]) -> Option<RouteParams> {
        if words.len() != self.arity {
            return None;
        }

        let literals_agree = self
            .literals
            .iter()
            .all(|(index, literal)| words[*index] == literal.as_str());
        if !literals_agree {
            return None;
        }

        let mut params = RouteParams::new();
        for (index, name) in &self.captures {
            params.push(name, words[*index]);
        }
        Some(params)
    }

    /// True if every path this matcher accepts is also accepted by `earlier`.
    pub(crate) fn is_shadowed_by(&self, earlier: &PathMatcher) -> bool {
        self.arity == earlier.arity
            && earlier.literals.iter().all(|(index, literal)| {
                self.literals
                    .iter()
                    .any(|(i, l)| i == index && l == literal)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(template: &str) -> PathMatcher {
        PathMatcher::compile(&RouteTemplate::parse(template).unwrap())
    }

    #[test]
    fn test_literal_matcher() {
        let matcher = compile("menu/categories");
        assert!(matcher.matches(&["menu", "categories"]).is_some());
        assert!(matcher.matches(&["menu", "Categories"]).is_none()); // Case sensitive
        assert!(matcher.matches(&["menu"]).is_none());
    }

    #[test]
    fn test_placeholder_capture_order() {
        let matcher = compile("records/{collection}/{key}");
        let params = matcher.matches(&["records", "users", "42"]).unwrap();

        assert_eq!(params.get("collection"), Some("users"));
        assert_eq!(params.get("key"), Some("42"));
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            vec![("collection", "users"), ("key", "42")]
        );
    }

    #[test]
    fn test_params_serialize_as_object() {
        let params = compile("menu/item/{item}").matches(&["menu", "item", "7"]).unwrap();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({ "item": "7" }));
    }

    #[test]
    fn test_shadowing_detection() {
        let general = compile("resource/{id}");
        let specific = compile("resource/action");
        assert!(specific.is_shadowed_by(&general));
        assert!(!general.is_shadowed_by(&specific));
    }
}
