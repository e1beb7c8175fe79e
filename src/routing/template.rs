//! Route template parsing.
//!
//! A template is a `/`-separated list of segments. A segment written as
//! `{name}` is a placeholder that captures the path word at its index; any
//! other segment is a literal that must match exactly.

use std::fmt;
use thiserror::Error;

/// Startup-time errors raised while parsing a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("template `{template}` contains an empty placeholder")]
    EmptyPlaceholder { template: String },

    #[error("template `{template}` has an unbalanced brace in segment `{segment}`")]
    UnbalancedBrace { template: String, segment: String },

    #[error("template `{template}` declares placeholder `{name}` more than once")]
    DuplicatePlaceholder { template: String, name: String },
}

/// One segment of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Strip leading and trailing separators from a request path.
pub fn normalize_path(path: &str) -> &str {
    path.trim_matches('/')
}

/// Split a path into its words. The root path has no words.
pub fn split_segments(path: &str) -> Vec<&str> {
    let trimmed = normalize_path(path);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// A parsed route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    /// Parse a template such as `menu/category/{category}`.
    pub fn parse(template: &str) -> Result<Self, RouteError> {
        let raw = normalize_path(template).to_string();
        let mut segments = Vec::new();
        let mut seen: Vec<&str> = Vec::new();

        for word in split_segments(&raw) {
            let segment = parse_segment(&raw, word)?;
            if let Segment::Placeholder(name) = &segment {
                if seen.contains(&name.as_str()) {
                    return Err(RouteError::DuplicatePlaceholder {
                        template: raw.clone(),
                        name: name.clone(),
                    });
                }
                seen.push(word.trim_start_matches('{').trim_end_matches('}'));
            }
            segments.push(segment);
        }

        Ok(Self { raw, segments })
    }

    /// The normalized template text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in declaration order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segment(template: &str, word: &str) -> Result<Segment, RouteError> {
    let unbalanced = || RouteError::UnbalancedBrace {
        template: template.to_string(),
        segment: word.to_string(),
    };

    match word.strip_prefix('{').and_then(|w| w.strip_suffix('}')) {
        Some(name) => {
            if name.is_empty() {
                return Err(RouteError::EmptyPlaceholder {
                    template: template.to_string(),
                });
            }
            if name.contains(['{', '}']) {
                return Err(unbalanced());
            }
            Ok(Segment::Placeholder(name.to_string()))
        }
        None if word.contains(['{', '}']) => Err(unbalanced()),
        None => Ok(Segment::Literal(word.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_separators() {
        assert_eq!(normalize_path("/menu/item/"), "menu/item");
        assert_eq!(normalize_path("///"), "");
        assert_eq!(split_segments("/"), Vec::<&str>::new());
        assert_eq!(split_segments("/a/b"), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_literals_and_placeholders() {
        let template = RouteTemplate::parse("/menu/item/{item}").unwrap();
        assert_eq!(template.as_str(), "menu/item/{item}");
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("menu".into()),
                Segment::Literal("item".into()),
                Segment::Placeholder("item".into()),
            ]
        );
        assert_eq!(template.placeholders().collect::<Vec<_>>(), vec!["item"]);
    }

    #[test]
    fn test_rejects_malformed_templates() {
        assert!(matches!(
            RouteTemplate::parse("users/{}"),
            Err(RouteError::EmptyPlaceholder { .. })
        ));
        assert!(matches!(
            RouteTemplate::parse("users/{id"),
            Err(RouteError::UnbalancedBrace { .. })
        ));
        assert!(matches!(
            RouteTemplate::parse("users/{a{b}"),
            Err(RouteError::UnbalancedBrace { .. })
        ));
        assert!(matches!(
            RouteTemplate::parse("{id}/x/{id}"),
            Err(RouteError::DuplicatePlaceholder { .. })
        ));
    }

    #[test]
    fn test_root_template_has_no_segments() {
        let template = RouteTemplate::parse("").unwrap();
        assert!(template.segments().is_empty());
    }
}
