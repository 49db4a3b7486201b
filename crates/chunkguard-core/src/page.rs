//! The parts of the page document the fallback heuristic reads.

use anyhow::{Context, Result};

/// A `<link>` element: its `rel` and `href` attributes, when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub rel: Option<String>,
    pub href: Option<String>,
}

impl Link {
    pub fn stylesheet(href: impl Into<String>) -> Self {
        Self {
            rel: Some("stylesheet".to_string()),
            href: Some(href.into()),
        }
    }

    pub fn is_stylesheet(&self) -> bool {
        self.rel.as_deref() == Some("stylesheet")
    }
}

pub trait Document: Send + Sync {
    /// All `<link>` elements currently in the document, in document order.
    fn links(&self) -> Vec<Link>;
    /// The page origin, e.g. `https://app.example.com`.
    fn origin(&self) -> String;
}

/// Fixed snapshot of a document.
#[derive(Debug, Clone)]
pub struct StaticDocument {
    origin: String,
    links: Vec<Link>,
}

impl StaticDocument {
    /// Build from a page location; only its origin is kept.
    pub fn new(location: &str, links: Vec<Link>) -> Result<Self> {
        let parsed = url::Url::parse(location)
            .with_context(|| format!("invalid page location: {location}"))?;
        Ok(Self {
            origin: parsed.origin().ascii_serialization(),
            links,
        })
    }
}

impl Document for StaticDocument {
    fn links(&self) -> Vec<Link> {
        self.links.clone()
    }

    fn origin(&self) -> String {
        self.origin.clone()
    }
}
