//! HTML tag events and link extraction
//!
//! This module turns an HTML document into a sequence of open-tag events and
//! pulls the link-bearing attribute values out of those events, driven by an
//! [`ElementAttributeTable`].

use scraper::{ElementRef, Html};
use serde::Deserialize;
use std::collections::HashMap;

/// An open (or self-closing) tag with its attributes, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEvent {
    /// Lowercase element name
    pub name: String,

    /// Attribute name/value pairs as they appear on the element
    pub attributes: Vec<(String, String)>,
}

impl TagEvent {
    pub fn new(name: &str, attributes: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect(),
        }
    }
}

/// Tokenizes an HTML document into tag events
///
/// Elements are visited in document order (a pre-order walk of the parsed
/// tree). Text, comments and closing tags produce no events.
///
/// # Example
///
/// ```
/// use sumi_blc::crawler::tag_events;
///
/// let events = tag_events(r#"<p><a href="/x">x</a><img src="/y.png"></p>"#);
/// let names: Vec<_> = events.iter().map(|e| e.name.as_str()).collect();
/// assert_eq!(names, ["html", "head", "body", "p", "a", "img"]);
/// ```
pub fn tag_events(html: &str) -> Vec<TagEvent> {
    let document = Html::parse_document(html);

    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .map(|element| {
            let value = element.value();
            TagEvent {
                name: value.name().to_string(),
                attributes: value
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
            }
        })
        .collect()
}

/// Named presets for the element/attribute table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLevel {
    /// Hyperlinks only: `<a href>` and `<area href>`
    Anchors,
    /// Hyperlinks plus embedded resources (images, media, frames, ...)
    #[default]
    Resources,
}

/// Maps element names to the attributes that carry link references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementAttributeTable {
    elements: HashMap<String, Vec<String>>,
}

impl ElementAttributeTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the link attributes for an element
    pub fn with_element(mut self, element: &str, attributes: &[&str]) -> Self {
        self.elements.insert(
            element.to_ascii_lowercase(),
            attributes.iter().map(|a| a.to_ascii_lowercase()).collect(),
        );
        self
    }

    /// Builds the table for a preset level
    pub fn preset(level: TableLevel) -> Self {
        match level {
            TableLevel::Anchors => Self::anchors(),
            TableLevel::Resources => Self::resources(),
        }
    }

    /// `a` and `area` elements, `href` attribute
    pub fn anchors() -> Self {
        Self::new()
            .with_element("a", &["href"])
            .with_element("area", &["href"])
    }

    /// Anchors plus media, embed, frame and document-level resources
    pub fn resources() -> Self {
        Self::anchors()
            .with_element("audio", &["src"])
            .with_element("embed", &["src"])
            .with_element("iframe", &["src"])
            .with_element("img", &["src"])
            .with_element("input", &["src"])
            .with_element("menuitem", &["icon"])
            .with_element("meta", &["content"])
            .with_element("object", &["data"])
            .with_element("source", &["src"])
            .with_element("track", &["src"])
            .with_element("video", &["src"])
    }

    /// Returns the configured attributes for an element, if it is tracked
    pub fn attributes_for(&self, element: &str) -> Option<&[String]> {
        self.elements.get(element).map(Vec::as_slice)
    }

    /// Returns true if the element is tracked
    pub fn contains(&self, element: &str) -> bool {
        self.elements.contains_key(element)
    }

    /// Number of tracked elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Lazy iterator over raw link values found in a stream of tag events
///
/// Ends when the event stream ends. Not restartable: build a new one per page.
pub struct LinkExtractor<'t, I> {
    events: I,
    table: &'t ElementAttributeTable,
    pending: std::vec::IntoIter<String>,
}

impl<I> Iterator for LinkExtractor<'_, I>
where
    I: Iterator<Item = TagEvent>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(value) = self.pending.next() {
                return Some(value);
            }

            let event = self.events.next()?;
            let Some(wanted) = self.table.attributes_for(&event.name) else {
                continue;
            };

            let values: Vec<String> = wanted
                .iter()
                .flat_map(|name| {
                    event
                        .attributes
                        .iter()
                        .filter(move |(key, _)| key == name)
                        .map(|(_, value)| value.clone())
                })
                .collect();
            self.pending = values.into_iter();
        }
    }
}

/// Extracts raw link values from tag events using the given table
///
/// For every event whose element is in the table, the value of each matching
/// attribute is yielded, in the table's attribute order.
///
/// # Example
///
/// ```
/// use sumi_blc::crawler::{extract_links, tag_events, ElementAttributeTable};
///
/// let html = r#"<a href="/about">About</a><img src="/logo.png">"#;
///
/// let anchors = ElementAttributeTable::anchors();
/// let links: Vec<_> = extract_links(tag_events(html), &anchors).collect();
/// assert_eq!(links, ["/about"]);
///
/// let resources = ElementAttributeTable::resources();
/// let links: Vec<_> = extract_links(tag_events(html), &resources).collect();
/// assert_eq!(links, ["/about", "/logo.png"]);
/// ```
pub fn extract_links<I>(events: I, table: &ElementAttributeTable) -> LinkExtractor<'_, I::IntoIter>
where
    I: IntoIterator<Item = TagEvent>,
{
    LinkExtractor {
        events: events.into_iter(),
        table,
        pending: Vec::new().into_iter(),
    }
}
