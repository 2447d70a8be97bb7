//! Document model: element handles, the `Document` trait, and an in-memory tree.
//!
//! The toggle widget never touches a concrete DOM. It talks to a [`Document`],
//! which hands out stable [`ElementId`] handles and exposes the handful of
//! attribute and class-list operations the widget needs. [`MemoryDocument`]
//! is the native implementation used by tests, server-side rendering, and the
//! demo binary; the `hydrate` feature adds a web-sys backed implementation in
//! `browser`.
//!
//! Attribute names are ASCII case-insensitive, as in HTML documents: both
//! implementations lower-case them on the way in.

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

use crate::error::{DomError, SelectorError};
use crate::selector::{Matchable, Selector};

/// Stable handle to an element of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    /// Position of the element in its document's arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }

    #[cfg(feature = "hydrate")]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }
}

/// The document operations the toggle widget and stores rely on.
pub trait Document {
    /// The document element (`<html>`).
    fn root(&self) -> ElementId;

    /// First element in document order matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] when the selector cannot be parsed.
    fn query_selector(&mut self, selector: &str) -> Result<Option<ElementId>, SelectorError>;

    /// All elements in document order matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] when the selector cannot be parsed.
    fn query_selector_all(&mut self, selector: &str) -> Result<Vec<ElementId>, SelectorError>;

    /// Descendants of `<body>` in document order matching `selector`.
    ///
    /// `<body>` itself and anything outside it never match. A document without
    /// a body yields no elements.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] when the selector cannot be parsed.
    fn query_body_selector_all(&mut self, selector: &str) -> Result<Vec<ElementId>, SelectorError>;

    /// Attribute value, or `None` when absent or the handle is unknown.
    fn get_attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Set (or overwrite) an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] for unknown handles or invalid attribute names.
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) -> Result<(), DomError>;

    /// Remove an attribute. Removing an absent attribute is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] for unknown handles or invalid attribute names.
    fn remove_attribute(&mut self, element: ElementId, name: &str) -> Result<(), DomError>;

    /// Add a token to the element's class list.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] for unknown handles or invalid class tokens.
    fn add_class(&mut self, element: ElementId, class: &str) -> Result<(), DomError>;

    /// Remove a token from the element's class list.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] for unknown handles or invalid class tokens.
    fn remove_class(&mut self, element: ElementId, class: &str) -> Result<(), DomError>;

    /// Whether the element's class list contains `class`.
    fn has_class(&self, element: ElementId, class: &str) -> bool;
}

pub(crate) fn validate_attribute_name(name: &str) -> Result<(), DomError> {
    let invalid = name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '>' | '/' | '=' | '<'));
    if invalid {
        return Err(DomError::InvalidAttributeName(name.to_owned()));
    }
    Ok(())
}

pub(crate) fn validate_class_token(class: &str) -> Result<(), DomError> {
    if class.is_empty() || class.chars().any(char::is_whitespace) {
        return Err(DomError::InvalidClassToken(class.to_owned()));
    }
    Ok(())
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self { tag: tag.to_ascii_lowercase(), attrs: Vec::new(), parent, children: Vec::new() }
    }
}

impl Matchable for Node {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// In-memory element tree rooted at `<html>` with a `<body>` child.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    body: ElementId,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        let root = ElementId(0);
        let body = ElementId(1);
        let mut html = Node::new("html", None);
        html.children.push(body);
        Self { nodes: vec![html, Node::new("body", Some(root))], body }
    }
}

impl MemoryDocument {
    /// Create a document containing only `<html>` and `<body>`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Append a new element with `tag` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownElement`] when `parent` is not in this document.
    pub fn create_element(&mut self, parent: ElementId, tag: &str) -> Result<ElementId, DomError> {
        self.node(parent)?;
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node::new(tag, Some(parent)));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Append a new element and set the given attributes on it.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] for an unknown parent or an invalid attribute name.
    pub fn create_element_with(
        &mut self,
        parent: ElementId,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> Result<ElementId, DomError> {
        let id = self.create_element(parent, tag)?;
        for (name, value) in attrs {
            self.set_attribute(id, name, value)?;
        }
        Ok(id)
    }

    /// Lower-case tag name of an element.
    #[must_use]
    pub fn tag_name(&self, element: ElementId) -> Option<&str> {
        self.nodes.get(element.0).map(|n| n.tag.as_str())
    }

    /// Parent of an element; `None` for the root or unknown handles.
    #[must_use]
    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(element.0).and_then(|n| n.parent)
    }

    /// Attributes of an element in insertion order.
    #[must_use]
    pub fn attributes(&self, element: ElementId) -> Vec<(&str, &str)> {
        self.nodes
            .get(element.0)
            .map(|n| n.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect())
            .unwrap_or_default()
    }

    /// Number of elements, including `<html>` and `<body>`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a document holds at least `<html>` and `<body>`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, element: ElementId) -> Result<&Node, DomError> {
        self.nodes.get(element.0).ok_or(DomError::UnknownElement(element.0))
    }

    fn node_mut(&mut self, element: ElementId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(element.0).ok_or(DomError::UnknownElement(element.0))
    }

    /// Pre-order walk from `start`, i.e. document order within its subtree.
    fn subtree_order(&self, start: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(id.0) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn matching(&self, selector: &Selector, candidates: Vec<ElementId>) -> Vec<ElementId> {
        candidates
            .into_iter()
            .filter(|id| self.nodes.get(id.0).is_some_and(|n| selector.matches(n)))
            .collect()
    }

    fn class_tokens(&self, element: ElementId) -> Vec<String> {
        self.get_attribute(element, "class")
            .map(|list| list.split_ascii_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }
}

impl Document for MemoryDocument {
    fn root(&self) -> ElementId {
        ElementId(0)
    }

    fn query_selector(&mut self, selector: &str) -> Result<Option<ElementId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .subtree_order(self.root())
            .into_iter()
            .find(|id| self.nodes.get(id.0).is_some_and(|n| selector.matches(n))))
    }

    fn query_selector_all(&mut self, selector: &str) -> Result<Vec<ElementId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.matching(&selector, self.subtree_order(self.root())))
    }

    fn query_body_selector_all(&mut self, selector: &str) -> Result<Vec<ElementId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        let descendants = self.subtree_order(self.body).into_iter().skip(1).collect();
        Ok(self.matching(&selector, descendants))
    }

    fn get_attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        self.nodes
            .get(element.0)
            .and_then(|n| n.attribute(&name))
            .map(str::to_owned)
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) -> Result<(), DomError> {
        validate_attribute_name(name)?;
        let name = name.to_ascii_lowercase();
        let node = self.node_mut(element)?;
        match node.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => value.clone_into(existing),
            None => node.attrs.push((name, value.to_owned())),
        }
        Ok(())
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) -> Result<(), DomError> {
        validate_attribute_name(name)?;
        let name = name.to_ascii_lowercase();
        self.node_mut(element)?.attrs.retain(|(n, _)| *n != name);
        Ok(())
    }

    fn add_class(&mut self, element: ElementId, class: &str) -> Result<(), DomError> {
        validate_class_token(class)?;
        self.node(element)?;
        let mut tokens = self.class_tokens(element);
        if tokens.iter().any(|t| t == class) {
            return Ok(());
        }
        tokens.push(class.to_owned());
        self.set_attribute(element, "class", &tokens.join(" "))
    }

    fn remove_class(&mut self, element: ElementId, class: &str) -> Result<(), DomError> {
        validate_class_token(class)?;
        self.node(element)?;
        if self.get_attribute(element, "class").is_none() {
            return Ok(());
        }
        let tokens: Vec<String> = self
            .class_tokens(element)
            .into_iter()
            .filter(|t| t != class)
            .collect();
        self.set_attribute(element, "class", &tokens.join(" "))
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.class_tokens(element).iter().any(|t| t == class)
    }
}
