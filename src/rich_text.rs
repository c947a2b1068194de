/*!
 * In-memory rich-text tree of a single cue.
 *
 * Nodes own their children exclusively; a cue owns its root `sync` element.
 * Tag and attribute names are always stored lowercased.
 */

use std::collections::BTreeMap;

/// Tag names the converters understand. Anything else is transparent:
/// its children are rendered, its own markup is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    P,
    Br,
    Font,
    Ruby,
    Rt,
    Rp,
    B,
    I,
    U,
    Other,
}

impl Tag {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "p" => Self::P,
            "br" => Self::Br,
            "font" => Self::Font,
            "ruby" => Self::Ruby,
            "rt" => Self::Rt,
            "rp" => Self::Rp,
            "b" => Self::B,
            "i" => Self::I,
            "u" => Self::U,
            _ => Self::Other,
        }
    }
}

/// A node of the rich-text tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichNode {
    /// Decoded character data
    Text(String),
    /// Markup comment body, without the `<!--` / `-->` delimiters
    Comment(String),
    /// Element with attributes and children
    Element(Element),
}

impl RichNode {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Children of an element, empty for text and comments
    pub fn children(&self) -> &[RichNode] {
        match self {
            Self::Element(element) => &element.children,
            _ => &[],
        }
    }

    /// Concatenated text of this node and all its descendants, comments excluded
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Self::Text(text) => out.push_str(text),
                Self::Comment(_) => {}
                Self::Element(element) => pending.extend(element.children.iter().rev()),
            }
        }
        out
    }
}

impl From<Element> for RichNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Element node.
///
/// `Clone` and `Drop` walk the subtree with an explicit stack, so neither
/// depends on the nesting depth of the cue.
#[derive(Debug, PartialEq, Eq, Default)]
pub struct Element {
    /// Lowercased tag name
    pub name: String,
    /// Attributes keyed by lowercased name
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<RichNode>,
    /// Display name of the language this node belongs to, set during normalization
    pub language: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            language: None,
        }
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<RichNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn tag(&self) -> Tag {
        Tag::from_name(&self.name)
    }

    /// Attribute value by case-insensitive name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Copy of this element without its children
    pub fn shallow_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
            language: self.language.clone(),
        }
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(RichNode::text_content).collect()
    }

    /// Visits every descendant in document (pre-)order. `visit` also gets
    /// the elements between this one and the node, outermost first.
    pub fn visit_descendants<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&[&'a Element], &'a RichNode),
    {
        let mut ancestors: Vec<&'a Element> = Vec::new();
        let mut cursors = vec![self.children.iter()];

        while let Some(cursor) = cursors.last_mut() {
            let Some(node) = cursor.next() else {
                cursors.pop();
                ancestors.pop();
                continue;
            };
            visit(&ancestors, node);
            if let RichNode::Element(element) = node {
                ancestors.push(element);
                cursors.push(element.children.iter());
            }
        }
    }

    /// Descendant elements with the given tag name, in document order
    pub fn find_elements(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.visit_descendants(|_, node| {
            if let Some(element) = node.as_element() {
                if element.name.eq_ignore_ascii_case(name) {
                    found.push(element);
                }
            }
        });
        found
    }
}

impl Clone for Element {
    fn clone(&self) -> Self {
        // Copies under construction, parallel to the source cursors
        let mut copies = vec![self.shallow_clone()];
        let mut cursors = vec![self.children.iter()];

        while let Some(cursor) = cursors.last_mut() {
            match cursor.next() {
                Some(RichNode::Element(element)) => {
                    copies.push(element.shallow_clone());
                    cursors.push(element.children.iter());
                }
                Some(leaf) => {
                    if let Some(parent) = copies.last_mut() {
                        parent.children.push(leaf.clone());
                    }
                }
                None => {
                    cursors.pop();
                    if copies.len() > 1 {
                        if let Some(done) = copies.pop() {
                            if let Some(parent) = copies.last_mut() {
                                parent.children.push(RichNode::Element(done));
                            }
                        }
                    }
                }
            }
        }

        copies.pop().unwrap_or_default()
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let RichNode::Element(mut element) = node {
                pending.append(&mut element.children);
            }
        }
    }
}
