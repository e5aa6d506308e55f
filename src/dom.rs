//! Owned in-memory XML tree.
//!
//! Documents are read with quick-xml's event reader and kept as a plain tree of
//! [`Node`]s. Whitespace text, comments and processing instructions are kept so
//! that an untouched document serializes back to equivalent markup. Namespace
//! declarations are ordinary attributes and stay exactly where they were parsed.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{error::Error, serializer};

/// One node of an XML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data, already unescaped.
    Text(String),
    CData(String),
    Comment(String),
    /// Processing instruction (including the XML declaration), raw content
    /// between `<?` and `?>`.
    ProcessingInstruction(String),
    DocType(String),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Character content of text and CDATA nodes.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) | Node::CData(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn is_whitespace_text(&self) -> bool {
        matches!(self, Node::Text(text) if text.trim().is_empty())
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Unescaped attribute value.
    pub value: String,
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Qualified name as written, e.g. `trans-unit` or `xlf:source`.
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Name without namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Sets an attribute, replacing the value in place if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let position = self.attributes.iter().position(|attr| attr.name == name)?;
        Some(self.attributes.remove(position).value)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// First child element with the given local name.
    pub fn child_element(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|child| child.local_name() == name)
    }

    pub fn child_element_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.child_elements_mut()
            .find(|child| child.local_name() == name)
    }

    pub fn has_child_elements(&self) -> bool {
        self.children.iter().any(Node::is_element)
    }

    /// All descendant elements with the given local name, in document order.
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_by_tag_name(self, name, &mut found);
        found
    }

    /// Depth-first search over descendants (the receiver itself excluded).
    pub fn find_descendant<F>(&self, predicate: &F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        for child in self.child_elements() {
            if predicate(child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(predicate) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_descendant_mut<F>(&mut self, predicate: &F) -> Option<&mut Element>
    where
        F: Fn(&Element) -> bool,
    {
        for child in self.child_elements_mut() {
            if predicate(child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant_mut(predicate) {
                return Some(found);
            }
        }
        None
    }

    pub fn append_child(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Inserts before the child at `index`; appends when `index` is past the end.
    pub fn insert_child(&mut self, index: usize, node: impl Into<Node>) {
        let index = index.min(self.children.len());
        self.children.insert(index, node.into());
    }

    /// Index (into `children`) of the first child element with the given local name.
    pub fn position_of_child_element(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(e) if e.local_name() == name))
    }

    /// Removes all child elements with the given local name, returning how many were removed.
    pub fn remove_child_elements(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, Node::Element(e) if e.local_name() == name));
        before - self.children.len()
    }

    /// Like [`Element::elements_by_tag_name`], but matching elements are not
    /// searched for nested matches.
    pub fn elements_by_tag_name_mut(&mut self, name: &str) -> Vec<&mut Element> {
        let mut found = Vec::new();
        collect_by_tag_name_mut(self, name, &mut found);
        found
    }

    /// Removes the first descendant matching `predicate` together with the
    /// whitespace text directly in front of it. Returns whether one was found.
    pub fn remove_descendant<F>(&mut self, predicate: &F) -> bool
    where
        F: Fn(&Element) -> bool,
    {
        let position = self
            .children
            .iter()
            .position(|node| node.as_element().is_some_and(predicate));
        if let Some(position) = position {
            self.children.remove(position);
            if position > 0 && self.children[position - 1].is_whitespace_text() {
                self.children.remove(position - 1);
            }
            return true;
        }
        self.child_elements_mut()
            .any(|child| child.remove_descendant(predicate))
    }

    /// Concatenated character data of all descendants.
    pub fn text_content(&self) -> String {
        let mut content = String::new();
        collect_text(self, &mut content);
        content
    }

    /// Markup of the children, without the element's own start and end tag.
    pub fn inner_xml(&self) -> String {
        serializer::serialize_children(self)
    }
}

fn collect_by_tag_name<'a>(element: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    for child in element.child_elements() {
        if child.local_name() == name {
            found.push(child);
        }
        collect_by_tag_name(child, name, found);
    }
}

fn collect_by_tag_name_mut<'a>(element: &'a mut Element, name: &str, found: &mut Vec<&'a mut Element>) {
    for child in element.child_elements_mut() {
        if child.local_name() == name {
            found.push(child);
        } else {
            collect_by_tag_name_mut(child, name, found);
        }
    }
}

fn collect_text(element: &Element, content: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(text) | Node::CData(text) => content.push_str(text),
            Node::Element(element) => collect_text(element, content),
            _ => {}
        }
    }
}

/// A parsed XML document: prolog nodes, exactly one root element, epilog nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn parse(xml: &str) -> Result<Self, Error> {
        let mut reader = Reader::from_str(xml);

        let mut open: Vec<Element> = Vec::new();
        let mut children: Vec<Node> = Vec::new();

        loop {
            let node = match reader.read_event()? {
                Event::Start(ref e) => {
                    open.push(element_from_start(e)?);
                    continue;
                }
                Event::End(_) => match open.pop() {
                    Some(element) => Node::Element(element),
                    None => return Err(Error::malformed_xml("unexpected end tag")),
                },
                Event::Empty(ref e) => Node::Element(element_from_start(e)?),
                Event::Text(e) => Node::Text(e.unescape()?.into_owned()),
                Event::CData(e) => Node::CData(decode(&e)?),
                Event::Comment(e) => Node::Comment(decode(&e)?),
                Event::PI(e) => Node::ProcessingInstruction(decode(&e)?),
                Event::Decl(e) => Node::ProcessingInstruction(decode(&e)?),
                Event::DocType(e) => Node::DocType(decode(&e)?.trim().to_string()),
                Event::Eof => break,
            };
            match open.last_mut() {
                Some(parent) => parent.children.push(node),
                None => children.push(node),
            }
        }

        if let Some(element) = open.last() {
            return Err(Error::malformed_xml(format!(
                "element <{}> is not closed",
                element.name
            )));
        }
        match children.iter().filter(|node| node.is_element()).count() {
            1 => Ok(Document { children }),
            0 => Err(Error::malformed_xml("document has no root element")),
            _ => Err(Error::malformed_xml("document has more than one root element")),
        }
    }

    /// Parses markup that is not a complete document (mixed text and elements)
    /// by wrapping it into an element named `wrapper`.
    pub fn parse_fragment(xml: &str, wrapper: &str) -> Result<Element, Error> {
        Document::parse(&format!("<{wrapper}>{xml}</{wrapper}>"))?
            .into_root()
            .ok_or_else(|| Error::malformed_xml("fragment has no root element"))
    }

    pub fn root(&self) -> Option<&Element> {
        self.children.iter().find_map(Node::as_element)
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.children.iter_mut().find_map(Node::as_element_mut)
    }

    pub fn into_root(self) -> Option<Element> {
        self.children.into_iter().find_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Plain (non beautified) serialization.
    pub fn to_xml_string(&self) -> String {
        serializer::to_xml_string(self)
    }
}

fn element_from_start(e: &BytesStart) -> Result<Element, Error> {
    let mut element = Element::new(decode(e.name().as_ref())?);
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::malformed_xml(e.to_string()))?;
        element.attributes.push(Attribute {
            name: decode(attr.key.as_ref())?,
            value: attr.unescape_value()?.into_owned(),
        });
    }
    Ok(element)
}

fn decode(bytes: &[u8]) -> Result<String, Error> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| Error::malformed_xml(e.to_string()))
}
