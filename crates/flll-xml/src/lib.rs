//! Owned, mutable XML tree for label files.
//!
//! Parsing and serialization go through quick-xml. Whitespace-only text is
//! dropped on load and output is re-indented with tabs, so a document that is
//! loaded and saved again without changes keeps the same bytes.

use flll_core::FlllError;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("XML error at byte {position}: {message}")]
pub struct ParseError {
    pub position: u64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the attribute value in place, or append it when absent.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn push_element(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Concatenated text and CDATA of the direct children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(t) | Node::CData(t) => out.push_str(t),
                _ => {}
            }
        }
        out
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First element named `name` in document order, including `self`.
    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.child_elements().find_map(|c| c.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Element> {
        if self.name == name {
            return Some(self);
        }
        for child in self.child_elements_mut() {
            if let Some(found) = child.find_mut(name) {
                return Some(found);
            }
        }
        None
    }

    /// Every element named `name` below `self`, in document order.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        collect_named(self, name, &mut out);
        out
    }

    /// Call `f` on every element named `name` below `self`. Matched elements
    /// are not searched further.
    pub fn for_each_named_mut(&mut self, name: &str, f: &mut dyn FnMut(&mut Element)) {
        for child in self.child_elements_mut() {
            if child.name == name {
                f(child);
            } else {
                child.for_each_named_mut(name, f);
            }
        }
    }
}

fn collect_named<'a>(el: &'a Element, name: &str, out: &mut Vec<&'a Element>) {
    for child in el.child_elements() {
        if child.name == name {
            out.push(child);
        }
        collect_named(child, name, out);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn parse(xml: &str) -> Result<Self, ParseError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let position = reader.buffer_position() as u64;
            let fail = |message: String| ParseError { position, message };
            match reader.read_event() {
                Ok(Event::Start(e)) => stack.push(element_from(&e).map_err(fail)?),
                Ok(Event::Empty(e)) => {
                    let el = element_from(&e).map_err(fail)?;
                    attach(&mut stack, &mut root, el).map_err(fail)?;
                }
                Ok(Event::End(_)) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| fail("unexpected closing tag".into()))?;
                    attach(&mut stack, &mut root, el).map_err(fail)?;
                }
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| fail(e.to_string()))?;
                    if let Some(parent) = stack.last_mut() {
                        if !text.trim().is_empty() {
                            parent.children.push(Node::Text(text.into_owned()));
                        }
                    }
                }
                Ok(Event::CData(c)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&c).into_owned();
                        parent.children.push(Node::CData(text));
                    }
                }
                Ok(Event::Comment(c)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&c).into_owned();
                        parent.children.push(Node::Comment(text));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(fail(e.to_string())),
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ParseError {
                position: xml.len() as u64,
                message: format!("unclosed element <{}>", open.name),
            });
        }
        root.map(Document::new).ok_or(ParseError {
            position: 0,
            message: "document has no root element".into(),
        })
    }

    /// Read and parse `path`, reporting parse failures against the file.
    pub fn load(path: &Path) -> flll_core::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let doc = Self::parse(&content).map_err(|e| FlllError::Xml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(doc)
    }

    pub fn find(&self, name: &str) -> Option<&Element> {
        self.root.find(name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.root.find_mut(name)
    }

    /// Serialize with an XML declaration and tab indentation.
    pub fn to_xml_string(&self) -> io::Result<String> {
        let mut w = Writer::new_with_indent(Vec::new(), b'\t', 1);
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(io_err)?;
        write_element(&mut w, &self.root)?;
        let mut out = String::from_utf8(w.into_inner()).map_err(io_err)?;
        out.push('\n');
        Ok(out)
    }
}

fn io_err<E: Display>(e: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, String> {
    let mut el = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        el.attributes.push((key, value.into_owned()));
    }
    Ok(el)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(el));
        return Ok(());
    }
    if root.is_some() {
        return Err(format!("second root element <{}>", el.name));
    }
    *root = Some(el);
    Ok(())
}

fn write_element(w: &mut Writer<Vec<u8>>, el: &Element) -> io::Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (k, v) in &el.attributes {
        start.push_attribute((k.as_str(), v.as_str()));
    }
    if el.children.is_empty() {
        return w.write_event(Event::Empty(start)).map_err(io_err);
    }
    w.write_event(Event::Start(start)).map_err(io_err)?;
    for child in &el.children {
        match child {
            Node::Element(c) => write_element(w, c)?,
            Node::Text(t) => w.write_event(Event::Text(BytesText::new(t))).map_err(io_err)?,
            Node::CData(t) => w
                .write_event(Event::CData(BytesCData::new(t.as_str())))
                .map_err(io_err)?,
            Node::Comment(t) => w
                .write_event(Event::Comment(BytesText::from_escaped(t.as_str())))
                .map_err(io_err)?,
        }
    }
    w.write_event(Event::End(BytesEnd::new(el.name.as_str())))
        .map_err(io_err)
}
