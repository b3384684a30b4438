//! Minimal markup tree used for both the HTML page and the SVG icons.
//!
//! Text and attribute values are always escaped on output. The only unescaped
//! content is `Node::Trusted`, which accepts `&'static str` so it can only
//! carry markup written into the binary (the page stylesheet).

use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Trusted(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
    void: bool,
}

const VOID_TAGS: [&str; 4] = ["img", "meta", "br", "link"];

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
            void: VOID_TAGS.contains(&tag),
        }
    }

    /// Self-closing element without children, e.g. `<polygon .../>`.
    pub fn empty(tag: &'static str) -> Self {
        Self {
            void: true,
            ..Self::new(tag)
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn style(self, value: impl Into<String>) -> Self {
        self.attr("style", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }
        if self.void && self.children.is_empty() {
            if VOID_TAGS.contains(&self.tag) {
                out.push('>');
            } else {
                out.push_str("/>");
            }
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

impl Node {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_to(out),
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Trusted(markup) => out.push_str(markup),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
