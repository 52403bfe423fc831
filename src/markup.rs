// ABOUTME: Markup tree for the slidecraft application
// ABOUTME: A small element/text node tree serialized to escaped HTML

use quick_xml::escape::escape;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: [&str; 6] = ["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Text content, escaped on output.
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
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
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape(text)),
            Node::Element(element) => element.write_html(out),
        }
    }
}

impl Element {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.tag) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

/// Render inline `**bold**` and `*italic*` markers; everything else is text.
///
/// Markers nest, so `***both***`, `*a **b** c*` and `**a *b* c**` all work.
/// An unmatched marker is kept as text.
pub fn inline(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut rest = text;
    let mut plain = String::new();

    while !rest.is_empty() {
        if let Some((node, after)) = emphasis(rest) {
            flush_plain(&mut plain, &mut nodes);
            nodes.push(node);
            rest = after;
            continue;
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            plain.push(c);
        }
        rest = chars.as_str();
    }
    flush_plain(&mut plain, &mut nodes);
    nodes
}

/// Parse one emphasis span at the start of `text`, returning it and the remainder.
fn emphasis(text: &str) -> Option<(Node, &str)> {
    if let Some(after) = text.strip_prefix("***") {
        if let Some(end) = after.find("***").filter(|end| *end > 0) {
            let em = Element::new("em").children(inline(&after[..end]));
            return Some((Element::new("strong").child(em).into(), &after[end + 3..]));
        }
    }
    if let Some(after) = text.strip_prefix("**") {
        if let Some(end) = closing_double(after) {
            let strong = Element::new("strong").children(inline(&after[..end]));
            return Some((strong.into(), &after[end + 2..]));
        }
    }
    let after = text.strip_prefix('*')?;
    let end = closing_single(after)?;
    let em = Element::new("em").children(inline(&after[..end]));
    Some((em.into(), &after[end + 1..]))
}

/// Position of the `*` closing an italic span, stepping over bold spans inside it.
fn closing_single(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'*' {
            if bytes.get(i + 1) == Some(&b'*') {
                match closing_double(&text[i + 2..]) {
                    Some(end) => {
                        i += end + 4;
                        continue;
                    }
                    // A "**" that opens nothing closes with its first star.
                    None => return (i > 0).then_some(i),
                }
            }
            return (i > 0).then_some(i);
        }
        i += 1;
    }
    None
}

/// Position of the `**` closing a bold span, stepping over italic spans inside it.
fn closing_double(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'*' {
            if bytes.get(i + 1) == Some(&b'*') {
                return (i > 0).then_some(i);
            }
            if let Some(end) = closing_single(&text[i + 1..]) {
                i += end + 2;
                continue;
            }
        }
        i += 1;
    }
    None
}

fn flush_plain(plain: &mut String, nodes: &mut Vec<Node>) {
    if !plain.is_empty() {
        nodes.push(Node::Text(std::mem::take(plain)));
    }
}
