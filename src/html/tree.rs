//! Element tree built from the token stream.
//!
//! The builder applies the small subset of HTML's implied-end-tag rules that
//! matters for tabular reports: a new cell closes the previous cell of the
//! same row, a new row closes the previous row of the same table, and a new
//! row group closes the previous one. Unmatched end tags are ignored and
//! anything still open at end of input is closed.

use super::entities::decode_entities;
use super::tokenizer::{Token, Tokenizer};

/// Elements that never have content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Decoded character data.
    Text(String),
}

/// An HTML element with lowercased name and attribute names.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    fn new(name: String, attrs: Vec<(String, String)>) -> Self {
        Self {
            name,
            attrs,
            children: Vec::new(),
        }
    }

    /// Tag name, lowercased.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by (lowercase) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// All descendant elements named `name`, in document order.
    ///
    /// The element itself is not included.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        Descendants::new(self).filter(move |el| el.name == name)
    }

    /// Concatenated text of all descendants, untrimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.walk_text(&mut |s| out.push_str(s));
        out
    }

    /// Text with every text node trimmed and empty nodes dropped.
    ///
    /// `<td> 1 <b>250</b> </td>` yields `"1250"`.
    pub fn stripped_text(&self) -> String {
        let mut out = String::new();
        self.walk_text(&mut |s| out.push_str(s.trim()));
        out
    }

    fn walk_text(&self, f: &mut impl FnMut(&str)) {
        for child in &self.children {
            match child {
                Node::Text(t) => f(t.as_str()),
                Node::Element(el) => el.walk_text(f),
            }
        }
    }
}

/// Pre-order iterator over descendant elements.
struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Descendants<'a> {
    fn new(root: &'a Element) -> Self {
        Self {
            stack: root.children.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Node::Element(el) = node {
                self.stack.extend(el.children.iter().rev());
                return Some(el);
            }
        }
        None
    }
}

/// A parsed HTML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse `input` into a tree. Never fails.
    pub fn parse(input: &str) -> Self {
        let mut builder = TreeBuilder::new();
        for token in Tokenizer::new(input) {
            builder.push(token);
        }
        Self {
            root: builder.finish(),
        }
    }

    /// The synthetic root holding the top-level nodes.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All elements named `name`, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.root.find_all(name)
    }
}

struct TreeBuilder {
    /// Open elements; index 0 is the synthetic root.
    stack: Vec<Element>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Element::new("#document".to_string(), Vec::new())],
        }
    }

    fn push(&mut self, token: Token<'_>) {
        match token {
            Token::Text(raw) => {
                if raw.is_empty() {
                    return;
                }
                let text = decode_entities(raw).into_owned();
                self.current().children.push(Node::Text(text));
            },
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => {
                self.close_implied(&name);
                let element = Element::new(name, attrs);
                if self_closing || VOID_ELEMENTS.contains(&element.name.as_str()) {
                    self.current().children.push(Node::Element(element));
                } else {
                    self.stack.push(element);
                }
            },
            Token::EndTag { name } => {
                if let Some(idx) = self.stack.iter().rposition(|el| el.name == name) {
                    if idx > 0 {
                        self.pop_to(idx);
                    }
                }
            },
        }
    }

    fn current(&mut self) -> &mut Element {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Close an open sibling that `name` implicitly ends.
    fn close_implied(&mut self, name: &str) {
        let (targets, scope): (&[&str], &[&str]) = match name {
            "td" | "th" => (&["td", "th"], &["tr", "table"]),
            "tr" => (&["tr"], &["table"]),
            "thead" | "tbody" | "tfoot" => (&["thead", "tbody", "tfoot"], &["table"]),
            _ => return,
        };
        for idx in (1..self.stack.len()).rev() {
            let open = self.stack[idx].name.as_str();
            if targets.contains(&open) {
                self.pop_to(idx);
                return;
            }
            if scope.contains(&open) {
                return;
            }
        }
    }

    /// Close every element from the top of the stack down to `idx` inclusive.
    fn pop_to(&mut self, idx: usize) {
        while self.stack.len() > idx {
            self.pop_one();
        }
    }

    fn pop_one(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(element) = self.stack.pop() {
            self.current().children.push(Node::Element(element));
        }
    }

    fn finish(mut self) -> Element {
        self.pop_to(1);
        self.stack.swap_remove(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_all_in_document_order() {
        let doc = Document::parse(
            "<table id=a><tr><td><table id=b></table></td></tr></table><table id=c></table>",
        );
        let ids: Vec<_> = doc.find_all("table").filter_map(|t| t.attr("id")).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_implied_cell_and_row_ends() {
        let doc = Document::parse("<table><tr><td>1<td>2<tr><td>3</table>");
        let table = doc.find_all("table").next().unwrap();
        let rows: Vec<_> = table.find_all("tr").collect();
        assert_eq!(rows.len(), 2);
        let first: Vec<_> = rows[0].find_all("td").map(|c| c.text()).collect();
        assert_eq!(first, vec!["1", "2"]);
        assert_eq!(rows[1].find_all("td").count(), 1);
    }

    #[test]
    fn test_stripped_text_joins_trimmed_nodes() {
        let doc = Document::parse("<td> 1 <b> 250 </b>\n</td>");
        let td = doc.find_all("td").next().unwrap();
        assert_eq!(td.stripped_text(), "1250");
        assert_eq!(td.text(), " 1  250 \n");
    }

    #[test]
    fn test_entities_in_text_are_decoded() {
        let doc = Document::parse("<td>1&nbsp;250&amp;</td>");
        let td = doc.find_all("td").next().unwrap();
        assert_eq!(td.text(), "1\u{A0}250&");
    }

    #[test]
    fn test_unmatched_end_tag_ignored() {
        let doc = Document::parse("</div><p>x</span></p>");
        let p = doc.find_all("p").next().unwrap();
        assert_eq!(p.text(), "x");
    }

    #[test]
    fn test_void_elements_do_not_nest() {
        let doc = Document::parse("<td>a<br>b</td>");
        let td = doc.find_all("td").next().unwrap();
        assert_eq!(td.children().len(), 3);
        assert_eq!(td.text(), "ab");
    }

    #[test]
    fn test_unclosed_elements_closed_at_end() {
        let doc = Document::parse("<table><tr><td>1");
        assert_eq!(doc.find_all("td").count(), 1);
        assert_eq!(doc.root().children().len(), 1);
    }
}
