//! Lenient DocBook-style markup tree.
//!
//! Parses XML and XML-ish SGML (unquoted attributes, unclosed `xref`,
//! mismatched end tags) into a read-only tree of elements and text.

use crate::error::{ChunkError, Result};
use quick_xml::escape;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use std::borrow::Cow;
use tracing::{debug, trace};

/// Tag name of the implicit element wrapping the whole document
pub const ROOT_TAG: &str = "[document]";

/// Elements that never have content, even when written without `/>`
const EMPTY_TAGS: &[&str] = &["xref"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_TAG)
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn tag(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Concatenated text of all descendant text nodes, in document order
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Like [`Element::text`], but leaves out every `title` whose parent tag
    /// is one of `heading_parents`
    pub fn text_without_titles(&self, heading_parents: &[&str]) -> String {
        let mut out = String::new();
        self.collect_text_filtered(&mut out, Some(heading_parents));
        out
    }

    fn collect_text(&self, out: &mut String) {
        self.collect_text_filtered(out, None);
    }

    fn collect_text_filtered(&self, out: &mut String, heading_parents: Option<&[&str]>) {
        let skip_titles = heading_parents.is_some_and(|tags| tags.contains(&self.tag()));
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) if skip_titles && element.tag() == "title" => {}
                Node::Element(element) => element.collect_text_filtered(out, heading_parents),
            }
        }
    }

    fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Descendants (not including `self`) whose tag is one of `tags`, in
    /// pre-order. Matches nested inside matches are included.
    pub fn find_all<'a>(&'a self, tags: &[&str]) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_matching(tags, &mut found);
        found
    }

    fn collect_matching<'a>(&'a self, tags: &[&str], found: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if tags.contains(&child.tag()) {
                found.push(child);
            }
            child.collect_matching(tags, found);
        }
    }

    /// First descendant with the given tag, paired with its parent
    pub fn find_first_with_parent<'a>(&'a self, tag: &str) -> Option<(&'a Element, &'a Element)> {
        for child in self.child_elements() {
            if child.tag() == tag {
                return Some((self, child));
            }
            if let Some(found) = child.find_first_with_parent(tag) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_first(&self, tag: &str) -> Option<&Element> {
        self.find_first_with_parent(tag).map(|(_, element)| element)
    }

    /// Text of this element's own `title`.
    ///
    /// Only the first `title` in document order is considered, and only if
    /// this element is its immediate parent; a title belonging to a nested
    /// subsection yields an empty string.
    pub fn direct_child_title(&self) -> String {
        match self.find_first_with_parent("title") {
            Some((parent, title)) if std::ptr::eq(parent, self) => title.text(),
            _ => String::new(),
        }
    }

    /// Replace every `xref` with its `linkend` value (or nothing) so the
    /// reference survives text extraction. Returns the number replaced.
    pub fn resolve_xrefs(&mut self) -> usize {
        let mut replaced = 0;
        for child in &mut self.children {
            let linkend = match child {
                Node::Element(element) if element.tag() == "xref" => {
                    element.attr("linkend").unwrap_or_default().to_string()
                }
                Node::Element(element) => {
                    replaced += element.resolve_xrefs();
                    continue;
                }
                Node::Text(_) => continue,
            };
            *child = Node::Text(linkend);
            replaced += 1;
        }
        replaced
    }
}

/// Parse markup into a tree rooted at an implicit [`ROOT_TAG`] element.
///
/// Text and CDATA are kept verbatim; comments, processing instructions and
/// doctype declarations are dropped.
pub fn parse(content: &str) -> Result<Element> {
    let mut reader = Reader::from_str(content);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.expand_empty_elements = false;

    let mut stack: Vec<Element> = vec![Element::root()];
    let mut elements = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| ChunkError::Markup {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                let element = open_element(&start);
                elements += 1;
                if EMPTY_TAGS.contains(&element.tag()) {
                    append(&mut stack, Node::Element(element));
                } else {
                    stack.push(element);
                }
            }
            Event::Empty(start) => {
                elements += 1;
                append(&mut stack, Node::Element(open_element(&start)));
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).to_lowercase();
                close(&mut stack, &name);
            }
            Event::Text(text) => append_text(&mut stack, &decode_text(&text)),
            Event::CData(data) => append_text(&mut stack, &String::from_utf8_lossy(&data)),
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(elements, bytes = content.len(), "parsed markup");
    Ok(finish(stack))
}

fn open_element(start: &BytesStart<'_>) -> Element {
    let name = String::from_utf8_lossy(start.name().as_ref()).to_lowercase();
    let attributes = start
        .html_attributes()
        .filter_map(|attr| attr.ok())
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
            let value = decode_entities(&String::from_utf8_lossy(&attr.value));
            (key, value)
        })
        .collect();

    Element {
        name,
        attributes,
        children: Vec::new(),
    }
}

fn decode_text(text: &BytesText<'_>) -> String {
    decode_entities(&String::from_utf8_lossy(text))
}

/// Replace entity and character references one at a time. References that
/// cannot be resolved are kept exactly as written.
fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let reference = after
            .find(';')
            .map(|semi| &after[..semi])
            .filter(|name| !name.is_empty() && !name.contains(|c: char| c.is_whitespace() || c == '&'));

        match reference {
            Some(name) => {
                match resolve_reference(name) {
                    Some(resolved) => out.push_str(&resolved),
                    None => {
                        trace!(entity = name, "keeping unknown entity verbatim");
                        out.push('&');
                        out.push_str(name);
                        out.push(';');
                    }
                }
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn resolve_reference(name: &str) -> Option<Cow<'static, str>> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code).map(|c| Cow::Owned(c.to_string()));
    }

    escape::resolve_predefined_entity(name)
        .or_else(|| resolve_html_entity(name))
        .map(Cow::Borrowed)
}

fn resolve_html_entity(entity: &str) -> Option<&'static str> {
    let resolved = match entity {
        "nbsp" => "\u{a0}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        "times" => "\u{d7}",
        _ => return None,
    };
    Some(resolved)
}

fn append(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

fn append_text(stack: &mut [Element], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        // adjacent runs (text split around an entity or CDATA) become one node
        if let Some(Node::Text(previous)) = parent.children.last_mut() {
            previous.push_str(text);
        } else {
            parent.children.push(Node::Text(text.to_string()));
        }
    }
}

/// Close the innermost open element named `name`, closing any elements left
/// open inside it. End tags with no open counterpart are ignored.
fn close(stack: &mut Vec<Element>, name: &str) {
    let Some(position) = stack.iter().skip(1).rposition(|e| e.tag() == name) else {
        trace!(tag = name, "ignoring stray end tag");
        return;
    };
    let target = position + 1;

    while stack.len() > target {
        if let Some(element) = stack.pop() {
            append(stack, Node::Element(element));
        }
    }
}

fn finish(mut stack: Vec<Element>) -> Element {
    while let Some(element) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(Node::Element(element)),
            None => return element,
        }
    }
    Element::root()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_nested_text() {
        let root = parse("<chapter><title>Intro</title><para>Hello <b>big</b> world.</para></chapter>")
            .unwrap();
        assert_eq!(root.tag(), ROOT_TAG);
        assert_eq!(root.text(), "IntroHello big world.");
        let chapter = root.find_first("chapter").unwrap();
        assert_eq!(chapter.direct_child_title(), "Intro");
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let root = parse("<sect1>\n  <title>T</title>\n  <para>p</para>\n</sect1>").unwrap();
        assert_eq!(root.text(), "\n  T\n  p\n");
    }

    #[test]
    fn test_xref_replaced_by_linkend() {
        let mut root =
            parse(r#"<para>See <xref linkend="app-pgdump"/> and <xref/>.</para>"#).unwrap();
        assert_eq!(root.resolve_xrefs(), 2);
        assert_eq!(root.text(), "See app-pgdump and .");
        assert!(root.find_first("xref").is_none());
    }

    #[test]
    fn test_sgml_xref_without_slash() {
        let mut root = parse("<para>See <xref linkend=sql-select> for details.</para>").unwrap();
        let para = root.find_first("para").unwrap();
        assert_eq!(para.children().len(), 3);
        root.resolve_xrefs();
        assert_eq!(root.text(), "See sql-select for details.");
    }

    #[test]
    fn test_entities() {
        let root = parse("<para>a &lt; b &mdash; c</para>").unwrap();
        assert_eq!(root.text(), "a < b \u{2014} c");
    }

    #[test]
    fn test_unknown_entity_kept_verbatim() {
        let root = parse("<para>version &version;</para>").unwrap();
        assert_eq!(root.text(), "version &version;");
    }

    #[test]
    fn test_known_and_unknown_entities_in_one_run() {
        let root = parse("<para>R&amp;D for &product; &gt; 9 &#65;&#x42; &amp</para>").unwrap();
        assert_eq!(root.text(), "R&D for &product; > 9 AB &amp");
    }

    #[test]
    fn test_attribute_entities() {
        let root = parse(r#"<xref linkend="a&amp;b"/><ulink url="x?&unknown;"/>"#).unwrap();
        assert_eq!(root.find_first("xref").unwrap().attr("linkend"), Some("a&b"));
        assert_eq!(root.find_first("ulink").unwrap().attr("url"), Some("x?&unknown;"));
    }

    #[test]
    fn test_more_end_tags_than_start_tags() {
        let root = parse("</sect1>intro<para>body</para></para></chapter> tail").unwrap();
        assert_eq!(root.text(), "introbody tail");
    }

    #[test]
    fn test_comments_and_doctype_dropped() {
        let root = parse("<!DOCTYPE book><!-- note --><para>x<![CDATA[<y>]]></para>").unwrap();
        assert_eq!(root.text(), "x<y>");
    }

    #[test]
    fn test_mismatched_end_tags_recover() {
        let root = parse("<chapter><para>one<para>two</chapter><para>three</para>").unwrap();
        let chapter = root.find_first("chapter").unwrap();
        assert_eq!(chapter.text(), "onetwo");
        assert_eq!(root.find_all(&["para"]).len(), 3);
        assert_eq!(root.text(), "onetwothree");
    }

    #[test]
    fn test_stray_end_tag_ignored() {
        let root = parse("<para>a</sect1>b</para>").unwrap();
        assert_eq!(root.find_first("para").unwrap().text(), "ab");
    }

    #[test]
    fn test_unclosed_elements_closed_at_eof() {
        let root = parse("<chapter><sect1>body").unwrap();
        assert_eq!(root.find_first("sect1").unwrap().text(), "body");
    }

    #[test]
    fn test_find_all_preorder_includes_nested() {
        let root = parse("<a><sect1 id='1'><sect1 id='2'/></sect1><sect1 id='3'/></a>").unwrap();
        let ids: Vec<_> = root
            .find_all(&["sect1"])
            .iter()
            .map(|e| e.attr("id").unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_title_of_nested_section_is_not_direct() {
        let root = parse("<chapter><sect1><title>Inner</title></sect1></chapter>").unwrap();
        let chapter = root.find_first("chapter").unwrap();
        assert_eq!(chapter.direct_child_title(), "");
    }

    #[test]
    fn test_tag_names_are_case_insensitive() {
        let root = parse("<CHAPTER><Title>Up</Title></CHAPTER>").unwrap();
        assert_eq!(root.find_first("chapter").unwrap().direct_child_title(), "Up");
    }

    #[test]
    fn test_text_without_titles() {
        let root = parse(
            "<chapter><title>C</title><para><title>Figure</title>x</para><sect1><title>S</title>y</sect1></chapter>",
        )
        .unwrap();
        let chapter = root.find_first("chapter").unwrap();
        assert_eq!(chapter.text_without_titles(&["chapter", "sect1"]), "Figurexy");
        assert_eq!(chapter.text(), "CFigurexSy");
    }

    #[test]
    fn test_builder_helpers() {
        let element = Element::new("sect1")
            .with_attr("id", "s")
            .with_child(Element::new("title").with_text("Details"))
            .with_text("Hello world.");
        assert_eq!(element.attr("id"), Some("s"));
        assert_eq!(element.direct_child_title(), "Details");
        assert_eq!(element.text(), "DetailsHello world.");
    }
}
