/*!
 * Lenient tree builder for cue fragments.
 *
 * The primary pass reads the fragment with `quick_xml::Reader` in a relaxed
 * configuration: end tag names are not checked, unmatched end tags are
 * allowed and attributes are read HTML style, so `class=KRCC` needs no
 * quotes. Nesting is repaired by the open element stack: an end tag closes
 * the nearest open element of the same name, stray end tags are ignored and
 * void elements such as `br` never take children.
 *
 * A fragment the reader refuses (a lone `<`, an unterminated tag, a tag
 * whose name is not a name) is built again from the tag locator's scan,
 * where anything that cannot be delimited stays literal text.
 *
 * Text runs are never merged, so two builds of the same fragment with
 * different tag filters produce the same sequence of text nodes.
 */

use std::borrow::Cow;
use std::mem;

use log::debug;
use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use super::entities::decode_entities;
use super::tag_locator::{Markup, scan};
use crate::rich_text::{Element, RichNode};

const VOID_ELEMENTS: &[&str] = &[
    "br", "hr", "img", "meta", "link", "input", "wbr", "col", "area", "base", "embed", "source",
    "track", "param",
];

/// Why the reader pass handed a fragment over to the scan
#[derive(Error, Debug)]
enum ReadError {
    #[error("markup error at byte {position}: {source}")]
    Markup {
        position: u64,
        source: quick_xml::Error,
    },

    #[error("bad attribute in tag ending at byte {position}: {source}")]
    Attribute { position: u64, source: AttrError },

    #[error("tag ending at byte {position} has no valid name")]
    NotATag { position: u64 },
}

/// Builds the children of `fragment`, keeping every tag
pub fn build_fragment(fragment: &str) -> Vec<RichNode> {
    build_fragment_filtered(fragment, |_| true)
}

/// Builds the children of `fragment`, dropping start and end tags whose
/// name `keep` rejects. Dropped tags still separate the surrounding text.
pub fn build_fragment_filtered<F>(fragment: &str, keep: F) -> Vec<RichNode>
where
    F: Fn(&str) -> bool,
{
    match read_fragment(fragment, &keep) {
        Ok(nodes) => nodes,
        Err(e) => {
            debug!("Rescanning cue fragment: {}", e);
            scan_fragment(fragment, &keep)
        }
    }
}

fn read_fragment<F>(fragment: &str, keep: &F) -> Result<Vec<RichNode>, ReadError>
where
    F: Fn(&str) -> bool,
{
    let mut reader = Reader::from_str(fragment);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut builder = OpenElements::new();
    loop {
        let event = reader.read_event().map_err(|source| ReadError::Markup {
            position: reader.error_position(),
            source,
        })?;

        match event {
            Event::Start(start) => {
                let element = read_element(&reader, &start)?;
                if keep(element.name.as_str()) {
                    builder.open(element, false);
                }
            }
            Event::Empty(start) => {
                let element = read_element(&reader, &start)?;
                if keep(element.name.as_str()) {
                    builder.open(element, true);
                }
            }
            Event::End(end) => {
                let name = decode(&reader, end.name().as_ref())?.to_ascii_lowercase();
                if keep(name.as_str()) {
                    builder.close(&name);
                }
            }
            Event::Text(text) => {
                let content = match text.unescape() {
                    Ok(content) => content.into_owned(),
                    // `&nbsp` without its semicolon, or a bare `&`
                    Err(_) => decode_entities(&decode(&reader, &text)?).into_owned(),
                };
                builder.push_text(content);
            }
            Event::CData(data) => {
                let content = data.decode().map_err(|e| ReadError::Markup {
                    position: reader.buffer_position(),
                    source: e.into(),
                })?;
                builder.push_text(content.into_owned());
            }
            Event::Comment(comment) => {
                let content = decode(&reader, &comment)?;
                builder.append(RichNode::Comment(content.into_owned()));
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    Ok(builder.finish())
}

fn decode<'b>(reader: &Reader<&[u8]>, bytes: &'b [u8]) -> Result<Cow<'b, str>, ReadError> {
    reader
        .decoder()
        .decode(bytes)
        .map_err(|e| ReadError::Markup {
            position: reader.buffer_position(),
            source: e.into(),
        })
}

/// Element for a start tag, name and attribute names lowercased.
/// The first of several equally named attributes wins.
fn read_element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Element, ReadError> {
    let qname = start.name();
    let name = decode(reader, qname.as_ref())?;
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(ReadError::NotATag {
            position: reader.buffer_position(),
        });
    }

    let mut element = Element::new(&*name);
    for attribute in start.html_attributes().with_checks(false) {
        let attribute = attribute.map_err(|source| ReadError::Attribute {
            position: reader.buffer_position(),
            source,
        })?;
        let key = decode(reader, attribute.key.as_ref())?.to_ascii_lowercase();
        let value = match attribute.decode_and_unescape_value(reader.decoder()) {
            Ok(value) => value.into_owned(),
            Err(_) => decode_entities(&decode(reader, &attribute.value)?).into_owned(),
        };
        element.attributes.entry(key).or_insert(value);
    }
    Ok(element)
}

/// Builds from tag positions alone. Whatever follows the first construct
/// the locator cannot delimit is kept as literal text.
fn scan_fragment<F>(fragment: &str, keep: &F) -> Vec<RichNode>
where
    F: Fn(&str) -> bool,
{
    let mut builder = OpenElements::new();
    let mut cursor = 0;

    for markup in scan(fragment) {
        let span = markup.span();
        builder.push_text(decode_entities(&fragment[cursor..span.start]).into_owned());
        cursor = span.end;

        match markup {
            Markup::Start(tag) if keep(tag.name.as_str()) => {
                let mut element = Element::new(tag.name.as_str());
                for (key, value) in tag.attributes {
                    element.attributes.entry(key).or_insert(value);
                }
                builder.open(element, tag.self_closing);
            }
            Markup::End { name, .. } if keep(name.as_str()) => builder.close(&name),
            Markup::Comment { text, .. } => builder.append(RichNode::Comment(text)),
            _ => {}
        }
    }

    let rest = &fragment[cursor..];
    if rest.contains('<') {
        debug!(
            "Keeping unparseable markup as literal text: {:?}",
            rest.chars().take(40).collect::<String>()
        );
    }
    builder.push_text(decode_entities(rest).into_owned());
    builder.finish()
}

/// Stack of open elements; index 0 is the fragment root
struct OpenElements {
    stack: Vec<Element>,
}

impl OpenElements {
    fn new() -> Self {
        Self {
            stack: vec![Element::new("#fragment")],
        }
    }

    fn current(&mut self) -> &mut Element {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn append(&mut self, node: RichNode) {
        self.current().children.push(node);
    }

    fn push_text(&mut self, text: String) {
        if !text.is_empty() {
            self.append(RichNode::Text(text));
        }
    }

    fn open(&mut self, element: Element, self_closing: bool) {
        match element.name.as_str() {
            // A new paragraph ends the previous one
            "p" => {
                if let Some(index) = self.position_of(|name| name == "p") {
                    self.close_through(index);
                }
            }
            // Ruby text and parentheses end an open sibling rt/rp inside the same ruby
            "rt" | "rp" => {
                let ruby = self.position_of(|name| name == "ruby").unwrap_or(0);
                match self.position_of(|name| name == "rt" || name == "rp") {
                    Some(index) if index > ruby => self.close_through(index),
                    _ => {}
                }
            }
            _ => {}
        }

        if self_closing || VOID_ELEMENTS.contains(&element.name.as_str()) {
            self.append(RichNode::Element(element));
        } else {
            self.stack.push(element);
        }
    }

    fn close(&mut self, name: &str) {
        match self.position_of(|open| open == name) {
            Some(index) => self.close_through(index),
            // `</br>` is read as a line break, as browsers do
            None if name == "br" => self.append(RichNode::Element(Element::new("br"))),
            None => debug!("Ignoring stray </{}>", name),
        }
    }

    /// Index of the innermost open element (root excluded) matching `predicate`
    fn position_of<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(&str) -> bool,
    {
        self.stack
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .find(|(_, element)| predicate(&element.name))
            .map(|(index, _)| index)
    }

    fn close_through(&mut self, index: usize) {
        while self.stack.len() > index {
            if let Some(element) = self.stack.pop() {
                self.append(RichNode::Element(element));
            }
        }
    }

    fn finish(mut self) -> Vec<RichNode> {
        self.close_through(1);
        self.stack
            .pop()
            .map(|mut root| mem::take(&mut root.children))
            .unwrap_or_default()
    }
}
