/*!
 * TTML writer, SDP-US flavoured.
 *
 * Cue text is rendered through the serializer into inline TTML markup
 * (`<br/>`, `<span>`), then each cue is written as a `p` of the single
 * `div` with `quick-xml`. Font colours become named styles in `head`.
 */

use std::io::{self, Cursor};

use log::error;
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesText, Event};
use serde::{Deserialize, Serialize};

use super::style::StyleRegistry;
use super::timecode::format_clock_time;
use super::{CaptionWriter, TimedText, WriterOutput, timed_texts};
use crate::rich_text::{RichNode, Tag};
use crate::sami::SamiDocument;
use crate::serializer::{TagReadResult, collapse_whitespace, serialize};

const TTML_NS: &str = "http://www.w3.org/ns/ttml";
const STYLING_NS: &str = "http://www.w3.org/ns/ttml#styling";
const PARAMETER_NS: &str = "http://www.w3.org/ns/ttml#parameter";
const SDP_US_PROFILE: &str = "http://www.w3.org/ns/ttml/profile/sdp-us";
const REGION_ID: &str = "bottom";

/// TTML writer options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TtmlOptions {
    /// Pretty-print the document with two-space indentation
    #[serde(default = "default_indent")]
    pub indent: bool,
}

fn default_indent() -> bool {
    true
}

impl Default for TtmlOptions {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TtmlWriter {
    options: TtmlOptions,
}

impl TtmlWriter {
    pub fn new(options: TtmlOptions) -> Self {
        Self { options }
    }

    fn read_node(node: &RichNode, registry: &mut StyleRegistry) -> Option<TagReadResult> {
        let element = match node {
            RichNode::Text(text) => {
                let text = collapse_whitespace(text);
                return Some(TagReadResult::text(partial_escape(&text).into_owned()));
            }
            RichNode::Comment(_) => return Some(TagReadResult::default()),
            RichNode::Element(element) => element,
        };

        let span = |attribute: &str, value: &str| {
            TagReadResult::wrap(format!("<span {}=\"{}\">", attribute, value), "</span>")
        };
        let result = match element.tag() {
            Tag::P => TagReadResult::divider(),
            Tag::Br => TagReadResult::line_break(),
            Tag::Rp => return None,
            Tag::Font => registry
                .register_font(element)
                .map(|name| span("style", &name))
                .unwrap_or_default(),
            Tag::B => span("tts:fontWeight", "bold"),
            Tag::I => span("tts:fontStyle", "italic"),
            Tag::U => span("tts:textDecoration", "underline"),
            Tag::Ruby | Tag::Rt | Tag::Other => TagReadResult::default(),
        };
        Some(result)
    }

    fn render(&self, document: &SamiDocument) -> io::Result<String> {
        let mut registry = StyleRegistry::new();
        let cues = timed_texts(document, false, |root| {
            serialize(root, |node| Self::read_node(node, &mut registry), false)
        });

        let mut buffer = Vec::new();
        if self.options.indent {
            let mut writer = Writer::new_with_indent(Cursor::new(&mut buffer), b' ', 2);
            write_document(&mut writer, document, &registry, &cues)?;
        } else {
            let mut writer = Writer::new(Cursor::new(&mut buffer));
            write_document(&mut writer, document, &registry, &cues)?;
        }

        String::from_utf8(buffer).map_err(io::Error::other)
    }
}

impl CaptionWriter for TtmlWriter {
    fn extension(&self) -> &'static str {
        "ttml"
    }

    fn write(&self, document: &SamiDocument) -> WriterOutput {
        let subtitle = self.render(document).unwrap_or_else(|e| {
            error!("Failed to build TTML document: {}", e);
            String::new()
        });
        WriterOutput::subtitle(subtitle)
    }
}

fn write_document<W: io::Write>(
    writer: &mut Writer<W>,
    document: &SamiDocument,
    registry: &StyleRegistry,
    cues: &[TimedText<'_>],
) -> io::Result<()> {
    let lang = document
        .languages
        .first()
        .map_or("und", |language| language.code.as_str());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer
        .create_element("tt")
        .with_attribute(("xmlns", TTML_NS))
        .with_attribute(("xmlns:tts", STYLING_NS))
        .with_attribute(("xmlns:ttp", PARAMETER_NS))
        .with_attribute(("ttp:profile", SDP_US_PROFILE))
        .with_attribute(("xml:lang", lang))
        .write_inner_content(|writer| {
            write_head(writer, registry)?;
            write_body(writer, cues)?;
            Ok(())
        })?;
    Ok(())
}

fn write_head<W: io::Write>(writer: &mut Writer<W>, registry: &StyleRegistry) -> io::Result<()> {
    writer.create_element("head").write_inner_content(|writer| {
        let styling = writer.create_element("styling");
        if registry.is_empty() {
            styling.write_empty()?;
        } else {
            styling.write_inner_content(|writer| {
                for style in registry.styles() {
                    writer
                        .create_element("style")
                        .with_attribute(("xml:id", style.name.as_str()))
                        .with_attribute(("tts:color", style.color.as_str()))
                        .write_empty()?;
                }
                Ok(())
            })?;
        }

        writer.create_element("layout").write_inner_content(|writer| {
            writer
                .create_element("region")
                .with_attribute(("xml:id", REGION_ID))
                .with_attribute(("tts:origin", "10% 80%"))
                .with_attribute(("tts:extent", "80% 20%"))
                .with_attribute(("tts:textAlign", "center"))
                .with_attribute(("tts:displayAlign", "after"))
                .write_empty()?;
            Ok(())
        })?;
        Ok(())
    })?;
    Ok(())
}

fn write_body<W: io::Write>(writer: &mut Writer<W>, cues: &[TimedText<'_>]) -> io::Result<()> {
    let body = writer.create_element("body").with_attribute(("region", REGION_ID));
    if cues.is_empty() {
        body.write_empty()?;
        return Ok(());
    }

    body.write_inner_content(|writer| {
        writer.create_element("div").write_inner_content(|writer| {
            for cue in cues {
                let markup = cue.text.replace("\r\n", "<br/>");
                writer
                    .create_element("p")
                    .with_attribute(("begin", format_clock_time(cue.cue.start_ms).as_str()))
                    .with_attribute(("end", format_clock_time(cue.end_ms).as_str()))
                    .write_inner_content(|writer| {
                        writer.write_event(Event::Text(BytesText::from_escaped(markup.as_str())))?;
                        Ok(())
                    })?;
            }
            Ok(())
        })?;
        Ok(())
    })?;
    Ok(())
}
