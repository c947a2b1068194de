/*!
 * WebVTT writer.
 *
 * Font colours become cue classes (`<c.cff0000>`) backed by `::cue()`
 * rules in a `STYLE` block. Ruby, bold, italic and underline map to the
 * WebVTT tags of the same name. An authoring comment that ends a cue is
 * kept as a `NOTE` block.
 */

use std::ptr;

use quick_xml::escape::partial_escape;
use serde::{Deserialize, Serialize};

use super::style::StyleRegistry;
use super::timecode::format_webvtt_time;
use super::{CaptionWriter, WriterOutput, timed_texts};
use crate::rich_text::{Element, RichNode, Tag};
use crate::sami::SamiDocument;
use crate::serializer::{TagReadResult, collapse_whitespace, fill_empty_lines, serialize};

// @const: Rules emitted before the colour classes unless disabled
const DEFAULT_STYLES: [&str; 2] = [
    "::cue { background: transparent; text-shadow: 0 0 0.2em black; text-outline: 2px 2px black; }",
    "::cue-region { font: 0.077vh sans-serif; line-height: 0.1vh; }",
];

/// WebVTT writer options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WebVttOptions {
    /// Also produce a standalone stylesheet for hosts without `::cue` support
    #[serde(default)]
    pub create_style_element: bool,

    /// Leave out the default `::cue` / `::cue-region` rules
    #[serde(default)]
    pub disable_default_style: bool,

    /// Wrap language-tagged paragraphs in `<lang code>`
    #[serde(default)]
    pub enable_language_tag: bool,

    /// Selector prefixed to every rule of the standalone stylesheet
    #[serde(default = "default_selector")]
    pub selector: String,

    /// Write `STYLE -->` and `NOTE -->` for older players
    #[serde(default)]
    pub legacy_force_arrow: bool,
}

fn default_selector() -> String {
    "video".to_string()
}

impl Default for WebVttOptions {
    fn default() -> Self {
        Self {
            create_style_element: false,
            disable_default_style: false,
            enable_language_tag: false,
            selector: default_selector(),
            legacy_force_arrow: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WebVttWriter {
    options: WebVttOptions,
}

impl WebVttWriter {
    pub fn new(options: WebVttOptions) -> Self {
        Self { options }
    }

    fn block_keyword(&self, keyword: &str) -> String {
        if self.options.legacy_force_arrow {
            format!("{} -->", keyword)
        } else {
            keyword.to_string()
        }
    }

    fn read_node(
        &self,
        node: &RichNode,
        note: Option<&RichNode>,
        registry: &mut StyleRegistry,
        document: &SamiDocument,
    ) -> Option<TagReadResult> {
        let element = match node {
            RichNode::Text(text) => {
                let text = collapse_whitespace(text);
                return Some(TagReadResult::text(partial_escape(&text).into_owned()));
            }
            RichNode::Comment(text) => {
                if !note.is_some_and(|note| ptr::eq(note, node)) {
                    return Some(TagReadResult::default());
                }
                let text = fill_empty_lines(text.trim());
                let keyword = self.block_keyword("NOTE");
                let block = if text.contains('\n') {
                    format!("\r\n\r\n{}\r\n{}", keyword, text)
                } else {
                    format!("\r\n\r\n{} {}", keyword, text)
                };
                return Some(TagReadResult::comment(block));
            }
            RichNode::Element(element) => element,
        };

        let mut result = match element.tag() {
            Tag::P => TagReadResult::divider(),
            Tag::Br => TagReadResult::line_break(),
            Tag::Font => match registry.register_font(element) {
                Some(name) => TagReadResult::wrap(format!("<c.{}>", name), "</c>"),
                None => TagReadResult::default(),
            },
            Tag::Rp => return None,
            Tag::Ruby | Tag::Rt | Tag::B | Tag::I | Tag::U => {
                TagReadResult::wrap(format!("<{}>", element.name), format!("</{}>", element.name))
            }
            Tag::Other => TagReadResult::default(),
        };

        if self.options.enable_language_tag {
            let language = element
                .language
                .as_deref()
                .and_then(|name| document.language_by_name(name));
            if let Some(language) = language {
                result.start = format!("<lang {}>{}", language.code, result.start);
                result.end.push_str("</lang>");
                result = result.requiring_text();
            }
        }

        Some(result)
    }

    fn stylesheet_rules(&self, registry: &StyleRegistry) -> Vec<String> {
        let defaults = if self.options.disable_default_style {
            &[][..]
        } else {
            &DEFAULT_STYLES[..]
        };

        defaults
            .iter()
            .map(|rule| rule.to_string())
            .chain(
                registry
                    .styles()
                    .iter()
                    .map(|style| format!("::cue(.{}) {{ color: {}; }}", style.name, style.color)),
            )
            .collect()
    }
}

impl CaptionWriter for WebVttWriter {
    fn extension(&self) -> &'static str {
        "vtt"
    }

    fn write(&self, document: &SamiDocument) -> WriterOutput {
        let mut registry = StyleRegistry::new();
        let cues = timed_texts(document, true, |root| {
            let note = last_relevant_comment(root);
            serialize(
                root,
                |node| self.read_node(node, note, &mut registry, document),
                true,
            )
        });

        let rules = self.stylesheet_rules(&registry);
        let mut subtitle = String::from("WEBVTT");
        // An empty STYLE block is left out
        if !rules.is_empty() {
            subtitle.push_str("\r\n\r\n");
            subtitle.push_str(&self.block_keyword("STYLE"));
            subtitle.push_str("\r\n");
            subtitle.push_str(&rules.join("\r\n"));
        }

        for cue in &cues {
            subtitle.push_str("\r\n\r\n");
            subtitle.push_str(&format!(
                "{} --> {}\r\n{}",
                format_webvtt_time(cue.cue.start_ms),
                format_webvtt_time(cue.end_ms),
                cue.text
            ));
        }
        subtitle.push_str("\r\n");

        let stylesheet = self.options.create_style_element.then(|| {
            rules
                .iter()
                .map(|rule| format!("{}{}", self.options.selector, rule))
                .collect::<Vec<_>>()
                .join("\r\n")
        });

        WriterOutput {
            subtitle,
            stylesheet,
        }
    }
}

/// The comment after which a cue has no visible text and no element
fn last_relevant_comment(root: &Element) -> Option<&RichNode> {
    let mut candidate = None;
    let mut pending: Vec<&RichNode> = root.children.iter().rev().collect();

    while let Some(node) = pending.pop() {
        match node {
            RichNode::Comment(_) => candidate = Some(node),
            RichNode::Text(text) if text.trim().is_empty() => {}
            RichNode::Text(_) => candidate = None,
            RichNode::Element(element) => {
                candidate = None;
                pending.extend(element.children.iter().rev());
            }
        }
    }

    candidate
}
