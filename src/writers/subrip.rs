use serde::{Deserialize, Serialize};

use super::style::normalize_color;
use super::timecode::format_subrip_time;
use super::{CaptionWriter, WriterOutput, timed_texts};
use crate::rich_text::{RichNode, Tag};
use crate::sami::SamiDocument;
use crate::serializer::{TagReadResult, collapse_whitespace, serialize};

// @module: SubRip (.srt) writer

/// SubRip writer options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct SubRipOptions {
    /// Keep bold, italic, underline and font colour as inline tags
    #[serde(default)]
    pub use_text_styles: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SubRipWriter {
    options: SubRipOptions,
}

impl SubRipWriter {
    pub fn new(options: SubRipOptions) -> Self {
        Self { options }
    }

    fn read_node(&self, node: &RichNode) -> Option<TagReadResult> {
        let element = match node {
            RichNode::Text(text) => return Some(TagReadResult::text(collapse_whitespace(text))),
            RichNode::Comment(_) => return Some(TagReadResult::default()),
            RichNode::Element(element) => element,
        };

        let styled = self.options.use_text_styles;
        let result = match element.tag() {
            Tag::P => TagReadResult::divider(),
            Tag::Br => TagReadResult::line_break(),
            Tag::Rp => return None,
            Tag::Font if styled => element
                .attribute("color")
                .and_then(normalize_color)
                .map(|color| TagReadResult::wrap(format!("<font color=\"{}\">", color), "</font>"))
                .unwrap_or_default(),
            Tag::B | Tag::I | Tag::U if styled => {
                TagReadResult::wrap(format!("<{}>", element.name), format!("</{}>", element.name))
            }
            _ => TagReadResult::default(),
        };
        Some(result)
    }
}

impl CaptionWriter for SubRipWriter {
    fn extension(&self) -> &'static str {
        "srt"
    }

    fn write(&self, document: &SamiDocument) -> WriterOutput {
        let cues = timed_texts(document, true, |root| {
            serialize(root, |node| self.read_node(node), true)
        });
        if cues.is_empty() {
            return WriterOutput::subtitle(String::new());
        }

        let entries: Vec<String> = cues
            .iter()
            .enumerate()
            .map(|(index, cue)| {
                format!(
                    "{}\r\n{} --> {}\r\n{}",
                    index + 1,
                    format_subrip_time(cue.cue.start_ms),
                    format_subrip_time(cue.end_ms),
                    cue.text
                )
            })
            .collect();

        WriterOutput::subtitle(entries.join("\r\n\r\n") + "\r\n")
    }
}
