/*!
 * Caption writers.
 *
 * A writer turns a parsed [`SamiDocument`] into one target format. Each
 * writer supplies a node handler for the tree serializer and assembles the
 * per-cue strings with its own timing lines. Writers never fail: an empty
 * document produces a header-only output.
 *
 * Every cue is shown until the next one starts, so the last cue of a
 * document only terminates its predecessor and is never emitted itself.
 */

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::errors::SamiError;
use crate::rich_text::Element;
use crate::sami::{Cue, SamiDocument};
use crate::serializer::{absorb_air, absorb_space_ending, manage_last_line};

pub mod style;
pub mod subrip;
pub mod timecode;
pub mod ttml;
pub mod webvtt;

pub use style::{ColorStyle, StyleRegistry};
pub use subrip::{SubRipOptions, SubRipWriter};
pub use timecode::{format_clock_time, format_subrip_time, format_webvtt_time, parse_time_code};
pub use ttml::{TtmlOptions, TtmlWriter};
pub use webvtt::{WebVttOptions, WebVttWriter};

/// Result of one write call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOutput {
    /// The subtitle document
    pub subtitle: String,
    /// Standalone CSS for hosts without native cue styling (WebVTT only)
    pub stylesheet: Option<String>,
}

impl WriterOutput {
    pub fn subtitle(subtitle: String) -> Self {
        Self {
            subtitle,
            stylesheet: None,
        }
    }
}

/// A caption format writer
pub trait CaptionWriter {
    /// File extension of the produced subtitle, without the dot
    fn extension(&self) -> &'static str;

    /// Renders `document`
    fn write(&self, document: &SamiDocument) -> WriterOutput;
}

/// Supported output formats
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    WebVtt,
    Srt,
    Ttml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::WebVtt => "vtt",
            Self::Srt => "srt",
            Self::Ttml => "ttml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WebVtt => "webvtt",
            Self::Srt => "srt",
            Self::Ttml => "ttml",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "webvtt" | "vtt" => Ok(Self::WebVtt),
            "srt" | "subrip" => Ok(Self::Srt),
            "ttml" | "dfxp" => Ok(Self::Ttml),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// A cue that will be emitted, with its end time and serialized text
pub(crate) struct TimedText<'a> {
    pub cue: &'a Cue,
    pub end_ms: i64,
    pub text: String,
}

/// Renders every cue except the terminating last one, dropping cues whose
/// text is blank. `render` receives the cue's root element.
pub(crate) fn timed_texts<'a, F>(
    document: &'a SamiDocument,
    prevent_empty_line: bool,
    mut render: F,
) -> Vec<TimedText<'a>>
where
    F: FnMut(&Element) -> String,
{
    document
        .cues
        .windows(2)
        .filter_map(|pair| {
            let text = finish_cue_text(&render(&pair[0].content), prevent_empty_line);
            let text = absorb_air(&text);
            if text.is_empty() {
                return None;
            }
            Some(TimedText {
                cue: &pair[0],
                end_ms: pair[1].start_ms,
                text: text.to_string(),
            })
        })
        .collect()
}

/// Drops the space a line end in the source leaves at the end of a cue
fn finish_cue_text(text: &str, prevent_empty_line: bool) -> String {
    manage_last_line(absorb_space_ending(text), prevent_empty_line)
}

/// Parses SAMI markup and renders it as WebVTT
pub fn convert_to_webvtt(markup: &str, options: WebVttOptions) -> Result<WriterOutput, SamiError> {
    let document = SamiDocument::parse(markup)?;
    Ok(WebVttWriter::new(options).write(&document))
}

/// Parses SAMI markup and renders it as SubRip
pub fn convert_to_subrip(markup: &str, options: SubRipOptions) -> Result<String, SamiError> {
    let document = SamiDocument::parse(markup)?;
    Ok(SubRipWriter::new(options).write(&document).subtitle)
}

/// Parses SAMI markup and renders it as TTML
pub fn convert_to_ttml(markup: &str, options: TtmlOptions) -> Result<String, SamiError> {
    let document = SamiDocument::parse(markup)?;
    Ok(TtmlWriter::new(options).write(&document).subtitle)
}
