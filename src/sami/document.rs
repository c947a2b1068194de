use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::rich_text::{Element, RichNode};

// @module: Parsed SAMI document model

/// A language declared by a class rule in the SAMI style block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Class name used by content paragraphs, e.g. `KRCC`
    pub css_class: String,
    /// Human readable name from the `name:` declaration
    pub display_name: String,
    /// BCP-47 code from the `lang:` declaration
    pub code: String,
}

/// One timed entry. It is displayed from `start_ms` until the next cue starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Sync point in milliseconds
    pub start_ms: i64,
    /// Root `sync` element owning the cue's rich text
    pub content: Element,
    /// Source text between this sync tag and the next one
    pub raw_span: String,
}

impl Cue {
    pub fn new(start_ms: i64, content: Element, raw_span: impl Into<String>) -> Self {
        Self {
            start_ms,
            content,
            raw_span: raw_span.into(),
        }
    }

    /// Copy of this cue keeping untagged content plus content tagged with
    /// one of `display_names`
    pub fn filter_languages(&self, display_names: &[&str]) -> Cue {
        let mut content = self.content.shallow_clone();
        content.children = self
            .content
            .children
            .iter()
            .filter(|child| match child {
                RichNode::Element(element) => element
                    .language
                    .as_deref()
                    .is_none_or(|language| display_names.contains(&language)),
                _ => true,
            })
            .cloned()
            .collect();

        Cue {
            start_ms: self.start_ms,
            content,
            raw_span: self.raw_span.clone(),
        }
    }
}

/// Cues in source order plus the language table of the style block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SamiDocument {
    pub cues: Vec<Cue>,
    pub languages: Vec<Language>,
}

impl SamiDocument {
    pub fn new(cues: Vec<Cue>, languages: Vec<Language>) -> Self {
        Self { cues, languages }
    }

    /// Parses SAMI markup, see [`crate::sami::parse`]
    pub fn parse(markup: &str) -> Result<Self, crate::errors::SamiError> {
        super::parser::parse(markup)
    }

    /// Splits the document into one document per language code.
    ///
    /// Untagged content is replicated into every split. Languages sharing a
    /// code end up in the same split.
    pub fn split_by_language(&self) -> BTreeMap<String, SamiDocument> {
        let mut groups: BTreeMap<String, Vec<&Language>> = BTreeMap::new();
        for language in &self.languages {
            groups.entry(language.code.clone()).or_default().push(language);
        }

        groups
            .into_iter()
            .map(|(code, languages)| {
                let names: Vec<&str> = languages
                    .iter()
                    .map(|language| language.display_name.as_str())
                    .collect();
                debug!("Splitting language {} ({})", code, names.join(", "));

                let document = SamiDocument {
                    cues: self
                        .cues
                        .iter()
                        .map(|cue| cue.filter_languages(&names))
                        .collect(),
                    languages: languages.into_iter().cloned().collect(),
                };
                (code, document)
            })
            .collect()
    }

    /// Shifts every cue by `delta_ms`. Relative order is not re-checked.
    pub fn delay(&mut self, delta_ms: i64) {
        for cue in &mut self.cues {
            cue.start_ms = cue.start_ms.saturating_add(delta_ms);
        }
    }

    /// Language declared with the given display name
    pub fn language_by_name(&self, display_name: &str) -> Option<&Language> {
        self.languages
            .iter()
            .find(|language| language.display_name == display_name)
    }
}
