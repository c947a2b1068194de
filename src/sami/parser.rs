/*!
 * SAMI parser and normalizer.
 *
 * Structure is located positionally with the tag locator: `sync` tags have
 * no matching end tag, so a cue's raw span runs from the end of its own
 * start tag to the start of the next one (or to `</body>`). Each span is
 * then built into a rich-text tree, repaired when its ruby markup is
 * broken, and finally tagged with the language of its paragraphs.
 */

use log::{debug, warn};

use super::document::{Cue, Language, SamiDocument};
use super::ruby;
use super::style::extract_languages;
use crate::errors::SamiError;
use crate::markup::build_fragment;
use crate::markup::tag_locator::{FoundTag, find_end_tag, find_last_end_tag, find_start_tag, find_start_tags};
use crate::rich_text::{Element, RichNode};

/// Parses a SAMI markup string into a normalized document
pub fn parse(markup: &str) -> Result<SamiDocument, SamiError> {
    let body = find_start_tag("body", markup)
        .ok_or_else(|| SamiError::structural("missing <body> start tag", 0))?;
    let body_end = find_last_end_tag("body", markup)
        .filter(|span| span.start >= body.end)
        .ok_or_else(|| SamiError::structural("missing </body> end tag", body.end))?;

    let languages = read_head(&markup[..body.start])?;

    let body_text = &markup[body.end..body_end.start];
    let syncs = find_start_tags("sync", body_text);
    if syncs.is_empty() {
        return Err(SamiError::structural("body contains no <sync> tag", body.end));
    }
    debug!(
        "Found {} sync tags and {} language declarations",
        syncs.len(),
        languages.len()
    );

    let mut cues = Vec::with_capacity(syncs.len());
    for (cue_index, sync) in syncs.iter().enumerate() {
        let span_end = syncs
            .get(cue_index + 1)
            .map_or(body_text.len(), |next| next.start);
        let raw_span = &body_text[sync.end..span_end];
        let start_ms = read_start(sync, cue_index, body.end)?;

        let mut content = Element::new("sync");
        content.attributes.extend(sync.attributes.iter().cloned());
        content.children = build_fragment(raw_span);

        let mut content = ruby::correct(content, raw_span);
        tag_languages(&mut content, &languages);

        cues.push(Cue::new(start_ms, content, raw_span));
    }

    Ok(SamiDocument::new(cues, languages))
}

/// Language table of the head's style block
fn read_head(head: &str) -> Result<Vec<Language>, SamiError> {
    let start = find_start_tag("head", head)
        .ok_or_else(|| SamiError::structural("missing <head> start tag", 0))?;
    let end = find_end_tag("head", head, start.end)
        .ok_or_else(|| SamiError::structural("unterminated <head>", start.start))?;
    let head_content = &head[start.end..end.start];

    let Some(style) = find_start_tag("style", head_content) else {
        warn!("SAMI head has no <style> block, no languages declared");
        return Ok(Vec::new());
    };
    let style_end = find_end_tag("style", head_content, style.end)
        .map_or(head_content.len(), |span| span.start);

    Ok(extract_languages(&head_content[style.end..style_end]))
}

fn read_start(sync: &FoundTag, cue_index: usize, body_offset: usize) -> Result<i64, SamiError> {
    let malformed = |message: String| SamiError::MalformedCue {
        cue_index,
        offset: body_offset + sync.start,
        message,
    };

    let value = sync
        .attribute("start")
        .ok_or_else(|| malformed("missing start attribute".to_string()))?;
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| malformed(format!("start attribute {:?} is not an integer", value)))
}

/// Tags the direct element children of a cue with a language display name.
///
/// A child whose class matches a declared language gets that language; an
/// unknown class leaves it common to all languages. A child without a class
/// (or with an empty one) belongs to the last declared language.
fn tag_languages(content: &mut Element, languages: &[Language]) {
    for child in &mut content.children {
        let RichNode::Element(element) = child else {
            continue;
        };

        let class = element.attribute("class").map(str::trim).filter(|class| !class.is_empty());
        let language = match class {
            Some(class) => languages
                .iter()
                .find(|language| language.css_class.eq_ignore_ascii_case(class)),
            None => languages.last(),
        };
        element.language = language.map(|language| language.display_name.clone());
    }
}
