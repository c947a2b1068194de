/*!
 * Tests for the SAMI document model and its operations
 */

use anyhow::Result;
use samiconv::rich_text::{Element, RichNode};
use samiconv::sami::{Cue, Language, SamiDocument};

use crate::common;

fn language(class: &str, name: &str, code: &str) -> Language {
    Language {
        css_class: class.to_string(),
        display_name: name.to_string(),
        code: code.to_string(),
    }
}

fn paragraph(text: &str, language: Option<&str>) -> RichNode {
    let mut element = Element::new("p").with_child(RichNode::text(text));
    element.language = language.map(str::to_string);
    element.into()
}

fn cue(start_ms: i64, children: Vec<RichNode>) -> Cue {
    let mut content = Element::new("sync").with_attribute("start", start_ms.to_string());
    content.children = children;
    Cue::new(start_ms, content, "")
}

#[test]
fn test_split_by_language_withSharedCode_shouldGroupLanguages() {
    let document = SamiDocument::new(
        vec![cue(
            0,
            vec![
                paragraph("a", Some("English")),
                paragraph("b", Some("English SDH")),
                paragraph("c", Some("Korean")),
            ],
        )],
        vec![
            language("ENCC", "English", "en"),
            language("ENSDH", "English SDH", "en"),
            language("KRCC", "Korean", "ko"),
        ],
    );

    let splits = document.split_by_language();
    assert_eq!(splits.keys().collect::<Vec<_>>(), vec!["en", "ko"]);

    let english = &splits["en"];
    assert_eq!(english.languages.len(), 2);
    assert_eq!(english.cues[0].content.text_content(), "ab");
    assert_eq!(splits["ko"].cues[0].content.text_content(), "c");
}

#[test]
fn test_split_by_language_withUntaggedContent_shouldReplicateIt() {
    let document = SamiDocument::new(
        vec![cue(
            0,
            vec![
                RichNode::text("♪"),
                paragraph("common", None),
                paragraph("가", Some("Korean")),
                paragraph("A", Some("English")),
            ],
        )],
        vec![
            language("KRCC", "Korean", "ko"),
            language("ENCC", "English", "en"),
        ],
    );

    let splits = document.split_by_language();
    assert_eq!(splits["ko"].cues[0].content.text_content(), "♪common가");
    assert_eq!(splits["en"].cues[0].content.text_content(), "♪commonA");
}

#[test]
fn test_split_by_language_withoutLanguages_shouldBeEmpty() {
    let document = SamiDocument::new(vec![cue(0, vec![RichNode::text("a")])], Vec::new());
    assert!(document.split_by_language().is_empty());
}

#[test]
fn test_split_by_language_shouldKeepSourceDocumentIntact() -> Result<()> {
    let document = SamiDocument::parse(common::BILINGUAL_SAMI)?;
    let before = document.clone();
    let _splits = document.split_by_language();
    assert_eq!(document, before);
    Ok(())
}

#[test]
fn test_delay_withNegativeShift_shouldAllowTimesBelowZero() {
    let mut document = SamiDocument::new(vec![cue(100, Vec::new()), cue(900, Vec::new())], Vec::new());
    document.delay(-300);
    let starts: Vec<i64> = document.cues.iter().map(|cue| cue.start_ms).collect();
    assert_eq!(starts, vec![-200, 600]);
}

#[test]
fn test_clone_shouldBeDeepCopy() -> Result<()> {
    let document = SamiDocument::parse(common::BILINGUAL_SAMI)?;
    let mut copy = document.clone();
    copy.delay(500);
    copy.cues[0].content.children.clear();
    copy.languages.pop();

    assert_eq!(document.cues[0].start_ms, 1000);
    assert!(!document.cues[0].content.children.is_empty());
    assert_eq!(document.languages.len(), 2);
    Ok(())
}

#[test]
fn test_language_by_name_shouldFindDeclaredLanguage() -> Result<()> {
    let document = SamiDocument::parse(common::BILINGUAL_SAMI)?;
    assert_eq!(
        document.language_by_name("English").map(|l| l.code.as_str()),
        Some("en-US")
    );
    assert!(document.language_by_name("French").is_none());
    Ok(())
}
