/*!
 * Language declarations from a SAMI style block.
 *
 * Only class rules matter here, e.g. `.KRCC { Name: Korean; lang: ko-KR; }`.
 * This is a selector/declaration scan, not a CSS parser.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use super::document::Language;

// @const: `.class { declarations }` with no nested braces
static CLASS_RULE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.([A-Za-z0-9_-]+)\s*\{([^{}]*)\}").expect("valid class rule regex")
});

/// Extracts the language table from the text content of a style block
pub fn extract_languages(style: &str) -> Vec<Language> {
    let style = style.replace("<!--", "").replace("-->", "");
    let mut languages: Vec<Language> = Vec::new();

    for captures in CLASS_RULE_REGEX.captures_iter(&style) {
        let css_class = &captures[1];
        let Some((display_name, code)) = read_declarations(&captures[2]) else {
            debug!("Class .{} is not a language declaration", css_class);
            continue;
        };

        if languages
            .iter()
            .any(|known| known.css_class.eq_ignore_ascii_case(css_class))
        {
            warn!("Ignoring repeated declaration for class .{}", css_class);
            continue;
        }

        languages.push(Language {
            css_class: css_class.to_string(),
            display_name,
            code,
        });
    }

    languages
}

/// Returns `(name, lang)` once both keys have been seen
fn read_declarations(body: &str) -> Option<(String, String)> {
    let mut name: Option<String> = None;
    let mut lang: Option<String> = None;

    for declaration in body.split(';') {
        let Some((key, value)) = declaration.split_once(':') else {
            continue;
        };
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'').trim();
        if value.is_empty() {
            continue;
        }
        match key.trim().to_ascii_lowercase().as_str() {
            "name" if name.is_none() => name = Some(value.to_string()),
            "lang" if lang.is_none() => lang = Some(value.to_string()),
            _ => {}
        }
        if name.is_some() && lang.is_some() {
            break;
        }
    }

    name.zip(lang)
}
