use anyhow::{Result, anyhow};
use isolang::Language;

/// Language code helpers for the `lang:` values of SAMI style blocks.
///
/// SAMI files declare BCP-47 tags (`ko-KR`, `en-US`), sometimes bare
/// ISO 639 codes (`ko`, `kor`, `ger`). Matching only ever looks at the
/// primary subtag.

// @const: ISO 639-2/B codes that differ from their 639-2/T counterpart
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("dut", "nld"),
    ("fre", "fra"),
    ("geo", "kat"),
    ("ger", "deu"),
    ("gre", "ell"),
    ("ice", "isl"),
    ("mac", "mkd"),
    ("may", "msa"),
    ("per", "fas"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Primary language subtag of a BCP-47 tag, lowercased: `ko-KR` -> `ko`
pub fn primary_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Resolves a BCP-47 tag or ISO 639 code to its language
pub fn resolve_language(code: &str) -> Result<Language> {
    let primary = primary_subtag(code);
    let language = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => {
            let terminology = BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(bibliographic, _)| *bibliographic == primary)
                .map_or(primary.as_str(), |&(_, terminology)| terminology);
            Language::from_639_3(terminology)
        }
        _ => None,
    };
    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-3 (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    Ok(resolve_language(code)?.to_639_3().to_string())
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (resolve_language(code1), resolve_language(code2)) {
        (Ok(first), Ok(second)) => first == second,
        _ => !code1.trim().is_empty() && primary_subtag(code1) == primary_subtag(code2),
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(resolve_language(code)?.to_name().to_string())
}
