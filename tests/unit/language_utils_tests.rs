/*!
 * Tests for ISO language code utilities
 */

use samiconv::language_utils::{
    get_language_name, language_codes_match, normalize_to_part2t, primary_subtag,
};

#[test]
fn test_primary_subtag_shouldLowercaseFirstSubtag() {
    assert_eq!(primary_subtag("ko-KR"), "ko");
    assert_eq!(primary_subtag(" EN_us "), "en");
    assert_eq!(primary_subtag(""), "");
}

#[test]
fn test_normalize_to_part2t_withAllCodeForms_shouldReturnTerminologyCode() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("ko-KR").unwrap(), "kor");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("chi").unwrap(), "zho");
    assert!(normalize_to_part2t("english").is_err());
}

#[test]
fn test_language_codes_match_acrossForms_shouldMatch() {
    assert!(language_codes_match("en-US", "eng"));
    assert!(language_codes_match("fr", "fre"));
    assert!(!language_codes_match("fr", "de"));
}

#[test]
fn test_get_language_name_shouldReturnEnglishName() {
    assert_eq!(get_language_name("ko-KR").unwrap(), "Korean");
    assert_eq!(get_language_name("en").unwrap(), "English");
}
