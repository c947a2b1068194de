/*!
 * Lenient character reference decoding.
 *
 * Well-formed references are resolved by quick-xml's HTML5 table while the
 * markup reader runs. This module covers what that reader rejects: legacy
 * references written without a trailing semicolon (`&nbsp` is common in
 * SAMI files) and bare ampersands. Unknown references stay literal.
 */

use std::borrow::Cow;

use quick_xml::escape::resolve_html5_entity;

// References that browsers accept without the semicolon
const LEGACY_WITHOUT_SEMICOLON: &[&str] = &["nbsp", "amp", "lt", "gt", "quot", "copy", "reg"];

/// Decode character references, borrowing when there is nothing to decode
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp + 1..];
        match decode_reference(candidate, &mut out) {
            Some(consumed) => rest = &candidate[consumed..],
            None => {
                out.push('&');
                rest = candidate;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decodes the reference at the start of `candidate` (the text after `&`)
/// into `out`. Returns the number of bytes consumed.
fn decode_reference(candidate: &str, out: &mut String) -> Option<usize> {
    if let Some(numeric) = candidate.strip_prefix('#') {
        let (digits, radix, prefix_len) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 2),
            None => (numeric, 10, 1),
        };
        let len = digits
            .char_indices()
            .find(|(_, c)| !c.is_digit(radix))
            .map_or(digits.len(), |(index, _)| index);
        if len == 0 {
            return None;
        }
        let value = u32::from_str_radix(&digits[..len], radix).ok()?;
        out.push(char::from_u32(value).unwrap_or('\u{fffd}'));
        let semicolon = usize::from(digits[len..].starts_with(';'));
        return Some(prefix_len + len + semicolon);
    }

    let name_len = candidate
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphanumeric())
        .map_or(candidate.len(), |(index, _)| index);
    let name = &candidate[..name_len];

    if candidate[name_len..].starts_with(';') {
        let replacement = resolve_html5_entity(name)?;
        out.push_str(replacement);
        return Some(name_len + 1);
    }

    // `&nbspfoo` still decodes the `&nbsp` prefix, like a browser does
    let known = LEGACY_WITHOUT_SEMICOLON
        .iter()
        .filter(|known| name.starts_with(**known))
        .max_by_key(|known| known.len())?;
    out.push_str(resolve_html5_entity(known)?);
    Some(known.len())
}
