/*!
 * Tag locator: finds tag boundaries in raw markup without building a tree.
 *
 * SAMI input is rarely well-formed, so positions are taken directly from
 * the source string. Tag names match case-insensitively, quoted attribute
 * values may contain `>`, and nothing inside a comment is ever matched.
 * Malformed input never fails: scanning stops at the first unterminated
 * construct and whatever follows is left to the caller as plain text.
 */

use std::ops::Range;

use super::entities::decode_entities;

/// A start tag found in raw markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundTag {
    /// Lowercased tag name
    pub name: String,
    /// Attributes in source order, names lowercased, values decoded
    pub attributes: Vec<(String, String)>,
    /// Byte offset of `<`
    pub start: usize,
    /// Byte offset just past `>`
    pub end: usize,
    /// Written as `<tag ... />`
    pub self_closing: bool,
}

impl FoundTag {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// First attribute with the given case-insensitive name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// One markup construct in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Start(FoundTag),
    End { name: String, span: Range<usize> },
    Comment { text: String, span: Range<usize> },
    /// `<!DOCTYPE ...>`, `<?xml ...?>` and similar; ignored by every consumer
    Declaration { span: Range<usize> },
}

impl Markup {
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Start(tag) => tag.span(),
            Self::End { span, .. } | Self::Comment { span, .. } | Self::Declaration { span } => {
                span.clone()
            }
        }
    }
}

/// First start tag named `name`
pub fn find_start_tag(name: &str, text: &str) -> Option<FoundTag> {
    scan(text).into_iter().find_map(|markup| match markup {
        Markup::Start(tag) if tag.name.eq_ignore_ascii_case(name) => Some(tag),
        _ => None,
    })
}

/// Every start tag named `name`, in source order
pub fn find_start_tags(name: &str, text: &str) -> Vec<FoundTag> {
    scan(text)
        .into_iter()
        .filter_map(|markup| match markup {
            Markup::Start(tag) if tag.name.eq_ignore_ascii_case(name) => Some(tag),
            _ => None,
        })
        .collect()
}

/// Every start tag regardless of name, in source order
pub fn find_all_start_tags(text: &str) -> Vec<FoundTag> {
    scan(text)
        .into_iter()
        .filter_map(|markup| match markup {
            Markup::Start(tag) => Some(tag),
            _ => None,
        })
        .collect()
}

/// First end tag named `name` starting at or after `from`
pub fn find_end_tag(name: &str, text: &str, from: usize) -> Option<Range<usize>> {
    scan(text).into_iter().find_map(|markup| match markup {
        Markup::End { name: found, span } if span.start >= from && found.eq_ignore_ascii_case(name) => {
            Some(span)
        }
        _ => None,
    })
}

/// Last end tag named `name`
pub fn find_last_end_tag(name: &str, text: &str) -> Option<Range<usize>> {
    scan(text).into_iter().rev().find_map(|markup| match markup {
        Markup::End { name: found, span } if found.eq_ignore_ascii_case(name) => Some(span),
        _ => None,
    })
}

/// Enumerates every markup construct of `text` in source order
pub fn scan(text: &str) -> Vec<Markup> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('<') {
        let lt = cursor + offset;
        let after = &bytes[lt + 1..];

        if text[lt..].starts_with("<!--") {
            let Some(close) = text[lt + 4..].find("-->") else {
                break;
            };
            let end = lt + 4 + close + 3;
            found.push(Markup::Comment {
                text: text[lt + 4..lt + 4 + close].to_string(),
                span: lt..end,
            });
            cursor = end;
            continue;
        }

        match after.first() {
            Some(b'!') | Some(b'?') => {
                let Some(close) = text[lt..].find('>') else {
                    break;
                };
                found.push(Markup::Declaration {
                    span: lt..lt + close + 1,
                });
                cursor = lt + close + 1;
            }
            Some(b'/') if after.get(1).is_some_and(u8::is_ascii_alphabetic) => {
                let name_end = lt + 2 + name_length(&bytes[lt + 2..]);
                let Some(close) = text[name_end..].find('>') else {
                    break;
                };
                let end = name_end + close + 1;
                found.push(Markup::End {
                    name: text[lt + 2..name_end].to_ascii_lowercase(),
                    span: lt..end,
                });
                cursor = end;
            }
            Some(c) if c.is_ascii_alphabetic() => match read_start_tag(text, lt) {
                Some(tag) => {
                    cursor = tag.end;
                    found.push(Markup::Start(tag));
                }
                None => break,
            },
            // A lone `<` is character data
            _ => cursor = lt + 1,
        }
    }

    found
}

fn name_length(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':'))
        .count()
}

/// Reads the start tag whose `<` is at `lt`; `None` when it never terminates
fn read_start_tag(text: &str, lt: usize) -> Option<FoundTag> {
    let bytes = text.as_bytes();
    let name_end = lt + 1 + name_length(&bytes[lt + 1..]);
    let name = text[lt + 1..name_end].to_ascii_lowercase();
    let mut attributes = Vec::new();
    let mut pos = name_end;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        match bytes.get(pos)? {
            b'>' => {
                return Some(FoundTag {
                    name,
                    attributes,
                    start: lt,
                    end: pos + 1,
                    self_closing: false,
                });
            }
            b'/' if bytes.get(pos + 1) == Some(&b'>') => {
                return Some(FoundTag {
                    name,
                    attributes,
                    start: lt,
                    end: pos + 2,
                    self_closing: true,
                });
            }
            b'/' => pos += 1,
            _ => {
                let key_start = pos;
                while pos < bytes.len()
                    && !bytes[pos].is_ascii_whitespace()
                    && !matches!(bytes[pos], b'=' | b'>' | b'/')
                {
                    pos += 1;
                }
                let key = text[key_start..pos].to_ascii_lowercase();

                while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                if bytes.get(pos) != Some(&b'=') {
                    attributes.push((key, String::new()));
                    continue;
                }
                pos += 1;
                while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }

                let value = match bytes.get(pos)? {
                    quote @ (b'"' | b'\'') => {
                        let close = text[pos + 1..].find(char::from(*quote))?;
                        let value = &text[pos + 1..pos + 1 + close];
                        pos += close + 2;
                        value
                    }
                    _ => {
                        let value_start = pos;
                        while pos < bytes.len()
                            && !bytes[pos].is_ascii_whitespace()
                            && bytes[pos] != b'>'
                        {
                            pos += 1;
                        }
                        &text[value_start..pos]
                    }
                };
                attributes.push((key, decode_entities(value).into_owned()));
            }
        }
    }
}
