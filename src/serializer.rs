/*!
 * Flattens a cue's rich-text tree into a single caption string.
 *
 * The traversal is depth-first and pre-order but keeps its own work stack,
 * so arbitrarily deep trees never grow the call stack. The cue root is a
 * transparent container; every node below it is handed to a writer-supplied
 * handler that decides the markup wrapped around the node's rendered
 * children:
 *
 * - `None` drops the node together with its subtree,
 * - `divides` (paragraphs) starts a new line when something precedes it,
 * - `linebreak` (line breaks) always starts a new line.
 *
 * A node's markup is kept only if its rendered content is non-empty.
 */

use std::slice;

use crate::rich_text::{Element, RichNode};

/// Handler result for one node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagReadResult {
    /// Markup written before the node's content
    pub start: String,
    /// Markup written after the node's content
    pub end: String,
    /// Rendered content; the serializer appends rendered children to it
    pub content: String,
    /// Rendered markup comment: appended verbatim, leaves the line state alone
    pub is_comment: bool,
    /// Paragraph-like: separated from preceding content by a line break
    pub divides: bool,
    /// Line break: always ends the current line
    pub linebreak: bool,
    /// Drop `start` / `end` when the content is only whitespace
    pub requires_text: bool,
}

impl TagReadResult {
    /// Transparent result carrying literal content
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Result wrapping children in `start` / `end`
    pub fn wrap(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            ..Self::default()
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_comment: true,
            ..Self::default()
        }
    }

    pub fn divider() -> Self {
        Self {
            divides: true,
            ..Self::default()
        }
    }

    pub fn line_break() -> Self {
        Self {
            linebreak: true,
            ..Self::default()
        }
    }

    /// Same result, its markup kept only around visible text
    pub fn requiring_text(mut self) -> Self {
        self.requires_text = true;
        self
    }

    fn into_markup(self) -> String {
        if self.requires_text && self.content.trim().is_empty() {
            self.content
        } else {
            self.start + &self.content + &self.end
        }
    }
}

struct Frame<'a> {
    result: Option<TagReadResult>,
    children: slice::Iter<'a, RichNode>,
}

/// Serializes the descendants of `root`.
///
/// With `prevent_empty_line`, a result that is empty or ends on a line
/// break gets a trailing space, for formats where a blank line ends a cue.
pub fn serialize<F>(root: &Element, mut handler: F, prevent_empty_line: bool) -> String
where
    F: FnMut(&RichNode) -> Option<TagReadResult>,
{
    let mut stack = vec![Frame {
        result: Some(TagReadResult::default()),
        children: root.children.iter(),
    }];
    let mut is_blank_new_line = true;

    while let Some(top) = stack.last_mut() {
        if let Some(node) = top.children.next() {
            let result = handler(node);
            let children: &[RichNode] = match result {
                Some(_) => node.children(),
                None => &[],
            };
            stack.push(Frame {
                result,
                children: children.iter(),
            });
            continue;
        }

        let Some(finished) = stack.pop().and_then(|frame| frame.result) else {
            continue;
        };
        match stack.last_mut().and_then(|frame| frame.result.as_mut()) {
            Some(parent) => merge_into(parent, finished, &mut is_blank_new_line, prevent_empty_line),
            None => return manage_last_line(&finished.content, prevent_empty_line),
        }
    }

    manage_last_line("", prevent_empty_line)
}

fn merge_into(
    parent: &mut TagReadResult,
    child: TagReadResult,
    is_blank_new_line: &mut bool,
    prevent_empty_line: bool,
) {
    if child.linebreak || (child.divides && !parent.content.is_empty()) {
        // Lines never end with a space
        let line = manage_last_line(absorb_space_ending(&parent.content), prevent_empty_line);
        parent.content = line + "\r\n";
        *is_blank_new_line = true;
    }

    if child.content.is_empty() {
        return;
    }
    if child.is_comment {
        parent.content.push_str(&child.content);
        return;
    }

    let merged = child.into_markup();
    // ...and never start with one
    let merged = match merged.strip_prefix(' ') {
        Some(rest) if *is_blank_new_line => rest,
        _ => merged.as_str(),
    };
    parent.content.push_str(merged);
    *is_blank_new_line = false;
}

/// Drops one trailing space
pub fn absorb_space_ending(input: &str) -> &str {
    input.strip_suffix(' ').unwrap_or(input)
}

/// Appends a space to an empty last line when `prevent_empty_line` is set
pub fn manage_last_line(input: &str, prevent_empty_line: bool) -> String {
    if prevent_empty_line && (input.is_empty() || input.ends_with('\n')) {
        format!("{} ", input)
    } else {
        input.to_string()
    }
}

/// Returns `""` when `input` is only whitespace (non-breaking spaces
/// included), otherwise `input` untouched
pub fn absorb_air(input: &str) -> &str {
    if input.trim().is_empty() { "" } else { input }
}

/// Replaces blank lines with a single space so they cannot end a block
pub fn fill_empty_lines(input: &str) -> String {
    input
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .map(|line| if line.trim().is_empty() { " " } else { line })
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Collapses runs of markup whitespace into a single space, the way the
/// text would be rendered. Non-breaking spaces are kept.
pub fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_space = false;
    for c in input.chars() {
        if matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0c') {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}
