/*!
 * Repair of misnested ruby/font markup.
 *
 * Some authoring tools emit the ruby text of a `ruby` element outside its
 * `rt`, usually because a `font` element was closed across the ruby
 * boundary. Once parsed, positions no longer reflect intent, so the repair
 * works from the cue's raw source span:
 *
 * 1. build the cue again with every `font` tag removed,
 * 2. build it a second time keeping nothing but `font` tags,
 * 3. pair the readable text nodes of both trees by index and wrap each
 *    font-less text node in the colour it had in the font-only tree,
 * 4. move whatever follows an empty, non-final `rt` into that `rt`.
 *
 * Detection looks at the first `rt` of the cue only: when it has no text,
 * or sits outside any `ruby`, the cue is treated as malformed. A
 * deliberately empty ruby text is indistinguishable and gets the same
 * (harmless) rebuild.
 */

use std::mem;

use log::debug;

use crate::markup::build_fragment_filtered;
use crate::rich_text::{Element, RichNode, Tag};

/// Returns the repaired tree, or `content` unchanged when nothing is wrong
pub fn correct(content: Element, raw_span: &str) -> Element {
    if !needs_correction(&content) {
        return content;
    }
    debug!("Repairing ruby markup in cue: {:?}", raw_span.trim());

    let mut defonted = content.shallow_clone();
    defonted.children = build_fragment_filtered(raw_span, |name| name != "font");

    let mut font_only = Element::new("sync");
    font_only.children = build_fragment_filtered(raw_span, |name| name == "font");

    wrap_readable_text(&mut defonted, readable_text_fonts(&font_only));
    move_ruby_text(&mut defonted);
    defonted
}

/// True when the cue has a `ruby` and its first `rt` is empty or has no
/// `ruby` ancestor
pub fn needs_correction(content: &Element) -> bool {
    let mut has_ruby = false;
    let mut first_rt: Option<(&Element, bool)> = None;
    content.visit_descendants(|ancestors, node| {
        let Some(element) = node.as_element() else {
            return;
        };
        match element.tag() {
            Tag::Ruby => has_ruby = true,
            Tag::Rt if first_rt.is_none() => {
                let in_ruby = ancestors.iter().any(|ancestor| ancestor.tag() == Tag::Ruby);
                first_rt = Some((element, in_ruby));
            }
            _ => {}
        }
    });

    has_ruby
        && first_rt.is_some_and(|(rt, in_ruby)| !in_ruby || rt.text_content().is_empty())
}

fn is_readable(node: &RichNode) -> bool {
    matches!(node, RichNode::Text(text) if !text.trim().is_empty())
}

/// For each text node with visible characters, in document order, the
/// closest `font` ancestor carrying a colour (without its children)
fn readable_text_fonts(root: &Element) -> Vec<Option<Element>> {
    let mut fonts = Vec::new();
    root.visit_descendants(|ancestors, node| {
        if !is_readable(node) {
            return;
        }
        let font = ancestors
            .iter()
            .rev()
            .find(|element| {
                element.tag() == Tag::Font
                    && element.attribute("color").is_some_and(|color| !color.is_empty())
            })
            .map(|element| element.shallow_clone());
        fonts.push(font);
    });
    fonts
}

/// Wraps the k-th readable text node of `root` in the k-th font, if any
fn wrap_readable_text(root: &mut Element, fonts: Vec<Option<Element>>) {
    let mut fonts = fonts.into_iter();
    let mut cursors = vec![root.children.iter_mut()];

    while let Some(cursor) = cursors.last_mut() {
        let Some(node) = cursor.next() else {
            cursors.pop();
            continue;
        };

        if is_readable(node) {
            let Some(font) = fonts.next() else {
                return;
            };
            if let Some(mut font) = font {
                let inner = mem::replace(node, RichNode::Text(String::new()));
                font.children.push(inner);
                *node = RichNode::Element(font);
            }
        } else if let RichNode::Element(element) = node {
            cursors.push(element.children.iter_mut());
        }
    }
}

/// Moves the siblings following an empty, non-final `rt` into it, for every
/// `ruby` in the tree
fn move_ruby_text(root: &mut Element) {
    move_into_first_rt(root);
    let mut cursors = vec![root.children.iter_mut()];

    while let Some(cursor) = cursors.last_mut() {
        let Some(node) = cursor.next() else {
            cursors.pop();
            continue;
        };
        if let RichNode::Element(element) = node {
            move_into_first_rt(element);
            cursors.push(element.children.iter_mut());
        }
    }
}

fn move_into_first_rt(element: &mut Element) {
    if element.tag() != Tag::Ruby {
        return;
    }

    // Only the first rt of the ruby counts, and only as a direct child
    let holder = element.children.iter().position(|child| {
        child.as_element().is_some_and(|child| {
            child.tag() == Tag::Rt || !child.find_elements("rt").is_empty()
        })
    });
    let Some(index) = holder else {
        return;
    };
    let is_rt = element.children[index]
        .as_element()
        .is_some_and(|child| child.tag() == Tag::Rt);
    let last = element.children.len() - 1;
    if !is_rt || index == last || !element.children[index].children().is_empty() {
        return;
    }

    let trailing: Vec<RichNode> = element.children.drain(index + 1..).collect();
    if let Some(rt) = element.children[index].as_element_mut() {
        rt.children.extend(trailing);
    }
}
