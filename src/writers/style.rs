/*!
 * Per-write registry of colour styles.
 *
 * Every distinct `font` colour seen during one write gets exactly one named
 * style. Registration order is kept so that output is deterministic.
 */

use std::collections::HashSet;

use crate::rich_text::Element;

/// A named colour style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorStyle {
    /// Style name, e.g. `cff0000`
    pub name: String,
    /// CSS colour value, e.g. `#FF0000`
    pub color: String,
}

/// Append-only set of colour styles, scoped to one write call
#[derive(Debug, Default)]
pub struct StyleRegistry {
    styles: Vec<ColorStyle>,
    names: HashSet<String>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the colour of a `font` element and returns its style name
    pub fn register_font(&mut self, font: &Element) -> Option<String> {
        let color = normalize_color(font.attribute("color")?)?;
        let name = style_name(&color)?;
        if self.names.insert(name.clone()) {
            self.styles.push(ColorStyle {
                name: name.clone(),
                color,
            });
        }
        Some(name)
    }

    /// Styles in registration order
    pub fn styles(&self) -> &[ColorStyle] {
        &self.styles
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Trims a colour value and adds the `#` a bare hex triplet is missing
pub fn normalize_color(raw: &str) -> Option<String> {
    let color = raw.trim();
    if color.is_empty() {
        return None;
    }
    let bare_hex = matches!(color.len(), 3 | 6) && color.chars().all(|c| c.is_ascii_hexdigit());
    if bare_hex {
        Some(format!("#{}", color))
    } else {
        Some(color.to_string())
    }
}

/// `c` followed by the lowercased alphanumerics of the colour
pub fn style_name(color: &str) -> Option<String> {
    let suffix: String = color
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if suffix.is_empty() {
        None
    } else {
        Some(format!("c{}", suffix))
    }
}
