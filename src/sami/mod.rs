/*!
 * SAMI document model, parser and normalization passes.
 */

pub mod document;
pub mod parser;
pub mod ruby;
pub mod style;

pub use document::{Cue, Language, SamiDocument};
pub use parser::parse;
