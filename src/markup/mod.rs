/*!
 * Raw markup handling: tag positions, character references and the lenient
 * tree builder used for cue content.
 */

pub mod entities;
pub mod tag_locator;
pub mod tree_builder;

pub use entities::decode_entities;
pub use tag_locator::{FoundTag, Markup, find_all_start_tags, find_start_tag, find_start_tags};
pub use tree_builder::{build_fragment, build_fragment_filtered};
