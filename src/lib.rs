/*!
 * # samiconv - SAMI subtitle converter
 *
 * A Rust library for converting SAMI (`.smi`) subtitles into WebVTT,
 * SubRip and TTML.
 *
 * ## Features
 *
 * - Lenient SAMI parsing with tag soup recovery
 * - Repair of misplaced ruby annotations and their font colours
 * - Per-language tagging from the style block, with document splitting
 * - Cue delay, including negative shifts
 * - WebVTT with colour classes and an optional standalone stylesheet
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `markup`: Tag locator, entity decoding and the lenient tree builder
 * - `rich_text`: Owned rich-text tree of cue content
 * - `sami`: Document model, parser and normalization passes
 * - `serializer`: Non-recursive tree-to-text serializer
 * - `writers`: WebVTT, SubRip and TTML writers
 * - `app_config`: Configuration management
 * - `app_controller`: File and folder conversion workflow
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod markup;
pub mod rich_text;
pub mod sami;
pub mod serializer;
pub mod writers;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{ConvertedTrack, Controller, FolderSummary};
pub use errors::{AppError, SamiError, TimeCodeError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use rich_text::{Element, RichNode, Tag};
pub use sami::{Cue, Language, SamiDocument};
pub use writers::{
    CaptionWriter, OutputFormat, SubRipWriter, TtmlWriter, WebVttWriter, WriterOutput,
    convert_to_subrip, convert_to_ttml, convert_to_webvtt,
};
