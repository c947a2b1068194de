use anyhow::{Context, Result, anyhow};
use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::SamiError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::sami::SamiDocument;
use crate::writers::{
    CaptionWriter, OutputFormat, SubRipWriter, TtmlWriter, WebVttWriter, WriterOutput,
};

// @module: Application controller for SAMI conversion

/// One converted subtitle track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedTrack {
    /// BCP-47 code when the document was split by language
    pub language: Option<String>,
    /// File extension of the subtitle, without the dot
    pub extension: &'static str,
    pub output: WriterOutput,
}

/// Outcome of a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for subtitle conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn writer(&self) -> Box<dyn CaptionWriter> {
        match self.config.output_format {
            OutputFormat::WebVtt => Box::new(WebVttWriter::new(self.config.webvtt.clone())),
            OutputFormat::Srt => Box::new(SubRipWriter::new(self.config.subrip.clone())),
            OutputFormat::Ttml => Box::new(TtmlWriter::new(self.config.ttml.clone())),
        }
    }

    /// Parse, shift, split and write one SAMI document held in memory
    pub fn convert_str(&self, markup: &str) -> Result<Vec<ConvertedTrack>, SamiError> {
        let conversion = &self.config.conversion;

        let mut document = SamiDocument::parse(markup)?;
        if conversion.delay_ms != 0 {
            document.delay(conversion.delay_ms);
        }

        let mut documents: Vec<(Option<String>, SamiDocument)> =
            if conversion.split_languages || conversion.language.is_some() {
                document
                    .split_by_language()
                    .into_iter()
                    .map(|(code, split)| (Some(code), split))
                    .collect()
            } else {
                Vec::new()
            };
        if documents.is_empty() {
            documents.push((None, document));
        }

        if let Some(wanted) = &conversion.language {
            documents.retain(|(code, _)| {
                code.as_deref()
                    .is_some_and(|code| language_utils::language_codes_match(code, wanted))
            });
            if documents.is_empty() {
                warn!("No language matching '{}' is declared in the document", wanted);
            }
        }

        let writer = self.writer();
        Ok(documents
            .into_iter()
            .map(|(code, document)| ConvertedTrack {
                language: code.filter(|_| conversion.split_languages),
                extension: writer.extension(),
                output: writer.write(&document),
            })
            .collect())
    }

    /// Convert one file. Returns the paths written, empty when skipped.
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<Vec<PathBuf>> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let markup = FileManager::read_subtitle(&input_file).await?;
        let tracks = self
            .convert_str(&markup)
            .with_context(|| format!("Failed to convert {:?}", input_file))?;

        let mut written = Vec::new();
        for track in tracks {
            let language = track.language.as_deref();
            let subtitle_path =
                FileManager::generate_output_path(&input_file, &output_dir, language, track.extension);
            if subtitle_path.exists() && !force_overwrite {
                warn!(
                    "Skipping {:?}, output already exists (use -f to force overwrite)",
                    subtitle_path
                );
                continue;
            }

            FileManager::write_to_file(&subtitle_path, &track.output.subtitle).await?;
            written.push(subtitle_path);

            if let Some(stylesheet) = &track.output.stylesheet {
                let css_path =
                    FileManager::generate_output_path(&input_file, &output_dir, language, "css");
                FileManager::write_to_file(&css_path, stylesheet).await?;
                written.push(css_path);
            }
        }

        debug!(
            "Converted {:?} in {}",
            input_file,
            Self::format_duration(start_time.elapsed())
        );
        for path in &written {
            info!("Success: {:?}", path);
        }
        Ok(written)
    }

    /// Run the workflow in folder mode, converting every SAMI file found.
    /// Outputs go next to each input unless `output_dir` is given.
    pub async fn run_folder(
        &self,
        input_dir: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_sami_files(&input_dir)?;
        if files.is_empty() {
            return Err(anyhow!("No SAMI files found in directory: {:?}", input_dir));
        }
        info!("Found {} SAMI files in {:?}", files.len(), input_dir);

        let results = stream::iter(files)
            .map(|file| {
                let target_dir = output_dir
                    .clone()
                    .or_else(|| file.parent().map(Path::to_path_buf))
                    .unwrap_or_else(|| input_dir.clone());
                async move {
                    let result = self.run(file.clone(), target_dir, force_overwrite).await;
                    (file, result)
                }
            })
            .buffer_unordered(self.config.conversion.concurrent_files)
            .collect::<Vec<_>>()
            .await;

        let mut summary = FolderSummary::default();
        for (file, result) in results {
            match result {
                Ok(written) if written.is_empty() => summary.skipped += 1,
                Ok(_) => summary.converted += 1,
                Err(e) => {
                    error!("Error processing file {:?}: {:#}", file, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Folder processing completed: {} converted, {} skipped, {} errors in {}",
            summary.converted,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );
        Ok(summary)
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
