/*!
 * Integration tests for the conversion controller
 */

use anyhow::Result;
use std::fs;

use samiconv::app_config::Config;
use samiconv::app_controller::{Controller, FolderSummary};
use samiconv::writers::OutputFormat;

use crate::common;

fn controller_with(adjust: impl FnOnce(&mut Config)) -> Result<Controller> {
    let mut config = Config::default();
    adjust(&mut config);
    Controller::with_config(config)
}

#[test]
fn test_controller_with_invalid_config_shouldFail() {
    let result = controller_with(|config| config.conversion.concurrent_files = 0);
    assert!(result.is_err());
}

#[test]
fn test_convert_str_withDefaults_shouldReturnSingleUnlabelledTrack() -> Result<()> {
    let controller = controller_with(|_| {})?;
    let tracks = controller.convert_str(common::BILINGUAL_SAMI)?;

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].language, None);
    assert_eq!(tracks[0].extension, "vtt");
    assert!(tracks[0].output.subtitle.contains("안녕"));
    assert!(tracks[0].output.subtitle.contains("Hello"));
    Ok(())
}

#[test]
fn test_convert_str_withSplit_shouldReturnTrackPerCode() -> Result<()> {
    let controller = controller_with(|config| config.conversion.split_languages = true)?;
    let tracks = controller.convert_str(common::BILINGUAL_SAMI)?;

    let codes: Vec<Option<&str>> = tracks.iter().map(|t| t.language.as_deref()).collect();
    assert_eq!(codes, vec![Some("en-US"), Some("ko-KR")]);
    assert!(tracks[0].output.subtitle.contains("Hello"));
    assert!(!tracks[0].output.subtitle.contains("안녕"));
    assert!(tracks[1].output.subtitle.contains("안녕"));
    assert!(!tracks[1].output.subtitle.contains("Hello"));
    Ok(())
}

#[test]
fn test_convert_str_withLanguageFilter_shouldKeepMatchingLanguage() -> Result<()> {
    let controller = controller_with(|config| {
        config.output_format = OutputFormat::Srt;
        config.conversion.language = Some("ko".to_string());
    })?;
    let tracks = controller.convert_str(common::BILINGUAL_SAMI)?;

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].language, None);
    assert_eq!(tracks[0].extension, "srt");
    assert!(tracks[0].output.subtitle.contains("잘가"));
    assert!(!tracks[0].output.subtitle.contains("Bye"));
    Ok(())
}

#[test]
fn test_convert_str_withUndeclaredLanguage_shouldReturnNothing() -> Result<()> {
    let controller = controller_with(|config| config.conversion.language = Some("ja".to_string()))?;
    assert!(controller.convert_str(common::BILINGUAL_SAMI)?.is_empty());
    Ok(())
}

#[test]
fn test_convert_str_withNegativeDelay_shouldShiftCues() -> Result<()> {
    let controller = controller_with(|config| config.conversion.delay_ms = -500)?;
    let tracks = controller.convert_str(common::BILINGUAL_SAMI)?;
    assert!(tracks[0].output.subtitle.contains("00:00.500 --> 00:02.500"));
    Ok(())
}

#[test]
fn test_convert_str_withBrokenDocument_shouldReturnParseError() -> Result<()> {
    let controller = controller_with(|_| {})?;
    assert!(controller.convert_str("<SAMI><BODY>no sync</BODY></SAMI>").is_err());
    Ok(())
}

#[tokio::test]
async fn test_run_withSingleFile_shouldWriteNextToOutputDir() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_sami(temp_dir.path(), "movie.smi")?;
    let out_dir = temp_dir.path().join("out");

    let controller = controller_with(|_| {})?;
    let written = controller.run(input, out_dir.clone(), false).await?;

    assert_eq!(written, vec![out_dir.join("movie.vtt")]);
    let content = fs::read_to_string(out_dir.join("movie.vtt"))?;
    assert!(content.starts_with("WEBVTT"));
    Ok(())
}

#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_sami(temp_dir.path(), "movie.smi")?;
    let existing = common::create_test_file(temp_dir.path(), "movie.vtt", "keep me")?;
    let controller = controller_with(|_| {})?;

    let written = controller
        .run(input.clone(), temp_dir.path().to_path_buf(), false)
        .await?;
    assert!(written.is_empty());
    assert_eq!(fs::read_to_string(&existing)?, "keep me");

    let written = controller
        .run(input, temp_dir.path().to_path_buf(), true)
        .await?;
    assert_eq!(written, vec![existing.clone()]);
    assert!(fs::read_to_string(&existing)?.starts_with("WEBVTT"));
    Ok(())
}

#[tokio::test]
async fn test_run_withSplitLanguages_shouldNameFilesByCode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_sami(temp_dir.path(), "movie.smi")?;
    let controller = controller_with(|config| {
        config.output_format = OutputFormat::Ttml;
        config.conversion.split_languages = true;
    })?;

    controller
        .run(input, temp_dir.path().to_path_buf(), false)
        .await?;

    let korean = fs::read_to_string(temp_dir.path().join("movie.ko-KR.ttml"))?;
    let english = fs::read_to_string(temp_dir.path().join("movie.en-US.ttml"))?;
    assert!(korean.contains("xml:lang=\"ko-KR\""));
    assert!(english.contains("Bye"));
    assert!(!english.contains("잘가"));
    Ok(())
}

#[tokio::test]
async fn test_run_withStyleElement_shouldWriteStylesheet() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "colors.smi", common::KOREAN_SAMI)?;
    let controller = controller_with(|config| config.webvtt.create_style_element = true)?;

    let written = controller
        .run(input, temp_dir.path().to_path_buf(), false)
        .await?;

    assert_eq!(
        written,
        vec![
            temp_dir.path().join("colors.vtt"),
            temp_dir.path().join("colors.css"),
        ]
    );
    let css = fs::read_to_string(temp_dir.path().join("colors.css"))?;
    assert!(css.contains("video::cue(.cff0000) { color: #FF0000; }"));
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_with(|_| {})?;
    let result = controller
        .run(
            temp_dir.path().join("nope.smi"),
            temp_dir.path().to_path_buf(),
            false,
        )
        .await;
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_run_folder_withMixedFiles_shouldCountOutcomes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_sami(root, "one.smi")?;
    common::create_test_sami(root, "season/two.SMI")?;
    common::create_test_sami(root, "three.smi")?;
    common::create_test_file(root, "three.srt", "existing")?;
    common::create_test_file(root, "broken.smi", "<SAMI><HEAD></HEAD></SAMI>")?;
    common::create_test_file(root, "readme.txt", "ignored")?;

    let controller = controller_with(|config| {
        config.output_format = OutputFormat::Srt;
        config.conversion.concurrent_files = 2;
    })?;
    let summary = controller
        .run_folder(root.to_path_buf(), None, false)
        .await?;

    assert_eq!(
        summary,
        FolderSummary {
            converted: 2,
            skipped: 1,
            failed: 1,
        }
    );
    assert!(root.join("one.srt").is_file());
    assert!(root.join("season/two.srt").is_file());
    assert_eq!(fs::read_to_string(root.join("three.srt"))?, "existing");
    Ok(())
}

#[tokio::test]
async fn test_run_folder_withOutputDir_shouldCollectOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("in");
    let output_dir = temp_dir.path().join("out");
    common::create_test_sami(&input_dir, "a.smi")?;
    common::create_test_sami(&input_dir, "nested/b.smi")?;

    let controller = controller_with(|_| {})?;
    let summary = controller
        .run_folder(input_dir, Some(output_dir.clone()), false)
        .await?;

    assert_eq!(summary.converted, 2);
    assert!(output_dir.join("a.vtt").is_file());
    assert!(output_dir.join("b.vtt").is_file());
    Ok(())
}

#[test]
fn test_run_folder_withoutSamiFiles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "notes.txt", "")?;
    let controller = controller_with(|_| {})?;

    let result = tokio_test::block_on(async {
        controller
            .run_folder(temp_dir.path().to_path_buf(), None, false)
            .await
    });
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_run_withMissingInput_shouldFailWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller_with(|_| {})?;

    let result = tokio_test::block_on(async {
        controller
            .run(
                temp_dir.path().join("absent.smi"),
                temp_dir.path().to_path_buf(),
                false,
            )
            .await
    });
    assert!(result.is_err());
    assert!(!temp_dir.path().join("absent.vtt").exists());
    Ok(())
}
