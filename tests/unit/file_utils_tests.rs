/*!
 * Tests for file and folder utilities
 */

use anyhow::Result;
use std::path::{Path, PathBuf};

use samiconv::file_utils::FileManager;

use crate::common;

#[test]
fn test_generate_output_path_withLanguage_shouldInsertCode() {
    let path = FileManager::generate_output_path("/in/movie.smi", "/out", Some("ko-KR"), "vtt");
    assert_eq!(path, PathBuf::from("/out/movie.ko-KR.vtt"));

    let path = FileManager::generate_output_path("movie.en.smi", "", None, "srt");
    assert_eq!(path, PathBuf::from("movie.en.srt"));
}

#[test]
fn test_is_sami_file_shouldIgnoreCase() {
    assert!(FileManager::is_sami_file("a.SMI"));
    assert!(FileManager::is_sami_file(Path::new("dir/b.sami")));
    assert!(!FileManager::is_sami_file("c.srt"));
    assert!(!FileManager::is_sami_file("smi"));
}

#[test]
fn test_find_sami_files_shouldRecurseInNameOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "b.smi", "")?;
    common::create_test_file(root, "a.SMI", "")?;
    common::create_test_file(root, "notes.txt", "")?;
    common::create_test_file(root, "season/c.sami", "")?;

    let files = FileManager::find_sami_files(root)?;
    let names: Vec<PathBuf> = files
        .iter()
        .map(|path| path.strip_prefix(root).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        names,
        vec![
            PathBuf::from("a.SMI"),
            PathBuf::from("b.smi"),
            PathBuf::from("season/c.sami"),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_read_subtitle_withUtf16File_shouldDecode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("utf16.smi");

    let mut bytes = vec![0xFF, 0xFE];
    for unit in "<SAMI>자막</SAMI>".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    std::fs::write(&path, bytes)?;

    assert_eq!(FileManager::read_subtitle(&path).await?, "<SAMI>자막</SAMI>");
    Ok(())
}

#[tokio::test]
async fn test_write_to_file_withMissingParent_shouldCreateDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested/out/movie.vtt");

    FileManager::write_to_file(&path, "WEBVTT\r\n").await?;
    assert!(FileManager::file_exists(&path));
    assert_eq!(std::fs::read_to_string(&path)?, "WEBVTT\r\n");
    Ok(())
}

#[tokio::test]
async fn test_read_subtitle_withMissingFile_shouldFail() {
    let result = FileManager::read_subtitle("/definitely/not/here.smi").await;
    assert!(result.is_err());
}
