/*!
 * Common test utilities for the samiconv test suite
 */
#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Korean and English cues, the second cue blanked with `&nbsp;`
pub const BILINGUAL_SAMI: &str = r#"<SAMI>
<HEAD>
<TITLE>Bilingual</TITLE>
<STYLE TYPE="text/css">
<!--
P { margin-left: 8pt; }
.KRCC { Name: Korean; lang: ko-KR; }
.ENCC { Name: English; lang: en-US; }
-->
</STYLE>
</HEAD>
<BODY>
<SYNC Start=1000><P Class=KRCC>안녕<P Class=ENCC>Hello
<SYNC Start=3000><P Class=KRCC>&nbsp;<P Class=ENCC>&nbsp;
<SYNC Start=4000><P Class=KRCC>잘가<P Class=ENCC>Bye
<SYNC Start=6000><P Class=KRCC>&nbsp;<P Class=ENCC>&nbsp;
</BODY>
</SAMI>"#;

/// Single language document with colours and a line break
pub const KOREAN_SAMI: &str = r##"<SAMI><HEAD><STYLE><!--
.KRCC { name: Korean; lang: ko; }
--></STYLE></HEAD><BODY>
<SYNC Start=1000><P Class=KRCC>Hello<br>World</SYNC>
<SYNC Start=3000><P Class=KRCC><font color="#FF0000">빨강</font>
<SYNC Start=4000><P Class=KRCC><font color=#FF0000>다시</font>
<SYNC Start=5000></SYNC>
</BODY></SAMI>"##;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates the bilingual sample SAMI file
pub fn create_test_sami(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, BILINGUAL_SAMI)
}

/// Wraps cue markup into a document declaring only Korean
pub fn korean_document(body: &str) -> String {
    format!(
        "<SAMI><HEAD><STYLE>.KRCC {{ name: Korean; lang: ko; }}</STYLE></HEAD><BODY>{}</BODY></SAMI>",
        body
    )
}
