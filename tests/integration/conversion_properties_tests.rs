/*!
 * Document-level conversion properties: copies render identically, time
 * codes round trip, ruby repair is stable, splitting and delaying compose.
 */

use anyhow::Result;
use samiconv::rich_text::RichNode;
use samiconv::sami::{SamiDocument, ruby};
use samiconv::writers::{
    CaptionWriter, SubRipWriter, TtmlWriter, WebVttOptions, WebVttWriter, convert_to_subrip,
    convert_to_webvtt, format_webvtt_time, parse_time_code,
};

use crate::common;

fn untagged_text(document: &SamiDocument) -> Vec<String> {
    document
        .cues
        .iter()
        .map(|cue| {
            cue.content
                .children
                .iter()
                .filter(|child| child.as_element().is_none_or(|element| element.language.is_none()))
                .map(RichNode::text_content)
                .collect()
        })
        .collect()
}

#[test]
fn test_clone_thenWrite_shouldMatchOriginalOutput() -> Result<()> {
    for markup in [common::BILINGUAL_SAMI, common::KOREAN_SAMI] {
        let document = SamiDocument::parse(markup)?;
        let copy = document.clone();

        let writers: Vec<Box<dyn CaptionWriter>> = vec![
            Box::new(WebVttWriter::default()),
            Box::new(SubRipWriter::default()),
            Box::new(TtmlWriter::default()),
        ];
        for writer in writers {
            assert_eq!(writer.write(&copy), writer.write(&document));
        }
    }
    Ok(())
}

#[test]
fn test_time_code_round_trip_withBothShapes_shouldBeIdentity() -> Result<()> {
    for code in [
        "00:00.000",
        "00:59.001",
        "07:08.090",
        "59:59.999",
        "01:00:00.000",
        "02:03:04.005",
        "99:59:59.999",
    ] {
        assert_eq!(format_webvtt_time(parse_time_code(code)?), code);
    }
    Ok(())
}

#[test]
fn test_ruby_correction_appliedTwice_shouldBeStableForParsedCues() -> Result<()> {
    let markup = common::korean_document(
        r##"<SYNC Start=0><P Class=KRCC><ruby>漢字<rt></rt><font color="#fff">かんじ</font></ruby>
<SYNC Start=1000><P Class=KRCC><font color=#ff0><ruby>日本<rt></font>にほん</rt></ruby>
<SYNC Start=2000><P Class=KRCC><ruby>正<rp>(</rp><rt>せい</rt><rp>)</rp></ruby>
<SYNC Start=3000>"##,
    );
    let document = SamiDocument::parse(&markup)?;

    for cue in &document.cues {
        assert!(!ruby::needs_correction(&cue.content));
        let again = ruby::correct(cue.content.clone(), &cue.raw_span);
        assert_eq!(again, cue.content);
    }
    Ok(())
}

#[test]
fn test_ruby_correction_scenario_shouldMoveReadingIntoRt() -> Result<()> {
    let markup = common::korean_document(
        r##"<SYNC Start=0><P Class=KRCC><ruby>漢字<rt></rt><font color="#fff">reading</font></ruby><SYNC Start=1000>"##,
    );
    let output = convert_to_webvtt(&markup, WebVttOptions::default())?;
    assert!(
        output
            .subtitle
            .contains("<ruby>漢字<rt><c.cfff>reading</c></rt></ruby>")
    );
    Ok(())
}

#[test]
fn test_split_by_language_thenMerge_shouldReproduceUntaggedText() -> Result<()> {
    let markup = r#"<SAMI><HEAD><STYLE>
.KRCC { name: Korean; lang: ko; }
.ENCC { name: English; lang: en; }
</STYLE></HEAD><BODY>
<SYNC Start=0>♪<P Class=KRCC>가<P Class=ENCC>A
<SYNC Start=1000><P Class=ENCC>B<P Class=SFX>(music)
<SYNC Start=2000>
</BODY></SAMI>"#;
    let document = SamiDocument::parse(markup)?;
    let original = untagged_text(&document);
    assert!(original[0].contains('♪'));
    assert!(original[1].contains("(music)"));

    let splits = document.split_by_language();
    assert_eq!(splits.len(), 2);
    for split in splits.values() {
        assert_eq!(untagged_text(split), original);
    }
    Ok(())
}

#[test]
fn test_delay_twice_shouldEqualSingleCombinedDelay() -> Result<()> {
    let document = SamiDocument::parse(common::BILINGUAL_SAMI)?;
    for (first, second) in [(0, 0), (250, -1000), (-40, -60), (1_000_000, 7), (-5, 5)] {
        let mut stepwise = document.clone();
        stepwise.delay(first);
        stepwise.delay(second);

        let mut combined = document.clone();
        combined.delay(first + second);

        assert_eq!(stepwise, combined);
    }
    Ok(())
}

#[test]
fn test_webvtt_scenario_withLineBreak_shouldWriteTimedCue() -> Result<()> {
    let markup = common::korean_document(
        "<SYNC Start=1000><P Class=KRCC>Hello<br>World</SYNC><SYNC Start=3000></SYNC>",
    );
    let output = convert_to_webvtt(&markup, WebVttOptions::default())?;
    assert!(output.subtitle.contains("00:01.000 --> 00:03.000\r\nHello\r\nWorld"));
    Ok(())
}

#[test]
fn test_nbsp_only_cue_shouldBeOmittedInEveryFormat() -> Result<()> {
    let subrip = convert_to_subrip(common::BILINGUAL_SAMI, Default::default())?;
    assert!(!subrip.contains("00:00:03,000 --> 00:00:04,000"));
    assert!(subrip.starts_with("1\r\n00:00:01,000 --> 00:00:03,000\r\n"));
    assert!(subrip.contains("2\r\n00:00:04,000 --> 00:00:06,000\r\n"));

    let webvtt = convert_to_webvtt(common::BILINGUAL_SAMI, WebVttOptions::default())?;
    assert!(!webvtt.subtitle.contains("00:03.000 --> 00:04.000"));
    Ok(())
}

#[test]
fn test_repeated_color_acrossCues_shouldProduceOneStyleRule() -> Result<()> {
    let output = convert_to_webvtt(common::KOREAN_SAMI, WebVttOptions::default())?;
    assert_eq!(output.subtitle.matches("::cue(.cff0000)").count(), 1);
    assert_eq!(output.subtitle.matches("<c.cff0000>").count(), 2);
    Ok(())
}

#[test]
fn test_writer_reuse_shouldNotLeakStylesBetweenCalls() -> Result<()> {
    let writer = WebVttWriter::default();
    let colored = SamiDocument::parse(common::KOREAN_SAMI)?;
    let plain = SamiDocument::parse(&common::korean_document(
        "<SYNC Start=0><P Class=KRCC>plain<SYNC Start=1000>",
    ))?;

    let _first = writer.write(&colored);
    let second = writer.write(&plain);
    assert!(!second.subtitle.contains("cff0000"));
    Ok(())
}
