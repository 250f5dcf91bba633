/*!
 * Tests for SRT and WebVTT rendering
 */

use subwhisper::subtitle_processor::{
    render_srt, render_vtt, RenderOptions, Segment, SubtitleFormat, VTT_HEADER,
};

fn three_segments() -> Vec<Segment> {
    vec![
        Segment::new(0.0, 1.5, " First line. "),
        Segment::new(1.5, 3.25, "Second line."),
        Segment::new(3.25, 5.0, "  Third line.\n"),
    ]
}

/// Test the canonical single-cue example
#[test]
fn test_render_srt_withHelloSegment_shouldProduceExactBlock() {
    let segments = vec![Segment::new(1.5, 3.25, " Hello ")];
    assert_eq!(render_srt(&segments), "1\n00:00:01,500 --> 00:00:03,250\nHello\n\n");
}

#[test]
fn test_render_vtt_withHelloSegment_shouldProduceHeaderAndBlock() {
    let segments = vec![Segment::new(1.5, 3.25, " Hello ")];
    assert_eq!(
        render_vtt(&segments, None),
        "WEBVTT\n\n1\n00:00:01.500 --> 00:00:03.250\nHello\n\n"
    );
}

#[test]
fn test_render_srt_withNoSegments_shouldBeEmpty() {
    assert_eq!(render_srt(&[]), "");
}

#[test]
fn test_render_vtt_withNoSegments_shouldBeHeaderOnly() {
    assert_eq!(render_vtt(&[], None), "WEBVTT\n\n");
    assert_eq!(render_vtt(&[], Some(50)), "WEBVTT\n\n");
}

#[test]
fn test_render_srt_withThreeSegments_shouldNumberCuesInOrder() {
    let srt = render_srt(&three_segments());
    let blocks: Vec<&str> = srt.split("\n\n").filter(|b| !b.is_empty()).collect();

    assert_eq!(blocks.len(), 3);
    for (i, block) in blocks.iter().enumerate() {
        let first_line = block.lines().next().unwrap();
        assert_eq!(first_line, (i + 1).to_string());
    }
    assert!(blocks[0].ends_with("First line."));
    assert!(blocks[2].ends_with("Third line."));
}

#[test]
fn test_render_vtt_withWidth_shouldSuffixEveryTimingLine() {
    let vtt = render_vtt(&three_segments(), Some(50));
    let timing_lines: Vec<&str> = vtt.lines().filter(|l| l.contains(" --> ")).collect();

    assert_eq!(timing_lines.len(), 3);
    for line in timing_lines {
        assert!(line.ends_with(" size:50%"), "missing suffix: {}", line);
        assert_eq!(line.matches("size:").count(), 1);
    }
    assert_eq!(vtt.lines().nth(3), Some("00:00:00.000 --> 00:00:01.500 size:50%"));
}

#[test]
fn test_render_vtt_withoutWidth_shouldHaveNoCueSettings() {
    let vtt = render_vtt(&three_segments(), None);
    assert!(!vtt.contains("size:"));
    assert!(vtt.starts_with(VTT_HEADER));
}

#[test]
fn test_renderers_withSameSegments_shouldDifferOnlyInHeaderAndSeparator() {
    let segments = three_segments();
    let srt = render_srt(&segments);
    let vtt = render_vtt(&segments, None);

    let body = vtt.strip_prefix("WEBVTT\n\n").unwrap();
    assert_eq!(srt.replace(',', "."), body);
}

#[test]
fn test_render_srt_withOverlappingSegments_shouldNotMergeOrReorder() {
    let segments = vec![
        Segment::new(5.0, 6.0, "later"),
        Segment::new(2.0, 8.0, "earlier and overlapping"),
    ];
    let srt = render_srt(&segments);
    assert_eq!(
        srt,
        "1\n00:00:05,000 --> 00:00:06,000\nlater\n\n2\n00:00:02,000 --> 00:00:08,000\nearlier and overlapping\n\n"
    );
}

#[test]
fn test_render_srt_withMarkupInText_shouldNotEscape() {
    let segments = vec![Segment::new(0.0, 1.0, " <i>a & b</i> --> c ")];
    assert!(render_srt(&segments).contains("\n<i>a & b</i> --> c\n"));
}

#[test]
fn test_subtitle_format_render_shouldDispatchWithOptions() {
    let segments = three_segments();
    let options = RenderOptions { vtt_width: Some(80) };

    assert_eq!(SubtitleFormat::Srt.render(&segments, &options), render_srt(&segments));
    assert_eq!(SubtitleFormat::Vtt.render(&segments, &options), render_vtt(&segments, Some(80)));
    assert_eq!(SubtitleFormat::ALL, [SubtitleFormat::Srt, SubtitleFormat::Vtt]);
}
