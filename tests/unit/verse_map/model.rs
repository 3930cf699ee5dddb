use super::*;
use pretty_assertions::assert_eq;

fn close(a: f64, b: f64) -> bool {
    approx_eq(a, b, PERCENT_EPSILON)
}

fn seg(line: u32, start_word: usize, end_word: usize, total: usize) -> Segment {
    Segment {
        line,
        start_word,
        end_word,
        total_words_on_line: total,
    }
}

#[test]
fn box_for_whole_line_spans_text_block() {
    let cal = Calibration::VERSE_MAP;
    let b = VerseBox::for_segment(&seg(1, 0, 5, 6), &cal);
    assert!(close(b.top, 11.5));
    assert!(close(b.height, 5.5));
    assert!(close(b.right, 7.0));
    assert!(close(b.left, 7.0));
    assert!(close(b.width, 86.0));
}

#[test]
fn shared_line_boxes_do_not_overlap() {
    // Verse A takes words 0..=2, verse B takes 3..=5 of a six-word line.
    let cal = Calibration::ODD_PAGE;
    let w = cal.word_width(6);
    let a = VerseBox::for_segment(&seg(4, 0, 2, 6), &cal);
    let b = VerseBox::for_segment(&seg(4, 3, 5, 6), &cal);

    assert!(close(a.right, cal.margin_right));
    assert!(close(a.left, cal.margin_left + 3.0 * w));
    assert!(close(b.right, cal.margin_right + 3.0 * w));
    assert!(close(b.left, cal.margin_left));
    assert!(close(a.width + b.width, cal.text_width()));
    // B ends exactly where A's left edge starts.
    assert!(close(100.0 - b.right, a.left));
}

#[test]
fn line_tops_follow_line_height() {
    let cal = Calibration::VERSE_MAP;
    let b = VerseBox::for_segment(&seg(15, 0, 0, 1), &cal);
    assert!(close(b.top, 11.5 + 14.0 * 5.5));
}

#[test]
fn entry_boxes_pair_with_segments() {
    let cal = Calibration::VERSE_MAP;
    let entry = VerseMapEntry::from_segments(2, 6, vec![seg(8, 0, 2, 6), seg(7, 4, 5, 6)], &cal);
    assert_eq!(entry.boxes.len(), 2);
    assert_eq!(entry.boxes[0].line, 8);
    assert_eq!(entry.boxes[1].line, 7);
    assert_eq!(entry.first_segment().map(|s| s.line), Some(7));
    assert!(entry.is_consistent_with(&cal));
    assert!(!entry.is_consistent_with(&Calibration::ODD_PAGE));
}

fn sample_map() -> VerseMap {
    let cal = Calibration::VERSE_MAP;
    let mut page = PageVerseMap::new();
    page.insert(
        "1:1".to_string(),
        VerseMapEntry::from_segments(1, 1, vec![seg(2, 0, 3, 4)], &cal),
    );
    let mut pages = BTreeMap::new();
    pages.insert(1, page);
    VerseMap {
        metadata: VerseMapMetadata {
            generated_at: "2026-01-01T00:00:00.000Z".to_string(),
            total_pages: 604,
            layout: cal,
        },
        pages,
    }
}

#[test]
fn artifact_json_shape() {
    let json: serde_json::Value =
        serde_json::from_str(&sample_map().to_json_pretty().unwrap()).unwrap();
    assert_eq!(json["metadata"]["generatedAt"], "2026-01-01T00:00:00.000Z");
    assert_eq!(json["metadata"]["totalPages"], 604);
    assert_eq!(json["metadata"]["layout"]["lineHeight"], 5.5);
    let entry = &json["pages"]["1"]["1:1"];
    assert_eq!(entry["surah"], 1);
    assert_eq!(entry["segments"][0]["startWord"], 0);
    assert_eq!(entry["segments"][0]["endWord"], 3);
    assert_eq!(entry["segments"][0]["totalWordsOnLine"], 4);
    assert_eq!(entry["boxes"][0]["line"], 2);
}

#[test]
fn write_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("verse-map.json");
    let map = sample_map();
    map.write_to_path(&path).unwrap();
    let back = VerseMap::from_path(&path).unwrap();
    assert_eq!(back, map);
    assert_eq!(back.entry_count(), 1);
    assert!(back.entry(1, "1:1").is_some());
    assert!(back.entry(2, "1:1").is_none());
    back.validate().unwrap();
}

#[test]
fn validate_flags_tampered_boxes() {
    let mut map = sample_map();
    let entry = map.pages.get_mut(&1).unwrap().get_mut("1:1").unwrap();
    entry.boxes[0].left += 1.0;
    let err = map.validate().unwrap_err();
    assert!(err.to_string().contains("1:1"));

    let mut map = sample_map();
    map.pages.get_mut(&1).unwrap().get_mut("1:1").unwrap().boxes.clear();
    assert!(map.validate().is_err());
}

#[test]
fn missing_file_is_layout_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = VerseMap::from_path(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, HifzError::Layout(_)));
}
