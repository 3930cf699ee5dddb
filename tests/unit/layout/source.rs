use super::*;
use crate::testing::three_verse_page;

#[test]
fn file_names_are_zero_padded() {
    assert_eq!(layout_file_name(1), "page-001.json");
    assert_eq!(layout_file_name(42), "page-042.json");
    assert_eq!(layout_file_name(604), "page-604.json");
}

#[test]
fn dir_source_reads_documents() {
    let dir = tempfile::tempdir().unwrap();
    let layout = three_verse_page();
    std::fs::write(
        dir.path().join("page-003.json"),
        serde_json::to_string(&layout).unwrap(),
    )
    .unwrap();

    let src = DirLayoutSource::new(dir.path());
    assert_eq!(src.load_page(3).unwrap(), layout);

    let err = src.load_page(4).unwrap_err();
    assert!(matches!(err, HifzError::Layout(_)));
}

#[test]
fn dir_source_surfaces_bad_json() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("page-005.json"), "{ not json").unwrap();
    let err = DirLayoutSource::new(dir.path()).load_page(5).unwrap_err();
    assert!(matches!(err, HifzError::Serde(_)));
}

#[test]
fn memory_source_keys_by_page_number() {
    let src: MemoryLayoutSource = [three_verse_page()].into_iter().collect();
    assert_eq!(src.load_page(3).unwrap().page, 3);
    assert!(src.load_page(1).is_err());
}
