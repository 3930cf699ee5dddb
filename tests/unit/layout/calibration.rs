use super::*;
use crate::foundation::math::{PERCENT_EPSILON, approx_eq};

#[test]
fn builtin_calibrations_are_valid() {
    Calibration::ODD_PAGE.validate().unwrap();
    Calibration::EVEN_PAGE.validate().unwrap();
    Calibration::VERSE_MAP.validate().unwrap();
}

#[test]
fn even_page_is_shifted_from_odd_page() {
    let odd = Calibration::ODD_PAGE;
    let even = Calibration::EVEN_PAGE;
    assert!(approx_eq(even.margin_top, 11.7, PERCENT_EPSILON));
    assert!(approx_eq(even.margin_left, 16.62, PERCENT_EPSILON));
    assert!(approx_eq(even.margin_right, 11.62, PERCENT_EPSILON));
    assert!(approx_eq(even.text_width(), odd.text_width(), PERCENT_EPSILON));
}

#[test]
fn for_page_picks_by_parity() {
    assert_eq!(Calibration::for_page(1), Calibration::ODD_PAGE);
    assert_eq!(Calibration::for_page(2), Calibration::EVEN_PAGE);
    assert_eq!(Calibration::for_page(603), Calibration::ODD_PAGE);
}

#[test]
fn line_and_word_metrics() {
    let c = Calibration::VERSE_MAP;
    assert!(approx_eq(c.line_top(1), 11.5, PERCENT_EPSILON));
    assert!(approx_eq(c.line_top(8), 11.5 + 7.0 * 5.5, PERCENT_EPSILON));
    assert!(approx_eq(c.text_width(), 86.0, PERCENT_EPSILON));
    assert!(approx_eq(c.word_width(4), 21.5, PERCENT_EPSILON));
    assert_eq!(c.word_width(0), 0.0);
}

#[test]
fn validate_rejects_degenerate_values() {
    let mut c = Calibration::VERSE_MAP;
    c.lines_per_page = 0;
    assert!(c.validate().is_err());

    let mut c = Calibration::VERSE_MAP;
    c.margin_left = 60.0;
    c.margin_right = 45.0;
    assert!(c.validate().is_err());

    let mut c = Calibration::VERSE_MAP;
    c.line_height = f64::NAN;
    assert!(c.validate().is_err());
}

#[test]
fn serde_uses_camel_case() {
    let json = serde_json::to_value(Calibration::VERSE_MAP).unwrap();
    assert_eq!(json["marginTop"], 11.5);
    assert_eq!(json["linesPerPage"], 15);
    let back: Calibration = serde_json::from_value(json).unwrap();
    assert_eq!(back, Calibration::VERSE_MAP);
}

#[test]
fn from_path_loads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let ok = dir.path().join("cal.json");
    std::fs::write(
        &ok,
        serde_json::to_string(&Calibration::ODD_PAGE).unwrap(),
    )
    .unwrap();
    assert_eq!(Calibration::from_path(&ok).unwrap(), Calibration::ODD_PAGE);

    let bad = dir.path().join("bad.json");
    let mut c = Calibration::ODD_PAGE;
    c.line_height = 0.0;
    std::fs::write(&bad, serde_json::to_string(&c).unwrap()).unwrap();
    assert!(Calibration::from_path(&bad).is_err());
}
