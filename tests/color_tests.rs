// Tests for SRM swatch lookup through an open adapter


use openbeerdata::color::FALLBACK_BACKGROUND;
use openbeerdata::{ColorPair, Rgb};
use test_helpers::TestDataset;

#[test]
fn test_pale_key_gets_black_text() {
    let dataset = TestDataset::new();
    let manager = dataset.manager();
    let mut adapter = manager.adapter();
    adapter.open().unwrap();

    let pair = adapter.resolve_color("4").unwrap();
    assert_eq!(pair.background, Rgb::new(236, 204, 84));
    assert_eq!(pair.text, Rgb::BLACK);
}

#[test]
fn test_threshold_boundary() {
    let dataset = TestDataset::new();
    let manager = dataset.manager();
    let mut adapter = manager.adapter();
    adapter.open().unwrap();

    let below = adapter.resolve_color("12.69").unwrap();
    assert_eq!(below.background, Rgb::new(190, 110, 30));
    assert_eq!(below.text, Rgb::BLACK);

    // Exactly at the threshold is dark enough for white text
    let at = adapter.resolve_color("12.7").unwrap();
    assert_eq!(at.background, Rgb::new(188, 108, 28));
    assert_eq!(at.text, Rgb::WHITE);

    let dark = adapter.resolve_color("40").unwrap();
    assert_eq!(dark.background, Rgb::new(12, 4, 2));
    assert_eq!(dark.text, Rgb::WHITE);
}

#[test]
fn test_unknown_key_falls_back() {
    let dataset = TestDataset::new();
    let manager = dataset.manager();
    let mut adapter = manager.adapter();
    adapter.open().unwrap();

    let pair = adapter.resolve_color("999.9").unwrap();
    assert_eq!(pair.background, FALLBACK_BACKGROUND);
    assert_eq!(pair.background, Rgb::new(6, 2, 1));
    assert_eq!(pair.text, Rgb::WHITE);
    assert_eq!(pair, ColorPair::fallback());
}

#[test]
fn test_malformed_key_falls_back() {
    let dataset = TestDataset::new();
    let manager = dataset.manager();
    let mut adapter = manager.adapter();
    adapter.open().unwrap();

    for key in ["", "amber", "4; DROP TABLE srm_colors", "' OR 1=1 --"] {
        assert_eq!(
            adapter.resolve_color(key).unwrap(),
            ColorPair::fallback(),
            "key {:?}",
            key
        );
    }

    // Table survived
    assert_eq!(adapter.resolve_color("4").unwrap().text, Rgb::BLACK);
}

#[test]
fn test_repeated_lookups_agree() {
    let dataset = TestDataset::new();
    let manager = dataset.manager();
    let mut adapter = manager.adapter();
    adapter.open().unwrap();

    let first = adapter.resolve_color("12.7").unwrap();
    let second = adapter.resolve_color("12.7").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_lookups_survive_session_restart() {
    let dataset = TestDataset::new();
    let manager = dataset.manager();
    let mut adapter = manager.adapter();

    adapter.open().unwrap();
    let before = adapter.resolve_color("2").unwrap();
    adapter.close();

    adapter.open().unwrap();
    let after = adapter.resolve_color("2").unwrap();
    assert_eq!(before, after);
    assert_eq!(after.background, Rgb::new(248, 248, 230));
}

#[test]
fn test_hex_of_resolved_swatch() {
    let dataset = TestDataset::new();
    let manager = dataset.manager();
    let mut adapter = manager.adapter();
    adapter.open().unwrap();

    let pair = adapter.resolve_color("40").unwrap();
    assert_eq!(pair.background.hex(), "#0c0402");
    assert_eq!(pair.text.argb(), 0xffffffff);
}
