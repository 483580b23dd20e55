use super::*;

#[test]
fn gif_bounds_reject_empty_and_oversized() {
    assert!(Size::new(0, 10).check_gif_bounds().is_err());
    assert!(Size::new(10, 0).check_gif_bounds().is_err());
    assert!(Size::new(70_000, 10).check_gif_bounds().is_err());
    assert!(Size::new(65_535, 65_535).check_gif_bounds().is_ok());
}

#[test]
fn rect_fits_within_boundaries() {
    let size = Size::new(80, 240);
    assert!(Rect::new(0, 180, 80, 60).fits_within(size));
    assert!(!Rect::new(0, 181, 80, 60).fits_within(size));
    assert!(!Rect::new(1, 0, 80, 60).fits_within(size));
}

#[test]
fn progress_done_when_all_encoded() {
    assert!(!Progress { total: 3, encoded: 2 }.is_done());
    assert!(Progress { total: 3, encoded: 3 }.is_done());
}

#[test]
fn size_display_is_wxh() {
    assert_eq!(Size::new(200, 100).to_string(), "200x100");
}
