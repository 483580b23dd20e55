use image::RgbaImage;

use super::*;

fn still(w: u32, h: u32) -> Frame {
    Frame::from_rgba(RgbaImage::new(w, h))
}

#[test]
fn largest_takes_per_axis_max() {
    let sources = [still(100, 100), still(200, 50)];
    let size = resolve_canvas(&sources, None, None, ResizeTo::Largest).unwrap();
    assert_eq!(size, Size::new(200, 100));
}

#[test]
fn smallest_takes_per_axis_min() {
    let sources = [still(100, 100), still(200, 50)];
    let size = resolve_canvas(&sources, None, None, ResizeTo::Smallest).unwrap();
    assert_eq!(size, Size::new(100, 50));
}

#[test]
fn explicit_axes_override_their_own_reduction() {
    let sources = [still(100, 100), still(200, 50)];
    assert_eq!(
        resolve_canvas(&sources, Some(64), None, ResizeTo::Largest).unwrap(),
        Size::new(64, 100)
    );
    assert_eq!(
        resolve_canvas(&sources, None, Some(10), ResizeTo::Smallest).unwrap(),
        Size::new(100, 10)
    );
    assert_eq!(
        resolve_canvas(&[], Some(7), Some(9), ResizeTo::Largest).unwrap(),
        Size::new(7, 9)
    );
}

#[test]
fn multi_page_sources_use_page_height() {
    let pages = vec![RgbaImage::new(80, 60); 4];
    let animated = Frame::from_pages(pages, None).unwrap();
    let size = resolve_canvas(&[animated, still(50, 50)], None, None, ResizeTo::Largest).unwrap();
    assert_eq!(size, Size::new(80, 60));
}

#[test]
fn bounds_hold_for_every_input() {
    let sizes = [
        Size::new(13, 200),
        Size::new(640, 1),
        Size::new(99, 99),
        Size::new(1, 480),
    ];
    let largest = resolve_canvas_from_sizes(&sizes, None, None, ResizeTo::Largest).unwrap();
    let smallest = resolve_canvas_from_sizes(&sizes, None, None, ResizeTo::Smallest).unwrap();
    for s in sizes {
        assert!(largest.width >= s.width && largest.height >= s.height);
        assert!(smallest.width <= s.width && smallest.height <= s.height);
    }
}

#[test]
fn empty_sources_without_dimensions_fail() {
    assert!(resolve_canvas(&[], None, None, ResizeTo::Largest).is_err());
    assert!(resolve_canvas(&[], Some(10), None, ResizeTo::Largest).is_err());
}
