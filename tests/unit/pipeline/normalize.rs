use image::{Rgba, RgbaImage};

use super::*;
use crate::foundation::core::Size;

fn page(shade: u8) -> RgbaImage {
    RgbaImage::from_pixel(80, 60, Rgba([shade, shade, shade, 255]))
}

#[test]
fn four_pages_split_at_page_offsets() {
    let shades = [10u8, 70, 130, 190];
    let source = Frame::from_pages(shades.iter().map(|&s| page(s)).collect(), None).unwrap();

    let frames = split_frames(&source).unwrap();
    assert_eq!(frames.len(), 4);
    for (frame, shade) in frames.iter().zip(shades) {
        assert_eq!(frame.size(), Size::new(80, 60));
        assert_eq!(frame.metadata().pages, None);
        let rgba = frame.image().to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0).0, [shade, shade, shade, 255]);
        assert_eq!(rgba.get_pixel(79, 59).0, [shade, shade, shade, 255]);
    }
}

#[test]
fn single_page_source_is_returned_unchanged() {
    let source = Frame::from_rgba(page(5));
    let frames = split_frames(&source).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].image().to_rgba8(), source.image().to_rgba8());
}

#[test]
fn split_all_preserves_source_order() {
    let a = Frame::from_pages(vec![page(1), page(2)], None).unwrap();
    let b = Frame::from_rgba(page(3));
    let c = Frame::from_pages(vec![page(4), page(5), page(6)], None).unwrap();

    let frames = split_all(&[a, b, c]).unwrap();
    let firsts: Vec<u8> = frames
        .iter()
        .map(|f| f.image().to_rgba8().get_pixel(0, 0).0[0])
        .collect();
    assert_eq!(firsts, vec![1, 2, 3, 4, 5, 6]);
}
