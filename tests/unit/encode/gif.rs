use super::*;

fn two_colors() -> Palette {
    Palette::new(vec![[0, 0, 0, 255], [255, 255, 255, 255]]).unwrap()
}

fn opts() -> FrameWriteOptions {
    FrameWriteOptions {
        palette: Some(two_colors()),
        ..FrameWriteOptions::default()
    }
}

fn loop_count(bytes: &[u8]) -> Option<u16> {
    let pos = bytes.windows(11).position(|w| w == b"NETSCAPE2.0")?;
    let block = &bytes[pos + 11..pos + 15];
    assert_eq!(&block[..2], &[3, 1]);
    Some(u16::from_le_bytes([block[2], block[3]]))
}

fn decode(bytes: &[u8]) -> (u16, u16, Vec<gif::Frame<'static>>) {
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = opts.read_info(bytes).unwrap();
    let (w, h) = (decoder.width(), decoder.height());
    let mut frames = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        frames.push(frame.clone());
    }
    (w, h, frames)
}

#[test]
fn frames_round_trip_through_the_gif_decoder() {
    let mut enc = GifEncoder::default();
    enc.write_frame(
        &[0, 1, 1, 0],
        2,
        2,
        &FrameWriteOptions {
            delay: Some(120),
            ..opts()
        },
    )
    .unwrap();
    enc.write_frame(
        &[1, 1, 1, 1],
        2,
        2,
        &FrameWriteOptions {
            transparent: true,
            transparent_index: 1,
            ..opts()
        },
    )
    .unwrap();
    enc.finish().unwrap();
    assert_eq!(enc.frames_written(), 2);

    let bytes = enc.bytes();
    assert_eq!(&bytes[..6], b"GIF89a");
    assert_eq!(bytes.last(), Some(&0x3b));
    assert_eq!(loop_count(bytes), Some(0));

    let (w, h, frames) = decode(bytes);
    assert_eq!((w, h), (2, 2));
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].delay, 12);
    assert_eq!(frames[0].dispose, DisposalMethod::Any);
    assert_eq!(frames[0].transparent, None);
    assert_eq!(frames[0].buffer.as_ref(), &[0, 1, 1, 0]);
    assert_eq!(frames[1].delay, 0);
    assert_eq!(frames[1].dispose, DisposalMethod::Background);
    assert_eq!(frames[1].transparent, Some(1));
}

#[test]
fn repeat_values_map_to_loop_extension() {
    assert_eq!(gif_repeat(0), Some(Repeat::Infinite));
    assert_eq!(gif_repeat(REPEAT_FOREVER_SENTINEL), Some(Repeat::Infinite));
    assert_eq!(gif_repeat(3), Some(Repeat::Finite(3)));
    assert_eq!(gif_repeat(-2), None);

    for (repeat, expected) in [(0, Some(0)), (-1, Some(0)), (4, Some(4)), (-5, None)] {
        let mut enc = GifEncoder::default();
        let o = FrameWriteOptions { repeat, ..opts() };
        enc.write_frame(&[0], 1, 1, &o).unwrap();
        enc.finish().unwrap();
        assert_eq!(loop_count(enc.bytes()), expected, "repeat {repeat}");
    }
}

#[test]
fn delay_rounds_to_centiseconds() {
    assert_eq!(delay_centis(0), 0);
    assert_eq!(delay_centis(50), 5);
    assert_eq!(delay_centis(44), 4);
    assert_eq!(delay_centis(45), 5);
    assert_eq!(delay_centis(u32::MAX), u16::MAX);
}

#[test]
fn explicit_dispose_wins_over_transparency_default() {
    assert_eq!(disposal(None, false), DisposalMethod::Any);
    assert_eq!(disposal(None, true), DisposalMethod::Background);
    assert_eq!(disposal(Some(1), true), DisposalMethod::Keep);
    assert_eq!(disposal(Some(3), false), DisposalMethod::Previous);
}

#[test]
fn lifecycle_errors_are_reported() {
    let mut enc = GifEncoder::default();
    assert!(enc.finish().is_err());

    let first_false = FrameWriteOptions {
        first: Some(false),
        ..opts()
    };
    assert!(enc.write_frame(&[0], 1, 1, &first_false).is_err());

    enc.write_frame(&[0], 1, 1, &opts()).unwrap();
    let first_true = FrameWriteOptions {
        first: Some(true),
        ..opts()
    };
    assert!(enc.write_frame(&[0], 1, 1, &first_true).is_err());

    enc.finish().unwrap();
    enc.finish().unwrap();
    assert!(enc.is_finished());
    assert!(matches!(
        enc.write_frame(&[0], 1, 1, &opts()),
        Err(GifError::EncoderFinalized { frames: 1 })
    ));

    enc.reset();
    assert!(enc.bytes().is_empty());
    enc.write_frame(&[1], 1, 1, &opts()).unwrap();
    enc.finish().unwrap();
    assert_eq!(decode(enc.bytes()).2.len(), 1);
}

#[test]
fn malformed_frames_are_rejected() {
    let mut enc = GifEncoder::default();
    assert!(enc.write_frame(&[0, 0, 0], 2, 2, &opts()).is_err());
    assert!(enc.write_frame(&[2], 1, 1, &opts()).is_err());
    assert!(
        enc.write_frame(&[0], 1, 1, &FrameWriteOptions::default())
            .is_err()
    );
    assert!(enc.write_frame(&[], 0, 0, &opts()).is_err());
}
