use super::*;
use crate::{config::options::Delay, palette::quantizer::Palette};

/// Encoder that records every write instead of producing a stream.
#[derive(Default)]
struct Recording {
    writes: Vec<(Size, FrameWriteOptions)>,
    finished: usize,
    resets: usize,
    out: Vec<u8>,
}

impl AnimationEncoder for Recording {
    fn write_frame(
        &mut self,
        indices: &[u8],
        width: u32,
        height: u32,
        opts: &FrameWriteOptions,
    ) -> GifResult<()> {
        assert_eq!(indices.len(), (width * height) as usize);
        self.writes.push((Size::new(width, height), opts.clone()));
        self.out.push(self.writes.len() as u8);
        Ok(())
    }

    fn finish(&mut self) -> GifResult<()> {
        self.finished += 1;
        Ok(())
    }

    fn bytes(&self) -> &[u8] {
        &self.out
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}

fn indexed(size: Size, color: u8) -> IndexedFrame {
    IndexedFrame {
        size,
        indices: vec![0; size.area()],
        palette: Palette::new(vec![[color, color, color, 255]]).unwrap(),
    }
}

fn frames(n: usize, size: Size) -> Vec<GifResult<IndexedFrame>> {
    (0..n).map(|i| Ok(indexed(size, i as u8))).collect()
}

#[test]
fn progress_fires_once_per_frame_in_order() {
    let canvas = Size::new(4, 3);
    let mut rec = Recording::default();
    let mut seen = Vec::new();
    {
        let mut slot = EncoderSlot::borrowed(&mut rec);
        encode_frames(
            frames(5, canvas),
            5,
            canvas,
            &FrameSettings::default(),
            &mut slot,
            &mut |p| seen.push(p),
        )
        .unwrap();
    }
    let encoded: Vec<usize> = seen.iter().map(|p| p.encoded).collect();
    assert_eq!(encoded, vec![1, 2, 3, 4, 5]);
    assert!(seen.iter().all(|p| p.total == 5));
    assert!(seen.last().unwrap().is_done());
    assert_eq!(rec.writes.len(), 5);
    assert_eq!(rec.finished, 1);
    assert_eq!(rec.resets, 0);
}

#[test]
fn borrowed_slot_keeps_caller_stream() {
    let canvas = Size::new(1, 1);
    let mut rec = Recording::default();
    let mut writes_at_callback = Vec::new();
    {
        let mut slot = EncoderSlot::borrowed(&mut rec);
        let mut count = 0usize;
        encode_frames(
            frames(3, canvas),
            3,
            canvas,
            &FrameSettings::default(),
            &mut slot,
            &mut |p| {
                count += 1;
                writes_at_callback.push((count, p.encoded));
            },
        )
        .unwrap();
        assert_eq!(slot.into_bytes(), vec![1, 2, 3]);
    }
    assert_eq!(writes_at_callback, vec![(1, 1), (2, 2), (3, 3)]);
}

#[test]
fn repeat_and_palette_reach_every_write() {
    let opts = GifOptions {
        repeat: 1,
        transparent: true,
        ..GifOptions::default()
    };
    let settings = FrameSettings::from_options(&opts);
    let canvas = Size::new(2, 2);
    let mut rec = Recording::default();
    {
        let mut slot = EncoderSlot::borrowed(&mut rec);
        encode_frames(frames(3, canvas), 3, canvas, &settings, &mut slot, &mut |_| {}).unwrap();
    }
    for (i, (size, w)) in rec.writes.iter().enumerate() {
        assert_eq!(*size, canvas);
        assert_eq!(w.repeat, -1);
        assert!(w.transparent);
        assert_eq!(w.delay, None);
        assert_eq!(
            w.palette.as_ref().unwrap().entries()[0],
            [i as u8, i as u8, i as u8, 255]
        );
    }
}

#[test]
fn per_frame_delays_resolve_by_position() {
    let opts = GifOptions {
        delay: Some(Delay::PerFrame(vec![100, 200])),
        ..GifOptions::default()
    };
    let settings = FrameSettings::from_options(&opts);
    let canvas = Size::new(1, 1);
    let mut rec = Recording::default();
    {
        let mut slot = EncoderSlot::borrowed(&mut rec);
        encode_frames(frames(3, canvas), 3, canvas, &settings, &mut slot, &mut |_| {}).unwrap();
    }
    let delays: Vec<Option<u32>> = rec.writes.iter().map(|(_, w)| w.delay).collect();
    assert_eq!(delays, vec![Some(100), Some(200), None]);
}

#[test]
fn frame_overrides_win() {
    let opts = GifOptions {
        delay: Some(Delay::Uniform(40)),
        repeat: 3,
        frame_options: FrameOverrides {
            delay: Some(70),
            repeat: Some(9),
            dispose: Some(1),
            transparent: Some(true),
            transparent_index: Some(4),
            ..FrameOverrides::default()
        },
        ..GifOptions::default()
    };
    let w = FrameSettings::from_options(&opts).write_options(0, &indexed(Size::new(1, 1), 8));
    assert_eq!(w.delay, Some(70));
    assert_eq!(w.repeat, 9);
    assert_eq!(w.dispose, Some(1));
    assert!(w.transparent);
    assert_eq!(w.transparent_index, 4);
    assert_eq!(w.palette.unwrap().entries(), &[[8, 8, 8, 255]]);
}

#[test]
fn transparent_index_follows_the_palette_unless_overridden() {
    let mut frame = indexed(Size::new(1, 1), 0);
    frame.palette = Palette::new(vec![[9, 9, 9, 255], [0, 0, 0, 0], [1, 1, 1, 0]]).unwrap();

    let settings = FrameSettings {
        transparent: true,
        ..FrameSettings::default()
    };
    assert_eq!(settings.write_options(0, &frame).transparent_index, 1);

    let pinned = FrameSettings {
        overrides: FrameOverrides {
            transparent_index: Some(2),
            ..FrameOverrides::default()
        },
        ..settings.clone()
    };
    assert_eq!(pinned.write_options(0, &frame).transparent_index, 2);

    let opaque = indexed(Size::new(1, 1), 5);
    assert_eq!(settings.write_options(0, &opaque).transparent_index, 0);
}

#[test]
fn failures_stop_the_encode() {
    let canvas = Size::new(2, 2);
    let mut rec = Recording::default();
    let mut calls = 0;
    {
        let mut slot = EncoderSlot::borrowed(&mut rec);
        let input = vec![
            Ok(indexed(canvas, 0)),
            Err(GifError::quantize("boom")),
            Ok(indexed(canvas, 2)),
        ];
        let err = encode_frames(
            input,
            3,
            canvas,
            &FrameSettings::default(),
            &mut slot,
            &mut |_| calls += 1,
        )
        .unwrap_err();
        assert!(matches!(err, GifError::Quantize(_)));
    }
    assert_eq!(calls, 1);
    assert_eq!(rec.writes.len(), 1);
    assert_eq!(rec.finished, 0);
}

#[test]
fn mismatched_frame_size_is_rejected() {
    let mut slot = EncoderSlot::owned(GifEncoder::default());
    let err = encode_frames(
        vec![Ok(indexed(Size::new(3, 3), 0))],
        1,
        Size::new(2, 2),
        &FrameSettings::default(),
        &mut slot,
        &mut |_| {},
    );
    assert!(matches!(
        err,
        Err(GifError::CanvasMismatch { index: 0, actual, canvas })
            if actual == Size::new(3, 3) && canvas == Size::new(2, 2)
    ));
}

#[test]
fn owned_slot_yields_a_gif_stream() {
    let canvas = Size::new(2, 1);
    let mut slot = EncoderSlot::owned(GifEncoder::default());
    assert!(slot.is_owned());
    encode_frames(
        frames(2, canvas),
        2,
        canvas,
        &FrameSettings::default(),
        &mut slot,
        &mut |_| {},
    )
    .unwrap();
    let bytes = slot.into_bytes();
    assert_eq!(&bytes[..6], b"GIF89a");
    assert_eq!(bytes.last(), Some(&0x3b));
}
