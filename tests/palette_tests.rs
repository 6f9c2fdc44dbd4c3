// Host-side tests for palette extraction.
// Runs against eye-core directly; the web crate itself is wasm-only.

use eye_core::{extract_palette, extract_palette_from_bytes, Error, Palette, Rgb, RgbaImage};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Cursor;

const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);

fn rgbw() -> RgbaImage {
    RgbaImage::from_raw(
        2,
        2,
        vec![
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 0, 255, 255, //
            255, 255, 255, 255,
        ],
    )
    .expect("2x2 raster")
}

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

fn in_rgbw(c: &Rgb) -> bool {
    [RED, GREEN, BLUE, Rgb::WHITE].contains(c)
}

#[test]
fn rgbw_image_yields_four_colors_from_that_set() {
    let mut rng = StdRng::seed_from_u64(1);
    let palette = extract_palette(&rgbw(), 4, &mut rng).expect("palette");
    assert_eq!(palette.len(), 4);
    for c in palette.colors() {
        assert!(in_rgbw(c), "unexpected color {:?}", c);
    }
}

#[test]
fn decoded_png_samples_only_source_pixels() {
    let bytes = png_bytes(&rgbw());
    let mut rng = StdRng::seed_from_u64(2);
    let palette = extract_palette_from_bytes(&bytes, 12, &mut rng).expect("palette");
    assert_eq!(palette.len(), 12);
    assert!(palette.colors().iter().all(in_rgbw));
}

#[test]
fn repeated_sampling_may_pick_the_same_pixel() {
    let img = RgbaImage::from_pixel(1, 1, image::Rgba([10, 20, 30, 255]));
    let mut rng = StdRng::seed_from_u64(3);
    let palette = extract_palette(&img, 5, &mut rng).expect("palette");
    let expected = Rgb::from_u8(10, 20, 30);
    assert!(palette.colors().iter().all(|c| *c == expected));
}

#[test]
fn oversized_backing_buffer_is_never_sampled_past_the_image() {
    // 1x1 red image over a buffer that also holds a green pixel
    let img = RgbaImage::from_raw(1, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).expect("raster");
    let mut rng = StdRng::seed_from_u64(1);
    let palette = extract_palette(&img, 64, &mut rng).expect("palette");
    assert_eq!(palette.len(), 64);
    assert!(palette.colors().iter().all(|c| *c == RED));
}

#[test]
fn zero_count_still_yields_one_sample() {
    let mut rng = StdRng::seed_from_u64(4);
    let palette = extract_palette(&rgbw(), 0, &mut rng).expect("palette");
    assert_eq!(palette.len(), 1);
}

#[test]
fn empty_upload_is_a_decode_error() {
    let mut rng = StdRng::seed_from_u64(5);
    let err = extract_palette_from_bytes(&[], 4, &mut rng).unwrap_err();
    assert!(matches!(err, Error::ImageDecode(_)));
}

#[test]
fn unsupported_bytes_are_a_decode_error() {
    let mut rng = StdRng::seed_from_u64(6);
    let err = extract_palette_from_bytes(b"definitely not an image", 4, &mut rng).unwrap_err();
    assert!(matches!(err, Error::ImageDecode(_)));
}

#[test]
fn zero_sized_raster_is_rejected() {
    let mut rng = StdRng::seed_from_u64(7);
    let err = extract_palette(&RgbaImage::new(0, 0), 4, &mut rng).unwrap_err();
    assert!(matches!(err, Error::ImageDecode(_)));
}

#[test]
fn same_seed_reproduces_the_palette() {
    let a = extract_palette(&rgbw(), 8, &mut StdRng::seed_from_u64(42)).expect("a");
    let b = extract_palette(&rgbw(), 8, &mut StdRng::seed_from_u64(42)).expect("b");
    assert_eq!(a, b);
}

#[test]
fn pick_from_empty_palette_is_none() {
    let mut rng = StdRng::seed_from_u64(8);
    assert!(Palette::new(vec![]).pick(&mut rng).is_none());
}

proptest! {
    #[test]
    fn any_count_yields_exactly_that_many_normalized_samples(n in 1usize..200, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let palette = extract_palette(&rgbw(), n, &mut rng).expect("palette");
        prop_assert_eq!(palette.len(), n);
        for c in palette.colors() {
            for ch in c.to_array() {
                prop_assert!((0.0..=1.0).contains(&ch));
            }
        }
    }
}
