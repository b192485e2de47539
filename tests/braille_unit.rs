//! Unit tests for the braille quantizer.
//!
//! These tests verify:
//! - Dot-to-bit mapping on concrete blocks
//! - Uniform white and black grids
//! - Edge blocks on tiny and odd-sized grids
//! - Purity, threshold monotonicity and invert equivalence (property based)

use braille_art::braille::{quantize, BrailleCell, QuantizerConfig, BRAILLE_BASE};
use braille_art::pixels::PixelGrid;
use proptest::prelude::*;

fn config(threshold: i64, invert: bool) -> QuantizerConfig {
    QuantizerConfig::new(2, threshold, invert).unwrap()
}

fn grid(width: u32, height: u32, data: Vec<u8>) -> PixelGrid {
    PixelGrid::new(width, height, data).unwrap()
}

// ==================== Concrete Blocks ====================

#[test]
fn test_left_column_black_right_white() {
    #[rustfmt::skip]
    let pixels = grid(2, 4, vec![
        0, 255,
        0, 255,
        0, 255,
        0, 255,
    ]);
    let glyphs = quantize(&pixels, &config(128, false));
    assert_eq!(glyphs.height(), 1);
    assert_eq!(glyphs.rows()[0][0].mask(), 0x47);
    assert_eq!(glyphs.to_text(), "\u{2847}");
}

#[test]
fn test_right_column_black() {
    #[rustfmt::skip]
    let pixels = grid(2, 4, vec![
        255, 0,
        255, 0,
        255, 0,
        255, 0,
    ]);
    let glyphs = quantize(&pixels, &config(128, false));
    // Dots 4, 5, 6, 8
    assert_eq!(glyphs.rows()[0][0].mask(), 0xB8);
}

#[test]
fn test_second_bit_is_row_one_of_left_column() {
    #[rustfmt::skip]
    let pixels = grid(2, 4, vec![
        255, 255,
        0,   255,
        255, 255,
        255, 255,
    ]);
    assert_eq!(quantize(&pixels, &config(128, false)).to_text(), "\u{2802}");
}

#[test]
fn test_bottom_row_uses_dots_7_and_8() {
    #[rustfmt::skip]
    let pixels = grid(2, 4, vec![
        255, 255,
        255, 255,
        255, 255,
        0,   0,
    ]);
    assert_eq!(quantize(&pixels, &config(128, false)).rows()[0][0].mask(), 0xC0);
}

// ==================== Uniform Grids ====================

#[test]
fn test_all_white_is_blank() {
    let glyphs = quantize(&PixelGrid::filled(10, 12, 255), &config(128, false));
    assert_eq!(glyphs.height(), 3);
    assert_eq!(glyphs.width(), 5);
    assert!(glyphs.cells().all(|c| c.to_char() == BRAILLE_BASE));
}

#[test]
fn test_all_black_is_full() {
    let glyphs = quantize(&PixelGrid::filled(10, 12, 0), &config(128, false));
    assert!(glyphs.cells().all(|c| c == BrailleCell::FULL));
    assert!(glyphs.to_text().chars().filter(|&c| c != '\n').all(|c| c == '\u{28FF}'));
}

#[test]
fn test_invert_flips_uniform_grids() {
    let glyphs = quantize(&PixelGrid::filled(4, 4, 255), &config(128, true));
    assert!(glyphs.cells().all(|c| c == BrailleCell::FULL));
}

#[test]
fn test_threshold_zero_never_sets_dots() {
    let glyphs = quantize(&PixelGrid::filled(4, 4, 0), &config(0, false));
    assert!(glyphs.cells().all(|c| c == BrailleCell::BLANK));
}

// ==================== Edge Blocks ====================

#[test]
fn test_single_pixel() {
    let glyphs = quantize(&grid(1, 1, vec![0]), &config(128, false));
    assert_eq!(glyphs.to_text(), "\u{2801}");
}

#[test]
fn test_single_row_wide() {
    let glyphs = quantize(&PixelGrid::filled(5, 1, 0), &config(128, false));
    // Two full-width blocks with dots 1 and 4, then one with dot 1
    let masks: Vec<u8> = glyphs.cells().map(|c| c.mask()).collect();
    assert_eq!(masks, vec![0x09, 0x09, 0x01]);
}

#[test]
fn test_zero_height_grid_is_empty() {
    let glyphs = quantize(&PixelGrid::empty(40), &config(128, false));
    assert!(glyphs.is_empty());
    assert_eq!(glyphs.to_text(), "");
}

#[test]
fn test_rows_have_uniform_length() {
    let data: Vec<u8> = (0..(7 * 9)).map(|i| (i * 37 % 256) as u8).collect();
    let glyphs = quantize(&grid(7, 9, data), &config(128, false));
    assert_eq!(glyphs.height(), 3);
    assert!(glyphs.rows().iter().all(|r| r.len() == 4));
    assert!(glyphs.to_text().lines().all(|l| l.chars().count() == 4));
}

// ==================== Properties ====================

fn arb_grid() -> impl Strategy<Value = PixelGrid> {
    (0u32..12, 0u32..14).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h) as usize)
            .prop_map(move |data| PixelGrid::new(w, h, data).unwrap())
    })
}

proptest! {
    #[test]
    fn prop_tiny_grids_never_panic(pixels in arb_grid(), threshold in 0i64..=255, invert in any::<bool>()) {
        let glyphs = quantize(&pixels, &config(threshold, invert));
        if pixels.width() > 0 && pixels.height() > 0 {
            prop_assert_eq!(glyphs.height() as u32, pixels.height().div_ceil(4));
            prop_assert_eq!(glyphs.width() as u32, pixels.width().div_ceil(2));
        } else {
            prop_assert!(glyphs.is_empty());
        }
    }

    #[test]
    fn prop_quantize_is_deterministic(pixels in arb_grid(), threshold in 0i64..=255, invert in any::<bool>()) {
        let cfg = config(threshold, invert);
        prop_assert_eq!(quantize(&pixels, &cfg), quantize(&pixels, &cfg));
    }

    #[test]
    fn prop_raising_threshold_only_adds_dots(pixels in arb_grid(), a in 0i64..=255, b in 0i64..=255) {
        let (low, high) = (a.min(b), a.max(b));
        let low = quantize(&pixels, &config(low, false));
        let high = quantize(&pixels, &config(high, false));
        for (l, h) in low.cells().zip(high.cells()) {
            prop_assert_eq!(l.mask() & !h.mask(), 0);
        }
    }

    #[test]
    fn prop_invert_matches_inverted_input(pixels in arb_grid(), threshold in 0i64..=255) {
        let inverted = quantize(&pixels, &config(threshold, true));
        let flipped = quantize(&pixels.inverted(), &config(threshold, false));
        prop_assert_eq!(inverted, flipped);
    }
}
