//! Aspect-ratio-correct geometry for braille output.

/// Vertical correction for braille cells.
///
/// A cell is 2 dots wide and 4 dots tall, so one character row covers
/// roughly twice the height of one character column.
pub const CELL_ASPECT_CORRECTION: f64 = 0.5;

/// Number of character rows for a source image rendered `target_width` wide.
///
/// Computed as `floor(target_width * (img_height / img_width) * 0.5)`.
/// Degenerate source dimensions give 0 rows.
///
/// # Arguments
/// * `img_width` - Width of the source image in pixels
/// * `img_height` - Height of the source image in pixels
/// * `target_width` - Width of the resized pixel buffer
///
/// # Returns
/// The number of character rows; the resized buffer is four times as tall.
///
/// # Example
/// ```
/// use braille_art::braille::character_rows;
/// // A 4:3 image at 80 columns
/// assert_eq!(character_rows(640, 480, 80), 30);
/// ```
pub fn character_rows(img_width: u32, img_height: u32, target_width: u32) -> u32 {
    if img_width == 0 || img_height == 0 || target_width == 0 {
        return 0;
    }
    let aspect = img_height as f64 / img_width as f64;
    (target_width as f64 * aspect * CELL_ASPECT_CORRECTION).floor() as u32
}

/// Pixel dimensions the source must be resized to before quantization:
/// `(target_width, character_rows * 4)`.
pub fn braille_canvas(img_width: u32, img_height: u32, target_width: u32) -> (u32, u32) {
    let rows = character_rows(img_width, img_height, target_width);
    (target_width, rows * 4)
}
