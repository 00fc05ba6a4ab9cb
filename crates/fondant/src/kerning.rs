use crate::raster::Rasterizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KerningPair {
    pub first: char,
    pub second: char,
    /// Pixels to add to `first`'s advance when `second` follows it.
    pub amount: i32,
}

/// Measure every ordered pair of `chars` and keep the ones whose combined
/// advance is not the sum of the individual advances.
///
/// This is quadratic in the number of characters, which is fine for atlas
/// sized character sets.
pub fn measure_kerning<R, F>(rasterizer: &R, chars: &[char], mut on_row: F) -> Vec<KerningPair>
where
    R: Rasterizer + ?Sized,
    F: FnMut(char),
{
    let advances: Vec<f32> = chars.iter().map(|&ch| rasterizer.advance(ch)).collect();
    let mut pairs = Vec::new();

    for (i, &first) in chars.iter().enumerate() {
        for (j, &second) in chars.iter().enumerate() {
            let combined = rasterizer.sequence_advance(first, second);
            let amount = (combined - (advances[i] + advances[j])).round() as i32;
            if amount != 0 {
                pairs.push(KerningPair {
                    first,
                    second,
                    amount,
                });
            }
        }
        on_row(first);
    }

    pairs
}
