//! Pick buffer decoding for the identity pass.
//!
//! The pick buffer is an offscreen framebuffer where each pickable target is
//! rendered with a unique flat colour encoding its id. Pixel values are
//! identifiers, not colours; 0 is the background.

use glam::{IVec2, UVec2, Vec2};

use crate::error::{RenderError, RenderResult};

/// Decodes a pick color back to an index.
///
/// The color is encoded as RGB where:
/// - R contains bits 16-23
/// - G contains bits 8-15
/// - B contains bits 0-7
#[must_use]
pub fn color_to_index(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Encodes an index as a pick color.
///
/// Returns [R, G, B] where:
/// - R contains bits 16-23
/// - G contains bits 8-15
/// - B contains bits 0-7
#[must_use]
pub fn index_to_color(index: u32) -> [u8; 3] {
    [
        ((index >> 16) & 0xFF) as u8,
        ((index >> 8) & 0xFF) as u8,
        (index & 0xFF) as u8,
    ]
}

/// Largest id representable in the 24-bit encoding.
pub const MAX_PICK_ID: u32 = 0x00FF_FFFF;

/// Region of the canvas rendered by an identity pass, in framebuffer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    /// Top-left corner; may lie outside the canvas.
    pub origin: IVec2,
    pub size: UVec2,
}

impl CropRect {
    /// Square crop of edge `edge` centred on `center`.
    #[must_use]
    pub fn centered(center: Vec2, edge: u32) -> Self {
        let half = IVec2::splat(i32::try_from(edge / 2).unwrap_or(i32::MAX));
        Self {
            origin: center.floor().as_ivec2() - half,
            size: UVec2::splat(edge),
        }
    }

    /// The whole canvas.
    #[must_use]
    pub fn full(size: UVec2) -> Self {
        Self {
            origin: IVec2::ZERO,
            size,
        }
    }
}

/// Decoded ids of one identity pass, row-major with the origin top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickBuffer {
    width: u32,
    height: u32,
    ids: Vec<u32>,
}

impl PickBuffer {
    /// An all-background buffer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ids: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Wraps decoded ids.
    pub fn from_ids(width: u32, height: u32, ids: Vec<u32>) -> RenderResult<Self> {
        let expected = (width as usize) * (height as usize);
        if ids.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                actual: ids.len(),
            });
        }
        Ok(Self { width, height, ids })
    }

    /// Decodes raw RGBA8 readback bytes. Alpha is ignored.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> RenderResult<Self> {
        let pixels: &[[u8; 4]] = bytemuck::try_cast_slice(bytes)
            .map_err(|e| RenderError::Readback(e.to_string()))?;
        let ids = pixels
            .iter()
            .map(|[r, g, b, _]| color_to_index(*r, *g, *b))
            .collect();
        Self::from_ids(width, height, ids)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Id at a pixel; background outside the buffer.
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> u32 {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return 0;
        }
        let index = usize::try_from(y * i64::from(self.width) + x).unwrap_or(usize::MAX);
        self.ids.get(index).copied().unwrap_or(0)
    }

    /// Writes an id at a pixel; ignored outside the buffer.
    pub fn set(&mut self, x: i64, y: i64, id: u32) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        if let Ok(index) = usize::try_from(y * i64::from(self.width) + x) {
            if let Some(slot) = self.ids.get_mut(index) {
                *slot = id;
            }
        }
    }

    /// Encodes the buffer back to RGBA8 bytes with opaque alpha.
    #[must_use]
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let pixels: Vec<[u8; 4]> = self
            .ids
            .iter()
            .map(|id| {
                let [r, g, b] = index_to_color(*id);
                [r, g, b, 255]
            })
            .collect();
        bytemuck::cast_slice(&pixels).to_vec()
    }
}

/// Orders the ids in a pick buffer by proximity to its center pixel.
///
/// Scans concentric square rings of growing Chebyshev radius around the
/// center (ring 0 is the center pixel, ring k the border of the
/// (2k+1)x(2k+1) square). Ids first seen in an earlier ring come first;
/// ids first seen in the same ring are in ascending order. Background
/// (0) is skipped.
#[must_use]
pub fn ring_order(buffer: &PickBuffer) -> Vec<u32> {
    let cx = i64::from(buffer.width / 2);
    let cy = i64::from(buffer.height / 2);
    let max_ring = cx
        .max(cy)
        .max(i64::from(buffer.width) - 1 - cx)
        .max(i64::from(buffer.height) - 1 - cy);

    let mut seen = std::collections::HashSet::new();
    let mut ordered = Vec::new();
    for k in 0..=max_ring {
        let mut ring: Vec<u32> = Vec::new();
        for (x, y) in ring_pixels(cx, cy, k) {
            let id = buffer.get(x, y);
            if id != 0 && !seen.contains(&id) {
                ring.push(id);
            }
        }
        ring.sort_unstable();
        ring.dedup();
        seen.extend(ring.iter().copied());
        ordered.extend(ring);
    }
    ordered
}

/// Pixels on the border of the square of Chebyshev radius `k` around `(cx, cy)`.
fn ring_pixels(cx: i64, cy: i64, k: i64) -> Vec<(i64, i64)> {
    if k == 0 {
        return vec![(cx, cy)];
    }
    let mut pixels = Vec::with_capacity(usize::try_from(8 * k).unwrap_or(0));
    for x in (cx - k)..=(cx + k) {
        pixels.push((x, cy - k));
        pixels.push((x, cy + k));
    }
    for y in (cy - k + 1)..(cy + k) {
        pixels.push((cx - k, y));
        pixels.push((cx + k, y));
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_color_index_roundtrip() {
        for index in [0, 1, 255, 256, 65535, 65536, 0xFFFFFF, 12345678 & 0xFFFFFF] {
            let color = index_to_color(index);
            let decoded = color_to_index(color[0], color[1], color[2]);
            assert_eq!(decoded, index & 0xFFFFFF, "Roundtrip failed for index {index}");
        }
    }

    #[test]
    fn test_specific_colors() {
        assert_eq!(index_to_color(0), [0, 0, 0]);
        assert_eq!(index_to_color(1), [0, 0, 1]);
        assert_eq!(index_to_color(256), [0, 1, 0]);
        assert_eq!(index_to_color(0xFF0000), [255, 0, 0]);
    }

    #[test]
    fn test_empty_buffer_has_no_hits() {
        assert!(ring_order(&PickBuffer::new(20, 20)).is_empty());
    }

    #[test]
    fn test_closer_ring_wins() {
        let mut buffer = PickBuffer::new(9, 9);
        buffer.set(0, 0, 7);
        buffer.set(5, 4, 3);
        buffer.set(4, 6, 9);
        assert_eq!(ring_order(&buffer), vec![3, 9, 7]);
    }

    #[test]
    fn test_same_ring_is_ascending() {
        let mut buffer = PickBuffer::new(5, 5);
        buffer.set(3, 3, 12);
        buffer.set(1, 1, 4);
        buffer.set(2, 2, 12);
        assert_eq!(ring_order(&buffer), vec![12, 4]);
    }

    #[test]
    fn test_rgba_bytes_roundtrip() {
        let mut buffer = PickBuffer::new(3, 2);
        buffer.set(2, 1, 0x01_0203);
        let decoded = PickBuffer::from_rgba_bytes(3, 2, &buffer.to_rgba_bytes()).unwrap();
        assert_eq!(decoded, buffer);
        assert!(PickBuffer::from_rgba_bytes(3, 2, &[0; 8]).is_err());
    }

    #[test]
    fn test_crop_centered() {
        let crop = CropRect::centered(Vec2::new(100.4, 50.0), 20);
        assert_eq!(crop.origin, IVec2::new(90, 40));
        assert_eq!(crop.size, UVec2::splat(20));
    }

    proptest! {
        #[test]
        fn ring_order_lists_each_id_once(
            w in 1u32..16,
            h in 1u32..16,
            hits in proptest::collection::vec((0i64..16, 0i64..16, 1u32..6), 0..30),
        ) {
            let mut buffer = PickBuffer::new(w, h);
            for (x, y, id) in &hits {
                buffer.set(*x, *y, *id);
            }
            let order = ring_order(&buffer);

            let mut expected: Vec<u32> = (0..i64::from(h))
                .flat_map(|y| (0..i64::from(w)).map(move |x| (x, y)))
                .map(|(x, y)| buffer.get(x, y))
                .filter(|id| *id != 0)
                .collect();
            expected.sort_unstable();
            expected.dedup();

            let mut sorted = order.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, expected);

            // Chebyshev distance of each id's nearest pixel never decreases.
            let (cx, cy) = (i64::from(w / 2), i64::from(h / 2));
            let nearest = |id: u32| {
                (0..i64::from(h))
                    .flat_map(|y| (0..i64::from(w)).map(move |x| (x, y)))
                    .filter(|(x, y)| buffer.get(*x, *y) == id)
                    .map(|(x, y)| (x - cx).abs().max((y - cy).abs()))
                    .min()
                    .unwrap()
            };
            let distances: Vec<i64> = order.iter().map(|id| nearest(*id)).collect();
            prop_assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
