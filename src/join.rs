//! Row-keyed pairing of two glyph samplings into one 3D point set.
//!
//! Every front sample keeps its X/Y. Its Z is the X of a back sample on the
//! same pixel row. Rows rarely hold the same number of samples on both
//! glyphs, so the shorter row is stretched by cycling its own samples until
//! both rows line up index for index.
//!
//! ```text
//! front row y=10:  x = 0  5  10 15 20
//! back  row y=10:  x = 0  5
//! back stretched:  x = 0  5  0  5  0
//! joined:          (0,10,0) (5,10,5) (10,10,0) (15,10,5) (20,10,0)
//! ```
//!
//! Rows that exist only on the front glyph produce nothing.

use std::collections::HashMap;

use glam::Vec3;

use crate::raster::Sample2D;

/// A front sample paired with a same-row back sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoinedPoint {
    pub x: f32,
    pub y: f32,
    /// X coordinate of the paired back sample.
    pub z: f32,
}

impl JoinedPoint {
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Samples of one glyph grouped by row, rows kept in first-seen order.
struct Rows<'a> {
    order: Vec<i32>,
    rows: HashMap<i32, Vec<&'a Sample2D>>,
}

impl<'a> Rows<'a> {
    fn index(samples: &'a [Sample2D]) -> Self {
        let mut order = Vec::new();
        let mut rows: HashMap<i32, Vec<&Sample2D>> = HashMap::new();
        for s in samples {
            rows.entry(s.y)
                .or_insert_with(|| {
                    order.push(s.y);
                    Vec::new()
                })
                .push(s);
        }
        Self { order, rows }
    }

    fn get(&self, y: i32) -> &[&'a Sample2D] {
        self.rows.get(&y).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Extend `row` to `len` elements by cycling through its original elements.
///
/// Returns `row` unchanged when it is already at least `len` long.
pub fn upsample<T: Clone>(row: &[T], len: usize) -> Vec<T> {
    if row.is_empty() || row.len() >= len {
        return row.to_vec();
    }
    row.iter().cycle().take(len).cloned().collect()
}

/// Join front samples `front` with back samples `back`.
///
/// For each row of `front` (in first-seen order) with at least one
/// matching row in `back`, the shorter of the two rows is up-sampled to the
/// longer one's length and the pairs are emitted in index order. A tie
/// leaves both rows as they are.
pub fn join(front: &[Sample2D], back: &[Sample2D]) -> Vec<JoinedPoint> {
    let front_rows = Rows::index(front);
    let back_rows = Rows::index(back);

    let mut joined = Vec::with_capacity(front.len());
    for &y in &front_rows.order {
        let row_a = front_rows.get(y);
        let row_b = back_rows.get(y);
        if row_b.is_empty() {
            continue;
        }

        let len = row_a.len().max(row_b.len());
        let row_a = upsample(row_a, len);
        let row_b = upsample(row_b, len);

        joined.extend(row_a.iter().zip(&row_b).map(|(a, b)| JoinedPoint {
            x: a.x as f32,
            y: a.y as f32,
            z: b.x as f32,
        }));
    }
    joined
}
