use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::framebuffer::Rgba;

/// Precomputed mapping from dest pixels to their nearest source pixel
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_y: Vec::new(),
        }
    }

    /// `flip_y` maps the bottom dest row to the top source row, for views
    /// whose y axis points up.
    pub fn nearest(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize, flip_y: bool) -> Self {
        let sx = src_w as f32 / dst_w.max(1) as f32;
        let sy = src_h as f32 / dst_h.max(1) as f32;
        let max_x = src_w.saturating_sub(1);
        let max_y = src_h.saturating_sub(1);

        let src_x = (0..dst_w)
            .map(|x| ((x as f32 * sx) as usize).min(max_x))
            .collect();
        let src_y = (0..dst_h)
            .map(|y| {
                let row = ((y as f32 * sy) as usize).min(max_y);
                if flip_y { max_y - row } else { row }
            })
            .collect();

        Self { src_x, src_y }
    }
}

/// `0xRRGGBBAA` to the surface's `0x00RRGGBB`.
#[inline]
pub fn rgba_to_xrgb(color: Rgba) -> u32 {
    color >> 8
}

/// Parallel nearest-neighbour stretch
/// Rows are processed in parallel for cache friendly writes
pub fn blit_nearest(dst: &mut [u32], dw: usize, src: &[Rgba], sw: usize, lut: &ScaleLut) {
    if dw == 0 || src.is_empty() {
        dst.fill(0);
        return;
    }
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let Some(&sy) = lut.src_y.get(y) else {
            dst_row.fill(0);
            return;
        };
        let row = &src[sy * sw..(sy + 1) * sw];
        for (x, out) in dst_row.iter_mut().enumerate() {
            *out = lut.src_x.get(x).map_or(0, |&sx| rgba_to_xrgb(row[sx]));
        }
    });
}
