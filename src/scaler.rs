use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed source column/row for every destination pixel
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

    pub fn matches(&self, dst_w: usize, dst_h: usize) -> bool {
        self.src_x.len() == dst_w && self.src_y.len() == dst_h
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    // Sample at destination pixel centres so the mapping is symmetric
    let axis = |dst: usize, src: usize| -> Vec<usize> {
        let s = src as f32 / dst as f32;
        (0..dst)
            .map(|d| (((d as f32 + 0.5) * s) as usize).min(src.saturating_sub(1)))
            .collect()
    };

    ScaleLut {
        src_x: axis(dst_w, src_w),
        src_y: axis(dst_h, src_h),
    }
}

/// Parallel nearest-neighbour stretch
/// Rows are processed in parallel for cache friendly writes
pub fn blit_nearest_stretch(dst: &mut [u32], dw: usize, src: &[u32], sw: usize, lut: &ScaleLut) {
    if dw == 0 {
        return;
    }
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let Some(&sy) = lut.src_y.get(y) else {
            return;
        };
        let src_row = &src[sy * sw..(sy + 1) * sw];
        for (d, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
            *d = src_row[sx];
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_copy() {
        let src: Vec<u32> = (0..12).collect();
        let lut = build_scale_lut(4, 3, 4, 3);
        let mut dst = vec![0; 12];
        blit_nearest_stretch(&mut dst, 4, &src, 4, &lut);
        assert_eq!(dst, src);
    }

    #[test]
    fn doubling_repeats_pixels() {
        let src = vec![1, 2, 3, 4];
        let lut = build_scale_lut(4, 4, 2, 2);
        assert!(lut.matches(4, 4));
        let mut dst = vec![0; 16];
        blit_nearest_stretch(&mut dst, 4, &src, 2, &lut);
        assert_eq!(
            dst,
            vec![1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]
        );
    }

    #[test]
    fn shrinking_stays_in_bounds() {
        let src: Vec<u32> = (0..800 * 600).collect();
        let lut = build_scale_lut(37, 23, 800, 600);
        let mut dst = vec![0; 37 * 23];
        blit_nearest_stretch(&mut dst, 37, &src, 800, &lut);
        assert!(dst.iter().all(|&p| (p as usize) < 800 * 600));
    }
}
