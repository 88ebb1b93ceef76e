//! YIQ perceptual pixel difference with anti-aliasing detection.
//!
//! Colors are compared in the YIQ space using the weighted squared distance
//! from Kotsarenko & Ramos, "Measuring perceived color difference using YIQ
//! NTSC transmission color space in mobile applications" (2010). Pixels with
//! alpha below 255 are composited over white first. A differing pixel is
//! treated as anti-aliasing, and not counted, when it sits on a brightness
//! gradient between two flat regions present in both images (Vysniauskas,
//! "Anti-aliased Pixel and Intensity Slope Detector", 2009).

use crate::kernel::{DiffParams, PixelDiff};

/// Largest possible YIQ delta between two colors (black vs. white).
const MAX_YIQ_DELTA: f64 = 35215.0;

/// Scalar YIQ difference kernel.
#[derive(Clone, Copy, Debug, Default)]
pub struct YiqDiff;

impl PixelDiff for YiqDiff {
    fn count_diff(
        &self,
        a: &[u8],
        b: &[u8],
        width: u32,
        height: u32,
        params: DiffParams,
    ) -> usize {
        let width = width as usize;
        let height = height as usize;
        debug_assert_eq!(a.len(), width * height * 4);
        debug_assert_eq!(b.len(), a.len());
        if a == b {
            return 0;
        }

        let max_delta = MAX_YIQ_DELTA * params.threshold * params.threshold;
        let mut count = 0usize;
        for y in 0..height {
            for x in 0..width {
                let pos = (y * width + x) * 4;
                if a[pos..pos + 4] == b[pos..pos + 4] {
                    continue;
                }
                let delta = color_delta(a, b, pos, pos, false);
                if delta.abs() <= max_delta {
                    continue;
                }
                if !params.include_aa
                    && (antialiased(a, x, y, width, height, b)
                        || antialiased(b, x, y, width, height, a))
                {
                    continue;
                }
                count += 1;
            }
        }
        count
    }
}

fn blend(c: f64, alpha: f64) -> f64 {
    255.0 + (c - 255.0) * alpha
}

fn rgb_over_white(px: &[u8]) -> (f64, f64, f64) {
    let (r, g, b) = (f64::from(px[0]), f64::from(px[1]), f64::from(px[2]));
    if px[3] == 255 {
        return (r, g, b);
    }
    let alpha = f64::from(px[3]) / 255.0;
    (blend(r, alpha), blend(g, alpha), blend(b, alpha))
}

fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.298_895_31 + g * 0.586_622_47 + b * 0.114_482_23
}

fn rgb2i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.595_977_99 - g * 0.274_176_10 - b * 0.321_801_89
}

fn rgb2q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.211_470_17 - g * 0.522_617_11 + b * 0.311_146_94
}

/// Signed YIQ delta between pixel `k` of `img1` and pixel `m` of `img2`.
///
/// Negative when the first pixel is brighter. With `y_only` the plain
/// brightness difference is returned instead.
fn color_delta(img1: &[u8], img2: &[u8], k: usize, m: usize, y_only: bool) -> f64 {
    let p1 = &img1[k..k + 4];
    let p2 = &img2[m..m + 4];
    if p1 == p2 {
        return 0.0;
    }
    let (r1, g1, b1) = rgb_over_white(p1);
    let (r2, g2, b2) = rgb_over_white(p2);

    let y1 = rgb2y(r1, g1, b1);
    let y2 = rgb2y(r2, g2, b2);
    let y = y1 - y2;
    if y_only {
        return y;
    }
    let i = rgb2i(r1, g1, b1) - rgb2i(r2, g2, b2);
    let q = rgb2q(r1, g1, b1) - rgb2q(r2, g2, b2);
    let delta = 0.5053 * y * y + 0.299 * i * i + 0.1957 * q * q;
    if y1 > y2 {
        -delta
    } else {
        delta
    }
}

fn neighborhood(x: usize, y: usize, width: usize, height: usize) -> (usize, usize, usize, usize) {
    (
        x.saturating_sub(1),
        y.saturating_sub(1),
        (x + 1).min(width - 1),
        (y + 1).min(height - 1),
    )
}

/// Checks whether pixel `(x1, y1)` of `img` looks like anti-aliasing.
fn antialiased(img: &[u8], x1: usize, y1: usize, width: usize, height: usize, img2: &[u8]) -> bool {
    let (x0, y0, x2, y2) = neighborhood(x1, y1, width, height);
    let pos = (y1 * width + x1) * 4;
    let mut zeroes = usize::from(x1 == x0 || x1 == x2 || y1 == y0 || y1 == y2);
    let mut min = 0.0f64;
    let mut max = 0.0f64;
    let mut min_at = (0usize, 0usize);
    let mut max_at = (0usize, 0usize);

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }
            let delta = color_delta(img, img, pos, (y * width + x) * 4, true);
            if delta == 0.0 {
                zeroes += 1;
                // More than two identical siblings: not on a gradient.
                if zeroes > 2 {
                    return false;
                }
            } else if delta < min {
                min = delta;
                min_at = (x, y);
            } else if delta > max {
                max = delta;
                max_at = (x, y);
            }
        }
    }

    // Needs both a darker and a brighter neighbor.
    if min == 0.0 || max == 0.0 {
        return false;
    }

    (has_many_siblings(img, min_at, width, height)
        && has_many_siblings(img2, min_at, width, height))
        || (has_many_siblings(img, max_at, width, height)
            && has_many_siblings(img2, max_at, width, height))
}

/// True when the pixel has more than two identical neighbors.
fn has_many_siblings(img: &[u8], at: (usize, usize), width: usize, height: usize) -> bool {
    let (x1, y1) = at;
    let (x0, y0, x2, y2) = neighborhood(x1, y1, width, height);
    let pos = (y1 * width + x1) * 4;
    let mut zeroes = usize::from(x1 == x0 || x1 == x2 || y1 == y0 || y1 == y2);

    for x in x0..=x2 {
        for y in y0..=y2 {
            if x == x1 && y == y1 {
                continue;
            }
            let pos2 = (y * width + x) * 4;
            if img[pos..pos + 4] == img[pos2..pos2 + 4] {
                zeroes += 1;
            }
            if zeroes > 2 {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, px: [u8; 4]) -> Vec<u8> {
        px.iter().copied().cycle().take(width * height * 4).collect()
    }

    fn set(buf: &mut [u8], width: usize, x: usize, y: usize, px: [u8; 4]) {
        let pos = (y * width + x) * 4;
        buf[pos..pos + 4].copy_from_slice(&px);
    }

    #[test]
    fn identical_buffers_have_no_difference() {
        let a = solid(6, 6, [12, 34, 56, 255]);
        assert_eq!(YiqDiff.count_diff(&a, &a, 6, 6, DiffParams::default()), 0);
    }

    #[test]
    fn black_vs_white_differs_everywhere() {
        let a = solid(5, 4, [0, 0, 0, 255]);
        let b = solid(5, 4, [255, 255, 255, 255]);
        assert_eq!(YiqDiff.count_diff(&a, &b, 5, 4, DiffParams::default()), 20);
    }

    #[test]
    fn small_color_shift_is_tolerated() {
        let a = solid(4, 4, [200, 200, 200, 255]);
        let b = solid(4, 4, [205, 203, 200, 255]);
        assert_eq!(YiqDiff.count_diff(&a, &b, 4, 4, DiffParams::default()), 0);
        let strict = DiffParams {
            threshold: 0.0,
            include_aa: false,
        };
        assert_eq!(YiqDiff.count_diff(&a, &b, 4, 4, strict), 16);
    }

    #[test]
    fn transparent_black_matches_white() {
        let a = solid(3, 3, [0, 0, 0, 0]);
        let b = solid(3, 3, [255, 255, 255, 255]);
        assert_eq!(YiqDiff.count_diff(&a, &b, 3, 3, DiffParams::default()), 0);
    }

    #[test]
    fn isolated_dot_is_counted() {
        let a = solid(7, 7, [255, 255, 255, 255]);
        let mut b = a.clone();
        set(&mut b, 7, 3, 3, [0, 0, 0, 255]);
        assert_eq!(YiqDiff.count_diff(&a, &b, 7, 7, DiffParams::default()), 1);
        assert_eq!(YiqDiff.count_diff(&b, &a, 7, 7, DiffParams::default()), 1);
    }

    #[test]
    fn antialiased_edge_is_excluded_unless_requested() {
        // Left half black, right half white, with a gray transition column
        // in `b` only.
        let width = 8;
        let height = 8;
        let mut a = solid(width, height, [255, 255, 255, 255]);
        for y in 0..height {
            for x in 0..4 {
                set(&mut a, width, x, y, [0, 0, 0, 255]);
            }
        }
        let mut b = a.clone();
        for y in 0..height {
            set(&mut b, width, 4, y, [128, 128, 128, 255]);
        }

        let excluded = YiqDiff.count_diff(&a, &b, width as u32, height as u32, DiffParams::default());
        assert_eq!(excluded, 0);
        let included = YiqDiff.count_diff(
            &a,
            &b,
            width as u32,
            height as u32,
            DiffParams {
                threshold: 0.1,
                include_aa: true,
            },
        );
        assert_eq!(included, height);
    }
}
