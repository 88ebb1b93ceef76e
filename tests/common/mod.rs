//! Shared fixtures: an in-memory codec and raster builders.
#![allow(dead_code)]

use iconmatch::{IconMatchError, IconMatchResult, RasterCodec, RasterImage};

pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Codec whose encoding is `[width: u16 le, height: u16 le, rgba...]`,
/// resizing with nearest-neighbour sampling.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridCodec;

impl RasterCodec for GridCodec {
    fn decode(&self, bytes: &[u8]) -> IconMatchResult<RasterImage> {
        if bytes.len() < 4 {
            return Err(IconMatchError::Decode {
                reason: "truncated header".to_string(),
            });
        }
        let width = u32::from(u16::from_le_bytes([bytes[0], bytes[1]]));
        let height = u32::from(u16::from_le_bytes([bytes[2], bytes[3]]));
        RasterImage::new(bytes[4..].to_vec(), width, height).map_err(|err| {
            IconMatchError::Decode {
                reason: err.to_string(),
            }
        })
    }

    fn resize(&self, src: &RasterImage, width: u32, height: u32) -> IconMatchResult<RasterImage> {
        let mut out = RasterImage::filled(width, height, WHITE)?;
        for y in 0..height {
            for x in 0..width {
                let sx = x * src.width() / width;
                let sy = y * src.height() / height;
                if let Some(px) = src.pixel(sx, sy) {
                    out.put_pixel(x, y, px);
                }
            }
        }
        Ok(out)
    }
}

/// Encodes a raster in the `GridCodec` format.
pub fn encode(img: &RasterImage) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + img.as_bytes().len());
    out.extend_from_slice(&(img.width() as u16).to_le_bytes());
    out.extend_from_slice(&(img.height() as u16).to_le_bytes());
    out.extend_from_slice(img.as_bytes());
    out
}

/// White `size x size` raster with the first `dots` pixels (row-major)
/// painted black.
pub fn dotted(size: u32, dots: u32) -> RasterImage {
    let mut img = RasterImage::filled(size, size, WHITE).unwrap();
    for i in 0..dots.min(size * size) {
        img.put_pixel(i % size, i / size, BLACK);
    }
    img
}

/// Mismatches in insertion order of the returned ids.
pub fn mismatches(results: &[iconmatch::MatchResult]) -> Vec<f64> {
    results.iter().map(|r| r.mismatch).collect()
}

pub fn ids(results: &[iconmatch::MatchResult]) -> Vec<&str> {
    results.iter().map(|r| r.id.as_str()).collect()
}
