mod common;

use common::{GridCodec, BLACK, WHITE};
use iconmatch::lowlevel::{detect_bounding_box, SquareRegion};
use iconmatch::{
    DetectionStrategy, IconMatchError, IsolateConfig, NormalizeConfig, NormalizeMode, Normalizer,
    RasterImage, SimilarityScorer,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_raster(rng: &mut StdRng, size: u32) -> RasterImage {
    let len = (size * size * 4) as usize;
    let data = (0..len).map(|_| rng.random::<u8>()).collect();
    RasterImage::new(data, size, size).unwrap()
}

fn sparse_raster(rng: &mut StdRng, size: u32) -> RasterImage {
    let mut img = RasterImage::filled(size, size, WHITE).unwrap();
    for _ in 0..rng.random_range(0..size * 2) {
        let x = rng.random_range(0..size);
        let y = rng.random_range(0..size);
        img.put_pixel(x, y, [rng.random(), rng.random(), rng.random(), 255]);
    }
    img
}

#[test]
fn raster_rejects_invalid_dimensions() {
    let err = RasterImage::new(vec![0; 4], 1, 0).unwrap_err();
    assert_eq!(
        err,
        IconMatchError::InvalidDimensions {
            width: 1,
            height: 0
        }
    );
}

#[test]
fn score_is_reflexive() {
    let mut rng = StdRng::seed_from_u64(11);
    let scorer = SimilarityScorer::default();
    for _ in 0..8 {
        let img = random_raster(&mut rng, 28);
        let score = scorer.score(&img, &img).unwrap();
        assert_eq!(score.mismatch, 0.0);
        assert!(score.is_exact());
    }
}

#[test]
fn score_is_symmetric_and_bounded() {
    let mut rng = StdRng::seed_from_u64(42);
    let scorer = SimilarityScorer::default();
    for i in 0..16 {
        let (a, b) = if i % 2 == 0 {
            (random_raster(&mut rng, 28), random_raster(&mut rng, 28))
        } else {
            (sparse_raster(&mut rng, 28), sparse_raster(&mut rng, 28))
        };
        let ab = scorer.score(&a, &b).unwrap();
        let ba = scorer.score(&b, &a).unwrap();
        assert_eq!(ab, ba);
        assert!((0.0..=1.0).contains(&ab.mismatch));
        assert_eq!(ab.mismatch, ab.differing as f64 / (28.0 * 28.0));
    }
}

#[test]
fn single_foreground_pixel_gives_degenerate_box() {
    for (px, py) in [(0, 5), (9, 9), (4, 0), (3, 7)] {
        let mut img = RasterImage::filled(10, 10, WHITE).unwrap();
        img.put_pixel(px, py, BLACK);
        let bbox = detect_bounding_box(&img, DetectionStrategy::default());
        assert_eq!((bbox.x1, bbox.y1, bbox.x2, bbox.y2), (px, py, px, py));
        let region = SquareRegion::around(&bbox).unwrap();
        assert_eq!(region.side, 1);
    }
}

#[test]
fn uniform_image_has_invalid_box_and_still_normalizes() {
    let img = RasterImage::filled(12, 6, [80, 80, 80, 255]).unwrap();
    let bbox = detect_bounding_box(&img, DetectionStrategy::default());
    assert!(!bbox.is_valid());

    let normalizer = Normalizer::new(GridCodec, NormalizeConfig { size: 8 }).unwrap();
    let bytes = common::encode(&img);
    let isolated = normalizer
        .normalize(&bytes, NormalizeMode::Isolated(IsolateConfig::default()))
        .unwrap();
    assert_eq!(isolated, normalizer.direct(&bytes).unwrap());
    assert_eq!((isolated.width(), isolated.height()), (8, 8));
}

#[test]
fn isolation_equalizes_position_and_canvas_size() {
    let normalizer = Normalizer::new(GridCodec, NormalizeConfig { size: 6 }).unwrap();
    let mode = NormalizeMode::Isolated(IsolateConfig::default());

    let mut small = RasterImage::filled(10, 10, WHITE).unwrap();
    let mut large = RasterImage::filled(40, 24, WHITE).unwrap();
    for d in 0..3 {
        small.put_pixel(1 + d, 1, BLACK);
        small.put_pixel(1, 1 + d, BLACK);
        large.put_pixel(30 + d, 15, BLACK);
        large.put_pixel(30, 15 + d, BLACK);
    }
    let a = normalizer.normalize(&common::encode(&small), mode).unwrap();
    let b = normalizer.normalize(&common::encode(&large), mode).unwrap();
    assert_eq!(a, b);
}

#[test]
fn normalization_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(3);
    let normalizer = Normalizer::new(GridCodec, NormalizeConfig::default()).unwrap();
    let bytes = common::encode(&sparse_raster(&mut rng, 50));
    for mode in [
        NormalizeMode::Direct,
        NormalizeMode::Isolated(IsolateConfig::default()),
        NormalizeMode::Isolated(IsolateConfig {
            strategy: DetectionStrategy::GrayscaleThreshold { threshold: 220 },
            recolor: None,
        }),
    ] {
        let first = normalizer.normalize(&bytes, mode).unwrap();
        let second = normalizer.normalize(&bytes, mode).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!((first.width(), first.height()), (28, 28));
    }
}
