use std::io::Cursor;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use image::{DynamicImage, GenericImageView, GrayImage, ImageOutputFormat, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use plant_hpi::hpi::{normalize, to_grayscale};
use plant_hpi::render::{render, RenderConfig};
use plant_hpi::{
    compute_health_index, ErrorKind, HealthCategory, HpiError, HpiWarning, Pipeline, PipelineConfig,
    ZeroDivisorPolicy,
};

fn encode(img: DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

fn gray_png(width: u32, height: u32, pixels: Vec<u8>) -> Vec<u8> {
    encode(DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, pixels).unwrap()), ImageOutputFormat::Png)
}

fn random_rgb(rng: &mut StdRng) -> DynamicImage {
    let w = rng.gen_range(1..=24);
    let h = rng.gen_range(1..=24);
    let mut img = RgbImage::new(w, h);
    for p in img.pixels_mut() {
        *p = Rgb([rng.gen(), rng.gen(), rng.gen()]);
    }
    DynamicImage::ImageRgb8(img)
}

// ---------------------------------------------------------------------------
// Concrete scenarios
// ---------------------------------------------------------------------------

#[test]
fn two_by_two_gradient_scores_fifty_and_good() {
    let report = compute_health_index(&gray_png(2, 2, vec![0, 85, 170, 255])).unwrap();
    assert_abs_diff_eq!(report.score, 50.0, epsilon = 0.01);
    assert_eq!(report.category, HealthCategory::Good);
}

#[test]
fn all_zero_three_by_three_is_poor() {
    let report = compute_health_index(&gray_png(3, 3, vec![0; 9])).unwrap();
    assert_eq!(report.score, 0.0);
    assert_eq!(report.category, HealthCategory::Poor);
    assert_eq!(report.warning, Some(HpiWarning::DegenerateInput { value: 0 }));
    assert!(!report.artifact.is_empty());
}

#[test]
fn constant_mid_gray_has_defined_score() {
    let report = compute_health_index(&gray_png(5, 4, vec![128; 20])).unwrap();
    assert!(report.score.is_finite());
    assert_eq!(report.category, HealthCategory::Poor);
}

#[test]
fn malformed_bytes_are_decode_errors() {
    for bytes in [&b""[..], b"hello world", b"\x89PNG\r\n\x1a\ntruncated"] {
        let err = compute_health_index(bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError, "input {:?}", bytes);
        assert!(matches!(err, HpiError::Decode(_)));
    }
}

#[test]
fn jpeg_input_is_accepted() {
    let mut rng = StdRng::seed_from_u64(7);
    let img = random_rgb(&mut rng);
    let (w, h) = (img.width(), img.height());
    let report = compute_health_index(&encode(img, ImageOutputFormat::Jpeg(90))).unwrap();
    assert_eq!((report.width, report.height), (w, h));
}

// ---------------------------------------------------------------------------
// Properties over random images
// ---------------------------------------------------------------------------

#[test]
fn score_and_fractions_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let img = random_rgb(&mut rng);
        let index = normalize(&to_grayscale(&img).unwrap(), ZeroDivisorPolicy::Floor);
        assert!(index.fractional.iter().all(|f| (0.0..=1.0).contains(&f)));
        assert!(index.percentage.iter().all(|p| (0.0..=100.0).contains(&p)));

        let report = compute_health_index(&encode(img, ImageOutputFormat::Png)).unwrap();
        assert!((0.0..=100.0).contains(&report.score), "score {}", report.score);
        assert_eq!(report.category, HealthCategory::from_score(report.score));
    }
}

#[test]
fn non_degenerate_index_spans_full_range() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let img = random_rgb(&mut rng);
        let index = normalize(&to_grayscale(&img).unwrap(), ZeroDivisorPolicy::Floor);
        if index.is_degenerate() {
            continue;
        }
        let (lo, hi) = index.fractional.min_max().unwrap();
        assert_eq!((lo, hi), (0.0, 1.0));
    }
}

#[test]
fn rendering_twice_is_pixel_identical() {
    let mut rng = StdRng::seed_from_u64(11);
    let img = random_rgb(&mut rng);
    let index = normalize(&to_grayscale(&img).unwrap(), ZeroDivisorPolicy::Floor);
    let cfg = RenderConfig::default();
    let a = image::load_from_memory(&render(&index.percentage, &cfg).unwrap()).unwrap().to_rgba8();
    let b = image::load_from_memory(&render(&index.percentage, &cfg).unwrap()).unwrap().to_rgba8();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Configuration and concurrency
// ---------------------------------------------------------------------------

#[test]
fn heat_map_keeps_source_height_and_transparent_background() {
    let report = compute_health_index(&gray_png(10, 40, (0..400).map(|i| (i % 256) as u8).collect())).unwrap();
    let heat = image::load_from_memory(&report.artifact).unwrap().to_rgba8();
    assert_eq!(heat.height(), 40);
    // Just right of the plot is the transparent gap before the legend.
    assert_eq!(heat.get_pixel(10, 20).0[3], 0);
    assert_eq!(heat.get_pixel(0, 0).0[3], 255);
}

#[test]
fn shared_pipeline_runs_on_many_threads() {
    let pipeline = Arc::new(Pipeline::new(PipelineConfig {
        zero_divisor: ZeroDivisorPolicy::Midpoint,
        render: RenderConfig { padding: 2, ..RenderConfig::default() },
    }));
    let inputs: Vec<Vec<u8>> = (0..8u8).map(|i| gray_png(4, 4, vec![i * 10; 16])).collect();

    let handles: Vec<_> = inputs
        .into_iter()
        .map(|bytes| {
            let p = Arc::clone(&pipeline);
            std::thread::spawn(move || p.run(&bytes).map(|r| (r.score, r.category)))
        })
        .collect();

    for h in handles {
        let (score, category) = h.join().unwrap().unwrap();
        assert_eq!(score, 50.0);
        assert_eq!(category, HealthCategory::Good);
    }
}
