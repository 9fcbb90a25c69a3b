//! Benchmarks for hocrpdf conversion performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic hOCR pages with a configurable word count.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hocrpdf::geometry::Resolver;
use hocrpdf::model::{ImageInfo, PageImage};
use hocrpdf::render::{OverlayOptions, OverlayRenderer};
use hocrpdf::{convert_page, parse_hocr, ConvertOptions, PdfOptions};

/// Creates a Letter-size hOCR page at 300 DPI with `word_count` words.
fn create_test_hocr(word_count: usize) -> String {
    let mut body = String::new();
    let per_line = 10;

    for line in 0..word_count.div_ceil(per_line) {
        let y0 = 100 + line as u32 * 40;
        body.push_str(&format!(
            "<span class=\"ocr_line\" title=\"bbox 100 {} 2450 {}\">",
            y0,
            y0 + 30
        ));
        for word in 0..per_line.min(word_count - line * per_line) {
            let x0 = 100 + word as u32 * 230;
            body.push_str(&format!(
                "<span class=\"ocrx_word\" title=\"bbox {} {} {} {}; x_wconf 91\">word{}</span> ",
                x0,
                y0,
                x0 + 200,
                y0 + 30,
                word
            ));
        }
        body.push_str("</span>\n");
    }

    format!(
        "<html xmlns=\"http://www.w3.org/1999/xhtml\"><body>\
         <div class=\"ocr_page\" title=\"bbox 0 0 2550 3300\">{}</div></body></html>",
        body
    )
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_hocr");

    for words in [100, 1000] {
        let text = create_test_hocr(words);
        group.bench_with_input(BenchmarkId::from_parameter(words), &text, |b, text| {
            b.iter(|| parse_hocr(black_box(text)).unwrap())
        });
    }

    group.finish();
}

fn bench_overlay(c: &mut Criterion) {
    let doc = parse_hocr(&create_test_hocr(1000)).unwrap();
    let image = ImageInfo::new(2550, 3300).with_dpi(300.0, 300.0);
    let resolver = Resolver::default();
    let renderer = OverlayRenderer::new(OverlayOptions::default()).unwrap();

    c.bench_function("resolve_and_place_1000_words", |b| {
        b.iter(|| {
            let resolution = resolver.resolve(black_box(&image), Some(&doc)).unwrap();
            renderer.place_all(&doc, &resolution.geometry)
        })
    });
}

fn bench_convert(c: &mut Criterion) {
    let doc = parse_hocr(&create_test_hocr(300)).unwrap();
    let page = PageImage::new(image::DynamicImage::new_luma8(850, 1100), None);

    let mut group = c.benchmark_group("convert_page");
    group.sample_size(20);

    for compress in [false, true] {
        let options = ConvertOptions::new()
            .with_pdf(PdfOptions::new().with_compression(compress).reproducible());
        let label = if compress { "flate" } else { "raw" };
        group.bench_with_input(BenchmarkId::from_parameter(label), &options, |b, options| {
            b.iter(|| convert_page(black_box(&page), Some(&doc), options).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_overlay, bench_convert);
criterion_main!(benches);
