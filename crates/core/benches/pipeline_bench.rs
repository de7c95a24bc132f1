use std::env;
use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use syllabics_core::layout::{
    GlyphBox, RecognitionParams, filter_boxes, find_lines, group_by_line, merge_dots,
    merge_grouped_dots,
};
use syllabics_core::{LabelSet, Recognizer, fix_diacritics};

const GLYPHS_PER_LINE: usize = 24;
const PAGE_SIZES: [usize; 3] = [240, 960, 3840];
const LABELS: [&str; 8] = ["ᐁ", "ᐃ", "ᐅ", "ᐊ", "ᑲ", "ᒥ", "ᓇ", "ᓯ"];

/// Seed for synthetic pages, overridable with `SYLLABICS_BENCH_SEED`.
fn page_seed() -> u64 {
    env::var("SYLLABICS_BENCH_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0x5EED)
}

/// xorshift64 jitter source for page layouts.
struct Jitter(u64);

impl Jitter {
    fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    /// Uniform in `0..span`.
    fn below(&mut self, span: u32) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 % u64::from(span)) as u32
    }
}

/// A synthetic page: rows of 40px glyphs with jitter, word gaps and dots
/// above or beside roughly one glyph in five.
fn generate_page(seed: u64, count: usize) -> Vec<GlyphBox<u32>> {
    let mut jitter = Jitter::new(seed);
    let mut boxes = Vec::with_capacity(count + count / 4);
    let mut handle = 0u32;

    for i in 0..count {
        let row = (i / GLYPHS_PER_LINE) as u32;
        let col = (i % GLYPHS_PER_LINE) as u32;
        let x = 10 + col * 46 + (col / 5) * 30 + jitter.below(4);
        let y = 20 + row * 90 + jitter.below(6);
        let (w, h) = (32 + jitter.below(12), 34 + jitter.below(12));
        boxes.push(GlyphBox::new((x, y, w, h), handle));
        handle += 1;

        let dot = match jitter.below(10) {
            0 => (x + w / 2 - 4, y.saturating_sub(12), 8, 8),
            1 => (x + w + 2, y + h / 3, 8, 8),
            _ => continue,
        };
        boxes.push(GlyphBox::new(dot, handle));
        handle += 1;
    }

    boxes
}

fn one_hot(glyph: &GlyphBox<u32>) -> Result<Vec<f32>, String> {
    let mut scores = vec![0.0; LABELS.len()];
    scores[glyph.handles()[0] as usize % LABELS.len()] = 1.0;
    Ok(scores)
}

fn bench_layout_stages(c: &mut Criterion) {
    let params = RecognitionParams::default();
    let mut group = c.benchmark_group("layout_stages");

    for n in PAGE_SIZES {
        let page = filter_boxes(&params, generate_page(page_seed() ^ n as u64, n), None);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("find_lines", n), &page, |b, page| {
            b.iter(|| black_box(find_lines(&params, page).len()))
        });

        group.bench_with_input(BenchmarkId::new("merge_dots", n), &page, |b, page| {
            b.iter(|| black_box(merge_dots(&params, page.clone()).len()))
        });

        let lines = find_lines(&params, &page);
        let grouped = group_by_line(merge_dots(&params, page.clone()), &lines);
        group.bench_with_input(
            BenchmarkId::new("merge_grouped_dots", n),
            &grouped,
            |b, grouped| {
                b.iter(|| {
                    let mut groups = grouped.clone();
                    merge_grouped_dots(&params, &mut groups);
                    black_box(groups.len())
                })
            },
        );
    }

    group.finish();
}

fn bench_recognize(c: &mut Criterion) {
    let labels = LabelSet::new(LABELS);
    let recognizer = Recognizer::new(&labels);
    let mut group = c.benchmark_group("recognize");
    group.measurement_time(Duration::from_secs(8));

    for n in &PAGE_SIZES[..2] {
        let page = generate_page(page_seed() ^ *n as u64, *n);
        group.throughput(Throughput::Elements(*n as u64));
        group.bench_with_input(BenchmarkId::new("page", n), &page, |b, page| {
            b.iter(|| {
                let text = recognizer
                    .recognize(page.clone(), &mut one_hot)
                    .unwrap_or_default();
                black_box(text.len())
            })
        });
    }

    group.finish();
}

fn bench_fix_diacritics(c: &mut Criterion) {
    let mut jitter = Jitter::new(page_seed());
    let pieces = ["ᐁ", "ᐊ", "ᐃ", "ᑲ", "ᒥ", "ᐤ", "ᐤᐤ", "ᑊᑊ", "  "];
    let text: String = (0..4096)
        .map(|_| pieces[jitter.below(pieces.len() as u32) as usize])
        .collect();

    let mut group = c.benchmark_group("fix_diacritics");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("mixed_4096", |b| {
        b.iter(|| black_box(fix_diacritics(black_box(&text)).len()))
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20).configure_from_args();
    targets = bench_layout_stages, bench_recognize, bench_fix_diacritics
}
criterion_main!(benches);
