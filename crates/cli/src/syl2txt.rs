//! syl2txt - Reconstruct syllabics text from glyph detections
//!
//! A command line tool that reads glyph detection dumps (candidate boxes
//! with recorded classifier output) and writes the recognised text or the
//! detected line layout.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use serde::Deserialize;
use syllabics_core::layout::LineSet;
use syllabics_core::utils::HasBBox;
use syllabics_core::{
    GlyphBox, GlyphClassifier, LabelSet, Layout, RecognitionParams, RecognizerBuilder, Region,
    fix_diacritics,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Output type for a detection dump.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputType {
    /// Recognised text (default)
    #[default]
    Text,
    /// Detected lines and grouped boxes as JSON
    Layout,
}

/// A command line tool for reconstructing Canadian Aboriginal syllabics
/// text from glyph detections.
#[derive(Parser, Debug)]
#[command(name = "syl2txt")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// One or more paths to JSON detection dumps
    #[arg(required_unless_present = "fix_text")]
    files: Vec<PathBuf>,

    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Label set of the classifier, a JSON array of glyphs
    #[arg(short = 'l', long)]
    labels: Option<PathBuf>,

    /// JSON file overriding recognition parameters
    #[arg(long)]
    params: Option<PathBuf>,

    /// Only recognise boxes inside this region, given as x,y,width,height
    #[arg(long, value_parser = parse_region)]
    region: Option<Region>,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Type of output to generate
    #[arg(short = 't', long = "output-type", value_enum, default_value = "text")]
    output_type: OutputType,

    /// Correct the diacritics of TEXT and exit
    #[arg(long = "fix-text", value_name = "TEXT")]
    fix_text: Option<String>,
}

/// One detected glyph candidate with its recorded classifier output.
#[derive(Debug, Clone, Deserialize)]
struct Detection {
    id: u32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    scores: Option<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct DetectionDump {
    detections: Vec<Detection>,
}

/// Parse a region given as `x,y,width,height`.
fn parse_region(s: &str) -> std::result::Result<Region, String> {
    let parts: Vec<u32> = s
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("invalid region {s:?}: {e}"))?;

    match parts[..] {
        [x, y, width, height] => Ok(Region::new(x, y, width, height)),
        _ => Err(format!(
            "region must have four comma-separated values, got {}",
            parts.len()
        )),
    }
}

/// Replays recorded predictions for merged glyph boxes.
///
/// A merged box takes the prediction of its largest constituent detection,
/// which is the glyph body rather than an absorbed dot.
struct ReplayClassifier {
    detections: HashMap<u32, (f64, Option<Vec<f32>>)>,
}

impl ReplayClassifier {
    fn new(detections: &[Detection], labels: &LabelSet) -> Result<Self> {
        let mut recorded = HashMap::with_capacity(detections.len());
        for d in detections {
            let scores = match (&d.scores, &d.label) {
                (Some(scores), _) => Some(scores.clone()),
                (None, Some(label)) => {
                    let index = labels
                        .index_of(label)
                        .with_context(|| format!("detection {}: unknown label {label:?}", d.id))?;
                    let mut one_hot = vec![0.0; labels.len()];
                    one_hot[index] = 1.0;
                    Some(one_hot)
                }
                (None, None) => None,
            };
            let area = f64::from(d.width) * f64::from(d.height);
            if recorded.insert(d.id, (area, scores)).is_some() {
                bail!("duplicate detection id {}", d.id);
            }
        }
        Ok(Self {
            detections: recorded,
        })
    }
}

impl GlyphClassifier<u32> for ReplayClassifier {
    type Error = String;

    fn predict(&mut self, glyph: &GlyphBox<u32>) -> std::result::Result<Vec<f32>, String> {
        let largest = glyph
            .handles()
            .iter()
            .filter_map(|id| self.detections.get(id).map(|d| (id, d)))
            .max_by(|(_, a), (_, b)| a.0.total_cmp(&b.0));

        match largest {
            Some((_, (_, Some(scores)))) => Ok(scores.clone()),
            Some((id, (_, None))) => Err(format!("detection {id} has no recorded prediction")),
            None => Err(format!("no detection for box at {:?}", glyph.rect())),
        }
    }
}

/// The label set from `--labels`, or the distinct detection labels in order
/// of first appearance.
fn load_labels(path: Option<&Path>, detections: &[Detection]) -> Result<LabelSet> {
    if let Some(path) = path {
        let file = File::open(path)
            .with_context(|| format!("failed to open label set {}", path.display()))?;
        return LabelSet::from_reader(BufReader::new(file))
            .with_context(|| format!("invalid label set {}", path.display()));
    }

    if detections.iter().any(|d| d.scores.is_some()) {
        bail!("detections carry scores; pass their label set with --labels");
    }

    let mut labels: Vec<&str> = Vec::new();
    for label in detections.iter().filter_map(|d| d.label.as_deref()) {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    Ok(LabelSet::new(labels))
}

fn load_params(path: Option<&Path>) -> Result<RecognitionParams> {
    let Some(path) = path else {
        return Ok(RecognitionParams::default());
    };
    let file =
        File::open(path).with_context(|| format!("failed to open params {}", path.display()))?;
    let params: RecognitionParams = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid params {}", path.display()))?;
    params.validate()?;
    Ok(params)
}

fn load_detections(path: &Path) -> Result<Vec<Detection>> {
    let file = File::open(path).with_context(|| format!("file not found: {}", path.display()))?;
    let dump: DetectionDump = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid detection dump {}", path.display()))?;
    Ok(dump.detections)
}

/// Process a single detection dump.
fn process_file<W: Write>(
    path: &Path,
    writer: &mut W,
    args: &Args,
    params: &RecognitionParams,
) -> Result<()> {
    let detections = load_detections(path)?;
    info!(file = %path.display(), detections = detections.len(), "loaded detections");

    let labels = load_labels(args.labels.as_deref(), &detections)?;
    let recognizer = RecognizerBuilder::new(&labels)
        .params(params.clone())
        .maybe_region(args.region)
        .build()?;

    let boxes: Vec<GlyphBox<u32>> = detections
        .iter()
        .map(|d| GlyphBox::new((d.x, d.y, d.width, d.height), d.id))
        .collect();

    match args.output_type {
        OutputType::Text => {
            let mut classifier = ReplayClassifier::new(&detections, &labels)?;
            let text = recognizer.recognize(boxes, &mut classifier)?;
            debug!(chars = text.chars().count(), "recognised text");
            writeln!(writer, "{text}")?;
        }
        OutputType::Layout => {
            let layout = recognizer.layout(boxes).unwrap_or_else(|| Layout {
                lines: LineSet::default(),
                groups: Vec::new(),
            });
            serde_json::to_writer_pretty(&mut *writer, &layout)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    // Open output file or use stdout
    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    if let Some(ref text) = args.fix_text {
        writeln!(output, "{}", fix_diacritics(text))?;
        output.flush()?;
        return Ok(());
    }

    let params = load_params(args.params.as_deref())?;

    for path in &args.files {
        process_file(path, &mut output, &args, &params)
            .with_context(|| format!("error processing {}", path.display()))?;
    }

    // Ensure output is flushed
    output.flush()?;

    Ok(())
}
