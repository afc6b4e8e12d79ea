//! Example: place a uniform rectangular aperture over a synthetic ramp image
//! and report how it overlaps the grid.
//!
//! The aperture is given in continuous pixel-center coordinates and converted
//! to an integer bounding box. The report lists the overlap slices, whether the
//! cutout could borrow the image, and the weighted values under the aperture.
//!
//! Run from the workspace root:
//!   cargo run -p pixel-aperture --example overlap_report -- --help
//!   RUST_LOG=trace cargo run -p pixel-aperture --example overlap_report -- --xmin -2.3 --xmax 1.6

use std::ops::Range;

use anyhow::{Context, Result};
use clap::Parser;
use pixel_aperture::{ApertureMask, BoundingBox, CutoutConfig, Image, Slice2d};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Report the overlap between a rectangular aperture and an image grid")]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 8)]
    nx: usize,

    /// Image height in pixels
    #[arg(long, default_value_t = 6)]
    ny: usize,

    #[arg(long, default_value_t = 1.2, allow_negative_numbers = true)]
    xmin: f64,
    #[arg(long, default_value_t = 4.6, allow_negative_numbers = true)]
    xmax: f64,
    #[arg(long, default_value_t = 0.7, allow_negative_numbers = true)]
    ymin: f64,
    #[arg(long, default_value_t = 2.4, allow_negative_numbers = true)]
    ymax: f64,

    /// Value used for aperture pixels outside the image
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    fill: f64,

    /// Output JSON path (default: stdout)
    #[arg(long)]
    out: Option<String>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SliceDto {
    rows: (usize, usize),
    cols: (usize, usize),
}

impl From<&Slice2d> for SliceDto {
    fn from(s: &Slice2d) -> Self {
        let pair = |r: &Range<usize>| (r.start, r.end);
        Self {
            rows: pair(&s.rows),
            cols: pair(&s.cols),
        }
    }
}

#[derive(Serialize)]
struct Report {
    bbox: BoundingBox,
    center_yx: (f64, f64),
    large: Option<SliceDto>,
    small: Option<SliceDto>,
    cutout_borrowed: Option<bool>,
    weighted: Option<Vec<f64>>,
    values: Vec<f64>,
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let bbox = BoundingBox::from_float(args.xmin, args.xmax, args.ymin, args.ymax)
        .context("converting aperture extent to a bounding box")?;
    let weights = Image::new_fill(bbox.width(), bbox.height(), 1.0);
    let mask = ApertureMask::new(weights, bbox).context("building aperture mask")?;

    let data = Image::from_vec(
        args.nx,
        args.ny,
        (0..args.nx * args.ny).map(|i| i as f64).collect(),
    )
    .context("building synthetic image")?;
    let view = data.as_view();

    info!(%bbox, ny = args.ny, nx = args.nx, "placing aperture");

    let slices = mask.get_overlap_slices(args.ny, args.nx);
    let cutout = mask.cutout(&view, &CutoutConfig::new(args.fill));
    let report = Report {
        bbox,
        center_yx: bbox.center(),
        large: slices.as_ref().map(|s| SliceDto::from(&s.large)),
        small: slices.as_ref().map(|s| SliceDto::from(&s.small)),
        cutout_borrowed: cutout.as_ref().map(|c| c.is_borrowed()),
        weighted: mask
            .multiply(&view, args.fill)
            .map(|img| img.into_vec()),
        values: mask
            .get_values(&view, None)
            .context("extracting aperture values")?,
    };

    match &args.out {
        Some(path) => {
            let file =
                std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
            serde_json::to_writer_pretty(file, &report)
                .with_context(|| format!("writing JSON to {path}"))?;
            println!("report written to {path}");
        }
        None => {
            let json = serde_json::to_string_pretty(&report).context("serializing report")?;
            println!("{json}");
        }
    }
    Ok(())
}
