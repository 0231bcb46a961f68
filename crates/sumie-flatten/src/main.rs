//! Replay a recorded stroke script against a source image and write
//! the flattened image/mask PNG pair that the browser app would send
//! to the edit API.
//!
//! The stroke script is a JSON array of strokes as serialized by
//! `sumie-editor` (tool, width, stage-local points). Useful for
//! inspecting exactly what a given mask drawing produces without a
//! browser in the loop.

use std::path::PathBuf;

use clap::Parser;
use sumie_editor::{DEFAULT_PIXEL_RATIO, Dimensions, EditorSession, Stroke};

/// Replay a stroke script and flatten the image/mask pair to PNGs.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input image path (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// Stroke script path: a JSON array of strokes. Omit for an empty
    /// mask.
    #[arg(short, long)]
    strokes: Option<PathBuf>,

    /// Output path prefix; writes `<PREFIX>-image.png` and
    /// `<PREFIX>-mask.png`.
    #[arg(short, long)]
    output: PathBuf,

    /// Logical stage size as "WxH". The image is fitted and centered
    /// within it, and both outputs have exactly these dimensions.
    #[arg(long, value_name = "WxH", default_value = "960x640")]
    stage: String,

    /// Also write `<PREFIX>-full.png`: the clean image alone at the
    /// given pixel-density multiplier.
    #[arg(long)]
    full: bool,

    /// Pixel-density multiplier for `--full` output.
    #[arg(long, value_name = "RATIO", default_value_t = DEFAULT_PIXEL_RATIO)]
    pixel_ratio: f64,
}

/// Parse `--stage "WxH"` into dimensions.
fn parse_stage(s: &str) -> Result<Dimensions, String> {
    let (w_str, h_str) = s
        .split_once('x')
        .ok_or_else(|| format!("stage must be 'WxH', got: '{s}'"))?;
    let width: u32 = w_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid stage width '{w_str}': {e}"))?;
    let height: u32 = h_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid stage height '{h_str}': {e}"))?;
    if width == 0 || height == 0 {
        return Err(format!("stage dimensions must be positive, got {s}"));
    }
    Ok(Dimensions { width, height })
}

/// Feed one recorded stroke back through the session's gesture API.
///
/// The session re-seeds the first point, so a script point sequence
/// replays with one extra duplicate at the start; coincident points
/// render identically, so the output is unaffected.
fn replay_stroke(session: &mut EditorSession, stroke: &Stroke) {
    let Some(first) = stroke.points.first() else {
        return;
    };
    session.set_tool(stroke.tool);
    session.set_brush_size(stroke.width);
    session.pointer_down(*first);
    for p in &stroke.points[1..] {
        session.pointer_move(*p);
    }
    session.pointer_up();
}

/// Build an output path by appending a suffix to the prefix.
fn suffixed(prefix: &std::path::Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let stage = parse_stage(&args.stage).map_err(|e| format!("--stage: {e}"))?;

    eprintln!("Reading image from {}", args.input.display());
    let image_bytes = std::fs::read(&args.input)?;

    let mut session = EditorSession::new(stage);
    session.load_image(&image_bytes)?;

    if let Some(ref script_path) = args.strokes {
        eprintln!("Replaying strokes from {}", script_path.display());
        let script = std::fs::read_to_string(script_path)?;
        let strokes: Vec<Stroke> = serde_json::from_str(&script)?;
        eprintln!("  {} stroke(s)", strokes.len());
        for stroke in &strokes {
            replay_stroke(&mut session, stroke);
        }
    }

    eprintln!(
        "Flattening at {}x{} (stage dimensions)",
        stage.width, stage.height
    );
    let exported = session.export_for_edit()?;

    let image_path = suffixed(&args.output, "-image.png");
    let mask_path = suffixed(&args.output, "-mask.png");
    eprintln!("Saving to {}", image_path.display());
    std::fs::write(&image_path, &exported.image)?;
    eprintln!("Saving to {}", mask_path.display());
    std::fs::write(&mask_path, &exported.mask)?;

    if args.full {
        let full_path = suffixed(&args.output, "-full.png");
        eprintln!(
            "Saving to {} (pixel ratio {})",
            full_path.display(),
            args.pixel_ratio
        );
        let full = session.export_image_only(args.pixel_ratio)?;
        std::fs::write(&full_path, &full)?;
    }

    eprintln!("Done.");
    Ok(())
}
