use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use glyph2mesh::render::GlyphRasterizer;
use glyph2mesh::service::{ErrorPayload, GlyphRequest, GlyphService};
use glyph2mesh::{EarcutTriangulator, PipelineConfig, Strategy};
use rayon::prelude::*;

#[derive(Parser)]
#[command(name = "glyph2mesh", about = "Rendered glyph to extrudable runs, rectangles or meshes")]
struct Cli {
    /// Characters to reconstruct, one response per character
    chars: String,

    /// Font file (TTF or OTF)
    #[arg(short, long)]
    font: PathBuf,

    /// Reconstruction strategy: runs, greedy, or contours
    #[arg(short, long, default_value = "contours")]
    strategy: Strategy,

    /// Canvas size in pixels (clamped to the configured range)
    #[arg(short, long, allow_hyphen_values = true)]
    resolution: Option<i64>,

    /// Ink threshold on mean RGB luminance (clamped to 0-255)
    #[arg(short, long, allow_hyphen_values = true)]
    threshold: Option<i64>,

    /// RDP tolerance in pixels (contours only)
    #[arg(long)]
    epsilon: Option<f64>,

    /// JSON preset with pipeline settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print each JSON document
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(eps) = cli.epsilon {
        config.rdp_epsilon = eps;
    }
    config.validate()?;

    let rasterizer = GlyphRasterizer::from_file(&cli.font)
        .with_context(|| format!("loading font {}", cli.font.display()))?;
    let service = GlyphService::new(rasterizer, EarcutTriangulator, config);

    let requests: Vec<GlyphRequest> = cli
        .chars
        .chars()
        .map(|character| GlyphRequest {
            character,
            resolution: cli.resolution,
            threshold: cli.threshold,
            strategy: cli.strategy,
        })
        .collect();

    let dump_grids = std::env::var_os("GLYPH2MESH_DEBUG_GRID").is_some();

    // Requests are independent; each gets its own grid and geometry.
    let documents: Vec<(String, bool)> = requests
        .par_iter()
        .map(|request| {
            if dump_grids {
                dump_grid(&service, request);
            }
            match service.handle(request) {
                Ok(response) => to_json(&response, cli.pretty).map(|doc| (doc, true)),
                Err(e) => {
                    log::error!("{:?}: {}", request.character, e);
                    to_json(&ErrorPayload::from(&e), cli.pretty).map(|doc| (doc, false))
                }
            }
        })
        .collect::<Result<_, _>>()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut failed = 0;
    for (doc, ok) in &documents {
        writeln!(out, "{}", doc)?;
        if !ok {
            failed += 1;
        }
    }

    if failed > 0 {
        log::warn!("{} of {} requests failed", failed, documents.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// One file per character, so parallel requests never share a path.
fn debug_grid_path(character: char) -> PathBuf {
    PathBuf::from(format!("debug_ink_grid_{:04X}.png", character as u32))
}

fn dump_grid(
    service: &GlyphService<GlyphRasterizer, EarcutTriangulator>,
    request: &GlyphRequest,
) {
    // Failures are reported by the request itself.
    let Ok(grid) = service.ink_grid(request) else {
        return;
    };
    let path = debug_grid_path(request.character);
    match grid.to_gray_image().save(&path) {
        Ok(()) => log::debug!("saved {}", path.display()),
        Err(e) => log::warn!("could not save {}: {}", path.display(), e),
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
