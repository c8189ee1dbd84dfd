//! Leafnote replay tool
//!
//! Drives an [`Annotator`] from a JSON event script, persists the resulting
//! pages, and writes one SVG overlay per page.

pub mod script;

use anyhow::{Context, Result};
use clap::Parser;
use leafnote_core::catalog::BuiltinStickers;
use leafnote_core::config::SurfaceConfig;
use leafnote_core::session::Annotator;
use leafnote_core::store::{FileBackend, NoticeLevel};
use leafnote_render::{RenderContext, Renderer, SceneBuilder, SvgWriter};
use script::ReplayScript;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "leafnote-replay")]
#[command(about = "Replay an annotation event script and write SVG overlays")]
pub struct Cli {
    /// Event script (JSON).
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,
    /// Output directory for overlays and saved annotations.
    #[arg(long, default_value = "leafnote-out")]
    out: PathBuf,
    /// Surface config overrides (JSON).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    let config = match &cli.config {
        Some(path) => SurfaceConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SurfaceConfig::default(),
    };
    let json = fs::read_to_string(&cli.script)
        .with_context(|| format!("failed to read script {}", cli.script.display()))?;
    let script = ReplayScript::from_json(&json)?;

    let mut annotator = script.replay(config)?;
    log::info!(
        "replayed {} events, {} annotations",
        script.events.len(),
        annotator.store().len()
    );

    for path in write_outputs(&script, &mut annotator, &cli.out)? {
        println!("{}", path.display());
    }
    Ok(())
}

/// Persist every page and write `page-<n>.svg` for each declared page.
pub fn write_outputs(
    script: &ReplayScript,
    annotator: &mut Annotator,
    out: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;

    let backend = FileBackend::new(out.join("annotations"))?;
    let report = pollster::block_on(annotator.flush(&backend));
    log::info!("saved {} pages, {} failed", report.saved, report.failed);
    for notice in annotator.take_notices() {
        match notice.level {
            NoticeLevel::Info => log::info!("{}", notice.message),
            NoticeLevel::Error => log::warn!("{}", notice.message),
        }
    }
    if report.failed > 0 {
        anyhow::bail!("{} pages could not be saved", report.failed);
    }

    let catalog = BuiltinStickers::new();
    let builder = SceneBuilder::new();
    let mut writer = SvgWriter::new();
    let current = annotator.current_page();
    let mut written = Vec::with_capacity(script.pages.len());

    for page in &script.pages {
        let ctx = if page.page_number == current {
            RenderContext::for_session(annotator, &catalog)
        } else {
            RenderContext::new(
                *page,
                annotator.store().annotations(page.page_number),
                &catalog,
                annotator.surface().config(),
            )
        };
        let scene = builder.build(&ctx)?;
        let svg = writer.render(&scene)?;
        let path = out.join(format!("page-{}.svg", page.page_number));
        fs::write(&path, svg).with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
