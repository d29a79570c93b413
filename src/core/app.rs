//! Command line driver: replays a scripted session against a pre-rendered page

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use crate::capture::FileRasterizer;
use crate::config::PageClipConfig;
use crate::core::host::LogHost;
use crate::domain::{Point, Size};
use crate::screenshot::export::ExportResult;
use crate::screenshot::toolbar::{HeadlessToolbar, ToolbarSize};
use crate::screenshot::{DisplayMetrics, Session};
use crate::session::messages::{Msg, SessionEvent};

#[derive(Parser, Debug)]
#[command(name = "pageclip", about = "Select, annotate and export a region of a page snapshot")]
pub struct Args {
    /// Page snapshot in device pixels (PNG, JPEG, ...)
    pub snapshot: PathBuf,

    /// JSON array of session messages to replay
    #[arg(long)]
    pub script: PathBuf,

    /// Directory for exported images; defaults to the pictures directory
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Device pixels per viewport pixel
    #[arg(long, default_value_t = 1.0)]
    pub ratio: f32,

    #[arg(long, default_value_t = 0.0)]
    pub scroll_x: f32,

    #[arg(long, default_value_t = 0.0)]
    pub scroll_y: f32,

    /// Config file; defaults to the user config directory
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Extents reported by the headless toolbar
const TOOLBAR_SIZE: ToolbarSize = ToolbarSize {
    width: 320.0,
    toolbar_height: 40.0,
    option_panel_height: 36.0,
};

pub async fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => PageClipConfig::load_from(path)?,
        None => PageClipConfig::load(),
    };

    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let messages: Vec<Msg> = serde_json::from_str(&script)
        .with_context(|| format!("Invalid script {}", args.script.display()))?;

    let ratio = if args.ratio > 0.0 { args.ratio } else { 1.0 };
    let (width, height) = image::image_dimensions(&args.snapshot)
        .with_context(|| format!("Failed to read {}", args.snapshot.display()))?;
    let viewport = Size::new(width as f32 / ratio, height as f32 / ratio);
    let metrics = DisplayMetrics {
        pixel_ratio: ratio,
        scroll: Point::new(args.scroll_x, args.scroll_y),
        ..DisplayMetrics::new(viewport)
    };

    let out_dir = args.out.clone().or_else(default_out_dir).unwrap_or_else(|| PathBuf::from("."));
    let save_file = config.save_file();
    let rasterizer = FileRasterizer::new(&args.snapshot);
    let (mut session, handle) = Session::begin(
        config,
        metrics,
        &rasterizer,
        HeadlessToolbar::new(TOOLBAR_SIZE),
        LogHost::default(),
    )
    .await?;

    for (index, msg) in messages.into_iter().enumerate() {
        session
            .handle(msg)
            .await
            .with_context(|| format!("Script message {index} failed"))?;

        for event in handle.events.try_iter() {
            match event {
                SessionEvent::Saved { file_name, result } => {
                    let name = chrono::Local::now()
                        .format("%Y-%m-%d_%H-%M-%S_")
                        .to_string();
                    write_export(&out_dir.join(name + &file_name), &result)?;
                }
                SessionEvent::Finished { confirmed } => {
                    log::info!("Session finished (confirmed: {confirmed})");
                }
                other => log::debug!("{other:?}"),
            }
        }
    }

    if session.is_active() {
        log::warn!("Script ended without confirm or cancel; cancelling");
        session.end();
    }

    match handle.outcome.await? {
        Some(result) => write_export(&out_dir.join(save_file), &result)?,
        None => log::info!("Nothing exported"),
    }
    Ok(())
}

fn default_out_dir() -> Option<PathBuf> {
    dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
}

fn write_export(path: &Path, result: &ExportResult) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &result.blob.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}
