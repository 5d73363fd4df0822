use anyhow::{Context, Result};
use canvastex::{CanvasConfig, CanvasTextureOptions, SnapshotHost};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::patterns::renderer_for;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(args: Cli) -> Result<()> {
    let config = resolve_config(&args)?;
    tracing::debug!(?config, pattern = ?args.pattern, "resolved canvas configuration");

    let mut options =
        CanvasTextureOptions::from_config(&config).renderer(renderer_for(args.pattern, args.cell));
    if config.visible {
        match args.snapshot_dir.as_ref() {
            Some(dir) => options = options.host(SnapshotHost::new(dir)),
            None => tracing::info!("--visible without --snapshot-dir; nothing will be mirrored"),
        }
    }

    let mut handle = canvastex::create(options)
        .with_context(|| format!("failed to create canvas texture '{}'", config.label))?;
    for _ in 0..args.updates {
        handle.update().context("canvas update failed")?;
    }
    tracing::info!(
        label = %config.label,
        width = config.width,
        height = config.height,
        renders = handle.render_count(),
        "rendered canvas texture"
    );

    if args.gpu {
        let (device, queue) = canvastex::gpu::request_headless_device()
            .context("--gpu requested but no adapter could be opened")?;
        let uploaded = handle
            .upload(&device, &queue)
            .context("failed to upload canvas texture")?;
        tracing::info!(
            uploaded,
            version = handle.texture().version(),
            "pushed canvas texture to the GPU"
        );
    }

    handle
        .surface()
        .save_png(&args.output)
        .with_context(|| format!("failed to export {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), "exported canvas surface");

    handle.dispose().context("failed to release canvas texture")
}

fn resolve_config(args: &Cli) -> Result<CanvasConfig> {
    let mut config = match args.config.as_ref() {
        Some(path) => CanvasConfig::from_path(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => CanvasConfig::default(),
    };

    if let Some((width, height)) = args.size {
        config.width = width;
        config.height = height;
    }
    if args.visible {
        config.visible = true;
    }
    if let Some(label) = args.label.as_ref() {
        config.label = label.clone();
    }

    config.validate()?;
    Ok(config)
}
