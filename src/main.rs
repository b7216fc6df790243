use std::path::PathBuf;

use anyhow::{Context, Result};
use callout::config::CalloutConfig;
use callout::export::{Scene, export_scene};

const USAGE: &str =
    "usage: callout <scene.json> [--zoom <factor>] [--config <file>] [--out <stem>] [--save-config]";

#[derive(Debug)]
struct Args {
    scene: PathBuf,
    zoom: f32,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    /// Write the effective config back so it can be edited
    save_config: bool,
}

fn parse_args(argv: &[String]) -> Result<Args> {
    let mut scene = None;
    let mut zoom = 1.0;
    let mut config = None;
    let mut out = None;
    let mut save_config = false;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => anyhow::bail!(USAGE),
            "--zoom" => {
                let value = it.next().context(USAGE)?;
                zoom = value
                    .parse::<f32>()
                    .with_context(|| format!("Invalid zoom {value}"))?;
                if !(zoom.is_finite() && zoom > 0.0) {
                    anyhow::bail!("Zoom must be positive, got {zoom}");
                }
            }
            "--config" => config = Some(PathBuf::from(it.next().context(USAGE)?)),
            "--out" => out = Some(PathBuf::from(it.next().context(USAGE)?)),
            "--save-config" => save_config = true,
            other if scene.is_none() && !other.starts_with('-') => {
                scene = Some(PathBuf::from(other));
            }
            other => anyhow::bail!("Unexpected argument {other}\n{USAGE}"),
        }
    }

    Ok(Args {
        scene: scene.context(USAGE)?,
        zoom,
        config,
        out,
        save_config,
    })
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => CalloutConfig::load_from(path)?,
        None => CalloutConfig::load(),
    };
    if args.save_config {
        match &args.config {
            Some(path) => config.save_to(path)?,
            None => config.save(),
        }
    }
    let scene = Scene::load(&args.scene)?;

    let stem = match args.out {
        Some(stem) => stem,
        None => config
            .save_location
            .output_path("png")
            .context("No output directory available, pass --out")?,
    };

    let out = export_scene(&scene, &config, args.zoom, &stem)?;
    println!("{}", out.overlay_png.display());
    println!("{}", out.document_pdf.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let result = parse_args(&std::env::args().collect::<Vec<_>>()).and_then(run);
    if let Err(err) = result {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
