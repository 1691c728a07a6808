//! caff-parser: decode a .caff or .ciff file and export it as JPEG.
//!
//! `caff-parser --caff anim.caff` writes `anim.jpg` from the first frame;
//! `caff-parser --ciff image.ciff` writes `image.jpg`. The single-dash
//! spellings `-caff` / `-ciff` are accepted too.
//! Exit status is 0 on success and 1 on any failure.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use caff::{export_caff, export_ciff, CaffContainer, CiffImage, ExportConfig};
use clap::{ArgGroup, Parser};
use tracing::{debug, error};

#[derive(Parser, Debug)]
#[command(name = "caff-parser")]
#[command(version)]
#[command(about = "Decode CAFF animations and CIFF images and export them as JPEG")]
#[command(group(ArgGroup::new("input").required(true).args(["caff", "ciff"])))]
struct Args {
    /// Decode a CAFF animation and export its first frame
    #[arg(long, value_name = "PATH")]
    caff: Option<PathBuf>,

    /// Decode a CIFF image and export it
    #[arg(long, value_name = "PATH")]
    ciff: Option<PathBuf>,

    /// Export settings (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JPEG quality, overrides the config file
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Export every CAFF frame as <stem>_<n>.jpg
    #[arg(long)]
    all_frames: bool,

    /// Print decoded metadata as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Rewrite the single-dash `-caff` / `-ciff` flags into their clap spelling.
fn legacy_flags(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-caff") => OsString::from("--caff"),
            Some("-ciff") => OsString::from("--ciff"),
            _ => arg,
        })
        .collect()
}

fn export_config(args: &Args) -> Result<ExportConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    if let Some(quality) = args.quality {
        config.quality = quality;
    }
    if args.all_frames {
        config.all_frames = true;
    }
    config.validate()?;
    debug!(?config, "export settings");
    Ok(config)
}

fn run_caff(path: &Path, config: &ExportConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let container = CaffContainer::open(path)?;
    let outputs = export_caff(&container, path, config)?;
    if json {
        let report = serde_json::json!({
            "format": "caff",
            "input": path,
            "container": container,
            "outputs": outputs,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn run_ciff(path: &Path, config: &ExportConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let image = CiffImage::open(path)?;
    let output = export_ciff(&image, path, config)?;
    if json {
        let report = serde_json::json!({
            "format": "ciff",
            "input": path,
            "image": image,
            "outputs": [output],
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = export_config(args)?;
    match (&args.caff, &args.ciff) {
        (Some(path), _) => run_caff(path, &config, args.json),
        (None, Some(path)) => run_ciff(path, &config, args.json),
        (None, None) => Err("one of --caff or --ciff is required".into()),
    }
}

fn main() -> ExitCode {
    let args = Args::parse_from(legacy_flags(std::env::args_os()));

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
