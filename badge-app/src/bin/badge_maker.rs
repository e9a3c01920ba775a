//! Command line badge maker.
//!
//! Crops a photo, stamps the numbered overlay and writes a PNG.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use badge_app::config::parse_identifier;
use badge_app::{BadgeJob, build_compositor, init_config, make_badge};

#[derive(Parser, Debug)]
#[command(name = "badge-maker", version)]
struct Cli {
    /// Source photo (PNG, JPEG, ...).
    #[arg(long)]
    input: PathBuf,

    /// Badge number, 1-999.
    #[arg(long, value_parser = parse_identifier)]
    number: u32,

    /// Square "facebook" badge instead of a circle.
    #[arg(long)]
    facebook: bool,

    /// Blend a tinted band beneath the number.
    #[arg(long)]
    tint: bool,

    /// Use the gradient band for this badge (implies --tint).
    #[arg(long)]
    gradient: bool,

    /// Output PNG path. Defaults to a fresh name in the output directory.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print a JSON summary instead of a human-readable line.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = init_config()?;
    let compositor = build_compositor(&config);

    let job = BadgeJob {
        input: cli.input,
        number: cli.number,
        circular: !cli.facebook,
        tinted: cli.tint || cli.gradient,
        gradient: cli.gradient,
        output: cli.output,
    };
    let summary = make_badge(&compositor, &config, &job)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Saved {}x{} badge to {}",
            summary.width,
            summary.height,
            summary.path.display()
        );
    }
    Ok(())
}
