use std::fs;
use std::path::PathBuf;

use clap::Parser;
use mdpdf_core::{Config, ConfigError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mdpdf", version)]
#[command(about = "Convert Markdown files to PDF")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Output PDF file (defaults to input name with .pdf extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, default_value = "mdpdf.toml")]
    config: PathBuf,

    /// Page margin in millimetres, overriding config and environment
    #[arg(long)]
    margin: Option<f64>,

    /// Print the intermediate Typst markup instead of writing a PDF
    #[arg(long)]
    typst: bool,

    /// Log progress
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = Config::load(&cli.config)?.with_env_overrides()?;
    if let Some(margin) = cli.margin {
        config.page.margin_mm = margin;
        config.validate()?;
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Read input file
    let markdown = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    if cli.typst {
        print!("{}", mdpdf_core::markdown_to_typst_with_config(&markdown, &config));
        return;
    }

    // Determine output path
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("pdf"));

    if let Err(e) = mdpdf_core::convert_to_path(&markdown, &config, &output) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!("Created {}", output.display());
}
