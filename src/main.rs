//! grimoire - TTRPG reference data to Markdown converter

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use grimoire::export::{DirectorySink, ExportConfig, MarkdownExporter};
use grimoire::{ConvertConfig, Converter};

#[derive(Parser)]
#[command(name = "grimoire")]
#[command(version, about = "Render TTRPG reference data into Markdown", long_about = None)]
#[command(after_help = "EXAMPLES:
    grimoire data/spells-phb.json -o out          Convert one file
    grimoire data/*.json -o out --source PHB      Keep only PHB records
    grimoire data/*.json -o out --config grimoire.toml -v")]
struct Cli {
    /// Corpus JSON files
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// Allowed source code (repeatable; default all)
    #[arg(short, long = "source", value_name = "CODE")]
    sources: Vec<String>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Turn reference macros into links between documents
    #[arg(long)]
    link_references: bool,

    /// Suppress the summary line
    #[arg(short, long)]
    quiet: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> grimoire::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ConvertConfig::load(path)?,
        None => ConvertConfig::default(),
    };
    if !cli.sources.is_empty() {
        config.sources = cli.sources.clone();
    }
    if cli.link_references {
        config.render.link_references = true;
    }
    let export_config = ExportConfig {
        category_pages: config.output.write_category_pages,
        ..ExportConfig::default()
    };

    let mut converter = Converter::new(config);
    let mut documents = Vec::new();
    for input in &cli.inputs {
        match converter.convert_file(input) {
            Ok(docs) => documents.extend(docs),
            // One unreadable file does not stop the batch
            Err(e) => log::warn!("Skipping {}: {e}", input.display()),
        }
    }
    let (collector, stats) = converter.finish();

    let mut sink = DirectorySink::new(&cli.output);
    let report = MarkdownExporter::with_config(export_config).export(&documents, &collector, &mut sink)?;

    if !cli.quiet {
        println!(
            "Wrote {} document(s) to {} ({} filtered, {} rejected, {} collision(s))",
            report.documents,
            cli.output.display(),
            stats.filtered,
            stats.rejected,
            stats.collisions
        );
    }
    Ok(())
}
