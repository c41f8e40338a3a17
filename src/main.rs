//! versify - Scripture extraction for static sites

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use versify::versification::{Structure, flatten};
use versify::{Config, extract_to_dir};

#[derive(Parser)]
#[command(name = "versify")]
#[command(version, about = "Extract scripture text from SWORD modules to JSON", long_about = None)]
#[command(after_help = "EXAMPLES:
    versify                          Extract all registered modules into ./data
    versify site/data -m KJV -m DRC  Extract two modules into site/data
    versify --list-books ethiopian   Show the Ethiopian Orthodox book list")]
struct Cli {
    /// Output directory for bibles.json and bibles_auxiliary/
    #[arg(value_name = "OUTPUT_DIR", default_value = "data")]
    output_dir: PathBuf,

    /// Retrieval tool executable
    #[arg(long, value_name = "PROGRAM", default_value = "diatheke")]
    tool: PathBuf,

    /// Argument placed before the tool's options (repeatable)
    #[arg(long = "tool-arg", value_name = "ARG", allow_hyphen_values = true)]
    tool_args: Vec<OsString>,

    /// Seconds to wait for each lookup
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Directory of <name>.yaml canon definitions overriding the bundled ones
    #[arg(long, value_name = "DIR")]
    versifications: Option<PathBuf>,

    /// Module registry (YAML) replacing the bundled one
    #[arg(long, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// Only extract this SWORD module (repeatable)
    #[arg(short, long = "module", value_name = "MODULE")]
    modules: Vec<String>,

    /// Print the flattened book list of a canon and exit
    #[arg(long, value_name = "CANON")]
    list_books: Option<String>,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log per-book progress
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            output_dir: self.output_dir.clone(),
            tool: self.tool.clone(),
            tool_args: self.tool_args.clone(),
            timeout: Duration::from_secs(self.timeout),
            versification_dir: self.versifications.clone(),
            registry_path: self.registry.clone(),
            modules: self.modules.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = cli.config();
    let result = match &cli.list_books {
        Some(canon) => list_books(&config, canon),
        None => extract_to_dir(&config).map(|_| ()).map_err(|e| e.to_string()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn list_books(config: &Config, name: &str) -> Result<(), String> {
    let canon = config
        .versifications()
        .load(name)
        .map_err(|e| e.to_string())?;

    println!("Canon: {} ({:?})", canon.name, canon.tradition);
    if let Some(parent) = &canon.extends {
        println!("Extends: {parent}");
    }

    if canon.structure == Structure::Surah {
        for surah in &canon.surahs {
            println!("{:>4}  {:<20} {:>4} ayat", surah.number, surah.name, surah.ayat);
        }
        println!("Surahs: {}", canon.surahs.len());
        return Ok(());
    }

    let books = flatten(&canon);
    for (i, book) in books.iter().enumerate() {
        println!(
            "{:>3}  {:<8} {:<28} {}  {:>3} ch",
            i + 1,
            book.id,
            book.name,
            book.testament,
            book.chapters
        );
    }
    println!("Books: {}", books.len());
    Ok(())
}
