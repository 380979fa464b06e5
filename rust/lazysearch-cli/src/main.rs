use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use lazysearch_cli::{decode, Config, Lattice};

#[derive(Parser, Debug)]
#[command(
    name = "lazysearch",
    version,
    about = "Print the k cheapest paths through a JSON lattice"
)]
struct Args {
    /// Lattice definition (JSON)
    #[arg(long = "lattice", value_name = "PATH")]
    lattice: PathBuf,

    /// Number of paths to print
    #[arg(short = 'k', value_name = "N", default_value_t = 1)]
    k: usize,

    /// Search options file (JSON)
    #[arg(long = "options", value_name = "PATH")]
    options: Option<PathBuf>,

    /// Stop after this many node expansions
    #[arg(long = "max-expansions", value_name = "N")]
    max_expansions: Option<u64>,

    /// Print results as a JSON array
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long = "json-logs")]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let logs = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if args.json_logs {
        logs.json().init();
    } else {
        logs.init();
    }

    let mut cfg = Config::load(args.options.as_deref())?;
    if let Some(n) = args.max_expansions {
        cfg.options.max_expansions = Some(n);
    }
    cfg.options.validate()?;

    let lattice = Lattice::from_path(&args.lattice)
        .with_context(|| format!("loading lattice {}", args.lattice.display()))?;
    info!(
        core_version = %lazysearch_core::version(),
        states = lattice.len(),
        k = args.k,
        "decoding"
    );

    let paths = decode(&Rc::new(lattice), args.k, cfg.options);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        for p in &paths {
            println!("{}", p.render());
        }
    }
    Ok(())
}
