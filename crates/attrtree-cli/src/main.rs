use std::fs::File;
use std::io::{Read, stdin};
use std::path::PathBuf;

use anyhow::{Context, Result};
use attrtree::{Attr, MapOrder, Normalizer, Options};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "attrtree-cli",
    about = "Normalize a JSON document into structured log attributes",
    version
)]
struct Args {
    /// Root attribute key
    #[arg(long, default_value = "value")]
    key: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,

    /// Keep one-element root arrays as groups instead of unpacking them
    #[arg(long, default_value_t = false)]
    keep_singletons: bool,

    /// Sort group members of objects by key
    #[arg(long, default_value_t = false)]
    sort_keys: bool,

    /// Maximum nesting depth before a branch is truncated
    #[arg(long)]
    max_depth: Option<usize>,

    /// Input file (defaults to stdin)
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let mut buf = String::new();
    match &args.input {
        Some(path) => {
            let mut f =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            f.read_to_string(&mut buf)?;
        }
        None => {
            stdin().read_to_string(&mut buf)?;
        }
    }
    let doc: serde_json::Value = serde_json::from_str(&buf).context("parsing JSON input")?;

    let mut options = Options::default();
    if args.sort_keys {
        options.map_order = MapOrder::ByKey;
    }
    if args.max_depth.is_some() {
        options.max_depth = args.max_depth;
    }
    let normalizer = Normalizer::new(options);

    let value = match &doc {
        serde_json::Value::Array(items) if args.keep_singletons => {
            normalizer.seq_value(items, false)
        }
        other => normalizer.normalize(other),
    };
    tracing::debug!(bytes = buf.len(), group = value.is_group(), "normalized input");

    let attrs = [Attr::new(args.key, value)];
    match args.format {
        FormatArg::Text => println!("{}", attrtree::encode::to_text(&attrs)),
        FormatArg::Json => println!("{}", attrtree::encode::to_json_string(&attrs)?),
    }

    Ok(())
}
