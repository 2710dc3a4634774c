//! Command-line interface for xsdgen

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use xsdgen::{CollisionPolicy, GeneratorConfig, Session, Target};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsdgen")]
#[command(author, version, about = "Generate XML decoding/encoding types from an XSD schema", long_about = None)]
struct Cli {
    /// Path to the entry XSD file
    #[arg(value_name = "XSD_FILE")]
    schema: PathBuf,

    /// Destination file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Package (Go) or module (Rust) name
    #[arg(short, long, value_name = "NAME")]
    package: Option<String>,

    /// Prefix for generated type names
    #[arg(short = 'x', long, value_name = "PREFIX", default_value = "")]
    prefix: String,

    /// Generate exported types
    #[arg(short, long)]
    exported: bool,

    /// Output language: go, rust
    #[arg(short, long, default_value = "go")]
    target: Target,

    /// Print the intermediate tree as JSON instead of declarations
    #[arg(long)]
    ir: bool,

    /// Fail on name collisions instead of warning
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
        .to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> xsdgen::Result<()> {
    let mut config = GeneratorConfig::new()
        .with_prefix(cli.prefix)
        .with_exported(cli.exported)
        .with_target(cli.target);
    if let Some(package) = cli.package {
        config = config.with_package(package);
    }
    if cli.strict {
        config = config.with_collisions(CollisionPolicy::Error);
    }

    let session = Session::load(&cli.schema, config)?;
    let output = if cli.ir {
        session.dump_ir()? + "\n"
    } else {
        session.generate()?
    };

    // only touch the destination once everything has succeeded
    match cli.output {
        Some(path) => fs::write(&path, output).map_err(|e| {
            xsdgen::Error::Resource(format!(
                "Could not create or truncate output file '{}': {}",
                path.display(),
                e
            ))
        })?,
        None => print!("{}", output),
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
