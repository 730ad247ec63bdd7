//! huff-compress: Huffman-compress a text file.
//!
//! Writes `<root>.bin` and `<root>-symbol-model.huft` next to the input,
//! where `<root>` is the input path without its extension.
//!
//! Logging is controlled with `RUST_LOG` (for example `RUST_LOG=huffcode=debug`).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use huffcode::pipeline::compress_file;
use huffcode::SymbolModel;

/// Compress a text file with a static Huffman code.
#[derive(Parser, Debug)]
#[command(name = "huff-compress")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text file to compress
    #[arg(value_name = "INFILE")]
    infile: PathBuf,

    /// Character- or word-based symbol model
    #[arg(short = 's', long = "symbolmodel", value_enum, default_value = "char")]
    symbol_model: ModelArg,

    /// Print per-section timings and output sizes
    #[arg(long)]
    bench: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    /// One symbol per character
    Char,
    /// Letter runs as one symbol, everything else per character
    Word,
}

impl From<ModelArg> for SymbolModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Char => SymbolModel::Char,
            ModelArg::Word => SymbolModel::Word,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let report = compress_file(&args.infile, args.symbol_model.into())?;

    if args.bench {
        for (section, elapsed) in &report.timings.sections {
            println!(
                "Section {} took {} seconds",
                section,
                elapsed.as_secs_f64()
            );
        }
        println!("Compressed file is {} bytes", report.compressed_bytes);
        println!("Symbol file is {} bytes", report.symbol_model_bytes);
        println!(
            "{} tokens, {} distinct symbols, {:.3} bits per token, tree depth {}",
            report.tokens, report.distinct_symbols, report.bits_per_token, report.tree_depth
        );
    }
    Ok(())
}
