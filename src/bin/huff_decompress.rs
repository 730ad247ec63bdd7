//! huff-decompress: restore a file written by huff-compress.
//!
//! Given `<root>.bin`, reads `<root>-symbol-model.huft` and writes
//! `<root>-decompressed.txt`.

use std::path::PathBuf;

use clap::Parser;

use huffcode::pipeline::decompress_file;

/// Decompress a Huffman-coded file.
#[derive(Parser, Debug)]
#[command(name = "huff-decompress")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Compressed `.bin` file
    #[arg(value_name = "INFILE")]
    infile: PathBuf,

    /// Print per-section timings
    #[arg(long)]
    bench: bool,
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
    let report = decompress_file(&args.infile)?;

    if args.bench {
        for (section, elapsed) in &report.timings.sections {
            println!(
                "Section {} took {} seconds",
                section,
                elapsed.as_secs_f64()
            );
        }
        println!(
            "Decoded {} symbols into {} bytes",
            report.symbols, report.output_bytes
        );
    }
    Ok(())
}
