//! File-level compress and decompress runs.
//!
//! Given an input `notes.txt`, compression writes `notes.bin` (the bitstream)
//! and `notes-symbol-model.huft` (the persisted tree). Decompressing
//! `notes.bin` reads both and writes `notes-decompressed.txt`.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::info;

use crate::compression::{
    decode_into, encode, read_tree, tokenize, write_tree, BitReader, BitWriter, CodeTable,
    FrequencyModel, PrefixTree, SymbolModel,
};
use crate::error::Result;

pub const COMPRESSED_SUFFIX: &str = ".bin";
pub const SYMBOL_MODEL_SUFFIX: &str = "-symbol-model.huft";
pub const DECOMPRESSED_SUFFIX: &str = "-decompressed.txt";

/// Paths of every artifact belonging to one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    root: PathBuf,
}

impl ArtifactPaths {
    /// Derive artifact paths from the input text file.
    pub fn for_input(input: &Path) -> Self {
        Self {
            root: strip_extension(input),
        }
    }

    /// Derive artifact paths from a compressed `.bin` file.
    pub fn for_compressed(compressed: &Path) -> Self {
        Self::for_input(compressed)
    }

    /// The input path with its final extension removed.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn compressed(&self) -> PathBuf {
        with_suffix(&self.root, COMPRESSED_SUFFIX)
    }

    pub fn symbol_model(&self) -> PathBuf {
        with_suffix(&self.root, SYMBOL_MODEL_SUFFIX)
    }

    pub fn decompressed(&self) -> PathBuf {
        with_suffix(&self.root, DECOMPRESSED_SUFFIX)
    }
}

fn strip_extension(path: &Path) -> PathBuf {
    match path.extension() {
        Some(_) => path.with_extension(""),
        None => path.to_path_buf(),
    }
}

fn with_suffix(root: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(root.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Wall-clock time spent in each named phase.
#[derive(Debug, Clone, Default)]
pub struct Timings {
    pub sections: Vec<(&'static str, Duration)>,
}

impl Timings {
    fn time<T>(&mut self, name: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let start = Instant::now();
        let out = f()?;
        self.sections.push((name, start.elapsed()));
        Ok(out)
    }
}

/// Summary of a compression run.
#[derive(Debug, Clone)]
pub struct CompressReport {
    pub paths: ArtifactPaths,
    pub model: SymbolModel,
    pub input_bytes: u64,
    /// Tokens including the sentinel.
    pub tokens: usize,
    pub distinct_symbols: usize,
    pub tree_depth: usize,
    /// Average code length in bits per token.
    pub bits_per_token: f64,
    pub compressed_bytes: u64,
    pub symbol_model_bytes: u64,
    pub timings: Timings,
}

/// Summary of a decompression run.
#[derive(Debug, Clone)]
pub struct DecompressReport {
    pub paths: ArtifactPaths,
    pub symbols: usize,
    pub output_bytes: u64,
    pub timings: Timings,
}

/// Compress `input` next to itself, deriving artifact paths from its name.
pub fn compress_file(input: &Path, model: SymbolModel) -> Result<CompressReport> {
    compress_to(input, ArtifactPaths::for_input(input), model)
}

/// Compress `input`, writing the bitstream and tree to `paths`.
pub fn compress_to(
    input: &Path,
    paths: ArtifactPaths,
    model: SymbolModel,
) -> Result<CompressReport> {
    let mut timings = Timings::default();

    let (text, tokens, frequencies, tree) = timings.time("Building symbol model", || {
        let text = String::from_utf8(fs::read(input)?)?;
        let tokens = tokenize(&text, model);
        let frequencies = FrequencyModel::from_tokens(&tokens);
        let tree = PrefixTree::build(&frequencies)?;
        Ok((text, tokens, frequencies, tree))
    })?;

    let (table, stats) = timings.time("Encode input file", || {
        let table = CodeTable::from_tree(&tree);
        let mut writer = BitWriter::new(BufWriter::new(File::create(paths.compressed())?));
        let stats = encode(&tokens, &table, &mut writer)?;
        Ok((table, stats))
    })?;

    let symbol_model_bytes = timings.time("Write symbol model", || {
        let mut out = BufWriter::new(File::create(paths.symbol_model())?);
        write_tree(&tree, &mut out)
    })?;

    let report = CompressReport {
        model,
        input_bytes: text.len() as u64,
        tokens: tokens.len(),
        distinct_symbols: frequencies.len(),
        tree_depth: tree.depth(),
        bits_per_token: table.expected_length(&frequencies),
        compressed_bytes: stats.bytes,
        symbol_model_bytes,
        timings,
        paths,
    };
    info!(
        "compressed {} ({} bytes, {} tokens) into {} ({} bytes) + {} ({} bytes)",
        input.display(),
        report.input_bytes,
        report.tokens,
        report.paths.compressed().display(),
        report.compressed_bytes,
        report.paths.symbol_model().display(),
        report.symbol_model_bytes
    );
    Ok(report)
}

/// Decompress `compressed`, loading the tree and writing the text next to it.
pub fn decompress_file(compressed: &Path) -> Result<DecompressReport> {
    decompress_from(ArtifactPaths::for_compressed(compressed))
}

/// Decompress the artifacts named by `paths`.
pub fn decompress_from(paths: ArtifactPaths) -> Result<DecompressReport> {
    let mut timings = Timings::default();

    let tree = timings.time("Load symbol model", || {
        let mut input = BufReader::new(File::open(paths.symbol_model())?);
        read_tree(&mut input)
    })?;

    let (symbols, output_bytes) = timings.time("Decoding compressed file", || {
        let mut reader = BitReader::new(BufReader::new(File::open(paths.compressed())?));
        let mut out = CountingSink::new(BufWriter::new(File::create(paths.decompressed())?));
        let symbols = decode_into(&tree, &mut reader, &mut out)?;
        out.flush()?;
        Ok((symbols, out.count))
    })?;

    info!(
        "decompressed {} into {} ({} symbols, {} bytes)",
        paths.compressed().display(),
        paths.decompressed().display(),
        symbols,
        output_bytes
    );
    Ok(DecompressReport {
        paths,
        symbols,
        output_bytes,
        timings,
    })
}

struct CountingSink<W: Write> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingSink<W> {
    fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }
}

impl<W: Write> Write for CountingSink<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
