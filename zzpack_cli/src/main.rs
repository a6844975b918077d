use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use zzpack_codecs::codec_by_name;
use zzpack_core::{Compression, FrameHeader, Image};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "zzpack",
    about = "Pack, unpack, and inspect compressed game asset frames and images",
    version
)]
struct Cli {
    /// Log debug output (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a single frame
    Pack {
        /// Source file ("-" reads stdin)
        input: PathBuf,
        /// Destination frame file ("-" writes stdout)
        output: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Decompress a single frame back to raw bytes
    Unpack {
        /// Source frame file ("-" reads stdin)
        input: PathBuf,
        /// Destination file ("-" writes stdout)
        output: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Print the frame header
    Inspect {
        /// Frame file to inspect
        file: PathBuf,
    },
    /// Compress a file without framing
    Compress {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Decompress an unframed buffer
    Decompress {
        input: PathBuf,
        output: PathBuf,
        /// Expected decompressed size (0 = unknown)
        #[arg(long, default_value_t = 0)]
        size_hint: usize,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Decode a compressed raw image and print layer statistics
    Image {
        /// Compressed image data
        input: PathBuf,
        #[arg(long)]
        width: i32,
        #[arg(long)]
        height: i32,
        /// Data holds an image layer followed by a transform layer
        #[arg(long)]
        double_layer: bool,
        /// Write the decoded layers here
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        codec: CodecArgs,
    },
}

#[derive(clap::Args)]
struct CodecArgs {
    /// Codec to use: zlib | lz4 | passthrough
    #[arg(short, long, default_value = "zlib")]
    codec: String,
    /// zlib compression level (0–9)
    #[arg(long, default_value_t = 6)]
    level: u32,
}

impl CodecArgs {
    fn compression(&self) -> anyhow::Result<Compression> {
        Ok(Compression::new(codec_by_name(&self.codec, self.level)?))
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn is_std(path: &Path) -> bool {
    path.to_str() == Some("-")
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    let mut data = Vec::new();
    if is_std(path) {
        io::stdin().lock().read_to_end(&mut data)?;
    } else {
        File::open(path)
            .with_context(|| format!("opening input file {:?}", path))?
            .read_to_end(&mut data)?;
    }
    Ok(data)
}

fn open_input(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    if is_std(path) {
        return Ok(Box::new(io::stdin()));
    }
    let file = File::open(path).with_context(|| format!("opening input file {:?}", path))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: &Path) -> anyhow::Result<Box<dyn Write>> {
    if is_std(path) {
        return Ok(Box::new(io::stdout()));
    }
    let file = File::create(path).with_context(|| format!("creating output file {:?}", path))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn ratio(raw: usize, compressed: usize) -> f64 {
    if compressed == 0 {
        return 1.0;
    }
    raw as f64 / compressed as f64
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_pack(input: &Path, output: &Path, compression: &Compression) -> anyhow::Result<()> {
    let data = read_input(input)?;
    let t0 = Instant::now();

    let mut dst = open_output(output)?;
    compression
        .write_frame(&data, &mut dst)
        .with_context(|| format!("packing {:?}", input))?;
    dst.flush()?;

    log::info!(
        "packed {} with {} in {:.3}s",
        human_bytes(data.len() as u64),
        compression.codec().name(),
        t0.elapsed().as_secs_f64()
    );
    Ok(())
}

fn run_unpack(input: &Path, output: &Path, compression: &Compression) -> anyhow::Result<()> {
    let mut src = open_input(input)?;
    let mut dst = open_output(output)?;
    let t0 = Instant::now();

    compression
        .read_frame(&mut src, &mut dst)
        .with_context(|| format!("unpacking {:?}", input))?;
    dst.flush()?;

    log::info!("unpacked {:?} in {:.3}s", input, t0.elapsed().as_secs_f64());
    Ok(())
}

fn run_inspect(file: &Path) -> anyhow::Result<()> {
    let mut src = open_input(file)?;
    let header = FrameHeader::read_from(&mut src).with_context(|| format!("reading frame header from {:?}", file))?;

    println!("=== Frame: {:?} ===", file);
    println!();
    println!("  format version : {}", header.version);
    println!("  raw size       : {}", human_bytes(header.raw_size as u64));
    println!("  compressed     : {}", human_bytes(header.zip_size as u64));
    println!("  ratio          : {:.2}x", header.ratio());
    Ok(())
}

fn run_compress(input: &Path, output: &Path, compression: &Compression) -> anyhow::Result<()> {
    let data = read_input(input)?;
    let zip = compression.compress(&data)?;
    let mut dst = open_output(output)?;
    dst.write_all(&zip)?;
    dst.flush()?;

    eprintln!("  codec       : {}", compression.codec().name());
    eprintln!("  raw size    : {}", human_bytes(data.len() as u64));
    eprintln!("  compressed  : {}", human_bytes(zip.len() as u64));
    eprintln!("  ratio       : {:.2}x", ratio(data.len(), zip.len()));
    Ok(())
}

fn run_decompress(input: &Path, output: &Path, size_hint: usize, compression: &Compression) -> anyhow::Result<()> {
    let zip = read_input(input)?;
    let raw = compression.decompress(&zip, size_hint)?;
    let mut dst = open_output(output)?;
    dst.write_all(&raw)?;
    dst.flush()?;

    eprintln!("  raw size    : {}", human_bytes(raw.len() as u64));
    Ok(())
}

fn run_image(
    input: &Path,
    width: i32,
    height: i32,
    double_layer: bool,
    output: Option<&Path>,
    compression: &Compression,
) -> anyhow::Result<()> {
    let data = read_input(input)?;
    let image = compression
        .decode_image(width, height, &data, double_layer)
        .with_context(|| format!("decoding {}x{} image from {:?}", width, height, input))?;

    print_image_stats(&image);

    if let Some(path) = output {
        let mut dst = open_output(path)?;
        dst.write_all(image.image())?;
        if let Some(transform) = image.transform() {
            dst.write_all(transform)?;
        }
        dst.flush()?;
        eprintln!("  written to {:?}", path);
    }
    Ok(())
}

fn print_image_stats(image: &Image) {
    let mut used = [false; 256];
    for &index in image.image() {
        used[index as usize] = true;
    }

    println!("=== Image {}x{} ===", image.width(), image.height());
    println!("  palette entries : {}", used.iter().filter(|u| **u).count());
    match image.transform() {
        Some(transform) => {
            let opaque = transform.iter().filter(|t| **t == 0).count();
            println!("  transform layer : yes");
            println!("  opaque pixels   : {} / {}", opaque, transform.len());
        }
        None => println!("  transform layer : no"),
    }
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    match cli.command {
        Commands::Pack { input, output, codec } => run_pack(&input, &output, &codec.compression()?),
        Commands::Unpack { input, output, codec } => run_unpack(&input, &output, &codec.compression()?),
        Commands::Inspect { file } => run_inspect(&file),
        Commands::Compress { input, output, codec } => run_compress(&input, &output, &codec.compression()?),
        Commands::Decompress {
            input,
            output,
            size_hint,
            codec,
        } => run_decompress(&input, &output, size_hint, &codec.compression()?),
        Commands::Image {
            input,
            width,
            height,
            double_layer,
            output,
            codec,
        } => run_image(&input, width, height, double_layer, output.as_deref(), &codec.compression()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zzpack_codecs::default_compression;

    #[test]
    fn pack_then_unpack_files() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("sprite.bin");
        let packed = dir.path().join("sprite.zz");
        let unpacked = dir.path().join("sprite.out");

        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 13) as u8).collect();
        std::fs::write(&raw, &data).unwrap();

        let c = default_compression();
        run_pack(&raw, &packed, &c).unwrap();
        run_unpack(&packed, &unpacked, &c).unwrap();
        assert_eq!(std::fs::read(&unpacked).unwrap(), data);

        let frame = std::fs::read(&packed).unwrap();
        let header = FrameHeader::read_from(&mut frame.as_slice()).unwrap();
        assert_eq!(header.raw_size, 10_000);
    }

    #[test]
    fn pack_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("empty.bin");
        std::fs::write(&raw, b"").unwrap();

        let err = run_pack(&raw, &dir.path().join("empty.zz"), &default_compression()).unwrap_err();
        assert!(format!("{err:#}").contains("input is empty"), "got: {err:#}");
    }

    #[test]
    fn image_writes_decoded_layers() {
        let dir = tempfile::tempdir().unwrap();
        let zipped = dir.path().join("mask.zz");
        let decoded = dir.path().join("mask.raw");

        let c = default_compression();
        let layers: Vec<u8> = [[3u8; 6], [1u8; 6]].concat();
        std::fs::write(&zipped, c.compress(&layers).unwrap()).unwrap();

        run_image(&zipped, 3, 2, true, Some(&decoded), &c).unwrap();
        assert_eq!(std::fs::read(&decoded).unwrap(), layers);
    }

    #[test]
    fn cli_parses_codec_flags() {
        let cli = Cli::try_parse_from(["zzpack", "pack", "a", "b", "--codec", "lz4"]).unwrap();
        match cli.command {
            Commands::Pack { codec, .. } => assert_eq!(codec.compression().unwrap().codec().name(), "lz4"),
            _ => panic!("expected pack"),
        }
    }
}
