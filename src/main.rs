use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wordasm::{Assembler, MemoryImage, DEFAULT_CAPACITY};

/// Assembles a program into a 32 bit memory image.
#[derive(Parser, Debug)]
#[command(name = "wordasm", version, about)]
struct Cli {
  /// Assembly source, one instruction or directive per line.
  #[arg(default_value = "program.txt")]
  input: PathBuf,

  /// Flat dump output, one binary word per line.
  #[arg(long, default_value = "memory.txt")]
  txt: PathBuf,

  /// Memory initialization file output.
  #[arg(long, default_value = "memory.mif")]
  mif: PathBuf,

  /// Memory size in words.
  #[arg(long, default_value_t = DEFAULT_CAPACITY)]
  depth: usize,

  /// Print a listing of every word written.
  #[arg(long)]
  listing: bool,

  /// Log every word written. `RUST_LOG` takes precedence.
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = match std::env::var("RUST_LOG") {
    Ok(_) => EnvFilter::from_default_env(),
    Err(_) if cli.verbose => EnvFilter::new("debug"),
    Err(_) => EnvFilter::new("warn")
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();

  #[cfg(feature = "trace_assembly")]
  info!("assembly listing ENABLED");

  let text = fs::read_to_string(&cli.input)
    .with_context(|| format!("failed to read {}", cli.input.display()))?;

  let mut assembler = Assembler::new(cli.depth);
  assembler.assemble(&text)?;

  if cli.listing {
    println!("{}", assembler);
  }

  let image = assembler.into_image();
  write_output(&cli.txt, &image, MemoryImage::write_words)?;
  write_output(&cli.mif, &image, MemoryImage::write_mif)?;
  info!(txt = %cli.txt.display(), mif = %cli.mif.display(), "memory image written");

  Ok(())
}

fn write_output(
  path: &Path,
  image: &MemoryImage,
  format: fn(&MemoryImage, &mut BufWriter<File>) -> std::io::Result<()>
) -> Result<()> {
  let file = File::create(path)
    .with_context(|| format!("failed to create {}", path.display()))?;
  let mut out = BufWriter::new(file);
  format(image, &mut out)
    .and_then(|_| out.flush())
    .with_context(|| format!("failed to write {}", path.display()))
}
