//! retrolz-cli - Command-line interface for RetroLZ
//!
//! A command-line tool for compressing and decompressing files in the
//! backward LZ77, Taiko LZ80 and LZ40 formats.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use retrolz::backward::{Footer, FOOTER_SIZE};
use retrolz::output::write_replacing;
use retrolz::{ByteOrder, CompressionStats, Format};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "retrolz-cli")]
#[command(about = "A CLI tool for legacy game LZ compression and decompression")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    Compress {
        /// Input file to compress
        input: PathBuf,

        /// Output compressed file
        output: PathBuf,

        /// Wire format
        #[arg(short = 'F', long, value_enum)]
        format: CliFormat,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Decompress a file
    Decompress {
        /// Input compressed file
        input: PathBuf,

        /// Output decompressed file
        output: PathBuf,

        /// Wire format
        #[arg(short = 'F', long, value_enum)]
        format: CliFormat,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Inspect a compressed file and report which formats decode it
    Info {
        /// Compressed file to analyze
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CliFormat {
    /// Backward LZ77 with little-endian footer
    #[value(name = "backward-lz77-le")]
    BackwardLz77Le,
    /// Backward LZ77 with big-endian footer
    #[value(name = "backward-lz77-be")]
    BackwardLz77Be,
    /// Taiko LZ80
    #[value(name = "taiko-lz80")]
    TaikoLz80,
    /// LZ40
    #[value(name = "lz40")]
    Lz40,
}

impl From<CliFormat> for Format {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::BackwardLz77Le => Format::BackwardLz77(ByteOrder::LittleEndian),
            CliFormat::BackwardLz77Be => Format::BackwardLz77(ByteOrder::BigEndian),
            CliFormat::TaikoLz80 => Format::TaikoLz80,
            CliFormat::Lz40 => Format::Lz40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Compress,
    Decompress,
}

impl Operation {
    fn verb(&self) -> &'static str {
        match self {
            Operation::Compress => "Compress",
            Operation::Decompress => "Decompress",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            format,
            force,
        } => convert_file(
            Operation::Compress,
            &input,
            &output,
            format.into(),
            force,
            cli.verbose,
            cli.quiet,
        ),
        Commands::Decompress {
            input,
            output,
            format,
            force,
        } => convert_file(
            Operation::Decompress,
            &input,
            &output,
            format.into(),
            force,
            cli.verbose,
            cli.quiet,
        ),
        Commands::Info { input } => show_file_info(&input, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(operation: Operation, format: Format, data: Vec<u8>) -> retrolz::Result<(Vec<u8>, CompressionStats)> {
    match operation {
        Operation::Compress => {
            let mut encoder = format.encoder();
            let mut output = Vec::new();
            encoder.encode(&mut Cursor::new(data), &mut output)?;
            Ok((output, encoder.stats().clone()))
        }
        Operation::Decompress => {
            let mut decoder = format.decoder();
            let mut output = Cursor::new(Vec::new());
            decoder.decode(&mut Cursor::new(data), &mut output)?;
            Ok((output.into_inner(), decoder.stats().clone()))
        }
    }
}

fn convert_file(
    operation: Operation,
    input: &Path,
    output: &Path,
    format: Format,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    // Check if output file exists and force flag
    if output.exists() && !force {
        return Err(format!(
            "Output file '{}' already exists. Use --force to overwrite",
            output.display()
        )
        .into());
    }

    if verbose {
        println!(
            "{}ing '{}' to '{}' as {}",
            operation.verb(),
            input.display(),
            output.display(),
            format
        );
    }

    let start_time = Instant::now();
    let input_data = fs::read(input)?;
    let input_size = input_data.len();

    if verbose {
        println!("Input size: {} bytes", input_size);
    }

    // Show progress bar for large files
    let progress = if !quiet && input_size > 1024 * 1024 {
        let pb = ProgressBar::new(2);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        pb.set_message(format!("{}ing...", operation.verb()));
        Some(pb)
    } else {
        None
    };

    if let Some(ref pb) = progress {
        pb.inc(1);
    }

    let (output_data, stats) = run(operation, format, input_data)
        .map_err(|e| format!("{}ion failed: {}", operation.verb(), e))?;

    if let Some(ref pb) = progress {
        pb.inc(1);
        pb.finish_with_message(format!("{}ion complete", operation.verb()));
    }

    write_replacing(output, &output_data)?;

    let elapsed = start_time.elapsed();
    let output_size = output_data.len();

    if !quiet {
        println!("✓ {}ion successful!", operation.verb());
        println!("  Input:   {} bytes", input_size);
        println!("  Output:  {} bytes", output_size);
        if input_size > 0 && output_size > 0 {
            let ratio = match operation {
                Operation::Compress => output_size as f64 / input_size as f64,
                Operation::Decompress => input_size as f64 / output_size as f64,
            };
            println!("  Ratio:   {:.1}%", ratio * 100.0);
        }
        println!("  Time:    {:.2?}", elapsed);

        if verbose {
            println!("  Literals: {}", stats.literal_count);
            println!("  Matches:  {}", stats.match_count);
            println!("  Longest:  {}", stats.longest_match);
        }
        if operation == Operation::Compress && output_size > input_size {
            println!("  Note: File expanded during compression (common for small/random data)");
        }
    }

    Ok(())
}

fn show_file_info(input: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let data = fs::read(input)?;
    println!("File Information:");
    println!("  File: {}", input.display());
    println!("  Size: {} bytes", data.len());

    if data.len() >= 4 && data[0] == retrolz::lz40::MAGIC {
        let declared = u32::from_le_bytes([data[1], data[2], data[3], 0]);
        println!("  LZ40 header: declares {} bytes", declared);
    }

    if data.len() >= FOOTER_SIZE {
        let mut bytes = [0u8; FOOTER_SIZE];
        bytes.copy_from_slice(&data[data.len() - FOOTER_SIZE..]);
        for byte_order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let footer = Footer::parse(&bytes, byte_order);
            if verbose {
                println!(
                    "  Footer ({:?}): length={} compressed={:#X} offset={}",
                    byte_order,
                    footer.footer_length,
                    footer.compressed_size,
                    footer.decompressed_offset
                );
            }
        }
    }

    let mut valid = 0;
    for format in Format::ALL {
        match run(Operation::Decompress, format, data.clone()) {
            Ok((decompressed, stats)) => {
                valid += 1;
                println!(
                    "  {}: ✓ decodes to {} bytes ({} literals, {} matches)",
                    format,
                    decompressed.len(),
                    stats.literal_count,
                    stats.match_count
                );
            }
            Err(e) => {
                if verbose {
                    println!("  {}: ✗ {}", format, e);
                }
            }
        }
    }

    if valid == 0 {
        println!("  Status: ✗ Not decodable by any supported format");
    }

    Ok(())
}
