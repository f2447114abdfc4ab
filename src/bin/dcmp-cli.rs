//! dcmp-cli - Command-line interface for the DonnBits decoder
//!
//! A command-line tool for expanding DonnBits ('dcmp' 0) compressed code
//! resources and inspecting their headers.

use clap::{Parser, Subcommand};
use donnbits::{decompress_with_stats, read_header, DcmpOptions, DecompressionStats};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "dcmp-cli")]
#[command(about = "A CLI tool for DonnBits ('dcmp' 0) decompression")]
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
    /// Decompress a DonnBits stream
    Decompress {
        /// Input compressed file
        input: PathBuf,

        /// Output file for the reconstructed code
        output: PathBuf,

        /// Declared uncompressed size in bytes (decimal or 0x-prefixed hex)
        #[arg(short, long, value_parser = parse_number)]
        size: usize,

        /// Offset of the DonnBits header within the input
        #[arg(short, long, default_value = "0", value_parser = parse_number)]
        offset: usize,

        /// Fail if the stream ends before the declared size
        #[arg(long)]
        strict: bool,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the header of a compressed stream
    Info {
        /// Compressed file to analyze
        input: PathBuf,

        /// Offset of the DonnBits header within the input
        #[arg(short, long, default_value = "0", value_parser = parse_number)]
        offset: usize,

        /// Declared uncompressed size; when given, the stream is also decoded
        #[arg(short, long, value_parser = parse_number)]
        size: Option<usize>,
    },
}

fn parse_number(s: &str) -> Result<usize, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{}': {}", s, e))
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    colog::default_builder().filter_level(level).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Decompress {
            input,
            output,
            size,
            offset,
            strict,
            force,
        } => {
            let options = DcmpOptions::new(size)
                .with_offset(offset)
                .with_strict_size(strict);
            decompress_file(&input, &output, &options, force, cli.verbose, cli.quiet).map(|_| ())
        }
        Commands::Info {
            input,
            offset,
            size,
        } => show_file_info(&input, offset, size, cli.verbose),
    }
}

fn decompress_file(
    input: &PathBuf,
    output: &PathBuf,
    options: &DcmpOptions,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<DecompressionStats, Box<dyn std::error::Error>> {
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
            "Decompressing '{}' to '{}'",
            input.display(),
            output.display()
        );
        println!(
            "Header offset: {}, declared size: {} bytes",
            options.header_offset, options.unpacked_size
        );
    }

    let start_time = Instant::now();

    let compressed_data = fs::read(input)?;
    let input_size = compressed_data.len();

    // Spinner for large resources
    let progress = if !quiet && input_size > 1024 * 1024 {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Decompressing...");
        Some(pb)
    } else {
        None
    };

    let result = decompress_with_stats(&compressed_data, options);

    if let Some(ref pb) = progress {
        pb.finish_with_message("Decompression complete");
    }

    let (decompressed_data, stats) = result.map_err(|e| format!("Decompression failed: {}", e))?;

    fs::write(output, &decompressed_data)?;

    let decompression_time = start_time.elapsed();

    if !quiet {
        println!("✓ Decompression successful!");
        println!("  Input:  {} bytes", stats.input_bytes);
        println!("  Output: {} bytes", stats.output_bytes);
        println!("  Time:   {:.2?}", decompression_time);

        if stats.output_bytes < options.unpacked_size {
            println!(
                "  Note: stream terminated {} bytes short of the declared size",
                options.unpacked_size - stats.output_bytes
            );
        }
    }

    Ok(stats)
}

fn show_file_info(
    input: &PathBuf,
    offset: usize,
    size: Option<usize>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let data = fs::read(input)?;
    let header = read_header(&data, offset)?;

    println!("DonnBits Stream Information:");
    println!("  File: {}", input.display());
    println!("  Size: {} bytes", data.len());
    println!("  Header Offset: {}", offset);
    println!("  Ratio: {}", header.ratio);
    println!("  Overrun: {}", header.overrun);
    println!("  Algorithm ID: {}", header.algorithm_id);
    println!("  Constant Table ID: {}", header.table_id);

    if verbose {
        println!("  Header bytes: {:02x?}", &data[offset..offset + donnbits::HEADER_SIZE]);
    }

    if !header.is_supported() {
        println!("  Status: ✗ Unsupported algorithm or constant table");
        return Ok(());
    }

    let Some(size) = size else {
        println!("  Status: ✓ Supported (pass --size to decode)");
        return Ok(());
    };

    match decompress_with_stats(&data, &DcmpOptions::new(size).with_offset(offset)) {
        Ok((_, stats)) => {
            println!("  Compressed Bytes: {}", stats.input_bytes);
            println!("  Decompressed Size: {} bytes", stats.output_bytes);
            println!("  Tokens: {}", stats.tokens);
            println!("  Literal Bytes: {}", stats.literal_bytes);
            println!(
                "  Back-references: {} captured, {} replayed",
                stats.backref_entries, stats.backref_hits
            );
            println!("  Constant Words: {}", stats.const_words);
            println!("  Jump-table Entries: {}", stats.jump_table_entries);
            println!("  RLE / Delta Runs: {} / {}", stats.rle_runs, stats.delta_runs);
            println!(
                "  Ended On: {}",
                if stats.terminated { "terminator" } else { "declared size" }
            );
            println!("  Status: ✓ Valid DonnBits stream");
        }
        Err(e) => {
            println!("  Status: ✗ Invalid or corrupted DonnBits stream");
            if verbose {
                println!("  Error: {}", e);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: [u8; 14] = [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x4E, 0x11, 0x4E, 0x56, 0x23, 0x23, 0x4E, 0xFF,
    ];

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("128"), Ok(128));
        assert_eq!(parse_number("0x80"), Ok(128));
        assert_eq!(parse_number("0X1f"), Ok(31));
        assert!(parse_number("0xZZ").is_err());
        assert!(parse_number("-1").is_err());
    }

    #[test]
    fn test_decompress_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let input_path = dir.path().join("code.dcmp");
        let output_path = dir.path().join("code.bin");
        fs::write(&input_path, SAMPLE)?;

        let stats = decompress_file(
            &input_path,
            &output_path,
            &DcmpOptions::new(10),
            false,
            false,
            true,
        )?;

        assert_eq!(
            fs::read(&output_path)?,
            vec![0x4E, 0x75, 0x4E, 0x56, 0x4E, 0x56, 0x4E, 0x56, 0x4E, 0x75]
        );
        assert_eq!(stats.backref_hits, 2);
        // declared size reached before the terminator
        assert!(!stats.terminated);

        // refuses to overwrite without --force
        assert!(decompress_file(
            &input_path,
            &output_path,
            &DcmpOptions::new(10),
            false,
            false,
            true
        )
        .is_err());
        Ok(())
    }

    #[test]
    fn test_run_subcommands() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let input_path = dir.path().join("code.dcmp");
        let output_path = dir.path().join("code.bin");
        fs::write(&input_path, SAMPLE)?;

        let args: [&OsStr; 7] = [
            "dcmp-cli".as_ref(),
            "--quiet".as_ref(),
            "decompress".as_ref(),
            input_path.as_os_str(),
            output_path.as_os_str(),
            "--size".as_ref(),
            "0xA".as_ref(),
        ];
        run(Cli::try_parse_from(args)?)?;
        assert_eq!(fs::read(&output_path)?.len(), 10);

        let args: [&OsStr; 5] = [
            "dcmp-cli".as_ref(),
            "info".as_ref(),
            input_path.as_os_str(),
            "--size".as_ref(),
            "10".as_ref(),
        ];
        run(Cli::try_parse_from(args)?)?;
        Ok(())
    }

    #[test]
    fn test_decompress_file_strict() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let input_path = dir.path().join("code.dcmp");
        let output_path = dir.path().join("code.bin");
        fs::write(&input_path, SAMPLE)?;

        let options = DcmpOptions::new(64).with_strict_size(true);
        assert!(decompress_file(&input_path, &output_path, &options, false, false, true).is_err());
        assert!(!output_path.exists());
        Ok(())
    }

    #[test]
    fn test_info_unsupported() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let input_path = dir.path().join("code.dcmp");
        fs::write(&input_path, [0, 0, 0, 1, 0, 0, 0xFF])?;

        show_file_info(&input_path, 0, Some(4), true)?;
        assert!(show_file_info(&input_path, 4, None, false).is_err());
        Ok(())
    }
}
