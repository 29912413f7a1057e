mod cli;

use is3dump::{config, dump, index, streams};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "is3dump=trace,is3dump_media=trace,is3dump_common=debug".to_string()
        } else {
            "is3dump=info,is3dump_media=warn".to_string()
        }
    });

    // stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Dump {
            channel,
            id,
            output,
            range,
            overwrite,
        } => {
            let request = dump::DumpRequest {
                channel,
                stream_id: id,
                output,
                range: range.unwrap_or_default(),
                overwrite,
            };
            run_dump(&request, cli.config.as_deref(), cli.verbose)
        }
        Commands::Streams { channel, out_dir } => {
            write_streams(&channel, &out_dir, cli.config.as_deref())
        }
        Commands::Index { channel, id } => list_index(&channel, id, cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("is3dump {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_dump(request: &dump::DumpRequest, config_path: Option<&Path>, verbose: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let outcome = dump::run_with(request, &config, |record| {
        if verbose {
            println!("{}", record);
        }
    })?;

    println!(
        "{}: {} frames, {} bytes",
        outcome.path.display(),
        outcome.summary.frames_written,
        outcome.summary.bytes_written + outcome.summary.tag_bytes
    );
    Ok(())
}

fn write_streams(channel: &Path, out_dir: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !out_dir.is_dir() {
        anyhow::bail!("Output directory does not exist: {:?}", out_dir);
    }

    let written = streams::write_stream_files(channel, out_dir, config.channel.recursive)?;
    if written.is_empty() {
        println!("No H.264 or AAC stream found in the first chunk");
    }
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn list_index(channel: &Path, stream_id: Option<u64>, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let total = index::list_records(channel, stream_id, config.channel.recursive, &mut out)?;
    tracing::info!("Listed {} records", total);
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            print_config(&config);
        }
    }

    Ok(())
}

fn print_config(config: &config::Config) {
    println!("  Stream id: {}", config.dump.stream_id);
    match &config.dump.output_dir {
        Some(dir) => println!("  Output dir: {}", dir.display()),
        None => println!("  Output dir: (current directory)"),
    }
    println!("  ID3 tag: {}", config.dump.id3_tag);
    println!("  Publisher: {}", config.dump.publisher);
    println!("  Recursive channels: {}", config.channel.recursive);
}
