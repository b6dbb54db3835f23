//! BlockVault CLI
//!
//! One-shot container tools and an interactive command shell.

use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use blockvault::codec::{self, ContainerHeader};
use blockvault::protocol::{read_command, write_response, Response};
use blockvault::{Config, Engine, Result, SeedPolicy, VaultError};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// BlockVault CLI
#[derive(Parser, Debug)]
#[command(name = "blockvault")]
#[command(about = "Pack payloads into self-describing containers")]
#[command(version)]
struct Args {
    /// Reject decodes whose seed differs from the one in the header
    #[arg(long, global = true)]
    enforce_seed: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a file into a container
    Encode {
        /// Payload file
        input: PathBuf,

        /// Container output file
        output: PathBuf,

        /// Provenance seed recorded in the header
        #[arg(short, long, default_value = "")]
        seed: String,
    },

    /// Decode a container back into its payload
    Decode {
        /// Container file
        input: PathBuf,

        /// Payload output file
        output: PathBuf,

        /// Seed to decode with
        #[arg(short, long, default_value = "")]
        seed: String,

        /// Write the payload even if its digest does not match
        #[arg(long)]
        force: bool,
    },

    /// Print a container's header
    Inspect {
        /// Container file
        input: PathBuf,
    },

    /// Print the Shannon entropy of a file
    Entropy {
        /// Any file
        input: PathBuf,
    },

    /// Execute JSON commands from stdin against an in-memory store
    Shell {
        /// Decode cache budget in MB
        #[arg(short = 'c', long, default_value = "64")]
        cache_mb: usize,

        /// Skip the startup banner
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() {
    // Initialize tracing/logging (stderr, so stdout stays clean for data)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blockvault=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let policy = if args.enforce_seed {
        SeedPolicy::Enforce
    } else {
        SeedPolicy::Ignore
    };

    if let Err(e) = run(args.command, policy) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, policy: SeedPolicy) -> Result<()> {
    match command {
        Commands::Encode {
            input,
            output,
            seed,
        } => {
            let payload = fs::read(&input)?;
            let encoded = codec::encode(&payload, &seed)?;
            fs::write(&output, &encoded.container)?;

            println!("original:  {} bytes", encoded.original_size);
            println!("container: {} bytes", encoded.container_size);
            println!("ratio:     {:.3}", encoded.ratio);
            println!("entropy:   {:.4} bits/byte", encoded.entropy);
            println!("level:     {:?}", encoded.level);
            println!("sha256:    {}", encoded.digest);
        }
        Commands::Decode {
            input,
            output,
            seed,
            force,
        } => {
            let container = fs::read(&input)?;
            let decoded = codec::decode_with_policy(&container, &seed, policy)?;
            if !decoded.verified && !force {
                return Err(VaultError::Protocol(format!(
                    "digest mismatch (expected {}, got {}); rerun with --force to keep the output",
                    decoded.expected_digest, decoded.digest
                )));
            }
            fs::write(&output, &decoded.payload)?;

            println!("payload:  {} bytes", decoded.payload.len());
            println!("verified: {}", decoded.verified);
            println!("sha256:   {}", decoded.digest);
        }
        Commands::Inspect { input } => {
            let container = fs::read(&input)?;
            if container.is_empty() {
                println!("empty container (canonical encoding of the empty payload)");
                return Ok(());
            }
            let header = codec::inspect(&container)?;
            print_header(&input, &header, container.len());
        }
        Commands::Entropy { input } => {
            let payload = fs::read(&input)?;
            let score = codec::entropy(&payload);
            println!("{:.4} bits/byte ({} bytes)", score, payload.len());
        }
        Commands::Shell { cache_mb, quiet } => {
            let cache_budget = cache_mb.checked_mul(1024 * 1024).ok_or_else(|| {
                VaultError::Config(format!("cache budget of {} MB overflows", cache_mb))
            })?;
            let config = Config::builder()
                .cache_budget(cache_budget)
                .seed_policy(policy)
                .build();
            let engine = Engine::new(config)?;

            if !quiet {
                tracing::info!("BlockVault v{}", blockvault::VERSION);
                tracing::info!("Decode cache budget: {} MB", cache_mb);
            }

            let stdin = io::stdin();
            let mut reader = BufReader::new(stdin.lock());
            let stdout = io::stdout();
            let mut writer = stdout.lock();

            loop {
                let response = match read_command(&mut reader) {
                    Ok(Some(command)) => engine.execute(command),
                    Ok(None) => break,
                    Err(e @ VaultError::Protocol(_)) => {
                        Response::error(&e.to_string())
                    }
                    Err(e) => return Err(e),
                };
                write_response(&mut writer, &response)?;
            }

            tracing::info!("Shell closed");
        }
    }

    Ok(())
}

fn print_header(path: &Path, header: &ContainerHeader, container_len: usize) {
    println!("file:      {}", path.display());
    println!("size:      {} bytes", container_len);
    println!("original:  {} bytes", header.original_len);
    println!("entropy:   {:.4} bits/byte", header.entropy);
    println!("level:     {:?} (marker {})", header.level, header.level.marker());
    println!("sha256:    {}", header.digest_hex());
    println!("seed:      {:?}", header.seed.display_lossy());
}
