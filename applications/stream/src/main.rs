//! tonbox-stream - decode-to-stream harness
//!
//! Decodes a single audio file, or a whole album directory through the
//! sequencer, and writes raw interleaved 16-bit little-endian PCM to
//! stdout. Useful for golden-output comparisons and for piping into
//! `aplay`/`sox`-style tools:
//!
//! ```text
//! tonbox-stream /music/lullabies | aplay -f S16_LE -c 2 -r 44100
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG` to raise the log level.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tonbox_audio::{Sequencer, StreamDecoder};
use tonbox_core::config::CHUNK_SAMPLES;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tonbox-stream")]
#[command(about = "Decode an audio file or album directory to raw PCM on stdout", long_about = None)]
struct Cli {
    /// Audio file or album directory to decode
    path: PathBuf,

    /// Start track index when decoding a directory
    #[arg(long, default_value_t = 0)]
    track: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    let mut buffer = vec![0i16; CHUNK_SAMPLES];

    if cli.path.is_dir() {
        let mut sequencer = Sequencer::open(&cli.path, cli.track)
            .with_context(|| format!("cannot open album {}", cli.path.display()))?;

        loop {
            let frames = sequencer.decode(&mut buffer);
            if frames == 0 {
                break;
            }
            write_samples(&mut out, &buffer[..2 * frames])?;
        }
    } else {
        let mut decoder = StreamDecoder::new();
        decoder
            .open(&cli.path)
            .with_context(|| format!("cannot open {}", cli.path.display()))?;

        loop {
            let frames = decoder.decode(&mut buffer);
            if frames == 0 {
                break;
            }
            write_samples(&mut out, &buffer[..2 * frames])?;
        }
    }

    out.flush().context("flushing stdout")?;

    Ok(())
}

fn write_samples(out: &mut impl Write, samples: &[i16]) -> Result<()> {
    for sample in samples {
        out.write_all(&sample.to_le_bytes())
            .context("writing PCM to stdout")?;
    }

    Ok(())
}
