//! facgce - chord exploration for open F-A-C-G-C-E tuning
//!
//! Subcommands:
//! - `facgce identify 0 0 0 2 0 0` - name the chord a shape sounds
//! - `facgce extend <shape>` - suggest reachable extensions
//! - `facgce progression [shape]` - generate a progression around a shape
//! - `facgce shapes` - list the built-in voicing library
//! - `facgce play <shape> [--out file.wav]` - synthesize a strum
//! - `facgce serve` - run the chat-assistant proxy

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use facgce_synth::{render_strum, write_wav, AudioOutput};
use facgce_theory::{
    generate_progression, identify, note_name, suggest_extensions, Fretting, CHORD_LIBRARY,
    FACGCE,
};

#[derive(Parser)]
#[command(name = "facgce")]
#[command(about = "Chord explorer for open FACGCE tuning")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the chord a fret shape sounds
    Identify {
        /// Six fret tokens, low string first; x for muted (e.g. 0 0 0 2 0 0)
        #[arg(num_args = 1.., required = true)]
        shape: Vec<String>,
    },

    /// Suggest reachable extensions for a shape
    Extend {
        /// Six fret tokens, low string first; x for muted
        #[arg(num_args = 1.., required = true)]
        shape: Vec<String>,
    },

    /// Generate a progression around a shape (random pick without one)
    Progression {
        /// Optional six fret tokens; omit for a random progression
        #[arg(num_args = 0..)]
        shape: Vec<String>,

        /// Seed the random pick for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the built-in chord shape library
    Shapes,

    /// Synthesize a shape as a strummed pluck
    Play {
        /// Six fret tokens, low string first; x for muted
        #[arg(num_args = 1.., required = true)]
        shape: Vec<String>,

        /// Write a WAV file instead of playing through the audio device
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run the chat-assistant proxy
    Serve {
        /// HTTP port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Config file path (replaces local config discovery)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn parse_shape(tokens: &[String]) -> Result<Fretting> {
    tokens
        .join(" ")
        .parse::<Fretting>()
        .context("parsing fret shape")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Identify { shape } => {
            init_tracing("info");
            let fretting = parse_shape(&shape)?;
            print_analysis(&fretting);
        }

        Commands::Extend { shape } => {
            init_tracing("info");
            let fretting = parse_shape(&shape)?;
            print_analysis(&fretting);

            let suggestions = suggest_extensions(&FACGCE, &fretting);
            if suggestions.is_empty() {
                println!("\nNo extension suggestions for this shape.");
            } else {
                println!("\nExtensions:");
                for (i, s) in suggestions.iter().enumerate() {
                    println!(
                        "  {}. [{}] {} -> {}  ({})",
                        i + 1,
                        s.extension,
                        s.action,
                        s.chord,
                        s.fretting
                    );
                }
            }
        }

        Commands::Progression { shape, seed } => {
            init_tracing("info");
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let fretting = if shape.is_empty() {
                Fretting::MUTED
            } else {
                parse_shape(&shape)?
            };

            let generated = generate_progression(&mut rng, &FACGCE, &fretting);
            println!("{}  (key of {})", generated.name, generated.key);
            for step in &generated.steps {
                let marker = if step.is_user_chord { "  *your chord*" } else { "" };
                let hint = step
                    .hint
                    .as_deref()
                    .map(|h| format!("  [{}]", h))
                    .unwrap_or_default();
                println!(
                    "  {:<4} {:<10} {}{}{}",
                    step.degree.to_string(),
                    step.name,
                    step.frets,
                    hint,
                    marker
                );
            }
        }

        Commands::Shapes => {
            init_tracing("info");
            for shape in CHORD_LIBRARY {
                println!(
                    "  {:<8} {:<14} {}",
                    shape.name,
                    shape.frets.to_string(),
                    shape.description
                );
            }
        }

        Commands::Play { shape, out } => {
            init_tracing("info");
            let fretting = parse_shape(&shape)?;
            print_analysis(&fretting);

            let frequencies: Vec<f32> = fretting
                .strings()
                .enumerate()
                .filter_map(|(string, state)| {
                    state.fret().map(|fret| FACGCE.frequency_for_string(string, fret))
                })
                .collect();
            if frequencies.is_empty() {
                println!("\nNothing to play: every string is muted.");
                return Ok(());
            }

            let mut rng = StdRng::from_entropy();
            let buffer = render_strum(&frequencies, &mut rng);

            match out {
                Some(path) => {
                    write_wav(&path, &buffer)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("\nWrote {}", path.display());
                }
                None => {
                    let output = AudioOutput::new().context("opening audio output")?;
                    output.play(buffer).context("playing strum")?;
                }
            }
        }

        Commands::Serve { port, config } => {
            let (loaded, sources) =
                facgce_conf::load(config.as_deref()).context("loading configuration")?;
            init_tracing(&loaded.log_level);
            for file in &sources.files {
                info!(file = %file.display(), "loaded config file");
            }
            for var in &sources.env_overrides {
                info!(var, "applied environment override");
            }

            let serve_config = facgce_chat::ServeConfig {
                port: port.unwrap_or(loaded.chat.port),
                upstream: facgce_chat::UpstreamConfig {
                    base_url: loaded.chat.upstream_url,
                    model: loaded.chat.model,
                    max_tokens: loaded.chat.max_tokens,
                },
                rate_window: Duration::from_secs(loaded.chat.rate_window_secs),
                rate_max_requests: loaded.chat.rate_max_requests,
            };
            facgce_chat::run(serve_config).await?;
        }
    }

    Ok(())
}

fn print_analysis(fretting: &Fretting) {
    println!("Shape : {}", fretting);
    let notes = fretting.played_notes(&FACGCE);
    if notes.is_empty() {
        println!("Notes : (none)");
    } else {
        let names: Vec<&str> = notes.iter().map(|&pc| note_name(pc)).collect();
        println!("Notes : {}", names.join(" "));
    }
    println!("Chord : {}", identify(&FACGCE, fretting));
}
