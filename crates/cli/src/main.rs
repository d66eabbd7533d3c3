#![deny(unsafe_code)]
//! CLI binary for the flow-field sketch.
//!
//! Subcommands:
//! - `render` runs a sketch for N frames and writes a PNG
//! - `replay <seed.json>` re-renders a saved run
//! - `list` prints available engines and their parameters

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use flowfield_core::{BlendMode, Seed, Srgb};
use flowfield_engines::render::render;
use flowfield_engines::snapshot::write_png;
use flowfield_engines::EngineKind;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "flowfield", about = "Perlin flow-field particle sketch")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a sketch for N frames and write the accumulated canvas as PNG.
    Render {
        /// Engine name.
        #[arg(short, long, default_value = "flow-field")]
        engine: String,

        /// Canvas width in pixels.
        #[arg(short = 'W', long, default_value_t = 800)]
        width: usize,

        /// Canvas height in pixels.
        #[arg(short = 'H', long, default_value_t = 800)]
        height: usize,

        /// Number of frames to draw.
        #[arg(short, long, default_value_t = 300)]
        frames: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Background color as hex.
        #[arg(long, default_value = "#ffffff")]
        background: String,

        /// Compositing mode (normal, additive).
        #[arg(long, default_value = "normal")]
        blend: String,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Engine parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Also write the run description to this JSON file.
        #[arg(long)]
        save_seed: Option<PathBuf>,
    },
    /// Re-render a run from a saved seed file.
    Replay {
        /// Seed file written by `render --save-seed`.
        seed_file: PathBuf,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Background color as hex.
        #[arg(long, default_value = "#ffffff")]
        background: String,

        /// Compositing mode (normal, additive).
        #[arg(long, default_value = "normal")]
        blend: String,
    },
    /// List available engines and their parameter schemas.
    List,
}

fn parse_blend(name: &str) -> Result<BlendMode, CliError> {
    BlendMode::from_name(name).ok_or_else(|| {
        CliError::Input(format!(
            "unknown blend mode '{name}' (expected normal or additive)"
        ))
    })
}

/// Renders the run a seed describes and writes the PNG.
fn render_seed(
    seed: &Seed,
    background: Srgb,
    blend: BlendMode,
    output: &Path,
) -> Result<(), CliError> {
    let mut engine = EngineKind::from_seed(seed)?;
    let canvas = render(&mut engine, seed.frames, background, blend)?;
    write_png(&canvas, output)?;
    Ok(())
}

fn report(json: bool, seed: &Seed, output: &Path) -> Result<(), CliError> {
    if json {
        let info = serde_json::json!({
            "engine": seed.engine,
            "width": seed.width,
            "height": seed.height,
            "frames": seed.frames,
            "seed": seed.seed,
            "params": seed.params,
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {} ({}x{}, {} frames, seed {}) -> {}",
            seed.engine,
            seed.width,
            seed.height,
            seed.frames,
            seed.seed,
            output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let engines = EngineKind::list_engines();
            if cli.json {
                let mut schemas = serde_json::Map::new();
                for name in engines {
                    schemas.insert(name.to_string(), EngineKind::schema_for(name)?);
                }
                let info = serde_json::json!({ "engines": schemas });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Engines:");
                for name in engines {
                    println!("  {name}");
                    let schema = EngineKind::schema_for(name)?;
                    if let Some(params) = schema.as_object() {
                        for (key, spec) in params {
                            println!(
                                "    {key:<22} default {:<8} {}",
                                spec["default"],
                                spec["description"].as_str().unwrap_or_default()
                            );
                        }
                    }
                }
            }
        }
        Command::Render {
            engine,
            width,
            height,
            frames,
            seed,
            background,
            blend,
            output,
            params,
            save_seed,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            if !params.is_object() {
                return Err(CliError::Input("--params must be a JSON object".into()));
            }
            let background = Srgb::from_hex(&background)?;
            let blend = parse_blend(&blend)?;

            let mut run_seed = Seed::new(&engine, width, height, seed);
            run_seed.params = params;
            run_seed.frames = frames;

            render_seed(&run_seed, background, blend, &output)?;
            if let Some(path) = &save_seed {
                run_seed.save(path)?;
            }
            report(cli.json, &run_seed, &output)?;
        }
        Command::Replay {
            seed_file,
            output,
            background,
            blend,
        } => {
            let run_seed = Seed::load(&seed_file)?;
            let background = Srgb::from_hex(&background)?;
            let blend = parse_blend(&blend)?;
            render_seed(&run_seed, background, blend, &output)?;
            report(cli.json, &run_seed, &output)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn render_defaults_match_the_classic_sketch() {
        let cli = Cli::try_parse_from(["flowfield", "render"]).unwrap();
        match cli.command {
            Command::Render {
                engine,
                width,
                height,
                frames,
                seed,
                background,
                blend,
                ..
            } => {
                assert_eq!(engine, "flow-field");
                assert_eq!((width, height), (800, 800));
                assert_eq!(frames, 300);
                assert_eq!(seed, 42);
                assert_eq!(background, "#ffffff");
                assert_eq!(blend, "normal");
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn parse_blend_rejects_unknown_modes() {
        assert_eq!(parse_blend("additive").unwrap(), BlendMode::Additive);
        assert_eq!(parse_blend("screen").unwrap_err().exit_code(), 12);
    }

    #[test]
    fn render_seed_writes_png_and_replay_matches() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.png");
        let second = dir.path().join("b.png");
        let seed_path = dir.path().join("run.json");

        let mut seed = Seed::new("flow-field", 120, 80, 5);
        seed.params = serde_json::json!({"particle_count": 100});
        seed.frames = 15;
        render_seed(&seed, Srgb::WHITE, BlendMode::Normal, &first).unwrap();
        seed.save(&seed_path).unwrap();

        let loaded = Seed::load(&seed_path).unwrap();
        render_seed(&loaded, Srgb::WHITE, BlendMode::Normal, &second).unwrap();

        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }

    #[test]
    fn malformed_seed_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, "not json").unwrap();
        let err = CliError::from(Seed::load(&path).unwrap_err());
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn render_seed_unknown_engine_is_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let seed = Seed::new("gray-scott", 100, 100, 1);
        let err = render_seed(&seed, Srgb::WHITE, BlendMode::Normal, &dir.path().join("x.png"))
            .unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }
}
