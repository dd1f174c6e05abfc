use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "choreo", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a scene JSON for structural errors.
    Validate(ValidateArgs),
    /// Run a scene headlessly for N frames and print a state digest.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of frames to run.
    #[arg(long, default_value_t = 300)]
    frames: u64,

    /// Simulated frame rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Wheel delta (px) fed before the first frame.
    #[arg(long, default_value_t = 0.0)]
    wheel: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_scene_json(path: &Path) -> anyhow::Result<choreo::SceneDef> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let r = BufReader::new(f);
    let scene: choreo::SceneDef = serde_json::from_reader(r).with_context(|| "parse scene JSON")?;
    Ok(scene)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let scene = read_scene_json(&args.in_path)?;
    scene.validate()?;
    eprintln!(
        "ok: {} elements, {} stagger groups",
        scene.elements.len(),
        scene.staggers.len()
    );
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.fps > 0.0, "fps must be positive");
    let scene = read_scene_json(&args.in_path)?;
    let mut engine = choreo::build_scene(&scene)?;

    if args.wheel != 0.0 {
        engine.handle_input(choreo::InputEvent::Wheel {
            delta_y: args.wheel,
        });
    }

    let dt = 1.0 / args.fps;
    let mut digest = 0u64;
    let mut writes = 0usize;
    for _ in 0..args.frames {
        let stats = engine.frame(dt)?;
        writes += stats.writes;
        let bytes = serde_json::to_vec(&engine.store().snapshot())?;
        digest ^= digest_u64(&bytes);
    }

    eprintln!(
        "{} frames at {} fps, {} property writes, final offset {:.3}",
        args.frames,
        args.fps,
        writes,
        engine.scroll_state().virtual_offset
    );
    println!("{digest}");
    Ok(())
}

fn mix64(mut z: u64) -> u64 {
    // SplitMix64 mixing function.
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}
