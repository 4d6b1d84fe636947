//! Progression balance simulator CLI.
//!
//! Run Monte Carlo simulations to analyze XP pacing and encounter mix.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                    # Default: 200 runs to level 30
//!   cargo run --bin simulate -- -n 100 -l 10   # 100 runs to level 10
//!   cargo run --bin simulate -- --seed 42      # Reproducible run

use ascend::build_info::version_line;
use ascend::core::EngineConfig;
use ascend::passives::PlayerClass;
use ascend::persistence::save_json;
use ascend::simulator::{run_simulation, SimConfig};
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ascend=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let (config, show_level_curve) = parse_args(&args);

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              ASCEND PROGRESSION SIMULATOR                     ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Target Level:   {}", config.target_level);
    println!("  Class:          {}", config.class.name());
    println!("  Auto Allocate:  {}", config.auto_allocate);
    println!("  Max Kills:      {}", config.max_kills_per_run);
    if config.boss_interval > 0 {
        println!("  Boss Every:     {} kills", config.boss_interval);
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config);

    println!("{}", report.to_text());

    if show_level_curve {
        println!("{}", report.level_curve_text());
    }

    if args.iter().any(|a| a == "--json") {
        let filename = PathBuf::from(format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        ));
        match save_json(&filename, &report) {
            Ok(()) => println!("JSON report saved to: {}", filename.display()),
            Err(e) => tracing::error!(path = %filename.display(), error = %e, "failed to write JSON report"),
        }
    }
}

fn parse_args(args: &[String]) -> (SimConfig, bool) {
    let mut config = SimConfig::default();
    let mut show_level_curve = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "-l" | "--level" => {
                if i + 1 < args.len() {
                    config.target_level = args[i + 1].parse().unwrap_or(30);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-k" | "--kills" => {
                if i + 1 < args.len() {
                    config.max_kills_per_run = args[i + 1].parse().unwrap_or(50_000);
                    i += 1;
                }
            }
            "-b" | "--boss-every" => {
                if i + 1 < args.len() {
                    config.boss_interval = args[i + 1].parse().unwrap_or(250);
                    i += 1;
                }
            }
            "--class" => {
                if i + 1 < args.len() {
                    config.class = PlayerClass::parse(&args[i + 1]);
                    if config.class == PlayerClass::None {
                        tracing::warn!(class = %args[i + 1], "unknown class, running without a tree");
                    }
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config.engine = load_engine_config(Path::new(&args[i + 1]));
                    i += 1;
                }
            }
            "--save" => {
                config.save_last_run = true;
            }
            "--save-dir" => {
                if i + 1 < args.len() {
                    config.engine.save_directory = Some(PathBuf::from(&args[i + 1]));
                    config.save_last_run = true;
                    i += 1;
                }
            }
            "--no-allocate" => {
                config.auto_allocate = false;
            }
            "--level-curve" => {
                show_level_curve = true;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "--version" => {
                println!("{} simulate", version_line());
                std::process::exit(0);
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => {
                config = SimConfig::quick(10);
            }
            "--full" => {
                config = SimConfig::full_progression();
            }
            "--encounters" => {
                config = SimConfig::encounter_analysis(500);
            }
            _ => {}
        }
        i += 1;
    }

    (config, show_level_curve)
}

fn load_engine_config(path: &Path) -> EngineConfig {
    match EngineConfig::load_from_file(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "could not load engine config, using defaults");
            EngineConfig::default()
        }
    }
}

fn print_help() {
    println!("Ascend Progression Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>        Number of simulation runs (default: 200)");
    println!("    -l, --level <L>       Target player level (default: 30)");
    println!("    -s, --seed <S>        Random seed for reproducibility");
    println!("    -k, --kills <K>       Max kills per run (default: 50,000)");
    println!("    -b, --boss-every <B>  Spawn a boss every B kills, 0 disables (default: 250)");
    println!("    --class <NAME>        Melee, Ranged, Magic or Summoner (default: Melee)");
    println!("    --config <PATH>       Load engine tunables from a JSON file");
    println!("    --save                Save the last run's world and player to the data directory");
    println!("    --save-dir <PATH>     Save the last run into PATH instead");
    println!("    --no-allocate         Never spend passive points");
    println!("    --level-curve         Show detailed level-up pacing");
    println!("    -v, --verbose         Log every run");
    println!("    --json                Save JSON report");
    println!("    --quick               Quick test (50 runs to level 10)");
    println!("    --full                Full test (20 runs to the level cap)");
    println!("    --encounters          Many short runs for rarity and modifier stats");
    println!("    --version             Print build information");
    println!("    -h, --help            Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate                       # Default run");
    println!("    cargo run --bin simulate -- -n 100 -l 10      # 100 runs to level 10");
    println!("    cargo run --bin simulate -- --seed 42         # Reproducible");
    println!("    cargo run --bin simulate -- --class Magic     # Mage tree");
    println!("    cargo run --bin simulate -- --full --level-curve");
}
