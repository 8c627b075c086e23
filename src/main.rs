//! Home energy simulator entry point: CLI wiring and season comparison.

use std::path::{Path, PathBuf};
use std::process;

use home_energy_sim::config::ScenarioConfig;
use home_energy_sim::io::export::export_csv;
use home_energy_sim::profile::load_or_fallback;
use home_energy_sim::sim::kpi::ScenarioReport;
use home_energy_sim::sim::types::{Season, SimulationHistory};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    days_override: Option<usize>,
    profile_override: Option<PathBuf>,
    telemetry_out: Option<String>,
}

fn print_help() {
    eprintln!("home-energy-sim: winter vs summer solar + battery energy balance");
    eprintln!();
    eprintln!("Usage: home-energy-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --days <n>               Override number of simulated days");
    eprintln!("  --profile <path>         CSV of sub-daily readings for the hourly profile");
    eprintln!("  --telemetry-out <path>   Export hourly histories to CSV");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostic output on stderr.");
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn next_value<'a>(args: &'a [String], i: usize, flag: &str, what: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v.as_str(),
        None => fail(&format!("{flag} requires {what}")),
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        days_override: None,
        profile_override: None,
        telemetry_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                cli.scenario_path = Some(next_value(&args, i, "--scenario", "a path argument").to_string());
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(next_value(&args, i, "--preset", "a name argument").to_string());
            }
            "--seed" => {
                i += 1;
                let raw = next_value(&args, i, "--seed", "a u64 argument");
                match raw.parse::<u64>() {
                    Ok(s) => cli.seed_override = Some(s),
                    Err(_) => fail(&format!("--seed value \"{raw}\" is not a valid u64")),
                }
            }
            "--days" => {
                i += 1;
                let raw = next_value(&args, i, "--days", "a day count");
                match raw.parse::<usize>() {
                    Ok(d) => cli.days_override = Some(d),
                    Err(_) => fail(&format!("--days value \"{raw}\" is not a valid day count")),
                }
            }
            "--profile" => {
                i += 1;
                cli.profile_override =
                    Some(PathBuf::from(next_value(&args, i, "--profile", "a path argument")));
            }
            "--telemetry-out" => {
                i += 1;
                cli.telemetry_out =
                    Some(next_value(&args, i, "--telemetry-out", "a path argument").to_string());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.scenario_path.is_some() && cli.preset.is_some() {
        fail("--scenario and --preset are mutually exclusive; choose one source");
    }

    cli
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = parse_args();

    // --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        ScenarioConfig::from_toml_file(Path::new(path)).unwrap_or_else(|e| fail(&e.to_string()))
    } else if let Some(ref name) = cli.preset {
        ScenarioConfig::from_preset(name).unwrap_or_else(|e| fail(&e.to_string()))
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = Some(seed);
    }
    if let Some(days) = cli.days_override {
        scenario.simulation.days = days;
    }
    if let Some(path) = cli.profile_override {
        scenario.profile.path = Some(path);
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // The profile is estimated once and shared by both seasons.
    let profile = load_or_fallback(scenario.profile.path.as_deref());

    let mut runs: Vec<(Season, SimulationHistory)> = Vec::with_capacity(Season::ALL.len());
    for season in Season::ALL {
        let sim = scenario
            .build_scenario(season, profile)
            .unwrap_or_else(|e| fail(&e.to_string()));
        info!(%season, seed = ?scenario.seed_for(season), "running season");
        let history = match scenario.seed_for(season) {
            Some(seed) => sim.run_seeded(seed),
            None => sim.run_unseeded(),
        };

        let report = ScenarioReport::from_history(
            &history,
            scenario.battery.capacity_kwh,
            scenario.battery.initial_level_kwh,
        );
        println!("--- {} ---", season.as_str().to_uppercase());
        println!("{report}\n");

        runs.push((season, history));
    }

    if let Some(ref path) = cli.telemetry_out {
        let borrowed: Vec<(Season, &SimulationHistory)> =
            runs.iter().map(|(season, h)| (*season, h)).collect();
        if let Err(e) = export_csv(&borrowed, Path::new(path)) {
            fail(&format!("failed to write CSV: {e}"));
        }
        eprintln!("Telemetry written to {path}");
    }
}
