use clap::{Parser, Subcommand, ValueEnum};
use rk_app::{AppResult, PlantReport, RankineConfig, SweepParameter, SweepResult};
use rk_core::UnitSystem;
use rk_results::ResultsTable;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "rk-cli")]
#[command(about = "Steady-state Rankine cycle solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the plant once
    Solve {
        /// Plant configuration YAML (defaults to the reference plant)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Units for the printed results
        #[arg(long, value_enum, default_value_t = Units::Engineering)]
        units: Units,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate structure and degrees of freedom without solving
    Check {
        /// Plant configuration YAML (defaults to the reference plant)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Solve over a range of one input
    Sweep {
        /// Input to vary, e.g. condenser_p or turbine_eta_s
        #[arg(long, value_parser = parse_param)]
        param: SweepParameter,
        #[arg(long)]
        from: f64,
        #[arg(long)]
        to: f64,
        #[arg(long, default_value_t = 5)]
        steps: usize,
        /// Solve points on independent networks in parallel
        #[arg(long)]
        parallel: bool,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Units {
    Si,
    Engineering,
}

impl Units {
    fn system(self) -> UnitSystem {
        match self {
            Units::Si => UnitSystem::si(),
            Units::Engineering => UnitSystem::engineering(),
        }
    }
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            units,
            json,
            output,
        } => cmd_solve(config.as_deref(), units.system(), json, output.as_deref()),
        Commands::Check { config } => cmd_check(config.as_deref()),
        Commands::Sweep {
            param,
            from,
            to,
            steps,
            parallel,
            config,
        } => cmd_sweep(config.as_deref(), param, from, to, steps, parallel),
    }
}

fn parse_param(s: &str) -> Result<SweepParameter, String> {
    s.parse().map_err(|e: rk_app::AppError| e.to_string())
}

fn load_config(path: Option<&Path>) -> AppResult<RankineConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading plant configuration");
            RankineConfig::load(path)
        }
        None => Ok(RankineConfig::default()),
    }
}

fn cmd_solve(
    config: Option<&Path>,
    units: UnitSystem,
    json: bool,
    output: Option<&Path>,
) -> AppResult<()> {
    let config = load_config(config)?;
    let report = rk_app::run(&config);

    let text = if json {
        report.to_json(&units)?
    } else {
        render_report(&report, &units)
    };
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            println!("✓ Report written to {}", path.display());
        }
        None => print!("{}", text),
    }

    // Non-converged solves exit with the status as the error
    report.snapshot()?;
    Ok(())
}

fn cmd_check(config: Option<&Path>) -> AppResult<()> {
    let config = load_config(config)?;
    let ledger = rk_app::check(&config)?;
    println!("{}", ledger);
    println!("✓ Plant is well posed");
    Ok(())
}

fn cmd_sweep(
    config: Option<&Path>,
    param: SweepParameter,
    from: f64,
    to: f64,
    steps: usize,
    parallel: bool,
) -> AppResult<()> {
    let config = load_config(config)?;
    let result = rk_app::sweep_range(&config, param, from, to, steps, parallel)?;
    print_sweep(&result);
    Ok(())
}

fn render_report(report: &PlantReport, units: &UnitSystem) -> String {
    let mut out = format!("Status: {}\n", report.status);
    if let Some(err) = &report.error {
        out.push_str(&format!("  {}\n", err));
    }
    if let Ok(table) = report.table(units) {
        out.push_str(&render_table(&table));
    }
    if let Some(s) = &report.summary {
        let p = |w: f64| units.power_from_si(w);
        let sym = units.power.symbol();
        out.push_str("\nPlant summary:\n");
        out.push_str(&format!("  Turbine power:   {:>12.3} {}\n", p(s.turbine_power_w), sym));
        out.push_str(&format!("  Pump power:      {:>12.3} {}\n", p(s.pump_power_w), sym));
        out.push_str(&format!("  Boiler heat:     {:>12.3} {}\n", p(s.boiler_heat_w), sym));
        out.push_str(&format!("  Condenser heat:  {:>12.3} {}\n", p(s.condenser_heat_w), sym));
        out.push_str(&format!("  Net power:       {:>12.3} {}\n", p(s.net_power_w), sym));
        out.push_str(&format!("  Efficiency:      {:>12.4}\n", s.thermal_efficiency));
        out.push_str(&format!("  Energy balance:  {:>12.3e} W\n", s.energy_balance_w));
        out.push_str(&format!(
            "  Iterations: {}, solve time {:.3}s\n",
            report.timing.iterations, report.timing.solve_time_s
        ));
    }
    out
}

fn render_table(table: &ResultsTable) -> String {
    let u = &table.units;
    let mut out = format!(
        "\n{:>5} {:>12} {:>12} {:>12} {:>12}  phase\n",
        "conn",
        "m [kg/s]",
        format!("p [{}]", u.pressure.symbol()),
        format!("T [{}]", u.temperature.symbol()),
        format!("h [{}]", u.enthalpy.symbol()),
    );
    for c in &table.connections {
        out.push_str(&format!(
            "{:>5} {:>12.3} {:>12.4} {:>12.3} {:>12.3}  {}\n",
            c.label, c.m, c.p, c.t, c.h, c.phase
        ));
    }
    out.push('\n');
    for c in &table.components {
        let value = match (c.power, c.heat_duty) {
            (Some(p), _) => format!("P = {:.3} {}", p, u.power.symbol()),
            (None, Some(q)) => format!("Q = {:.3} {}", q, u.power.symbol()),
            (None, None) => continue,
        };
        out.push_str(&format!("  {:<22} {}\n", c.name, value));
    }
    out
}

fn print_sweep(result: &SweepResult) {
    println!(
        "{:>14} {:>24} {:>14} {:>12}",
        result.parameter.name(),
        "status",
        "net [MW]",
        "efficiency"
    );
    for point in &result.points {
        match &point.report.summary {
            Some(s) => println!(
                "{:>14.5} {:>24} {:>14.3} {:>12.5}",
                point.value,
                point.report.status.to_string(),
                s.net_power_w / 1.0e6,
                s.thermal_efficiency
            ),
            None => println!(
                "{:>14.5} {:>24} {:>14} {:>12}",
                point.value,
                point.report.status.to_string(),
                "-",
                "-"
            ),
        }
    }
    println!(
        "✓ {} of {} points converged",
        result.converged_count(),
        result.points.len()
    );
}
