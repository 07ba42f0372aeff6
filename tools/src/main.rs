//! insight-runner: headless retention dashboard for PC방 customer data.
//!
//! Usage:
//!   insight-runner --data data/sample/customers.json --target-day 10
//!   insight-runner --synthetic 5000 --seed 42 --db insight.db
//!   insight-runner --synthetic 5000 --ipc-mode

use anyhow::Result;
use insight_core::{
    config::InsightConfig,
    engine::{DashboardSnapshot, InsightEngine},
    error::InsightError,
    filter::CustomerFilter,
    loader::load_customers_json,
    population::PopulationGenerator,
    store::{InsightStore, MarketingNote, TargetingConfig},
    types::DEFAULT_USER,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Simulate {
        target_day: f64,
    },
    SetFilter {
        #[serde(default)]
        filter: CustomerFilter,
    },
    GetTargeting,
    SetTargeting {
        target_region: String,
        target_age: String,
    },
    AddNote {
        content: String,
    },
    ListNotes,
    DeleteNote {
        id: String,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    target_day: f64,
    targeting: TargetingConfig,
    notes: Vec<MarketingNote>,
    #[serde(flatten)]
    snapshot: &'a DashboardSnapshot,
}

/// What the operator is currently looking at.
struct View {
    filter: CustomerFilter,
    target_day: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let synthetic = parse_arg(&args, "--synthetic", 0usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data = string_arg(&args, "--data");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");

    let config = InsightConfig::load(data_dir)?;
    let target_day = parse_arg(&args, "--target-day", config.simulator.default_target_day);

    if !ipc_mode {
        println!("PC방 Retention Insight: insight-runner");
        println!("  data:       {}", data.unwrap_or("-"));
        println!("  synthetic:  {synthetic}");
        println!("  seed:       {seed}");
        println!("  db:         {db}");
        println!("  data_dir:   {data_dir}");
        println!("  target_day: {target_day}");
        println!();
    }

    let store = InsightStore::open(db)?;
    store.migrate()?;

    let mut engine = InsightEngine::build(config, store)?;

    if let Some(path) = data {
        let customers = load_customers_json(path)?;
        engine.import_customers(customers)?;
    } else if synthetic > 0 {
        let customers = PopulationGenerator::new(seed).generate(synthetic);
        engine.import_customers(customers)?;
    } else if engine.customers().is_empty() {
        log::warn!("no --data or --synthetic given and {db} holds no customers");
    }

    let mut view = View {
        filter: CustomerFilter::all(),
        target_day: engine.config.clamp_target_day(target_day),
    };

    if ipc_mode {
        run_ipc_loop(&engine, &mut view)?;
    } else {
        print_summary(&engine, &view)?;
    }

    Ok(())
}

fn run_ipc_loop(engine: &InsightEngine, view: &mut View) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        match handle_command(engine, view, cmd) {
            Ok(reply) => writeln!(stdout, "{reply}")?,
            // Operator mistakes are reported on the stream; storage failures end the loop.
            Err(e @ (InsightError::EmptyNote | InsightError::NoteNotFound { .. })) => {
                write_error(&mut stdout, &e.to_string())?;
            }
            Err(e) => return Err(e.into()),
        }
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(
    engine: &InsightEngine,
    view: &mut View,
    cmd: IpcCommand,
) -> Result<serde_json::Value, InsightError> {
    match cmd {
        IpcCommand::GetState | IpcCommand::Quit => {}
        IpcCommand::Simulate { target_day } => {
            view.target_day = engine.config.clamp_target_day(target_day);
        }
        IpcCommand::SetFilter { filter } => {
            view.filter = filter;
        }
        IpcCommand::GetTargeting => {
            return Ok(serde_json::to_value(engine.targeting(DEFAULT_USER)?)?);
        }
        IpcCommand::SetTargeting { target_region, target_age } => {
            let saved = engine.set_targeting(&TargetingConfig {
                user_id: DEFAULT_USER.to_string(),
                target_region,
                target_age,
            })?;
            view.filter = engine.targeting_filter(&saved);
        }
        IpcCommand::AddNote { content } => {
            return Ok(serde_json::to_value(engine.add_note(&content)?)?);
        }
        IpcCommand::ListNotes => {
            return Ok(serde_json::to_value(engine.notes()?)?);
        }
        IpcCommand::DeleteNote { id } => {
            engine.delete_note(&id)?;
            return Ok(serde_json::json!({ "deleted": id }));
        }
    }
    build_ui_state(engine, view)
}

fn build_ui_state(engine: &InsightEngine, view: &View) -> Result<serde_json::Value, InsightError> {
    let snapshot = engine.snapshot(&view.filter, view.target_day);
    let state = UiState {
        target_day: view.target_day,
        targeting: engine.targeting(DEFAULT_USER)?,
        notes: engine.notes()?,
        snapshot: &snapshot,
    };
    Ok(serde_json::to_value(&state)?)
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> io::Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{err_json}")?;
    stdout.flush()
}

fn print_summary(engine: &InsightEngine, view: &View) -> Result<()> {
    let snap = engine.snapshot(&view.filter, view.target_day);

    println!("=== RETENTION SUMMARY ===");
    println!("  customers:        {}", snap.total_customers);
    println!("  retained (90d):   {}", snap.baseline.retained_customers);
    println!("  retention rate:   {:.1}%", snap.overall_retention_pct);
    println!("  avg rev/retained: {:.0}원", snap.baseline.avg_revenue_per_retained);
    println!("  churn risk:       {}", snap.churn_risk.total);

    println!();
    println!("=== RETENTION BY VISIT DAYS ===");
    for row in &snap.bucket_rows {
        println!("  {:<8} {:>6.1}%  ({} customers)", row.label, row.retention_pct, row.customers);
    }

    println!();
    println!("=== WHAT-IF (target {:.1} days) ===", snap.simulation.target_day);
    println!("  simulated rate:   {:.1}%", snap.simulation.simulated_rate * 100.0);
    println!("  rate change:      {:+.1}%p", snap.simulation.rate_change_pct);
    println!("  revenue change:   {:+.0}원", snap.simulation.revenue_change);

    println!();
    println!("=== TOP REGIONS ===");
    if snap.regions.is_empty() {
        println!("  (No customers)");
    } else {
        for r in &snap.regions {
            println!("  {:<6} {:>6.1}%  ({} customers)", r.label, r.retention_pct, r.customers);
        }
    }

    let notes = engine.notes()?;
    if !notes.is_empty() {
        println!();
        println!("=== MARKETING NOTES ===");
        for n in notes {
            println!("  {} | {}", n.created_at.format("%Y-%m-%d %H:%M"), n.content);
        }
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
