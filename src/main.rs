//! statusgrid demo — a simulated multi-module build driving the board.
//!
//! Stands in for a real host (a build-tool lifecycle listener): it shows
//! the module list, then a few producer threads walk their modules through
//! running, per-step activity, and a final status while the board repaints
//! cells in place. Without a usable terminal it falls back to plain output.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use color_eyre::Result;
use rand::Rng;
use statusgrid::{Dashboard, DashboardOptions, Item, Status};

const MODULES: [(&str, &str); 12] = [
    ("demo:api", "api"),
    ("demo:core", "core"),
    ("demo:cli", "cli"),
    ("demo:codec", "codec"),
    ("demo:transport", "transport"),
    ("demo:storage", "storage"),
    ("demo:metrics", "metrics"),
    ("demo:auth", "auth"),
    ("demo:gateway", "gateway"),
    ("demo:scheduler", "scheduler"),
    ("demo:docs", "docs"),
    ("demo:distribution", "distribution"),
];

const STEPS: [&str; 4] = ["resources", "compile", "test", "package"];

fn main() -> Result<()> {
    color_eyre::install()?;

    let Some(dashboard) = Dashboard::initialize(DashboardOptions::new().verbose(true)) else {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
        tracing::warn!("no usable terminal; falling back to plain output");
        return run_plain();
    };

    // Route log output through the stray sink so it never hits the grid.
    let sink = dashboard.stray_sink();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(move || sink.clone())
        .with_ansi(false)
        .init();

    let modules: Vec<Item> = MODULES
        .iter()
        .map(|(key, name)| Item::new(*key, *name))
        .collect();
    dashboard.show_items(modules.clone());
    tracing::info!(count = modules.len(), "simulated build started");

    let dashboard = Arc::new(dashboard);
    let mut producers = Vec::new();
    for chunk in modules.chunks(4).map(<[Item]>::to_vec) {
        let dash = Arc::clone(&dashboard);
        producers.push(thread::spawn(move || {
            let mut rng = rand::thread_rng();
            for module in chunk {
                dash.report_status(module.clone(), Status::Running);
                for step in STEPS {
                    dash.report_activity(module.clone(), step);
                    thread::sleep(Duration::from_millis(rng.gen_range(80..300)));
                }
                let status = match rng.gen_range(0..12) {
                    0 => Status::Failed,
                    1 => Status::Skipped,
                    _ => Status::Succeeded,
                };
                dash.report_status(module, status);
            }
        }));
    }
    for producer in producers {
        let _ = producer.join();
    }

    if let Ok(dashboard) = Arc::try_unwrap(dashboard) {
        dashboard.shutdown();
    }
    Ok(())
}

fn run_plain() -> Result<()> {
    for (_, name) in MODULES {
        println!("{name}: succeeded");
    }
    Ok(())
}
