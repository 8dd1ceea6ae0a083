//! Demo binary for the RepLen activation engine.
//!
//! This is the main entry point that wires together the activation
//! scheduler, the intent store with its settlement executor, and the
//! console display sink. It loads configuration, registers a demo intent,
//! drives one activation run to completion, and reports what settled.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `replen-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the validated activation schedule
//! 4. Register the demo intent and spawn the settlement executor
//! 5. Run the activation loop with the console sink
//! 6. Log the run result, stop the executor, and report store status

mod console;
mod error;

use std::path::Path;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use replen_core::config::DemoConfig;
use replen_core::runner::{self, RunControls, RunEndReason};
use replen_core::scheduler::ActivationScheduler;
use replen_intents::{ExecutorControls, IntentStore, LogSettlement};
use replen_types::{IntentAction, LpIntent};

use crate::console::ConsoleSink;
use crate::error::EngineError;

/// Application entry point for the demo engine.
///
/// Initializes all subsystems, runs one activation simulation, and
/// settles the demo intent. Returns an error code on failure.
///
/// # Errors
///
/// Returns an error if configuration or schedule validation fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = Path::new("replen-config.yaml");
    let (config, config_found) = if config_path.exists() {
        (DemoConfig::from_file(config_path).map_err(EngineError::from)?, true)
    } else {
        (DemoConfig::default(), false)
    };

    // 2. Initialize structured logging. RUST_LOG overrides the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("replen-engine starting");
    if config_found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!("Config file not found, using defaults");
    }
    info!(
        amount = config.demo.amount,
        delay_blocks = config.demo.delay_blocks,
        smoothing_blocks = config.demo.smoothing_blocks,
        tick_interval_ms = config.engine.tick_interval_ms,
        settle_interval_ms = config.engine.settle_interval_ms,
        "Demo parameters"
    );

    // 3. Build the validated schedule. Bad configuration surfaces here,
    //    before anything starts.
    let schedule = config.demo_schedule().map_err(EngineError::from)?;
    let mut scheduler = ActivationScheduler::new(schedule);
    info!("Activation scheduler initialized");

    // 4. Register the demo intent and spawn the settlement executor.
    //    The intent becomes executable once the delay period has elapsed
    //    in wall-clock terms.
    let store = Arc::new(IntentStore::new());
    let delay_ms = config
        .demo
        .delay_blocks
        .checked_mul(config.engine.tick_interval_ms)
        .unwrap_or(u64::MAX);
    let execute_at =
        Utc::now() + Duration::milliseconds(i64::try_from(delay_ms).unwrap_or(i64::MAX));
    let intent_id = store
        .register(LpIntent::new(
            IntentAction::AddLiquidity,
            "0xd3m0000000000000000000000000000000000001",
            "ETH/USDC",
            Decimal::from(config.demo.amount),
            "0xd3m0000000000000000000000000000000000001",
            execute_at,
        ))
        .await;

    let executor_controls = Arc::new(ExecutorControls::new(config.engine.settle_interval_ms));
    let executor_handle = tokio::spawn(replen_intents::run_executor(
        Arc::clone(&store),
        LogSettlement,
        Arc::clone(&executor_controls),
    ));
    info!(intent_id = %intent_id, "Demo intent registered, settlement executor running");

    // 5. Run the activation simulation.
    let run_controls = Arc::new(RunControls::new(config.engine.tick_interval_ms));
    let mut sink = ConsoleSink::new();
    let result = runner::run_activation(&mut scheduler, &run_controls, &mut sink).await;

    // 6. Log the result and shut the executor down.
    match result.end_reason {
        RunEndReason::Completed => info!(total_ticks = result.total_ticks, "Run completed"),
        RunEndReason::Cancelled => info!(total_ticks = result.total_ticks, "Run cancelled"),
        RunEndReason::StartRejected => info!("Run rejected, scheduler already busy"),
    }
    if let Some(snapshot) = result.final_snapshot {
        info!(
            status = %replen_core::format::phase_label(&snapshot),
            active = %replen_core::format::format_usd(snapshot.active_amount),
            "Final activation state"
        );
    }

    executor_controls.request_stop();
    let total_settled = executor_handle.await.map_err(|e| EngineError::Executor {
        message: format!("{e}"),
    })?;

    let status = store.status(Utc::now()).await;
    info!(
        total_settled,
        executed = status.executed,
        failed = status.failed,
        ready_pending = status.ready_pending,
        "replen-engine shutdown complete"
    );

    Ok(())
}
