use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use crossterm::style::Stylize;

use fnstatus_monitor::cli::{self, Invocation};
use fnstatus_monitor::config::{self, MonitorConfig};
use fnstatus_monitor::logging;
use fnstatus_monitor::module::fetcher::HttpFetcher;
use fnstatus_monitor::module::report::ReportAssembler;
use fnstatus_monitor::module::scheduled::{Monitor, RunMode, RunOutcome};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match config::read_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format!("Failed to load configuration: {:#}", e).red());
            return ExitCode::FAILURE;
        }
    };

    let (mode, warning) = match cli::parse_args(std::env::args_os(), config.default_interval_secs) {
        Invocation::Help(text) => {
            println!("{}", text);
            return ExitCode::SUCCESS;
        }
        Invocation::Run { mode, warning } => (mode, warning),
    };

    // Initialize logging
    let _logging_guard = logging::init_logging(&config.log_dir, "fnstatus", &config.log_level)
        .inspect_err(|e| eprintln!("Logging disabled: {:#}", e))
        .ok();

    tracing::info!("fnstatus starting ({:?})", mode);

    if let Some(warning) = warning {
        tracing::warn!("{}", warning);
        println!("{}", warning.as_str().yellow());
    }

    match run(config, mode).await {
        Ok(RunOutcome::Completed) => ExitCode::SUCCESS,
        Ok(RunOutcome::Interrupted) => {
            tracing::info!("Shutdown signal received.");
            println!("\n{}", "Monitoring stopped by user. Goodbye!".yellow());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Monitor failed: {:#}", e);
            println!("\n{}", format!("Unexpected error: {:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &MonitorConfig, mode: RunMode) -> anyhow::Result<RunOutcome> {
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let assembler = ReportAssembler::new(Arc::new(fetcher), config.clone());

    let mut monitor = Monitor::new(assembler, io::stdout());
    monitor.run(mode).await
}
