//! Poll loop - runs report cycles once or on an interval
//!
//! The loop owns the [`MonitorState`] and is the only thing that touches it.
//! Every suspension point (a cycle in flight, the sleep between cycles)
//! races against the shutdown signal.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use anyhow::Context;

use super::renderer::TerminalRenderer;
use super::report::ReportAssembler;
use super::status::MonitorState;

/// Intervals below this are raised to it
pub const MIN_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One cycle, no screen clear or footer
    Once,
    /// Cycle forever, sleeping `interval` in between
    Continuous { interval: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// Shutdown signal arrived during a cycle or the sleep
    Interrupted,
}

pub struct Monitor<W: Write> {
    assembler: ReportAssembler,
    renderer: TerminalRenderer<W>,
    state: MonitorState,
}

impl<W: Write> Monitor<W> {
    pub fn new(assembler: ReportAssembler, out: W) -> Self {
        Self {
            assembler,
            renderer: TerminalRenderer::new(out),
            state: MonitorState::new(),
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn into_output(self) -> W {
        self.renderer.into_inner()
    }

    /// Run until done or Ctrl+C.
    pub async fn run(&mut self, mode: RunMode) -> anyhow::Result<RunOutcome> {
        self.run_until(mode, ctrl_c()).await
    }

    /// Run until done or `shutdown` resolves.
    ///
    /// Errors only come from writing the report; fetch failures are part of
    /// the report itself.
    pub async fn run_until<F>(&mut self, mode: RunMode, shutdown: F) -> anyhow::Result<RunOutcome>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        match mode {
            RunMode::Once => tracing::info!("Running a single status check"),
            RunMode::Continuous { interval } => {
                tracing::info!("Monitoring every {} seconds", interval.as_secs())
            }
        }

        loop {
            if matches!(mode, RunMode::Continuous { .. }) {
                self.renderer.clear_screen().context("Failed to clear screen")?;
            }

            let report = tokio::select! {
                biased;
                _ = &mut shutdown => return Ok(RunOutcome::Interrupted),
                report = self.assembler.run_cycle(&mut self.state) => report,
            };

            self.renderer.report(&report).context("Failed to write report")?;

            let RunMode::Continuous { interval } = mode else {
                return Ok(RunOutcome::Completed);
            };

            self.renderer
                .footer(&report.generated_at, interval.as_secs())
                .context("Failed to write footer")?;

            tokio::select! {
                biased;
                _ = &mut shutdown => return Ok(RunOutcome::Interrupted),
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
