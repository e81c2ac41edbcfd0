//! Terminal presentation of a [`CycleReport`]

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::{StyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use fnstatus_common::Impact;

use super::fetcher::ProbeStatus;
use super::report::{
    AntiCheatReport, ApiHealth, ComponentRow, ComponentsOverview, CycleReport, FreeGamesReport,
    IncidentReport, Section, SystemStatus,
};
use super::status::{OverallHealth, Tier};
use crate::error::FetchError;

const RULE_WIDTH: usize = 70;
const LABEL_WIDTH: usize = 25;
const COMPONENT_WIDTH: usize = 35;
/// Operational components are listed by name up to this many
const OPERATIONAL_LIST_MAX: usize = 5;
const OPERATIONAL_PREVIEW: usize = 3;

const BANNER: &str = "\
╔══════════════════════════════════════════════════════════════════╗
║                    EPIC GAMES STATUS MONITOR                       ║
║        Status • Incidents • EAC • Free Games • API Health          ║
╚══════════════════════════════════════════════════════════════════╝";

/// Display label for a tier, colored by severity
pub fn tier_label(tier: Tier) -> StyledContent<&'static str> {
    match tier {
        Tier::Operational => "OPERATIONAL".green(),
        Tier::DegradedPerformance => "DEGRADED PERFORMANCE".yellow(),
        Tier::PartialOutage => "*** WARNING: PARTIAL OUTAGE ***".red(),
        Tier::MajorOutage => "*** CRITICAL: MAJOR OUTAGE ***".red(),
        Tier::UnderMaintenance => "MAINTENANCE".cyan(),
        Tier::Unknown => "UNKNOWN STATUS".magenta(),
    }
}

fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Writes reports to any [`Write`] sink
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Clear the terminal and home the cursor
    pub fn clear_screen(&mut self) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", BANNER.cyan())?;
        writeln!(self.out)
    }

    /// Banner plus every section, in display order
    pub fn report(&mut self, report: &CycleReport) -> io::Result<()> {
        self.banner()?;
        self.system_status(&report.system)?;
        self.components(&report.components)?;
        self.anticheat(&report.anticheat)?;
        self.incidents(&report.incidents)?;
        self.free_games(&report.free_games)?;
        self.api_health(&report.api_health)?;
        self.out.flush()
    }

    /// Footer shown between continuous-mode cycles
    pub fn footer(&mut self, updated_at: &DateTime<Utc>, next_check_secs: u64) -> io::Result<()> {
        let rule = "─".repeat(RULE_WIDTH);
        writeln!(self.out)?;
        writeln!(self.out, "{}", rule.as_str().white())?;
        writeln!(
            self.out,
            "{}",
            format!("Last updated: {}", updated_at.format("%Y-%m-%d %H:%M:%S UTC")).dark_grey()
        )?;
        if next_check_secs > 0 {
            writeln!(
                self.out,
                "{}",
                format!("Next check in {} seconds... (Press Ctrl+C to exit)", next_check_secs).cyan()
            )?;
        }
        writeln!(self.out, "{}", rule.as_str().white())?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn header(&mut self, title: StyledContent<String>) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", title)?;
        writeln!(self.out, "{}", "─".repeat(RULE_WIDTH))
    }

    fn unavailable(&mut self, what: &str, err: &FetchError) -> io::Result<()> {
        writeln!(self.out, "{}", format!("Unable to fetch {} ({})", what, err).red())
    }

    fn service_row(&mut self, label: &str, row: Option<&ComponentRow>) -> io::Result<()> {
        let Some(row) = row else {
            return writeln!(
                self.out,
                "{}: {}",
                format!("{:<LABEL_WIDTH$}", label).white(),
                "NOT FOUND".magenta()
            );
        };

        let tier = row.classification.tier;
        if tier.is_outage() {
            writeln!(
                self.out,
                "{}: {}",
                format!(" {} ", label).white().on_red(),
                tier_label(tier)
            )
        } else {
            writeln!(
                self.out,
                "{}: {}",
                format!("{:<LABEL_WIDTH$}", label).white(),
                tier_label(tier)
            )
        }
    }

    fn system_status(&mut self, section: &Section<SystemStatus>) -> io::Result<()> {
        self.header(" SYSTEM STATUS ".to_string().white().on_blue())?;

        let status = match section {
            Ok(status) => status,
            Err(e) => return self.unavailable("system status", e),
        };

        let overall = match &status.overall {
            OverallHealth::AllOperational => "ALL SYSTEMS OPERATIONAL".green(),
            OverallHealth::IssuesDetected { .. } => "*** WARNING: ISSUES DETECTED ***".red(),
        };
        writeln!(self.out, "{}: {}", "Overall Status".white(), overall)?;

        match &status.description {
            Ok(Some(description)) => {
                writeln!(self.out, "{}: {}", "Current Status".white(), description.as_str().cyan())?
            }
            Ok(None) => {}
            Err(e) => self.unavailable("current status", e)?,
        }
        writeln!(self.out)?;

        for service in &status.services {
            self.service_row(&service.label, service.component.as_ref())?;
        }
        Ok(())
    }

    fn components(&mut self, section: &Section<ComponentsOverview>) -> io::Result<()> {
        self.header(" DETAILED COMPONENTS STATUS ".to_string().white().on_green())?;

        let overview = match section {
            Ok(overview) => overview,
            Err(e) => return self.unavailable("components data", e),
        };
        if overview.is_empty() {
            return writeln!(self.out, "{}", "No components data available".yellow());
        }

        if !overview.issues.is_empty() {
            writeln!(self.out, "{}", "COMPONENTS WITH ISSUES:".red())?;
            for row in &overview.issues {
                writeln!(
                    self.out,
                    "  {}: {}",
                    format!("{:<COMPONENT_WIDTH$}", row.name).white(),
                    tier_label(row.classification.tier)
                )?;
            }
            writeln!(self.out)?;
        }

        let operational = &overview.operational;
        if !operational.is_empty() {
            writeln!(
                self.out,
                "{}",
                format!("{} components operational", operational.len()).green()
            )?;
            if operational.len() <= OPERATIONAL_LIST_MAX {
                for name in operational {
                    writeln!(
                        self.out,
                        "  {}: {}",
                        format!("{:<COMPONENT_WIDTH$}", name).white(),
                        tier_label(Tier::Operational)
                    )?;
                }
            } else {
                writeln!(
                    self.out,
                    "  Including: {}, and {} more...",
                    operational[..OPERATIONAL_PREVIEW].join(", "),
                    operational.len() - OPERATIONAL_PREVIEW
                )?;
            }
        }
        Ok(())
    }

    fn anticheat(&mut self, report: &AntiCheatReport) -> io::Result<()> {
        self.header(format!(" {} STATUS ", report.label.to_uppercase()).white().on_magenta())?;

        match &report.component {
            Ok(Some(tracked)) => {
                self.service_row(&report.label, Some(&tracked.row))?;
                if let Some(t) = &tracked.transition {
                    writeln!(self.out, "{}", " STATUS CHANGE DETECTED ".black().on_yellow())?;
                    writeln!(self.out, "   Changed from: {} → {}", t.from, t.to)?;
                }
            }
            Ok(None) => writeln!(
                self.out,
                "{}",
                format!("{} status not found in components", report.label).yellow()
            )?,
            Err(e) => self.unavailable("anti-cheat status", e)?,
        }

        match &report.related_incidents {
            Ok(related) if related.is_empty() => {
                writeln!(self.out, "{}", "No related incidents detected".green())
            }
            Ok(related) => {
                writeln!(self.out)?;
                writeln!(self.out, "{}", "Related Incidents Found:".red())?;
                for brief in related {
                    writeln!(self.out, "  - {}", brief.name)?;
                    writeln!(self.out, "    Status: {}", brief.status)?;
                }
                Ok(())
            }
            Err(e) => self.unavailable("related incidents", e),
        }
    }

    fn incidents(&mut self, section: &Section<IncidentReport>) -> io::Result<()> {
        self.header(" INCIDENT REPORTS ".to_string().white().on_red())?;

        let report = match section {
            Ok(report) => report,
            Err(e) => return self.unavailable("incidents", e),
        };

        if report.active.is_empty() {
            writeln!(self.out, "{}", "No active incidents reported".green())?;
        }
        for incident in &report.active {
            match incident.impact {
                Impact::Critical => {
                    writeln!(self.out)?;
                    writeln!(self.out, "{}", " CRITICAL INCIDENT ".white().on_red())?;
                }
                Impact::Major => {
                    writeln!(self.out)?;
                    writeln!(self.out, "{}", " MAJOR INCIDENT ".black().on_yellow())?;
                }
                _ => writeln!(self.out)?,
            }

            let paint = |s: &str| match incident.impact {
                Impact::Critical => s.to_string().red(),
                Impact::Major => s.to_string().yellow(),
                _ => s.to_string().blue(),
            };
            writeln!(self.out, "{}", incident.name.as_str().white())?;
            writeln!(self.out, "   Status: {}", paint(&incident.status))?;
            writeln!(self.out, "   Impact: {}", paint(incident.impact.label()))?;
            writeln!(
                self.out,
                "   Started: {}",
                incident.created_at.as_deref().unwrap_or("Unknown").dark_grey()
            )?;
            if let Some(latest) = &incident.latest_update {
                writeln!(self.out, "   Latest: {}", latest.as_str().cyan())?;
            }
        }

        if !report.recently_resolved.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "{}", "Recently Resolved Incidents:".cyan())?;
            for resolved in &report.recently_resolved {
                writeln!(self.out, "  - {}", resolved.name)?;
                if let Some(at) = &resolved.resolved_at {
                    writeln!(self.out, "    Resolved: {}", at.as_str().green())?;
                }
            }
        }
        Ok(())
    }

    fn free_games(&mut self, section: &Section<FreeGamesReport>) -> io::Result<()> {
        self.header(" FREE GAMES & PROMOTIONS ".to_string().white().on_green())?;

        let report = match section {
            Ok(report) => report,
            Err(e) => return self.unavailable("free games data", e),
        };

        if report.current.is_empty() {
            writeln!(self.out, "{}", "No free games currently available".yellow())?;
        } else {
            writeln!(self.out, "{}", "Currently FREE:".green())?;
            for game in &report.current {
                writeln!(self.out, "  {}", game.title.as_str().cyan())?;
                writeln!(self.out, "     {}", game.description.as_str().dark_grey())?;
                let left = if game.remaining.days > 0 {
                    format!("{} days", game.remaining.days).yellow()
                } else {
                    format!("{} hours", game.remaining.hours).red()
                };
                writeln!(self.out, "     Ends in {} ({})", left, format_utc(&game.ends_at))?;
                writeln!(self.out)?;
            }
        }

        if !report.upcoming.is_empty() {
            writeln!(self.out, "{}", "Coming Soon:".blue())?;
            for game in &report.upcoming {
                writeln!(
                    self.out,
                    "  {} - Starts in {}",
                    game.title.as_str().magenta(),
                    format!("{} days", game.days_until).cyan()
                )?;
            }
        }
        Ok(())
    }

    fn api_health(&mut self, health: &ApiHealth) -> io::Result<()> {
        self.header(" API STATUS & INFO ".to_string().black().on_yellow())?;

        for probe in &health.endpoints {
            match probe.status {
                ProbeStatus::Ok => writeln!(self.out, "  {} {}", "✓".green(), probe.name)?,
                ProbeStatus::HttpStatus(code) => {
                    writeln!(self.out, "  {} {} (HTTP {})", "✗".red(), probe.name, code)?
                }
                ProbeStatus::Unreachable => {
                    writeln!(self.out, "  {} {} (Connection Error)", "✗".red(), probe.name)?
                }
            }
        }

        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}",
            format!("{}/{} API endpoints operational", health.working(), health.total()).cyan()
        )?;
        if health.working() < health.total() {
            writeln!(
                self.out,
                "{}",
                "Note: some endpoints appear to have been removed or changed upstream.".yellow()
            )?;
        }
        Ok(())
    }
}
