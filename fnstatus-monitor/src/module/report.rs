//! Report assembly - one poll cycle
//!
//! Fetches the five upstream endpoints concurrently, then derives each
//! report section from whichever responses it needs. A section whose
//! endpoint failed carries that [`FetchError`] and every other section is
//! built as usual.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use fnstatus_common::{
    ComponentsResponse, CurrentStatusResponse, FreeGamesResponse, Impact, IncidentsResponse,
    StatusComponent, SummaryResponse,
};
use futures::future::join_all;

use super::fetcher::{Fetch, ProbeStatus, fetch_decoded};
use super::incident::{
    format_resolved_time, latest_update, matches_keywords, partition, recent_resolved,
};
use super::promo::{Remaining, classify_catalog, remaining, until};
use super::status::{
    Classification, MonitorState, OverallHealth, Transition, classify, find_component,
};
use super::text::{title_case, truncate_chars};
use crate::config::{MonitorConfig, TrackedService};
use crate::error::FetchError;

pub const ACTIVE_INCIDENT_LIMIT: usize = 5;
pub const RESOLVED_INCIDENT_LIMIT: usize = 3;
pub const RELATED_INCIDENT_LIMIT: usize = 3;
pub const UPCOMING_GAME_LIMIT: usize = 3;
pub const GAME_DESCRIPTION_MAX_CHARS: usize = 60;

/// A report section: its data, or why the endpoint behind it failed
pub type Section<T> = Result<T, FetchError>;

/// Everything one cycle observed
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub generated_at: DateTime<Utc>,
    pub system: Section<SystemStatus>,
    pub components: Section<ComponentsOverview>,
    pub anticheat: AntiCheatReport,
    pub incidents: Section<IncidentReport>,
    pub free_games: Section<FreeGamesReport>,
    pub api_health: ApiHealth,
}

impl CycleReport {
    /// Number of top-level sections that could not be built
    pub fn failed_sections(&self) -> usize {
        [
            self.system.is_err(),
            self.components.is_err(),
            self.anticheat.component.is_err(),
            self.anticheat.related_incidents.is_err(),
            self.incidents.is_err(),
            self.free_games.is_err(),
        ]
        .iter()
        .filter(|failed| **failed)
        .count()
    }
}

/// A component as shown in a report row
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRow {
    pub name: String,
    pub raw_status: String,
    pub classification: Classification,
}

impl ComponentRow {
    pub fn from_component(component: &StatusComponent) -> Self {
        let raw_status = component.status_or_unknown().to_string();
        Self {
            name: component.name.clone(),
            classification: classify(&raw_status),
            raw_status,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRow {
    pub label: String,
    /// `None` when no component matched the service keywords
    pub component: Option<ComponentRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemStatus {
    pub overall: OverallHealth,
    /// Provider's own description from the current-status endpoint
    pub description: Section<Option<String>>,
    pub services: Vec<ServiceRow>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentsOverview {
    /// Components not `operational`, in API order
    pub issues: Vec<ComponentRow>,
    /// Names of operational components, in API order
    pub operational: Vec<String>,
}

impl ComponentsOverview {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty() && self.operational.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedComponent {
    pub row: ComponentRow,
    /// Status change since the previous cycle
    pub transition: Option<Transition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentBrief {
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct AntiCheatReport {
    pub label: String,
    /// `Ok(None)` when the summary has no anti-cheat component
    pub component: Section<Option<TrackedComponent>>,
    pub related_incidents: Section<Vec<IncidentBrief>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveIncident {
    pub name: String,
    pub status: String,
    pub impact: Impact,
    pub created_at: Option<String>,
    pub latest_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIncident {
    pub name: String,
    /// Formatted resolution time, or the raw value when it does not parse
    pub resolved_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentReport {
    pub active: Vec<ActiveIncident>,
    pub recently_resolved: Vec<ResolvedIncident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FreeGameEntry {
    pub title: String,
    pub description: String,
    pub ends_at: DateTime<Utc>,
    pub remaining: Remaining,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingGameEntry {
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub days_until: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreeGamesReport {
    pub current: Vec<FreeGameEntry>,
    pub upcoming: Vec<UpcomingGameEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointProbe {
    pub name: String,
    pub status: ProbeStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiHealth {
    pub endpoints: Vec<EndpointProbe>,
}

impl ApiHealth {
    pub fn working(&self) -> usize {
        self.endpoints.iter().filter(|e| e.status.is_ok()).count()
    }

    pub fn total(&self) -> usize {
        self.endpoints.len()
    }
}

/// Runs poll cycles against a [`Fetch`] source
pub struct ReportAssembler {
    fetcher: Arc<dyn Fetch>,
    config: MonitorConfig,
}

impl ReportAssembler {
    pub fn new(fetcher: Arc<dyn Fetch>, config: MonitorConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run one cycle.
    ///
    /// Never fails: fetch errors are recorded per section. `state` is only
    /// touched after all fetches have completed.
    pub async fn run_cycle(&self, state: &mut MonitorState) -> CycleReport {
        self.run_cycle_with(state, Utc::now).await
    }

    /// [`run_cycle`](Self::run_cycle) with an injected clock, read once
    /// after every fetch has returned.
    pub async fn run_cycle_with<C>(&self, state: &mut MonitorState, clock: C) -> CycleReport
    where
        C: FnOnce() -> DateTime<Utc>,
    {
        let start = Instant::now();
        let endpoints = &self.config.endpoints;
        let timeout = self.config.request_timeout();
        let fetcher = self.fetcher.as_ref();

        tracing::info!("Starting status cycle");

        let (summary, current, incidents, components, free_games, api_health) = tokio::join!(
            fetch_decoded::<SummaryResponse>(fetcher, &endpoints.summary, timeout),
            fetch_decoded::<CurrentStatusResponse>(fetcher, &endpoints.status, timeout),
            fetch_decoded::<IncidentsResponse>(fetcher, &endpoints.incidents, timeout),
            fetch_decoded::<ComponentsResponse>(fetcher, &endpoints.components, timeout),
            fetch_decoded::<FreeGamesResponse>(fetcher, &endpoints.free_games, timeout),
            self.probe_endpoints(),
        );
        let now = clock();

        let report = CycleReport {
            generated_at: now,
            system: summary
                .as_ref()
                .map(|s| system_status(s, current.as_ref(), &self.config.services))
                .map_err(Clone::clone),
            components: components.as_ref().map(components_overview).map_err(Clone::clone),
            anticheat: anticheat_report(
                summary.as_ref(),
                incidents.as_ref(),
                &self.config,
                state,
            ),
            incidents: incidents.as_ref().map(incident_report).map_err(Clone::clone),
            free_games: free_games
                .as_ref()
                .map(|f| free_games_report(f, now))
                .map_err(Clone::clone),
            api_health,
        };

        tracing::info!(
            "Cycle complete in {:.2}s: {} section(s) unavailable, {}/{} endpoints healthy",
            start.elapsed().as_secs_f64(),
            report.failed_sections(),
            report.api_health.working(),
            report.api_health.total()
        );

        report
    }

    /// HEAD every endpoint concurrently
    async fn probe_endpoints(&self) -> ApiHealth {
        let timeout = self.config.probe_timeout();
        let fetcher = self.fetcher.as_ref();

        let probes = self.config.endpoint_list().into_iter().map(|(name, url)| async move {
            EndpointProbe {
                name: name.to_string(),
                status: fetcher.probe(url, timeout).await,
            }
        });

        ApiHealth {
            endpoints: join_all(probes).await,
        }
    }
}

/// Overall health plus one row per tracked service
pub fn system_status(
    summary: &SummaryResponse,
    current: Result<&CurrentStatusResponse, &FetchError>,
    services: &[TrackedService],
) -> SystemStatus {
    let rows = services
        .iter()
        .map(|service| ServiceRow {
            label: service.label.clone(),
            component: find_component(&summary.components, &service.keywords)
                .map(ComponentRow::from_component),
        })
        .collect();

    SystemStatus {
        overall: OverallHealth::from_indicator(summary.indicator()),
        description: current
            .map(|c| c.status.description.clone())
            .map_err(Clone::clone),
        services: rows,
    }
}

/// Split components into non-operational rows and operational names
pub fn components_overview(response: &ComponentsResponse) -> ComponentsOverview {
    let mut overview = ComponentsOverview::default();

    for component in &response.components {
        let name = if component.name.is_empty() {
            "Unknown Component".to_string()
        } else {
            component.name.clone()
        };

        if component.status_or_unknown().eq_ignore_ascii_case("operational") {
            overview.operational.push(name);
        } else {
            let mut row = ComponentRow::from_component(component);
            row.name = name;
            overview.issues.push(row);
        }
    }

    overview
}

/// Anti-cheat component (with change detection) and related incidents.
///
/// `state` is updated only when the component is found.
pub fn anticheat_report(
    summary: Result<&SummaryResponse, &FetchError>,
    incidents: Result<&IncidentsResponse, &FetchError>,
    config: &MonitorConfig,
    state: &mut MonitorState,
) -> AntiCheatReport {
    let keywords = &config.anticheat;

    let component = summary.map_err(Clone::clone).map(|s| {
        find_component(&s.components, &keywords.component_keywords).map(|c| {
            let row = ComponentRow::from_component(c);
            let transition = state.observe(&row.raw_status);
            if let Some(t) = &transition {
                tracing::warn!("{} status changed: {} -> {}", keywords.label, t.from, t.to);
            }
            TrackedComponent { row, transition }
        })
    });

    let related_incidents = incidents.map_err(Clone::clone).map(|resp| {
        resp.incidents
            .iter()
            .filter(|i| matches_keywords(i, &keywords.incident_keywords))
            .take(RELATED_INCIDENT_LIMIT)
            .map(|i| IncidentBrief {
                name: name_or(&i.name, "Unknown Incident"),
                status: title_case(or_unknown(&i.status)),
            })
            .collect()
    });

    AntiCheatReport {
        label: keywords.label.clone(),
        component,
        related_incidents,
    }
}

/// First active incidents and the most recently resolved ones
pub fn incident_report(response: &IncidentsResponse) -> IncidentReport {
    let (active, resolved) = partition(&response.incidents);

    let active = active
        .iter()
        .take(ACTIVE_INCIDENT_LIMIT)
        .map(|i| ActiveIncident {
            name: name_or(&i.name, "Unknown Incident"),
            status: title_case(or_unknown(&i.status)),
            impact: i.impact(),
            created_at: i.created_at.clone(),
            latest_update: latest_update(i),
        })
        .collect();

    let recently_resolved = recent_resolved(&resolved, RESOLVED_INCIDENT_LIMIT)
        .into_iter()
        .map(|i| ResolvedIncident {
            name: name_or(&i.name, "Unknown Incident"),
            resolved_at: i
                .resolved_at
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(format_resolved_time),
        })
        .collect();

    IncidentReport {
        active,
        recently_resolved,
    }
}

/// Currently free games and the next few upcoming ones
pub fn free_games_report(response: &FreeGamesResponse, now: DateTime<Utc>) -> FreeGamesReport {
    let windows = classify_catalog(response.games(), now);

    let current = windows
        .current_free
        .iter()
        .map(|c| FreeGameEntry {
            title: name_or(&c.game.title, "Unknown Game"),
            description: truncate_chars(&c.game.description, GAME_DESCRIPTION_MAX_CHARS),
            ends_at: c.ends_at,
            remaining: remaining(now, c.ends_at),
        })
        .collect();

    let upcoming = windows
        .upcoming_free
        .iter()
        .take(UPCOMING_GAME_LIMIT)
        .map(|u| UpcomingGameEntry {
            title: name_or(&u.game.title, "Unknown Game"),
            starts_at: u.starts_at,
            days_until: until(now, u.starts_at),
        })
        .collect();

    FreeGamesReport { current, upcoming }
}

fn name_or(name: &str, fallback: &str) -> String {
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}

fn or_unknown(s: &str) -> &str {
    if s.is_empty() { "unknown" } else { s }
}
