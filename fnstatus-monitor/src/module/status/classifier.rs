//! Status classification
//!
//! Maps raw Statuspage component statuses to an ordered [`Tier`].

/// Severity tier of a component status.
///
/// Variants are declared in increasing severity, so `Ord` compares them
/// directly. `Unknown` sits above maintenance and below any degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Operational,
    UnderMaintenance,
    Unknown,
    DegradedPerformance,
    PartialOutage,
    MajorOutage,
}

impl Tier {
    /// Parse a raw API status; unrecognised strings are `Unknown`.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "operational" => Tier::Operational,
            "degraded_performance" => Tier::DegradedPerformance,
            "partial_outage" => Tier::PartialOutage,
            "major_outage" => Tier::MajorOutage,
            "under_maintenance" => Tier::UnderMaintenance,
            _ => Tier::Unknown,
        }
    }

    /// Canonical API string
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Operational => "operational",
            Tier::DegradedPerformance => "degraded_performance",
            Tier::PartialOutage => "partial_outage",
            Tier::MajorOutage => "major_outage",
            Tier::UnderMaintenance => "under_maintenance",
            Tier::Unknown => "unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tier::Operational => "Everything is working normally",
            Tier::DegradedPerformance => "Some services are slower than usual",
            Tier::PartialOutage => "Some parts may not be working",
            Tier::MajorOutage => "Service is down for most users",
            Tier::UnderMaintenance => "Scheduled maintenance in progress",
            Tier::Unknown => "Status cannot be determined",
        }
    }

    pub fn is_outage(&self) -> bool {
        matches!(self, Tier::PartialOutage | Tier::MajorOutage)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tier: Tier,
    pub description: &'static str,
}

/// Classify a raw status string. Never fails.
pub fn classify(raw: &str) -> Classification {
    let tier = Tier::from_raw(raw);
    Classification {
        tier,
        description: tier.description(),
    }
}

/// Page-wide health derived from the Statuspage indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverallHealth {
    AllOperational,
    IssuesDetected { indicator: String },
}

impl OverallHealth {
    /// `"none"` means all systems operational; anything else is an issue.
    pub fn from_indicator(indicator: &str) -> Self {
        if indicator.trim().eq_ignore_ascii_case("none") {
            OverallHealth::AllOperational
        } else {
            OverallHealth::IssuesDetected {
                indicator: indicator.to_string(),
            }
        }
    }
}

/// A status change between two consecutive observations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: String,
    pub to: String,
}

/// Emit a transition only when a previous value exists and differs.
pub fn detect_transition(previous: Option<&str>, current: &str) -> Option<Transition> {
    match previous {
        Some(prev) if prev != current => Some(Transition {
            from: prev.to_string(),
            to: current.to_string(),
        }),
        _ => None,
    }
}
