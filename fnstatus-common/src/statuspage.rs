//! Statuspage v2 API payloads (summary, status, components, incidents)

use serde::{Deserialize, Serialize};

use crate::de::{lenient, lenient_vec};

/// `/api/v2/summary.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub page: PageInfo,
    #[serde(default, deserialize_with = "lenient")]
    pub status: StatusIndicator,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub components: Vec<StatusComponent>,
}

impl SummaryResponse {
    /// Overall indicator: `page.indicator`, then `status.indicator`, then `"none"`.
    pub fn indicator(&self) -> &str {
        self.page
            .indicator
            .as_deref()
            .or(self.status.indicator.as_deref())
            .unwrap_or("none")
    }
}

/// `/api/v2/status.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentStatusResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub page: PageInfo,
    #[serde(default, deserialize_with = "lenient")]
    pub status: StatusIndicator,
}

/// `/api/v2/components.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentsResponse {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub components: Vec<StatusComponent>,
}

/// `/api/v2/incidents.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentsResponse {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub incidents: Vec<Incident>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
    /// Not part of the documented page object, but honored when present.
    #[serde(default, deserialize_with = "lenient")]
    pub indicator: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusIndicator {
    /// `none`, `minor`, `major` or `critical`
    #[serde(default, deserialize_with = "lenient")]
    pub indicator: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

/// A named subsystem tracked by the status page.
///
/// `status` is kept raw so unrecognised values survive for display and
/// change detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusComponent {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub status: String,
}

impl StatusComponent {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }

    /// Raw status, or `"unknown"` when upstream sent nothing.
    pub fn status_or_unknown(&self) -> &str {
        if self.status.trim().is_empty() {
            "unknown"
        } else {
            &self.status
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Incident {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    /// `investigating`, `identified`, `monitoring`, `resolved`, `postmortem`
    #[serde(default, deserialize_with = "lenient")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient")]
    pub impact: String,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub resolved_at: Option<String>,
    /// Newest first, as served upstream.
    #[serde(default, rename = "incident_updates", deserialize_with = "lenient_vec")]
    pub updates: Vec<IncidentUpdate>,
}

impl Incident {
    pub fn impact(&self) -> Impact {
        Impact::from_raw(&self.impact)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentUpdate {
    #[serde(default, deserialize_with = "lenient")]
    pub body: String,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display_at: Option<String>,
}

impl IncidentUpdate {
    /// When the update was posted: `display_at`, else `created_at`.
    pub fn posted_at(&self) -> Option<&str> {
        self.display_at.as_deref().or(self.created_at.as_deref())
    }
}

/// Incident impact as reported upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    Critical,
    Major,
    Minor,
    None,
    Unknown,
}

impl Impact {
    /// Parse from the raw API string; anything unrecognised is `Unknown`.
    pub fn from_raw(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "critical" => Impact::Critical,
            "major" => Impact::Major,
            "minor" => Impact::Minor,
            "none" => Impact::None,
            _ => Impact::Unknown,
        }
    }

    /// Upper-case label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Impact::Critical => "CRITICAL",
            Impact::Major => "MAJOR",
            Impact::Minor => "MINOR",
            Impact::None => "NONE",
            Impact::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_decodes_with_nulls() {
        let json = r#"{
            "page": {"id": "x", "name": "Epic Games", "url": null},
            "status": {"indicator": "minor", "description": "Minor Service Outage"},
            "components": [
                {"name": "Fortnite", "status": "operational"},
                {"name": null, "status": null}
            ]
        }"#;
        let summary: SummaryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(summary.components.len(), 2);
        assert_eq!(summary.components[1].name, "");
        assert_eq!(summary.components[1].status_or_unknown(), "unknown");
        assert_eq!(summary.indicator(), "minor");
    }

    #[test]
    fn test_indicator_prefers_page_then_defaults_to_none() {
        let json = r#"{"page":{"indicator":"none"},"status":{"indicator":"major"}}"#;
        let summary: SummaryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(summary.indicator(), "none");

        let summary: SummaryResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(summary.indicator(), "none");
        assert!(summary.components.is_empty());
    }

    #[test]
    fn test_incident_missing_fields_degrade() {
        let json = r#"{"incidents":[
            {"name":"Login issues","status":"investigating","resolved_at":null,
             "incident_updates":[{"body":"Looking into it","created_at":"2024-03-01T10:00:00Z"}]},
            {"impact":null,"incident_updates":null}
        ]}"#;
        let resp: IncidentsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.incidents.len(), 2);
        assert_eq!(resp.incidents[0].impact(), Impact::Unknown);
        assert_eq!(resp.incidents[0].updates[0].body, "Looking into it");
        assert!(resp.incidents[1].updates.is_empty());
        assert_eq!(resp.incidents[1].name, "");
    }

    #[test]
    fn test_impact_from_raw() {
        assert_eq!(Impact::from_raw("Critical"), Impact::Critical);
        assert_eq!(Impact::from_raw("major"), Impact::Major);
        assert_eq!(Impact::from_raw("minor"), Impact::Minor);
        assert_eq!(Impact::from_raw("none"), Impact::None);
        assert_eq!(Impact::from_raw("catastrophic"), Impact::Unknown);
        assert_eq!(Impact::from_raw(""), Impact::Unknown);
        assert_eq!(Impact::Major.label(), "MAJOR");
    }

    #[test]
    fn test_mistyped_field_does_not_drop_neighbours() {
        let json = r#"{"incidents":[
            {"name":"Login issues","status":"investigating","impact":"minor"},
            {"name":"Odd payload","impact":{"level":2},"created_at":5,
             "incident_updates":[{"body":["x"]},{"body":"Still here"}]},
            "not an incident"
        ]}"#;
        let resp: IncidentsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.incidents.len(), 2);
        assert_eq!(resp.incidents[0].impact(), Impact::Minor);

        let odd = &resp.incidents[1];
        assert_eq!(odd.name, "Odd payload");
        assert_eq!(odd.impact(), Impact::Unknown);
        assert_eq!(odd.created_at, None);
        assert_eq!(odd.updates.len(), 2);
        assert_eq!(odd.updates[0].body, "");
        assert_eq!(odd.updates[1].body, "Still here");
    }

    #[test]
    fn test_wrong_shape_is_an_error() {
        let result: Result<ComponentsResponse, _> =
            serde_json::from_str(r#"{"components":"not a list"}"#);
        assert!(result.is_err());
    }
}
