use chrono::{DateTime, Utc};
use fnstatus_common::Incident;

use crate::module::text::truncate_chars;

/// Longest update excerpt shown before truncation
pub const LATEST_UPDATE_MAX_CHARS: usize = 100;

/// Resolved iff `resolved_at` is set (non-empty) or the status is `resolved`.
pub fn is_resolved(incident: &Incident) -> bool {
    let has_resolved_at = incident
        .resolved_at
        .as_deref()
        .is_some_and(|s| !s.is_empty());
    has_resolved_at || incident.status == "resolved"
}

/// Split incidents into `(active, resolved)`, keeping input order.
pub fn partition(incidents: &[Incident]) -> (Vec<&Incident>, Vec<&Incident>) {
    let (resolved, active): (Vec<&Incident>, Vec<&Incident>) =
        incidents.iter().partition(|i| is_resolved(i));
    (active, resolved)
}

/// Newest-resolved first, at most `limit`.
///
/// Compares the raw `resolved_at` strings (ISO-8601 sorts lexically); a
/// missing value sorts as the empty string, i.e. earliest. The sort is
/// stable, so ties keep input order.
pub fn recent_resolved<'a>(resolved: &[&'a Incident], limit: usize) -> Vec<&'a Incident> {
    let mut sorted = resolved.to_vec();
    sorted.sort_by(|a, b| {
        let a = a.resolved_at.as_deref().unwrap_or("");
        let b = b.resolved_at.as_deref().unwrap_or("");
        b.cmp(a)
    });
    sorted.truncate(limit);
    sorted
}

/// Body of the newest update, cut to 100 chars with `...` when longer.
pub fn latest_update(incident: &Incident) -> Option<String> {
    let body = &incident.updates.first()?.body;
    Some(truncate_chars(body, LATEST_UPDATE_MAX_CHARS))
}

/// Whether the name or any update body mentions one of `keywords`.
///
/// Case-insensitive. Checks the name first, then updates in order, and
/// stops at the first hit.
pub fn matches_keywords<S: AsRef<str>>(incident: &Incident, keywords: &[S]) -> bool {
    let keywords: Vec<String> = keywords.iter().map(|k| k.as_ref().to_lowercase()).collect();
    let mentions = |text: &str| {
        let text = text.to_lowercase();
        keywords.iter().any(|k| text.contains(k.as_str()))
    };

    mentions(&incident.name) || incident.updates.iter().any(|u| mentions(&u.body))
}

/// `YYYY-MM-DD HH:MM UTC`, or the raw string when it does not parse.
pub fn format_resolved_time(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnstatus_common::IncidentUpdate;

    fn incident(name: &str, status: &str, resolved_at: Option<&str>) -> Incident {
        Incident {
            name: name.to_string(),
            status: status.to_string(),
            resolved_at: resolved_at.map(str::to_string),
            ..Default::default()
        }
    }

    fn with_updates(mut incident: Incident, bodies: &[&str]) -> Incident {
        incident.updates = bodies
            .iter()
            .map(|b| IncidentUpdate {
                body: b.to_string(),
                ..Default::default()
            })
            .collect();
        incident
    }

    #[test]
    fn test_partition() {
        let incidents = vec![
            incident("Login issues", "investigating", None),
            incident("Store outage", "resolved", None),
            incident("Matchmaking", "monitoring", Some("2024-03-01T10:00:00Z")),
            incident("Empty resolved_at", "identified", Some("")),
        ];

        let (active, resolved) = partition(&incidents);
        let active: Vec<&str> = active.iter().map(|i| i.name.as_str()).collect();
        let resolved: Vec<&str> = resolved.iter().map(|i| i.name.as_str()).collect();

        assert_eq!(active, vec!["Login issues", "Empty resolved_at"]);
        assert_eq!(resolved, vec!["Store outage", "Matchmaking"]);
    }

    #[test]
    fn test_recent_resolved_orders_by_resolution_time() {
        let a = incident("A", "resolved", Some("2024-01-01"));
        let b = incident("B", "resolved", Some("2024-03-01"));
        let recent = recent_resolved(&[&a, &b], 1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].name, "B");
    }

    #[test]
    fn test_recent_resolved_missing_sorts_last_and_ties_keep_order() {
        let missing = incident("missing", "resolved", None);
        let first = incident("first", "resolved", Some("2024-02-01T00:00:00Z"));
        let second = incident("second", "resolved", Some("2024-02-01T00:00:00Z"));
        let newest = incident("newest", "resolved", Some("2024-05-01T00:00:00Z"));

        let recent = recent_resolved(&[&missing, &first, &second, &newest], 10);
        let names: Vec<&str> = recent.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["newest", "first", "second", "missing"]);
    }

    #[test]
    fn test_latest_update_truncation() {
        let short = with_updates(incident("x", "investigating", None), &["newest", "older"]);
        assert_eq!(latest_update(&short).as_deref(), Some("newest"));

        let exact = "a".repeat(100);
        let inc = with_updates(incident("x", "investigating", None), &[exact.as_str()]);
        assert_eq!(latest_update(&inc).unwrap(), exact);

        let long = "é".repeat(150);
        let inc = with_updates(incident("x", "investigating", None), &[long.as_str()]);
        let latest = latest_update(&inc).unwrap();
        assert!(latest.ends_with("..."));
        assert_eq!(latest.chars().count(), 103);

        let none = incident("x", "investigating", None);
        assert_eq!(latest_update(&none), None);
    }

    #[test]
    fn test_matches_keywords() {
        let keywords = ["anti", "cheat", "eac", "anticheat"];

        let by_name = incident("Easy Anti-Cheat login failures", "investigating", None);
        assert!(matches_keywords(&by_name, &keywords));

        let by_update = with_updates(
            incident("Players disconnected", "identified", None),
            &["Unrelated", "The EAC service is being restarted"],
        );
        assert!(matches_keywords(&by_update, &keywords));

        let unrelated = with_updates(
            incident("Store slow", "monitoring", None),
            &["Purchases are slow"],
        );
        assert!(!matches_keywords(&unrelated, &keywords));
    }

    #[test]
    fn test_format_resolved_time() {
        assert_eq!(
            format_resolved_time("2024-03-01T10:15:30.123Z"),
            "2024-03-01 10:15 UTC"
        );
        assert_eq!(
            format_resolved_time("2024-03-01T12:15:30+02:00"),
            "2024-03-01 10:15 UTC"
        );
        assert_eq!(format_resolved_time("yesterday"), "yesterday");
    }
}
