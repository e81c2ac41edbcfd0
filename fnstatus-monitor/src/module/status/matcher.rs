//! Keyword lookup of status components

use fnstatus_common::StatusComponent;

/// First component (in API order) whose trimmed, lowercased name contains
/// any of `keywords`, compared case-insensitively.
pub fn find_component<'a, S: AsRef<str>>(
    components: &'a [StatusComponent],
    keywords: &[S],
) -> Option<&'a StatusComponent> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.as_ref().to_lowercase()).collect();

    components.iter().find(|comp| {
        let name = comp.name.trim().to_lowercase();
        keywords.iter().any(|k| name.contains(k.as_str()))
    })
}
