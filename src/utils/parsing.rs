//! String parsing utilities

/// Extract value after a colon and space
pub fn extract_after_colon(line: &str) -> Option<String> {
    line.split_once(':')
        .map(|(_, value)| value.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Look up a `KEY=value` entry in os-release formatted text; blank values count as absent
pub fn os_release_value(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (k, v) = line.trim().split_once('=')?;
        let value = v.trim().trim_matches('"').trim_matches('\'').trim();
        (k == key && !value.is_empty()).then(|| value.to_string())
    })
}

/// Replace an empty value with "unknown"
pub fn or_unknown(value: impl Into<String>) -> String {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.to_string()
    }
}
