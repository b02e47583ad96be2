//! Small text and time helpers shared by the client modules.

/// How much of a failed response body survives into an error message.
const ERROR_BODY_LIMIT: usize = 180;

/// Trimmed value, or `None` when the input is missing or blank.
///
/// Environment lookups hand back `Some("")` and padded values; both
/// collapse to `None` here so config code only sees usable strings.
pub fn non_empty_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Whether the value carries an explicit `http://` or `https://` scheme.
pub fn has_http_scheme(value: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.starts_with(scheme))
}

/// Clip a response body for inclusion in an error message.
pub fn clip_error_body(body: &str) -> String {
    body.trim().chars().take(ERROR_BODY_LIMIT).collect()
}

/// Seconds since the Unix epoch.
pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn non_empty_trimmed_collapses_blank_values() {
        assert_eq!(non_empty_trimmed(None), None);
        assert_eq!(non_empty_trimmed(Some(String::new())), None);
        assert_eq!(non_empty_trimmed(Some("  \t ".to_string())), None);
        assert_eq!(
            non_empty_trimmed(Some("  anon-key-123 ".to_string())),
            Some("anon-key-123".to_string())
        );
    }

    #[test]
    fn has_http_scheme_requires_an_explicit_scheme() {
        assert!(has_http_scheme("http://localhost:54321"));
        assert!(has_http_scheme("https://demo.supabase.co"));
        assert!(!has_http_scheme("demo.supabase.co"));
        assert!(!has_http_scheme("file:///tmp/x"));
    }

    #[test]
    fn clip_error_body_trims_and_bounds_long_bodies() {
        assert_eq!(clip_error_body("  short body  "), "short body");
        let long = "x".repeat(500);
        assert_eq!(clip_error_body(&long).chars().count(), ERROR_BODY_LIMIT);
    }
}
