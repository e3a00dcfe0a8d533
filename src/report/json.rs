use crate::types::report::LintResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct ResultView<'a> {
    #[serde(flatten)]
    result: &'a LintResult,
    last_refresh_formatted: String,
    humanized_time: String,
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Adds the display-only timestamps next to the stored fields.
pub fn result_to_json(result: &LintResult, now: DateTime<Utc>) -> Result<String, serde_json::Error> {
    to_json(&ResultView {
        result,
        last_refresh_formatted: result.formatted_last_refresh(),
        humanized_time: result.humanized_last_refresh(now),
    })
}

pub fn stats_to_json(total_repos: u64) -> Result<String, serde_json::Error> {
    to_json(&serde_json::json!({ "total_repos": total_repos }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::ChecksResult;
    use crate::types::repo::RepoIdentity;
    use crate::types::scoring::Grade;
    use chrono::{Duration, TimeZone};

    #[test]
    fn result_json_carries_display_fields() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let result = LintResult::from_checks(
            &RepoIdentity::new("github.com/acme/widget", "main"),
            ChecksResult {
                scores: Vec::new(),
                average: 0.95,
                grade: Grade::A,
                files: 12,
                issues: 0,
            },
            ts,
        );

        let rendered = result_to_json(&result, ts + Duration::hours(3))
            .expect("json should serialize");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("json should parse");
        assert_eq!(value["grade"], "A");
        assert_eq!(value["repo"], "github.com/acme/widget");
        assert_eq!(value["humanized_time"], "3 hours ago");
        assert!(value["checks"].is_array());
    }

    #[test]
    fn stats_json_has_total() {
        let rendered = stats_to_json(7).expect("json should serialize");
        assert!(rendered.contains("\"total_repos\": 7"));
    }
}
