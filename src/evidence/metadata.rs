//! Test session details and recorded steps carried into the report header

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Who tested what, on which build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub test_case_id: String,
    pub title: String,
    pub build: String,
    pub environment: String,
    pub tester: String,
    /// Issue tracker reference, empty when none
    #[serde(default)]
    pub tracker_id: String,
}

impl SessionInfo {
    /// Folder name for a session's report, e.g. `2024-05-01_TC_LOGIN-7`
    pub fn folder_name(&self, date: NaiveDate) -> String {
        let safe_tc: String = self
            .test_case_id
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '_',
                c => c,
            })
            .collect();
        format!("{}_TC_{}", date.format("%Y-%m-%d"), safe_tc)
    }
}

/// A numbered test step noted during the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based
    pub number: usize,
    pub recorded_at: DateTime<FixedOffset>,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_name_sanitizes_separators() {
        let info = SessionInfo {
            test_case_id: "AUTH/LOGIN:7".to_string(),
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(info.folder_name(date), "2024-05-01_TC_AUTH_LOGIN_7");
    }

    #[test]
    fn test_session_info_tracker_defaults_empty() {
        let json = r#"{"test_case_id":"TC1","title":"t","build":"b","environment":"e","tester":"q"}"#;
        let info: SessionInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.tracker_id, "");
    }
}
