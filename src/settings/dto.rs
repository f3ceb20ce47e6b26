use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingEntry {
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// `setting_key -> {value, type}`
pub type SettingsResponse = BTreeMap<String, SettingEntry>;
