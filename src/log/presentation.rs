//! Table rows for displaying a debug log to a person.

use crate::core::{TransitionRecord, TransitionResult, TransitionType};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Coarse classification of a record, used to style a row.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCategory {
    Success,
    Error,
    Warning,
    Filtered,
    Override,
    Reset,
}

impl From<TransitionResult> for EntryCategory {
    fn from(result: TransitionResult) -> Self {
        match result {
            TransitionResult::Success => EntryCategory::Success,
            TransitionResult::Override => EntryCategory::Override,
            TransitionResult::Reset => EntryCategory::Reset,
            TransitionResult::RepeatUpdateFiltered => EntryCategory::Filtered,
            TransitionResult::UnknownError | TransitionResult::InternalError => {
                EntryCategory::Error
            }
            TransitionResult::IllegalChangeSameState
            | TransitionResult::IllegalChangeNotAdjacent => EntryCategory::Warning,
        }
    }
}

/// A flattened, display-ready view of one record.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DebugLogRow {
    pub time: String,
    pub transition_type: TransitionType,
    pub state: String,
    pub data: String,
    pub message: String,
    pub category: EntryCategory,
}

/// Turn a chronological log into rows, newest first.
///
/// Times are shown on a 12-hour clock in the local time zone.
/// String data (as produced when log data is stringified) is shown verbatim.
/// Object data is reduced to `keys` and pretty-printed with a one-space
/// indent. Anything else is printed as compact JSON.
pub fn present_debug_log(records: &[TransitionRecord], keys: &[&str]) -> Vec<DebugLogRow> {
    records
        .iter()
        .rev()
        .map(|record| DebugLogRow {
            time: format_time(record),
            transition_type: record.transition_type,
            state: record.to_state.name().to_string(),
            data: format_data(&record.data, keys),
            message: record.message.clone(),
            category: record.result.into(),
        })
        .collect()
}

fn format_time(record: &TransitionRecord) -> String {
    record
        .timestamp
        .with_timezone(&Local)
        .format("%I:%M:%S%.3f %p")
        .to_string()
}

fn format_data(data: &Value, keys: &[&str]) -> String {
    match data {
        Value::String(text) => text.clone(),
        Value::Object(fields) => {
            let pulled: Map<String, Value> = keys
                .iter()
                .filter_map(|key| fields.get(*key).map(|v| (key.to_string(), v.clone())))
                .collect();
            pretty_one_space(&Value::Object(pulled))
        }
        other => other.to_string(),
    }
}

fn pretty_one_space(value: &Value) -> String {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(out).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;
    use chrono::{Local, TimeZone, Utc};
    use serde_json::json;

    fn record(ms: i64, result: TransitionResult, data: Value) -> TransitionRecord {
        TransitionRecord {
            timestamp: Utc.timestamp_millis_opt(ms).unwrap(),
            from_state: Some(State::Init),
            to_state: State::declared("s1"),
            transition_type: TransitionType::Change,
            result,
            message: result.as_str().to_string(),
            data,
        }
    }

    #[test]
    fn rows_are_newest_first() {
        let records = vec![
            record(441590400000, TransitionResult::Success, Value::Null),
            record(441590400001, TransitionResult::IllegalChangeSameState, Value::Null),
        ];

        let rows = present_debug_log(&records, &[]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, EntryCategory::Warning);
        assert_eq!(rows[1].category, EntryCategory::Success);
    }

    #[test]
    fn time_uses_local_twelve_hour_clock_with_millis() {
        let rows = present_debug_log(
            &[record(441590400123, TransitionResult::Success, Value::Null)],
            &[],
        );
        let local = Local.timestamp_millis_opt(441590400123).unwrap();

        assert_eq!(rows[0].time, local.format("%I:%M:%S%.3f %p").to_string());
        assert!(rows[0].time.ends_with(".123 AM") || rows[0].time.ends_with(".123 PM"));
    }

    #[test]
    fn object_data_is_filtered_to_keys() {
        let rows = present_debug_log(
            &[record(
                0,
                TransitionResult::Success,
                json!({ "state": "s1", "secret": 42 }),
            )],
            &["state"],
        );
        assert_eq!(rows[0].data, "{\n \"state\": \"s1\"\n}");
    }

    #[test]
    fn string_data_is_shown_verbatim() {
        let rows = present_debug_log(
            &[record(0, TransitionResult::Success, json!("{\"a\":1}"))],
            &["state"],
        );
        assert_eq!(rows[0].data, "{\"a\":1}");
    }

    #[test]
    fn categories_follow_results() {
        assert_eq!(
            EntryCategory::from(TransitionResult::InternalError),
            EntryCategory::Error
        );
        assert_eq!(
            EntryCategory::from(TransitionResult::UnknownError),
            EntryCategory::Error
        );
        assert_eq!(
            EntryCategory::from(TransitionResult::RepeatUpdateFiltered),
            EntryCategory::Filtered
        );
        assert_eq!(
            EntryCategory::from(TransitionResult::Reset),
            EntryCategory::Reset
        );
        assert_eq!(
            EntryCategory::from(TransitionResult::IllegalChangeNotAdjacent),
            EntryCategory::Warning
        );
    }
}
