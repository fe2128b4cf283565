use fitts_core::TrialRecord;

/// Pretty-printed JSON array of all records.
pub fn to_json(records: &[TrialRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
