use fitts_core::{Condition, Device, Direction, SessionSummary, TrialRecord};
use fitts_export::{FileSink, RecordSink, to_csv, to_json};

fn record(trial: usize, hit: bool) -> TrialRecord {
    TrialRecord {
        participant_id: "P1".into(),
        device: Device::Mouse,
        block: 1,
        trial_in_block: trial,
        condition: Condition::new(40.0, 200.0, Direction::Right),
        id_shannon: 2.5,
        movement_time_ms: 431.25,
        path_length_px: 212.5,
        target_cx: 840.0,
        target_cy: 400.0,
        click_x: 842.0,
        click_y: 398.5,
        hit,
    }
}

#[test]
fn csv_header_and_rows() {
    let csv = to_csv(&[record(1, true), record(2, false)]).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "participant_id,device,block,trial_in_block,diameter_px,distance_px,direction,id_shannon,movement_time_ms,path_length_px,target_cx,target_cy,click_x,click_y,hit"
    );
    assert_eq!(
        lines[1],
        "P1,mouse,1,1,40,200,right,2.5,431.25,212.5,840,400,842,398.5,1"
    );
    assert!(lines[2].ends_with(",0"));
    assert!(!csv.ends_with('\n'));
}

#[test]
fn csv_quotes_participant_ids_with_delimiters() {
    let mut r = record(1, true);
    r.participant_id = "Smith, J".into();
    let csv = to_csv(&[r]).unwrap();
    assert!(csv.lines().nth(1).unwrap().starts_with("\"Smith, J\",mouse,"));
}

#[test]
fn json_is_pretty_and_keeps_field_names() {
    let json = to_json(&[record(1, true)]).unwrap();
    assert!(json.starts_with("[\n  {\n"));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let first = &value[0];
    for name in TrialRecord::FIELD_NAMES {
        assert!(first.get(name).is_some(), "missing {name}");
    }
    assert_eq!(first["hit"], 1);
}

#[test]
fn file_sink_writes_both_exports() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("exports");
    let records = vec![record(1, true), record(2, false)];
    let summary = SessionSummary::from_records("P1", Device::Mouse, &records);

    let mut sink = FileSink::new(out.clone());
    let paths = sink.consume(&records, &summary).unwrap();

    assert_eq!(paths.csv, out.join("fitts_trials_P1.csv"));
    assert_eq!(paths.json, out.join("fitts_trials_P1.json"));
    assert_eq!(std::fs::read_to_string(&paths.csv).unwrap(), to_csv(&records).unwrap());
    let back: Vec<TrialRecord> =
        serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
    assert_eq!(back.len(), 2);
    assert!(back[0].hit && !back[1].hit);
}

#[test]
fn file_sink_reports_unwritable_directory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "x").unwrap();

    let records = vec![record(1, true)];
    let summary = SessionSummary::from_records("P1", Device::Mouse, &records);
    let err = FileSink::new(blocker.join("sub"))
        .consume(&records, &summary)
        .unwrap_err();
    assert!(err.to_string().starts_with("failed to write"));
}
