//! Export format tests.

use gadm_cli::export::{ExportFormat, write_csv, write_json, write_matches};
use gadm_model::{Match, MatchSet};

fn sample() -> MatchSet {
    MatchSet::new(vec![
        Match {
            query: "New York".to_string(),
            version: "41".to_string(),
            level: 1,
            gid_0: "USA".to_string(),
            gid: "USA.33_1".to_string(),
            matched_name: "New York".to_string(),
            score: 100,
        },
        Match {
            query: "Zurich, Kanton".to_string(),
            version: "36".to_string(),
            level: 1,
            gid_0: "CHE".to_string(),
            gid: "CHE.26_1".to_string(),
            matched_name: "Zürich".to_string(),
            score: 62,
        },
    ])
}

#[test]
fn csv_export_columns() {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, &sample()).expect("write csv");
    let text = String::from_utf8(buffer).expect("utf8");
    insta::assert_snapshot!(text, @r#"
    query,version,level,GID_0,GID,matched_name,score
    New York,41,1,USA,USA.33_1,New York,100
    "Zurich, Kanton",36,1,CHE,CHE.26_1,Zürich,62
    "#);
}

#[test]
fn json_export_round_trips() {
    let matches = sample();
    let mut buffer = Vec::new();
    write_json(&mut buffer, &matches).expect("write json");

    let value: serde_json::Value = serde_json::from_slice(&buffer).expect("parse json");
    assert_eq!(value["skipped_scans"], 0);
    assert_eq!(value["matches"][0]["GID_0"], "USA");
    assert_eq!(value["matches"][1]["matched_name"], "Zürich");

    let decoded: MatchSet = serde_json::from_slice(&buffer).expect("decode match set");
    assert_eq!(decoded, matches);
}

#[test]
fn write_matches_dispatches_on_format() {
    let mut csv = Vec::new();
    write_matches(&mut csv, ExportFormat::Csv, &sample()).expect("csv");
    assert!(csv.starts_with(b"query,version"));

    let mut json = Vec::new();
    write_matches(&mut json, ExportFormat::Json, &MatchSet::default()).expect("json");
    assert!(json.starts_with(b"{"));
    assert!(json.ends_with(b"\n"));
}
