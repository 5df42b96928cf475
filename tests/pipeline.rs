use std::fs;

use depcheck_core::{
    render, FileSource, Granularity, Internality, OutputDetail, OutputFormat, Session,
    SessionConfig,
};
use tempfile::tempdir;

const CONFIG: &str = r#"
granularity = "class"

[[tools]]
name = "structure101"
convention = "underscored"

[[tools]]
name = "pyne"
convention = "dotted"
"#;

const STRUCTURE101: &str = r#"[
    {"kind": "entity", "name": "Foo_Bar", "local_id": 1},
    {"kind": "entity", "name": "(unknown)_Logger", "internality": "external", "local_id": 2},
    {"kind": "dependency",
     "from": "Foo_Bar", "from_local_id": 1,
     "to": "(unknown)_Logger", "to_internality": "external", "to_local_id": 2,
     "amount": 4}
]"#;

const PYNE: &str = r#"[
    {"kind": "entity", "name": "com.foo.Bar", "internality": "internal", "local_id": 10},
    {"kind": "entity", "name": "com.foo.Baz", "internality": "internal", "local_id": 11},
    {"kind": "dependency",
     "from": "com.foo.Bar", "from_internality": "internal", "from_local_id": 10,
     "to": "com.foo.Baz", "to_internality": "internal", "to_local_id": 11}
]"#;

#[test]
fn files_flow_through_session_into_rendered_report() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("run.toml");
    let s101_path = dir.path().join("s101.json");
    let pyne_path = dir.path().join("pyne.json");
    fs::write(&config_path, CONFIG).unwrap();
    fs::write(&s101_path, STRUCTURE101).unwrap();
    fs::write(&pyne_path, PYNE).unwrap();

    let config = SessionConfig::load(&config_path).unwrap();
    assert_eq!(config.granularity, Granularity::Class);

    let mut session = Session::new(&config).unwrap();
    session
        .ingest(&FileSource::new("structure101", &s101_path))
        .unwrap();
    session.ingest(&FileSource::new("pyne", &pyne_path)).unwrap();

    // Foo_Bar and com.foo.Bar converge, Logger and Baz stay single-tool
    assert_eq!(session.entities().len(), 3);
    let bar = session.entities().find("Foo_Bar").unwrap();
    assert_eq!(bar.internality, Internality::Internal);
    assert_eq!(bar.found_by.len(), 3);

    let report = session.compute();
    assert_eq!(report.entities.internal, 2);
    assert_eq!(report.entities.external, 1);
    assert_eq!(report.dependency_count, 2);

    let s101 = report.tool("structure101").unwrap();
    assert_eq!(s101.missed.internal.len(), 1);
    assert_eq!(s101.missing.internal, 50.0);
    assert_eq!(s101.missing.external, 0.0);
    assert_eq!(s101.missing.dependencies, 50.0);

    let pyne = report.tool("pyne").unwrap();
    assert_eq!(pyne.missed.external.len(), 1);
    assert_eq!(pyne.missing.external, 100.0);
    assert!((pyne.missing.total - 100.0 / 3.0).abs() < 1e-9);

    let out = render(&report, &session, OutputDetail::HumanReadable, OutputFormat::Json).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(doc["granularity"], "class");
    assert_eq!(doc["tools"][0]["name"], "structure101");
    assert_eq!(doc["dependencies"]["count"], 2);

    for (block, tool) in doc["tools"].as_array().unwrap().iter().zip(&report.tools) {
        let missed = &block["missed"];
        assert_eq!(missed["percentage_total"], tool.missing.total);
        assert_eq!(missed["percentage_internal"], tool.missing.internal);
        assert_eq!(missed["percentage_external"], tool.missing.external);
        assert_eq!(missed["percentage_unknown"], tool.missing.unknown);
        assert_eq!(block["missed_dependencies"]["percentage_total"], tool.missing.dependencies);
    }
}

#[test]
fn unknown_tool_in_input_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("x.json");
    fs::write(&path, "[]").unwrap();

    let config = SessionConfig::from_toml_str(CONFIG).unwrap();
    let mut session = Session::new(&config).unwrap();
    let err = session.ingest(&FileSource::new("sonar", &path)).unwrap_err();
    assert!(err.to_string().contains("sonar"));
}
