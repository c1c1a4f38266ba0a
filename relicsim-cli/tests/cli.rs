use std::fs;
use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "relicsim-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

const RELIC_LIST: &str = r#"{
    "Config": { "BaseItemLevel": 900, "ItemLevelSteps": 5, "MaximumLevelIncrease": 10 },
    "Weapons": { "Feral": "main_hand=fangs_of_ashamane,id=128860,bonus_id=740" },
    "Traits": {
        "Feral": [ { "name": "Shadow Wave", "spellId": 210620 } ],
        "Crucible": [ { "name": "Light Speed", "spellId": 252088 } ]
    }
}"#;

const ENGINE_OUTPUT: &str = r#"{
    "version": "735-01",
    "build_date": "Jan 10 2018",
    "sim": {
        "players": [
            { "name": "Template", "collected_data": { "dps": { "mean": 1000.0 } } }
        ],
        "profilesets": { "results": [
            { "name": "Weapon Item Level_5", "mean": 1050.0 },
            { "name": "Weapon Item Level_10", "mean": 1120.0 },
            { "name": "Shadow Wave_1", "mean": 1080.0 },
            { "name": "Shadow Wave_2", "mean": 1090.0 },
            { "name": "Shadow Wave_3", "mean": 1095.0 },
            { "name": "Light Speed_1", "mean": 1005.0 }
        ] }
    }
}"#;

#[test]
fn cli_analyze_writes_report_and_metadata() {
    let exe = env!("CARGO_BIN_EXE_relicsim");
    let dir = temp_path("analyze");
    fs::create_dir_all(&dir).expect("create temp dir");
    let input = dir.join("engine.json");
    let relic_list = dir.join("RelicList.json");
    let report = dir.join("report.json");
    let meta = dir.join("meta").join("report.json");
    fs::write(&input, ENGINE_OUTPUT).expect("write engine output");
    fs::write(&relic_list, RELIC_LIST).expect("write relic list");

    let output = Command::new(exe)
        .args(["analyze", "--spec", "Feral", "--input"])
        .arg(&input)
        .arg("--relic-list")
        .arg(&relic_list)
        .arg("--report")
        .arg(&report)
        .arg("--meta")
        .arg(&meta)
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Relic Simulation"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("read report")).expect("json");
    let rows = report.as_array().expect("rows");
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[1][0], "Weapon Item Level");
    assert_eq!(rows[4][0], "% DPS Gain");

    let meta: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&meta).expect("read meta")).expect("json");
    assert_eq!(meta["version"], "735-01");
    assert_eq!(
        meta["crucibleweight"],
        "cruweight^128860^ilvl^1^252088^0.5^210620^5:8.0 6:1.0 7:0.5^end"
    );
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn cli_analyze_fails_without_baseline() {
    let exe = env!("CARGO_BIN_EXE_relicsim");
    let dir = temp_path("nobaseline");
    fs::create_dir_all(&dir).expect("create temp dir");
    let input = dir.join("engine.json");
    let relic_list = dir.join("RelicList.json");
    fs::write(
        &input,
        r#"{ "sim": { "players": [], "profilesets": { "results": [ { "name": "Weapon Item Level_5", "mean": 1.0 } ] } } }"#,
    )
    .expect("write engine output");
    fs::write(&relic_list, RELIC_LIST).expect("write relic list");

    let output = Command::new(exe)
        .args(["analyze", "--spec", "Feral", "--input"])
        .arg(&input)
        .arg("--relic-list")
        .arg(&relic_list)
        .arg("--report")
        .arg(dir.join("report.json"))
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no baseline sample"), "{stderr}");
    assert!(!dir.join("report.json").exists());
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn cli_composite_combines_reports() {
    let exe = env!("CARGO_BIN_EXE_relicsim");
    let dir = temp_path("composite");
    fs::create_dir_all(dir.join("meta")).expect("create temp dir");
    for (fight, csv) in [
        ("Patchwerk", "Druid,Feral,A,10\n"),
        ("HecticAddCleave", "Druid,Feral,A,5\n"),
    ] {
        fs::write(dir.join(format!("Combinator_{fight}_T21.csv")), csv).expect("write csv");
        fs::write(
            dir.join("meta").join(format!("Combinator_{fight}_T21.json")),
            r#"{ "build_date": "Jan 10 2018" }"#,
        )
        .expect("write meta");
    }
    let model = dir.join("model.json");
    fs::write(
        &model,
        r#"{ "Fightstyle_model": { "Patchwerk": 2, "HecticAddCleave": 3, "BeastLord": 0 } }"#,
    )
    .expect("write model");
    let composite = dir.join("Combinator_Composite_T21.csv");
    fs::write(&composite, "stale\n").expect("write stale output");

    let status = Command::new(exe)
        .args(["composite", "--profile", "T21", "--model"])
        .arg(&model)
        .arg("--reports-dir")
        .arg(&dir)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = fs::read_to_string(&composite).expect("read composite");
    assert_eq!(content, "Druid,Feral,A,35\n");
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn cli_composite_rejects_missing_reports() {
    let exe = env!("CARGO_BIN_EXE_relicsim");
    let dir = temp_path("composite-missing");
    fs::create_dir_all(&dir).expect("create temp dir");
    let model = dir.join("model.json");
    fs::write(&model, r#"{ "Fightstyle_model": { "Patchwerk": 1 } }"#).expect("write model");

    let output = Command::new(exe)
        .args(["composite", "--profile", "T21", "--model"])
        .arg(&model)
        .arg("--reports-dir")
        .arg(&dir)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("report missing"));
    let _ = fs::remove_dir_all(dir);
}
