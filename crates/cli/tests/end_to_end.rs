//! Drives the actual `modelgen` binary end-to-end: `--create` then
//! `--generate` against a model with a Flyway generator, exercised through
//! the CLI rather than the library directly.

use assert_cmd::Command;
use tempfile::tempdir;

const BIN: &str = "modelgen";

#[test]
fn create_then_listgen_then_generate_round_trip() {
    let dir = tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    let gen_path = dir.path().join("gen");

    Command::cargo_bin(BIN)
        .unwrap()
        .args(["--model", model_path.to_str().unwrap(), "--create"])
        .assert()
        .success();
    assert!(model_path.exists());

    let mut model: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&model_path).unwrap()).unwrap();
    model["tables"] = serde_json::json!([{
        "name": "Member",
        "dbName": "member",
        "columns": [{
            "name": "id",
            "dataType": "Serial",
            "isPrimaryKey": true,
            "nullable": false
        }]
    }]);
    model["generators"] = serde_json::json!([{
        "name": "flyway",
        "generatorKind": "Flyway",
        "outputBasePath": gen_path.to_str().unwrap(),
        "description": ""
    }]);
    std::fs::write(&model_path, serde_json::to_string_pretty(&model).unwrap()).unwrap();

    Command::cargo_bin(BIN)
        .unwrap()
        .args(["--model", model_path.to_str().unwrap(), "--listgen"])
        .assert()
        .success()
        .stdout("flyway\n");

    Command::cargo_bin(BIN)
        .unwrap()
        .args(["--model", model_path.to_str().unwrap(), "--generate", "--flyway"])
        .assert()
        .success();

    let migrations_dir = gen_path.join("migrations");
    let migration_file = std::fs::read_dir(&migrations_dir)
        .unwrap()
        .next()
        .expect("one migration file written")
        .unwrap();
    let contents = std::fs::read_to_string(migration_file.path()).unwrap();
    assert!(contents.contains("CREATE TABLE member("));

    let reloaded: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&model_path).unwrap()).unwrap();
    assert_eq!(reloaded["generatedVersion"], 1);
}

#[test]
fn missing_mode_flag_exits_with_usage_status() {
    let dir = tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    std::fs::write(&model_path, r#"{"name":"demo"}"#).unwrap();

    Command::cargo_bin(BIN)
        .unwrap()
        .args(["--model", model_path.to_str().unwrap()])
        .assert()
        .code(1);
}

#[test]
fn malformed_model_exits_with_parse_error_status() {
    let dir = tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    std::fs::write(&model_path, "not valid json").unwrap();

    Command::cargo_bin(BIN)
        .unwrap()
        .args(["--model", model_path.to_str().unwrap(), "--listgen"])
        .assert()
        .code(2);
}
