use serde_json::Value;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Helper struct to manage test environment
struct TestEnv {
    _temp_dir: TempDir,
    work_dir: PathBuf,
    binary_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let work_dir = temp_dir.path().to_path_buf();

        Self {
            _temp_dir: temp_dir,
            work_dir,
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_emo")),
        }
    }

    /// Write a file into the working directory
    fn write(&self, name: &str, content: &str) {
        std::fs::write(self.work_dir.join(name), content).expect("Failed to write test file");
    }

    /// Run an emo command and return the output
    fn run(&self, args: &[&str]) -> Result<String, String> {
        let output = Command::new(&self.binary_path)
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .expect("Failed to execute emo command");

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).to_string())
        }
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let output = self.run(args).expect("Command failed");
        serde_json::from_str(&output).expect("Output should be valid JSON")
    }
}

const FLU_TABLE: &str = "\
name,type,unit
deceased population,timeseries,people
infected fraction R1,timeseries,fraction
max infected,scalar,people
";

const FLU_DEFINITIONS: &str = r#"
[[outcome]]
name = "deceased population"
type = "timeseries"

[[outcome]]
name = "peak infected"
type = "timeseries"
kind = "minimize"
variable_name = "infected fraction R1"
function = "max"
reduce = "max"

[[outcome]]
name = "final deaths"
type = "timeseries"
kind = "minimize"
variable_name = "deceased population"
reduce = "last"
"#;

const FLU_RUN: &str = r#"{
    "deceased population": [0, 2, 5, 9],
    "infected fraction R1": [0.01, 0.2, 0.35, 0.1],
    "max infected": 35
}"#;

#[test]
fn test_list_csv_table() {
    let env = TestEnv::new();
    env.write("outcomes.csv", FLU_TABLE);

    let output = env.run(&["list", "outcomes.csv"]).expect("List failed");
    assert!(output.contains("deceased population [timeseries]"));
    assert!(output.contains("max infected [scalar]"));
    assert!(output.contains("Kind: info"));
}

#[test]
fn test_list_json_preserves_row_order() {
    let env = TestEnv::new();
    env.write("outcomes.csv", FLU_TABLE);

    let json = env.run_json(&["list", "outcomes.csv", "--json"]);
    let outcomes = json.as_array().expect("Expected an array");
    let names: Vec<&str> = outcomes
        .iter()
        .map(|o| o["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["deceased population", "infected fraction R1", "max infected"]
    );
    assert_eq!(outcomes[0]["type"], "timeseries");
    assert_eq!(outcomes[2]["type"], "scalar");
    assert_eq!(outcomes[2]["kind"], "info");
    assert_eq!(outcomes[2]["variable_name"][0], "max infected");
}

#[test]
fn test_list_with_custom_delimiter() {
    let env = TestEnv::new();
    env.write("outcomes.csv", "name;type\na;scalar\n");

    let output = env
        .run(&["list", "outcomes.csv", "--delimiter", ";"])
        .expect("List failed");
    assert!(output.contains("a [scalar]"));

    let result = env.run(&["list", "outcomes.csv"]);
    assert!(result.unwrap_err().contains("no name column"));
}

#[test]
fn test_list_rejects_unknown_type() {
    let env = TestEnv::new();
    env.write("outcomes.csv", "name,type\npeak,scaler\n");

    let err = env
        .run(&["list", "outcomes.csv"])
        .expect_err("Unknown type should fail");
    assert!(err.contains("unknown type 'scaler' for peak"));
    assert!(err.contains("Did you mean: scalar"));
}

#[test]
fn test_list_rejects_missing_type_column() {
    let env = TestEnv::new();
    env.write("outcomes.csv", "name\npeak\n");

    let err = env
        .run(&["list", "outcomes.csv"])
        .expect_err("Missing type column should fail");
    assert!(err.contains("no type column"));
}

#[test]
fn test_list_definitions_file() {
    let env = TestEnv::new();
    env.write("outcomes.toml", FLU_DEFINITIONS);

    let output = env.run(&["list", "outcomes.toml"]).expect("List failed");
    assert!(output.contains("peak infected [timeseries]"));
    assert!(output.contains("Kind: minimize"));
    assert!(output.contains("Variables: infected fraction R1"));
    assert!(output.contains("Function:"));
}

#[test]
fn test_process_csv_table_is_identity() {
    let env = TestEnv::new();
    env.write("outcomes.csv", FLU_TABLE);
    env.write("run.json", FLU_RUN);

    let json = env.run_json(&["process", "outcomes.csv", "run.json", "--json"]);
    let outcomes = json["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0]["name"], "deceased population");
    assert_eq!(outcomes[0]["value"], serde_json::json!([0.0, 2.0, 5.0, 9.0]));
    assert_eq!(outcomes[2]["value"], 35.0);
    assert!(json["objectives"].as_array().unwrap().is_empty());
}

#[test]
fn test_process_definitions_with_objectives() {
    let env = TestEnv::new();
    env.write("outcomes.toml", FLU_DEFINITIONS);
    env.write("run.json", FLU_RUN);

    let json = env.run_json(&["process", "outcomes.toml", "run.json", "--json"]);
    assert_eq!(json["outcomes"][1]["name"], "peak infected");
    assert_eq!(json["outcomes"][1]["value"], 0.35);

    let objectives = json["objectives"].as_array().unwrap();
    assert_eq!(objectives.len(), 2);
    assert_eq!(objectives[0]["name"], "peak infected");
    assert_eq!(objectives[0]["kind"], "minimize");
    assert_eq!(objectives[0]["direction"], -1);
    assert_eq!(objectives[0]["value"], 0.35);
    assert_eq!(objectives[1]["name"], "final deaths");
    assert_eq!(objectives[1]["value"], 9.0);

    let output = env
        .run(&["process", "outcomes.toml", "run.json"])
        .expect("Process failed");
    assert!(output.contains("peak infected: 0.35"));
    assert!(output.contains("Objectives:"));
}

#[test]
fn test_process_reports_missing_variable() {
    let env = TestEnv::new();
    env.write("outcomes.csv", FLU_TABLE);
    env.write("run.json", r#"{"deceased population": [1, 2]}"#);

    let err = env
        .run(&["process", "outcomes.csv", "run.json"])
        .expect_err("Missing variable should fail");
    assert!(err.contains("no value for variable 'infected fraction R1'"));
}

#[test]
fn test_process_reports_unreadable_run() {
    let env = TestEnv::new();
    env.write("outcomes.csv", FLU_TABLE);

    let err = env
        .run(&["process", "outcomes.csv", "missing.json"])
        .expect_err("Missing run file should fail");
    assert!(err.contains("Failed to load run output"));
}

#[test]
fn test_invalid_definitions_fail() {
    let env = TestEnv::new();
    env.write(
        "outcomes.toml",
        "[[outcome]]\nname = \"a\"\ntype = \"scalar\"\nvariable_name = [1, 2]\n",
    );

    let err = env
        .run(&["list", "outcomes.toml"])
        .expect_err("Non-string variable names should fail");
    assert!(err.contains("variable name must be a string or list of strings"));
}
