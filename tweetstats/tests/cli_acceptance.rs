use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
    work: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");
        let work = base.join("work");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");
        fs::create_dir_all(&work).expect("failed to create work dir");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
            work,
        }
    }

    fn fixture_path(&self) -> PathBuf {
        self.xdg_data.join("tweetstats/sample_tweets.csv")
    }

    fn write_config(&self, body: &str) {
        let path = self.xdg_config.join("tweetstats/config.toml");
        fs::create_dir_all(path.parent().expect("missing config parent"))
            .expect("failed to create config dir");
        fs::write(path, body).expect("failed to write config");
    }
}

fn csv_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tweetstats-core/tests/fixtures/three_users_two_years.csv")
}

fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("tweetstats"));

    Command::new(bin_path)
        .args(args)
        .current_dir(&env.work)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute tweetstats: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "tweetstats {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

fn report_json(env: &CliTestEnv, args: &[&str]) -> serde_json::Value {
    let output = run_bin(env, args);
    assert_success(args, &output);
    serde_json::from_slice(&output.stdout).expect("stdout should be a JSON report")
}

#[test]
fn report_json_on_synthetic_sample() {
    let env = CliTestEnv::new();
    let args = ["report", "--format", "json", "--seed", "7"];
    let report = report_json(&env, &args);

    assert_eq!(report["dataset_info"]["source"], "synthetic");
    assert_eq!(report["dataset_info"]["unique_users"], 5);
    assert_eq!(report["trends"]["status"], "detected");
    assert!(report["yearly_stats"].as_array().unwrap().len() >= 2);
    assert_eq!(report["engagement"].as_object().unwrap().len(), 3);

    assert!(
        env.fixture_path().exists(),
        "synthetic load should write the fixture at {}",
        env.fixture_path().display()
    );

    let again = report_json(&env, &args);
    assert_eq!(report, again, "same seed must give the same report");
}

#[test]
fn report_markdown_from_csv_input() {
    let env = CliTestEnv::new();
    let input = csv_fixture();
    let input = input.to_str().unwrap();
    let args = ["report", "--input", input, "--format", "md"];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# Tweet Length Statistics"));
    assert!(stdout.contains("(external)"));
    assert!(
        stdout.contains("Average tweet length has increased by 34.5%"),
        "expected trend observation in markdown, got:\n{stdout}"
    );
    assert!(stdout.contains("| Alpha Analyst | 100 |"));
    assert!(stdout.trim_end().ends_with("*Generated by tweetstats*"));
    assert!(!env.fixture_path().exists());
}

#[test]
fn report_text_for_single_user() {
    let env = CliTestEnv::new();
    let input = csv_fixture();
    let args = [
        "report",
        "--input",
        input.to_str().unwrap(),
        "--user",
        "bravo",
    ];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TWEET LENGTH STATISTICS"));
    assert!(stdout.contains("BY YEAR"));
    assert!(stdout.contains("Users:        1"));
    assert!(stdout.contains("Five-number: "));
}

#[test]
fn live_collection_is_labelled_synthetic() {
    let env = CliTestEnv::new();
    let args = [
        "report", "--live", "popstar", "--from", "2020", "--to", "2021", "--format", "json",
    ];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("live collection is not available"),
        "expected provenance notice on stderr, got:\n{stderr}"
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["dataset_info"]["source"], "synthetic");
    assert_eq!(report["dataset_info"]["unique_users"], 1);
    let years: Vec<i64> = report["yearly_stats"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![2020, 2021]);
}

#[test]
fn live_rejects_inverted_year_range() {
    let env = CliTestEnv::new();
    let args = [
        "report", "--live", "popstar", "--from", "2023", "--to", "2020",
    ];
    let output = run_bin(&env, &args);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must not be after"));
}

#[test]
fn seed_is_rejected_with_file_input() {
    let env = CliTestEnv::new();
    let input = csv_fixture();
    let args = ["report", "--input", input.to_str().unwrap(), "--seed", "3"];

    let output = run_bin(&env, &args);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("cannot be used with"),
        "expected argument conflict, got:\n{stderr}"
    );
}

#[test]
fn generate_writes_csv() {
    let env = CliTestEnv::new();
    let out = env.work.join("out/sample.csv");
    let args = ["generate", "--seed", "3", "--out", out.to_str().unwrap()];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Generated "));
    assert!(stdout.contains("(seed 3)"));

    let body = fs::read_to_string(&out).expect("generated file should exist");
    let header = body.lines().next().unwrap();
    assert!(header.starts_with("date,username,displayname,content,word_count"));
    assert!(body.lines().count() > 1000);
}

#[test]
fn generate_honours_config_seed() {
    let env = CliTestEnv::new();
    env.write_config("[generator]\nseed = 99\nstart_year = 2020\nend_year = 2021\n");

    let output = run_bin(&env, &["generate"]);
    assert_success(&["generate"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(seed 99)"));
    assert!(env.fixture_path().exists());
}

#[test]
fn export_filters_by_user_and_year() {
    let env = CliTestEnv::new();
    let out = env.work.join("export.csv");
    let input = csv_fixture();
    let args = [
        "export",
        "--input",
        input.to_str().unwrap(),
        "--user",
        "charlie",
        "--year",
        "2023",
        "--out",
        out.to_str().unwrap(),
    ];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Exported 50 records"));

    let body = fs::read_to_string(&out).unwrap();
    let rows: Vec<&str> = body.lines().skip(1).collect();
    assert_eq!(rows.len(), 50);
    for row in rows {
        assert!(row.starts_with("2023-"), "unexpected year in {row}");
        assert!(row.contains(",charlie,"), "unexpected user in {row}");
    }
}

#[test]
fn unknown_format_fails() {
    let env = CliTestEnv::new();
    let output = run_bin(&env, &["report", "--format", "xml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown format: xml"));
}

#[test]
fn unknown_user_fails_with_no_matching_records() {
    let env = CliTestEnv::new();
    let input = csv_fixture();
    let args = [
        "report",
        "--input",
        input.to_str().unwrap(),
        "--user",
        "nobody",
    ];
    let output = run_bin(&env, &args);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no matching records"),
        "expected filter error, got:\n{stderr}"
    );
}
