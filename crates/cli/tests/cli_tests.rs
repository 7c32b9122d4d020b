// End-to-end tests for the `abgleich` binary: exit codes, stdout contracts,
// written files.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn abgleich() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_abgleich"));
    cmd.env_remove("ABGLEICH_CONFIG");
    cmd.env("RUST_LOG", "off");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&Path], extra: &[&str]) -> Output {
    abgleich()
        .args(args.iter().map(|p| p.as_os_str()))
        .args(extra)
        .output()
        .expect("spawn abgleich")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

const PROTOKOLL: &str = "Auftrags-Nr.;Betrag\nA1;100,00\nA2;50,00\n";
const ABRECHNUNG: &str = "Auftrags-Nr.;Betrag\nA1;100,00\nA3;20,00\n";

// ===========================================================================
// abgleich recon
// ===========================================================================

#[test]
fn recon_discrepancies_exit_1_with_report() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "a.csv", PROTOKOLL);
    let b = write(&dir, "b.csv", ABRECHNUNG);

    let out = abgleich().arg("recon").arg(&a).arg(&b).output().unwrap();
    assert_eq!(out.status.code(), Some(1), "stderr: {}", stderr(&out));

    let report = stdout(&out);
    assert!(report.contains("1 matched"), "{report}");
    assert!(report.contains("MissingInB"), "{report}");
    assert!(report.contains("only in Protokoll"), "{report}");
    assert!(report.contains("MissingInA"), "{report}");
    assert!(stderr(&out).contains("2 discrepancies found"));
}

#[test]
fn recon_clean_exit_0() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "a.csv", PROTOKOLL);
    let b = write(&dir, "b.csv", "Order,Amount\nA2,50.00\nA1,100.004\n");

    let out = abgleich().arg("recon").arg(&a).arg(&b).output().unwrap();
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("2 matched"));
}

#[test]
fn recon_json_is_single_value() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "a.csv", PROTOKOLL);
    let b = write(&dir, "b.csv", ABRECHNUNG);

    let out = abgleich().arg("recon").arg(&a).arg(&b).arg("--json").output().unwrap();
    assert_eq!(out.status.code(), Some(1));

    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim())
        .unwrap_or_else(|e| panic!("stdout must be JSON: {e}\n{}", stdout(&out)));
    assert_eq!(val["summary"]["matches"], 1);
    assert_eq!(val["summary"]["missing_in_a"], 1);
    assert_eq!(val["summary"]["missing_in_b"], 1);
    assert_eq!(val["matches"][0]["type"], "Match");
    assert_eq!(val["matches"][0]["amount"], 100.0);
    assert_eq!(val["discrepancies"][0]["order_number"], "A2");
}

#[test]
fn recon_writes_json_and_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "a.csv", PROTOKOLL);
    let b = write(&dir, "b.csv", ABRECHNUNG);
    let json = dir.path().join("out.json");
    let csv = dir.path().join("out.csv");

    let out = abgleich()
        .arg("recon")
        .arg(&a)
        .arg(&b)
        .arg("--output")
        .arg(&json)
        .arg("--csv")
        .arg(&csv)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(parsed["summary"]["discrepancies"], 2);

    let report = std::fs::read_to_string(&csv).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "Type,Order Number,Side-A Amount,Side-B Amount,Difference,Message");
    assert_eq!(lines[1], "Match,A1,100.00,100.00,,amounts match");
    assert_eq!(lines[2], "MissingInB,A2,50.00,,,missing in Abrechnung");
    assert_eq!(lines[3], "MissingInA,A3,,20.00,,missing in Protokoll");
}

#[test]
fn recon_config_changes_labels_and_tolerance() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "shop.csv", "Rechnung,Brutto\nR-1,10.00\n");
    let b = write(&dir, "bank.csv", "Rechnungsnummer,Bruttobetrag\nR-1,10.40\n");
    let config = write(
        &dir,
        "shop.recon.toml",
        "[labels]\na = \"Shop\"\nb = \"Bank\"\n\n[keywords]\norder_number = [\"Rechnung\"]\n\n[tolerance]\namount = 0.5\n",
    );

    let out = abgleich()
        .arg("recon")
        .arg(&a)
        .arg(&b)
        .arg("--config")
        .arg(&config)
        .arg("--json")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(val["meta"]["labels"]["a"], "Shop");
    assert_eq!(val["summary"]["matches"], 1);
}

#[test]
fn recon_invalid_config_exit_4() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "a.csv", PROTOKOLL);
    let b = write(&dir, "b.csv", ABRECHNUNG);
    let bad_value = write(&dir, "neg.toml", "[tolerance]\namount = -1.0\n");
    let bad_syntax = write(&dir, "broken.toml", "[labels\n");
    let unknown_key = write(&dir, "unknown.toml", "[tolerance]\npercent = 1\n");

    for config in [&bad_value, &bad_syntax, &unknown_key] {
        let out = abgleich()
            .arg("recon")
            .arg(&a)
            .arg(&b)
            .arg("--config")
            .arg(config)
            .output()
            .unwrap();
        assert_eq!(out.status.code(), Some(4), "{}: {}", config.display(), stderr(&out));
        assert!(stderr(&out).starts_with("error: config"));
    }
}

#[test]
fn recon_unreadable_input_exit_3() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "a.csv", PROTOKOLL);
    let missing = dir.path().join("missing.csv");
    let pdf = write(&dir, "b.pdf", "%PDF");

    let out = run(&[Path::new("recon"), a.as_path(), missing.as_path()], &[]);
    assert_eq!(out.status.code(), Some(3));

    let out = run(&[Path::new("recon"), a.as_path(), pdf.as_path()], &[]);
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("hint:  supported"));
}

#[test]
fn recon_without_order_column_is_degraded_not_failed() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(&dir, "a.csv", "Kunde,Betrag\nx,1\n");
    let b = write(&dir, "b.csv", ABRECHNUNG);

    let out = run(&[Path::new("recon"), a.as_path(), b.as_path()], &["--json"]);
    assert_eq!(out.status.code(), Some(0));
    let val: serde_json::Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    assert_eq!(val["summary"]["matches"], 0);
    assert_eq!(val["warnings"][0], "Protokoll: no order number column found");
}

#[test]
fn usage_error_exit_2() {
    let out = abgleich().arg("recon").output().unwrap();
    assert_eq!(out.status.code(), Some(2));

    let out = abgleich().arg("frobnicate").output().unwrap();
    assert_eq!(out.status.code(), Some(2));
}

// ===========================================================================
// abgleich detect
// ===========================================================================

#[test]
fn detect_prints_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "p.csv", "Pos;Auftrags-Nr.;Datum;Betrag\n1;A1;02.01.2024;5\n");

    let out = run(&[Path::new("detect"), file.as_path()], &[]);
    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("order_number"), "{text}");
    assert!(lines[0].contains("B  1  \"Auftrags-Nr.\""), "{text}");
    assert!(lines[1].contains("D  3  \"Betrag\""), "{text}");
    assert!(lines[2].contains("C  2  \"Datum\""), "{text}");
}

#[test]
fn detect_reports_missing_roles() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "x.csv", "Kunde,Ort\nx,y\n");

    let out = run(&[Path::new("detect"), file.as_path()], &[]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out).matches("(not found)").count(), 3);
    assert!(stderr(&out).contains("no order number column"));
}

// ===========================================================================
// abgleich reorder
// ===========================================================================

const LIST: &str = "Name,Wert\nr0,0\nr1,1\nr2,2\nr3,3\nr4,4\n";

#[test]
fn reorder_to_target() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "list.csv", LIST);

    let out = run(&[Path::new("reorder"), file.as_path()], &["--select", "1,3", "--to", "0"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "Name,Wert\nr1,1\nr3,3\nr0,0\nr2,2\nr4,4\n");
}

#[test]
fn reorder_down_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "list.csv", LIST);
    let dest = dir.path().join("moved.csv");

    let out = abgleich()
        .args(["reorder"])
        .arg(&file)
        .args(["--select", "1-2", "--down", "--output"])
        .arg(&dest)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert_eq!(
        std::fs::read_to_string(&dest).unwrap(),
        "Name,Wert\nr0,0\nr3,3\nr1,1\nr2,2\nr4,4\n"
    );
}

#[test]
fn reorder_up_at_top_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "list.csv", LIST);

    let out = run(&[Path::new("reorder"), file.as_path()], &["--select", "0", "--up"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), LIST);
    assert!(stderr(&out).contains("nothing moved"));
}

#[test]
fn reorder_onto_selected_row_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "list.csv", LIST);

    let out = run(&[Path::new("reorder"), file.as_path()], &["--select", "1,3", "--to", "3"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), LIST);
}

#[test]
fn reorder_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "list.csv", LIST);

    let cases: [&[&str]; 5] = [
        &["--select", "9", "--to", "0"],
        &["--select", "1", "--to", "5"],
        &["--select", "x", "--up"],
        &["--select", "1"],
        &["--select", "1", "--up", "--down"],
    ];
    for extra in cases {
        let out = run(&[Path::new("reorder"), file.as_path()], extra);
        assert_eq!(out.status.code(), Some(2), "{extra:?}: {}", stderr(&out));
        assert!(out.stdout.is_empty(), "{extra:?}");
    }
}
