use std::path::Path;
use std::process::{Command, Output};

fn pathlink_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pathlink"));
    cmd.current_dir(dir);
    cmd.env_remove("PATHLINK_LOG");
    cmd
}

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn scan_lists_existing_links_only() {
    let out = pathlink_cmd(&fixture("site")).arg("scan").output().unwrap();
    assert!(out.status.success(), "scan failed: {}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("fern/pages/intro.mdx:3:13-23  ./guide.md -> "), "{text}");
    assert!(text.contains("/snippets/note.mdx -> "), "{text}");
    assert!(text.contains("../assets/logo.png -> "), "{text}");
    assert!(!text.contains("missing.md"), "{text}");
    assert!(stderr(&out).contains("7 links in 3 files"), "{}", stderr(&out));
}

#[test]
fn scan_json_targets_all_exist() {
    let out = pathlink_cmd(&fixture("site"))
        .args(["scan", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success(), "scan failed: {}", stderr(&out));

    let records: Vec<serde_json::Value> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(records.len(), 7);
    for record in &records {
        let target = record["target"].as_str().unwrap();
        assert!(Path::new(target).exists(), "missing target {target}");
    }

    let snippet = records
        .iter()
        .find(|r| r["raw"] == "/snippets/note.mdx")
        .unwrap();
    assert_eq!(snippet["rule"], "marker");
    assert_eq!(snippet["line"], 3);
    assert!(snippet["target"].as_str().unwrap().ends_with("fern/snippets/note.mdx"));

    let workspace = records
        .iter()
        .find(|r| r["raw"] == "/fern/pages/guide.md")
        .unwrap();
    assert_eq!(workspace["rule"], "workspace");
}

#[test]
fn scan_single_file() {
    let out = pathlink_cmd(&fixture("site"))
        .args(["scan", "fern/pages/guide.md"])
        .output()
        .unwrap();
    assert!(out.status.success(), "scan failed: {}", stderr(&out));
    assert_eq!(stdout(&out).lines().count(), 2);
}

#[test]
fn open_prints_resolved_path() {
    let out = pathlink_cmd(&fixture("site"))
        .args(["open", "fern/pages/intro.mdx", "--line", "3", "--column", "14"])
        .output()
        .unwrap();
    assert!(out.status.success(), "open failed: {}", stderr(&out));
    assert!(stdout(&out).trim_end().ends_with("fern/pages/guide.md"));
    assert!(stderr(&out).contains("Opened: guide.md"));
}

#[test]
fn open_missing_target_reports_attempted_path() {
    let out = pathlink_cmd(&fixture("site"))
        .args(["open", "fern/pages/intro.mdx", "--line", "3", "--column", "40"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("fern/pages/missing.md"), "{}", stderr(&out));
}

#[test]
fn open_without_token_fails_softly() {
    let out = pathlink_cmd(&fixture("site"))
        .args(["open", "fern/pages/intro.mdx", "--line", "1", "--column", "1"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("No File Path At Cursor"));
}

#[test]
fn open_non_text_target_is_an_open_failure() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.mdx"), "<img src=\"x.png\" />\n").unwrap();
    std::fs::write(dir.path().join("x.png"), [0x89, 0x50, 0xff, 0xfe, 0x00]).unwrap();

    let out = pathlink_cmd(dir.path())
        .args(["open", "a.mdx", "--line", "1", "--column", "11"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(stdout(&out).is_empty(), "{}", stdout(&out));
    assert!(stderr(&out).contains("Could Not Open File"), "{}", stderr(&out));
}

#[test]
fn open_without_token_reports_character_column() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.md"), "\u{e9}\u{e9}\u{e9} x\n").unwrap();

    let out = pathlink_cmd(dir.path())
        .args(["open", "a.md", "--line", "1", "--column", "4"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("line 1, column 4"), "{}", stderr(&out));
}

#[test]
fn open_rejects_zero_line_and_column() {
    for args in [["--line", "0", "--column", "1"], ["--line", "1", "--column", "0"]] {
        let out = pathlink_cmd(&fixture("site"))
            .args(["open", "fern/pages/intro.mdx"])
            .args(args)
            .output()
            .unwrap();
        assert_eq!(out.status.code(), Some(2), "{args:?}");
        assert!(stdout(&out).is_empty(), "{}", stdout(&out));
    }
}

#[test]
fn info_json_lists_patterns_from_one() {
    let out = pathlink_cmd(&fixture("site")).args(["info", "--json"]).output().unwrap();
    assert!(out.status.success(), "info failed: {}", stderr(&out));

    let info: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    let priorities: Vec<u64> = info["patterns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["priority"].as_u64().unwrap())
        .collect();
    assert_eq!(priorities, vec![1, 2, 3]);
    assert_eq!(info["patterns"][0]["group"], 1);
}

#[test]
fn resolve_shows_rule() {
    let out = pathlink_cmd(&fixture("site"))
        .args(["resolve", "/snippets/note.mdx", "--from", "fern/pages/intro.mdx"])
        .output()
        .unwrap();
    assert!(out.status.success(), "resolve failed: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("fern/snippets/note.mdx"), "{text}");
    assert!(text.contains("marker directory, exists"), "{text}");
}

#[test]
fn links_toggle_gates_scan_but_not_open() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.md"), "see b.md\n").unwrap();
    std::fs::write(dir.path().join("b.md"), "").unwrap();

    let off = pathlink_cmd(dir.path()).args(["links", "off"]).output().unwrap();
    assert!(off.status.success());
    assert!(stdout(&off).contains("OFF"));

    let scan = pathlink_cmd(dir.path()).arg("scan").output().unwrap();
    assert!(scan.status.success());
    assert!(stdout(&scan).is_empty());

    let open = pathlink_cmd(dir.path())
        .args(["open", "a.md", "--line", "1", "--column", "6"])
        .output()
        .unwrap();
    assert!(open.status.success(), "open failed: {}", stderr(&open));

    let on = pathlink_cmd(dir.path()).args(["links", "toggle"]).output().unwrap();
    assert!(stdout(&on).contains("ON"));

    let scan = pathlink_cmd(dir.path()).arg("scan").output().unwrap();
    assert!(stdout(&scan).contains("b.md"));
}

#[test]
fn direct_strategy_from_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("docs")).unwrap();
    std::fs::write(dir.path().join(".pathlink.toml"), "strategy = \"direct\"\n").unwrap();
    std::fs::write(dir.path().join("docs/a.md"), "see /docs/b.md\n").unwrap();
    std::fs::write(dir.path().join("docs/b.md"), "").unwrap();

    let out = pathlink_cmd(dir.path()).arg("scan").output().unwrap();
    assert!(out.status.success());
    assert!(stdout(&out).is_empty(), "{}", stdout(&out));
}
