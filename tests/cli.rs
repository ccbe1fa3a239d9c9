use std::fs;
use std::path::PathBuf;
use std::process::Command;

use assert_cmd::cargo::CommandCargoExt;

/// Fresh scratch directory per test so runs don't collide.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stax-cli-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn stax() -> Command {
    Command::cargo_bin("stax").unwrap()
}

#[test]
fn assemble_then_run() {
    let dir = scratch("roundtrip");
    let source = dir.join("sum.asm");
    let object = dir.join("sum.obj");
    let disk = dir.join("sum.dsk");

    // 0x23 + 0x1e = 0x41 = 'A'
    fs::write(&source, "push 23\npush 1e\nadd\npush 0\nout\nhalt\n").unwrap();

    let out = stax()
        .args([
            "asm",
            source.to_str().unwrap(),
            object.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(out.status.success());

    let obj_text = fs::read_to_string(&object).unwrap();
    assert_eq!(obj_text.lines().count(), 9);

    let out = stax()
        .args([
            "run",
            object.to_str().unwrap(),
            disk.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains('A'));
}

#[test]
fn listing_holds_symbols() {
    let dir = scratch("listing");
    let source = dir.join("prog.asm");
    let object = dir.join("prog.obj");
    let listing = dir.join("prog.lst");

    fs::write(&source, "start: push 1\nbra start\n").unwrap();

    let out = stax()
        .args([
            "asm",
            source.to_str().unwrap(),
            object.to_str().unwrap(),
            "-l",
            listing.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = fs::read_to_string(&listing).unwrap();
    assert!(text.contains("START"));
    assert!(text.contains("Symbol Table"));
}

#[test]
fn check_fails_on_undefined_symbol() {
    let dir = scratch("check");
    let source = dir.join("bad.asm");
    fs::write(&source, "bra nowhere\nhalt\n").unwrap();

    let out = stax()
        .args(["check", source.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn error_cap_exits_fail() {
    let dir = scratch("cap");
    let source = dir.join("noise.asm");
    fs::write(&source, "frob\n".repeat(9)).unwrap();

    let out = stax()
        .args([
            "asm",
            source.to_str().unwrap(),
            dir.join("noise.obj").to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn symbols_lists_catalog() {
    let out = stax().arg("symbols").output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("HALT"));
    assert!(text.contains("2000"));
}
