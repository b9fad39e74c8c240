use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let lock_path = manifest_dir.join("../../Cargo.lock");
    println!("cargo:rerun-if-changed={}", lock_path.display());

    let lock = fs::read_to_string(&lock_path).unwrap_or_default();
    println!(
        "cargo:rustc-env=ENVSNAG_AWS_SDK_VERSION={}",
        locked_version(&lock, "aws-config").unwrap_or(UNKNOWN)
    );
    println!(
        "cargo:rustc-env=ENVSNAG_VAULTRS_VERSION={}",
        locked_version(&lock, "vaultrs").unwrap_or(UNKNOWN)
    );
    println!("cargo:rustc-env=ENVSNAG_RUSTC_VERSION={}", rustc_version());
}

/// Find `version = "..."` following `name = "<package>"` in a lock file
fn locked_version<'a>(lock: &'a str, package: &str) -> Option<&'a str> {
    let name_line = format!("name = \"{package}\"");
    let mut lines = lock.lines();
    while let Some(line) = lines.next() {
        if line.trim() == name_line {
            return lines
                .next()
                .and_then(|next| next.trim().strip_prefix("version = \""))
                .and_then(|rest| rest.strip_suffix('"'));
        }
    }
    None
}

fn rustc_version() -> String {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .and_then(|text| text.split_whitespace().nth(1).map(str::to_string))
        .unwrap_or_else(|| UNKNOWN.to_string())
}
