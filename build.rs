use std::env;
use std::path::Path;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");
    if Path::new(".git/refs/tags").exists() {
        println!("cargo:rerun-if-changed=.git/refs/tags/");
    }

    let pkg_version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());

    // Release tags win; otherwise append the short commit hash.
    let version = match git_output(&["describe", "--tags", "--exact-match"]) {
        Some(tag) => tag,
        None => match git_output(&["rev-parse", "--short", "HEAD"]) {
            Some(hash) => format!("{}+{}", pkg_version, hash),
            None => pkg_version,
        },
    };

    println!("cargo:rustc-env=BUILD_VERSION={}", version);
}

fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!text.is_empty()).then_some(text)
}
