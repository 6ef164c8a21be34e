use std::fs;
use std::path::Path;
use std::process::Command;

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

fn main() {
    // Bump the local build counter
    let build_file = Path::new("BUILD_NUMBER");
    let build: u64 = read_trimmed(build_file)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
        + 1;
    fs::write(build_file, build.to_string()).expect("Failed to write build number");

    let profile = match std::env::var("PROFILE").as_deref() {
        Ok("release") => "release",
        _ => "development",
    };

    let version = read_trimmed(Path::new("VERSION"))
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GRIDCRYPT_VERSION={}", version);
    println!("cargo:rustc-env=GRIDCRYPT_BUILD={}", build);
    println!("cargo:rustc-env=GRIDCRYPT_PROFILE={}", profile);
    println!("cargo:rustc-env=GRIDCRYPT_GIT_HASH={}", git_hash);

    println!("cargo:rerun-if-changed=BUILD_NUMBER");
    println!("cargo:rerun-if-changed=VERSION");
    println!("cargo:rerun-if-env-changed=PROFILE");
}
