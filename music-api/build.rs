//! Stamps the binary with a build tag for the startup log line
//!
//! `MUSIC_API_BUILD` reads `<revision>, <profile>, <date>`, e.g.
//! `3f2a9c1d, release, 2026-10-16`. The revision is `unknown` outside a
//! git checkout.

use std::process::Command;

fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let revision = String::from_utf8(output.stdout).ok()?;
    Some(revision.trim().to_owned())
}

fn main() {
    let revision = git_revision().unwrap_or_else(|| "unknown".to_owned());
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_owned());
    let date = chrono::Utc::now().format("%Y-%m-%d");

    println!("cargo:rustc-env=MUSIC_API_BUILD={}, {}, {}", revision, profile, date);
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../.git/HEAD");
}
