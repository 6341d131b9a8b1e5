use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

fn locked_version(lockfile: &str, crate_name: &str) -> Option<String> {
    let name_line = format!("name = \"{crate_name}\"");
    lockfile
        .lines()
        .collect::<Vec<_>>()
        .windows(3)
        .find(|window| window[0].trim() == "[[package]]" && window[1].trim() == name_line)
        .and_then(|window| window[2].trim().strip_prefix("version = "))
        .map(|v| v.trim_matches('"').to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=Cargo.lock");
    println!("cargo:rerun-if-changed=migrations");

    let build_time = chrono::Utc::now().to_rfc3339();

    let axum_version = fs::read_to_string("Cargo.lock")
        .ok()
        .and_then(|lock| locked_version(&lock, "axum"))
        .unwrap_or_else(|| "unknown".to_string());

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rust_version = std::process::Command::new(rustc)
        .arg("--version")
        .output()
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let out_dir = std::env::var("OUT_DIR")?;
    let mut file = File::create(Path::new(&out_dir).join("build_info.rs"))?;
    writeln!(file, "pub const BUILD_TIME: &str = \"{build_time}\";")?;
    writeln!(file, "pub const AXUM_VERSION: &str = \"axum {axum_version}\";")?;
    writeln!(file, "pub const RUST_VERSION: &str = \"{rust_version}\";")?;

    Ok(())
}
