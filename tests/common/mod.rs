//! Common test utilities and helpers for integration tests

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Get the path to test fixtures
pub fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir).join("tests").join("fixtures")
}

/// Read a fixture file into a string
pub fn load_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to read fixture from {:?}", path))
}

/// Run the kml2geojson binary with the given arguments and stdin
pub fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_kml2geojson"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("KML2GEOJSON_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn kml2geojson");

    // The binary may exit before reading everything, so a broken pipe is fine
    let _ = child
        .stdin
        .take()
        .expect("stdin was piped")
        .write_all(stdin.as_bytes());

    child.wait_with_output().expect("Failed to wait for kml2geojson")
}

/// Parse the binary's stdout as JSON
pub fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("Failed to parse stdout as JSON")
}
