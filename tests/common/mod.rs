//! Common test utilities for tacomap integration tests

use std::io::Write;
use std::path::PathBuf;

use assert_cmd::Command;
use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

/// Data and resource directories for one test run
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Data directory holding map/ and prefs/
    pub data_dir: PathBuf,
    /// Directory with packaged map resources
    pub resources: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let data_dir = temp.path().join("data");
        let resources = temp.path().join("assets");
        std::fs::create_dir_all(&resources).expect("Failed to create resource directory");
        Self {
            temp,
            data_dir,
            resources,
        }
    }

    /// Command for the real binary pointed at this workspace
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tacomap").expect("tacomap binary is built");
        cmd.env("TACOMAP_DATA_DIR", &self.data_dir)
            .env("TACOMAP_RESOURCES", &self.resources)
            .env_remove("RUST_LOG");
        cmd
    }

    /// Package `payload` as the map resource of `version`
    pub fn package(&self, version: u64, payload: &[u8]) -> PathBuf {
        let path = self
            .resources
            .join(format!("gzipped-taiwan-taco-{version:010}.map"));
        std::fs::write(&path, gzip(payload)).expect("Failed to write resource");
        path
    }

    /// Remove every packaged resource
    #[allow(dead_code)]
    pub fn clear_resources(&self) {
        for entry in std::fs::read_dir(&self.resources).expect("Failed to list resources") {
            let entry = entry.expect("Failed to read entry");
            std::fs::remove_file(entry.path()).expect("Failed to remove resource");
        }
    }

    pub fn map_dir(&self) -> PathBuf {
        self.data_dir.join("map")
    }

    pub fn installed_map(&self) -> PathBuf {
        self.map_dir().join("taiwan-taco.map")
    }

    #[allow(dead_code)]
    pub fn prefs_file(&self) -> PathBuf {
        self.data_dir.join("prefs").join("TaiwanMapView.json")
    }

    /// Contents of the installed map
    #[allow(dead_code)]
    pub fn read_map(&self) -> Vec<u8> {
        std::fs::read(self.installed_map()).expect("Failed to read installed map")
    }
}

pub fn gzip(payload: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).expect("Failed to compress");
    encoder.finish().expect("Failed to finish gzip stream")
}
