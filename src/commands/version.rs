//! Version command implementation

use crate::error::Result;
use crate::prefs::{MAP_NAMESPACE, MAP_VERSION_KEY};
use crate::resource::{RESOURCE_PREFIX, RESOURCE_SUFFIX, VERSION_DIGITS};
use crate::storage::{self, MAP_NAME};

/// Print the tool version and the map conventions it was built with
pub fn run() -> Result<()> {
    println!("tacomap {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Map conventions:");
    println!(
        "  Packaged resource: {RESOURCE_PREFIX}<{VERSION_DIGITS} digits>{RESOURCE_SUFFIX}"
    );
    println!("  Installed map: {MAP_NAME}");
    println!("  Version record: {MAP_NAMESPACE}/{MAP_VERSION_KEY}");
    match storage::default_data_dir() {
        Ok(dir) => println!("  Default data directory: {}", dir.display()),
        Err(_) => println!("  Default data directory: unavailable"),
    }
    println!();
    println!(
        "Built with rustc >= {} ({})",
        env!("CARGO_PKG_RUST_VERSION"),
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );

    Ok(())
}
