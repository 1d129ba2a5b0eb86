//! Status command implementation

use std::fs;
use std::path::Path;

use super::AppContext;
use crate::error::{Result, fs as fs_error};
use crate::hash;
use crate::storage;
use crate::ui;

pub fn run(ctx: &AppContext) -> Result<()> {
    let reconciler = ctx.reconciler()?;
    let check = reconciler.check()?;
    let installed_map = ctx.layout.installed_map();

    println!("Map Status:");
    println!("  {} {}", ui::label("Data directory:"), ctx.layout.root().display());
    println!(
        "  {} {}",
        ui::label("Resources:"),
        reconciler.source().root().display()
    );

    if check.installed_present {
        let size = installed_size(&installed_map)?;
        println!(
            "  {} {} ({})",
            ui::label("Installed map:"),
            installed_map.display(),
            ui::formatted_size(size)
        );
        println!("  {} {}", ui::label("Digest:"), hash::hash_file(&installed_map)?);
    } else {
        println!("  {} not installed", ui::label("Installed map:"));
    }

    println!(
        "  {} {}",
        ui::label("Installed version:"),
        ui::version(check.installed)
    );

    match &check.packaged {
        Some(packaged) => println!(
            "  {} {} ({})",
            ui::label("Packaged version:"),
            ui::version(packaged.version()),
            packaged
        ),
        None => println!("  {} none", ui::label("Packaged version:")),
    }

    println!(
        "  {} {}",
        ui::label("Update available:"),
        if check.update_available { "yes" } else { "no" }
    );

    let leftovers = storage::find_leftovers(reconciler.map_dir())?;
    if !leftovers.is_empty() {
        println!(
            "\n{} leftover file(s) from interrupted extractions. Run 'tacomap clean' to remove them.",
            leftovers.len()
        );
    }

    Ok(())
}

fn installed_size(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path).map_err(|e| fs_error::read_failed(path, e))?;
    Ok(metadata.len())
}
