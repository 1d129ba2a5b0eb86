//! Update command implementation

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use console::Style;
use tracing::debug;

use super::AppContext;
use crate::cli::UpdateArgs;
use crate::error::Result;
use crate::progress::ExtractProgressBar;
use crate::reconciler::{Outcome, Reconciler};
use crate::source::{DirSource, ResourceSource};
use crate::ui;

pub fn run(ctx: &AppContext, args: UpdateArgs) -> Result<()> {
    let reconciler = ctx.reconciler()?;
    cancel_on_interrupt(reconciler.cancel_handle());
    let progress = progress_for(&reconciler, args.quiet)?;

    let outcome = match reconciler.reconcile(Some(&progress)) {
        Ok(outcome) => outcome,
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };

    match outcome {
        Outcome::Applied(report) => {
            println!(
                "{} {}",
                Style::new().green().bold().apply_to("Installed map version"),
                ui::version(report.version)
            );
            println!("  {} {}", ui::label("Path:"), report.path.display());
            println!(
                "  {} {}",
                ui::label("Size:"),
                ui::formatted_size(report.bytes_written)
            );
            println!("  {} {}", ui::label("Digest:"), report.digest);
        }
        Outcome::UpToDate { installed } => {
            println!("Map is up to date (version {})", ui::version(installed));
        }
        Outcome::NoPackage => {
            println!("No packaged map found in {}", ctx.resources().display());
        }
    }

    Ok(())
}

/// First Ctrl-C cancels the extraction in flight, a second one exits
fn cancel_on_interrupt(cancel: Arc<AtomicBool>) {
    let installed = ctrlc::set_handler(move || {
        if cancel.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        eprintln!("Cancelling map update...");
    });

    if let Err(e) = installed {
        debug!(error = %e, "interrupt handler not installed");
    }
}

fn progress_for(reconciler: &Reconciler<DirSource>, quiet: bool) -> Result<ExtractProgressBar> {
    if quiet {
        return Ok(ExtractProgressBar::hidden());
    }

    let check = reconciler.check()?;
    let Some(packaged) = check.packaged.filter(|_| check.update_available) else {
        return Ok(ExtractProgressBar::hidden());
    };

    let compressed_len = reconciler.source().compressed_len(packaged.as_str());
    debug!(resource = %packaged, ?compressed_len, "showing extraction progress");
    Ok(ExtractProgressBar::new(compressed_len, packaged.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use crate::error::TacoError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_update_installs_packaged_map() {
        let temp = TempDir::new().unwrap();
        let ctx = test_support::context(&temp);
        test_support::package(&ctx, 5, b"taiwan map");

        run(&ctx, UpdateArgs { quiet: true }).unwrap();

        assert_eq!(fs::read(ctx.layout.installed_map()).unwrap(), b"taiwan map");
        assert_eq!(ctx.reconciler().unwrap().installed_version().get(), 5);
    }

    #[test]
    fn test_update_without_package_succeeds() {
        let temp = TempDir::new().unwrap();
        let ctx = test_support::context(&temp);

        run(&ctx, UpdateArgs { quiet: true }).unwrap();
        assert!(!ctx.layout.installed_map().exists());
    }

    #[test]
    fn test_update_reports_corrupt_package() {
        let temp = TempDir::new().unwrap();
        let ctx = test_support::context(&temp);
        fs::create_dir_all(&ctx.resources).unwrap();
        fs::write(
            ctx.resources.join("gzipped-taiwan-taco-0000000002.map"),
            "not gzip",
        )
        .unwrap();

        let err = run(&ctx, UpdateArgs { quiet: false }).unwrap_err();
        assert!(matches!(err, TacoError::Decompression { .. }));
    }
}
