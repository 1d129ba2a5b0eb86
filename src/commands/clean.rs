//! Clean command implementation

use crate::error::{Result, fs as fs_error};
use crate::reconciler::MapDirLock;
use crate::storage;

use super::AppContext;

pub fn run(ctx: &AppContext) -> Result<()> {
    let map_dir = ctx.layout.map_dir();

    // Staged files of a running extraction are not leftovers
    let Some(_lock) = MapDirLock::try_acquire(&map_dir)? else {
        return Err(fs_error::lock_failed(
            map_dir.join(storage::LOCK_FILE),
            "a map update is in progress",
        ));
    };

    let removed = storage::clean_leftovers(&map_dir)?;

    if removed.is_empty() {
        println!("Nothing to clean.");
    } else {
        println!("Removed {} leftover file(s):", removed.len());
        for path in &removed {
            println!("  {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use crate::error::TacoError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_staged_file() {
        let temp = TempDir::new().unwrap();
        let ctx = test_support::context(&temp);
        ctx.layout.ensure().unwrap();
        let staged = ctx.layout.map_dir().join("taiwan-taco.map.tmp");
        fs::write(&staged, "partial").unwrap();

        run(&ctx).unwrap();
        assert!(!staged.exists());
    }

    #[test]
    fn test_clean_refuses_while_locked() {
        let temp = TempDir::new().unwrap();
        let ctx = test_support::context(&temp);
        let _held = MapDirLock::acquire(&ctx.layout.map_dir()).unwrap();

        let err = run(&ctx).unwrap_err();
        assert!(matches!(err, TacoError::LockFailed { .. }));
    }
}
