//! Check command implementation

use console::Style;

use super::AppContext;
use crate::error::Result;
use crate::reconciler::UpdateCheck;
use crate::ui;

pub fn run(ctx: &AppContext) -> Result<()> {
    let check = ctx.reconciler()?.check()?;
    println!("{}", describe(ctx, &check));
    Ok(())
}

fn describe(ctx: &AppContext, check: &UpdateCheck) -> String {
    let Some(packaged) = &check.packaged else {
        return format!(
            "No packaged map found in {}",
            ctx.resources().display()
        );
    };

    if check.update_available {
        let installed = if check.installed_present {
            format!("installed: {}", ui::version(check.installed))
        } else {
            "no map installed".to_string()
        };
        format!(
            "{} {} ({installed})\nRun 'tacomap update' to install it.",
            Style::new().green().bold().apply_to("Update available:"),
            ui::version(packaged.version())
        )
    } else {
        format!(
            "Map is up to date (version {})",
            ui::version(check.installed)
        )
    }
}
