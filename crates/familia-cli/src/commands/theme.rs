//! The `familia theme` command.

use anyhow::{anyhow, bail, Result};

use familia_core::settings::Theme;

use super::App;

pub fn execute(app: &App, value: Option<&str>) -> Result<()> {
    let theme = match value {
        Some(value) => {
            let theme: Theme = value.parse().map_err(|e: String| anyhow!(e))?;
            if !app.settings.set_theme(theme) {
                bail!("failed to save theme");
            }
            theme
        }
        None => app.settings.theme(),
    };
    println!("Theme: {theme}");
    Ok(())
}
