//! Theme command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;

use crate::store::{SessionStore, Theme};

/// Theme subcommands
#[derive(Subcommand)]
pub enum ThemeCommands {
    /// Show the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme
    Set {
        #[arg(value_enum)]
        theme: Theme,
    },
}

/// Handle theme commands; no subcommand shows the theme
pub fn handle_theme_command(command: Option<ThemeCommands>, store: &dyn SessionStore) -> Result<()> {
    let current = store.theme().context("Failed to read the theme")?;

    let theme = match command.unwrap_or(ThemeCommands::Show) {
        ThemeCommands::Show => {
            println!("{} {}", "Theme:".bold(), current.as_str());
            return Ok(());
        }
        ThemeCommands::Toggle => current.toggled(),
        ThemeCommands::Set { theme } => theme,
    };

    store.set_theme(theme).context("Failed to save the theme")?;
    println!("{} {}", "✓ Theme set to".green(), theme.as_str().bold());
    Ok(())
}
