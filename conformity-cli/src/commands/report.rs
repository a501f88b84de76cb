//! Report command handler
//!
//! Fetches the compliance report of a completed job and either prints one
//! filtered view or runs the interactive viewer on stdin.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::*;
use conformity_client::ComparisonClient;
use conformity_core::domain::job::SessionId;
use conformity_core::domain::report::ReportEntry;
use conformity_core::view::{PanelEntry, ReportView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::actions::{EntryActions, TerminalActionView};
use crate::commands::download;
use crate::config::Config;
use crate::render;
use crate::store::Theme;

pub async fn handle_report(
    config: &Config,
    session: &SessionId,
    theme: Theme,
    search: Option<String>,
) -> Result<()> {
    let client = config.client()?;
    let entries = client
        .fetch_report(session)
        .await
        .context("Failed to fetch the report")?;

    match search {
        Some(term) => {
            let mut view = ReportView::new(entries);
            run_search(&mut view, &term, config.min_search_len, theme);
            Ok(())
        }
        None => run_viewer(config, &client, session, theme, entries).await,
    }
}

/// One line of viewer input
#[derive(Debug, Clone, PartialEq, Eq)]
enum ViewerCommand {
    Search(String),
    Toggle(usize),
    Explain(usize),
    Locate(usize),
    /// Follow the section reference of a panel entry
    Reference(usize),
    Download(Option<PathBuf>),
    All,
    Help,
    Quit,
}

impl ViewerCommand {
    /// Parses a line; numbers are 1-based as displayed
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return Ok(ViewerCommand::Search(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        let number = |arg: Option<&str>| -> Result<usize, String> {
            let raw = arg.ok_or_else(|| format!(":{} needs an entry number", name))?;
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n - 1),
                _ => Err(format!("invalid entry number: {}", raw)),
            }
        };

        match name {
            "toggle" | "t" => number(arg).map(ViewerCommand::Toggle),
            "explain" | "e" => number(arg).map(ViewerCommand::Explain),
            "locate" | "l" => number(arg).map(ViewerCommand::Locate),
            "ref" | "r" => number(arg).map(ViewerCommand::Reference),
            "download" | "d" => Ok(ViewerCommand::Download(arg.map(PathBuf::from))),
            "all" | "a" => Ok(ViewerCommand::All),
            "help" | "h" | "?" => Ok(ViewerCommand::Help),
            "quit" | "q" => Ok(ViewerCommand::Quit),
            other => Err(format!("unknown command :{}", other)),
        }
    }
}

/// Interactive report viewer
pub async fn run_viewer(
    config: &Config,
    client: &ComparisonClient,
    session: &SessionId,
    theme: Theme,
    entries: Vec<ReportEntry>,
) -> Result<()> {
    let mut view = ReportView::new(entries);
    let mut panel: Vec<PanelEntry> = Vec::new();
    let action_view = TerminalActionView;
    let actions = EntryActions::new(client, &action_view, Some(session));

    render::print_report(&view, theme);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "search>".bold());
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match ViewerCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                render::print_alert(&message);
                continue;
            }
        };
        debug!("Viewer command: {:?}", command);

        match command {
            ViewerCommand::Search(term) => {
                panel = run_search(&mut view, &term, config.min_search_len, theme);
            }
            ViewerCommand::Toggle(index) => match view.toggle(index) {
                Some(_) => render::print_card(index, &view.cards()[index], theme),
                None => no_such_entry(index),
            },
            ViewerCommand::Explain(index) => match view.cards().get(index) {
                Some(card) => {
                    actions.explain(index, &card.entry.requirement).await;
                }
                None => no_such_entry(index),
            },
            ViewerCommand::Locate(index) => match view.cards().get(index) {
                Some(card) => {
                    actions.locate(index, &card.entry.requirement).await;
                }
                None => no_such_entry(index),
            },
            ViewerCommand::Reference(index) => match panel.get(index) {
                Some(entry) => {
                    let query = entry.reference_query();
                    println!("{} {}", "Searching:".dimmed(), query);
                    panel = run_search(&mut view, &query, config.min_search_len, theme);
                }
                None => render::print_alert(&format!("No reference {}", index + 1)),
            },
            ViewerCommand::Download(dir) => {
                let dir = dir.unwrap_or_else(|| PathBuf::from("."));
                if let Err(e) = download::download_to(client, session, &dir).await {
                    render::print_alert(&format!("{:#}", e));
                }
            }
            ViewerCommand::All => {
                view.reset();
                panel.clear();
                render::print_report(&view, theme);
            }
            ViewerCommand::Help => print_help(),
            ViewerCommand::Quit => break,
        }
    }

    Ok(())
}

/// Runs one search and renders its result; returns the new side panel
fn run_search(view: &mut ReportView, term: &str, min_len: usize, theme: Theme) -> Vec<PanelEntry> {
    match view.search(term, min_len) {
        Ok(outcome) if outcome.is_empty() => {
            render::print_alert("Nothing found");
            Vec::new()
        }
        Ok(outcome) => {
            render::print_report(view, theme);
            render::print_panel(&outcome.panel, theme);
            outcome.panel
        }
        Err(e) => {
            render::print_alert(&e.to_string());
            Vec::new()
        }
    }
}

fn no_such_entry(index: usize) {
    render::print_alert(&format!("No entry {}", index + 1));
}

fn print_help() {
    println!("{}", "Type a term to search, or a command:".dimmed());
    println!(
        "{}",
        "  :toggle N  :explain N  :locate N  :ref N  :download [DIR]  :all  :quit".dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_input_is_a_search() {
        assert_eq!(
            ViewerCommand::parse("  PostgreSQL "),
            Ok(ViewerCommand::Search("PostgreSQL".to_string()))
        );
        assert_eq!(
            ViewerCommand::parse("show backup"),
            Ok(ViewerCommand::Search("show backup".to_string()))
        );
    }

    #[test]
    fn test_numbered_commands_are_one_based() {
        assert_eq!(ViewerCommand::parse(":toggle 1"), Ok(ViewerCommand::Toggle(0)));
        assert_eq!(ViewerCommand::parse(":explain 3"), Ok(ViewerCommand::Explain(2)));
        assert_eq!(ViewerCommand::parse(":l 2"), Ok(ViewerCommand::Locate(1)));
        assert_eq!(ViewerCommand::parse(":ref 1"), Ok(ViewerCommand::Reference(0)));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        assert!(ViewerCommand::parse(":toggle").is_err());
        assert!(ViewerCommand::parse(":toggle 0").is_err());
        assert!(ViewerCommand::parse(":explain x").is_err());
    }

    #[test]
    fn test_other_commands() {
        assert_eq!(ViewerCommand::parse(":download"), Ok(ViewerCommand::Download(None)));
        assert_eq!(
            ViewerCommand::parse(":download /tmp/out"),
            Ok(ViewerCommand::Download(Some(PathBuf::from("/tmp/out"))))
        );
        assert_eq!(ViewerCommand::parse(":all"), Ok(ViewerCommand::All));
        assert_eq!(ViewerCommand::parse(":q"), Ok(ViewerCommand::Quit));
        assert!(ViewerCommand::parse(":frobnicate").is_err());
    }

    #[test]
    fn test_search_returns_fresh_panel() {
        let entries = vec![
            ReportEntry {
                requirement: "СУБД PostgreSQL".to_string(),
                status: "Не соответствует".to_string(),
                criticality: "Высокая".to_string(),
                analysis: "Используется MySQL вместо PostgreSQL".to_string(),
                section: Some("Хранение данных".to_string()),
            },
            ReportEntry {
                requirement: "Резервное копирование".to_string(),
                status: "Соответствует".to_string(),
                criticality: "Средняя".to_string(),
                analysis: "Ежедневные копии".to_string(),
                section: None,
            },
        ];
        let mut view = ReportView::new(entries);

        let panel = run_search(&mut view, "show postgresql", 3, Theme::Light);
        assert_eq!(panel.len(), 1);
        assert_eq!(panel[0].card, 0);

        let panel = run_search(&mut view, "резервное", 3, Theme::Light);
        assert!(panel.is_empty());
        assert!(view.cards()[1].highlighted);
        assert!(!view.cards()[0].visible);
    }
}
