use anyhow::{anyhow, Result};
use std::sync::Arc;

use crate::food::analysis::Extremum;
use crate::food::MenuSource;

pub mod food_cmd;
mod system;

pub use food_cmd::MenuSession;

const DEFAULT_TERMINAL_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Exit,
}

pub struct CommandHandler {
    source: Arc<dyn MenuSource>,
    session: MenuSession,
    histogram_bins: usize,
}

impl CommandHandler {
    pub fn new(source: Arc<dyn MenuSource>, histogram_bins: usize) -> Self {
        Self {
            source,
            session: MenuSession::default(),
            histogram_bins,
        }
    }

    pub fn session(&self) -> &MenuSession {
        &self.session
    }

    pub async fn load_brand_id(&mut self, brand_id: &str) -> Result<()> {
        food_cmd::load_menu_by_id(self.source.as_ref(), &mut self.session, brand_id).await
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<CommandOutcome> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(CommandOutcome::Continue);
        }

        // Handle single-word commands first
        match input.to_lowercase().as_str() {
            "help" | "exit" | "quit" => return system::handle_command(input).map_err(|e| anyhow!(e)),
            "fields" => return food_cmd::show_fields(&self.session).map(|_| CommandOutcome::Continue),
            "reset" => {
                let count = self.session.reset()?;
                println!("↩️ Selection reset to all {} items", count);
                return Ok(CommandOutcome::Continue);
            }
            _ => {}
        }

        let (command, args) = match input.split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (input, ""),
        };

        match command.to_lowercase().as_str() {
            "brands" => food_cmd::list_brands(self.source.as_ref(), args).await?,
            "load" => food_cmd::load_menu(self.source.as_ref(), &mut self.session, args).await?,
            "items" => {
                let limit = if args.is_empty() {
                    None
                } else {
                    Some(args.parse().map_err(|_| anyhow!("Usage: items [count]"))?)
                };
                food_cmd::show_items(&self.session, limit)?
            }
            "filter" => food_cmd::filter_items(&mut self.session, args, false)?,
            "exclude" => food_cmd::filter_items(&mut self.session, args, true)?,
            "values" => food_cmd::show_values(&self.session, args)?,
            "max" => food_cmd::show_extremum(&self.session, args, Extremum::Max)?,
            "min" => food_cmd::show_extremum(&self.session, args, Extremum::Min)?,
            "hist" => food_cmd::show_histogram(&self.session, args, self.histogram_bins, terminal_width())?,
            "plot" => food_cmd::plot_histogram(&self.session, args, self.histogram_bins)?,
            _ => return Err(anyhow!("Unknown command '{}'. Type 'help' for available commands.", command)),
        }

        Ok(CommandOutcome::Continue)
    }
}

fn terminal_width() -> usize {
    term_size::dimensions()
        .map(|(width, _)| width)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH)
}
