use anyhow::{anyhow, bail, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::food::analysis::{extract_variable, matches_filter, menu_items_at_extremum, Extremum};
use crate::food::chart::MenuHistogram;
use crate::food::menu::{Menu, MenuItem, Restaurant};
use crate::food::MenuSource;

const SVG_SIZE: (u32, u32) = (1024, 640);
const DEFAULT_LISTING: usize = 20;

/// The loaded menu and the indices of the items currently selected.
#[derive(Debug, Default)]
pub struct MenuSession {
    menu: Option<Menu>,
    selection: Vec<usize>,
}

impl MenuSession {
    pub fn set_menu(&mut self, menu: Menu) {
        self.selection = (0..menu.items.len()).collect();
        self.menu = Some(menu);
    }

    pub fn menu(&self) -> Result<&Menu> {
        self.menu
            .as_ref()
            .ok_or_else(|| anyhow!("No menu loaded. Use: load <restaurant name>"))
    }

    pub fn selected(&self) -> Result<Vec<&MenuItem>> {
        let menu = self.menu()?;
        Ok(self.selection.iter().map(|&i| &menu.items[i]).collect())
    }

    /// Narrows the selection to items whose `param` equals (or with `negate`, differs from) `value`.
    pub fn filter(&mut self, param: &str, value: &Value, negate: bool) -> Result<usize> {
        let menu = self.menu()?;
        let kept: Vec<usize> = self
            .selection
            .iter()
            .copied()
            .filter(|&i| matches_filter(&menu.items[i], param, value, negate))
            .collect();
        self.selection = kept;
        Ok(self.selection.len())
    }

    pub fn reset(&mut self) -> Result<usize> {
        let len = self.menu()?.items.len();
        self.selection = (0..len).collect();
        Ok(len)
    }
}

/// Filter values are JSON when they parse as JSON, plain strings otherwise.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(message);
    pb
}

pub async fn list_brands(source: &dyn MenuSource, query: &str) -> Result<()> {
    if query.is_empty() {
        bail!("Please specify a restaurant to search for. Usage: brands <query>");
    }
    let brands = source.search_brands(query, 10).await?;
    if brands.is_empty() {
        println!("❌ No restaurants match '{}'", query);
        return Ok(());
    }
    println!("\n🏪 Restaurants matching '{}':", query.bright_yellow());
    for Restaurant { name, id } in brands {
        println!("  • {} ({})", name.cyan(), id.dimmed());
    }
    Ok(())
}

pub async fn load_menu(source: &dyn MenuSource, session: &mut MenuSession, restaurant_name: &str) -> Result<()> {
    if restaurant_name.is_empty() {
        bail!("Please specify a restaurant. Usage: load <restaurant name>");
    }

    let pb = spinner(format!("Fetching menu for {}", restaurant_name));
    let result = source.fetch_restaurant_menu(restaurant_name).await;
    pb.finish_and_clear();

    let menu = result?;
    println!(
        "🍔 Loaded {} menu items for {} ({})",
        menu.items.len().to_string().green(),
        menu.restaurant.name.bright_yellow(),
        menu.restaurant.id.dimmed()
    );
    session.set_menu(menu);
    Ok(())
}

pub async fn load_menu_by_id(source: &dyn MenuSource, session: &mut MenuSession, brand_id: &str) -> Result<()> {
    let pb = spinner(format!("Fetching menu for brand {}", brand_id));
    let result = source.fetch_menu_items(brand_id).await;
    pb.finish_and_clear();

    let items = result?;
    let name = items
        .first()
        .and_then(|item| item.get("brand_name"))
        .and_then(|n| n.as_str())
        .unwrap_or(brand_id)
        .to_string();
    println!("🍔 Loaded {} menu items for {}", items.len().to_string().green(), name.bright_yellow());
    session.set_menu(Menu::new(
        Restaurant {
            name,
            id: brand_id.to_string(),
        },
        items,
    ));
    Ok(())
}

pub fn show_fields(session: &MenuSession) -> Result<()> {
    let menu = session.menu()?;
    println!("\n📋 Fields for {}:", menu.restaurant.name.bright_yellow());
    for field in menu.field_names() {
        println!("  {}", field);
    }
    Ok(())
}

pub fn show_items(session: &MenuSession, limit: Option<usize>) -> Result<()> {
    let selected = session.selected()?;
    let limit = limit.unwrap_or(DEFAULT_LISTING);
    println!("\n🍽️ {} selected items:", selected.len().to_string().cyan());
    for item in selected.iter().take(limit) {
        println!("  • {}", item.name());
    }
    if selected.len() > limit {
        println!("  … and {} more", selected.len() - limit);
    }
    Ok(())
}

pub fn filter_items(session: &mut MenuSession, args: &str, negate: bool) -> Result<()> {
    let (param, raw_value) = args
        .split_once(char::is_whitespace)
        .map(|(p, v)| (p, v.trim()))
        .ok_or_else(|| anyhow!("Usage: {} <field> <value>", if negate { "exclude" } else { "filter" }))?;

    let value = parse_value(raw_value);
    let remaining = session.filter(param, &value, negate)?;
    println!(
        "🔎 {} items {} {} = {}",
        remaining.to_string().green(),
        if negate { "without" } else { "with" },
        param.cyan(),
        value
    );
    Ok(())
}

pub fn show_values(session: &MenuSession, param: &str) -> Result<()> {
    if param.is_empty() {
        bail!("Usage: values <field>");
    }
    let values = extract_variable(session.selected()?, param);
    println!("\n📈 {} values of {}:", values.len().to_string().cyan(), param.cyan());
    println!("{}", values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "));
    Ok(())
}

pub fn show_extremum(session: &MenuSession, param: &str, extremum: Extremum) -> Result<()> {
    if param.is_empty() {
        bail!("Usage: {} <field>", if extremum == Extremum::Max { "max" } else { "min" });
    }
    let selected = session.selected()?;
    let items = menu_items_at_extremum(selected.iter().copied(), param, extremum)?;

    let label = match extremum {
        Extremum::Max => "⬆️ Highest",
        Extremum::Min => "⬇️ Lowest",
    };
    println!("\n{} {}:", label, param.cyan());
    for item in items {
        println!("  • {}: {}", item.name(), item.value_or_null(param).to_string().green());
    }
    Ok(())
}

fn split_label(rest: &str) -> Option<&str> {
    let rest = rest.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

pub fn show_histogram(session: &MenuSession, args: &str, bins: usize, width: usize) -> Result<()> {
    let (param, label) = match args.split_once(char::is_whitespace) {
        Some((param, rest)) => (param, split_label(rest)),
        None => (args, None),
    };
    if param.is_empty() {
        bail!("Usage: hist <field> [label]");
    }

    let menu = session.menu()?;
    let chart = MenuHistogram::build(session.selected()?, &menu.restaurant.name, param, label, bins)?;
    println!("\n{}", chart.render_text(width));
    Ok(())
}

pub fn plot_histogram(session: &MenuSession, args: &str, bins: usize) -> Result<()> {
    let mut parts = args.splitn(3, char::is_whitespace);
    let (param, file) = match (parts.next(), parts.next()) {
        (Some(param), Some(file)) if !param.is_empty() => (param, file),
        _ => bail!("Usage: plot <field> <file.svg> [label]"),
    };
    let label = parts.next().and_then(split_label);

    let menu = session.menu()?;
    let chart = MenuHistogram::build(session.selected()?, &menu.restaurant.name, param, label, bins)?;
    chart.render_svg(Path::new(file), SVG_SIZE)?;
    println!("🖼️ Histogram saved to {}", file.bright_green());
    Ok(())
}
