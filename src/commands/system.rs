use colored::Colorize;

use super::CommandOutcome;

pub fn handle_command(input: &str) -> Result<CommandOutcome, String> {
    match input.to_lowercase().as_str() {
        "help" => {
            println!("\n{}", "🥗 Menu Nutrition Commands:".bold());
            println!();

            println!("🏪 Restaurant Commands:");
            println!("  brands <query>        - List restaurants matching a name");
            println!("  load <restaurant>     - Fetch the full menu of a restaurant");
            println!("  Example: load taco bell");
            println!();

            println!("🔎 Selection Commands:");
            println!("  fields                - List the fields of the loaded menu");
            println!("  items [n]             - List the selected menu items");
            println!("  filter <field> <val>  - Keep items whose field equals val");
            println!("  exclude <field> <val> - Drop items whose field equals val");
            println!("  reset                 - Select the whole menu again");
            println!("  Example: filter item_type 1, exclude nf_sugars null");
            println!();

            println!("📊 Analysis Commands:");
            println!("  values <field>               - Numeric values of a field");
            println!("  max <field>                  - Items with the highest value");
            println!("  min <field>                  - Items with the lowest value");
            println!("  hist <field> [label]         - Histogram in the terminal");
            println!("  plot <field> <file> [label]  - Histogram saved as SVG");
            println!("  Example: hist nf_sugars Sugar (g)");
            println!();

            println!("⚙️ System Commands:");
            println!("  help  - Show this help menu");
            println!("  exit  - Exit the program");
            Ok(CommandOutcome::Continue)
        }
        "exit" | "quit" => {
            println!("👋 Goodbye!");
            Ok(CommandOutcome::Exit)
        }
        _ => Err("Unknown system command. Type 'help' for available commands.".to_string()),
    }
}
