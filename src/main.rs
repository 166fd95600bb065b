use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use menu_nutrition::commands::{CommandHandler, CommandOutcome};
use menu_nutrition::config::ClientConfig;
use menu_nutrition::food::config::Credentials;
use menu_nutrition::food::NutritionixClient;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::sync::Arc;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Explore restaurant menu nutrition facts from Nutritionix", long_about = None)]
struct Args {
    /// Nutritionix application id (falls back to NUTRITIONIX_APP_ID)
    #[arg(long)]
    app_id: Option<String>,

    /// Nutritionix application key (falls back to NUTRITIONIX_APP_KEY)
    #[arg(long)]
    app_key: Option<String>,

    #[arg(long)]
    api_url: Option<String>,

    /// Restaurant to load at start-up
    #[arg(long, conflicts_with = "brand_id")]
    restaurant: Option<String>,

    /// Nutritionix brand id to load at start-up, skipping the brand search
    #[arg(long)]
    brand_id: Option<String>,

    /// Run these commands and exit instead of starting the prompt
    #[arg(short = 'e', long = "exec")]
    exec: Vec<String>,

    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables
    dotenv().ok();
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &args.api_url {
        config = config.with_api_url(url)?;
    }
    let histogram_bins = config.histogram_bins;

    let credentials = Credentials::resolve(args.app_id.clone(), args.app_key.clone())?;
    let client = NutritionixClient::new(credentials, config)?;
    let mut command_handler = CommandHandler::new(Arc::new(client), histogram_bins);

    if let Some(brand_id) = &args.brand_id {
        command_handler.load_brand_id(brand_id).await?;
    } else if let Some(restaurant) = &args.restaurant {
        command_handler.handle_command(&format!("load {}", restaurant)).await?;
    }

    if !args.exec.is_empty() {
        for command in &args.exec {
            if command_handler.handle_command(command).await? == CommandOutcome::Exit {
                break;
            }
        }
        return Ok(());
    }

    run_prompt(&mut command_handler).await
}

async fn run_prompt(command_handler: &mut CommandHandler) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Show initial help menu
    command_handler.handle_command("help").await?;

    let mut rl = Editor::<(), DefaultHistory>::new()?;

    // Main input loop
    loop {
        match rl.readline("🥗 ") {
            Ok(line) => {
                let input = line.trim();
                let _ = rl.add_history_entry(input);

                match command_handler.handle_command(input).await {
                    Ok(CommandOutcome::Exit) => break,
                    Ok(CommandOutcome::Continue) => {}
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
