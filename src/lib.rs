pub mod commands;
pub mod config;
pub mod food;

// Re-export commonly used items
pub use commands::{CommandHandler, CommandOutcome};
pub use config::ClientConfig;
pub use food::{Menu, MenuItem, MenuSource, NutritionixClient, Restaurant};
