pub mod analysis;
pub mod api;
pub mod chart;
pub mod config;
pub mod menu;

pub use api::{MenuSource, NutritionixClient};
pub use menu::{Menu, MenuItem, Restaurant};
