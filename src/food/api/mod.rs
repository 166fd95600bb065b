pub mod nutritionix;
pub mod traits;

// Re-export common types
pub use nutritionix::{MenuPage, NutritionixClient, NutritionixError, MENU_ITEM_FIELDS};
pub use traits::MenuSource;
