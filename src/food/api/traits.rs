use async_trait::async_trait;

use super::nutritionix::{MenuPage, NutritionixError};
use crate::food::menu::{Menu, MenuItem, Restaurant};

/// Anything that can answer brand and menu queries page by page.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn search_brands(&self, query: &str, limit: usize) -> Result<Vec<Restaurant>, NutritionixError>;

    async fn fetch_menu_page(&self, restaurant_id: &str, offset: usize) -> Result<MenuPage, NutritionixError>;

    fn page_size(&self) -> usize;

    async fn fetch_restaurant_id(&self, restaurant_name: &str) -> Result<Restaurant, NutritionixError> {
        self.search_brands(restaurant_name, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| NutritionixError::RestaurantNotFound(restaurant_name.to_string()))
    }

    /// Every menu item for the restaurant, walking pages until `total` is reached.
    async fn fetch_menu_items(&self, restaurant_id: &str) -> Result<Vec<MenuItem>, NutritionixError> {
        let page_size = self.page_size().max(1);
        let mut items = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.fetch_menu_page(restaurant_id, offset).await?;
            let received = page.items.len();
            let total = page.total;
            items.extend(page.items);
            offset += page_size;

            log::info!("Fetched {} of {} menu items for {}", items.len(), total, restaurant_id);

            if offset >= total {
                break;
            }
            if received == 0 {
                log::warn!("Empty page at offset {} before reaching total {}", offset - page_size, total);
                break;
            }
        }

        Ok(items)
    }

    async fn fetch_restaurant_menu(&self, restaurant_name: &str) -> Result<Menu, NutritionixError> {
        let restaurant = self.fetch_restaurant_id(restaurant_name).await?;
        let items = self.fetch_menu_items(&restaurant.id).await?;
        Ok(Menu::new(restaurant, items))
    }
}
