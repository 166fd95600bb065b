use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use super::traits::MenuSource;
use crate::config::ClientConfig;
use crate::food::config::Credentials;
use crate::food::menu::{MenuItem, Restaurant};

/// Brand `type` filter: 1 = restaurants, 2 = food manufacturers.
const RESTAURANT_BRAND_TYPE: &str = "1";

/// Every item field the search endpoint is asked to return.
pub const MENU_ITEM_FIELDS: &[&str] = &[
    "brand_name",
    "item_name",
    "brand_id",
    "item_id",
    "upc",
    "item_type",
    "item_description",
    "nf_ingredient_statement",
    "nf_water_grams",
    "nf_calories",
    "nf_calories_from_fat",
    "nf_total_fat",
    "nf_saturated_fat",
    "nf_monounsaturated_fat",
    "nf_polyunsaturated_fat",
    "nf_trans_fatty_acid",
    "nf_cholesterol",
    "nf_sodium",
    "nf_total_carbohydrate",
    "nf_dietary_fiber",
    "nf_sugars",
    "nf_protein",
    "nf_vitamin_a_iu",
    "nf_vitamin_a_dv",
    "nf_vitamin_c_mg",
    "nf_vitamin_c_dv",
    "nf_calcium_mg",
    "nf_calcium_dv",
    "nf_iron_mg",
    "nf_iron_dv",
    "nf_potassium",
    "nf_refuse_pct",
    "nf_servings_per_container",
    "nf_serving_size_qty",
    "nf_serving_size_unit",
    "nf_serving_weight_grams",
    "allergen_contains_milk",
    "allergen_contains_eggs",
    "allergen_contains_fish",
    "allergen_contains_shellfish",
    "allergen_contains_tree_nuts",
    "allergen_contains_peanuts",
    "allergen_contains_wheat",
    "allergen_contains_soybeans",
    "allergen_contains_gluten",
    "images_front_full_url",
    "updated_at",
    "section_ids",
];

#[derive(Error, Debug)]
pub enum NutritionixError {
    #[error("Failed to send request: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("No restaurant found for '{0}'")]
    RestaurantNotFound(String),
}

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    total: usize,
    #[serde(default)]
    max_score: Option<f64>,
    #[serde(default = "Vec::new")]
    hits: Vec<Hit<T>>,
}

#[derive(Debug, Deserialize)]
struct Hit<T> {
    fields: T,
}

#[derive(Debug, Deserialize)]
struct BrandFields {
    #[serde(rename = "_id")]
    id: String,
    name: String,
}

/// One page of item search results.
#[derive(Debug, Clone)]
pub struct MenuPage {
    pub total: usize,
    pub max_score: Option<f64>,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone)]
pub struct NutritionixClient {
    credentials: Credentials,
    config: ClientConfig,
    client: Client,
}

impl NutritionixClient {
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self, NutritionixError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("menu-nutrition/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            credentials,
            config,
            client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, NutritionixError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(NutritionixError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MenuSource for NutritionixClient {
    async fn search_brands(&self, query: &str, limit: usize) -> Result<Vec<Restaurant>, NutritionixError> {
        let url = self.config.endpoint("brand/search");
        let params = [
            ("appId", self.credentials.app_id.clone()),
            ("appKey", self.credentials.app_key.clone()),
            ("query", query.to_string()),
            ("type", RESTAURANT_BRAND_TYPE.to_string()),
            ("limit", limit.to_string()),
            ("offset", "0".to_string()),
        ];

        log::info!("Searching brands for '{}'", query);
        let response = self.client.get(&url).query(&params).send().await?;
        let data: SearchResponse<BrandFields> = Self::read_json(response).await?;
        log::debug!("Brand search matched {} brands", data.total);

        Ok(data
            .hits
            .into_iter()
            .map(|hit| Restaurant {
                name: hit.fields.name,
                id: hit.fields.id,
            })
            .collect())
    }

    async fn fetch_menu_page(&self, restaurant_id: &str, offset: usize) -> Result<MenuPage, NutritionixError> {
        let url = self.config.endpoint("search");
        let payload = json!({
            "appId": self.credentials.app_id,
            "appKey": self.credentials.app_key,
            "filters": { "brand_id": restaurant_id },
            "offset": offset,
            "limit": self.config.page_size,
            "fields": MENU_ITEM_FIELDS,
        });

        log::debug!("Requesting menu items for {} at offset {}", restaurant_id, offset);
        let response = self.client.post(&url).json(&payload).send().await?;
        let data: SearchResponse<MenuItem> = Self::read_json(response).await?;

        Ok(MenuPage {
            total: data.total,
            max_score: data.max_score,
            items: data.hits.into_iter().map(|hit| hit.fields).collect(),
        })
    }

    fn page_size(&self) -> usize {
        self.config.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::collections::HashSet;
    use wiremock::{
        matchers::{body_partial_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    async fn setup_mock_server() -> MockServer {
        MockServer::start().await
    }

    fn client_for(server: &MockServer, page_size: usize) -> NutritionixClient {
        let mut config = ClientConfig::default()
            .with_api_url(&format!("{}/v1_1", server.uri()))
            .unwrap();
        config.page_size = page_size;
        NutritionixClient::new(Credentials::new("test-id", "test-key"), config).unwrap()
    }

    fn item_hits(range: std::ops::Range<usize>) -> Vec<Value> {
        range
            .map(|i| {
                json!({
                    "_index": "f762ef22-e660-434f-9071-a10ea6691c27",
                    "_type": "item",
                    "_id": format!("item-{}", i),
                    "_score": 1.0,
                    "fields": {
                        "item_id": format!("item-{}", i),
                        "item_name": format!("Item {}", i),
                        "nf_calories": 100 + i,
                    }
                })
            })
            .collect()
    }

    #[test]
    fn test_brand_response_without_hits() {
        let data: SearchResponse<BrandFields> = serde_json::from_str(r#"{"total": 0, "max_score": null}"#).unwrap();
        assert_eq!(data.total, 0);
        assert!(data.max_score.is_none());
        assert!(data.hits.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_restaurant_id_uses_first_hit() {
        let mock_server = setup_mock_server().await;

        Mock::given(method("GET"))
            .and(path("/v1_1/brand/search"))
            .and(query_param("appId", "test-id"))
            .and(query_param("appKey", "test-key"))
            .and(query_param("query", "taco bell"))
            .and(query_param("type", "1"))
            .and(query_param("limit", "1"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": [{
                    "_id": "513fbc1283aa2dc80c000020",
                    "_index": "f762ef22-e660-434f-9071-a10ea6691c27",
                    "_score": 9.773642,
                    "_type": "brand",
                    "fields": {
                        "_id": "513fbc1283aa2dc80c000020",
                        "name": "Taco Bell",
                        "type": 1,
                        "website": null
                    }
                }],
                "max_score": 9.773642,
                "total": 12
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, 50);
        let restaurant = client.fetch_restaurant_id("taco bell").await.unwrap();

        assert_eq!(restaurant.name, "Taco Bell");
        assert_eq!(restaurant.id, "513fbc1283aa2dc80c000020");
    }

    #[tokio::test]
    async fn test_fetch_restaurant_id_without_hits() {
        let mock_server = setup_mock_server().await;

        Mock::given(method("GET"))
            .and(path("/v1_1/brand/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": [],
                "max_score": null,
                "total": 0
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, 50);
        let err = client.fetch_restaurant_id("nowhere").await.unwrap_err();
        assert!(matches!(err, NutritionixError::RestaurantNotFound(name) if name == "nowhere"));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mock_server = setup_mock_server().await;

        Mock::given(method("GET"))
            .and(path("/v1_1/brand/search"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, 50);
        match client.search_brands("taco bell", 5).await {
            Err(NutritionixError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid credentials");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_menu_page_request_body() {
        let mock_server = setup_mock_server().await;

        Mock::given(method("POST"))
            .and(path("/v1_1/search"))
            .and(body_partial_json(json!({
                "appId": "test-id",
                "appKey": "test-key",
                "filters": { "brand_id": "brand-1" },
                "offset": 0,
                "limit": 50,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 2,
                "max_score": 1.0,
                "hits": item_hits(0..2)
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, 50);
        let page = client.fetch_menu_page("brand-1", 0).await.unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.max_score, Some(1.0));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].name(), "Item 1");

        let requests = mock_server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["fields"].as_array().unwrap().len(), MENU_ITEM_FIELDS.len());
    }

    #[tokio::test]
    async fn test_pagination_accumulates_total_without_duplicates() {
        let mock_server = setup_mock_server().await;
        let total = 23;

        for offset in [0usize, 10, 20] {
            let end = (offset + 10).min(total);
            Mock::given(method("POST"))
                .and(path("/v1_1/search"))
                .and(body_partial_json(json!({ "offset": offset, "limit": 10 })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "total": total,
                    "max_score": 1.0,
                    "hits": item_hits(offset..end)
                })))
                .expect(1)
                .mount(&mock_server)
                .await;
        }

        let client = client_for(&mock_server, 10);
        let items = client.fetch_menu_items("brand-1").await.unwrap();

        assert_eq!(items.len(), total);
        let ids: HashSet<&str> = items
            .iter()
            .filter_map(|item| item.get("item_id").and_then(|v| v.as_str()))
            .collect();
        assert_eq!(ids.len(), total);
    }

    #[tokio::test]
    async fn test_exact_multiple_of_page_size_stops_at_total() {
        let mock_server = setup_mock_server().await;

        for offset in [0usize, 10] {
            Mock::given(method("POST"))
                .and(path("/v1_1/search"))
                .and(body_partial_json(json!({ "offset": offset })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "total": 20,
                    "max_score": 1.0,
                    "hits": item_hits(offset..offset + 10)
                })))
                .expect(1)
                .mount(&mock_server)
                .await;
        }

        let client = client_for(&mock_server, 10);
        let items = client.fetch_menu_items("brand-1").await.unwrap();
        assert_eq!(items.len(), 20);
    }

    #[tokio::test]
    async fn test_empty_page_stops_before_total() {
        let mock_server = setup_mock_server().await;

        Mock::given(method("POST"))
            .and(path("/v1_1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 500,
                "max_score": null,
                "hits": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, 50);
        let items = client.fetch_menu_items("brand-1").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_menu_page_error_status() {
        let mock_server = setup_mock_server().await;

        Mock::given(method("POST"))
            .and(path("/v1_1/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, 50);
        match client.fetch_menu_items("brand-1").await {
            Err(NutritionixError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream unavailable");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_decode_error() {
        let mock_server = setup_mock_server().await;

        Mock::given(method("POST"))
            .and(path("/v1_1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, 50);
        let err = client.fetch_menu_page("brand-1", 0).await.unwrap_err();
        assert!(matches!(err, NutritionixError::Decode(_)));
    }
}
