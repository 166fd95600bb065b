use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A restaurant as identified by the brand search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub id: String,
}

/// One menu item: the `fields` object of a search hit, keyed by field name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuItem {
    fields: Map<String, Value>,
}

impl MenuItem {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Value of `key`, with a missing key reading as null.
    pub fn value_or_null(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(&Value::Null)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(|v| v.as_f64())
    }

    pub fn name(&self) -> &str {
        self.fields
            .get("item_name")
            .and_then(|n| n.as_str())
            .unwrap_or("<unnamed item>")
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }
}

impl From<Map<String, Value>> for MenuItem {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// A restaurant together with every menu item fetched for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub restaurant: Restaurant,
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(restaurant: Restaurant, items: Vec<MenuItem>) -> Self {
        Self { restaurant, items }
    }

    /// Sorted union of field names across all items.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .items
            .iter()
            .flat_map(|item| item.keys().map(str::to_string))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
