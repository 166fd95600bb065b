use serde_json::Value;

use super::AnalysisError;
use crate::food::menu::MenuItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Min,
    Max,
}

/// Whether `item` passes the filter. A missing field compares as null.
pub fn matches_filter(item: &MenuItem, param: &str, value: &Value, negate: bool) -> bool {
    (item.value_or_null(param) == value) != negate
}

/// Items whose `param` equals `value`, or with `negate`, every other item.
pub fn filter_menu_items<'a, I>(menu_items: I, param: &str, value: &Value, negate: bool) -> Vec<&'a MenuItem>
where
    I: IntoIterator<Item = &'a MenuItem>,
{
    menu_items
        .into_iter()
        .filter(|item| matches_filter(item, param, value, negate))
        .collect()
}

/// Numeric values of `param` in menu order. Non-numeric and missing values are skipped.
pub fn extract_variable<'a, I>(menu_items: I, param: &str) -> Vec<f64>
where
    I: IntoIterator<Item = &'a MenuItem>,
{
    let mut skipped = 0;
    let values: Vec<f64> = menu_items
        .into_iter()
        .filter_map(|item| {
            let number = item.number(param);
            if number.is_none() {
                skipped += 1;
            }
            number
        })
        .collect();

    if skipped > 0 {
        log::debug!("Skipped {} menu items without a numeric '{}'", skipped, param);
    }
    values
}

/// Every item sharing the minimum or maximum value of `param`. Ties are all kept.
pub fn menu_items_at_extremum<'a, I>(
    menu_items: I,
    param: &str,
    extremum: Extremum,
) -> Result<Vec<&'a MenuItem>, AnalysisError>
where
    I: IntoIterator<Item = &'a MenuItem>,
    I::IntoIter: Clone,
{
    let items = menu_items.into_iter();
    let values = extract_variable(items.clone(), param);

    let target = match extremum {
        Extremum::Min => values.iter().copied().reduce(f64::min),
        Extremum::Max => values.iter().copied().reduce(f64::max),
    }
    .ok_or_else(|| AnalysisError::NoNumericValues(param.to_string()))?;

    Ok(items.filter(|item| item.number(param) == Some(target)).collect())
}

pub fn menu_items_max<'a, I>(menu_items: I, param: &str) -> Result<Vec<&'a MenuItem>, AnalysisError>
where
    I: IntoIterator<Item = &'a MenuItem>,
    I::IntoIter: Clone,
{
    menu_items_at_extremum(menu_items, param, Extremum::Max)
}

pub fn menu_items_min<'a, I>(menu_items: I, param: &str) -> Result<Vec<&'a MenuItem>, AnalysisError>
where
    I: IntoIterator<Item = &'a MenuItem>,
    I::IntoIter: Clone,
{
    menu_items_at_extremum(menu_items, param, Extremum::Min)
}
