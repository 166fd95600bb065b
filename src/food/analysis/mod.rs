pub mod histogram;
pub mod nutrition;

use thiserror::Error;

pub use histogram::{Bin, Histogram};
pub use nutrition::{
    extract_variable, filter_menu_items, matches_filter, menu_items_at_extremum, menu_items_max, menu_items_min, Extremum,
};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No menu item has a numeric value for '{0}'")]
    NoNumericValues(String),
    #[error("Cannot build a histogram from no values")]
    EmptyInput,
    #[error("Histogram needs at least one bin")]
    InvalidBinCount,
}
