//! Grade and range filtering over a read-only catalog of diamonds and
//! ring settings.
//!
//! A [`Dataset`] is loaded once and borrowed by the filter functions, which
//! return the matching records in catalog order:
//!
//! ```
//! use gemq::{filter_diamonds, Dataset, DiamondFilterRequest};
//!
//! let dataset = Dataset::from_json_str(
//!     r#"{"diamonds": [{"sku": "D1", "carat": 1.0, "color": "G"}]}"#,
//! ).unwrap();
//! let decoded = DiamondFilterRequest::from_json_str(r#"{"colorRange": [5, 8]}"#);
//!
//! let matches = filter_diamonds(&dataset.diamonds, &decoded.request);
//! assert_eq!(matches.len(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod grades;
pub mod query;
pub mod values;

pub use catalog::{find_diamond_by_sku, find_setting_by_id, Dataset, Diamond, Record, Setting};
pub use error::{CatalogError, InvalidFilterShape};
pub use query::{
    filter_diamonds, filter_settings, Decoded, DiamondFilterRequest, SettingFilterRequest,
};
