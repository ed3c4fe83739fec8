pub mod eval;
pub mod parser;
pub mod request;

pub use eval::{filter_diamonds, filter_settings};
pub use request::{
    Decoded, DiamondFilterRequest, IndexRange, MetalFilter, NumericRange, SettingFilterRequest,
};
