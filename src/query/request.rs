use crate::error::InvalidFilterShape;
use crate::grades::OrdinalTable;

/// Inclusive `[min, max]` bounds on a numeric attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Inclusive `[min, max]` positions into an ordinal table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub min: i64,
    pub max: i64,
}

impl IndexRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn allowed(&self, table: &OrdinalTable) -> &'static [&'static str] {
        table.slice(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetalFilter {
    pub description: String,
}

impl MetalFilter {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Constraints on diamonds. `None` leaves the attribute unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiamondFilterRequest {
    /// `carat`
    pub carat: Option<NumericRange>,
    /// `depthRange`
    pub depth: Option<NumericRange>,
    /// `lwRange`, applied to the `length` attribute
    pub length: Option<NumericRange>,
    /// `colorRange`
    pub color: Option<IndexRange>,
    /// `clarityRange`
    pub clarity: Option<IndexRange>,
    /// `polishRange`
    pub polish: Option<IndexRange>,
    /// `symRange`
    pub symmetry: Option<IndexRange>,
    /// `flourRange`
    pub fluorescence: Option<IndexRange>,
    /// `price`
    pub price: Option<NumericRange>,
}

/// Constraints on settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingFilterRequest {
    /// `priceRangeSet`
    pub price: Option<NumericRange>,
    /// `selectedMetalSet`
    pub metal: Option<MetalFilter>,
}

/// A decoded request together with the constraints that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded<T> {
    pub request: T,
    pub rejected: Vec<InvalidFilterShape>,
}

impl<T> Decoded<T> {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}
