use super::request::{
    DiamondFilterRequest, IndexRange, MetalFilter, NumericRange, SettingFilterRequest,
};
use crate::catalog::{Diamond, Label, Numeric, Setting};
use crate::grades::{self, OrdinalTable};
use tracing::debug;

/// Diamonds satisfying every constraint in `request`, in source order.
pub fn filter_diamonds<'a>(
    records: &'a [Diamond],
    request: &DiamondFilterRequest,
) -> Vec<&'a Diamond> {
    let mut results: Vec<&Diamond> = records.iter().collect();

    if let Some(range) = request.carat {
        narrow(&mut results, "carat", |d| in_range(&d.carat, range));
    }
    if let Some(range) = request.depth {
        narrow(&mut results, "depthRange", |d| in_range(&d.depth, range));
    }
    if let Some(range) = request.length {
        narrow(&mut results, "lwRange", |d| in_range(&d.length, range));
    }
    if let Some(range) = request.color {
        narrow_graded(&mut results, "colorRange", &grades::COLOR, range, |d| &d.color);
    }
    if let Some(range) = request.clarity {
        narrow_graded(&mut results, "clarityRange", &grades::CLARITY, range, |d| &d.clarity);
    }
    if let Some(range) = request.polish {
        narrow_graded(&mut results, "polishRange", &grades::POLISH, range, |d| &d.polish);
    }
    if let Some(range) = request.symmetry {
        narrow_graded(&mut results, "symRange", &grades::SYMMETRY, range, |d| &d.symmetry);
    }
    if let Some(range) = request.fluorescence {
        narrow_graded(&mut results, "flourRange", &grades::FLUORESCENCE, range, |d| {
            &d.fluorescence
        });
    }
    if let Some(range) = request.price {
        narrow(&mut results, "price", |d| in_range(&d.price, range));
    }

    results
}

/// Settings satisfying every constraint in `request`, in source order.
pub fn filter_settings<'a>(
    records: &'a [Setting],
    request: &SettingFilterRequest,
) -> Vec<&'a Setting> {
    let mut results: Vec<&Setting> = records.iter().collect();

    if let Some(range) = request.price {
        narrow(&mut results, "priceRangeSet", |s| in_range(&s.price, range));
    }
    if let Some(metal) = request.metal.as_ref().filter(|m| !m.description.is_empty()) {
        narrow(&mut results, "selectedMetalSet", |s| {
            metal_matches(s.metal.as_ref().and_then(Label::as_str), metal)
        });
    }

    results
}

fn narrow<T>(results: &mut Vec<&T>, field: &str, keep: impl Fn(&T) -> bool) {
    results.retain(|r| keep(r));
    debug!(field, remaining = results.len(), "constraint applied");
}

fn narrow_graded<T>(
    results: &mut Vec<&T>,
    field: &str,
    table: &OrdinalTable,
    range: IndexRange,
    label: impl Fn(&T) -> &Option<Label>,
) {
    let allowed = range.allowed(table);
    debug!(field, ?allowed, "grade range resolved");
    narrow(results, field, |r| {
        label(r)
            .as_ref()
            .and_then(Label::as_str)
            .is_some_and(|l| allowed.contains(&l))
    });
}

fn in_range(value: &Option<Numeric>, range: NumericRange) -> bool {
    value
        .as_ref()
        .and_then(Numeric::as_f64)
        .is_some_and(|v| range.contains(v))
}

/// Case-insensitive. A record passes when its metal contains the
/// description, or when its metal is the description's leading words
/// ("white gold" for "White Gold 14k").
fn metal_matches(metal: Option<&str>, filter: &MetalFilter) -> bool {
    let Some(metal) = metal.map(str::to_lowercase).filter(|m| !m.is_empty()) else {
        return false;
    };
    let wanted = filter.description.to_lowercase();
    if metal.contains(&wanted) {
        return true;
    }
    wanted
        .strip_prefix(metal.as_str())
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Dataset;

    fn dataset() -> Dataset {
        Dataset::from_json_str(
            r#"{
            "diamonds": [
                {"sku": "D1", "carat": 1.0, "color": "G", "clarity": "VS1", "polish": "EX",
                 "symmetry": "VG", "fluorescence": "NON",
                 "depth": 61.5, "length": 6.4, "price": 5000},
                {"sku": "D2", "carat": 2.0, "color": "D", "clarity": "IF", "polish": "ID",
                 "symmetry": "ID", "fluorescence": "FNT",
                 "depth": "62.1", "length": "8.1", "price": 9000},
                {"sku": "D3", "carat": "n/a", "color": "I", "clarity": "SI1", "polish": "GD",
                 "symmetry": "GD", "fluorescence": "MED",
                 "depth": 59, "length": 5.2, "price": 1000},
                {"sku": "D4", "carat": 0.7, "color": "g", "clarity": "VS2", "price": 2000}
            ],
            "settings": [
                {"id": 1, "price": 450, "metal": "White Gold 14k"},
                {"id": 2, "price": "1200", "metal": "white gold"},
                {"id": 3, "price": 999.99, "metal": "WHITE GOLD 14K"},
                {"id": 4, "price": 2000, "metal": "Platinum"},
                {"id": 5, "price": 800}
            ]
        }"#,
        )
        .unwrap()
    }

    fn skus(results: &[&Diamond]) -> Vec<String> {
        results.iter().map(|d| d.sku.as_value().to_string().replace('"', "")).collect()
    }

    fn ids(results: &[&Setting]) -> Vec<String> {
        results.iter().map(|s| s.id.as_value().to_string()).collect()
    }

    #[test]
    fn test_empty_request_returns_everything() {
        let ds = dataset();
        let results = filter_diamonds(&ds.diamonds, &DiamondFilterRequest::default());
        assert_eq!(skus(&results), ["D1", "D2", "D3", "D4"]);
    }

    #[test]
    fn test_carat_and_color() {
        let ds = dataset();
        let request = DiamondFilterRequest {
            carat: Some(NumericRange::new(0.5, 1.5)),
            color: Some(IndexRange::new(5, 8)),
            ..Default::default()
        };
        assert_eq!(skus(&filter_diamonds(&ds.diamonds, &request)), ["D1"]);
    }

    #[test]
    fn test_color_range_is_by_position() {
        let ds = dataset();
        let request = DiamondFilterRequest {
            color: Some(IndexRange::new(2, 4)),
            ..Default::default()
        };
        assert_eq!(skus(&filter_diamonds(&ds.diamonds, &request)), ["D3"]);
    }

    #[test]
    fn test_grade_labels_are_case_sensitive() {
        let ds = dataset();
        let request = DiamondFilterRequest {
            color: Some(IndexRange::new(0, 8)),
            ..Default::default()
        };
        assert_eq!(skus(&filter_diamonds(&ds.diamonds, &request)), ["D1", "D2", "D3"]);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let ds = dataset();
        let request = DiamondFilterRequest {
            price: Some(NumericRange::new(1000.0, 2000.0)),
            ..Default::default()
        };
        assert_eq!(skus(&filter_diamonds(&ds.diamonds, &request)), ["D3", "D4"]);

        let request = SettingFilterRequest {
            price: Some(NumericRange::new(1000.0, 2000.0)),
            ..Default::default()
        };
        assert_eq!(ids(&filter_settings(&ds.settings, &request)), ["2", "4"]);
    }

    #[test]
    fn test_non_numeric_values_are_excluded() {
        let ds = dataset();
        let request = DiamondFilterRequest {
            carat: Some(NumericRange::new(f64::MIN, f64::MAX)),
            ..Default::default()
        };
        assert_eq!(skus(&filter_diamonds(&ds.diamonds, &request)), ["D1", "D2", "D4"]);
    }

    #[test]
    fn test_missing_grade_fails_range() {
        let ds = dataset();
        let request = DiamondFilterRequest {
            polish: Some(IndexRange::new(0, 4)),
            depth: Some(NumericRange::new(60.0, 63.0)),
            length: Some(NumericRange::new(6.0, 9.0)),
            ..Default::default()
        };
        assert_eq!(skus(&filter_diamonds(&ds.diamonds, &request)), ["D1", "D2"]);
    }

    #[test]
    fn test_negative_index_matches_nothing() {
        let ds = dataset();
        for range in [IndexRange::new(-3, 1), IndexRange::new(0, -1), IndexRange::new(-1, 8)] {
            let request = DiamondFilterRequest {
                color: Some(range),
                ..Default::default()
            };
            assert!(filter_diamonds(&ds.diamonds, &request).is_empty());
        }
    }

    #[test]
    fn test_off_type_grade_fails_range() {
        let ds = Dataset::from_json_str(
            r#"{"diamonds": [{"sku": "A", "color": "L"}, {"sku": "B", "color": 5}]}"#,
        )
        .unwrap();
        let request = DiamondFilterRequest {
            color: Some(IndexRange::new(0, 8)),
            ..Default::default()
        };
        assert_eq!(skus(&filter_diamonds(&ds.diamonds, &request)), ["A"]);
        assert_eq!(filter_diamonds(&ds.diamonds, &DiamondFilterRequest::default()).len(), 2);
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let ds = dataset();
        let request = DiamondFilterRequest {
            clarity: Some(IndexRange::new(6, 2)),
            ..Default::default()
        };
        assert!(filter_diamonds(&ds.diamonds, &request).is_empty());
    }

    #[test]
    fn test_metal_match_ignores_case() {
        let ds = dataset();
        let request = SettingFilterRequest {
            metal: Some(MetalFilter::new("White Gold 14k")),
            ..Default::default()
        };
        assert_eq!(ids(&filter_settings(&ds.settings, &request)), ["1", "2", "3"]);

        let request = SettingFilterRequest {
            metal: Some(MetalFilter::new("gold")),
            price: Some(NumericRange::new(0.0, 1000.0)),
        };
        assert_eq!(ids(&filter_settings(&ds.settings, &request)), ["1", "3"]);
    }

    #[test]
    fn test_empty_metal_description_is_ignored() {
        let ds = dataset();
        let request = SettingFilterRequest {
            metal: Some(MetalFilter::new("")),
            ..Default::default()
        };
        assert_eq!(filter_settings(&ds.settings, &request).len(), 5);
    }

    #[test]
    fn test_metal_matches() {
        let filter = MetalFilter::new("Rose Gold 18k");
        assert!(metal_matches(Some("ROSE GOLD"), &filter));
        assert!(metal_matches(Some("rose gold 18k polished"), &filter));
        assert!(!metal_matches(Some("Yellow Gold 18k"), &filter));
        assert!(!metal_matches(Some("Gold"), &filter));
        assert!(!metal_matches(Some("k"), &filter));
        assert!(!metal_matches(Some("Rose Go"), &filter));
        assert!(!metal_matches(Some(""), &filter));
        assert!(!metal_matches(None, &filter));
    }
}
