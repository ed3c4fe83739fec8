use super::request::{
    Decoded, DiamondFilterRequest, IndexRange, MetalFilter, NumericRange, SettingFilterRequest,
};
use crate::catalog::Numeric;
use crate::error::InvalidFilterShape;
use serde_json::{Map, Value};
use tracing::warn;

/// Reads constraint fields out of a request object, recording each one that
/// is present but malformed.
struct FieldReader<'a> {
    object: Option<&'a Map<String, Value>>,
    rejected: Vec<InvalidFilterShape>,
}

impl<'a> FieldReader<'a> {
    fn new(body: &'a Value) -> Self {
        let mut reader = Self {
            object: None,
            rejected: Vec::new(),
        };
        match body {
            Value::Object(map) => reader.object = Some(map),
            Value::Null => {}
            other => reader.reject(InvalidFilterShape::NotAnObject(kind(other))),
        }
        reader
    }

    fn reject(&mut self, err: InvalidFilterShape) {
        warn!(error = %err, "filter constraint ignored");
        self.rejected.push(err);
    }

    fn field(&self, name: &str) -> Option<&'a Value> {
        self.object?.get(name).filter(|v| !v.is_null())
    }

    fn pair(&mut self, name: &'static str) -> Option<(f64, f64)> {
        let value = self.field(name)?;
        match read_pair(name, value) {
            Ok(pair) => Some(pair),
            Err(err) => {
                self.reject(err);
                None
            }
        }
    }

    fn numeric_range(&mut self, name: &'static str) -> Option<NumericRange> {
        self.pair(name).map(|(min, max)| NumericRange::new(min, max))
    }

    /// The inclusive `max` is resolved through its exclusive end, so
    /// `[0, -0.5]` ends before the first grade.
    fn index_range(&mut self, name: &'static str) -> Option<IndexRange> {
        self.pair(name).map(|(min, max)| {
            let end = (max + 1.0).trunc() as i64;
            IndexRange::new(min.trunc() as i64, end.saturating_sub(1))
        })
    }

    fn metal(&mut self, name: &'static str) -> Option<MetalFilter> {
        let value = self.field(name)?;
        match value.get("description").and_then(Value::as_str) {
            Some(description) => Some(MetalFilter::new(description)),
            None => {
                self.reject(InvalidFilterShape::MissingDescription { field: name });
                None
            }
        }
    }

    fn finish<T>(self, request: T) -> Decoded<T> {
        Decoded {
            request,
            rejected: self.rejected,
        }
    }
}

fn read_pair(name: &'static str, value: &Value) -> Result<(f64, f64), InvalidFilterShape> {
    let Some(items) = value.as_array() else {
        return Err(InvalidFilterShape::NotAPair {
            field: name,
            found: kind(value),
        });
    };
    if items.len() < 2 {
        return Err(InvalidFilterShape::TooShort {
            field: name,
            len: items.len(),
        });
    }

    let bound = |position: usize| {
        Numeric::new(items[position].clone())
            .as_f64()
            .ok_or(InvalidFilterShape::NotNumeric {
                field: name,
                position,
            })
    };
    Ok((bound(0)?, bound(1)?))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses a raw request body. An empty body means no constraints; a body
/// that is not JSON is reported and also treated as no constraints.
fn parse_body(body: &str) -> Result<Value, InvalidFilterShape> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| InvalidFilterShape::Body(e.to_string()))
}

fn decode_str<T: Default>(body: &str, decode: fn(&Value) -> Decoded<T>) -> Decoded<T> {
    match parse_body(body) {
        Ok(value) => decode(&value),
        Err(err) => {
            warn!(error = %err, "filter request ignored");
            Decoded {
                request: T::default(),
                rejected: vec![err],
            }
        }
    }
}

impl DiamondFilterRequest {
    pub fn from_json(body: &Value) -> Decoded<Self> {
        let mut r = FieldReader::new(body);
        let request = Self {
            carat: r.numeric_range("carat"),
            depth: r.numeric_range("depthRange"),
            length: r.numeric_range("lwRange"),
            color: r.index_range("colorRange"),
            clarity: r.index_range("clarityRange"),
            polish: r.index_range("polishRange"),
            symmetry: r.index_range("symRange"),
            fluorescence: r.index_range("flourRange"),
            price: r.numeric_range("price"),
        };
        r.finish(request)
    }

    pub fn from_json_str(body: &str) -> Decoded<Self> {
        decode_str(body, Self::from_json)
    }
}

impl SettingFilterRequest {
    pub fn from_json(body: &Value) -> Decoded<Self> {
        let mut r = FieldReader::new(body);
        let request = Self {
            price: r.numeric_range("priceRangeSet"),
            metal: r.metal("selectedMetalSet"),
        };
        r.finish(request)
    }

    pub fn from_json_str(body: &str) -> Decoded<Self> {
        decode_str(body, Self::from_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_diamond_request() {
        let decoded = DiamondFilterRequest::from_json(&json!({
            "carat": [0.5, 1.5],
            "depthRange": [55, 65],
            "lwRange": ["1.0", "1.2"],
            "colorRange": [5, 8],
            "clarityRange": [0, 7],
            "polishRange": [1, 2],
            "symRange": [1, 3],
            "flourRange": [0, 1],
            "price": [1000, 2000],
        }));
        assert!(decoded.is_clean());
        let req = decoded.request;
        assert_eq!(req.carat, Some(NumericRange::new(0.5, 1.5)));
        assert_eq!(req.length, Some(NumericRange::new(1.0, 1.2)));
        assert_eq!(req.color, Some(IndexRange::new(5, 8)));
        assert_eq!(req.fluorescence, Some(IndexRange::new(0, 1)));
        assert_eq!(req.price, Some(NumericRange::new(1000.0, 2000.0)));
    }

    #[test]
    fn test_empty_and_null_fields_are_absent() {
        let decoded = DiamondFilterRequest::from_json(&json!({"carat": null, "other": 3}));
        assert!(decoded.is_clean());
        assert_eq!(decoded.request, DiamondFilterRequest::default());
    }

    #[test]
    fn test_zero_bounds_are_kept() {
        let decoded = DiamondFilterRequest::from_json(&json!({"carat": [0, 0]}));
        assert_eq!(decoded.request.carat, Some(NumericRange::new(0.0, 0.0)));
    }

    #[test]
    fn test_malformed_fields_are_skipped() {
        let decoded = DiamondFilterRequest::from_json(&json!({
            "carat": [1],
            "price": 0,
            "colorRange": [2, "x"],
            "clarityRange": [1, 3],
        }));
        assert_eq!(decoded.request.carat, None);
        assert_eq!(decoded.request.price, None);
        assert_eq!(decoded.request.color, None);
        assert_eq!(decoded.request.clarity, Some(IndexRange::new(1, 3)));
        assert_eq!(
            decoded.rejected,
            vec![
                InvalidFilterShape::TooShort { field: "carat", len: 1 },
                InvalidFilterShape::NotNumeric { field: "colorRange", position: 1 },
                InvalidFilterShape::NotAPair { field: "price", found: "a number" },
            ]
        );
    }

    #[test]
    fn test_fractional_indices_truncate() {
        let decoded = DiamondFilterRequest::from_json(&json!({"colorRange": [1.9, 4.5]}));
        assert_eq!(decoded.request.color, Some(IndexRange::new(1, 4)));

        let decoded = DiamondFilterRequest::from_json(&json!({"colorRange": [-0.5, 2]}));
        assert_eq!(decoded.request.color, Some(IndexRange::new(0, 2)));
    }

    #[test]
    fn test_fractional_max_below_zero_is_empty() {
        let decoded = DiamondFilterRequest::from_json(&json!({"colorRange": [0, -0.5]}));
        let range = decoded.request.color.unwrap();
        assert_eq!(range, IndexRange::new(0, -1));
        assert!(range.allowed(&crate::grades::COLOR).is_empty());
    }

    #[test]
    fn test_body_strings() {
        assert!(DiamondFilterRequest::from_json_str("").is_clean());
        assert!(DiamondFilterRequest::from_json_str("null").is_clean());

        let bad = DiamondFilterRequest::from_json_str("{carat:");
        assert_eq!(bad.request, DiamondFilterRequest::default());
        assert!(matches!(bad.rejected[..], [InvalidFilterShape::Body(_)]));

        let arr = SettingFilterRequest::from_json_str("[1, 2]");
        assert_eq!(arr.rejected, vec![InvalidFilterShape::NotAnObject("an array")]);
    }

    #[test]
    fn test_setting_request() {
        let decoded = SettingFilterRequest::from_json(&json!({
            "priceRangeSet": [100, 500],
            "selectedMetalSet": {"description": "White Gold 14k", "id": 3},
        }));
        assert!(decoded.is_clean());
        assert_eq!(decoded.request.metal, Some(MetalFilter::new("White Gold 14k")));

        let decoded = SettingFilterRequest::from_json(&json!({"selectedMetalSet": {}}));
        assert_eq!(decoded.request.metal, None);
        assert_eq!(
            decoded.rejected,
            vec![InvalidFilterShape::MissingDescription { field: "selectedMetalSet" }]
        );
    }
}
