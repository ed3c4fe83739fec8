//! Catalog records and the read-only dataset they are loaded into.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A numeric attribute as stored in the dataset, which may hold a number or
/// numeric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Numeric(Value);

impl Numeric {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// Numeric reading of the stored value.
    ///
    /// Text is trimmed and parsed, with empty text reading as zero. Anything
    /// that does not read as a number gives `None`, which fails every range.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match &self.0 {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => text_to_number(s)?,
            Value::Bool(b) => f64::from(u8::from(*b)),
            _ => return None,
        };
        (!n.is_nan()).then_some(n)
    }
}

fn text_to_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    s.parse().ok()
}

/// A grade or metal label. Non-text values are kept for output but never
/// match a label predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(Value);

impl Label {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }
}

/// Identifier of a record (`sku` or `id`), text or number in the source.
/// A record without one reads as null and is never found by lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Value);

impl RecordId {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// Whether a requested key addresses this record.
    ///
    /// Text identifiers compare exactly. Numeric identifiers compare by
    /// value, so `"7"` and `"7.0"` both address `7`.
    pub fn matches(&self, key: &str) -> bool {
        match &self.0 {
            Value::String(s) => s == key,
            Value::Number(n) => match (n.as_f64(), text_to_number(key)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
            _ => false,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn is_missing(&self) -> bool {
        self.0.is_null()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diamond {
    #[serde(default, skip_serializing_if = "RecordId::is_missing")]
    pub sku: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carat: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarity: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polish: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symmetry: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluorescence: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Numeric>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    #[serde(default, skip_serializing_if = "RecordId::is_missing")]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metal: Option<Label>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Field access shared by both record kinds.
pub trait Record {
    fn id(&self) -> &RecordId;

    /// Value of a named attribute, `Value::Null` when the record lacks it.
    fn attribute(&self, name: &str) -> Value;
}

fn opt_value<T: Serialize>(v: &Option<T>) -> Value {
    v.as_ref()
        .and_then(|v| serde_json::to_value(v).ok())
        .unwrap_or(Value::Null)
}

impl Record for Diamond {
    fn id(&self) -> &RecordId {
        &self.sku
    }

    fn attribute(&self, name: &str) -> Value {
        match name {
            "sku" => self.sku.0.clone(),
            "carat" => opt_value(&self.carat),
            "color" => opt_value(&self.color),
            "clarity" => opt_value(&self.clarity),
            "polish" => opt_value(&self.polish),
            "symmetry" => opt_value(&self.symmetry),
            "fluorescence" => opt_value(&self.fluorescence),
            "depth" => opt_value(&self.depth),
            "length" => opt_value(&self.length),
            "price" => opt_value(&self.price),
            _ => self.extra.get(name).cloned().unwrap_or(Value::Null),
        }
    }
}

impl Record for Setting {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn attribute(&self, name: &str) -> Value {
        match name {
            "id" => self.id.0.clone(),
            "price" => opt_value(&self.price),
            "metal" => opt_value(&self.metal),
            _ => self.extra.get(name).cloned().unwrap_or(Value::Null),
        }
    }
}

/// The full catalog. Loaded once and only ever borrowed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub diamonds: Vec<Diamond>,
    #[serde(default)]
    pub settings: Vec<Setting>,
}

impl Dataset {
    /// Loads a dataset file. `.yaml` and `.yml` files are read as YAML,
    /// everything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        let dataset = if is_yaml {
            Self::from_yaml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };

        info!(
            path = %path.display(),
            diamonds = dataset.diamonds.len(),
            settings = dataset.settings.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

pub fn find_diamond_by_sku<'a>(records: &'a [Diamond], sku: &str) -> Option<&'a Diamond> {
    find_by_id(records, sku)
}

pub fn find_setting_by_id<'a>(records: &'a [Setting], id: &str) -> Option<&'a Setting> {
    find_by_id(records, id)
}

fn find_by_id<'a, R: Record>(records: &'a [R], key: &str) -> Option<&'a R> {
    let found = records.iter().find(|r| r.id().matches(key));
    debug!(key, found = found.is_some(), "record lookup");
    found
}
