use crate::catalog::Record;
use crate::grades;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

pub fn collect_values<R: Record>(records: &[&R], property: &str) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for record in records {
        match record.attribute(property) {
            Value::Array(arr) => {
                for item in &arr {
                    if let Some(s) = value_to_string(item) {
                        *counts.entry(s).or_default() += 1;
                    }
                }
            }
            value => {
                if let Some(s) = value_to_string(&value) {
                    *counts.entry(s).or_default() += 1;
                }
            }
        }
    }

    counts
}

/// Renders value counts. Graded attributes list in grade order, worst first;
/// with `show_count` the most frequent values come first.
pub fn format_values(
    counts: HashMap<String, usize>,
    property: &str,
    show_count: bool,
) -> Vec<String> {
    let mut items: Vec<(String, usize)> = counts.into_iter().collect();
    let order = value_order(property);

    if show_count {
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| order(a.0.as_str(), b.0.as_str())));
        items
            .into_iter()
            .map(|(val, count)| format!("{}: {}", val, count))
            .collect()
    } else {
        items.sort_by(|a, b| order(a.0.as_str(), b.0.as_str()));
        items.into_iter().map(|(val, _)| val).collect()
    }
}

fn value_order(property: &str) -> impl Fn(&str, &str) -> Ordering {
    let table = grades::table_for(property);
    move |a: &str, b: &str| match table {
        // Labels outside the table sort after every known grade.
        Some(t) => {
            let rank = |s: &str| t.rank(s).unwrap_or(usize::MAX);
            rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
        }
        None => a.cmp(b),
    }
}

fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
