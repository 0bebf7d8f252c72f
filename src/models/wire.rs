use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept strings, numbers or null for free-text fields. The backend sends
/// dates as epoch milliseconds or ISO strings depending on the column type.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(cell_text))
}

/// Display names are nullable on the backend; a null or missing name decodes
/// as an empty string instead of failing the whole page.
pub(crate) fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// Genres show up either as plain names or as `{genreId, type}` objects.
pub(crate) fn genre_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .iter()
        .filter_map(|value| match value {
            Value::Object(map) => map
                .get("type")
                .or_else(|| map.get("name"))
                .and_then(cell_text),
            other => cell_text(other),
        })
        .collect())
}

/// Render a scalar cell as text.
pub(crate) fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Read a year cell, tolerating numeric strings.
pub(crate) fn cell_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => number.as_i64().and_then(|year| i32::try_from(year).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Check that a tuple row carries at least `expected` cells.
pub(crate) fn expect_cells(row: &[Value], expected: usize, kind: &str) -> Result<(), String> {
    if row.len() < expected {
        Err(format!(
            "{kind} row has {} cells, expected {expected}",
            row.len()
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cell_year_reads_numbers_and_numeric_strings() {
        assert_eq!(cell_year(&json!(1994)), Some(1994));
        assert_eq!(cell_year(&json!(" 2001 ")), Some(2001));
        assert_eq!(cell_year(&json!("soon")), None);
        assert_eq!(cell_year(&Value::Null), None);
    }

    #[derive(Deserialize)]
    struct Named {
        #[serde(default, deserialize_with = "lenient_name")]
        name: String,
    }

    #[test]
    fn lenient_name_turns_null_and_missing_into_empty() {
        let null: Named = serde_json::from_str(r#"{"name": null}"#).unwrap();
        let missing: Named = serde_json::from_str("{}").unwrap();
        let present: Named = serde_json::from_str(r#"{"name": "Heat"}"#).unwrap();
        assert_eq!(null.name, "");
        assert_eq!(missing.name, "");
        assert_eq!(present.name, "Heat");
    }

    #[test]
    fn cell_text_skips_structured_values() {
        assert_eq!(cell_text(&json!("Paris")), Some("Paris".to_string()));
        assert_eq!(cell_text(&json!(7.5)), Some("7.5".to_string()));
        assert_eq!(cell_text(&json!([1, 2])), None);
    }
}
