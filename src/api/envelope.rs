use serde_json::Value;

/// List endpoints answer either with a plain array or a paginated `{results: [...]}` envelope.
pub fn records_from(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                log::warn!("List response has no 'results' array, treating as empty");
                Vec::new()
            }
        },
        Value::Null => Vec::new(),
        other => {
            log::warn!("Unexpected list response shape: {other}");
            Vec::new()
        }
    }
}

/// Stats endpoints answer either with the counters directly or wrapped as `{success, stats: {...}}`.
pub fn stats_object(value: &Value) -> Option<&serde_json::Map<String, Value>> {
    match value.get("stats") {
        Some(Value::Object(inner)) => Some(inner),
        _ => value.as_object(),
    }
}
