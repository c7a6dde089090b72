//! Turning raw API records into view-model rows, and addressing them to slots.

pub mod shapes;
pub mod slots;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::Value;

pub use shapes::{ItemAction, ListView, RecordShape};
pub use slots::{RenderTarget, RenderedList, Slot, SlotBoard, SlotContent};

pub const ELLIPSIS: &str = "...";

/// Cut `field` to `max_chars` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    pub field: String,
    pub max_chars: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Keep at most this many records. 0 keeps all.
    pub limit: usize,
    pub truncate: Option<Truncation>,
}

impl RenderOptions {
    pub fn limit(limit: usize) -> Self {
        Self { limit, truncate: None }
    }

    pub fn truncating(mut self, field: &str, max_chars: usize) -> Self {
        self.truncate = Some(Truncation { field: field.to_string(), max_chars });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    At(DateTime<FixedOffset>),
    Day(NaiveDate),
}

impl Timestamp {
    pub fn parse(raw: &str) -> Option<Timestamp> {
        DateTime::parse_from_rfc3339(raw)
            .map(Timestamp::At)
            .ok()
            .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(Timestamp::Day))
    }

    pub fn date_label(&self) -> String {
        match self {
            Timestamp::At(dt) => dt.format("%Y-%m-%d").to_string(),
            Timestamp::Day(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// A display-ready row. Built fresh from a record on every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: String,
    pub title: String,
    /// Secondary text fields as (field name, text), in shape order.
    pub fields: Vec<(String, String)>,
    pub counters: Vec<(String, i64)>,
    pub timestamp: Option<Timestamp>,
    pub actions: Vec<ItemAction>,
}

impl ListItem {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn counter(&self, name: &str) -> Option<i64> {
        self.counters.iter().find(|(k, _)| k == name).map(|(_, v)| *v)
    }
}

/// Convert records to rows. Order is preserved; `limit` keeps a prefix.
pub fn render(records: &[Value], shape: &RecordShape, opts: &RenderOptions) -> Vec<ListItem> {
    let take = if opts.limit == 0 { records.len() } else { opts.limit };
    records
        .iter()
        .take(take)
        .map(|record| {
            let mut item = item_from(record, shape);
            if let Some(t) = &opts.truncate {
                apply_truncation(&mut item, t);
            }
            item
        })
        .collect()
}

/// Cut `text` to `max_chars` characters, appending [`ELLIPSIS`] only if something was cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

fn apply_truncation(item: &mut ListItem, t: &Truncation) {
    if t.field == "title" {
        item.title = truncate_text(&item.title, t.max_chars);
        return;
    }
    if let Some((_, value)) = item.fields.iter_mut().find(|(k, _)| *k == t.field) {
        *value = truncate_text(value, t.max_chars);
    }
}

fn item_from(record: &Value, shape: &RecordShape) -> ListItem {
    let id = match record.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    let fields = shape
        .fields
        .iter()
        .map(|(name, fallback)| {
            let text = text_of(record, name).unwrap_or_else(|| fallback.to_string());
            (name.to_string(), text)
        })
        .collect();

    let counters = shape
        .counters
        .iter()
        .map(|name| {
            let n = record.get(*name).and_then(Value::as_i64).unwrap_or(0);
            (name.to_string(), n)
        })
        .collect();

    let timestamp = shape
        .timestamp
        .and_then(|name| record.get(name))
        .and_then(Value::as_str)
        .and_then(Timestamp::parse);

    ListItem {
        id,
        title: text_of(record, shape.title).unwrap_or_default(),
        fields,
        counters,
        timestamp,
        actions: shape.actions.to_vec(),
    }
}

/// Non-empty text of a field; numbers and booleans are stringified.
fn text_of(record: &Value, name: &str) -> Option<String> {
    match record.get(name)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbered(n: usize) -> Vec<Value> {
        (1..=n)
            .map(|i| json!({"id": i, "title": format!("Tutorial {i}"), "date": "2024-03-01"}))
            .collect()
    }

    #[test]
    fn limit_keeps_first_records_in_order() {
        let records = numbered(12);
        let items = render(&records, &shapes::STUDENT_TUTORIALS, &RenderOptions::limit(5));
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn zero_limit_keeps_everything() {
        let records = numbered(12);
        let items = render(&records, &shapes::STUDENT_TUTORIALS, &RenderOptions::limit(0));
        assert_eq!(items.len(), 12);
        assert_eq!(items[11].title, "Tutorial 12");
    }

    #[test]
    fn empty_input_renders_nothing() {
        let items = render(&[], &shapes::STUDENT_POSTS, &RenderOptions::limit(5));
        assert!(items.is_empty());
    }

    #[test]
    fn truncation_only_marks_cut_text() {
        let records = vec![
            json!({"id": 1, "title": "Long", "content": "abcdefghij"}),
            json!({"id": 2, "title": "Short", "content": "abc"}),
        ];
        let opts = RenderOptions::limit(0).truncating("content", 5);
        let items = render(&records, &shapes::STUDENT_POSTS, &opts);
        assert_eq!(items[0].field("content"), Some("abcde..."));
        assert_eq!(items[1].field("content"), Some("abc"));
        // source untouched
        assert_eq!(records[0]["content"], "abcdefghij");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        assert_eq!(truncate_text("ሰላም ለሁሉም", 3), "ሰላም...");
        assert_eq!(truncate_text("exact", 5), "exact");
        assert_eq!(truncate_text("", 0), "");
    }

    #[test]
    fn missing_fields_use_shape_fallbacks() {
        let records = vec![json!({"id": "t-9", "title": "Calculus"})];
        let items = render(&records, &shapes::STUDENT_TUTORIALS, &RenderOptions::default());
        let item = &items[0];
        assert_eq!(item.id, "t-9");
        assert_eq!(item.field("description"), Some("No description"));
        assert_eq!(item.counter("registered_count"), Some(0));
        assert_eq!(item.timestamp, None);
        assert_eq!(item.actions, vec![ItemAction::Register]);
    }

    #[test]
    fn timestamps_accept_datetimes_and_dates() {
        let at = Timestamp::parse("2024-05-06T10:30:00+03:00").expect("datetime");
        assert_eq!(at.date_label(), "2024-05-06");
        let day = Timestamp::parse("2024-05-07").expect("date");
        assert_eq!(day.date_label(), "2024-05-07");
        assert_eq!(Timestamp::parse("yesterday"), None);
    }
}
