use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use serde_json::Value;

use super::{ListItem, ListView, render};
use crate::stats::{Role, StatsSnapshot};

/// Named render targets. The view layer decides where each one appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Stats(Role),
    TutorialsList,
    PostsList,
    MyPostsList,
    MyResourcesList,
    MyTutorialsList,
    RecentActivity,
    FormError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedList {
    Items(Vec<ListItem>),
    /// Nothing to show; the view must display this placeholder rather than an empty region.
    Empty { placeholder: String },
}

impl RenderedList {
    /// Render records for a list view, substituting the view's placeholder when there are none.
    pub fn from_records(records: &[Value], view: &ListView) -> Self {
        let items = render(records, view.shape, &view.options());
        if items.is_empty() {
            RenderedList::Empty { placeholder: view.placeholder.to_string() }
        } else {
            RenderedList::Items(items)
        }
    }

    pub fn items(&self) -> &[ListItem] {
        match self {
            RenderedList::Items(items) => items,
            RenderedList::Empty { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotContent {
    Stats(StatsSnapshot),
    List(RenderedList),
    Error(String),
}

/// Where rendered output goes. Implemented by the view layer.
pub trait RenderTarget: Send + Sync {
    fn render_stats(&self, snapshot: &StatsSnapshot);

    fn render_list(&self, slot: Slot, list: RenderedList);

    fn show_error(&self, slot: Slot, message: &str);

    /// Whether the view has a region for `slot`. Callers fall back to notifications when not.
    fn has_slot(&self, _slot: Slot) -> bool {
        true
    }
}

/// In-memory render target: the latest content per slot.
#[derive(Debug, Default)]
pub struct SlotBoard {
    contents: Mutex<HashMap<Slot, SlotContent>>,
    mounted: Option<HashSet<Slot>>,
}

impl SlotBoard {
    /// A board that accepts every slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// A board that only has regions for the given slots; others are silently ignored.
    pub fn with_slots(slots: &[Slot]) -> Self {
        Self {
            contents: Mutex::new(HashMap::new()),
            mounted: Some(slots.iter().copied().collect()),
        }
    }

    pub fn get(&self, slot: Slot) -> Option<SlotContent> {
        self.contents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&slot)
            .cloned()
    }

    pub fn stats(&self, role: Role) -> Option<StatsSnapshot> {
        match self.get(Slot::Stats(role))? {
            SlotContent::Stats(s) => Some(s),
            _ => None,
        }
    }

    pub fn list(&self, slot: Slot) -> Option<RenderedList> {
        match self.get(slot)? {
            SlotContent::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn error(&self, slot: Slot) -> Option<String> {
        match self.get(slot)? {
            SlotContent::Error(e) => Some(e),
            _ => None,
        }
    }

    fn put(&self, slot: Slot, content: SlotContent) {
        if !self.has_slot(slot) {
            return;
        }
        self.contents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(slot, content);
    }
}

impl RenderTarget for SlotBoard {
    fn render_stats(&self, snapshot: &StatsSnapshot) {
        self.put(Slot::Stats(snapshot.role), SlotContent::Stats(snapshot.clone()));
    }

    fn render_list(&self, slot: Slot, list: RenderedList) {
        self.put(slot, SlotContent::List(list));
    }

    fn show_error(&self, slot: Slot, message: &str) {
        self.put(slot, SlotContent::Error(message.to_string()));
    }

    fn has_slot(&self, slot: Slot) -> bool {
        self.mounted.as_ref().is_none_or(|m| m.contains(&slot))
    }
}
