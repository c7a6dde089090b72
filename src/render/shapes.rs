use super::{RenderOptions, Slot, Truncation};

/// Per-row actions the view layer offers for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    Register,
    Edit,
    Delete,
    ViewRegistrations,
}

/// Which record fields become the title, secondary text, counters and timestamp.
#[derive(Debug, Clone, Copy)]
pub struct RecordShape {
    pub title: &'static str,
    /// (field, fallback text when missing or empty)
    pub fields: &'static [(&'static str, &'static str)],
    pub counters: &'static [&'static str],
    pub timestamp: Option<&'static str>,
    pub actions: &'static [ItemAction],
}

pub const STUDENT_TUTORIALS: RecordShape = RecordShape {
    title: "title",
    fields: &[("description", "No description")],
    counters: &["registered_count"],
    timestamp: Some("date"),
    actions: &[ItemAction::Register],
};

pub const STUDENT_POSTS: RecordShape = RecordShape {
    title: "title",
    fields: &[("content", "")],
    counters: &["likes_count", "comments_count"],
    timestamp: Some("created_at"),
    actions: &[],
};

pub const EXECUTIVE_POSTS: RecordShape = RecordShape {
    title: "title",
    fields: &[("content", "")],
    counters: &["views", "comments_count"],
    timestamp: Some("created_at"),
    actions: &[ItemAction::Edit, ItemAction::Delete],
};

pub const EXECUTIVE_RESOURCES: RecordShape = RecordShape {
    title: "title",
    fields: &[("description", "No description")],
    counters: &["download_count"],
    timestamp: Some("created_at"),
    actions: &[ItemAction::Edit, ItemAction::Delete],
};

pub const EXECUTIVE_TUTORIALS: RecordShape = RecordShape {
    title: "title",
    fields: &[("description", "No description")],
    counters: &["registered_count"],
    timestamp: Some("date"),
    actions: &[ItemAction::ViewRegistrations, ItemAction::Edit, ItemAction::Delete],
};

pub const ACTIVITY_LOG: RecordShape = RecordShape {
    title: "description",
    fields: &[("action", "")],
    counters: &[],
    timestamp: Some("timestamp"),
    actions: &[],
};

/// A dashboard list: where it renders, how records map to rows, and what shows when empty.
#[derive(Debug, Clone, Copy)]
pub struct ListView {
    pub slot: Slot,
    pub shape: &'static RecordShape,
    pub limit: usize,
    pub truncate: Option<(&'static str, usize)>,
    pub placeholder: &'static str,
    pub load_error: &'static str,
    /// A failed load swaps the list region for `load_error`. Otherwise prior rows stay and
    /// the error goes to a notification.
    pub replace_on_error: bool,
}

impl ListView {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            limit: self.limit,
            truncate: self.truncate.map(|(field, max_chars)| Truncation {
                field: field.to_string(),
                max_chars,
            }),
        }
    }
}

pub const TUTORIALS_VIEW: ListView = ListView {
    slot: Slot::TutorialsList,
    shape: &STUDENT_TUTORIALS,
    limit: 5,
    truncate: None,
    placeholder: "No tutorials available.",
    load_error: "Failed to load tutorials",
    replace_on_error: false,
};

pub const POSTS_VIEW: ListView = ListView {
    slot: Slot::PostsList,
    shape: &STUDENT_POSTS,
    limit: 5,
    truncate: Some(("content", 150)),
    placeholder: "No posts available.",
    load_error: "Failed to load posts",
    replace_on_error: false,
};

pub const MY_POSTS_VIEW: ListView = ListView {
    slot: Slot::MyPostsList,
    shape: &EXECUTIVE_POSTS,
    limit: 0,
    truncate: Some(("content", 100)),
    placeholder: "No posts created yet",
    load_error: "Failed to load posts",
    replace_on_error: false,
};

pub const MY_RESOURCES_VIEW: ListView = ListView {
    slot: Slot::MyResourcesList,
    shape: &EXECUTIVE_RESOURCES,
    limit: 0,
    truncate: None,
    placeholder: "No resources uploaded yet",
    load_error: "Failed to load resources",
    replace_on_error: false,
};

pub const MY_TUTORIALS_VIEW: ListView = ListView {
    slot: Slot::MyTutorialsList,
    shape: &EXECUTIVE_TUTORIALS,
    limit: 0,
    truncate: None,
    placeholder: "No tutorials created yet",
    load_error: "Failed to load tutorials",
    replace_on_error: false,
};

pub const RECENT_ACTIVITY_VIEW: ListView = ListView {
    slot: Slot::RecentActivity,
    shape: &ACTIVITY_LOG,
    limit: 10,
    truncate: None,
    placeholder: "No recent activity",
    load_error: "Failed to load recent activity",
    replace_on_error: true,
};
