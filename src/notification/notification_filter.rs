use super::notification_models::{
    Notification, NotificationCategory, NotificationPriority, NotificationStatus,
};

/// Client-side filter vocabulary applied over a store snapshot.
///
/// This is the local read path: it never talks to the server and never
/// mutates the store. `page` is 1-based; a `page_size` of 0 disables
/// pagination.
#[derive(Debug, Clone, Default)]
pub struct InboxFilter {
    pub status: Option<NotificationStatus>,
    pub category: Option<NotificationCategory>,
    pub priority: Option<NotificationPriority>,
    pub search: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

/// One filtered page plus the total match count before pagination,
/// so the rendering layer can size its pager.
#[derive(Debug, Clone)]
pub struct FilteredPage {
    pub items: Vec<Notification>,
    pub total: usize,
}

impl InboxFilter {
    fn matches(&self, n: &Notification) -> bool {
        if self.status.is_some_and(|s| n.status != s) {
            return false;
        }
        if self.category.is_some_and(|c| n.category != c) {
            return false;
        }
        if self.priority.is_some_and(|p| n.priority != p) {
            return false;
        }
        if let Some(term) = self.search.as_deref() {
            let needle = term.to_lowercase();
            if !n.title.to_lowercase().contains(&needle)
                && !n.message.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// Apply `filter` to `items`, preserving their order.
pub fn apply(items: &[Notification], filter: &InboxFilter) -> FilteredPage {
    let matched: Vec<&Notification> = items.iter().filter(|n| filter.matches(n)).collect();
    let total = matched.len();

    let items = if filter.page_size == 0 {
        matched.into_iter().cloned().collect()
    } else {
        let start = filter.page.saturating_sub(1) * filter.page_size;
        matched
            .into_iter()
            .skip(start)
            .take(filter.page_size)
            .cloned()
            .collect()
    };

    FilteredPage { items, total }
}
