//! Page-number range computation for the pagination control.

/// One slot in the rendered pagination strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Compute the page numbers the pagination control should display.
///
/// Always includes the first and last page; pages around `current` fill
/// the window, with ellipses standing in for the collapsed ranges.
/// `max_displayed` bounds the window size (the dashboard uses 7).
pub fn pagination_range(current: usize, total: usize, max_displayed: usize) -> Vec<PageItem> {
    if total <= max_displayed {
        return (1..=total).map(PageItem::Page).collect();
    }

    let mut start = current.saturating_sub(max_displayed / 2).max(1);
    let mut end = start + max_displayed - 1;
    if end > total {
        end = total;
        start = end.saturating_sub(max_displayed - 1).max(1);
    }

    let mut items = vec![PageItem::Page(1)];
    if start > 2 {
        items.push(PageItem::Ellipsis);
    }
    for page in start.max(2)..=end.min(total - 1) {
        items.push(PageItem::Page(page));
    }
    if end < total - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total));
    items
}
