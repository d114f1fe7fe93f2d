//! # Screen
//!
//! Headless model of what the webview shows: the mounted page fragment, its
//! text slots and flags, keyed lists and the snackbar queue.
//!
//! ## Keyed List Reconciliation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   before            new snapshot          after             stats      │
//! │   ──────            ────────────          ─────             ─────      │
//! │   latte-m  (1)      latte-m  (2)          latte-m  (2)      updated 1  │
//! │   tea-1    (1)      bun-1    (1)          bun-1    (1)      removed 1  │
//! │                                                             added   1  │
//! │                                                                         │
//! │   Rows are matched by id. Matching rows are updated in place, rows     │
//! │   missing from the snapshot are removed, new rows are appended.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use tracing::{debug, info};

use cafe_core::ActiveRoute;

// =============================================================================
// Lists
// =============================================================================

/// One rendered row: an element id plus named field values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListRow {
    pub id: String,
    pub fields: BTreeMap<String, String>,
}

impl ListRow {
    pub fn new(id: impl Into<String>) -> Self {
        ListRow {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Outcome of [`ListView::reconcile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileStats {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

/// A container of keyed rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    rows: Vec<ListRow>,
}

impl ListView {
    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn row(&self, id: &str) -> Option<&ListRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn row_mut(&mut self, id: &str) -> Option<&mut ListRow> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Brings the list in line with `snapshot` without rebuilding rows that
    /// are still present.
    pub fn reconcile(&mut self, snapshot: Vec<ListRow>) -> ReconcileStats {
        let mut stats = ReconcileStats::default();

        let before = self.rows.len();
        self.rows
            .retain(|row| snapshot.iter().any(|wanted| wanted.id == row.id));
        stats.removed = before - self.rows.len();

        for wanted in snapshot {
            match self.rows.iter_mut().find(|row| row.id == wanted.id) {
                Some(row) => {
                    if row.fields != wanted.fields {
                        row.fields = wanted.fields;
                        stats.updated += 1;
                    }
                }
                None => {
                    self.rows.push(wanted);
                    stats.added += 1;
                }
            }
        }

        stats
    }

    /// Replaces every row (placeholder content swapped for loaded data).
    pub fn replace(&mut self, rows: Vec<ListRow>) {
        self.rows = rows;
    }
}

// =============================================================================
// Snackbars
// =============================================================================

/// Snackbars kept on screen; older ones are dropped first.
pub const MAX_SNACKBARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnackbarKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snackbar {
    pub message: String,
    pub kind: SnackbarKind,
}

// =============================================================================
// Screen
// =============================================================================

/// Everything currently displayed.
///
/// Mounting a view wipes the view's own state (texts, flags, lists). The
/// snackbar queue belongs to the shell and survives navigation.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    mounted: Option<ActiveRoute>,
    texts: BTreeMap<String, String>,
    visible: BTreeMap<String, bool>,
    enabled: BTreeMap<String, bool>,
    lists: BTreeMap<String, ListView>,
    snackbars: Vec<Snackbar>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps the page fragment in.
    pub fn mount(&mut self, route: &ActiveRoute) {
        debug!(route = %route.name, view = %route.view_path, "Mounting view");
        self.texts.clear();
        self.visible.clear();
        self.enabled.clear();
        self.lists.clear();
        self.mounted = Some(route.clone());
    }

    pub fn mounted(&self) -> Option<&ActiveRoute> {
        self.mounted.as_ref()
    }

    pub fn set_text(&mut self, slot: &str, text: impl Into<String>) {
        self.texts.insert(slot.to_string(), text.into());
    }

    pub fn text(&self, slot: &str) -> Option<&str> {
        self.texts.get(slot).map(String::as_str)
    }

    pub fn set_visible(&mut self, element: &str, visible: bool) {
        self.visible.insert(element.to_string(), visible);
    }

    /// Elements are visible unless hidden explicitly.
    pub fn is_visible(&self, element: &str) -> bool {
        self.visible.get(element).copied().unwrap_or(true)
    }

    pub fn set_enabled(&mut self, element: &str, enabled: bool) {
        self.enabled.insert(element.to_string(), enabled);
    }

    /// Elements are enabled unless disabled explicitly.
    pub fn is_enabled(&self, element: &str) -> bool {
        self.enabled.get(element).copied().unwrap_or(true)
    }

    /// The list in `container`, created empty on first use.
    pub fn list_mut(&mut self, container: &str) -> &mut ListView {
        self.lists.entry(container.to_string()).or_default()
    }

    pub fn list(&self, container: &str) -> Option<&ListView> {
        self.lists.get(container)
    }

    pub fn show_snackbar(&mut self, message: impl Into<String>, kind: SnackbarKind) {
        let message = message.into();
        info!(?kind, message = %message, "Snackbar");
        self.snackbars.push(Snackbar { message, kind });
        if self.snackbars.len() > MAX_SNACKBARS {
            let excess = self.snackbars.len() - MAX_SNACKBARS;
            self.snackbars.drain(..excess);
        }
    }

    pub fn snackbars(&self) -> &[Snackbar] {
        &self.snackbars
    }

    pub fn last_snackbar(&self) -> Option<&Snackbar> {
        self.snackbars.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, qty: &str) -> ListRow {
        ListRow::new(id).field("quantity", qty)
    }

    #[test]
    fn test_reconcile_updates_removes_and_appends() {
        let mut list = ListView::default();
        assert_eq!(
            list.reconcile(vec![row("latte-m", "1"), row("tea-1", "1")]),
            ReconcileStats { added: 2, updated: 0, removed: 0 }
        );

        let stats = list.reconcile(vec![row("latte-m", "2"), row("bun-1", "1")]);

        assert_eq!(stats, ReconcileStats { added: 1, updated: 1, removed: 1 });
        assert_eq!(list.ids(), vec!["latte-m", "bun-1"]);
        assert_eq!(list.row("latte-m").unwrap().get("quantity"), Some("2"));
    }

    #[test]
    fn test_unchanged_rows_are_not_counted() {
        let mut list = ListView::default();
        list.reconcile(vec![row("a", "1")]);
        assert_eq!(list.reconcile(vec![row("a", "1")]), ReconcileStats::default());
    }

    #[test]
    fn test_mount_clears_view_state_but_keeps_snackbars() {
        let mut screen = Screen::new();
        screen.set_text("cart-total-cost", "500 ₽");
        screen.set_visible("cart-summary", false);
        screen.list_mut("cart-items").reconcile(vec![row("a", "1")]);
        screen.show_snackbar("Товар добавлен в корзину", SnackbarKind::Success);

        screen.mount(&ActiveRoute {
            name: "root".into(),
            view_path: "/pages/main.html".into(),
            generation: 2,
        });

        assert!(screen.text("cart-total-cost").is_none());
        assert!(screen.is_visible("cart-summary"));
        assert!(screen.list("cart-items").is_none());
        assert_eq!(screen.snackbars().len(), 1);
        assert_eq!(screen.mounted().unwrap().generation, 2);
    }

    #[test]
    fn test_snackbar_queue_is_bounded() {
        let mut screen = Screen::new();
        for n in 0..MAX_SNACKBARS + 5 {
            screen.show_snackbar(format!("#{}", n), SnackbarKind::Warning);
        }

        assert_eq!(screen.snackbars().len(), MAX_SNACKBARS);
        assert_eq!(screen.snackbars()[0].message, "#5");
        assert_eq!(
            screen.last_snackbar().unwrap().message,
            format!("#{}", MAX_SNACKBARS + 4)
        );
    }
}
