use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{sort_items, DiskBackend, DiskError, ScanComplete, ScanEvent, ScanItem, SortOrder};

const NOTHING_SELECTED: &str = "No items selected for deletion.";
const SCAN_FAILED: &str = "Scan completed with errors.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskLensConfig {
    #[serde(default)]
    pub sort_order: SortOrder,
}

/// Tri-state of the "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    None,
    Partial,
    All,
}

/// Page state for one disk lens view, driven by user actions and backend
/// events.
pub struct DiskLensSession<B> {
    backend: B,
    selected_folder: Option<String>,
    items: Vec<ScanItem>,
    marked: BTreeSet<String>,
    sort_order: SortOrder,
    busy: bool,
    error: Option<String>,
    transient_error: Option<String>,
}

impl<B: DiskBackend> DiskLensSession<B> {
    pub fn new(backend: B, config: DiskLensConfig) -> Self {
        Self {
            backend,
            selected_folder: None,
            items: Vec::new(),
            marked: BTreeSet::new(),
            sort_order: config.sort_order,
            busy: false,
            error: None,
            transient_error: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn available_roots(&self) -> Result<Vec<String>, DiskError> {
        self.backend.list_available_roots()
    }

    pub fn selected_folder(&self) -> Option<&str> {
        self.selected_folder.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The persistent error if any, otherwise the transient one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().or(self.transient_error.as_deref())
    }

    /// Hides the short-lived message once the page's timer fires.
    pub fn clear_transient_error(&mut self) {
        self.transient_error = None;
    }

    /// Points the view at `path` and asks the backend to scan it. Picking a
    /// different folder drops the previous results; rescanning the same one
    /// keeps them until fresh events replace them.
    pub fn select_folder(&mut self, path: &str) {
        self.error = None;
        self.transient_error = None;
        self.marked.clear();
        if self.selected_folder.as_deref() != Some(path) {
            self.items.clear();
            self.selected_folder = Some(path.to_string());
        }
        self.busy = true;
        info!(path, "starting disk scan");
        if let Err(err) = self.backend.scan(path) {
            warn!(path, error = %err, "disk scan failed to start");
            self.error = Some(format!("Failed to start scan: {err}"));
            self.busy = false;
        }
    }

    pub fn handle_event(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::ItemDiscovered(item) => self.upsert(item),
            ScanEvent::ScanComplete(done) => self.complete(done),
        }
    }

    /// Parses one backend event delivered as JSON and applies it.
    pub fn handle_event_json(&mut self, raw: &str) -> Result<(), DiskError> {
        let event: ScanEvent = serde_json::from_str(raw)?;
        self.handle_event(event);
        Ok(())
    }

    fn upsert(&mut self, item: ScanItem) {
        match self.items.iter_mut().find(|existing| existing.path == item.path) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    fn complete(&mut self, done: ScanComplete) {
        if self.selected_folder.as_deref() != Some(done.path.as_str()) {
            debug!(path = %done.path, "ignoring completion for another folder");
            return;
        }
        self.busy = false;
        info!(path = %done.path, success = done.success, items = self.items.len(), "disk scan finished");
        if !done.success && self.error.is_none() && self.transient_error.is_none() {
            self.error = Some(done.error.unwrap_or_else(|| SCAN_FAILED.to_string()));
        }
    }

    pub fn items(&self) -> &[ScanItem] {
        &self.items
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
    }

    pub fn sorted_items(&self) -> Vec<ScanItem> {
        sort_items(&self.items, self.sort_order)
    }

    pub fn is_marked(&self, path: &str) -> bool {
        self.marked.contains(path)
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    fn selectable(&self) -> impl Iterator<Item = &ScanItem> {
        self.items.iter().filter(|item| item.error.is_none())
    }

    /// Checks or unchecks one row. Rows with a scan error and any row while
    /// the view is busy stay untouched.
    pub fn toggle_item(&mut self, path: &str, checked: bool) {
        if self.busy {
            return;
        }
        let selectable = self.selectable().any(|item| item.path == path);
        if checked && selectable {
            self.marked.insert(path.to_string());
        } else if !checked {
            self.marked.remove(path);
        }
    }

    pub fn toggle_select_all(&mut self, checked: bool) {
        if self.busy {
            return;
        }
        self.marked = if checked {
            self.selectable().map(|item| item.path.clone()).collect()
        } else {
            BTreeSet::new()
        };
    }

    pub fn selection_state(&self) -> SelectionState {
        let selectable = self.selectable().count();
        let marked = self.marked.len();
        if selectable == 0 || marked == 0 {
            SelectionState::None
        } else if marked == selectable {
            SelectionState::All
        } else {
            SelectionState::Partial
        }
    }

    /// Sends the checked rows to the backend and drops whatever it reports as
    /// removed. The page asks the user to confirm before calling this.
    pub fn delete_selected(&mut self) {
        if self.marked.is_empty() {
            self.transient_error = Some(NOTHING_SELECTED.to_string());
            return;
        }
        let paths: Vec<String> = self.marked.iter().cloned().collect();
        self.busy = true;
        self.error = None;
        self.transient_error = None;
        match self.backend.delete(&paths) {
            Ok(removed) => {
                info!(requested = paths.len(), removed = removed.len(), "deleted items");
                self.items.retain(|item| !removed.contains(&item.path));
                self.marked.clear();
            }
            Err(err) => {
                warn!(error = %err, "delete failed");
                self.error = Some(format!("Failed to delete items: {err}"));
            }
        }
        self.busy = false;
    }

    pub fn cancel_scan(&mut self) {
        self.backend.cancel_scan();
        self.busy = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeScanner {
        roots: Vec<String>,
        scans: Vec<String>,
        deleted: Vec<Vec<String>>,
        refuse_scan: bool,
        refuse_delete: bool,
        keep_on_delete: Vec<String>,
        cancelled: usize,
    }

    impl DiskBackend for FakeScanner {
        fn list_available_roots(&self) -> Result<Vec<String>, DiskError> {
            Ok(self.roots.clone())
        }

        fn scan(&mut self, path: &str) -> Result<(), DiskError> {
            if self.refuse_scan {
                return Err(DiskError::Backend("Path does not exist".into()));
            }
            self.scans.push(path.to_string());
            Ok(())
        }

        fn delete(&mut self, paths: &[String]) -> Result<Vec<String>, DiskError> {
            if self.refuse_delete {
                return Err(DiskError::Backend("read-only volume".into()));
            }
            self.deleted.push(paths.to_vec());
            Ok(paths
                .iter()
                .filter(|path| !self.keep_on_delete.contains(path))
                .cloned()
                .collect())
        }

        fn cancel_scan(&mut self) {
            self.cancelled += 1;
        }
    }

    fn item(path: &str, size: u64) -> ScanItem {
        ScanItem {
            path: path.into(),
            name: path.rsplit('/').next().unwrap_or(path).into(),
            size,
            is_directory: false,
            error: None,
        }
    }

    fn done(path: &str, success: bool, error: Option<&str>) -> ScanEvent {
        ScanEvent::ScanComplete(ScanComplete {
            path: path.into(),
            success,
            error: error.map(str::to_string),
        })
    }

    fn scanned_session(items: &[ScanItem]) -> DiskLensSession<FakeScanner> {
        let mut session = DiskLensSession::new(FakeScanner::default(), DiskLensConfig::default());
        session.select_folder("/data");
        for item in items {
            session.handle_event(ScanEvent::ItemDiscovered(item.clone()));
        }
        session.handle_event(done("/data", true, None));
        session
    }

    #[test]
    fn select_folder_starts_a_scan_and_marks_busy() {
        let mut session = DiskLensSession::new(FakeScanner::default(), DiskLensConfig::default());
        session.select_folder("/data");
        assert!(session.is_busy());
        assert_eq!(session.backend().scans, ["/data"]);
        session.handle_event(done("/data", true, None));
        assert!(!session.is_busy());
        assert_eq!(session.error(), None);
    }

    #[test]
    fn discovered_items_are_upserted_by_path() {
        let mut session = scanned_session(&[item("/data/a", 1), item("/data/b", 2)]);
        session.handle_event(ScanEvent::ItemDiscovered(item("/data/a", 10)));
        assert_eq!(session.items().len(), 2);
        assert_eq!(session.items()[0].size, 10);
    }

    #[test]
    fn changing_folder_drops_old_results() {
        let mut session = scanned_session(&[item("/data/a", 1)]);
        session.select_folder("/data");
        assert_eq!(session.items().len(), 1);
        session.select_folder("/other");
        assert!(session.items().is_empty());
        assert_eq!(session.backend().scans, ["/data", "/data", "/other"]);
    }

    #[test]
    fn start_failure_is_reported() {
        let scanner = FakeScanner {
            refuse_scan: true,
            ..FakeScanner::default()
        };
        let mut session = DiskLensSession::new(scanner, DiskLensConfig::default());
        session.select_folder("/missing");
        assert!(!session.is_busy());
        assert_eq!(session.error(), Some("Failed to start scan: Path does not exist"));
    }

    #[test]
    fn failed_completion_sets_error_once() {
        let mut session = DiskLensSession::new(FakeScanner::default(), DiskLensConfig::default());
        session.select_folder("/data");
        session.handle_event(done("/elsewhere", false, Some("ignored")));
        assert!(session.is_busy());
        session.handle_event(done("/data", false, None));
        assert_eq!(session.error(), Some(SCAN_FAILED));

        session.select_folder("/data");
        session.handle_event(done("/data", false, Some("permission denied")));
        assert_eq!(session.error(), Some("permission denied"));
    }

    #[test]
    fn config_reads_page_settings_json() {
        let config: DiskLensConfig = serde_json::from_str(r#"{"sortOrder":"asc"}"#).unwrap();
        assert_eq!(config.sort_order, SortOrder::Asc);
        let config: DiskLensConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DiskLensConfig::default());
        assert_eq!(config.sort_order, SortOrder::Desc);
        assert!(serde_json::from_str::<DiskLensConfig>(r#"{"sortOrder":"size"}"#).is_err());
    }

    #[test]
    fn sorting_follows_the_configured_order() {
        let config = DiskLensConfig {
            sort_order: SortOrder::Asc,
        };
        let mut session = DiskLensSession::new(FakeScanner::default(), config);
        session.select_folder("/data");
        for (path, size) in [("/data/a", 3), ("/data/b", 1), ("/data/c", 2)] {
            session.handle_event(ScanEvent::ItemDiscovered(item(path, size)));
        }
        let sizes: Vec<u64> = session.sorted_items().iter().map(|i| i.size).collect();
        assert_eq!(sizes, [1, 2, 3]);
        session.set_sort_order(SortOrder::Desc);
        let sizes: Vec<u64> = session.sorted_items().iter().map(|i| i.size).collect();
        assert_eq!(sizes, [3, 2, 1]);
    }

    #[test]
    fn errored_items_cannot_be_selected() {
        let mut broken = item("/data/locked", 0);
        broken.error = Some("access denied".into());
        let mut session = scanned_session(&[item("/data/a", 1), broken]);

        session.toggle_item("/data/locked", true);
        assert!(!session.is_marked("/data/locked"));

        session.toggle_select_all(true);
        assert_eq!(session.marked_count(), 1);
        assert_eq!(session.selection_state(), SelectionState::All);
    }

    #[test]
    fn selection_state_tracks_partial_selection() {
        let mut session = scanned_session(&[item("/data/a", 1), item("/data/b", 2)]);
        assert_eq!(session.selection_state(), SelectionState::None);
        session.toggle_item("/data/a", true);
        assert_eq!(session.selection_state(), SelectionState::Partial);
        session.toggle_item("/data/b", true);
        assert_eq!(session.selection_state(), SelectionState::All);
        session.toggle_select_all(false);
        assert_eq!(session.selection_state(), SelectionState::None);
    }

    #[test]
    fn selection_is_frozen_while_scanning() {
        let mut session = DiskLensSession::new(FakeScanner::default(), DiskLensConfig::default());
        session.select_folder("/data");
        session.handle_event(ScanEvent::ItemDiscovered(item("/data/a", 1)));
        session.toggle_item("/data/a", true);
        assert_eq!(session.marked_count(), 0);
    }

    #[test]
    fn delete_without_selection_sets_transient_error() {
        let mut session = scanned_session(&[item("/data/a", 1)]);
        session.delete_selected();
        assert_eq!(session.error(), Some(NOTHING_SELECTED));
        assert!(session.backend().deleted.is_empty());
        session.clear_transient_error();
        assert_eq!(session.error(), None);
    }

    #[test]
    fn delete_drops_only_removed_paths() {
        let mut session = scanned_session(&[
            item("/data/a", 1),
            item("/data/b", 2),
            item("/data/c", 3),
        ]);
        session.backend.keep_on_delete = vec!["/data/b".into()];
        session.toggle_item("/data/a", true);
        session.toggle_item("/data/b", true);
        session.delete_selected();

        let remaining: Vec<&str> = session.items().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(remaining, ["/data/b", "/data/c"]);
        assert_eq!(session.marked_count(), 0);
        assert!(!session.is_busy());
        assert_eq!(
            session.backend().deleted,
            [vec!["/data/a".to_string(), "/data/b".to_string()]]
        );
    }

    #[test]
    fn delete_failure_keeps_items_and_selection() {
        let mut session = scanned_session(&[item("/data/a", 1)]);
        session.backend.refuse_delete = true;
        session.toggle_item("/data/a", true);
        session.delete_selected();
        assert_eq!(session.items().len(), 1);
        assert!(session.is_marked("/data/a"));
        assert_eq!(session.error(), Some("Failed to delete items: read-only volume"));
    }

    #[test]
    fn json_events_drive_the_session() {
        let mut session = DiskLensSession::new(FakeScanner::default(), DiskLensConfig::default());
        session.select_folder("/data");
        session
            .handle_event_json(
                r#"{"event":"item-discovered","payload":{"path":"/data/x","name":"x","size":7,"isDirectory":false}}"#,
            )
            .unwrap();
        assert_eq!(session.items()[0].name, "x");
        assert!(session.handle_event_json(r#"{"event":"nope"}"#).is_err());
    }

    #[test]
    fn roots_and_cancel_are_forwarded() {
        let scanner = FakeScanner {
            roots: vec!["/".into(), "/mnt/usb".into()],
            ..FakeScanner::default()
        };
        let mut session = DiskLensSession::new(scanner, DiskLensConfig::default());
        assert_eq!(session.available_roots().unwrap(), ["/", "/mnt/usb"]);
        session.select_folder("/");
        session.cancel_scan();
        assert!(!session.is_busy());
        assert_eq!(session.backend().cancelled, 1);
    }
}
