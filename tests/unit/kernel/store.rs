use super::*;
use crate::error::ErrorKind;
use crate::kernel::editor::{EditorAction, ReadRequestId, SaveTimerId, SessionPhase, SwitchStage};
use crate::kernel::FsOp;
use crate::models::{DirEntry, LoadState, NavigationEntry};
use std::time::{Duration, Instant};

fn new_store() -> Store {
    Store::new(AppState::default())
}

fn read_request(effects: &[Effect]) -> Option<ReadRequestId> {
    effects.iter().find_map(|e| match e {
        Effect::ReadFile { request, .. } => Some(*request),
        _ => None,
    })
}

fn read_paths(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::ReadFile { path, .. } => Some(path.clone()),
            _ => None,
        })
        .collect()
}

fn writes(effects: &[Effect]) -> Vec<(String, String, u64)> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::WriteFile {
                path,
                content,
                revision,
            } => Some((path.clone(), content.to_string(), *revision)),
            _ => None,
        })
        .collect()
}

fn scheduled_timer(effects: &[Effect]) -> Option<SaveTimerId> {
    effects.iter().find_map(|e| match e {
        Effect::ScheduleSave { timer, .. } => Some(*timer),
        _ => None,
    })
}

fn load_root(store: &mut Store, entries: Vec<DirEntry>) {
    let result = store.dispatch(Action::ExplorerLoadRoot);
    assert!(matches!(result.effects.as_slice(), [Effect::LoadDir(p)] if p.is_empty()));
    store.dispatch(Action::DirLoaded {
        path: String::new(),
        entries,
    });
}

fn open(store: &mut Store, path: &str, content: &str) {
    let result = store.dispatch(Action::OpenPath(path.to_string()));
    let request = read_request(&result.effects).expect("read issued");
    store.dispatch(Action::Editor(EditorAction::FileLoaded {
        request,
        path: path.to_string(),
        content: content.to_string(),
    }));
    assert_eq!(store.state().editor.current_path(), Some(path));
}

fn edit(store: &mut Store, text: &str) -> DispatchResult {
    store.dispatch(Action::Editor(EditorAction::AppendText(text.to_string())))
}

fn fire(store: &mut Store, timer: SaveTimerId) -> DispatchResult {
    store.dispatch(Action::Editor(EditorAction::SaveTimerFired { timer }))
}

fn saved(store: &mut Store, path: &str, revision: u64, result: Result<(), ShellError>) -> DispatchResult {
    store.dispatch(Action::Editor(EditorAction::FileSaved {
        path: path.to_string(),
        revision,
        result,
    }))
}

fn latest_kind(store: &Store) -> Option<ErrorKind> {
    store.state().notifications.latest().map(|n| n.kind)
}

// ==================== explorer ====================

#[test]
fn test_root_listing_keeps_backend_order() {
    let mut store = new_store();
    load_root(
        &mut store,
        vec![DirEntry::file("zeta.rs"), DirEntry::dir("alpha"), DirEntry::file("mid.md")],
    );
    assert_eq!(
        store.state().explorer.tree.children("").unwrap(),
        vec!["zeta.rs", "alpha", "mid.md"]
    );
    assert!(store.dispatch(Action::ExplorerLoadRoot).effects.is_empty());
}

#[test]
fn test_expand_fetches_once_and_collapse_keeps_cache() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::dir("src")]);

    let first = store.dispatch(Action::ExplorerExpand("src".into()));
    assert!(matches!(first.effects.as_slice(), [Effect::LoadDir(p)] if p == "src"));
    let concurrent = store.dispatch(Action::ExplorerExpand("src".into()));
    assert!(concurrent.effects.is_empty());
    assert!(!store.state().explorer.tree.is_expanded("src"));

    store.dispatch(Action::DirLoaded {
        path: "src".into(),
        entries: vec![DirEntry::file("main.rs"), DirEntry::file("lib.rs")],
    });
    assert!(store.state().explorer.tree.is_expanded("src"));
    let before: Vec<String> = store
        .state()
        .explorer
        .tree
        .children("src")
        .unwrap()
        .into_iter()
        .map(String::from)
        .collect();

    store.dispatch(Action::ExplorerCollapse("src".into()));
    assert!(!store.state().explorer.tree.is_expanded("src"));
    let again = store.dispatch(Action::ExplorerExpand("src".into()));
    assert!(again.effects.is_empty());
    assert!(store.state().explorer.tree.is_expanded("src"));
    assert_eq!(store.state().explorer.tree.children("src").unwrap(), before);
}

#[test]
fn test_collapse_while_loading_drops_expand_intent() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::dir("src")]);
    store.dispatch(Action::ExplorerExpand("src".into()));
    store.dispatch(Action::ExplorerCollapse("src".into()));
    store.dispatch(Action::DirLoaded {
        path: "src".into(),
        entries: vec![DirEntry::file("main.rs")],
    });
    assert!(!store.state().explorer.tree.is_expanded("src"));
    assert_eq!(store.state().explorer.tree.load_state("src"), Some(LoadState::Loaded));
}

#[test]
fn test_toggle_expands_then_collapses() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::dir("docs")]);
    store.dispatch(Action::ExplorerToggle("docs".into()));
    store.dispatch(Action::DirLoaded {
        path: "docs".into(),
        entries: vec![],
    });
    assert!(store.state().explorer.tree.is_expanded("docs"));
    store.dispatch(Action::ExplorerToggle("docs".into()));
    assert!(!store.state().explorer.tree.is_expanded("docs"));
}

#[test]
fn test_failed_listing_leaves_tree_unchanged() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::dir("src")]);
    store.dispatch(Action::ExplorerExpand("src".into()));

    let result = store.dispatch(Action::DirLoadError {
        path: "src".into(),
        error: ShellError::ApplicationError("not found".into()),
    });
    assert!(result.effects.is_empty());
    let tree = &store.state().explorer.tree;
    assert!(!tree.is_expanded("src"));
    assert_eq!(tree.load_state("src"), Some(LoadState::NotLoaded));
    assert!(tree.children("src").is_none());
    assert_eq!(latest_kind(&store), Some(ErrorKind::ApplicationError));

    // The user may retry.
    let retry = store.dispatch(Action::ExplorerExpand("src".into()));
    assert_eq!(retry.effects.len(), 1);
}

#[test]
fn test_expand_vanished_path_fails_soft() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::dir("src")]);
    let result = store.dispatch(Action::ExplorerExpand("gone".into()));
    assert!(result.effects.is_empty());
    assert_eq!(latest_kind(&store), Some(ErrorKind::StalePath));
}

#[test]
fn test_refresh_refetches_and_prunes() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::dir("src"), DirEntry::file("old.txt")]);
    let result = store.dispatch(Action::RunCommand(Command::RefreshExplorer));
    assert!(matches!(result.effects.as_slice(), [Effect::LoadDir(p)] if p.is_empty()));
    store.dispatch(Action::DirLoaded {
        path: String::new(),
        entries: vec![DirEntry::dir("src"), DirEntry::file("new.txt")],
    });
    let tree = &store.state().explorer.tree;
    assert!(!tree.contains("old.txt"));
    assert!(tree.contains("new.txt"));
}

#[test]
fn test_collapse_all_command() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::dir("a"), DirEntry::dir("b")]);
    for dir in ["a", "b"] {
        store.dispatch(Action::ExplorerExpand(dir.into()));
        store.dispatch(Action::DirLoaded {
            path: dir.into(),
            entries: vec![],
        });
    }
    let result = store.dispatch(Action::RunCommand(Command::CollapseAll));
    assert!(result.state_changed);
    assert_eq!(store.state().explorer.tree.expanded_paths().count(), 0);
}

#[test]
fn test_create_refused_until_parent_listing_is_loaded() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::dir("src")]);
    assert_eq!(
        store.state().explorer.tree.load_state("src"),
        Some(LoadState::NotLoaded)
    );

    let result = store.dispatch(Action::ExplorerCreateFile {
        parent: "src".into(),
        name: "main.rs".into(),
    });
    assert!(result.effects.is_empty());
    assert_eq!(latest_kind(&store), Some(ErrorKind::ApplicationError));

    store.dispatch(Action::ExplorerExpand("src".into()));
    store.dispatch(Action::DirLoaded {
        path: "src".into(),
        entries: vec![DirEntry::file("main.rs")],
    });
    let dup = store.dispatch(Action::ExplorerCreateFile {
        parent: "src".into(),
        name: "main.rs".into(),
    });
    assert!(dup.effects.is_empty());

    let fresh = store.dispatch(Action::ExplorerCreateFile {
        parent: "src".into(),
        name: "lib.rs".into(),
    });
    assert!(matches!(fresh.effects.as_slice(), [Effect::CreateFile(p)] if p == "src/lib.rs"));
}

#[test]
fn test_create_file_round_trip() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::dir("src")]);
    let result = store.dispatch(Action::ExplorerCreateFile {
        parent: String::new(),
        name: "notes.md".into(),
    });
    assert!(matches!(result.effects.as_slice(), [Effect::CreateFile(p)] if p == "notes.md"));

    store.dispatch(Action::PathCreated {
        path: "notes.md".into(),
    });
    assert_eq!(
        store.state().explorer.tree.children("").unwrap(),
        vec!["src", "notes.md"]
    );

    let dup = store.dispatch(Action::ExplorerCreateFile {
        parent: String::new(),
        name: "notes.md".into(),
    });
    assert!(dup.effects.is_empty());
    assert_eq!(latest_kind(&store), Some(ErrorKind::ApplicationError));

    let bad = store.dispatch(Action::ExplorerCreateFile {
        parent: String::new(),
        name: "a/b".into(),
    });
    assert!(bad.effects.is_empty());
}

#[test]
fn test_rename_rekeys_tree_open_file_and_history() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::dir("src"), DirEntry::file("README.md")]);
    store.dispatch(Action::ExplorerExpand("src".into()));
    store.dispatch(Action::DirLoaded {
        path: "src".into(),
        entries: vec![DirEntry::file("main.rs")],
    });
    open(&mut store, "src/main.rs", "fn main() {}");
    open(&mut store, "README.md", "# hi");
    open(&mut store, "src/main.rs", "fn main() {}");

    let result = store.dispatch(Action::ExplorerRename {
        from: "src".into(),
        new_name: "lib".into(),
    });
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::RenamePath { from, to }] if from == "src" && to == "lib"
    ));
    store.dispatch(Action::PathRenamed {
        from: "src".into(),
        to: "lib".into(),
    });

    let state = store.state();
    assert_eq!(state.editor.current_path(), Some("lib/main.rs"));
    assert!(state.explorer.tree.contains("lib/main.rs"));
    assert!(state.explorer.tree.is_expanded("lib"));
    let history: Vec<_> = state.history.entries().map(|e| e.file_path.as_str()).collect();
    assert_eq!(history, vec!["lib/main.rs", "README.md"]);
}

#[test]
fn test_rename_refused_while_open_file_unsaved() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::file("a.txt")]);
    open(&mut store, "a.txt", "1");
    edit(&mut store, "2");
    let result = store.dispatch(Action::ExplorerRename {
        from: "a.txt".into(),
        new_name: "b.txt".into(),
    });
    assert!(result.effects.is_empty());
    assert_eq!(latest_kind(&store), Some(ErrorKind::ApplicationError));
}

#[test]
fn test_delete_open_file_closes_session_and_forgets_history() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::file("a.txt"), DirEntry::file("b.txt")]);
    open(&mut store, "a.txt", "a");
    open(&mut store, "b.txt", "b");
    assert_eq!(store.state().history.len(), 1);
    edit(&mut store, "!");

    let request = store.dispatch(Action::ExplorerDelete("b.txt".into()));
    assert!(matches!(request.effects.as_slice(), [Effect::DeletePath(p)] if p == "b.txt"));
    let result = store.dispatch(Action::PathDeleted {
        path: "b.txt".into(),
    });
    assert!(result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::CancelSave { .. })));
    assert_eq!(store.state().editor.phase(), SessionPhase::Empty);
    assert_eq!(store.state().editor.live_buffers(), 0);
    assert!(!store.state().explorer.tree.contains("b.txt"));

    store.dispatch(Action::PathDeleted {
        path: "a.txt".into(),
    });
    assert!(store.state().history.is_empty());
}

#[test]
fn test_fs_error_is_reported() {
    let mut store = new_store();
    store.dispatch(Action::FsOpError {
        op: FsOp::Delete,
        path: "a.txt".into(),
        error: ShellError::NetworkUnavailable("refused".into()),
    });
    assert_eq!(latest_kind(&store), Some(ErrorKind::NetworkUnavailable));
}

// ==================== persistence ====================

#[test]
fn test_debounce_coalesces_into_one_write_with_latest_content() {
    let mut store = new_store();
    open(&mut store, "a.txt", "1");

    let mut timers = Vec::new();
    for ch in ["2", "3", "4"] {
        let result = edit(&mut store, ch);
        assert!(writes(&result.effects).is_empty());
        timers.push(scheduled_timer(&result.effects).unwrap());
    }
    assert!(store.state().editor.is_dirty());

    for stale in &timers[..2] {
        assert!(fire(&mut store, *stale).effects.is_empty());
    }
    let result = fire(&mut store, timers[2]);
    assert_eq!(writes(&result.effects), vec![("a.txt".to_string(), "1234".to_string(), 3)]);

    saved(&mut store, "a.txt", 3, Ok(()));
    assert!(!store.state().editor.is_dirty());
}

#[test]
fn test_each_edit_cancels_previous_timer() {
    let mut store = new_store();
    open(&mut store, "a.txt", "");
    let first = scheduled_timer(&edit(&mut store, "x").effects).unwrap();
    let second = edit(&mut store, "y");
    assert!(second
        .effects
        .iter()
        .any(|e| matches!(e, Effect::CancelSave { timer } if *timer == first)));
}

#[test]
fn test_single_flight_write_per_path() {
    let mut store = new_store();
    open(&mut store, "a.txt", "");

    let t1 = scheduled_timer(&edit(&mut store, "a").effects).unwrap();
    assert_eq!(writes(&fire(&mut store, t1).effects).len(), 1);

    let t2 = scheduled_timer(&edit(&mut store, "b").effects).unwrap();
    assert!(fire(&mut store, t2).effects.is_empty());

    let after_first = saved(&mut store, "a.txt", 1, Ok(()));
    assert_eq!(
        writes(&after_first.effects),
        vec![("a.txt".to_string(), "ab".to_string(), 2)]
    );
    assert!(store.state().editor.is_dirty());

    saved(&mut store, "a.txt", 2, Ok(()));
    assert!(!store.state().editor.is_dirty());
}

#[test]
fn test_edit_after_snapshot_keeps_file_dirty() {
    let mut store = new_store();
    open(&mut store, "a.txt", "");
    let t1 = scheduled_timer(&edit(&mut store, "a").effects).unwrap();
    fire(&mut store, t1);
    edit(&mut store, "b");
    saved(&mut store, "a.txt", 1, Ok(()));
    assert!(store.state().editor.is_dirty());
}

#[test]
fn test_failed_save_stays_dirty_without_retry() {
    let mut store = new_store();
    open(&mut store, "a.txt", "1");
    let timer = scheduled_timer(&edit(&mut store, "2").effects).unwrap();
    fire(&mut store, timer);

    let result = saved(
        &mut store,
        "a.txt",
        1,
        Err(ShellError::NetworkUnavailable("refused".into())),
    );
    assert!(result.effects.is_empty());
    assert!(store.state().editor.is_dirty());
    assert!(store.state().editor.scheduler().pending().is_none());
    assert_eq!(latest_kind(&store), Some(ErrorKind::NetworkUnavailable));

    // The next edit schedules again.
    assert!(scheduled_timer(&edit(&mut store, "3").effects).is_some());
}

#[test]
fn test_explicit_save_flushes_immediately() {
    let mut store = new_store();
    open(&mut store, "a.txt", "1");
    let timer = scheduled_timer(&edit(&mut store, "2").effects).unwrap();

    let result = store.dispatch(Action::RunCommand(Command::Save));
    assert!(matches!(result.effects.first(), Some(Effect::CancelSave { timer: t }) if *t == timer));
    assert_eq!(writes(&result.effects), vec![("a.txt".to_string(), "12".to_string(), 1)]);

    assert!(store
        .dispatch(Action::RunCommand(Command::Save))
        .effects
        .is_empty());
}

// ==================== session bridge ====================

#[test]
fn test_switch_flushes_departing_file_before_reading_target() {
    let mut store = new_store();
    open(&mut store, "a.txt", "1");
    edit(&mut store, "2");

    let result = store.dispatch(Action::OpenPath("b.txt".into()));
    assert_eq!(writes(&result.effects), vec![("a.txt".to_string(), "12".to_string(), 1)]);
    assert!(read_paths(&result.effects).is_empty());
    assert_eq!(store.state().editor.phase(), SessionPhase::Switching);
    assert_eq!(store.state().editor.live_buffers(), 1);

    let after_flush = saved(&mut store, "a.txt", 1, Ok(()));
    assert_eq!(read_paths(&after_flush.effects), vec!["b.txt".to_string()]);
    let request = read_request(&after_flush.effects).unwrap();

    store.dispatch(Action::Editor(EditorAction::FileLoaded {
        request,
        path: "b.txt".into(),
        content: "b".into(),
    }));
    let state = store.state();
    assert_eq!(state.editor.current_path(), Some("b.txt"));
    assert_eq!(state.editor.text().as_deref(), Some("b"));
    assert!(!state.editor.is_dirty());
    assert_eq!(state.editor.live_buffers(), 1);
    assert_eq!(
        state.history.entries().cloned().collect::<Vec<_>>(),
        vec![NavigationEntry::new("a.txt", 0)]
    );
}

#[test]
fn test_history_entry_captures_departing_cursor_line() {
    let mut store = new_store();
    open(&mut store, "a.txt", "one\ntwo\nthree");
    store.dispatch(Action::Editor(EditorAction::SetCursorLine(2)));
    open(&mut store, "b.txt", "b");
    assert_eq!(store.state().history.current(), Some(&NavigationEntry::new("a.txt", 2)));
}

#[test]
fn test_reopen_while_old_write_in_flight_keeps_new_edits() {
    let mut store = new_store();
    open(&mut store, "a.txt", "1");
    let timer = scheduled_timer(&edit(&mut store, "2").effects).unwrap();
    assert_eq!(writes(&fire(&mut store, timer).effects).len(), 1);

    store.dispatch(Action::RunCommand(Command::CloseFile));
    open(&mut store, "a.txt", "12");
    assert!(!store.state().editor.is_dirty());

    let timer = scheduled_timer(&edit(&mut store, "3").effects).unwrap();
    let revision = store.state().editor.open_file().unwrap().revision;
    // Parked behind the first buffer's write.
    assert!(writes(&fire(&mut store, timer).effects).is_empty());

    let promoted = saved(&mut store, "a.txt", 1, Ok(()));
    assert_eq!(
        writes(&promoted.effects),
        vec![("a.txt".to_string(), "123".to_string(), revision)]
    );
    assert!(store.state().editor.is_dirty());

    saved(&mut store, "a.txt", revision, Ok(()));
    assert!(!store.state().editor.is_dirty());
}

#[test]
fn test_flush_joins_write_already_in_flight() {
    let mut store = new_store();
    open(&mut store, "a.txt", "");
    let timer = scheduled_timer(&edit(&mut store, "x").effects).unwrap();
    fire(&mut store, timer);

    let result = store.dispatch(Action::OpenPath("b.txt".into()));
    assert!(writes(&result.effects).is_empty());
    assert!(read_paths(&result.effects).is_empty());
    assert!(matches!(
        store.state().editor.switch().map(|s| s.stage),
        Some(SwitchStage::Flushing { revision: 1 })
    ));

    let after = saved(&mut store, "a.txt", 1, Ok(()));
    assert_eq!(read_paths(&after.effects), vec!["b.txt".to_string()]);
}

#[test]
fn test_failed_flush_aborts_switch() {
    let mut store = new_store();
    open(&mut store, "a.txt", "1");
    edit(&mut store, "2");
    store.dispatch(Action::OpenPath("b.txt".into()));

    let result = saved(
        &mut store,
        "a.txt",
        1,
        Err(ShellError::ApplicationError("disk full".into())),
    );
    assert!(read_paths(&result.effects).is_empty());
    let state = store.state();
    assert_eq!(state.editor.phase(), SessionPhase::Open);
    assert_eq!(state.editor.current_path(), Some("a.txt"));
    assert!(state.editor.is_dirty());
    assert!(state.history.is_empty());
}

#[test]
fn test_failed_read_leaves_session_untouched() {
    let mut store = new_store();
    open(&mut store, "a.txt", "a");
    let result = store.dispatch(Action::OpenPath("missing.txt".into()));
    let request = read_request(&result.effects).unwrap();

    store.dispatch(Action::Editor(EditorAction::FileLoadError {
        request,
        path: "missing.txt".into(),
        error: ShellError::ApplicationError("not found".into()),
    }));
    let state = store.state();
    assert_eq!(state.editor.phase(), SessionPhase::Open);
    assert_eq!(state.editor.current_path(), Some("a.txt"));
    assert_eq!(state.editor.text().as_deref(), Some("a"));
    assert!(state.history.is_empty());
    assert_eq!(latest_kind(&store), Some(ErrorKind::ApplicationError));
}

#[test]
fn test_reentrant_open_of_same_target_is_coalesced() {
    let mut store = new_store();
    let first = store.dispatch(Action::OpenPath("a.txt".into()));
    assert_eq!(read_paths(&first.effects).len(), 1);
    let second = store.dispatch(Action::OpenPath("a.txt".into()));
    assert!(second.effects.is_empty());
}

#[test]
fn test_open_different_target_while_loading_retargets() {
    let mut store = new_store();
    let first = store.dispatch(Action::OpenPath("a.txt".into()));
    let stale = read_request(&first.effects).unwrap();
    let second = store.dispatch(Action::OpenPath("b.txt".into()));
    let live = read_request(&second.effects).unwrap();

    let ignored = store.dispatch(Action::Editor(EditorAction::FileLoaded {
        request: stale,
        path: "a.txt".into(),
        content: "a".into(),
    }));
    assert!(!ignored.state_changed);
    assert_eq!(store.state().editor.phase(), SessionPhase::Switching);

    store.dispatch(Action::Editor(EditorAction::FileLoaded {
        request: live,
        path: "b.txt".into(),
        content: "b".into(),
    }));
    assert_eq!(store.state().editor.current_path(), Some("b.txt"));
    assert_eq!(store.state().editor.live_buffers(), 1);
}

#[test]
fn test_opening_current_file_is_noop() {
    let mut store = new_store();
    open(&mut store, "a.txt", "a");
    let result = store.dispatch(Action::OpenPath("./a.txt".into()));
    assert!(result.effects.is_empty());
    assert_eq!(store.state().editor.phase(), SessionPhase::Open);
}

#[test]
fn test_opening_directory_is_rejected() {
    let mut store = new_store();
    load_root(&mut store, vec![DirEntry::dir("src")]);
    let result = store.dispatch(Action::OpenPath("src".into()));
    assert!(result.effects.is_empty());
    assert_eq!(latest_kind(&store), Some(ErrorKind::ApplicationError));
}

#[test]
fn test_edits_ignored_while_switching() {
    let mut store = new_store();
    open(&mut store, "a.txt", "a");
    store.dispatch(Action::OpenPath("b.txt".into()));
    let result = edit(&mut store, "zzz");
    assert!(result.effects.is_empty());
    assert_eq!(store.state().editor.text().as_deref(), Some("a"));
}

#[test]
fn test_close_discards_pending_save() {
    let mut store = new_store();
    open(&mut store, "a.txt", "1");
    let timer = scheduled_timer(&edit(&mut store, "2").effects).unwrap();

    let result = store.dispatch(Action::RunCommand(Command::CloseFile));
    assert!(matches!(result.effects.as_slice(), [Effect::CancelSave { timer: t }] if *t == timer));
    assert_eq!(store.state().editor.phase(), SessionPhase::Empty);
    assert_eq!(store.state().editor.live_buffers(), 0);
    assert!(fire(&mut store, timer).effects.is_empty());
}

#[test]
fn test_save_timer_bound_to_departed_file_does_not_write_new_file() {
    let mut store = new_store();
    open(&mut store, "a.txt", "1");
    let timer = scheduled_timer(&edit(&mut store, "2").effects).unwrap();
    store.dispatch(Action::OpenPath("b.txt".into()));
    let result = fire(&mut store, timer);
    assert!(writes(&result.effects).is_empty());
}

// ==================== navigation ====================

fn store_with_history() -> Store {
    let mut store = new_store();
    open(&mut store, "a.txt", "a\na");
    store.dispatch(Action::Editor(EditorAction::SetCursorLine(1)));
    open(&mut store, "b.txt", "b");
    open(&mut store, "c.txt", "c");
    store
}

fn finish_read(store: &mut Store, effects: &[Effect], content: &str) {
    let request = read_request(effects).unwrap();
    let path = read_paths(effects).remove(0);
    store.dispatch(Action::Editor(EditorAction::FileLoaded {
        request,
        path,
        content: content.to_string(),
    }));
}

#[test]
fn test_back_and_forward_reopen_without_pushing() {
    let mut store = store_with_history();
    assert_eq!(store.state().history.len(), 2);
    assert_eq!(store.state().history.cursor(), Some(1));

    let back = store.dispatch(Action::RunCommand(Command::NavigateBack));
    assert_eq!(read_paths(&back.effects), vec!["a.txt".to_string()]);
    finish_read(&mut store, &back.effects, "a\na");
    assert_eq!(store.state().editor.current_path(), Some("a.txt"));
    assert_eq!(store.state().editor.cursor_line(), Some(1));
    assert_eq!(store.state().history.len(), 2);
    assert_eq!(store.state().history.cursor(), Some(0));

    let forward = store.dispatch(Action::RunCommand(Command::NavigateForward));
    assert_eq!(read_paths(&forward.effects), vec!["b.txt".to_string()]);
    finish_read(&mut store, &forward.effects, "b");
    assert_eq!(store.state().history.len(), 2);
    assert_eq!(store.state().history.cursor(), Some(1));
}

#[test]
fn test_new_open_after_back_records_the_left_file_again() {
    let mut store = store_with_history();
    let back = store.dispatch(Action::RunCommand(Command::NavigateBack));
    finish_read(&mut store, &back.effects, "a\na");

    open(&mut store, "d.txt", "d");
    let paths: Vec<String> = store
        .state()
        .history
        .entries()
        .map(|e| e.file_path.clone())
        .collect();
    assert_eq!(paths, vec!["a.txt".to_string(), "a.txt".to_string()]);
    assert!(!store.state().history.can_go_forward());
}

#[test]
fn test_back_at_head_reports_no_history() {
    let mut store = store_with_history();
    let back = store.dispatch(Action::RunCommand(Command::NavigateBack));
    finish_read(&mut store, &back.effects, "a\na");

    let result = store.dispatch(Action::RunCommand(Command::NavigateBack));
    assert!(result.effects.is_empty());
    assert_eq!(latest_kind(&store), Some(ErrorKind::NoHistory));
    assert_eq!(store.state().editor.current_path(), Some("a.txt"));
}

#[test]
fn test_failed_history_open_restores_cursor() {
    let mut store = store_with_history();
    let back = store.dispatch(Action::RunCommand(Command::NavigateBack));
    assert_eq!(store.state().history.cursor(), Some(0));
    let request = read_request(&back.effects).unwrap();
    store.dispatch(Action::Editor(EditorAction::FileLoadError {
        request,
        path: "a.txt".into(),
        error: ShellError::NetworkUnavailable("refused".into()),
    }));
    assert_eq!(store.state().history.cursor(), Some(1));
    assert_eq!(store.state().editor.current_path(), Some("c.txt"));
}

// ==================== notifications ====================

#[test]
fn test_notifications_dismiss_and_expire() {
    let mut store = new_store();
    store.dispatch(Action::RunCommand(Command::NavigateBack));
    store.dispatch(Action::RunCommand(Command::NavigateForward));
    assert_eq!(store.state().notifications.items().len(), 2);

    let id = store.state().notifications.items()[0].id;
    assert!(store.dispatch(Action::DismissNotification(id)).state_changed);
    assert_eq!(store.state().notifications.items().len(), 1);

    let later = Instant::now() + Duration::from_secs(3600);
    assert!(store.dispatch(Action::Tick { now: later }).state_changed);
    assert!(store.state().notifications.is_empty());
}
