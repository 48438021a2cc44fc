use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;

use super::*;
use crate::core::PREVIEW_DIR;
use crate::utils::path::normalize_path;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn setup() -> (TempDir, PathBuf, MirrorSynchronizer) {
    let temp = TempDir::new().unwrap();
    let root = normalize_path(temp.path());
    write(&root, "intro.md", "# Intro");
    write(&root, "guide/setup.md", "---\norder: 1\n---\n# Setup");
    let sync = MirrorSynchronizer::start(&root, SyncTiming::default()).unwrap();
    (temp, root, sync)
}

fn read_nav(sync: &MirrorSynchronizer) -> serde_json::Value {
    let path = sync.staging_root().join(PREVIEW_DIR).join(SIDEBAR_ARTIFACT);
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn event(kind: WatchEventKind, path: &Path, at: Instant) -> WatchEvent {
    WatchEvent::new(kind, path, at)
}

fn notify_event<P: AsRef<Path>>(kind: notify::EventKind, paths: &[P]) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.iter().map(|p| p.as_ref().to_path_buf()).collect(),
        attrs: Default::default(),
    }
}

#[test]
fn test_setup_mirrors_and_synthesizes() {
    let (_temp, _root, sync) = setup();
    let staging = sync.staging_root();

    assert!(staging.join("intro.md").is_file());
    assert!(staging.join("guide/setup.md").is_file());
    assert!(
        fs::read_to_string(staging.join("index.md"))
            .unwrap()
            .contains("<FullContents />")
    );
    assert!(
        fs::read_to_string(staging.join("guide/index.md"))
            .unwrap()
            .contains("<SubPages />")
    );

    let nav = read_nav(&sync);
    assert_eq!(nav[0]["text"], "Guide");
    assert_eq!(nav[0]["link"], "/guide/");
    assert_eq!(nav[1]["link"], "/intro");
    assert_eq!(sync.state(), RegenState::Idle);
}

/// Every staged file except derived artifacts, with its bytes.
fn snapshot(staging: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    jwalk::WalkDir::new(staging)
        .skip_hidden(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| !p.starts_with(staging.join(PREVIEW_DIR)))
        .map(|p| {
            let bytes = fs::read(&p).unwrap();
            (p.strip_prefix(staging).unwrap().to_path_buf(), bytes)
        })
        .collect()
}

#[test]
fn test_add_then_delete_round_trip() {
    let (_temp, root, mut sync) = setup();
    let t0 = Instant::now();
    let before = snapshot(sync.staging_root());
    assert!(before.contains_key(Path::new("guide/setup.md")));

    let live = write(&root, "new.md", "# New");
    sync.handle(&event(WatchEventKind::Added, &live, t0));
    assert!(sync.staging_root().join("new.md").is_file());

    fs::remove_file(&live).unwrap();
    sync.handle(&event(WatchEventKind::Deleted, &live, t0 + ms(50)));
    assert_eq!(snapshot(sync.staging_root()), before);

    assert!(sync.tick(t0 + ms(350)));
    let nav = read_nav(&sync);
    assert_eq!(nav.as_array().unwrap().len(), 2);
    assert_eq!(snapshot(sync.staging_root()), before);
}

#[test]
fn test_burst_regenerates_once() {
    let (_temp, root, mut sync) = setup();
    let t0 = Instant::now();

    for (i, name) in ["a.md", "b.md", "c.md"].into_iter().enumerate() {
        let live = write(&root, name, "");
        sync.handle(&event(WatchEventKind::Added, &live, t0 + ms(i as u64 * 100)));
    }

    assert!(!sync.tick(t0 + ms(450)));
    assert!(sync.tick(t0 + ms(500)));
    assert_eq!(sync.regenerations(), 1);
    assert_eq!(read_nav(&sync).as_array().unwrap().len(), 5);

    // cooldown: mirrored but not re-armed
    let live = write(&root, "d.md", "");
    sync.handle(&event(WatchEventKind::Added, &live, t0 + ms(900)));
    assert!(sync.staging_root().join("d.md").is_file());
    assert!(matches!(sync.state(), RegenState::Cooldown { .. }));
    assert!(!sync.tick(t0 + ms(1500)));
    assert_eq!(sync.state(), RegenState::Idle);
    assert_eq!(sync.regenerations(), 1);

    // after cooldown a new event schedules a second regeneration
    let live = write(&root, "e.md", "");
    sync.handle(&event(WatchEventKind::Added, &live, t0 + ms(1600)));
    assert!(sync.tick(t0 + ms(1900)));
    assert_eq!(sync.regenerations(), 2);
    assert_eq!(read_nav(&sync).as_array().unwrap().len(), 7);
}

#[test]
fn test_non_document_change_does_not_arm() {
    let (_temp, root, mut sync) = setup();
    let t0 = Instant::now();
    let live = write(&root, "logo.png", "png");

    sync.handle(&event(WatchEventKind::Changed, &live, t0));
    assert!(sync.staging_root().join("logo.png").is_file());
    assert_eq!(sync.state(), RegenState::Idle);

    let config = write(&root, ".docket", r#"{"sidebar":{"collapseFolders":true}}"#);
    sync.handle(&event(WatchEventKind::Changed, &config, t0));
    assert!(matches!(sync.state(), RegenState::Pending { .. }));
    assert!(sync.tick(t0 + ms(300)));
    assert_eq!(read_nav(&sync)[0]["collapsed"], true);
}

#[test]
fn test_directory_add_and_delete() {
    let (_temp, root, mut sync) = setup();
    let t0 = Instant::now();
    let dir = root.join("how-to");
    write(&root, "how-to/deploy.md", "# Deploy");

    sync.handle(&event(WatchEventKind::AddedDir, &dir, t0));
    let staged = sync.staging_root().join("how-to");
    assert!(staged.join("deploy.md").is_file());
    assert_eq!(
        fs::read_to_string(staged.join("index.md")).unwrap(),
        "# How To\n\n<SubPages />\n"
    );

    fs::remove_dir_all(&dir).unwrap();
    sync.handle(&event(WatchEventKind::DeletedDir, &dir, t0 + ms(10)));
    assert!(!staged.exists());
}

#[test]
fn test_ignored_paths_untouched() {
    let (_temp, root, mut sync) = setup();
    let live = write(&root, "node_modules/pkg/readme.md", "");

    sync.handle(&event(WatchEventKind::Added, &live, Instant::now()));
    assert!(!sync.staging_root().join("node_modules").exists());
    assert_eq!(sync.state(), RegenState::Idle);
}

#[test]
fn test_missing_source_is_not_fatal() {
    let (_temp, root, mut sync) = setup();
    let ghost = root.join("ghost.md");

    sync.handle(&event(WatchEventKind::Changed, &ghost, Instant::now()));
    assert!(!sync.staging_root().join("ghost.md").exists());
    assert!(matches!(sync.state(), RegenState::Pending { .. }));
}

#[test]
fn test_teardown_removes_staging() {
    let (_temp, _root, mut sync) = setup();
    let staging = sync.staging_root().to_path_buf();

    sync.teardown();
    assert!(!staging.exists());
    sync.teardown();
    drop(sync);
    assert!(!staging.exists());
}

#[test]
fn test_drop_removes_staging() {
    let (_temp, _root, sync) = setup();
    let staging = sync.staging_root().to_path_buf();
    drop(sync);
    assert!(!staging.exists());
}

#[test]
fn test_translate_create_and_remove() {
    use notify::event::{CreateKind, RemoveKind};

    let (_temp, root, sync) = setup();
    let at = Instant::now();
    let live = write(&root, "fresh.md", "");

    let events = translate(
        &notify_event(notify::EventKind::Create(CreateKind::Any), &[&live]),
        &sync,
        at,
    );
    assert_eq!(events, vec![event(WatchEventKind::Added, &live, at)]);

    // the mirror still has `guide` as a directory
    let guide = root.join("guide");
    fs::remove_dir_all(&guide).unwrap();
    let events = translate(
        &notify_event(notify::EventKind::Remove(RemoveKind::Any), &[&guide]),
        &sync,
        at,
    );
    assert_eq!(events, vec![event(WatchEventKind::DeletedDir, &guide, at)]);
}

#[test]
fn test_translate_rename_becomes_delete_and_add() {
    use notify::event::{ModifyKind, RenameMode};

    let (_temp, root, sync) = setup();
    let at = Instant::now();
    let from = root.join("intro.md");
    let to = root.join("overview.md");
    fs::rename(&from, &to).unwrap();

    let events = translate(
        &notify_event(
            notify::EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &[&from, &to],
        ),
        &sync,
        at,
    );
    assert_eq!(
        events,
        vec![
            event(WatchEventKind::Deleted, &from, at),
            event(WatchEventKind::Added, &to, at),
        ]
    );
}

#[test]
fn test_translate_drops_noise() {
    use notify::event::{MetadataKind, ModifyKind};

    let (_temp, root, sync) = setup();
    let at = Instant::now();
    let swap = write(&root, ".intro.md.swp", "");
    let page = root.join("intro.md");
    let cache = write(&root, ".cache/x.md", "");

    let data = notify::EventKind::Modify(ModifyKind::Data(notify::event::DataChange::Any));
    assert!(translate(&notify_event(data, &[&swap]), &sync, at).is_empty());
    assert!(translate(&notify_event(data, &[&cache]), &sync, at).is_empty());
    assert!(translate(&notify_event(data, &[root.as_path()]), &sync, at).is_empty());

    let meta = notify::EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any));
    assert!(translate(&notify_event(meta, &[&page]), &sync, at).is_empty());

    assert_eq!(
        translate(&notify_event(data, &[&page]), &sync, at),
        vec![event(WatchEventKind::Changed, &page, at)]
    );
}

#[cfg(unix)]
#[test]
fn test_setup_tolerates_symlinks() {
    let temp = TempDir::new().unwrap();
    let base = normalize_path(temp.path());
    let root = base.join("docs");
    write(&base, "elsewhere/common.md", "---\ntitle: Common\n---\n");
    write(&root, "intro.md", "# Intro");
    std::os::unix::fs::symlink(base.join("elsewhere"), root.join("shared")).unwrap();
    std::os::unix::fs::symlink(root.join("missing.md"), root.join("old.md")).unwrap();

    let sync = MirrorSynchronizer::start(&root, SyncTiming::default()).unwrap();
    let staging = sync.staging_root();

    assert!(staging.join("shared/common.md").is_file());
    assert!(staging.join("shared/index.md").is_file());
    assert!(!staging.join("old.md").exists());

    let nav = read_nav(&sync);
    assert_eq!(nav[1]["text"], "Shared");
    assert_eq!(nav[1]["items"][0]["text"], "Common");
}

#[test]
fn test_create_leaves_staging_empty() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "intro.md", "# Intro");

    let mut sync = MirrorSynchronizer::create(temp.path(), SyncTiming::default()).unwrap();
    assert_eq!(fs::read_dir(sync.staging_root()).unwrap().count(), 0);

    sync.populate().unwrap();
    assert!(sync.staging_root().join("intro.md").is_file());
}
