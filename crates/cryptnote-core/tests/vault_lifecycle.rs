use std::fs;
use std::path::Path;

use cryptnote_core::crypto::{codec, derive_key};
use cryptnote_core::editor::{run_editor, EditOutcome, EditorEvent, InputSource, NullRenderer};
use cryptnote_core::{
    CredentialStore, CryptnoteError, EditMode, FileNoteRepository, KdfParams, NoteStore,
    TextBuffer, Vault, VaultConfig,
};
use tempfile::tempdir;

const FAST_KDF: KdfParams = KdfParams {
    memory_kib: 8,
    iterations: 1,
    parallelism: 1,
};

fn config(root: &Path) -> VaultConfig {
    VaultConfig::new(root).with_kdf(FAST_KDF)
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

struct Keys(Vec<EditorEvent>);

impl InputSource for Keys {
    fn next_event(&mut self) -> cryptnote_core::Result<Option<EditorEvent>> {
        Ok(if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        })
    }
}

#[test]
fn test_end_to_end_scenario() {
    let dir = tempdir().expect("tempdir should be created");
    let config = config(dir.path());
    let credentials = CredentialStore::new(config.credential_path(), FAST_KDF);
    let repo = FileNoteRepository::from_config(&config);

    let (_, key) = credentials
        .initialize("correctpw1")
        .expect("initialize should succeed");
    let id = repo
        .save(&key, "T", &lines(&["hello", "world"]))
        .expect("save should succeed");

    let entry = repo.load(&id, &key).expect("load should succeed");
    assert_eq!(entry.title, "T");
    assert_eq!(entry.body, lines(&["hello", "world"]));

    let credential = credentials.load().expect("credential should load");
    let (matched, wrong_key) = credentials
        .verify("wrongpw", &credential)
        .expect("verify should run");
    assert!(!matched);

    let blob = repo.read_raw(&id).expect("raw read should succeed");
    assert!(matches!(
        codec::open(&blob, &wrong_key),
        Err(CryptnoteError::Authentication(_))
    ));
}

#[test]
fn test_rotation_happy_path_reports_all_entries() {
    let dir = tempdir().expect("tempdir should be created");
    let vault = Vault::open(config(dir.path())).expect("vault should open");
    let mut session = vault
        .setup("correctpw1", "correctpw1")
        .expect("setup should succeed");

    let ids: Vec<_> = (0..5)
        .map(|i| {
            session
                .write(&format!("note {}", i), lines(&["body", &i.to_string()]))
                .expect("write should succeed")
        })
        .collect();

    let report = session
        .change_password("correctpw1", "rotated-pw", "rotated-pw")
        .expect("rotation should succeed");
    assert_eq!((report.succeeded, report.failed), (5, 0));
    drop(session);

    let session = vault.unlock("rotated-pw").expect("new password should unlock");
    for (i, id) in ids.iter().enumerate() {
        let entry = session.read(id).expect("entry should open under new key");
        assert_eq!(entry.title, format!("note {}", i));
    }
}

#[test]
fn test_rotation_partial_failure_leaves_corrupted_entry_untouched() {
    let dir = tempdir().expect("tempdir should be created");
    let vault = Vault::open(config(dir.path())).expect("vault should open");
    let mut session = vault
        .setup("correctpw1", "correctpw1")
        .expect("setup should succeed");

    let good = session.write("good", lines(&["a"])).expect("write");
    let also_good = session.write("also good", lines(&["b"])).expect("write");
    let bad = session.write("bad", lines(&["c"])).expect("write");

    let path = vault.store().path_for(&bad);
    let mut corrupted = fs::read(&path).expect("read should succeed");
    corrupted[20] ^= 0x80;
    fs::write(&path, &corrupted).expect("write should succeed");

    let report = session
        .change_password("correctpw1", "rotated-pw", "rotated-pw")
        .expect("rotation should complete");

    assert!(report.failed >= 1);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed_ids, vec![bad.clone()]);
    assert_eq!(fs::read(&path).expect("read should succeed"), corrupted);
    assert_eq!(session.read(&good).expect("good entry").title, "good");
    assert_eq!(session.read(&also_good).expect("good entry").title, "also good");
}

#[test]
fn test_import_between_vaults_sharing_a_key() {
    let dir = tempdir().expect("tempdir should be created");
    let vault = Vault::open(config(&dir.path().join("home"))).expect("vault should open");
    let session = vault
        .setup("correctpw1", "correctpw1")
        .expect("setup should succeed");
    let id = session
        .write("portable", lines(&["travels well"]))
        .expect("write should succeed");

    let exported = dir.path().join("export.cnote");
    fs::copy(vault.store().path_for(&id), &exported).expect("copy should succeed");

    let imported = session.import(&exported).expect("import should succeed");
    assert!(imported.as_str().starts_with("imported_"));
    assert!(imported.as_str().ends_with("_export"));
    assert_eq!(
        session.read(&imported).expect("imported entry").body,
        lines(&["travels well"])
    );

    let foreign_key = derive_key("otherpw12", &[7u8; 16], &FAST_KDF).expect("derive");
    let foreign = dir.path().join("foreign.cnote");
    fs::write(&foreign, codec::seal(b"not yours", &foreign_key).expect("seal"))
        .expect("write should succeed");
    assert!(matches!(
        session.import(&foreign),
        Err(CryptnoteError::Authentication(_))
    ));
    assert_eq!(session.list().expect("list").len(), 2);
}

#[test]
fn test_editor_session_feeds_entry_flow() {
    let dir = tempdir().expect("tempdir should be created");
    let vault = Vault::open(config(dir.path())).expect("vault should open");
    let session = vault
        .setup("correctpw1", "correctpw1")
        .expect("setup should succeed");
    let id = session.write("log", lines(&["day one"])).expect("write");

    let (_, buffer) = session
        .begin_edit(&id, EditMode::Append)
        .expect("edit should start");
    let mut keys = Keys("day two".chars().map(EditorEvent::Char).collect());
    let outcome = run_editor(buffer, &mut keys, &mut NullRenderer).expect("editor should run");

    let EditOutcome::Finished(body) = outcome else {
        panic!("editor should finish");
    };
    session.edit(&id, "", body).expect("edit should save");

    let entry = session.read(&id).expect("entry should load");
    assert_eq!(entry.title, "log");
    assert_eq!(
        entry.body,
        lines(&["day one", "", "--- APPENDED CONTENT ---", "day two"])
    );

    let mut cancel = Keys(vec![EditorEvent::Char('x'), EditorEvent::Cancel]);
    let outcome = run_editor(TextBuffer::new(), &mut cancel, &mut NullRenderer)
        .expect("editor should run");
    assert_eq!(outcome, EditOutcome::Cancelled);
}
