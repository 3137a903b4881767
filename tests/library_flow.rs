use prompt_pilot::api::{self, Clipboard, TabOpener};
use prompt_pilot::core::config::Config;
use prompt_pilot::core::storage::{FileStorage, MemoryStorage};
use prompt_pilot::{FileFormat, ImportMode, LibraryStore, LlmPreferences, StoreError};
use std::cell::RefCell;

#[derive(Default)]
struct FakeClipboard(Option<String>);

impl Clipboard for FakeClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), StoreError> {
        self.0 = Some(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct FakeTabs(RefCell<Vec<String>>);

impl TabOpener for FakeTabs {
    fn open_url(&self, url: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().push(url.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn build_export_and_reimport_library() {
    let mut store = LibraryStore::load(MemoryStorage::new()).await.unwrap();
    let folder = store.create_folder("Research").await.unwrap();
    store
        .create_prompt(&folder, "Summarize, briefly", "Summarize \"this\":\n- point one\n- point two")
        .await
        .unwrap()
        .unwrap();

    for format in [FileFormat::Json, FileFormat::Csv] {
        let exported = api::export(store.document(), format).unwrap();

        let mut other = LibraryStore::load(MemoryStorage::new()).await.unwrap();
        other
            .import(&exported, format, ImportMode::Replace)
            .await
            .unwrap();

        let triples = |doc: &prompt_pilot::Document| -> Vec<(String, String, String)> {
            doc.folders
                .iter()
                .flat_map(|f| {
                    f.prompts
                        .iter()
                        .map(move |p| (f.name.clone(), p.title.clone(), p.content.clone()))
                })
                .collect()
        };
        assert_eq!(triples(store.document()), triples(other.document()), "{:?}", format);
    }
}

#[tokio::test]
async fn merge_never_removes_anything() {
    let mut store = LibraryStore::load(MemoryStorage::new()).await.unwrap();
    let before_folders = store.document().folders.len();
    let before_prompts = store.document().prompt_count();

    let csv = "Folder,Title,Content\n\u{1F4BB} code helper,code review,dup\nNew,Fresh,text\n";
    let report = store.import(csv, FileFormat::Csv, ImportMode::Merge).await.unwrap();

    assert_eq!(report.duplicates_skipped, 1);
    assert_eq!(store.document().folders.len(), before_folders + 1);
    assert_eq!(store.document().prompt_count(), before_prompts + 1);
}

#[tokio::test]
async fn library_and_preferences_share_one_file() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(tmp.path().join("storage.json"));

    let mut store = LibraryStore::load(storage.clone()).await.unwrap();
    let folder = store.create_folder("Daily").await.unwrap();
    let prompt_id = store
        .create_prompt(&folder, "Standup", "What did I do yesterday?")
        .await
        .unwrap()
        .unwrap();

    let mut prefs = LlmPreferences::load(storage.clone(), &Config::default())
        .await
        .unwrap();
    prefs.set_override(&prompt_id, "claude").await.unwrap();

    let store = LibraryStore::load(storage.clone()).await.unwrap();
    let prefs = LlmPreferences::load(storage, &Config::default()).await.unwrap();
    let (_, prompt) = store.find_prompt(&prompt_id).unwrap();

    let destination = prefs.resolve_destination(&prompt_id).to_string();
    let mut clipboard = FakeClipboard::default();
    let tabs = FakeTabs::default();
    let url = prefs
        .dispatch(prompt, &destination, &mut clipboard, &tabs)
        .unwrap();

    assert_eq!(url, "https://claude.ai/new");
    assert_eq!(clipboard.0.as_deref(), Some("What did I do yesterday?"));
    assert_eq!(tabs.0.borrow().len(), 1);
}

#[tokio::test]
async fn windows_line_endings_survive_csv_round_trip() {
    let json = r#"{ "folders": [ { "id": "w", "name": "Windows", "prompts": [
        { "id": "w1", "title": "Steps", "content": "step one\r\nstep two\rstep three" }
    ] } ] }"#;
    let mut store = LibraryStore::load(MemoryStorage::new()).await.unwrap();
    store
        .import(json, FileFormat::Json, ImportMode::Replace)
        .await
        .unwrap();
    let (_, prompt) = store.find_prompt("w1").unwrap();
    assert_eq!(prompt.content, "step one\nstep two\nstep three");

    let csv = api::export(store.document(), FileFormat::Csv).unwrap();
    let mut other = LibraryStore::load(MemoryStorage::new()).await.unwrap();
    other
        .import(&csv, FileFormat::Csv, ImportMode::Replace)
        .await
        .unwrap();
    assert_eq!(
        other.document().folders[0].prompts[0].content,
        "step one\nstep two\nstep three"
    );
}

#[tokio::test]
async fn deleting_a_prompt_lets_its_override_be_pruned() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(tmp.path().join("storage.json"));

    let mut store = LibraryStore::load(storage.clone()).await.unwrap();
    let folder = store.create_folder("Short lived").await.unwrap();
    let prompt_id = store
        .create_prompt(&folder, "Temp", "gone soon")
        .await
        .unwrap()
        .unwrap();
    let mut prefs = LlmPreferences::load(storage.clone(), &Config::default())
        .await
        .unwrap();
    prefs.set_override(&prompt_id, "gemini").await.unwrap();

    assert!(store.delete_folder(&folder).await.unwrap());
    assert_eq!(prefs.prune_overrides(store.document()).await.unwrap(), 1);

    let reloaded = LlmPreferences::load(storage, &Config::default()).await.unwrap();
    assert!(reloaded.overrides().is_empty());
}
