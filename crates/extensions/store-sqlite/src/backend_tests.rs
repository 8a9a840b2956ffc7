use super::*;

async fn store_with_site(url: &str) -> (SqliteSnapshotStore, TrackedWebsite) {
    let store = SqliteSnapshotStore::in_memory().await.unwrap();
    let site = store
        .insert_website(NewWebsite::new(url))
        .await
        .unwrap()
        .into_website();
    (store, site)
}

#[tokio::test]
async fn test_store_id() {
    let store = SqliteSnapshotStore::in_memory().await.unwrap();
    assert_eq!(store.id(), "sqlite");
    assert!(store.ping().await.is_ok());
}

#[tokio::test]
async fn test_insert_and_get_website() {
    let store = SqliteSnapshotStore::in_memory().await.unwrap();
    let outcome = store
        .insert_website(NewWebsite::new("https://example.com").with_name("Example"))
        .await
        .unwrap();
    let InsertOutcome::Created(site) = outcome else {
        panic!("expected a new website, got {:?}", outcome);
    };
    let fetched = store.get_website(&site.id).await.unwrap().unwrap();
    assert_eq!(fetched, site);
    assert_eq!(fetched.name.as_deref(), Some("Example"));
    assert!(fetched.is_active);
}

#[tokio::test]
async fn test_insert_duplicate_url_returns_existing() {
    let (store, site) = store_with_site("https://example.com").await;

    let outcome = store
        .insert_website(NewWebsite::new("https://example.com").with_name("Renamed"))
        .await
        .unwrap();
    let InsertOutcome::Exists(existing) = outcome else {
        panic!("expected the existing website, got {:?}", outcome);
    };
    assert_eq!(existing.id, site.id);
    assert_eq!(existing.name, None);
    assert_eq!(store.list_websites().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_website_nonexistent() {
    let store = SqliteSnapshotStore::in_memory().await.unwrap();
    assert!(store.get_website("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_urls_match_exactly() {
    let (store, site) = store_with_site("https://example.com/page").await;

    let outcome = store
        .insert_website(NewWebsite::new("https://example.com/page/"))
        .await
        .unwrap();
    let InsertOutcome::Created(other) = outcome else {
        panic!("expected a new website, got {:?}", outcome);
    };
    assert_ne!(other.id, site.id);
    assert_eq!(store.list_websites().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_websites_creation_order() {
    let store = SqliteSnapshotStore::in_memory().await.unwrap();
    for url in ["https://a.example", "https://b.example", "https://c.example"] {
        store.insert_website(NewWebsite::new(url)).await.unwrap();
    }

    let urls: Vec<String> = store
        .list_websites()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.website.url)
        .collect();
    assert_eq!(
        urls,
        vec!["https://a.example", "https://b.example", "https://c.example"]
    );
}

#[tokio::test]
async fn test_list_websites_latest_snapshot() {
    let (store, site) = store_with_site("https://example.com").await;
    assert!(store.list_websites().await.unwrap()[0].latest_snapshot.is_none());

    store
        .insert_snapshot(&site.id, "one".to_string())
        .await
        .unwrap();
    let second = store
        .insert_snapshot(&site.id, "two".to_string())
        .await
        .unwrap();

    let listed = store.list_websites().await.unwrap();
    assert_eq!(listed[0].latest_snapshot, Some(second.captured_at));
    assert_eq!(
        store.latest_capture_time(&site.id).await.unwrap(),
        Some(second.captured_at)
    );
}

#[tokio::test]
async fn test_insert_snapshot_roundtrip() {
    let (store, site) = store_with_site("https://example.com").await;
    let content = "<html>\n<body>héllo 👋</body>\n</html>".to_string();

    let snapshot = store
        .insert_snapshot(&site.id, content.clone())
        .await
        .unwrap();
    let fetched = store.get_snapshot(&snapshot.id).await.unwrap().unwrap();

    assert_eq!(fetched, snapshot);
    assert_eq!(fetched.content, content);
    assert_eq!(fetched.website_id, site.id);
}

#[tokio::test]
async fn test_insert_snapshot_unknown_website() {
    let store = SqliteSnapshotStore::in_memory().await.unwrap();
    let err = store
        .insert_snapshot("missing", "content".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::WebsiteNotFound(ref id) if id == "missing"));
    assert!(store.recent_snapshots("missing", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_recent_snapshots_newest_first_with_limit() {
    let (store, site) = store_with_site("https://example.com").await;
    for i in 0..5 {
        store
            .insert_snapshot(&site.id, format!("version {}", i))
            .await
            .unwrap();
    }

    let recent = store.recent_snapshots(&site.id, 2).await.unwrap();
    let contents: Vec<&str> = recent.iter().map(|s| s.content.as_str()).collect();
    assert_eq!(contents, vec!["version 4", "version 3"]);
    assert_eq!(store.recent_snapshots(&site.id, 50).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_recent_snapshots_scoped_to_website() {
    let (store, first) = store_with_site("https://a.example").await;
    let second = store
        .insert_website(NewWebsite::new("https://b.example"))
        .await
        .unwrap()
        .into_website();

    store
        .insert_snapshot(&first.id, "a".to_string())
        .await
        .unwrap();
    store
        .insert_snapshot(&second.id, "b".to_string())
        .await
        .unwrap();

    let recent = store.recent_snapshots(&first.id, 10).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].content, "a");
}

#[tokio::test]
async fn test_recent_excerpts() {
    let (store, site) = store_with_site("https://example.com").await;
    store
        .insert_snapshot(&site.id, "short".to_string())
        .await
        .unwrap();
    store
        .insert_snapshot(&site.id, "ééééé long content".to_string())
        .await
        .unwrap();

    let excerpts = store.recent_excerpts(&site.id, 10, 5).await.unwrap();
    assert_eq!(excerpts.len(), 2);
    assert_eq!(excerpts[0].excerpt, "ééééé");
    assert_eq!(excerpts[1].excerpt, "short");
}

#[tokio::test]
async fn test_get_snapshot_nonexistent() {
    let store = SqliteSnapshotStore::in_memory().await.unwrap();
    assert!(store.get_snapshot("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_backed_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("weblens.db");

    let (site_id, snapshot_id) = {
        let store = SqliteSnapshotStore::open(&path).await.unwrap();
        let site = store
            .insert_website(NewWebsite::new("https://example.com"))
            .await
            .unwrap()
            .into_website();
        let snapshot = store
            .insert_snapshot(&site.id, "<p>kept</p>".to_string())
            .await
            .unwrap();
        (site.id, snapshot.id)
    };

    let reopened = SqliteSnapshotStore::open(&path).await.unwrap();
    assert!(reopened.get_website(&site_id).await.unwrap().is_some());
    let snapshot = reopened.get_snapshot(&snapshot_id).await.unwrap().unwrap();
    assert_eq!(snapshot.content, "<p>kept</p>");
}
