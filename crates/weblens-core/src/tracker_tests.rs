use super::*;
use crate::memory_store::MemorySnapshotStore;

fn tracker() -> Tracker {
    Tracker::new(Arc::new(MemorySnapshotStore::new()))
}

async fn tracked_site(tracker: &Tracker, url: &str) -> TrackedWebsite {
    match tracker.track_website(Some(url), None).await.unwrap() {
        Tracked::Created(w) | Tracked::AlreadyTracked(w) => w,
    }
}

#[tokio::test]
async fn test_track_website_created() {
    let tracker = tracker();
    let tracked = tracker
        .track_website(Some("https://example.com"), Some("Example".to_string()))
        .await
        .unwrap();
    match tracked {
        Tracked::Created(w) => {
            assert_eq!(w.url, "https://example.com");
            assert_eq!(w.name.as_deref(), Some("Example"));
            assert!(w.is_active);
        }
        other => panic!("expected Created, got {:?}", other),
    }
}

#[tokio::test]
async fn test_track_website_twice_returns_existing_id() {
    let tracker = tracker();
    let first = tracked_site(&tracker, "https://example.com").await;
    let second = tracker
        .track_website(Some("https://example.com"), None)
        .await
        .unwrap();
    assert_eq!(second, Tracked::AlreadyTracked(first.clone()));
    assert_eq!(tracker.list_websites().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_track_website_requires_url() {
    let tracker = tracker();
    for url in [None, Some(""), Some("   ")] {
        let err = tracker.track_website(url, None).await.unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ref m) if m == "URL is required"));
    }
}

#[tokio::test]
async fn test_capture_requires_content() {
    let tracker = tracker();
    let site = tracked_site(&tracker, "https://example.com").await;
    for content in [None, Some(String::new())] {
        let err = tracker.capture(&site.id, content).await.unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ref m) if m == "Content is required"));
    }
}

#[tokio::test]
async fn test_capture_unknown_website_rejected_without_write() {
    let tracker = tracker();
    let err = tracker
        .capture("no-such-site", Some("<html></html>".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(ref m) if m == "Website not found"));
    assert!(tracker
        .store()
        .recent_snapshots("no-such-site", 10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_capture_receipt_content_length_utf16() {
    let tracker = tracker();
    let site = tracked_site(&tracker, "https://example.com").await;
    let receipt = tracker
        .capture(&site.id, Some("a😀".to_string()))
        .await
        .unwrap();
    assert_eq!(receipt.content_length, 3);
    assert_eq!(receipt.website_id, site.id);
}

#[tokio::test]
async fn test_capture_by_url_registers_once() {
    let tracker = tracker();
    let first = tracker
        .capture_by_url(Some("https://example.com"), Some("v1".to_string()))
        .await
        .unwrap();
    let second = tracker
        .capture_by_url(Some("https://example.com"), Some("v2".to_string()))
        .await
        .unwrap();
    assert_eq!(first.website_id, second.website_id);
    assert_eq!(tracker.list_websites().await.unwrap().len(), 1);
    assert_eq!(tracker.history(&first.website_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_capture_by_url_validates_before_registering() {
    let tracker = tracker();
    let err = tracker
        .capture_by_url(Some("https://example.com"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::Validation(_)));
    assert!(tracker.list_websites().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_history_newest_first_with_previews() {
    let tracker = tracker();
    let site = tracked_site(&tracker, "https://example.com").await;
    tracker.capture(&site.id, Some("first".to_string())).await.unwrap();
    tracker
        .capture(&site.id, Some("x".repeat(150)))
        .await
        .unwrap();

    let history = tracker.history(&site.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content_preview, format!("{}...", "x".repeat(100)));
    assert_eq!(history[1].content_preview, "first...");
    assert!(history[0].captured_at >= history[1].captured_at);
}

#[tokio::test]
async fn test_history_respects_limit() {
    let store: Arc<dyn SnapshotStore> = Arc::new(MemorySnapshotStore::new());
    let tracker = Tracker::with_config(
        store,
        TrackerConfig {
            history_limit: 3,
            preview_chars: 10,
        },
    );
    let site = tracked_site(&tracker, "https://example.com").await;
    for i in 0..5 {
        tracker
            .capture(&site.id, Some(format!("v{}", i)))
            .await
            .unwrap();
    }
    let history = tracker.history(&site.id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].content_preview, "v4...");
}

#[tokio::test]
async fn test_history_unknown_website() {
    let err = tracker().history("missing").await.unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(_)));
}

#[tokio::test]
async fn test_diff_with_no_snapshots() {
    let tracker = tracker();
    let site = tracked_site(&tracker, "https://example.com").await;
    let outcome = tracker.diff_latest(&site.id).await.unwrap();
    assert_eq!(outcome, DiffOutcome::NotEnoughSnapshots { available: 0 });
}

#[tokio::test]
async fn test_diff_with_one_snapshot() {
    let tracker = tracker();
    let site = tracked_site(&tracker, "https://example.com").await;
    tracker.capture(&site.id, Some("a\n".to_string())).await.unwrap();
    let outcome = tracker.diff_latest(&site.id).await.unwrap();
    assert_eq!(outcome, DiffOutcome::NotEnoughSnapshots { available: 1 });
}

#[tokio::test]
async fn test_diff_uses_two_newest() {
    let tracker = tracker();
    let site = tracked_site(&tracker, "https://example.com").await;
    tracker.capture(&site.id, Some("old\n".to_string())).await.unwrap();
    let older = tracker.capture(&site.id, Some("a\nb\n".to_string())).await.unwrap();
    let newer = tracker.capture(&site.id, Some("a\nc\n".to_string())).await.unwrap();

    let diff = match tracker.diff_latest(&site.id).await.unwrap() {
        DiffOutcome::Ready(diff) => diff,
        other => panic!("expected diff, got {:?}", other),
    };
    assert_eq!(diff.older_id, older.id);
    assert_eq!(diff.newer_id, newer.id);
    assert_eq!(diff.older, older.captured_at);
    assert_eq!(diff.newer, newer.captured_at);
    assert_eq!(diff.stats.added, 1);
    assert_eq!(diff.stats.removed, 1);
    assert_eq!(diff.stats.unchanged, 1);
}

#[tokio::test]
async fn test_diff_unknown_website() {
    let err = tracker().diff_latest("missing").await.unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(ref m) if m == "Website not found"));
}

#[tokio::test]
async fn test_latest_snapshot_consistent_with_history() {
    let tracker = tracker();
    let site = tracked_site(&tracker, "https://example.com").await;
    assert!(tracker.website(&site.id).await.unwrap().latest_snapshot.is_none());

    for i in 0..3 {
        tracker
            .capture(&site.id, Some(format!("v{}", i)))
            .await
            .unwrap();
    }
    let listed = tracker.list_websites().await.unwrap();
    let history = tracker.history(&site.id).await.unwrap();
    assert_eq!(listed[0].latest_snapshot, Some(history[0].captured_at));
    assert_eq!(
        tracker.website(&site.id).await.unwrap().latest_snapshot,
        Some(history[0].captured_at)
    );
}

#[tokio::test]
async fn test_latest_content() {
    let tracker = tracker();
    let site = tracked_site(&tracker, "https://example.com").await;
    let err = tracker.latest_content(&site.id).await.unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(ref m) if m == "No snapshots found"));

    tracker.capture(&site.id, Some("v1".to_string())).await.unwrap();
    tracker.capture(&site.id, Some("v2".to_string())).await.unwrap();
    assert_eq!(tracker.latest_content(&site.id).await.unwrap().content, "v2");
}

#[tokio::test]
async fn test_snapshot_lookup() {
    let tracker = tracker();
    let site = tracked_site(&tracker, "https://example.com").await;
    let receipt = tracker
        .capture(&site.id, Some("<html></html>".to_string()))
        .await
        .unwrap();
    let snapshot = tracker.snapshot(&receipt.id).await.unwrap();
    assert_eq!(snapshot.content, "<html></html>");
    assert!(matches!(
        tracker.snapshot("missing").await.unwrap_err(),
        TrackerError::NotFound(_)
    ));
}

#[test]
fn test_website_overview_json_shape() {
    let overview = WebsiteOverview {
        id: "w1".to_string(),
        url: "https://example.com".to_string(),
        name: None,
        created_at: weblens_protocols::timestamp_now(),
        latest_snapshot: None,
    };
    let json = serde_json::to_value(&overview).unwrap();
    assert!(json["latestSnapshot"].is_null());
    assert!(json.get("createdAt").is_some());
}
