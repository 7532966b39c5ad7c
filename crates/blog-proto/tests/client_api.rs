mod common;

use axum::http::StatusCode;
use blog_proto::pagination::PageSelector;
use blog_proto::{ApiError, BlogClient, ListQuery, NewPost, PostId};
use common::mock_blogs::{seed_posts, start};

#[tokio::test]
async fn list_first_page_reports_total_and_orders_newest_first() {
    let mock = start(seed_posts(25)).await;
    let config = mock.config();
    let client = BlogClient::new(&config).unwrap();

    let page = client
        .list(&ListQuery::first_page(&config.listing))
        .await
        .unwrap();

    assert_eq!(page.posts.len(), 12);
    assert_eq!(page.total_count, 25);
    let dates: Vec<_> = page.posts.iter().map(|p| p.date.clone()).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);

    let selector = PageSelector::from_total(page.total_count, config.listing.page_size, 1);
    assert_eq!(selector.total_pages(), 3);
    assert_eq!(selector.active(), Some(1));
}

#[tokio::test]
async fn list_last_page_is_partial() {
    let mock = start(seed_posts(25)).await;
    let config = mock.config();
    let client = BlogClient::new(&config).unwrap();

    let page = client
        .list(&ListQuery::first_page(&config.listing).page(3))
        .await
        .unwrap();
    assert_eq!(page.posts.len(), 1);
    assert_eq!(page.total_count, 25);
}

#[tokio::test]
async fn search_filters_server_side() {
    let mock = start(seed_posts(25)).await;
    let config = mock.config();
    let client = BlogClient::new(&config).unwrap();

    let page = client
        .list(&ListQuery::first_page(&config.listing).search(Some("react")))
        .await
        .unwrap();
    assert_eq!(page.total_count, 5);
    assert!(page.posts.iter().all(|p| p.content.contains("react")));
}

#[tokio::test]
async fn missing_total_header_falls_back_to_page_arithmetic() {
    let mock = start(seed_posts(15)).await;
    mock.state.lock().unwrap().send_total = false;
    let config = mock.config();
    let client = BlogClient::new(&config).unwrap();

    let page = client
        .list(&ListQuery::first_page(&config.listing).page(2))
        .await
        .unwrap();
    assert_eq!(page.posts.len(), 3);
    assert_eq!(page.total_count, 15);
}

#[tokio::test]
async fn repeated_get_is_stable() {
    let mock = start(seed_posts(3)).await;
    let client = BlogClient::new(&mock.config()).unwrap();

    let first = client.get(&PostId::from(2)).await.unwrap();
    let second = client.get(&PostId::from(2)).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.title, "Post number 2");
}

#[tokio::test]
async fn get_missing_is_not_found() {
    let mock = start(seed_posts(3)).await;
    let client = BlogClient::new(&mock.config()).unwrap();

    let err = client.get(&PostId::from(99)).await.unwrap_err();
    match &err {
        ApiError::NotFound { url } => assert!(url.ends_with("/blogs/99")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn create_sends_default_profile_and_timestamp() {
    let mock = start(seed_posts(2)).await;
    let config = mock.config();
    let client = BlogClient::new(&config).unwrap();

    let before = chrono::Utc::now();
    let body = NewPost::compose("A", "B", "C", config.posts.default_profile.clone());
    let created = client.create(&body).await.unwrap();
    let after = chrono::Utc::now();

    assert_eq!(created.id, PostId::from(3));
    let received = mock.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["profile"], "images/default.jpeg");
    assert_eq!(received[0]["title"], "A");
    assert!(received[0].get("id").is_none());

    let sent_at = chrono::DateTime::parse_from_rfc3339(received[0]["date"].as_str().unwrap())
        .unwrap()
        .with_timezone(&chrono::Utc);
    assert!(sent_at >= before - chrono::Duration::milliseconds(1));
    assert!(sent_at <= after);
}

#[tokio::test]
async fn update_replaces_title_and_content_only() {
    let mock = start(seed_posts(2)).await;
    let client = BlogClient::new(&mock.config()).unwrap();

    let original = client.get(&PostId::from(1)).await.unwrap();
    let updated = client
        .update(
            &original.id,
            &NewPost::edited(&original, "Retitled", "Rewritten"),
        )
        .await
        .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.title, "Retitled");
    assert_eq!(updated.content, "Rewritten");
    assert_eq!(updated.date, original.date);
    assert_eq!(updated.author, original.author);
    assert_eq!(updated.profile, original.profile);
}

#[tokio::test]
async fn delete_removes_post() {
    let mock = start(seed_posts(2)).await;
    let client = BlogClient::new(&mock.config()).unwrap();

    client.delete(&PostId::from(1)).await.unwrap();
    assert_eq!(mock.post_count(), 1);
    assert!(matches!(
        client.get(&PostId::from(1)).await,
        Err(ApiError::NotFound { .. })
    ));
}

#[tokio::test]
async fn server_error_carries_status_text() {
    let mock = start(seed_posts(2)).await;
    let client = BlogClient::new(&mock.config()).unwrap();

    mock.fail_next(StatusCode::INTERNAL_SERVER_ERROR);
    let err = client.delete(&PostId::from(1)).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    let msg = err.to_string();
    assert!(msg.starts_with("Error "));
    assert!(msg.contains("/blogs/1"));
    assert!(msg.ends_with("Internal Server Error"));
    assert_eq!(mock.post_count(), 2);
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let mut config = blog_proto::Config::default();
    // Reserved port on loopback; nothing listens there.
    config.api.base_url = "http://127.0.0.1:9".to_string();
    config.api.timeout_secs = 2;
    let client = BlogClient::new(&config).unwrap();

    let err = client
        .list(&ListQuery::first_page(&config.listing))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
}
