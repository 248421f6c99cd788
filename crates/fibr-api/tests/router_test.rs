//! Router tests: dispatch, access decisions and rendering over a real tree.

mod helpers;

use axum::http::StatusCode;

use helpers::{TestApp, basic, item_names, owner};

#[tokio::test]
async fn test_owner_lists_directory() {
    let app = TestApp::new().await;
    app.write("/docs/a.txt", b"hello");
    app.write("/b.txt", b"b");

    let response = app.request("GET", "/", Some(&owner())).await;

    assert_eq!(response.status, StatusCode::OK);
    let listing = response.json();
    assert_eq!(item_names(&listing), vec!["docs", "b.txt"]);
    assert_eq!(listing["can_edit"], true);
    assert_eq!(listing["can_share"], true);
    assert_eq!(listing["layout"], "grid");
}

#[tokio::test]
async fn test_anonymous_request_is_challenged() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.header("www-authenticate"),
        Some("Basic realm=\"fibr\" charset=\"UTF-8\"")
    );
}

#[tokio::test]
async fn test_rejected_owner_credentials_are_forbidden() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/", Some(&basic(helpers::OWNER, "wrong")))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.header("www-authenticate").is_none());
}

#[tokio::test]
async fn test_encoded_traversal_is_forbidden() {
    let app = TestApp::new().await;
    app.write("/docs/a.txt", b"hello");

    let response = app
        .request("GET", "/docs/%2E%2E/%2E%2E/etc/passwd", Some(&owner()))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_public_assets_need_no_credentials() {
    let app = TestApp::new().await;

    let robots = app.request("GET", "/robots.txt", None).await;
    assert_eq!(robots.status, StatusCode::OK);
    assert!(robots.text().starts_with("User-agent: *"));

    let sitemap = app.request("GET", "/sitemap.xml", None).await;
    assert_eq!(sitemap.status, StatusCode::OK);
    assert!(sitemap.text().contains("<urlset"));
}

#[tokio::test]
async fn test_serves_file_content() {
    let app = TestApp::new().await;
    app.write("/docs/a.txt", b"hello");

    let response = app.request("GET", "/docs/a.txt", Some(&owner())).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "hello");
    assert_eq!(
        response.header("content-type"),
        Some("text/plain; charset=utf-8")
    );
    assert_eq!(response.header("content-length"), Some("5"));
}

#[tokio::test]
async fn test_missing_entry_is_not_found() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/nothing/here", Some(&owner())).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_directory() {
    let app = TestApp::new().await;
    app.write("/docs/a.txt", b"hello");

    let response = app
        .form("PUT", "/docs/", "name=New%20Folder", Some(&owner()))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(app.path("/docs/new_folder").is_dir());
    let listing = response.json();
    assert_eq!(listing["message"]["level"], "success");
    assert!(item_names(&listing).contains(&"new_folder".to_string()));
}

#[tokio::test]
async fn test_rename_onto_existing_entry_is_bad_request() {
    let app = TestApp::new().await;
    app.write("/docs/old.txt", b"old");
    app.write("/docs/new.txt", b"new");

    let response = app
        .form(
            "PATCH",
            "/docs/old.txt",
            "newName=%2Fdocs%2Fnew.txt",
            Some(&owner()),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(std::fs::read(app.path("/docs/old.txt")).unwrap(), b"old");
    assert_eq!(std::fs::read(app.path("/docs/new.txt")).unwrap(), b"new");
}

#[tokio::test]
async fn test_rename_through_method_override() {
    let app = TestApp::new().await;
    app.write("/docs/old.txt", b"old");

    let response = app
        .form(
            "POST",
            "/docs/old.txt",
            "method=PATCH&newName=%2Fdocs%2Frenamed.txt",
            Some(&owner()),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!app.path("/docs/old.txt").exists());
    assert_eq!(std::fs::read(app.path("/docs/renamed.txt")).unwrap(), b"old");
}

#[tokio::test]
async fn test_unknown_method_override_is_bad_request() {
    let app = TestApp::new().await;
    app.write("/docs/a.txt", b"hello");

    let response = app
        .form("POST", "/docs/", "method=MOVE", Some(&owner()))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_redirects_with_message() {
    let app = TestApp::new().await;
    app.write("/docs/a.txt", b"hello");

    let response = app.request("DELETE", "/docs/a.txt", Some(&owner())).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let location = response.header("location").unwrap().to_string();
    assert!(location.starts_with("/docs/?message="));
    assert!(location.ends_with("&messageLevel=success"));
    assert!(!app.path("/docs/a.txt").exists());

    let followed = app.request("GET", &location, Some(&owner())).await;
    assert_eq!(followed.status, StatusCode::OK);
    assert_eq!(
        followed.json()["message"]["content"],
        "a.txt successfully deleted"
    );
}

#[tokio::test]
async fn test_upload_files() {
    let app = TestApp::new().await;
    std::fs::create_dir_all(app.path("/docs")).unwrap();

    let single = app
        .upload(
            "/docs/",
            &[("file", "Notes 2024.txt", b"hello")],
            Some(&owner()),
        )
        .await;
    assert_eq!(single.status, StatusCode::OK);
    assert_eq!(
        single.json()["message"]["content"],
        "File notes_2024.txt successfully uploaded"
    );
    assert_eq!(
        std::fs::read(app.path("/docs/notes_2024.txt")).unwrap(),
        b"hello"
    );

    let batch = app
        .upload(
            "/docs/",
            &[("files[]", "a.txt", b"a"), ("files[]", "b.txt", b"b")],
            Some(&owner()),
        )
        .await;
    assert_eq!(batch.status, StatusCode::OK);
    assert_eq!(
        batch.json()["message"]["content"],
        "Files a.txt, b.txt successfully uploaded"
    );
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let app = TestApp::with_upload_limit(16).await;
    std::fs::create_dir_all(app.path("/docs")).unwrap();

    let response = app
        .upload("/docs/", &[("file", "big.bin", &[7u8; 64])], Some(&owner()))
        .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!app.path("/docs/big.bin").exists());
}

#[tokio::test]
async fn test_read_only_share() {
    let app = TestApp::new().await;
    app.write("/docs/a.txt", b"hello");
    let share = app
        .registry
        .create("/docs", false, String::new(), None)
        .await
        .unwrap();

    let listing = app.request("GET", &format!("/{}/", share.id), None).await;
    assert_eq!(listing.status, StatusCode::OK);
    let body = listing.json();
    assert_eq!(item_names(&body), vec!["a.txt"]);
    assert_eq!(body["can_edit"], false);
    assert_eq!(body["can_share"], false);

    let file = app
        .request("GET", &format!("/{}/a.txt", share.id), None)
        .await;
    assert_eq!(file.text(), "hello");

    let create = app
        .form("PUT", &format!("/{}/", share.id), "name=x", None)
        .await;
    assert_eq!(create.status, StatusCode::FORBIDDEN);

    let rename = app
        .form(
            "PATCH",
            &format!("/{}/a.txt", share.id),
            "newName=b.txt",
            None,
        )
        .await;
    assert_eq!(rename.status, StatusCode::FORBIDDEN);

    let delete = app
        .request("DELETE", &format!("/{}/a.txt", share.id), None)
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);
    assert!(app.path("/docs/a.txt").exists());
}

#[tokio::test]
async fn test_password_share_through_http() {
    let app = TestApp::new().await;
    app.write("/docs/a.txt", b"hello");

    let created = app
        .form(
            "POST",
            "/docs/",
            "method=SHARE&edit=true&password=pw",
            Some(&owner()),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);

    let shares = app.registry.list().await;
    assert_eq!(shares.len(), 1);
    let share = &shares[0];
    assert_eq!(
        created.json()["message"]["content"],
        format!("Share successfully created with ID: {}", share.id)
    );

    let uri = format!("/{}/", share.id);

    let missing = app.request("GET", &uri, None).await;
    let wrong = app.request("GET", &uri, Some(&basic("", "nope"))).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.json(), wrong.json());
    assert!(wrong.header("www-authenticate").is_some());

    let granted = app.request("GET", &uri, Some(&basic("", "pw"))).await;
    assert_eq!(granted.status, StatusCode::OK);
    assert_eq!(granted.json()["can_edit"], true);
}

#[tokio::test]
async fn test_share_with_out_of_range_duration_is_bad_request() {
    let app = TestApp::new().await;
    app.write("/docs/a.txt", b"hello");

    let response = app
        .form(
            "POST",
            "/docs",
            "method=SHARE&duration=4294967295",
            Some(&owner()),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["message"],
        "Invalid value for duration: 4294967295"
    );
    assert!(app.registry.list().await.is_empty());
}

#[tokio::test]
async fn test_not_found_through_share_hides_share_root() {
    let app = TestApp::new().await;
    app.write("/private/owner-only/docs/a.jpg", b"not an image");
    let share = app
        .registry
        .create("/private/owner-only/docs", false, String::new(), None)
        .await
        .unwrap();

    let missing = app
        .request("GET", &format!("/{}/missing.txt", share.id), None)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(
        missing.json()["message"],
        "Requested path does not exist /missing.txt"
    );

    let thumbnail = app
        .request("GET", &format!("/{}/a.jpg?thumbnail", share.id), None)
        .await;
    assert_eq!(thumbnail.status, StatusCode::NOT_FOUND);
    assert!(!thumbnail.text().contains("owner-only"));
}

#[tokio::test]
async fn test_metadata_directory_is_hidden_and_reserved() {
    let app = TestApp::new().await;
    app.write("/docs/a.txt", b"hello");
    app.registry
        .create("/docs", false, String::new(), None)
        .await
        .unwrap();
    assert!(app.path("/.metadata/shares.json").exists());

    let listing = app.request("GET", "/", Some(&owner())).await;
    assert_eq!(item_names(&listing.json()), vec!["docs"]);

    let metadata = app
        .request("GET", "/.metadata/shares.json", Some(&owner()))
        .await;
    assert_eq!(metadata.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_thumbnail() {
    let app = TestApp::new().await;
    app.write("/albums/photo.png", b"not really a png");

    let file = app
        .request("GET", "/albums/photo.png?thumbnail", Some(&owner()))
        .await;
    assert_eq!(file.status, StatusCode::NOT_FOUND);

    let directory = app
        .request("GET", "/albums/?thumbnail", Some(&owner()))
        .await;
    assert_eq!(directory.status, StatusCode::OK);
    assert_eq!(directory.json(), serde_json::json!({}));
}
