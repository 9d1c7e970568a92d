mod common;

use axum::http::{StatusCode, header};
use common::{ADMIN_COOKIE, ADMIN_TOKEN, now, test_app};
use folio::domain::entities::ContentKind;

fn location(response: &axum_test::TestResponse) -> String {
    response
        .header(header::LOCATION)
        .to_str()
        .unwrap()
        .to_string()
}

// ─── SESSION ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_admin_redirects_to_login_without_cookie() {
    let app = test_app();

    for path in ["/admin", "/admin/articles", "/admin/convert"] {
        let response = app.server.get(path).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/login");
    }

    let response = app
        .server
        .get("/admin")
        .add_header("Cookie", "auth_token=nope")
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_sets_cookie() {
    let app = test_app();

    app.server.get("/admin/login").await.assert_status_ok();

    let response = app
        .server
        .post("/admin/login")
        .form(&[("token", ADMIN_TOKEN)])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
    let cookie = response.header(header::SET_COOKIE);
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with(&format!("auth_token={ADMIN_TOKEN}")));
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_login_rejects_unknown_token() {
    let app = test_app();

    let response = app
        .server
        .post("/admin/login")
        .form(&[("token", "definitely-not-valid")])
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(response.text().contains("Invalid or revoked token"));
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = test_app();

    let response = app
        .server
        .post("/admin/logout")
        .add_header("Cookie", ADMIN_COOKIE)
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");
    let cookie = response.header(header::SET_COOKIE);
    assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
}

// ─── PAGES ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_shows_counts() {
    let app = test_app();
    app.seed(ContentKind::Article, "Live", None, Some(now())).await;
    app.seed(ContentKind::Article, "Draft", None, None).await;

    let response = app.server.get("/admin").add_header("Cookie", ADMIN_COOKIE).await;

    response.assert_status_ok();
    let html = response.text();
    for label in ["Articles", "Research", "Projects", "Websites"] {
        assert!(html.contains(label), "missing {label}");
    }
}

#[tokio::test]
async fn test_admin_list_shows_drafts_and_scheduled() {
    let app = test_app();
    app.seed(ContentKind::Project, "Hidden Draft", None, None).await;
    app.seed(
        ContentKind::Project,
        "Next Week",
        None,
        Some(now() + chrono::Duration::days(7)),
    )
    .await;

    let response = app
        .server
        .get("/admin/projects")
        .add_header("Cookie", ADMIN_COOKIE)
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Hidden Draft"));
    assert!(html.contains("Next Week"));
    assert!(html.contains("scheduled"));
}

#[tokio::test]
async fn test_editor_pages() {
    let app = test_app();
    let item = app.seed(ContentKind::Website, "Portfolio", None, None).await;

    app.server
        .get("/admin/websites/new")
        .add_header("Cookie", ADMIN_COOKIE)
        .await
        .assert_status_ok();

    let response = app
        .server
        .get(&format!("/admin/websites/{}", item.id))
        .add_header("Cookie", ADMIN_COOKIE)
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("Portfolio"));

    app.server
        .get("/admin/websites/404")
        .add_header("Cookie", ADMIN_COOKIE)
        .await
        .assert_status_not_found();

    app.server
        .get("/admin/blogs")
        .add_header("Cookie", ADMIN_COOKIE)
        .await
        .assert_status_not_found();
}

// ─── FORMS ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_form_create_redirects_to_table() {
    let app = test_app();

    let response = app
        .server
        .post("/admin/articles")
        .add_header("Cookie", ADMIN_COOKIE)
        .form(&[
            ("title", "From The Form"),
            ("slug", ""),
            ("description", ""),
            ("content", "Body"),
            ("image_url", ""),
            ("video_url", ""),
            ("tags", "rust"),
            ("published_at", "2026-10-17T11:00"),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/articles");

    let page = app.server.get("/articles/from-the-form").await;
    page.assert_status_ok();
}

#[tokio::test]
async fn test_form_conflict_rerenders_editor() {
    let app = test_app();
    app.seed(ContentKind::Article, "Taken", None, None).await;

    let response = app
        .server
        .post("/admin/articles")
        .add_header("Cookie", ADMIN_COOKIE)
        .form(&[("title", "Another"), ("slug", "taken")])
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let html = response.text();
    assert!(html.contains("Slug already exists"));
    assert!(html.contains("Another"));
}

#[tokio::test]
async fn test_form_validation_rerenders_editor() {
    let app = test_app();

    let response = app
        .server
        .post("/admin/research")
        .add_header("Cookie", ADMIN_COOKIE)
        .form(&[("title", "Paper"), ("published_at", "someday")])
        .await;

    response.assert_status_bad_request();
    let html = response.text();
    assert!(html.contains("Invalid publish date"));
    assert!(html.contains("someday"));
}

#[tokio::test]
async fn test_form_update_and_publish_toggle() {
    let app = test_app();
    let item = app.seed(ContentKind::Research, "Study", None, None).await;
    let base = format!("/admin/research/{}", item.id);

    let response = app
        .server
        .post(&base)
        .add_header("Cookie", ADMIN_COOKIE)
        .form(&[("title", "Study, Revised"), ("slug", "study")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    app.server.get("/research/study").await.assert_status_not_found();

    let response = app
        .server
        .post(&format!("{base}/publish"))
        .add_header("Cookie", ADMIN_COOKIE)
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/research");

    let page = app.server.get("/research/study").await;
    page.assert_status_ok();
    assert!(page.text().contains("Study, Revised"));

    app.server
        .post(&format!("{base}/unpublish"))
        .add_header("Cookie", ADMIN_COOKIE)
        .await
        .assert_status(StatusCode::SEE_OTHER);
    app.server.get("/research/study").await.assert_status_not_found();
}
