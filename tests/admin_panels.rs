mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use tower::util::ServiceExt;
use uuid::Uuid;

use common::{MemoryRepos, article, author, build_admin_state, category, settings, ts};
use kalem::domain::entities::CommentRecord;
use kalem::infra::http::build_admin_router;

const UPLOAD_LIMIT: usize = 1024 * 1024;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn form_post(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn pending_comment(article_id: Uuid, name: &str, body: &str) -> CommentRecord {
    CommentRecord {
        id: Uuid::new_v4(),
        article_id,
        author_name: name.to_string(),
        author_email: format!("{}@example.com", name.to_lowercase()),
        body: body.to_string(),
        approved: false,
        admin_reply: None,
        admin_reply_at: None,
        created_at: ts(0),
    }
}

#[tokio::test]
async fn dashboard_renders_counters_and_latest_articles() {
    let repos = Arc::new(MemoryRepos::default());
    let cat = category("Genel", "genel");
    let auth = author("Admin");
    repos.seed_category(cat.clone());
    repos.seed_author(auth.clone());
    let published = article("Yayındaki Yazı", "yayindaki-yazi", &cat, &auth, true, ts(60));
    repos.seed_article(published.clone());
    repos.seed_article(article("Taslak Yazı", "taslak-yazi", &cat, &auth, false, ts(120)));
    repos.seed_comment(pending_comment(published.id, "Ali", "Güzel yazı"));

    let router = build_admin_router(build_admin_state(repos), UPLOAD_LIMIT);
    let response = router.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Toplam yazı"));
    assert!(body.contains("Bekleyen yorum"));
    assert!(body.contains("Yayındaki Yazı"));
    assert!(body.contains("Taslak Yazı"));
}

#[tokio::test]
async fn creating_an_article_transliterates_the_slug() {
    let repos = Arc::new(MemoryRepos::default());
    let cat = category("Genel", "genel");
    repos.seed_category(cat.clone());

    let router = build_admin_router(build_admin_state(repos.clone()), UPLOAD_LIMIT);
    let body = format!(
        "title=%C3%87ok+G%C3%BCzel+Yaz%C4%B1&excerpt=&body=%C4%B0%C3%A7erik+metni&cover_image=&focus_keyword=&category_id={}&published=on",
        cat.id
    );
    let response = router
        .oneshot(form_post("/articles/create", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/articles");

    let articles = repos.articles.lock().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].slug, "cok-guzel-yazi");
    assert_eq!(articles[0].title, "Çok Güzel Yazı");
    assert!(articles[0].published);

    // the single-author row was created on demand
    let authors = repos.authors.lock().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].name, "Admin");
}

#[tokio::test]
async fn duplicate_titles_get_numeric_slug_suffixes() {
    let repos = Arc::new(MemoryRepos::default());
    let cat = category("Genel", "genel");
    repos.seed_category(cat.clone());

    let router = build_admin_router(build_admin_state(repos.clone()), UPLOAD_LIMIT);
    for _ in 0..2 {
        let body = format!(
            "title=Rehber&excerpt=&body=metin&cover_image=&focus_keyword=&category_id={}",
            cat.id
        );
        let response = router
            .clone()
            .oneshot(form_post("/articles/create", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let articles = repos.articles.lock().unwrap();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].slug, "rehber");
    assert_eq!(articles[1].slug, "rehber-1");
}

#[tokio::test]
async fn editing_an_article_never_regenerates_the_slug() {
    let repos = Arc::new(MemoryRepos::default());
    let cat = category("Genel", "genel");
    let auth = author("Admin");
    repos.seed_category(cat.clone());
    repos.seed_author(auth.clone());
    let record = article("Eski Başlık", "eski-baslik", &cat, &auth, true, ts(0));
    repos.seed_article(record.clone());

    let router = build_admin_router(build_admin_state(repos.clone()), UPLOAD_LIMIT);
    let body = format!(
        "title=Yepyeni+Baslik&excerpt=&body=guncel+metin&cover_image=&focus_keyword=&category_id={}&published=on",
        cat.id
    );
    let response = router
        .oneshot(form_post(&format!("/articles/{}/edit", record.id), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let articles = repos.articles.lock().unwrap();
    assert_eq!(articles[0].title, "Yepyeni Baslik");
    assert_eq!(articles[0].slug, "eski-baslik");
}

#[tokio::test]
async fn publish_and_draft_toggles_flip_visibility() {
    let repos = Arc::new(MemoryRepos::default());
    let cat = category("Genel", "genel");
    let auth = author("Admin");
    repos.seed_category(cat.clone());
    repos.seed_author(auth.clone());
    let record = article("Yazı", "yazi", &cat, &auth, false, ts(0));
    repos.seed_article(record.clone());

    let router = build_admin_router(build_admin_state(repos.clone()), UPLOAD_LIMIT);

    let response = router
        .clone()
        .oneshot(form_post(
            &format!("/articles/{}/publish", record.id),
            String::new(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(repos.articles.lock().unwrap()[0].published);

    let response = router
        .oneshot(form_post(
            &format!("/articles/{}/draft", record.id),
            String::new(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(!repos.articles.lock().unwrap()[0].published);
}

#[tokio::test]
async fn missing_article_returns_not_found() {
    let repos = Arc::new(MemoryRepos::default());
    let router = build_admin_router(build_admin_state(repos), UPLOAD_LIMIT);

    let response = router
        .oneshot(get(&format!("/articles/{}/edit", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_create_and_rename_derive_slugs() {
    let repos = Arc::new(MemoryRepos::default());
    let router = build_admin_router(build_admin_state(repos.clone()), UPLOAD_LIMIT);

    let response = router
        .clone()
        .oneshot(form_post(
            "/categories/create",
            "name=Dijital+Pazarlama".to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let id = repos.categories.lock().unwrap()[0].id;
    assert_eq!(repos.categories.lock().unwrap()[0].slug, "dijital-pazarlama");

    let response = router
        .oneshot(form_post(
            &format!("/categories/{id}/rename"),
            "name=Sosyal+Medya".to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let categories = repos.categories.lock().unwrap();
    assert_eq!(categories[0].name, "Sosyal Medya");
    assert_eq!(categories[0].slug, "sosyal-medya");
}

#[tokio::test]
async fn deleting_a_category_in_use_is_a_conflict() {
    let repos = Arc::new(MemoryRepos::default());
    let cat = category("Genel", "genel");
    let auth = author("Admin");
    repos.seed_category(cat.clone());
    repos.seed_author(auth.clone());
    repos.seed_article(article("Yazı", "yazi", &cat, &auth, true, ts(0)));

    let router = build_admin_router(build_admin_state(repos.clone()), UPLOAD_LIMIT);
    let response = router
        .oneshot(form_post(
            &format!("/categories/{}/delete", cat.id),
            String::new(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(repos.categories.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn replying_to_a_comment_also_approves_it() {
    let repos = Arc::new(MemoryRepos::default());
    let cat = category("Genel", "genel");
    let auth = author("Admin");
    repos.seed_category(cat.clone());
    repos.seed_author(auth.clone());
    let record = article("Yazı", "yazi", &cat, &auth, true, ts(0));
    repos.seed_article(record.clone());
    let comment = pending_comment(record.id, "Ali", "Soru sormak istiyorum");
    repos.seed_comment(comment.clone());

    let router = build_admin_router(build_admin_state(repos.clone()), UPLOAD_LIMIT);
    let response = router
        .oneshot(form_post(
            &format!("/comments/{}/reply", comment.id),
            "reply=Te%C5%9Fekk%C3%BCrler".to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let comments = repos.comments.lock().unwrap();
    assert!(comments[0].approved);
    assert_eq!(comments[0].admin_reply.as_deref(), Some("Teşekkürler"));
}

#[tokio::test]
async fn empty_reply_is_rejected() {
    let repos = Arc::new(MemoryRepos::default());
    let cat = category("Genel", "genel");
    let auth = author("Admin");
    repos.seed_category(cat.clone());
    repos.seed_author(auth.clone());
    let record = article("Yazı", "yazi", &cat, &auth, true, ts(0));
    repos.seed_article(record.clone());
    let comment = pending_comment(record.id, "Ali", "Soru");
    repos.seed_comment(comment.clone());

    let router = build_admin_router(build_admin_state(repos.clone()), UPLOAD_LIMIT);
    let response = router
        .oneshot(form_post(
            &format!("/comments/{}/reply", comment.id),
            "reply=++".to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!repos.comments.lock().unwrap()[0].approved);
}

#[tokio::test]
async fn comment_filter_tabs_narrow_the_listing() {
    let repos = Arc::new(MemoryRepos::default());
    let cat = category("Genel", "genel");
    let auth = author("Admin");
    repos.seed_category(cat.clone());
    repos.seed_author(auth.clone());
    let record = article("Yazı", "yazi", &cat, &auth, true, ts(0));
    repos.seed_article(record.clone());
    repos.seed_comment(pending_comment(record.id, "Ziyaretci Bir", "bekliyor"));
    let mut approved = pending_comment(record.id, "Ziyaretci Iki", "onaylandi");
    approved.approved = true;
    repos.seed_comment(approved);

    let router = build_admin_router(build_admin_state(repos), UPLOAD_LIMIT);
    let response = router
        .oneshot(get("/comments?filter=pending"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Ziyaretci Bir"));
    assert!(!body.contains("Ziyaretci Iki"));
}

#[tokio::test]
async fn page_listing_seeds_the_default_set() {
    let repos = Arc::new(MemoryRepos::default());
    let router = build_admin_router(build_admin_state(repos.clone()), UPLOAD_LIMIT);

    let response = router.oneshot(get("/pages")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Hakkımda"));
    assert!(body.contains("Gizlilik Politikası"));
    assert_eq!(repos.pages.lock().unwrap().len(), 7);

    // seeding is idempotent
    drop(body);
    let router = build_admin_router(build_admin_state(repos.clone()), UPLOAD_LIMIT);
    let _ = router.oneshot(get("/pages")).await.unwrap();
    assert_eq!(repos.pages.lock().unwrap().len(), 7);
}

#[tokio::test]
async fn settings_update_persists_and_reloads() {
    let repos = Arc::new(MemoryRepos::default());
    repos.seed_settings(settings("Eski Ad", "https://example.com"));

    let router = build_admin_router(build_admin_state(repos.clone()), UPLOAD_LIMIT);
    let response = router
        .clone()
        .oneshot(form_post(
            "/settings",
            "site_name=Yeni+Ad&posts_per_page=12&public_site_url=https%3A%2F%2Fblog.example.com"
                .to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    {
        let stored = repos.settings.lock().unwrap();
        let stored = stored.as_ref().unwrap();
        assert_eq!(stored.site_name, "Yeni Ad");
        assert_eq!(stored.posts_per_page, 12);
        assert_eq!(stored.public_site_url, "https://blog.example.com");
    }

    let response = router.oneshot(get("/settings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Yeni Ad"));
}

#[tokio::test]
async fn settings_reject_non_positive_page_size() {
    let repos = Arc::new(MemoryRepos::default());
    let router = build_admin_router(build_admin_state(repos), UPLOAD_LIMIT);

    let response = router
        .oneshot(form_post(
            "/settings",
            "site_name=Blog&posts_per_page=0".to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn multipart_upload(filename: &str, content_type: &str, payload: &str) -> Request<Body> {
    let boundary = "xkalemboundaryx";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n{payload}\r\n--{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/uploads")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_accepts_svg_and_returns_its_url() {
    let repos = Arc::new(MemoryRepos::default());
    let router = build_admin_router(build_admin_state(repos), UPLOAD_LIMIT);

    let request = multipart_upload(
        "diyagram.svg",
        "image/svg+xml",
        "<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>",
    );
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("\"url\""));
    assert!(body.contains("/uploads/"));
    assert!(body.contains(".svg"));
}

#[tokio::test]
async fn upload_rejects_unsupported_extensions() {
    let repos = Arc::new(MemoryRepos::default());
    let router = build_admin_router(build_admin_state(repos), UPLOAD_LIMIT);

    let request = multipart_upload("notlar.txt", "text/plain", "duz metin");
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
