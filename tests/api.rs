mod common;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use reqwest::StatusCode;
use wiremock::{Mock, MockServer, ResponseTemplate};

use canvas_mirror::api::{CanvasApi, CanvasSource, FolderOwner, ItemContent};
use canvas_mirror::Error;
use common::http;

const TOKEN: &str = "test-token-0123456789abcdef";

fn api(server: &MockServer) -> CanvasApi {
    let http = http().with_bearer(&server.uri(), TOKEN).unwrap();
    CanvasApi::new(&server.uri(), http)
}

#[tokio::test]
async fn collections_follow_next_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 3, "name": "Chemistry"}])))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .and(query_param("per_page", "100"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    format!(
                        r#"<{0}/api/v1/courses?page=1&per_page=100>; rel="current", <{0}/api/v1/courses?page=2&per_page=100>; rel="next""#,
                        server.uri()
                    )
                    .as_str(),
                )
                .set_body_json(json!([
                    {"id": 1, "name": "Biology"},
                    {"id": 2, "name": "Physics", "course_code": "PHY-1"}
                ])),
        )
        .mount(&server)
        .await;

    let courses = api(&server).courses().await.unwrap();
    let ids: Vec<u64> = courses.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(courses[1].extra["course_code"], json!("PHY-1"));
}

#[tokio::test]
async fn forbidden_is_access_denied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/1/modules/2/items"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = api(&server).module_items(1, 2).await.unwrap_err();
    assert!(matches!(err, Error::AccessDenied(_)));
    assert!(err.is_access_error());
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn missing_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/1/front_page"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = api(&server).front_page(1).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn module_items_and_folders_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/1/modules/2/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "title": "Syllabus", "type": "File", "content_id": 77},
            {"id": 11, "title": "Intro", "type": "Page", "page_url": "intro"},
            {"id": 12, "title": "Link", "type": "ExternalUrl", "external_url": "https://example.com"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/groups/9/folders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 4, "full_name": "group files", "name": "group files"}
        ])))
        .mount(&server)
        .await;

    let api = api(&server);
    let items = api.module_items(1, 2).await.unwrap();
    let contents: Vec<ItemContent> = items.iter().map(|i| i.content()).collect();
    assert_eq!(
        contents,
        vec![
            ItemContent::File(77),
            ItemContent::Page("intro".into()),
            ItemContent::Unsupported("ExternalUrl".into()),
        ]
    );

    let folders = api.folders(FolderOwner::Group(9)).await.unwrap();
    assert_eq!(folders[0].full_name.as_deref(), Some("group files"));
}

#[tokio::test]
async fn token_is_not_sent_to_other_hosts() {
    let canvas = MockServer::start().await;
    let cdn = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/file.bin"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&cdn)
        .await;
    Mock::given(method("GET"))
        .and(path("/file.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(&b"payload"[..]))
        .mount(&cdn)
        .await;

    // both servers listen on 127.0.0.1, so scope the token to a different host name
    let http = http()
        .with_bearer(&canvas.uri().replace("127.0.0.1", "localhost"), TOKEN)
        .unwrap();
    let bytes = http
        .get_bytes(&format!("{}/file.bin", cdn.uri()))
        .await
        .unwrap();
    assert_eq!(bytes, b"payload");
}

#[tokio::test]
async fn server_errors_carry_their_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = api(&server).courses().await.unwrap_err();
    assert!(matches!(
        err,
        Error::HttpStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
            ..
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn download_replaces_existing_file_only_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/new"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(&b"fresh bytes"[..]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let root = tempfile::tempdir().unwrap();
    let target = root.path().join("notes.pdf");
    std::fs::write(&target, b"old bytes").unwrap();

    let http = http();
    let err = http
        .download_to(&format!("{}/files/gone", server.uri()), &target, false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(std::fs::read(&target).unwrap(), b"old bytes");

    let written = http
        .download_to(&format!("{}/files/new", server.uri()), &target, false)
        .await
        .unwrap();
    assert_eq!(written, 11);
    assert_eq!(std::fs::read(&target).unwrap(), b"fresh bytes");

    let names: Vec<String> = std::fs::read_dir(root.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["notes.pdf"]);
}
