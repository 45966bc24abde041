use ::axum::Json;
use ::axum::Router;
use ::axum::extract::Multipart;
use ::axum::routing::post;
use ::axum::routing::put;
use ::http_easy_test::MockRequest;
use ::http_easy_test::MockServer;
use ::http_easy_test::http::HeaderName;
use ::http_easy_test::http::HeaderValue;
use ::http_easy_test::http::Method;
use ::http_easy_test::multipart::MultipartForm;
use ::http_easy_test::multipart::Part;
use ::serde::Deserialize;
use ::serde::Serialize;
use ::std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ReceivedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    category: Option<String>,
    contents: Vec<u8>,
}

async fn route_read_fields(mut multipart: Multipart) -> Json<Vec<ReceivedField>> {
    let mut fields = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .expect("Expected to read next field")
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let category = field
            .headers()
            .get("x-category")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let contents = field
            .bytes()
            .await
            .expect("Expected to read field contents")
            .to_vec();

        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            category,
            contents,
        });
    }

    Json(fields)
}

fn new_app() -> Router {
    Router::new().route("/form", post(route_read_fields))
}

fn readme_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("README.md")
}

fn fields_form() -> MultipartForm {
    let mut form = MultipartForm::new();
    form.insert_field("key", "value").unwrap();
    form.insert_field("111", "aaaa").unwrap();
    form.insert_field("mail", "test@example.com").unwrap();
    form.insert_field("jp", "日本語").unwrap();
    form
}

fn send_through_router(form: MultipartForm) -> Vec<ReceivedField> {
    let mut mock = MockRequest::form_data("/form", Method::POST, form).unwrap();
    mock.invoke_router(new_app());
    mock.assert_status_ok();

    mock.response_json::<Vec<ReceivedField>>().unwrap()
}

#[test]
fn it_should_round_trip_text_fields_byte_exact() {
    let fields = send_through_router(fields_form());

    let pairs: Vec<(String, String)> = fields
        .into_iter()
        .map(|field| (field.name, String::from_utf8(field.contents).unwrap()))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("key".to_string(), "value".to_string()),
            ("111".to_string(), "aaaa".to_string()),
            ("mail".to_string(), "test@example.com".to_string()),
            ("jp".to_string(), "日本語".to_string()),
        ]
    );
}

#[test]
fn it_should_send_file_with_name_and_octet_stream_type() {
    let mut form = MultipartForm::new();
    form.insert_file("file", readme_path()).unwrap();

    let fields = send_through_router(form);

    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "file");
    assert_eq!(fields[0].file_name.as_deref(), Some("README.md"));
    assert_eq!(
        fields[0].content_type.as_deref(),
        Some("application/octet-stream")
    );
    assert_eq!(fields[0].contents, ::std::fs::read(readme_path()).unwrap());
}

#[test]
fn it_should_keep_duplicate_keys_in_order() {
    let mut form = MultipartForm::new();
    form.insert_field("animal", "fox").unwrap();
    form.insert_field("animal", "cat").unwrap();

    let fields = send_through_router(form);

    let values: Vec<_> = fields
        .iter()
        .filter(|field| field.name == "animal")
        .map(|field| String::from_utf8_lossy(&field.contents).to_string())
        .collect();
    assert_eq!(values, vec!["fox", "cat"]);
}

#[test]
fn it_should_send_parts_with_custom_mime_type() {
    let mut form = MultipartForm::new();
    form.insert_part(
        "data",
        Part::bytes(b"<svg/>".as_slice())
            .file_name("image.svg")
            .mime_type(::mime::IMAGE_SVG)
            .add_header(
                HeaderName::from_static("x-category"),
                HeaderValue::from_static("icon"),
            ),
    )
    .unwrap();

    let fields = send_through_router(form);

    assert_eq!(fields[0].file_name.as_deref(), Some("image.svg"));
    assert_eq!(fields[0].content_type.as_deref(), Some("image/svg+xml"));
    assert_eq!(fields[0].category.as_deref(), Some("icon"));
    assert_eq!(fields[0].contents, b"<svg/>");
}

#[test]
fn it_should_round_trip_through_mock_server() {
    let server = MockServer::new(new_app()).unwrap();

    let response = server.post_form_data("/form", fields_form());

    response.assert_status_ok();
    let fields = response.json::<Vec<ReceivedField>>().unwrap();
    let names: Vec<_> = fields.iter().map(|field| field.name.as_str()).collect();
    assert_eq!(names, vec!["key", "111", "mail", "jp"]);
    assert_eq!(fields[3].contents, "日本語".as_bytes());
}

#[test]
fn it_should_round_trip_file_through_mock_server_with_put() {
    let app = Router::new().route("/form", put(route_read_fields));
    let server = MockServer::new(app).unwrap();
    let mut form = MultipartForm::new();
    form.insert_file("file", readme_path()).unwrap();

    let response = server.form_data("/form", Method::PUT, form);

    let fields = response.json::<Vec<ReceivedField>>().unwrap();
    assert_eq!(fields[0].file_name.as_deref(), Some("README.md"));
}
