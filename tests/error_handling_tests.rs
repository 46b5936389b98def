use render_form_server::form::multipart_parser::FormParseError;
use render_form_server::line_items::NormalizeError;
use render_form_server::publisher::PublishError;
use render_form_server::render::RenderError;
use render_form_server::ErrorResponse;

#[test]
fn test_error_response_constructors() {
    let not_found = ErrorResponse::not_found("File 'x.pdf' not found");
    assert_eq!(not_found.error, "NotFound");
    assert!(not_found.message.contains("x.pdf"));

    assert_eq!(ErrorResponse::bad_request("nope").error, "BadRequest");
    assert_eq!(ErrorResponse::internal_error("boom").error, "InternalServerError");
}

#[test]
fn test_error_response_serialization_round_trip() {
    let error = ErrorResponse::internal_error("git fetch exited with status 128");
    let json = serde_json::to_string(&error).unwrap();

    let parsed: ErrorResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.error, "InternalServerError");
    assert!(chrono::DateTime::parse_from_rfc3339(&parsed.timestamp).is_ok());
}

#[test]
fn test_schema_error_names_missing_columns() {
    let err = NormalizeError::Schema {
        missing: vec!["qty".to_string(), "amt".to_string()],
    };
    let message = err.to_string();
    assert!(message.starts_with("CSV file must contain the following headers"));
    assert!(message.ends_with("(missing: qty, amt)"));
}

#[test]
fn test_amount_error_identifies_row() {
    let err = NormalizeError::AmountFormat {
        row: 3,
        value: "abc".to_string(),
    };
    assert_eq!(err.to_string(), "Row 3: could not convert amount 'abc' to a number");
}

#[test]
fn test_unexpected_content_type_message() {
    let err = RenderError::UnexpectedContentType {
        content_type: Some("text/html".to_string()),
    };
    assert_eq!(err.to_string(), "Unexpected content type returned by API: text/html");

    let missing = RenderError::UnexpectedContentType { content_type: None };
    assert!(missing.to_string().ends_with("none"));
}

#[test]
fn test_publish_and_form_errors_display() {
    assert_eq!(
        PublishError::NotFound("a.pdf".to_string()).to_string(),
        "File 'a.pdf' not found"
    );
    assert_eq!(
        FormParseError::TooLarge { limit: 10 }.to_string(),
        "Upload exceeds the limit of 10 bytes"
    );
}
