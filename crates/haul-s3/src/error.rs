//! S3 error responses.

use quick_xml::events::Event;
use quick_xml::Reader;

use haul_core::store::StoreError;

/// `Code` and `Message` from an S3 `<Error>` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    pub request_id: Option<String>,
}

/// Parse an S3 error body. Malformed or empty XML yields an empty result.
pub fn parse_error_body(xml: &str) -> ErrorBody {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut body = ErrorBody::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                text_buf.clear();
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                match path.join(">").as_str() {
                    "Error>Code" => body.code = Some(text_buf.clone()),
                    "Error>Message" => body.message = Some(text_buf.clone()),
                    "Error>RequestId" => body.request_id = Some(text_buf.clone()),
                    _ => {}
                }
                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!("Unparseable S3 error body: {e}");
                break;
            }
            _ => {}
        }
    }

    body
}

/// Turn a non-success response into a [`StoreError::Service`].
pub fn service_error(status: reqwest::StatusCode, body: &str) -> StoreError {
    let parsed = parse_error_body(body);
    let reason = status.canonical_reason().unwrap_or("Unknown");
    StoreError::Service {
        status: status.as_u16(),
        code: parsed.code.unwrap_or_else(|| reason.replace(' ', "")),
        message: parsed.message.unwrap_or_else(|| reason.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_access_denied() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
  <Code>AccessDenied</Code>
  <Message>Access Denied</Message>
  <RequestId>4442587FB7D0A2F9</RequestId>
</Error>"#;
        let body = parse_error_body(xml);
        assert_eq!(body.code.as_deref(), Some("AccessDenied"));
        assert_eq!(body.message.as_deref(), Some("Access Denied"));
        assert_eq!(body.request_id.as_deref(), Some("4442587FB7D0A2F9"));
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        match service_error(reqwest::StatusCode::NOT_FOUND, "") {
            StoreError::Service {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, "NotFound");
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn service_error_display() {
        let xml = "<Error><Code>NoSuchBucket</Code><Message>The specified bucket does not exist</Message></Error>";
        let err = service_error(reqwest::StatusCode::NOT_FOUND, xml);
        assert_eq!(
            err.to_string(),
            "NoSuchBucket (HTTP 404): The specified bucket does not exist"
        );
    }
}
