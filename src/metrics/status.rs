//! Status code labels.

use std::borrow::Cow;

use axum::http::StatusCode;

/// Collapse a numeric status into its class.
pub fn normalize_http_status(status: u16) -> &'static str {
    if status < 200 {
        "1xx"
    } else if status < 300 {
        "2xx"
    } else if status < 400 {
        "3xx"
    } else if status < 500 {
        "4xx"
    } else {
        "5xx"
    }
}

/// Value of the `status` label for `status`.
pub fn status_label(status: StatusCode, normalize: bool) -> Cow<'static, str> {
    if normalize {
        Cow::Borrowed(normalize_http_status(status.as_u16()))
    } else {
        Cow::Owned(status.as_u16().to_string())
    }
}
