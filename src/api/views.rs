//! Server-rendered HTML for the admin web surface and browser error pages.

use crate::config::{APP_NAME, APP_SLOGAN};
use crate::errors::{ErrorReport, FieldError};

/// Escape text for use inside HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {app}</title>
</head>
<body>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        app = escape(APP_NAME),
        body = body,
    )
}

/// Admin login form with the flashed message and field errors.
pub fn login_page(message: Option<&str>, errors: &[FieldError]) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape(APP_NAME));

    if let Some(message) = message {
        body.push_str(&format!(
            "<p class=\"alert\" role=\"alert\">{}</p>\n",
            escape(message)
        ));
    }
    if !errors.is_empty() {
        body.push_str("<ul class=\"errors\">\n");
        for error in errors {
            let text = error.message.as_deref().unwrap_or(&error.code);
            body.push_str(&format!(
                "<li data-field=\"{}\">{}</li>\n",
                escape(&error.field),
                escape(text)
            ));
        }
        body.push_str("</ul>\n");
    }

    body.push_str(
        r#"<form method="post" action="/auth/login">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Sign in</button>
</form>"#,
    );

    layout("Login", &body)
}

pub fn dashboard_page() -> String {
    let body = format!(
        "<h1>Dashboard</h1>\n<p>{}</p>\n<a href=\"/auth/logout\">Sign out</a>",
        escape(APP_SLOGAN)
    );
    layout("Dashboard", &body)
}

/// Browser rendition of an error response.
pub fn error_page(report: &ErrorReport, expose_detail: bool) -> String {
    let mut body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n",
        report.status.as_u16(),
        escape(&report.message)
    );
    if !report.errors.is_empty() {
        body.push_str("<ul>\n");
        for error in &report.errors {
            body.push_str(&format!(
                "<li>{}: {}</li>\n",
                escape(&error.field),
                escape(error.message.as_deref().unwrap_or(&error.code))
            ));
        }
        body.push_str("</ul>\n");
    }
    if let (true, Some(detail)) = (expose_detail, report.detail.as_deref()) {
        body.push_str(&format!("<pre>{}</pre>\n", escape(detail)));
    }
    layout(report.code, &body)
}
