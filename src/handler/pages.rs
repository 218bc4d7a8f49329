//! Page rendering module
//!
//! Builds the HTML pages served by the application. User-supplied values are
//! escaped before they are interpolated into markup.

/// Escape a value for interpolation into HTML text or attributes
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Shared page frame
fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} | shortly</title>
    <link rel="stylesheet" href="/static/style.css" type="text/css">
</head>
<body>
    <div class="box">
        <h1><a href="/">shortly</a></h1>
        <p class="tagline">Shortly is a URL shortener written with Hyper</p>
{body}
    </div>
</body>
</html>"#,
    )
}

/// Render the URL submission form
///
/// On a failed submission the error message and the submitted value are
/// rendered back so the user can correct the input.
pub fn new_url_page(error: Option<&str>, url: &str) -> String {
    let error_html = error.map_or_else(String::new, |message| {
        format!("        <p class=\"error\">Error: {}</p>\n", escape_html(message))
    });
    let body = format!(
        r#"        <h2>Submit URL</h2>
{error_html}        <form action="/" method="post">
            <input type="text" name="url" value="{}" placeholder="https://example.com/">
            <input type="submit" value="Shorten">
        </form>"#,
        escape_html(url),
    );
    layout("New URL", &body)
}

/// Render the detail page for a short link
pub fn link_details_page(short_id: &str, target: &str) -> String {
    let id = escape_html(short_id);
    let target = escape_html(target);
    let body = format!(
        r#"        <h2>Link Details</h2>
        <dl>
            <dt>Full link</dt>
            <dd><a href="/{id}">/{id}</a></dd>
            <dt>Redirects to</dt>
            <dd><a href="{target}">{target}</a></dd>
        </dl>"#,
    );
    layout("Link Details", &body)
}

/// Render the not-found page for unknown short ids and unmatched routes
pub fn not_found_page() -> String {
    let body = r#"        <h2>Page Not Found</h2>
        <p>The short link you requested does not exist.
           <a href="/">Create one</a> instead.</p>"#;
    layout("Not Found", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x&y")</script>"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_form_page_escapes_submitted_value() {
        let page = new_url_page(Some("Please enter a valid URL"), "\"><script>");
        assert!(page.contains("Please enter a valid URL"));
        assert!(page.contains("&quot;&gt;&lt;script&gt;"));
        assert!(!page.contains("\"><script>"));
    }

    #[test]
    fn test_form_page_without_error() {
        let page = new_url_page(None, "");
        assert!(!page.contains("class=\"error\""));
        assert!(page.contains("method=\"post\""));
    }

    #[test]
    fn test_details_page_links_both_ways() {
        let page = link_details_page("76jopfac7", "https://example.com/");
        assert!(page.contains("/76jopfac7"));
        assert!(page.contains("https://example.com/"));
    }

    #[test]
    fn test_not_found_page() {
        let page = not_found_page();
        assert!(page.contains("Page Not Found"));
    }
}
