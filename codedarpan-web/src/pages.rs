//! Page markup for the web front-end.

use chrono::NaiveDate;
use codedarpan_core::{UiState, html_escape, render_document, render_report_html};

/// Route serving the certificate image.
pub const CERTIFICATE_PATH: &str = "/certificate.png";

/// Render the single page for `state`.
///
/// `downloadable` controls whether the certificate download link is offered.
pub fn render_index(state: &UiState, issued_on: NaiveDate, downloadable: bool) -> String {
    let mut body = String::new();
    body.push_str(&render_hero(state));
    if let Some(report) = &state.report {
        let download = downloadable.then_some(CERTIFICATE_PATH);
        body.push_str(&render_report_html(report, &state.url, issued_on, download));
    }
    let page = render_document("CodeDarpan", &body);
    if state.loading {
        // Poll until the outstanding analysis lands.
        page.replacen(
            "<head>",
            "<head>\n    <meta http-equiv=\"refresh\" content=\"2\">",
            1,
        )
    } else {
        page
    }
}

fn render_hero(state: &UiState) -> String {
    let (disabled, button) = if state.loading {
        (" disabled", r#"<span class="loader"></span>"#)
    } else {
        ("", "→")
    };
    let error = state
        .error_message
        .as_deref()
        .map(|message| format!(r#"<div class="error">{}</div>"#, html_escape(message)))
        .unwrap_or_default();

    format!(
        r#"<div class="hero">
    <h1 class="header">Code<span class="gradient-text">Darpan</span></h1>
    <p class="sub-header">The AI Mirror for your Code. <strong>Reflect. Analyze. Improve.</strong></p>
    <form class="input-wrapper" method="post" action="/analyze">
        <input type="text" name="url" placeholder="Paste GitHub Repository URL..." value="{url}"{disabled} autofocus>
        <button type="submit" class="search-btn"{disabled}>{button}</button>
    </form>
    {error}
</div>"#,
        url = html_escape(&state.url),
    )
}
