//! Page renderer for the HPI studio.
//!
//! The studio serves a single HTML template (`studio/assets/index.html`)
//! with placeholder tokens like `{{TOKEN}}`.  The template is embedded at
//! compile time; `render_page` lets the caller fill the tokens it knows
//! about and blanks whatever is left.

use plant_hpi::HealthCategory;

const TEMPLATE: &str = include_str!("assets/index.html");

/// What the upload page shows under the form.
pub enum PageResult<'a> {
    /// Fresh page, nothing submitted yet.
    Empty,
    /// The submission failed with this message.
    Error(&'a str),
    /// A scored image and the URL path of its heat-map.
    Scored {
        score:        f64,
        category:     HealthCategory,
        spectral_url: &'a str,
    },
}

/// Renders the upload page.
pub fn render_page(result: PageResult<'_>) -> String {
    let html = match result {
        PageResult::Empty => TEMPLATE.to_owned(),
        PageResult::Error(msg) => TEMPLATE.replace(
            "{{ERROR_SECTION}}",
            &format!(r#"<div class="error-box">{}</div>"#, html_escape(msg)),
        ),
        PageResult::Scored { score, category, spectral_url } => TEMPLATE.replace(
            "{{RESULT_SECTION}}",
            &format!(
                r#"<div class="result-card">
  <h2>Result</h2>
  <p>Predicted HPI: <strong>{score:.2}</strong></p>
  <p>Health Status: <strong class="status-{class}">{category}</strong></p>
  <img class="spectral" src="{url}" alt="HPI heat-map">
</div>"#,
                score    = score,
                class    = category.label().to_ascii_lowercase(),
                category = category,
                url      = html_escape(spectral_url),
            ),
        ),
    };
    blank_remaining(html)
}

/// Escapes the five HTML-significant characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
     .replace('<', "&lt;")
     .replace('>', "&gt;")
     .replace('"', "&quot;")
     .replace('\'', "&#39;")
}

/// Replaces any `{{UPPERCASE_TOKEN}}` that wasn't already substituted with an
/// empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}
