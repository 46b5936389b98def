//! HTML rendering of the upload/submit form.

const FORM_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/form.html"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashCategory {
    Success,
    Danger,
}

impl FlashCategory {
    fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

/// A one-shot message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub category: FlashCategory,
    pub text: String,
    pub link: Option<String>,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Success,
            text: text.into(),
            link: None,
        }
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Danger,
            text: text.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    fn to_html(&self) -> String {
        let text = escape_html(&self.text).replace('\n', "<br>");
        let link = self
            .link
            .as_deref()
            .map(|url| {
                format!(
                    " <a href=\"{}\" target=\"_blank\">Click here to view/download</a>",
                    escape_html(url)
                )
            })
            .unwrap_or_default();
        format!(
            "<div class=\"alert alert-{}\">{}{}</div>",
            self.category.css_class(),
            text,
            link
        )
    }
}

pub fn render_form(json_data: &str, messages: &[FlashMessage]) -> String {
    let messages_html: String = messages.iter().map(FlashMessage::to_html).collect();
    let json_html = escape_html(json_data);
    fill_placeholders(FORM_TEMPLATE, |key| match key {
        "messages" => Some(messages_html.as_str()),
        "json_data" => Some(json_html.as_str()),
        _ => None,
    })
}

/// Single pass over `{{key}}` markers, so substituted text is never re-expanded.
fn fill_placeholders<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start..].find("}}") else {
            break;
        };
        let marker = &rest[start..start + len + 2];
        out.push_str(&rest[..start]);
        match lookup(&marker[2..marker.len() - 2]) {
            Some(value) => out.push_str(value),
            None => out.push_str(marker),
        }
        rest = &rest[start + len + 2..];
    }

    out.push_str(rest);
    out
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
