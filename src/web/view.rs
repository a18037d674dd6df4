//! The single page: a render model built from an explicit session, and the
//! HTML template it is poured into.

use minijinja::{Environment, context};
use serde::Serialize;

use crate::api::extractors::SessionRecord;
use crate::error::AppError;
use crate::services::upload::UploadOutcome;
use crate::web::auth::AuthEndpoints;

pub const PAGE_TITLE: &str = "Login and download";
pub const HEADING: &str = "Login and upload file";

pub const NO_USER_DATA: &str = "No user data available";
pub const PLEASE_LOG_IN: &str = "Please log in to upload files.";
pub const LOGGED_IN: &str = "You are logged in, you can upload files.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub lines: Vec<String>,
    pub show_upload: bool,
    pub notice: Option<Notice>,
}

/// Build the page for one request.
///
/// The outcome is only looked at for an authenticated session.
pub fn render(session: &SessionRecord, outcome: Option<&UploadOutcome>) -> Page {
    if !session.is_authenticated {
        return Page {
            lines: vec![NO_USER_DATA.to_string(), PLEASE_LOG_IN.to_string()],
            show_upload: false,
            notice: None,
        };
    }

    let mut lines: Vec<String> = session
        .profile_lines()
        .into_iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect();
    lines.push(LOGGED_IN.to_string());

    let notice = outcome.map(|outcome| match outcome {
        UploadOutcome::Accepted(file) => Notice {
            kind: NoticeKind::Accepted,
            text: format!("Uploaded file content: {}", bytes_literal(&file.content)),
        },
        UploadOutcome::Rejected(rejection) => Notice {
            kind: NoticeKind::Rejected,
            text: rejection.user_message(),
        },
    });

    Page {
        lines,
        show_upload: true,
        notice,
    }
}

/// Byte-string literal in Python's `repr(bytes)` form.
///
/// Single quotes delimit unless the content has a `'` and no `"`; only the
/// delimiter and backslash are escaped, non-printables become `\t \n \r \xNN`.
pub fn bytes_literal(content: &[u8]) -> String {
    let quote = if content.contains(&b'\'') && !content.contains(&b'"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(content.len() + 3);
    out.push('b');
    out.push(quote);
    for &b in content {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            _ if char::from(b) == quote => {
                out.push('\\');
                out.push(quote);
            }
            0x20..=0x7e => out.push(char::from(b)),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out.push(quote);
    out
}

const PAGE_TEMPLATE: &str = "page.html";

#[derive(Debug)]
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, AppError> {
        let mut env = Environment::new();
        // .html names get HTML auto-escaping
        env.add_template(PAGE_TEMPLATE, include_str!("templates/page.html"))?;
        Ok(Self { env })
    }

    pub fn to_html(&self, page: &Page, auth: &AuthEndpoints) -> Result<String, AppError> {
        let template = self.env.get_template(PAGE_TEMPLATE)?;
        let html = template.render(context! {
            title => PAGE_TITLE,
            heading => HEADING,
            login_label => auth.login_label(),
            page => page,
        })?;
        Ok(html)
    }
}
