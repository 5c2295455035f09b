//! Minimal HTML forms for sign-up and login

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::users::CredentialError;
use crate::utils::responses::ResponseBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPage {
    Signup,
    Login,
}

impl FormPage {
    const fn title(self) -> &'static str {
        match self {
            Self::Signup => "Sign up",
            Self::Login => "Log in",
        }
    }

    const fn action(self) -> &'static str {
        match self {
            Self::Signup => "/signup",
            Self::Login => "/login",
        }
    }

    const fn fields(self) -> &'static [(&'static str, &'static str, &'static str)] {
        match self {
            Self::Signup => &[
                ("email", "Email", "email"),
                ("firstName", "First name", "text"),
                ("lastName", "Last name", "text"),
                ("password", "Password", "password"),
                ("confirmPassword", "Confirm password", "password"),
            ],
            Self::Login => &[
                ("email", "Email", "email"),
                ("password", "Password", "password"),
            ],
        }
    }
}

/// Render the form, optionally with an error banner
#[must_use]
pub fn render_form(page: FormPage, error: Option<&str>) -> String {
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n",
        title = page.title()
    );
    if let Some(error) = error {
        html.push_str(&format!(
            "<p class=\"error\">{}</p>\n",
            escape_html(error)
        ));
    }
    html.push_str(&format!(
        "<form method=\"post\" action=\"{}\">\n",
        page.action()
    ));
    for (name, label, input_type) in page.fields() {
        html.push_str(&format!(
            "<label>{label} <input type=\"{input_type}\" name=\"{name}\" required></label><br>\n"
        ));
    }
    html.push_str(&format!(
        "<button type=\"submit\">{}</button>\n</form>\n</body>\n</html>\n",
        page.title()
    ));
    html
}

/// Blank form, 200
#[must_use]
pub fn form_page(page: FormPage) -> HttpResponse {
    ResponseBuilder::page(StatusCode::OK).body(render_form(page, None))
}

/// Form re-rendered with the error's message and status
#[must_use]
pub fn form_error(page: FormPage, error: CredentialError) -> HttpResponse {
    ResponseBuilder::page(error.status_code()).body(render_form(page, Some(&error.to_string())))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
