//! Server-rendered HTML. Every piece of user text goes through `escape`.

use std::fmt::Write;

use axum::http::StatusCode;

use diary_db::models::DiaryRow;

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
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<title>{title}</title>
</head>
<body>
{body}
</body>
</html>
",
        title = escape(title),
        body = body,
    )
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|e| format!("<p class=\"error\">{}</p>\n", escape(e)))
        .unwrap_or_default()
}

fn nav() -> &'static str {
    "<nav>
<a href=\"/index\">Diary</a>
<a href=\"/user_notes\">My notes</a>
<form method=\"post\" action=\"/logout\"><button type=\"submit\">Log out</button></form>
</nav>
"
}

pub fn login_page(error: Option<&str>) -> String {
    let body = format!(
        "<h1>Log in</h1>
{error}<form method=\"post\" action=\"/login\">
<label>Username <input name=\"username\" required></label>
<label>Password <input type=\"password\" name=\"password\" required></label>
<button type=\"submit\">Log in</button>
</form>
<p>No account? <a href=\"/register\">Register</a></p>",
        error = error_banner(error),
    );
    layout("Log in", &body)
}

pub fn register_page(error: Option<&str>) -> String {
    let body = format!(
        "<h1>Register</h1>
{error}<form method=\"post\" action=\"/register\">
<label>Username <input name=\"username\" maxlength=\"255\" required></label>
<label>Password <input type=\"password\" name=\"password\" required></label>
<button type=\"submit\">Register</button>
</form>
<p>Already registered? <a href=\"/login\">Log in</a></p>",
        error = error_banner(error),
    );
    layout("Register", &body)
}

fn diary_list(diaries: &[DiaryRow], editable: bool) -> String {
    if diaries.is_empty() {
        return "<p class=\"empty\">No diaries yet.</p>\n".to_string();
    }

    let mut out = String::from("<ul class=\"diaries\">\n");
    for diary in diaries {
        let _ = write!(
            out,
            "<li class=\"diary\">\n<h2>{}</h2>\n<time>{}</time>\n<p>{}</p>\n",
            escape(&diary.title),
            escape(&diary.created_at),
            escape(diary.content.as_deref().unwrap_or_default()),
        );
        if editable {
            let _ = write!(
                out,
                "<a href=\"/edit/{id}\">Edit</a>
<form method=\"post\" action=\"/delete/{id}\"><button type=\"submit\">Delete</button></form>\n",
                id = diary.id,
            );
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");
    out
}

pub fn index_page(username: &str, diaries: &[DiaryRow]) -> String {
    let body = format!(
        "{nav}<h1>My diary</h1>
<p class=\"account\">Signed in as {username}</p>
<form method=\"post\" action=\"/add\">
<label>Title <input name=\"title\" maxlength=\"255\" required></label>
<label>Content <textarea name=\"content\"></textarea></label>
<button type=\"submit\">Add</button>
</form>
{list}",
        nav = nav(),
        username = escape(username),
        list = diary_list(diaries, true),
    );
    layout("My diary", &body)
}

pub fn user_notes_page(diaries: &[DiaryRow]) -> String {
    let body = format!(
        "{nav}<h1>My notes</h1>\n{list}",
        nav = nav(),
        list = diary_list(diaries, false),
    );
    layout("My notes", &body)
}

pub fn edit_page(diary: &DiaryRow) -> String {
    let body = format!(
        "{nav}<h1>Edit diary</h1>
<form method=\"post\" action=\"/edit/{id}\">
<label>Title <input name=\"title\" maxlength=\"255\" value=\"{title}\" required></label>
<label>Content <textarea name=\"content\">{content}</textarea></label>
<button type=\"submit\">Save</button>
</form>",
        nav = nav(),
        id = diary.id,
        title = escape(&diary.title),
        content = escape(diary.content.as_deref().unwrap_or_default()),
    );
    layout("Edit diary", &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let heading = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/index\">Back to diary</a></p>",
        escape(heading),
        escape(message),
    );
    layout(heading, &body)
}
