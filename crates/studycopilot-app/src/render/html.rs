use pulldown_cmark::{html, Event, Options, Parser};

use crate::types::{ChatTurn, Role, SessionState, PAGE_TITLE, TAGLINE};

const USER_OUTER_STYLE: &str = "text-align:right; margin:8px;";
const USER_INNER_STYLE: &str = "display:inline-block; padding:10px 14px; \
    background:#3b82f6; color:white; border-radius:12px; \
    max-width:70%; word-wrap:break-word;";

const ASSISTANT_OUTER_STYLE: &str = "text-align:left; margin:8px;";
const ASSISTANT_INNER_STYLE: &str = "display:inline-block; padding:10px 14px; \
    background:white; color:black; border-radius:12px; \
    border:1px solid #eee; max-width:70%; word-wrap:break-word;";

/// Escape HTML to prevent XSS
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render markdown to HTML. Raw HTML in the source is shown as text.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Render a message body, either as markdown or as escaped text
pub fn render_message_content(content: &str, use_markdown: bool) -> String {
    if use_markdown {
        render_markdown(content)
    } else {
        escape_html(content).replace('\n', "<br>")
    }
}

fn bubble(outer_style: &str, inner_style: &str, body: &str) -> String {
    format!(
        "<div style='{}'>\n    <div style='{}'>{}</div>\n</div>",
        outer_style, inner_style, body
    )
}

pub fn user_bubble(content: &str) -> String {
    bubble(USER_OUTER_STYLE, USER_INNER_STYLE, &render_message_content(content, false))
}

pub fn assistant_bubble(content: &str, use_markdown: bool) -> String {
    bubble(
        ASSISTANT_OUTER_STYLE,
        ASSISTANT_INNER_STYLE,
        &render_message_content(content, use_markdown),
    )
}

/// One chat turn as an HTML bubble. User text is never rendered as markdown.
pub fn render_turn(turn: &ChatTurn, use_markdown: bool) -> String {
    match turn.role {
        Role::User => user_bubble(&turn.content),
        Role::Assistant => assistant_bubble(&turn.content, use_markdown),
    }
}

/// Standalone HTML page with the whole conversation
pub fn render_transcript(state: &SessionState, use_markdown: bool) -> String {
    let bubbles = state
        .chat_history
        .iter()
        .map(|turn| render_turn(turn, use_markdown))
        .collect::<Vec<_>>()
        .join("\n");

    let document = if state.pdf_uploaded { "PDF uploaded" } else { "none" };

    format!(
        "<!DOCTYPE html>\n\
<html>\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<title>{title}</title>\n\
</head>\n\
<body style='font-family:sans-serif; max-width:960px; margin:auto;'>\n\
<h1>{title}</h1>\n\
<p>{tagline}</p>\n\
<aside style='color:#666;'>⚙️ Model: {model} &middot; Temperature: {temperature:.1} &middot; 📄 Document: {document}</aside>\n\
<main>\n\
{bubbles}\n\
</main>\n\
</body>\n\
</html>\n",
        title = escape_html(PAGE_TITLE),
        tagline = escape_html(TAGLINE),
        model = state.options.model.display_name(),
        temperature = state.options.temperature,
        document = document,
        bubbles = bubbles,
    )
}
