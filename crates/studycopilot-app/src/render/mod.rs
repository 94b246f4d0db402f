pub mod html;
pub mod terminal;

pub use html::{escape_html, render_message_content, render_transcript, render_turn};
pub use terminal::{wrap_text, TerminalRenderer};
