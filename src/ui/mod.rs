pub mod layout;
mod quiz;
mod summary;
mod topic;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

use crate::session::{Phase, Session};

pub use layout::{calculate_quiz_chunks, calculate_summary_chunks, calculate_topic_chunks};
pub use quiz::draw_quiz;
pub use summary::{accuracy_text, draw_summary};
pub use topic::{draw_topic_selection, wheel_label};

pub fn draw(f: &mut Frame, session: &Session) {
    match session.phase {
        Phase::TopicSelection => draw_topic_selection(f, session),
        Phase::QuizRunning => draw_quiz(f, session),
        Phase::Complete => draw_summary(f, session),
    }
}

/// One row of key hints: each key in bold cyan followed by what it does.
fn help_line(hints: &[(&str, &str)]) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(key.to_string(), key_style));
        spans.push(Span::from(format!(" {}  ", action)));
    }
    Line::from(spans)
}

fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}
