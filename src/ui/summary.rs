use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{help_line, title_style};
use crate::models::Score;
use crate::session::Session;
use crate::ui::layout::calculate_summary_chunks;
use crate::utils::{format_seconds, truncate_string};

pub fn accuracy_text(score: Score) -> String {
    format!(
        "Your accuracy: {}/{} ({:.2}%)",
        score.correct,
        score.total,
        score.accuracy_percent()
    )
}

pub fn draw_summary(f: &mut Frame, session: &Session) {
    let layout = calculate_summary_chunks(f.area());

    let title = Paragraph::new("Game Over!")
        .style(title_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let mut text = Text::default();
    if let Some(topic) = &session.topic {
        text.push_line(Line::from(format!("Topic: {}", topic)));
        text.push_line(Line::from(""));
    }
    text.push_line(Line::from(Span::styled(
        accuracy_text(session.score()),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    text.push_line(Line::from(format!(
        "Total time: {} seconds",
        format_seconds(session.elapsed)
    )));
    text.push_line(Line::from(""));

    let width = layout.content_area.width.saturating_sub(10) as usize;
    for record in &session.records {
        let Some(question) = session.questions.get(record.question_index) else {
            continue;
        };
        let prompt = match &question.parsed {
            Ok(parsed) => parsed.prompt.as_str(),
            Err(_) => question.text.as_str(),
        };
        let (mark, color) = if record.is_correct {
            ("[✓]", Color::Green)
        } else {
            ("[✗]", Color::Red)
        };
        text.push_line(Line::from(vec![
            Span::styled(mark, Style::default().fg(color)),
            Span::from(format!(
                " {}. {}",
                record.question_index + 1,
                truncate_string(prompt, width)
            )),
        ]));
    }

    text.push_line(Line::from(""));
    text.push_line(Line::from(Span::styled(
        "Thank you for playing!",
        Style::default().fg(Color::Cyan),
    )));

    let summary = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(summary, layout.content_area);

    let help = Paragraph::new(help_line(&[("p", "Play again"), ("q", "Quit")]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}
