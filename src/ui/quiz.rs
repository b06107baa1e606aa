use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{help_line, title_style};
use crate::models::{AnswerRecord, OptionLabel, Question};
use crate::session::{Pending, Session};
use crate::ui::layout::calculate_quiz_chunks;
use crate::utils::{estimate_wrapped_height, format_seconds, render_markdown, scroll_to_bottom};

fn option_line(question: &Question, label: OptionLabel) -> String {
    match &question.parsed {
        Ok(parsed) => format!("{}) {}", label, parsed.option(label)),
        Err(_) => label.to_string(),
    }
}

fn prompt_of(question: &Question) -> &str {
    match &question.parsed {
        Ok(parsed) => &parsed.prompt,
        Err(_) => &question.text,
    }
}

/// Lines describing one answered question, explanation included.
pub fn history_lines(number: usize, question: &Question, record: &AnswerRecord) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("Q{}. {}", number, prompt_of(question)),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    let (verdict, color) = if record.is_correct {
        ("Correct!", Color::Green)
    } else {
        ("Incorrect.", Color::Red)
    };
    lines.push(Line::from(vec![
        Span::from("Your answer: "),
        Span::styled(option_line(question, record.selected), Style::default().fg(color)),
        Span::from("  "),
        Span::styled(verdict, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ]));

    if !record.is_correct {
        let correct = match record.correct_answer {
            Some(label) => option_line(question, label),
            None => "Unknown".to_string(),
        };
        lines.push(Line::from(format!("Correct answer: {}", correct)));
        if let Some(explanation) = &record.explanation {
            lines.push(Line::from(Span::styled(
                "Explanation:",
                Style::default().add_modifier(Modifier::ITALIC),
            )));
            lines.extend(render_markdown(explanation));
        }
    }
    lines.push(Line::from(""));
    lines
}

pub fn draw_quiz(f: &mut Frame, session: &Session) {
    let layout = calculate_quiz_chunks(f.area());
    let topic = session.topic.as_deref().unwrap_or("Trivia");

    let progress = if session.questions.is_empty() {
        format!("Quiz - {}", topic)
    } else {
        format!(
            "Question {} / {} - {}",
            (session.current_index + 1).min(session.questions.len()),
            session.questions.len(),
            topic
        )
    };
    let header = Paragraph::new(progress)
        .style(title_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let mut history: Vec<Line> = Vec::new();
    for record in &session.records {
        if let Some(question) = session.questions.get(record.question_index) {
            history.extend(history_lines(record.question_index + 1, question, record));
        }
    }
    let inner_width = layout.history_area.width.saturating_sub(2) as usize;
    let inner_height = layout.history_area.height.saturating_sub(2) as usize;
    let scroll = scroll_to_bottom(estimate_wrapped_height(&history, inner_width), inner_height);
    let history = Paragraph::new(Text::from(history))
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title("Answered"));
    f.render_widget(history, layout.history_area);

    let question = Paragraph::new(question_text(session))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, layout.question_area);

    let mut status = vec![Span::from(format!("Time: {}s", format_seconds(session.elapsed)))];
    let message = match session.pending {
        Some(Pending::Grading { .. }) => Some(("Checking your answer...", Color::Yellow)),
        Some(Pending::Questions) => Some(("Generating questions...", Color::Yellow)),
        _ => session.notice.as_deref().map(|n| (n, Color::Yellow)),
    };
    if let Some((message, color)) = message {
        status.push(Span::from("  "));
        status.push(Span::styled(message.to_string(), Style::default().fg(color)));
    }
    let status = Paragraph::new(Line::from(status))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, layout.status_area);

    let mut hints = vec![("a-d", "Select"), ("↑/↓", "Move"), ("Enter", "Submit"), ("Esc", "Quit")];
    if session.is_stuck() {
        hints.insert(0, ("r", "Start over"));
    }
    let help = Paragraph::new(help_line(&hints))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn question_text(session: &Session) -> Text<'static> {
    let mut text = Text::default();
    let Some(question) = session.current_question() else {
        if session.pending == Some(Pending::Questions) {
            text.push_line(Line::from(format!(
                "Generating {} questions about {}...",
                session.question_count,
                session.topic.as_deref().unwrap_or("your topic")
            )));
        }
        return text;
    };

    match &question.parsed {
        Ok(parsed) => {
            text.push_line(Line::from(Span::styled(
                parsed.prompt.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            text.push_line(Line::from(""));
            for label in OptionLabel::ALL {
                let line = format!("{}) {}", label, parsed.option(label));
                if session.selected == Some(label) {
                    text.push_line(Line::from(Span::styled(
                        format!("▶ {}", line),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )));
                } else {
                    text.push_line(Line::from(format!("  {}", line)));
                }
            }
        }
        Err(e) => {
            for line in question.text.lines() {
                text.push_line(Line::from(line.to_string()));
            }
            text.push_line(Line::from(""));
            text.push_line(Line::from(Span::styled(
                format!("Error: {}", e),
                Style::default().fg(Color::Red),
            )));
        }
    }
    text
}
