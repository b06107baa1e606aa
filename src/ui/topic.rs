use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Paragraph, Wrap,
    },
    Frame,
};

use super::{help_line, title_style};
use crate::session::{Pending, Session, TopicEntry};
use crate::ui::layout::calculate_topic_chunks;
use crate::utils::truncate_string;
use crate::wheel::TopicWheel;

const RADIUS: f64 = 1.0;
const LABEL_RADIUS: f64 = 0.62;
/// Above this many sectors the wheel shows numbers and the side list names them.
const MAX_NAMED_SECTORS: usize = 12;
const SECTOR_COLORS: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
];

/// Text printed inside sector `index`.
pub fn wheel_label(topic: &str, index: usize, sectors: usize) -> String {
    if sectors > MAX_NAMED_SECTORS {
        (index + 1).to_string()
    } else {
        truncate_string(topic, 12)
    }
}

/// Screen position at clockwise angle `degrees` from the top.
fn polar(degrees: f64, radius: f64) -> (f64, f64) {
    let rad = degrees.to_radians();
    (radius * rad.sin(), radius * rad.cos())
}

pub fn draw_topic_selection(f: &mut Frame, session: &Session) {
    let layout = calculate_topic_chunks(f.area());

    let header = Paragraph::new("Trivia Wheel")
        .style(title_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let wheel = session.wheel();
    match &wheel {
        Some(wheel) => draw_wheel(f, wheel, session.wheel_angle, layout.wheel_area),
        None => {
            let waiting = Paragraph::new("Generating topics...")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Wheel"));
            f.render_widget(waiting, layout.wheel_area);
        }
    }

    draw_side_panel(f, session, wheel.as_ref(), layout.side_area);

    let hints: &[(&str, &str)] = if session.topic.is_some() {
        &[("Enter", "Start quiz"), ("Esc", "Quit")]
    } else if matches!(session.entry, TopicEntry::Custom { .. }) {
        &[("Enter", "Submit topic"), ("Esc", "Back to wheel"), ("Ctrl+C", "Exit")]
    } else {
        &[("Enter", "Spin"), ("c", "Custom topic"), ("Esc", "Quit")]
    };
    let help = Paragraph::new(help_line(hints))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn draw_wheel(f: &mut Frame, wheel: &TopicWheel, angle: u32, area: ratatui::layout::Rect) {
    let n = wheel.len();
    let width = wheel.segment_degrees() as f64;
    let rotation = angle as f64;
    let labels: Vec<(f64, f64, String, Color)> = wheel
        .topics()
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            let (x, y) = polar((i as f64 + 0.5) * width + rotation, LABEL_RADIUS);
            let text = wheel_label(topic, i, n);
            // Center the label on its anchor.
            let x = x - text.chars().count() as f64 * 0.025;
            (x, y, text, SECTOR_COLORS[i % SECTOR_COLORS.len()])
        })
        .collect();

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title("Wheel"))
        .marker(Marker::Braille)
        .x_bounds([-1.3, 1.3])
        .y_bounds([-1.3, 1.3])
        .paint(move |ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: RADIUS,
                color: Color::White,
            });
            for i in 0..n {
                let (x2, y2) = polar(i as f64 * width + rotation, RADIUS);
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2,
                    y2,
                    color: Color::Gray,
                });
            }
            ctx.layer();
            for (x, y, text, color) in &labels {
                ctx.print(*x, *y, Span::styled(text.clone(), Style::default().fg(*color)));
            }
            ctx.print(
                -0.02,
                1.15,
                Span::styled(
                    "▼",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            );
        });
    f.render_widget(canvas, area);
}

fn draw_side_panel(
    f: &mut Frame,
    session: &Session,
    wheel: Option<&TopicWheel>,
    area: ratatui::layout::Rect,
) {
    let mut text = Text::default();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    if let Some(topic) = &session.topic {
        text.push_line(Line::from(vec![
            Span::from("The chosen topic is: "),
            Span::styled(topic.clone(), bold.fg(Color::Green)),
        ]));
        text.push_line(Line::from(""));
        text.push_line(Line::from(format!(
            "Press Enter to start a {}-question quiz.",
            session.question_count
        )));
        text.push_line(Line::from(""));
    }

    if let TopicEntry::Custom { input, error } = &session.entry
        && session.topic.is_none()
    {
        text.push_line(Line::from(Span::styled("Enter a custom topic:", bold)));
        text.push_line(Line::from(format!("> {}", input)));
        if session.pending == Some(Pending::TopicValidation) {
            text.push_line(Line::from(Span::styled(
                "Checking topic...",
                Style::default().fg(Color::Yellow),
            )));
        }
        if let Some(error) = error {
            text.push_line(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        text.push_line(Line::from(""));
    }

    if let Some(wheel) = wheel {
        let pointed = wheel.index_at(session.wheel_angle);
        text.push_line(Line::from(Span::styled("Topics:", bold)));
        for (i, topic) in wheel.topics().iter().enumerate() {
            let line = format!("{:>2}. {}", i + 1, topic);
            if session.spin.is_some() && i == pointed {
                text.push_line(Line::from(Span::styled(
                    line,
                    Style::default().fg(Color::Black).bg(Color::Yellow),
                )));
            } else if session.topic.as_deref() == Some(topic.as_str()) {
                text.push_line(Line::from(Span::styled(line, bold.fg(Color::Green))));
            } else {
                text.push_line(Line::from(line));
            }
        }
    }

    if let Some(notice) = &session.notice {
        text.push_line(Line::from(""));
        text.push_line(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Topic"));
    f.render_widget(panel, area);

    if let TopicEntry::Custom { input, .. } = &session.entry
        && session.topic.is_none()
        && session.pending.is_none()
    {
        // Border, then the prompt line, then the input line.
        let row = area.y + 2;
        let col = area.x + 3 + unicode_width::UnicodeWidthStr::width(input.as_str()) as u16;
        if col < area.right().saturating_sub(1) && row < area.bottom().saturating_sub(1) {
            f.set_cursor_position((col, row));
        }
    }
}
