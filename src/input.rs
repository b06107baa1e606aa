use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::OptionLabel;
use crate::session::{Event, Phase, Session, TopicEntry};

/// What a key press asks the app to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Event(Event),
    /// Spin the wheel; the app owns the randomness.
    Spin,
    Quit,
    None,
}

pub fn map_key(session: &Session, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match session.phase {
        Phase::TopicSelection => map_topic_key(session, key),
        Phase::QuizRunning => map_quiz_key(session, key),
        Phase::Complete => match key.code {
            KeyCode::Char('p') | KeyCode::Char('P') => Action::Event(Event::PlayAgain),
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        },
    }
}

fn map_topic_key(session: &Session, key: KeyEvent) -> Action {
    if session.topic.is_some() {
        return match key.code {
            KeyCode::Enter | KeyCode::Char('s') => Action::Event(Event::StartQuiz),
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        };
    }

    match &session.entry {
        TopicEntry::Custom { .. } => match key.code {
            KeyCode::Enter => Action::Event(Event::SubmitCustomTopic),
            KeyCode::Backspace => Action::Event(Event::CustomTopicBackspace),
            KeyCode::Esc => Action::Event(Event::CancelCustomTopic),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::Event(Event::CustomTopicInput(c))
            }
            _ => Action::None,
        },
        TopicEntry::Wheel => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Action::Spin,
            KeyCode::Char('c') => Action::Event(Event::ChooseCustomTopic),
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        },
    }
}

fn map_quiz_key(session: &Session, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('r') => Action::Event(Event::PlayAgain),
        KeyCode::Char(c) => OptionLabel::from_char(c)
            .map_or(Action::None, |label| Action::Event(Event::SelectOption(label))),
        KeyCode::Down | KeyCode::Tab => {
            let label = session.selected.map_or(OptionLabel::A, OptionLabel::next);
            Action::Event(Event::SelectOption(label))
        }
        KeyCode::Up | KeyCode::BackTab => {
            let label = session.selected.map_or(OptionLabel::D, OptionLabel::prev);
            Action::Event(Event::SelectOption(label))
        }
        KeyCode::Enter => Action::Event(Event::SubmitAnswer),
        KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let mut session = Session::default();
        assert_eq!(map_key(&session, ctrl_c), Action::Quit);
        session.entry = TopicEntry::Custom {
            input: String::new(),
            error: None,
        };
        assert_eq!(map_key(&session, ctrl_c), Action::Quit);
        session.phase = Phase::QuizRunning;
        assert_eq!(map_key(&session, ctrl_c), Action::Quit);
    }

    #[test]
    fn test_wheel_keys() {
        let session = Session::default();
        assert_eq!(map_key(&session, key(KeyCode::Enter)), Action::Spin);
        assert_eq!(
            map_key(&session, key(KeyCode::Char('c'))),
            Action::Event(Event::ChooseCustomTopic)
        );
        assert_eq!(map_key(&session, key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn test_custom_entry_captures_text() {
        let mut session = Session::default();
        session.entry = TopicEntry::Custom {
            input: String::new(),
            error: None,
        };
        assert_eq!(
            map_key(&session, key(KeyCode::Char('q'))),
            Action::Event(Event::CustomTopicInput('q'))
        );
        assert_eq!(
            map_key(&session, key(KeyCode::Esc)),
            Action::Event(Event::CancelCustomTopic)
        );
        assert_eq!(
            map_key(&session, key(KeyCode::Enter)),
            Action::Event(Event::SubmitCustomTopic)
        );
    }

    #[test]
    fn test_chosen_topic_starts_quiz() {
        let mut session = Session::default();
        session.topic = Some("Art".to_string());
        assert_eq!(
            map_key(&session, key(KeyCode::Enter)),
            Action::Event(Event::StartQuiz)
        );
    }

    #[test]
    fn test_quiz_option_keys() {
        let mut session = Session::default();
        session.phase = Phase::QuizRunning;
        assert_eq!(
            map_key(&session, key(KeyCode::Char('b'))),
            Action::Event(Event::SelectOption(OptionLabel::B))
        );
        assert_eq!(
            map_key(&session, key(KeyCode::Char('D'))),
            Action::Event(Event::SelectOption(OptionLabel::D))
        );
        assert_eq!(
            map_key(&session, key(KeyCode::Down)),
            Action::Event(Event::SelectOption(OptionLabel::A))
        );
        session.selected = Some(OptionLabel::A);
        assert_eq!(
            map_key(&session, key(KeyCode::Up)),
            Action::Event(Event::SelectOption(OptionLabel::D))
        );
        assert_eq!(map_key(&session, key(KeyCode::Char('x'))), Action::None);
        assert_eq!(
            map_key(&session, key(KeyCode::Enter)),
            Action::Event(Event::SubmitAnswer)
        );
    }

    #[test]
    fn test_complete_screen_keys() {
        let mut session = Session::default();
        session.phase = Phase::Complete;
        assert_eq!(
            map_key(&session, key(KeyCode::Char('p'))),
            Action::Event(Event::PlayAgain)
        );
        assert_eq!(map_key(&session, key(KeyCode::Char('q'))), Action::Quit);
    }
}
