use std::fmt;

use crate::error::QuizError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The answer the grader settled on, or `Unknown` when its reply was unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectAnswer {
    Label(OptionLabel),
    Unknown,
}

impl CorrectAnswer {
    pub fn label(self) -> Option<OptionLabel> {
        match self {
            Self::Label(label) => Some(label),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for CorrectAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => write!(f, "{}", label),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub is_correct: bool,
    pub correct_answer: CorrectAnswer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestion {
    pub prompt: String,
    pub options: [String; 4],
}

impl ParsedQuestion {
    pub fn option(&self, label: OptionLabel) -> &str {
        &self.options[label.index()]
    }
}

/// A generated question: the raw model text plus its parsed form, if it had one.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub text: String,
    pub parsed: Result<ParsedQuestion, QuizError>,
}

impl Question {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let parsed = crate::ai::parse::parse_question(&text);
        Self { text, parsed }
    }

    pub fn is_well_formed(&self) -> bool {
        self.parsed.is_ok()
    }

    /// Text handed back to the model for grading and explanations.
    pub fn grading_text(&self) -> String {
        match &self.parsed {
            Ok(parsed) => {
                let mut text = parsed.prompt.clone();
                for label in OptionLabel::ALL {
                    text.push_str(&format!("\n{}) {}", label, parsed.option(label)));
                }
                text
            }
            Err(_) => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub question_index: usize,
    pub selected: OptionLabel,
    pub is_correct: bool,
    pub correct_answer: Option<OptionLabel>,
    pub explanation: Option<String>,
}

/// Final tally shown on the completion screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    pub fn accuracy_percent(&self) -> f64 {
        if self.total > 0 {
            self.correct as f64 / self.total as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Work handed to the AI worker. `round` ties the reply to the session that asked.
#[derive(Debug, Clone, PartialEq)]
pub struct AiRequest {
    pub round: u64,
    pub task: AiTask,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AiTask {
    GenerateTopics {
        count: usize,
    },
    ValidateTopic {
        topic: String,
    },
    GenerateQuestions {
        topic: String,
        count: usize,
    },
    /// Grade an answer and, when it is wrong and `explain` is set, fetch the rationale.
    GradeAnswer {
        index: usize,
        question: String,
        selected: OptionLabel,
        explain: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiResponse {
    pub round: u64,
    pub outcome: AiOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AiOutcome {
    Topics(Result<Vec<String>, QuizError>),
    TopicValidated {
        topic: String,
        verdict: Result<(), QuizError>,
    },
    Questions(Result<Vec<Question>, QuizError>),
    Graded {
        index: usize,
        selected: OptionLabel,
        grade: Grade,
        explanation: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_char_is_case_insensitive() {
        assert_eq!(OptionLabel::from_char('a'), Some(OptionLabel::A));
        assert_eq!(OptionLabel::from_char('D'), Some(OptionLabel::D));
        assert_eq!(OptionLabel::from_char('E'), None);
    }

    #[test]
    fn test_label_cycling_wraps() {
        assert_eq!(OptionLabel::D.next(), OptionLabel::A);
        assert_eq!(OptionLabel::A.prev(), OptionLabel::D);
        assert_eq!(OptionLabel::B.next(), OptionLabel::C);
    }

    #[test]
    fn test_correct_answer_display() {
        assert_eq!(CorrectAnswer::Label(OptionLabel::C).to_string(), "C");
        assert_eq!(CorrectAnswer::Unknown.to_string(), "Unknown");
        assert_eq!(CorrectAnswer::Unknown.label(), None);
    }

    #[test]
    fn test_score_accuracy() {
        let score = Score { correct: 3, total: 5 };
        assert!((score.accuracy_percent() - 60.0).abs() < f64::EPSILON);
        assert_eq!(Score { correct: 0, total: 0 }.accuracy_percent(), 0.0);
    }

    #[test]
    fn test_grading_text_lists_options() {
        let question = Question::from_text(
            "What is Python?\nA) A programming language\nB) A snake\nC) A fruit\nD) A movie",
        );
        let text = question.grading_text();
        assert!(text.starts_with("What is Python?"));
        assert!(text.contains("\nA) A programming language"));
        assert!(text.contains("\nD) A movie"));
    }
}
