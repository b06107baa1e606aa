use regex::Regex;
use serde::Deserialize;

use crate::error::QuizError;
use crate::models::{CorrectAnswer, Grade, OptionLabel, ParsedQuestion};

lazy_static::lazy_static! {
    static ref OPTION_LINE: Regex = Regex::new(r"([A-D])\)[ \t]+(.*)").unwrap();
    static ref ONLY_DIGITS_OR_SYMBOLS: Regex = Regex::new(r"^[0-9\W]+$").unwrap();
}

/// Used to top up the wheel when the model returns too few topics.
pub const FALLBACK_TOPICS: &[&str] = &[
    "World History",
    "Astronomy",
    "Geography",
    "Classic Literature",
    "Music",
    "Film",
    "Biology",
    "Mathematics",
    "Mythology",
    "Sports",
    "Computer Science",
    "Art History",
    "Chemistry",
    "Inventions",
    "Architecture",
    "Food and Cooking",
    "Oceans",
    "Languages",
    "Famous Scientists",
    "Ancient Egypt",
    "Dinosaurs",
    "Space Exploration",
    "Board Games",
    "Volcanoes",
    "Philosophy",
    "Olympic Games",
    "Economics",
    "Human Body",
    "Weather",
    "Video Games",
];

pub fn clean_json_response(response: &str) -> String {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    if let Some(start) = cleaned.find('{')
        && let Some(end) = cleaned.rfind('}')
        && start < end
    {
        cleaned = cleaned[start..=end].to_string();
    }

    cleaned.trim().to_string()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOptions {
    Labeled {
        #[serde(rename = "A", alias = "a")]
        a: String,
        #[serde(rename = "B", alias = "b")]
        b: String,
        #[serde(rename = "C", alias = "c")]
        c: String,
        #[serde(rename = "D", alias = "d")]
        d: String,
    },
    Listed(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    options: RawOptions,
}

fn strip_label(option: &str) -> &str {
    let trimmed = option.trim();
    let mut chars = trimmed.chars();
    if let (Some(c), Some(sep)) = (chars.next(), chars.next())
        && OptionLabel::from_char(c).is_some()
        && (sep == ')' || (sep == '.' && chars.as_str().starts_with(' ')))
    {
        return chars.as_str().trim();
    }
    trimmed
}

fn finish(prompt: &str, options: Vec<String>) -> Result<ParsedQuestion, QuizError> {
    let options: Vec<String> = options
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();

    let options: [String; 4] = options.try_into().map_err(|found: Vec<String>| {
        QuizError::MalformedQuestion(format!(
            "expected exactly four options (A, B, C, D), found {}",
            found.len()
        ))
    })?;

    Ok(ParsedQuestion {
        prompt: prompt.trim().to_string(),
        options,
    })
}

fn parse_structured(response: &str) -> Option<Result<ParsedQuestion, QuizError>> {
    let cleaned = clean_json_response(response);
    let raw: RawQuestion = serde_json::from_str(&cleaned).ok()?;
    let options = match raw.options {
        RawOptions::Labeled { a, b, c, d } => vec![a, b, c, d],
        // Listed options may carry their own "A)" prefixes.
        RawOptions::Listed(options) => options
            .iter()
            .map(|o| strip_label(o).to_string())
            .collect(),
    };
    Some(finish(&raw.question, options))
}

fn parse_labeled_lines(response: &str) -> Result<ParsedQuestion, QuizError> {
    let mut prompt_end = None;
    let mut options = Vec::new();
    for caps in OPTION_LINE.captures_iter(response) {
        if let (Some(whole), Some(text)) = (caps.get(0), caps.get(2)) {
            prompt_end.get_or_insert(whole.start());
            options.push(text.as_str().trim().to_string());
        }
    }

    let Some(prompt_end) = prompt_end else {
        return Err(QuizError::MalformedQuestion(
            "no labeled options found".to_string(),
        ));
    };

    finish(&response[..prompt_end], options)
}

/// Parse a generated question, preferring the JSON contract and falling back to
/// `A)`..`D)` lines when the model answered in prose.
pub fn parse_question(response: &str) -> Result<ParsedQuestion, QuizError> {
    match parse_structured(response) {
        Some(result) => result,
        None => parse_labeled_lines(response),
    }
}

/// Interpret a single-letter grading reply.
pub fn parse_grade(response: &str, user_label: OptionLabel) -> Grade {
    let correct = response
        .trim()
        .chars()
        .next()
        .filter(|c| ('A'..='D').contains(c))
        .and_then(OptionLabel::from_char);

    match correct {
        Some(label) => Grade {
            is_correct: label == user_label,
            correct_answer: CorrectAnswer::Label(label),
        },
        None => Grade {
            is_correct: false,
            correct_answer: CorrectAnswer::Unknown,
        },
    }
}

/// Split a newline-separated topic list into exactly `n` entries.
pub fn parse_topics(response: &str, n: usize) -> Vec<String> {
    let mut topics: Vec<String> = response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .take(n)
        .collect();

    if topics.len() < n {
        for fallback in FALLBACK_TOPICS {
            if topics.len() == n {
                break;
            }
            if !topics.iter().any(|t| t.eq_ignore_ascii_case(fallback)) {
                topics.push(fallback.to_string());
            }
        }
    }

    // More segments than fallbacks; repeat rather than leave the wheel short.
    let mut i = 0;
    while topics.len() < n {
        topics.push(FALLBACK_TOPICS[i % FALLBACK_TOPICS.len()].to_string());
        i += 1;
    }

    topics
}

pub fn parse_verdict(response: &str) -> bool {
    response
        .trim()
        .trim_end_matches('.')
        .eq_ignore_ascii_case("VALID")
}

/// True when the text holds no letters at all, only digits, punctuation or spaces.
pub fn is_only_digits_or_symbols(text: &str) -> bool {
    ONLY_DIGITS_OR_SYMBOLS.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROSE_QUESTION: &str = "1. What is Python?
            A) A programming language
            B) A snake
            C) A type of fruit
            D) A movie";

    #[test]
    fn test_clean_json_response_simple() {
        let json = r#"{"question":"Q"}"#;
        assert_eq!(clean_json_response(json), r#"{"question":"Q"}"#);
    }

    #[test]
    fn test_clean_json_response_markdown() {
        let json = "```json\n{\"question\": \"Q\"}\n```";
        assert_eq!(clean_json_response(json), r#"{"question": "Q"}"#);
    }

    #[test]
    fn test_clean_json_response_with_text() {
        let json = r#"Here's your question: {"question": "Q"} enjoy"#;
        assert_eq!(clean_json_response(json), r#"{"question": "Q"}"#);
    }

    #[test]
    fn test_parse_structured_labeled_options() {
        let json = r#"{"question": "Largest planet?", "options": {"A": "Mars", "B": "Jupiter", "C": "Venus", "D": "Earth"}}"#;
        let parsed = parse_question(json).unwrap();
        assert_eq!(parsed.prompt, "Largest planet?");
        assert_eq!(parsed.option(OptionLabel::B), "Jupiter");
    }

    #[test]
    fn test_parse_structured_listed_options_strip_labels() {
        let json = r#"```json
{"question": "Largest planet?", "options": ["A) Mars", "B) Jupiter", "C) Venus", "D) Earth"]}
```"#;
        let parsed = parse_question(json).unwrap();
        assert_eq!(parsed.options[0], "Mars");
        assert_eq!(parsed.options[3], "Earth");
    }

    #[test]
    fn test_initials_in_options_survive_parsing() {
        let prose = "Who wrote Winnie-the-Pooh?
A) A. A. Milne
B) C. S. Lewis
C) D. H. Lawrence
D) B) Traven";
        let json = r#"{"question": "Who wrote Winnie-the-Pooh?", "options": {"A": "A. A. Milne", "B": "C. S. Lewis", "C": "D. H. Lawrence", "D": "B) Traven"}}"#;

        for text in [prose, json] {
            let parsed = parse_question(text).unwrap();
            assert_eq!(parsed.option(OptionLabel::A), "A. A. Milne");
            assert_eq!(parsed.option(OptionLabel::B), "C. S. Lewis");
            assert_eq!(parsed.option(OptionLabel::C), "D. H. Lawrence");
            assert_eq!(parsed.option(OptionLabel::D), "B) Traven");
        }
    }

    #[test]
    fn test_parse_structured_with_three_options_is_malformed() {
        let json = r#"{"question": "Q", "options": ["x", "y", "z"]}"#;
        assert!(matches!(
            parse_question(json),
            Err(QuizError::MalformedQuestion(_))
        ));
    }

    #[test]
    fn test_parse_prose_fallback() {
        let parsed = parse_question(PROSE_QUESTION).unwrap();
        assert_eq!(parsed.prompt, "1. What is Python?");
        assert_eq!(parsed.option(OptionLabel::A), "A programming language");
        assert_eq!(parsed.option(OptionLabel::D), "A movie");
    }

    #[test]
    fn test_parse_prose_with_empty_option_is_malformed() {
        let text = "Q?\nA) one\nB) two\nC) three\nD) ";
        assert!(parse_question(text).is_err());
    }

    #[test]
    fn test_parse_prose_without_options_is_malformed() {
        assert!(matches!(
            parse_question("Tell me about Rome."),
            Err(QuizError::MalformedQuestion(_))
        ));
    }

    #[test]
    fn test_parse_grade_matching_label() {
        let grade = parse_grade("A", OptionLabel::A);
        assert!(grade.is_correct);
        assert_eq!(grade.correct_answer, CorrectAnswer::Label(OptionLabel::A));
    }

    #[test]
    fn test_parse_grade_other_label() {
        let grade = parse_grade(" A\n", OptionLabel::B);
        assert!(!grade.is_correct);
        assert_eq!(grade.correct_answer, CorrectAnswer::Label(OptionLabel::A));
    }

    #[test]
    fn test_parse_grade_unusable_reply() {
        for reply in ["", "The", "e", "1"] {
            let grade = parse_grade(reply, OptionLabel::A);
            assert!(!grade.is_correct);
            assert_eq!(grade.correct_answer, CorrectAnswer::Unknown);
        }
    }

    #[test]
    fn test_parse_topics_truncates() {
        let topics = parse_topics("History\nScience\nArt\nMusic", 3);
        assert_eq!(topics, vec!["History", "Science", "Art"]);
    }

    #[test]
    fn test_parse_topics_pads_short_lists() {
        let topics = parse_topics("History\n\n  Astronomy \n", 4);
        assert_eq!(topics.len(), 4);
        assert_eq!(topics[0], "History");
        assert_eq!(topics[1], "Astronomy");
        assert_eq!(topics[2], "World History");
        assert_eq!(topics[3], "Geography");
    }

    #[test]
    fn test_parse_topics_never_short_even_when_empty() {
        assert_eq!(parse_topics("", 30).len(), 30);
        assert_eq!(parse_topics("", 45).len(), 45);
    }

    #[test]
    fn test_parse_verdict() {
        assert!(parse_verdict("VALID"));
        assert!(parse_verdict(" valid.\n"));
        assert!(!parse_verdict("INVALID"));
        assert!(!parse_verdict("It is VALID"));
    }

    #[test]
    fn test_only_digits_or_symbols() {
        assert!(is_only_digits_or_symbols("123"));
        assert!(is_only_digits_or_symbols("!!!"));
        assert!(is_only_digits_or_symbols("12 - 34?"));
        assert!(!is_only_digits_or_symbols("Python"));
        assert!(!is_only_digits_or_symbols("1920s jazz"));
    }
}
