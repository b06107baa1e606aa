use crate::ai::client::{ChatMessage, ChatRequest, LlmGateway};
use crate::ai::parse::{is_only_digits_or_symbols, parse_grade, parse_topics, parse_verdict};
use crate::config::ModelSet;
use crate::error::QuizError;
use crate::logger;
use crate::models::{CorrectAnswer, Grade, OptionLabel, Question};

pub const NO_EXPLANATION: &str = "No explanation available.";
pub const REAL_TOPIC_REQUIRED: &str = "Please enter a real topic.";

/// Client-side checks on a custom topic, run before the model is consulted.
/// Returns the trimmed topic.
pub fn precheck_topic(raw: &str) -> Result<String, QuizError> {
    let topic = raw.trim();

    if topic.chars().count() < 2 {
        return Err(QuizError::InvalidTopic(
            "Topic must be at least 2 characters long.".to_string(),
        ));
    }

    if is_only_digits_or_symbols(topic) {
        return Err(QuizError::InvalidTopic(
            "Topic cannot be just numbers or special characters.".to_string(),
        ));
    }

    Ok(topic.to_string())
}

/// Question generation, grading and explanations on top of a chat gateway.
pub struct QuizEngine<G> {
    gateway: G,
    models: ModelSet,
}

impl<G: LlmGateway> QuizEngine<G> {
    pub fn new(gateway: G, models: ModelSet) -> Self {
        Self { gateway, models }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn generate_topics(&self, n: usize) -> Result<Vec<String>, QuizError> {
        let prompt = format!(
            "Your output MUST consist of EXACTLY {} different topics for a quiz, separated ONLY by a newline. \
             Do not write an introduction such as \"Here is the output:\", just the topics, not numbered.",
            n
        );
        let response = self
            .gateway
            .complete(ChatRequest::single(self.models.topics(), prompt))
            .await?;

        let lines = response.lines().filter(|l| !l.trim().is_empty()).count();
        if lines < n {
            logger::warn(&format!(
                "Asked for {} topics, model returned {}; padding with fallbacks",
                n, lines
            ));
        }
        Ok(parse_topics(&response, n))
    }

    /// Ask for `n` questions one at a time, feeding earlier ones back as context.
    pub async fn generate_questions(
        &self,
        topic: &str,
        n: usize,
    ) -> Result<Vec<Question>, QuizError> {
        let mut questions: Vec<Question> = Vec::with_capacity(n);

        for i in 0..n {
            let previous: Vec<&str> = questions
                .iter()
                .map(|q| match &q.parsed {
                    Ok(parsed) => parsed.prompt.as_str(),
                    Err(_) => q.text.as_str(),
                })
                .collect();

            let prompt = format!(
                r#"Ask a multiple choice question about {topic}.
Provide exactly four options labeled A, B, C and D.
Make sure it is different from these existing questions: {previous:?}

Respond ONLY with this exact JSON structure (no markdown, no extra text):
{{
    "question": "the question text",
    "options": {{"A": "option", "B": "option", "C": "option", "D": "option"}}
}}"#
            );

            let request = ChatRequest {
                config: self.models.questions(),
                messages: vec![
                    ChatMessage::system("You write clear, factual trivia questions."),
                    ChatMessage::user(prompt),
                ],
            };
            let response = self.gateway.complete(request).await?;
            let question = Question::from_text(response.trim());
            if let Err(e) = &question.parsed {
                logger::warn(&format!("Question {} for '{}' unusable: {}", i + 1, topic, e));
            }
            questions.push(question);
        }

        Ok(questions)
    }

    /// Ask the model which option is correct and compare it with the user's pick.
    /// Any failure degrades to an `Unknown` answer graded as incorrect.
    pub async fn check_answer(&self, question: &str, user_answer: OptionLabel) -> Grade {
        let prompt = format!(
            "Question: {}\n\n\
             Please provide ONLY a single uppercase letter (A, B, C, or D) representing the correct answer.\n\
             Do not provide any explanation or additional text.",
            question
        );

        match self
            .gateway
            .complete(ChatRequest::single(self.models.grading(), prompt))
            .await
        {
            Ok(response) => {
                let grade = parse_grade(&response, user_answer);
                if grade.correct_answer == CorrectAnswer::Unknown {
                    logger::warn(&format!("Unusable grading reply: {:?}", response));
                }
                grade
            }
            Err(e) => {
                logger::warn(&format!("Grading failed: {}", e));
                Grade {
                    is_correct: false,
                    correct_answer: CorrectAnswer::Unknown,
                }
            }
        }
    }

    pub async fn get_explanation(&self, question: &str, correct_answer: CorrectAnswer) -> String {
        let prompt = format!(
            "Question: {}\nThe correct answer is: {}.\n\
             Please provide a detailed explanation for why this is the correct answer.",
            question, correct_answer
        );

        match self
            .gateway
            .complete(ChatRequest::single(self.models.explanation(), prompt))
            .await
        {
            Ok(response) if !response.trim().is_empty() => response.trim().to_string(),
            Ok(_) => NO_EXPLANATION.to_string(),
            Err(e) => {
                logger::warn(&format!("Explanation failed: {}", e));
                NO_EXPLANATION.to_string()
            }
        }
    }

    /// Ask the model whether a custom topic is a real subject.
    pub async fn validate_topic(&self, topic: &str) -> Result<(), QuizError> {
        let prompt = format!(
            "Analyze if the following topic is a coherent subject for a quiz: \"{}\"\n\
             Only respond with either \"VALID\" if it's a real topic (like \"history\", \"python programming\", \"ancient egypt\", etc.)\n\
             or \"INVALID\" if it's gibberish, random characters, or not a real topic.\n\
             Response:",
            topic
        );

        match self
            .gateway
            .complete(ChatRequest::single(self.models.validation(), prompt))
            .await
        {
            Ok(response) if parse_verdict(&response) => Ok(()),
            Ok(_) => Err(QuizError::InvalidTopic(REAL_TOPIC_REQUIRED.to_string())),
            Err(e) => Err(QuizError::InvalidTopic(format!(
                "Error validating topic: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::mock::MockGateway;

    const QUESTION: &str = "What is Python?
A) A programming language
B) A snake
C) A type of fruit
D) A movie";

    fn engine(responses: Vec<Result<String, QuizError>>) -> QuizEngine<MockGateway> {
        QuizEngine::new(MockGateway::new(responses), ModelSet::default())
    }

    #[test]
    fn test_precheck_topic() {
        assert_eq!(precheck_topic("  Machine Learning  ").unwrap(), "Machine Learning");
        assert!(matches!(precheck_topic("A"), Err(QuizError::InvalidTopic(m)) if m.contains("at least 2")));
        assert!(matches!(precheck_topic("123"), Err(QuizError::InvalidTopic(m)) if m.contains("numbers or special")));
        assert!(matches!(precheck_topic("!!!"), Err(QuizError::InvalidTopic(m)) if m.contains("numbers or special")));
    }

    #[tokio::test]
    async fn test_check_answer_confirmed_label() {
        let engine = engine(vec![Ok("A".to_string()), Ok("A".to_string())]);

        let grade = engine.check_answer(QUESTION, OptionLabel::A).await;
        assert!(grade.is_correct);
        assert_eq!(grade.correct_answer, CorrectAnswer::Label(OptionLabel::A));

        let grade = engine.check_answer(QUESTION, OptionLabel::B).await;
        assert!(!grade.is_correct);
        assert_eq!(grade.correct_answer, CorrectAnswer::Label(OptionLabel::A));
    }

    #[tokio::test]
    async fn test_check_answer_uses_single_token_request() {
        let engine = engine(vec![Ok("C".to_string())]);
        engine.check_answer(QUESTION, OptionLabel::C).await;

        let requests = engine.gateway().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].config.max_tokens, Some(1));
        assert!(requests[0].prompt().contains("What is Python?"));
    }

    #[tokio::test]
    async fn test_check_answer_degrades_on_garbage_and_errors() {
        let engine = engine(vec![
            Ok("The answer".to_string()),
            Err(QuizError::Gateway("boom".to_string())),
        ]);

        let grade = engine.check_answer(QUESTION, OptionLabel::A).await;
        assert_eq!(grade.correct_answer, CorrectAnswer::Unknown);
        assert!(!grade.is_correct);

        let grade = engine.check_answer(QUESTION, OptionLabel::A).await;
        assert_eq!(grade.correct_answer, CorrectAnswer::Unknown);
    }

    #[tokio::test]
    async fn test_generate_questions_feeds_back_context() {
        let engine = engine(vec![
            Ok(r#"{"question": "What is Python?", "options": {"A": "A language", "B": "A snake", "C": "A fruit", "D": "A movie"}}"#.to_string()),
            Ok("2. What does OOP stand for?\nA) Object Oriented Programming\nB) Out of Possibilities\nC) Open Operational Protocol\nD) Optimized Object Process".to_string()),
        ]);

        let questions = engine.generate_questions("Python Programming", 2).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(Question::is_well_formed));
        assert!(questions[1].text.contains("What does OOP stand for?"));

        let requests = engine.gateway().requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].prompt().contains("about Python Programming"));
        assert!(requests[1].prompt().contains("What is Python?"));
    }

    #[tokio::test]
    async fn test_generate_questions_keeps_malformed_ones() {
        let engine = engine(vec![Ok("Just chat, no options.".to_string())]);
        let questions = engine.generate_questions("History", 1).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert!(!questions[0].is_well_formed());
    }

    #[tokio::test]
    async fn test_generate_questions_stops_on_gateway_error() {
        let engine = engine(vec![Err(QuizError::Gateway("down".to_string()))]);
        let result = engine.generate_questions("History", 5).await;
        assert!(matches!(result, Err(QuizError::Gateway(_))));
        assert_eq!(engine.gateway().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_topics_truncates_and_pads() {
        let engine = engine(vec![
            Ok("History\nScience\nArt\nMusic\nFilm".to_string()),
            Ok("History".to_string()),
        ]);
        assert_eq!(engine.generate_topics(3).await.unwrap(), vec!["History", "Science", "Art"]);
        assert_eq!(engine.generate_topics(3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_explanation() {
        let engine = engine(vec![
            Ok("Python is a high-level, interpreted programming language.".to_string()),
            Err(QuizError::EmptyResponse),
        ]);

        let explanation = engine
            .get_explanation(QUESTION, CorrectAnswer::Label(OptionLabel::A))
            .await;
        assert!(explanation.contains("Python"));
        assert!(engine.gateway().requests()[0].prompt().contains("The correct answer is: A."));

        let explanation = engine
            .get_explanation(QUESTION, CorrectAnswer::Label(OptionLabel::A))
            .await;
        assert_eq!(explanation, NO_EXPLANATION);
    }

    #[tokio::test]
    async fn test_validate_topic() {
        let engine = engine(vec![
            Ok("VALID".to_string()),
            Ok("INVALID".to_string()),
            Err(QuizError::Gateway("timeout".to_string())),
        ]);

        assert!(engine.validate_topic("World History").await.is_ok());
        assert_eq!(
            engine.validate_topic("asdfghjk").await,
            Err(QuizError::InvalidTopic(REAL_TOPIC_REQUIRED.to_string()))
        );
        match engine.validate_topic("Space").await {
            Err(QuizError::InvalidTopic(message)) => {
                assert!(message.starts_with("Error validating topic:"))
            }
            other => panic!("unexpected {:?}", other),
        }

        let requests = engine.gateway().requests();
        assert_eq!(requests[0].config.temperature, Some(0.0));
        assert_eq!(requests[0].config.max_tokens, Some(10));
    }
}
