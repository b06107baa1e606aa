//! Quiz session state machine.
//!
//! A [`Session`] moves through topic selection, the question loop and the
//! completion screen. Every user action or worker reply is an [`Event`];
//! [`transition`] returns the next session snapshot together with the
//! [`Effect`]s the caller has to carry out (gateway work, sounds).

use std::time::{Duration, Instant};

use crate::ai::precheck_topic;
use crate::ai::parse::parse_topics;
use crate::audio::Sound;
use crate::config::DEFAULT_QUESTION_COUNT;
use crate::logger;
use crate::models::{
    AiOutcome, AiRequest, AiResponse, AiTask, AnswerRecord, OptionLabel, Question, Score,
};
use crate::wheel::{SpinPlan, TopicWheel};

pub const SELECT_BEFORE_SUBMIT: &str = "Please select an answer before submitting.";
pub const MALFORMED_QUESTION: &str =
    "Each question must have exactly four options (A, B, C, D). Press r to start over.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    TopicSelection,
    QuizRunning,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicEntry {
    Wheel,
    Custom { input: String, error: Option<String> },
}

/// Gateway work the session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    TopicValidation,
    Questions,
    Grading { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Fill whatever is still unset. Safe to send on every refresh.
    Initialize { num_topics: usize },
    SpinWheel(SpinPlan),
    Tick,
    ChooseCustomTopic,
    CustomTopicInput(char),
    CustomTopicBackspace,
    SubmitCustomTopic,
    CancelCustomTopic,
    StartQuiz,
    SelectOption(OptionLabel),
    SubmitAnswer,
    PlayAgain,
    Ai(AiResponse),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Ai(AiRequest),
    PlaySound(Sound),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub phase: Phase,
    pub round: u64,
    pub num_topics: Option<usize>,
    pub topics: Option<Vec<String>>,
    pub loading_topics: bool,
    pub topic: Option<String>,
    pub entry: TopicEntry,
    pub spin: Option<SpinPlan>,
    /// Wheel rotation currently on screen, in degrees.
    pub wheel_angle: u32,
    pub question_count: usize,
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub records: Vec<AnswerRecord>,
    pub selected: Option<OptionLabel>,
    pub started_at: Option<Instant>,
    pub elapsed: Duration,
    pub pending: Option<Pending>,
    pub notice: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_QUESTION_COUNT)
    }
}

/// Apply one event to a session snapshot.
pub fn transition(session: &Session, event: Event, now: Instant) -> (Session, Vec<Effect>) {
    let mut next = session.clone();
    let effects = next.apply(event, now);
    (next, effects)
}

impl Session {
    pub fn new(question_count: usize) -> Self {
        Self {
            phase: Phase::TopicSelection,
            round: 0,
            num_topics: None,
            topics: None,
            loading_topics: false,
            topic: None,
            entry: TopicEntry::Wheel,
            spin: None,
            wheel_angle: 0,
            question_count: question_count.max(1),
            questions: Vec::new(),
            current_index: 0,
            records: Vec::new(),
            selected: None,
            started_at: None,
            elapsed: Duration::ZERO,
            pending: None,
            notice: None,
        }
    }

    pub fn wheel(&self) -> Option<TopicWheel> {
        let topics = self.topics.clone()?;
        TopicWheel::new(topics).ok()
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == Phase::QuizRunning {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    pub fn score(&self) -> Score {
        Score {
            correct: self.records.iter().filter(|r| r.is_correct).count(),
            total: self.questions.len(),
        }
    }

    pub fn explanation(&self, index: usize) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.question_index == index)
            .and_then(|r| r.explanation.as_deref())
    }

    /// The quiz cannot continue: question generation failed or the current
    /// question could not be parsed.
    pub fn is_stuck(&self) -> bool {
        if self.phase != Phase::QuizRunning || self.pending.is_some() {
            return false;
        }
        match self.questions.get(self.current_index) {
            Some(question) => !question.is_well_formed(),
            None => self.questions.is_empty(),
        }
    }

    pub fn can_play_again(&self) -> bool {
        self.phase == Phase::Complete || self.is_stuck()
    }

    fn request(&self, task: AiTask) -> Effect {
        Effect::Ai(AiRequest {
            round: self.round,
            task,
        })
    }

    fn apply(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        match event {
            Event::Initialize { num_topics } => self.initialize(num_topics),
            Event::SpinWheel(plan) => self.spin_wheel(plan),
            Event::Tick => {
                self.tick(now);
                Vec::new()
            }
            Event::ChooseCustomTopic => {
                if self.accepts_topic_input() && self.entry == TopicEntry::Wheel {
                    self.entry = TopicEntry::Custom {
                        input: String::new(),
                        error: None,
                    };
                }
                Vec::new()
            }
            Event::CustomTopicInput(c) => {
                if self.pending.is_none()
                    && let TopicEntry::Custom { input, error } = &mut self.entry
                {
                    input.push(c);
                    *error = None;
                }
                Vec::new()
            }
            Event::CustomTopicBackspace => {
                if self.pending.is_none()
                    && let TopicEntry::Custom { input, .. } = &mut self.entry
                {
                    input.pop();
                }
                Vec::new()
            }
            Event::CancelCustomTopic => {
                if self.pending.is_none() && self.topic.is_none() {
                    self.entry = TopicEntry::Wheel;
                }
                Vec::new()
            }
            Event::SubmitCustomTopic => self.submit_custom_topic(),
            Event::StartQuiz => self.start_quiz(),
            Event::SelectOption(label) => self.select_option(label),
            Event::SubmitAnswer => self.submit_answer(),
            Event::PlayAgain => {
                if self.can_play_again() {
                    let round = self.round + 1;
                    *self = Session::new(self.question_count);
                    self.round = round;
                }
                Vec::new()
            }
            Event::Ai(response) => {
                if response.round != self.round {
                    logger::log(&format!(
                        "Dropping reply for round {} (current round {})",
                        response.round, self.round
                    ));
                    return Vec::new();
                }
                self.receive(response.outcome, now)
            }
        }
    }

    fn initialize(&mut self, num_topics: usize) -> Vec<Effect> {
        if self.num_topics.is_none() {
            self.num_topics = Some(num_topics);
        }

        let mut effects = Vec::new();
        if self.topics.is_none()
            && !self.loading_topics
            && self.phase == Phase::TopicSelection
            && let Some(count) = self.num_topics
        {
            self.loading_topics = true;
            effects.push(self.request(AiTask::GenerateTopics { count }));
        }
        effects
    }

    fn accepts_topic_input(&self) -> bool {
        self.phase == Phase::TopicSelection
            && self.topic.is_none()
            && self.spin.is_none()
            && self.pending.is_none()
    }

    fn spin_wheel(&mut self, plan: SpinPlan) -> Vec<Effect> {
        if !self.accepts_topic_input() || self.entry != TopicEntry::Wheel || self.wheel().is_none()
        {
            return Vec::new();
        }
        self.spin = Some(plan);
        vec![Effect::PlaySound(Sound::Spin)]
    }

    fn tick(&mut self, now: Instant) {
        if let Some(mut plan) = self.spin.take() {
            plan.advance();
            self.wheel_angle = plan.current_angle();
            if plan.is_finished() {
                if let Some(wheel) = self.wheel() {
                    let topic = wheel.topic_under_pointer(plan.target_angle).to_string();
                    logger::log(&format!(
                        "Wheel stopped at {} degrees on '{}'",
                        plan.target_angle, topic
                    ));
                    self.topic = Some(topic);
                }
            } else {
                self.spin = Some(plan);
            }
        }

        if self.phase == Phase::QuizRunning
            && let Some(started_at) = self.started_at
        {
            self.elapsed = now.saturating_duration_since(started_at);
        }
    }

    fn submit_custom_topic(&mut self) -> Vec<Effect> {
        if !self.accepts_topic_input() {
            return Vec::new();
        }
        let TopicEntry::Custom { input, error } = &mut self.entry else {
            return Vec::new();
        };

        match precheck_topic(input) {
            Err(e) => {
                *error = Some(e.to_string());
                Vec::new()
            }
            Ok(topic) => {
                *error = None;
                self.pending = Some(Pending::TopicValidation);
                vec![self.request(AiTask::ValidateTopic { topic })]
            }
        }
    }

    fn start_quiz(&mut self) -> Vec<Effect> {
        if self.phase != Phase::TopicSelection || self.spin.is_some() || self.pending.is_some() {
            return Vec::new();
        }
        let Some(topic) = self.topic.clone() else {
            return Vec::new();
        };

        self.phase = Phase::QuizRunning;
        self.pending = Some(Pending::Questions);
        self.notice = None;
        vec![
            Effect::PlaySound(Sound::Play),
            self.request(AiTask::GenerateQuestions {
                topic,
                count: self.question_count,
            }),
        ]
    }

    fn select_option(&mut self, label: OptionLabel) -> Vec<Effect> {
        let selectable = self.pending.is_none()
            && self
                .current_question()
                .is_some_and(Question::is_well_formed);
        if !selectable || self.selected == Some(label) {
            return Vec::new();
        }
        self.selected = Some(label);
        self.notice = None;
        vec![Effect::PlaySound(Sound::Option)]
    }

    fn submit_answer(&mut self) -> Vec<Effect> {
        if self.pending.is_some() {
            return Vec::new();
        }
        let Some(question) = self.current_question() else {
            return Vec::new();
        };
        if !question.is_well_formed() {
            self.notice = Some(MALFORMED_QUESTION.to_string());
            return Vec::new();
        }
        let question = question.grading_text();
        let Some(selected) = self.selected else {
            self.notice = Some(SELECT_BEFORE_SUBMIT.to_string());
            return Vec::new();
        };

        let index = self.current_index;
        let task = AiTask::GradeAnswer {
            index,
            question,
            selected,
            explain: self.explanation(index).is_none(),
        };
        self.pending = Some(Pending::Grading { index });
        self.notice = None;
        vec![Effect::PlaySound(Sound::Submit), self.request(task)]
    }

    fn receive(&mut self, outcome: AiOutcome, now: Instant) -> Vec<Effect> {
        match outcome {
            AiOutcome::Topics(result) => {
                self.loading_topics = false;
                if self.topics.is_some() {
                    return Vec::new();
                }
                let count = self.num_topics.unwrap_or(crate::wheel::SEGMENT_CHOICES[0]);
                let topics = match result {
                    Ok(topics) if topics.len() == count => topics,
                    Ok(topics) => parse_topics(&topics.join("\n"), count),
                    Err(e) => {
                        logger::warn(&format!("Topic generation failed: {}", e));
                        self.notice = Some(format!("Could not fetch topics ({}); using a default wheel.", e));
                        parse_topics("", count)
                    }
                };
                self.topics = Some(topics);
                Vec::new()
            }
            AiOutcome::TopicValidated { topic, verdict } => {
                if self.pending != Some(Pending::TopicValidation) {
                    return Vec::new();
                }
                self.pending = None;
                match verdict {
                    Ok(()) => self.topic = Some(topic),
                    Err(e) => {
                        if let TopicEntry::Custom { error, .. } = &mut self.entry {
                            *error = Some(e.to_string());
                        }
                    }
                }
                Vec::new()
            }
            AiOutcome::Questions(result) => {
                if self.pending != Some(Pending::Questions) {
                    return Vec::new();
                }
                self.pending = None;
                match result {
                    Ok(questions) if !questions.is_empty() => {
                        self.questions = questions;
                        self.started_at = Some(now);
                        self.elapsed = Duration::ZERO;
                    }
                    Ok(_) => {
                        self.notice =
                            Some("No questions were generated. Press r to start over.".to_string());
                    }
                    Err(e) => {
                        logger::warn(&format!("Question generation failed: {}", e));
                        self.notice = Some(format!(
                            "Could not generate questions ({}). Press r to start over.",
                            e
                        ));
                    }
                }
                Vec::new()
            }
            AiOutcome::Graded {
                index,
                selected,
                grade,
                explanation,
            } => {
                if self.pending != Some(Pending::Grading { index }) || index != self.current_index {
                    return Vec::new();
                }
                self.pending = None;
                self.records.push(AnswerRecord {
                    question_index: index,
                    selected,
                    is_correct: grade.is_correct,
                    correct_answer: grade.correct_answer.label(),
                    explanation: if grade.is_correct { None } else { explanation },
                });
                self.current_index += 1;
                self.selected = None;

                if self.current_index == self.questions.len() {
                    self.phase = Phase::Complete;
                    if let Some(started_at) = self.started_at {
                        self.elapsed = now.saturating_duration_since(started_at);
                    }
                    return vec![Effect::PlaySound(Sound::EndGame)];
                }
                Vec::new()
            }
        }
    }
}
