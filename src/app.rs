use std::sync::mpsc::Sender;
use std::time::Instant;

use crossterm::event::KeyEvent;
use rand::rngs::StdRng;

use crate::audio::AudioPlayer;
use crate::input::{Action, map_key};
use crate::logger;
use crate::error::QuizError;
use crate::models::{AiOutcome, AiRequest, AiResponse, AiTask, CorrectAnswer, Grade};
use crate::session::{Effect, Event, Session, transition};
use crate::wheel::choose_segment_count;

/// Owns the session and carries out the effects its transitions ask for.
pub struct App<A: AudioPlayer> {
    session: Session,
    audio: A,
    ai_tx: Sender<AiRequest>,
    rng: StdRng,
    should_quit: bool,
}

impl<A: AudioPlayer> App<A> {
    pub fn new(session: Session, audio: A, ai_tx: Sender<AiRequest>, rng: StdRng) -> Self {
        Self {
            session,
            audio,
            ai_tx,
            rng,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run once per frame. Only the first call of a round picks the wheel size.
    pub fn initialize(&mut self) {
        let num_topics = choose_segment_count(&mut self.rng);
        self.dispatch(Event::Initialize { num_topics });
    }

    pub fn tick(&mut self) {
        self.dispatch(Event::Tick);
    }

    pub fn receive(&mut self, response: AiResponse) {
        self.dispatch(Event::Ai(response));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match map_key(&self.session, key) {
            Action::Event(event) => self.dispatch(event),
            Action::Spin => {
                if let Some(wheel) = self.session.wheel() {
                    let plan = wheel.plan_spin(&mut self.rng);
                    self.dispatch(Event::SpinWheel(plan));
                }
            }
            Action::Quit => self.should_quit = true,
            Action::None => {}
        }
    }

    pub fn dispatch(&mut self, event: Event) {
        let (next, effects) = transition(&self.session, event, Instant::now());
        self.session = next;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::PlaySound(sound) => self.audio.play(sound),
            Effect::Ai(request) => {
                if let Err(unsent) = self.ai_tx.send(request) {
                    logger::warn("AI worker is gone; failing the request locally");
                    let AiRequest { round, task } = unsent.0;
                    let outcome = failed_outcome(task, worker_stopped());
                    self.dispatch(Event::Ai(AiResponse { round, outcome }));
                }
            }
        }
    }
}

fn worker_stopped() -> QuizError {
    QuizError::GatewayUnavailable("AI worker stopped".to_string())
}

/// The reply a task gets when no worker is left to run it.
fn failed_outcome(task: AiTask, err: QuizError) -> AiOutcome {
    match task {
        AiTask::GenerateTopics { .. } => AiOutcome::Topics(Err(err)),
        AiTask::ValidateTopic { topic } => AiOutcome::TopicValidated {
            topic,
            verdict: Err(QuizError::InvalidTopic(format!(
                "Error validating topic: {}",
                err
            ))),
        },
        AiTask::GenerateQuestions { .. } => AiOutcome::Questions(Err(err)),
        AiTask::GradeAnswer {
            index, selected, ..
        } => AiOutcome::Graded {
            index,
            selected,
            grade: Grade {
                is_correct: false,
                correct_answer: CorrectAnswer::Unknown,
            },
            explanation: None,
        },
    }
}
