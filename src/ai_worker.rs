use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::ai::{LlmGateway, QuizEngine};
use crate::config::ModelSet;
use crate::logger;
use crate::models::{AiOutcome, AiRequest, AiResponse, AiTask};

/// Carry out one task against the engine. Never fails: errors travel inside
/// the outcome so the session can decide how to degrade.
pub async fn run_task<G: LlmGateway>(engine: &QuizEngine<G>, task: AiTask) -> AiOutcome {
    match task {
        AiTask::GenerateTopics { count } => AiOutcome::Topics(engine.generate_topics(count).await),
        AiTask::ValidateTopic { topic } => {
            let verdict = engine.validate_topic(&topic).await;
            AiOutcome::TopicValidated { topic, verdict }
        }
        AiTask::GenerateQuestions { topic, count } => {
            AiOutcome::Questions(engine.generate_questions(&topic, count).await)
        }
        AiTask::GradeAnswer {
            index,
            question,
            selected,
            explain,
        } => {
            let grade = engine.check_answer(&question, selected).await;
            let explanation = if explain && !grade.is_correct {
                Some(engine.get_explanation(&question, grade.correct_answer).await)
            } else {
                None
            };
            AiOutcome::Graded {
                index,
                selected,
                grade,
                explanation,
            }
        }
    }
}

/// Start the background thread that owns the gateway. Requests are handled
/// one at a time in arrival order; the thread exits when either channel closes.
pub fn spawn_ai_worker<F, G>(
    make_gateway: F,
    models: ModelSet,
    ai_tx: Sender<AiResponse>,
    ai_rx: Receiver<AiRequest>,
) -> io::Result<thread::JoinHandle<()>>
where
    F: FnOnce() -> G + Send + 'static,
    G: LlmGateway + 'static,
{
    thread::Builder::new()
        .name("trivia-wheel::ai_worker".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    logger::warn(&format!("Worker could not start a runtime: {}", e));
                    return;
                }
            };
            let engine = QuizEngine::new(make_gateway(), models);

            while let Ok(AiRequest { round, task }) = ai_rx.recv() {
                logger::log(&format!("Worker received {:?} (round {})", task, round));
                let outcome = rt.block_on(run_task(&engine, task));
                if ai_tx.send(AiResponse { round, outcome }).is_err() {
                    break;
                }
            }
            logger::log("Worker channel disconnected, exiting");
        })
}
