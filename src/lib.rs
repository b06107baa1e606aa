pub mod ai;
pub mod ai_worker;
pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod input;
pub mod logger;
pub mod models;
pub mod session;
pub mod ui;
pub mod utils;
pub mod wheel;


// Re-exports for convenience
pub use ai::{LlmGateway, OpenRouterClient, QuizEngine, UnavailableGateway};
pub use ai_worker::spawn_ai_worker;
pub use app::App;
pub use audio::{open_player, AudioPlayer, Sound};
pub use config::AppConfig;
pub use error::{AudioError, QuizError, WheelError};
pub use models::{AiRequest, AiResponse, OptionLabel, Question};
pub use session::{transition, Effect, Event, Phase, Session};
pub use wheel::{SpinPlan, TopicWheel};
