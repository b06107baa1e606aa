use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use trivia_wheel::ai::{LlmGateway, OpenRouterClient, UnavailableGateway};
use trivia_wheel::wheel::FRAME_DELAY_MS;
use trivia_wheel::{logger, open_player, spawn_ai_worker, ui, App, AppConfig, Session};

fn make_gateway() -> Box<dyn LlmGateway> {
    match OpenRouterClient::new() {
        Ok(client) => Box::new(client),
        Err(e) => {
            logger::warn(&format!("Running without a model: {}", e));
            Box::new(UnavailableGateway::new(e.to_string()))
        }
    }
}

fn main() -> io::Result<()> {
    let config = AppConfig::from_env();
    logger::init(&config.log_file);
    logger::log(&format!(
        "Starting: topic model {}, quiz model {}, {} questions",
        config.models.topic_model, config.models.quiz_model, config.questions_per_session
    ));
    if !config.api_key_present {
        logger::warn("OPENROUTER_API_KEY is not set; topics and questions will fail");
    }

    let (ai_tx, ai_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    // The worker exits on its own once the app drops the request sender.
    let _worker = spawn_ai_worker(make_gateway, config.models.clone(), resp_tx, ai_rx)?;

    let audio = open_player(&config.audio_dir, config.sound_enabled);
    let mut app = App::new(
        Session::new(config.questions_per_session),
        audio,
        ai_tx,
        StdRng::from_entropy(),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &resp_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    logger::log("Exited cleanly");
    result
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<Box<dyn trivia_wheel::AudioPlayer>>,
    responses: &mpsc::Receiver<trivia_wheel::AiResponse>,
) -> io::Result<()> {
    let frame = Duration::from_millis(FRAME_DELAY_MS);
    let mut last_tick = Instant::now();

    loop {
        app.initialize();
        terminal.draw(|f| ui::draw(f, app.session()))?;

        while let Ok(response) = responses.try_recv() {
            app.receive(response);
        }

        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        if last_tick.elapsed() >= frame {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
