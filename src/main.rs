use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use kotoba_dojo::{
    api::DojoClient,
    app::{App, AppMsg},
    config::{get_config_path, DojoConfig},
    input::map_key,
    logger, ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

#[tokio::main]
async fn main() -> io::Result<()> {
    logger::init();

    let config_path = get_config_path();
    if !config_path.exists() {
        // first run: leave an editable file behind
        match DojoConfig::default().save(&config_path) {
            Ok(()) => logger::log(&format!("Wrote default config to {}", config_path.display())),
            Err(e) => logger::log(&format!("Could not write default config: {}", e)),
        }
    }
    let config = DojoConfig::load(&config_path)?;
    logger::log(&format!(
        "Starting with config {} against {}",
        config_path.display(),
        config.api_base_url
    ));
    let client = DojoClient::new(&config).map_err(|e| io::Error::other(e.to_string()))?;
    let (app, msgs) = App::new(Arc::new(client), config.display.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, app, msgs).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        logger::log(&format!("Exited with error: {}", e));
    }
    result
}

async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut msgs: UnboundedReceiver<AppMsg>,
) -> io::Result<()> {
    let mut events = EventStream::new();
    app.load_stats();

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, &app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let command = map_key(app.context(), key);
                    app.handle(command).await;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => break,
            },
            Some(msg) = msgs.recv() => app.apply(msg).await,
        }
    }

    Ok(())
}
