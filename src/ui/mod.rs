pub mod layout;
mod menu;
mod pitch;
mod quiz;
mod study;

use crate::app::App;
use crate::models::AppState;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

pub use layout::{calculate_card_chunks, calculate_screen_chunks};
pub use menu::{draw_menu, draw_message};
pub use pitch::draw_pitch;
pub use quiz::draw_quiz;
pub use study::draw_study;

pub fn draw(f: &mut Frame, app: &App) {
    match app.state {
        AppState::Menu => draw_menu(f, app),
        AppState::Study => draw_study(f, app),
        AppState::Quiz => draw_quiz(f, app),
        AppState::Message => draw_message(
            f,
            app.message.as_deref().unwrap_or("Nothing to show."),
        ),
    }
}

fn key_span(key: &str) -> Span<'_> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

/// One line under the body: a failure notice wins over the busy hint.
fn draw_status(f: &mut Frame, area: Rect, notice: Option<&str>, busy: Option<&str>) {
    let line = match (notice, busy) {
        (Some(notice), _) => Span::styled(notice, Style::default().fg(Color::Red)),
        (None, Some(busy)) => Span::styled(
            busy,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
        (None, None) => Span::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}
