use super::layout::{calculate_card_chunks, calculate_screen_chunks};
use super::pitch::draw_pitch;
use super::{draw_status, key_span};
use crate::app::App;
use crate::models::StudyItem;
use crate::pitch;
use crate::study::{StudyState, StudyView};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

pub fn draw_study(f: &mut Frame, app: &App) {
    let layout = calculate_screen_chunks(f.area());
    let Some(view) = app.study_view.as_ref() else {
        return;
    };

    let header_text = match view.state {
        StudyState::Presenting(_) | StudyState::Flipped(_) => {
            format!("Study - Word {} / {}", view.position + 1, view.total)
        }
        _ => "Study".to_string(),
    };
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(view.progress.clamp(0.0, 1.0))
        .label(format!("{}/{}", view.position, view.total));
    f.render_widget(gauge, layout.progress_area);

    match (&view.state, &view.item) {
        (StudyState::Presenting(_), Some(item)) => draw_front(f, layout.body_area, item),
        (StudyState::Flipped(_), Some(item)) => {
            draw_back(f, layout.body_area, item, app.display.show_romaji)
        }
        _ => draw_notice(f, layout.body_area, view),
    }

    draw_status(
        f,
        layout.status_area,
        app.notice.as_deref(),
        view.busy.then_some(match view.state {
            StudyState::Loading => "Loading study queue...",
            _ => "Saving...",
        }),
    );

    let help = Paragraph::new(Line::from(help_spans(view.state)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn draw_front(f: &mut Frame, area: Rect, item: &StudyItem) {
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            item.word.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Space to reveal",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    let card = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Card"));
    f.render_widget(card, area);
}

fn draw_back(f: &mut Frame, area: Rect, item: &StudyItem, show_romaji: bool) {
    let card = calculate_card_chunks(area);

    let mut heading = vec![Span::styled(
        item.word.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    heading.push(Span::from(format!("  {}", item.kana)));
    if show_romaji && !item.romaji.is_empty() {
        heading.push(Span::styled(
            format!("  ({})", item.romaji),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let word = Paragraph::new(Line::from(heading))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Card"));
    f.render_widget(word, card.word_area);

    let geometry = pitch::render(&item.kana, item.pitch_pattern.as_deref());
    draw_pitch(f, card.pitch_area, &item.kana, geometry.as_ref());

    let mut details = Text::default();
    details.push_line(Line::from(Span::styled(
        "Meaning:",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));
    details.push_line(Line::from(item.meaning.as_str()));
    if let Some(example) = &item.example_sentence {
        details.push_line(Line::from(""));
        details.push_line(Line::from(Span::styled(
            "Example:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        details.push_line(Line::from(example.as_str()));
    }
    if !item.tags.is_empty() {
        details.push_line(Line::from(""));
        details.push_line(Line::from(Span::styled(
            item.tags.join(", "),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let detail = Paragraph::new(details)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(detail, card.detail_area);
}

fn draw_notice(f: &mut Frame, area: Rect, view: &StudyView) {
    let text = match view.state {
        StudyState::Complete => format!(
            "Session complete! You learned {} new words.",
            view.total
        ),
        StudyState::Empty => "No new items to study!".to_string(),
        _ => "Loading...".to_string(),
    };
    let body = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, area);
}

fn help_spans(state: StudyState) -> Vec<Span<'static>> {
    match state {
        StudyState::Presenting(_) => vec![
            key_span("Space"),
            Span::from(" Flip  "),
            key_span("Esc"),
            Span::from(" Back to Menu"),
        ],
        StudyState::Flipped(_) => vec![
            key_span("Enter"),
            Span::from(" Got it  "),
            key_span("Space"),
            Span::from(" Flip back  "),
            key_span("Esc"),
            Span::from(" Back to Menu"),
        ],
        StudyState::Loading => vec![
            key_span("r"),
            Span::from(" Retry  "),
            key_span("Esc"),
            Span::from(" Back to Menu"),
        ],
        StudyState::Complete | StudyState::Empty => vec![
            key_span("Enter/Esc"),
            Span::from(" Back to Menu"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::service::StubService;
    use crate::config::DisplayConfig;
    use crate::input::UiCommand;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn item() -> StudyItem {
        StudyItem {
            word: "日本".to_string(),
            kana: "にほん".to_string(),
            romaji: "nihon".to_string(),
            meaning: "Japan".to_string(),
            pitch_pattern: Some("HLL".to_string()),
            example_sentence: Some("日本に行きたい。".to_string()),
            tags: Vec::new(),
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw_study(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_front_then_back_of_card() {
        let stub = Arc::new(StubService::with_study_queue(vec![item()]));
        let (mut app, mut rx) = App::new(stub, DisplayConfig::default());
        app.handle(UiCommand::MenuSelect).await;
        let msg = rx.recv().await.unwrap();
        app.apply(msg).await;

        let front = render(&app);
        assert!(front.contains("Space to reveal"));
        assert!(!front.contains("Japan"));

        app.handle(UiCommand::Flip).await;
        let back = render(&app);
        assert!(back.contains("Japan"));
        assert!(back.contains("nihon"));
        assert!(back.contains("Pitch"));
    }

    #[tokio::test]
    async fn test_empty_queue_message() {
        let stub = Arc::new(StubService::with_study_queue(Vec::new()));
        let (mut app, mut rx) = App::new(stub, DisplayConfig::default());
        app.handle(UiCommand::MenuSelect).await;
        let msg = rx.recv().await.unwrap();
        app.apply(msg).await;

        assert!(render(&app).contains("No new items to study!"));
    }
}
