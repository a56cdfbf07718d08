use super::layout::calculate_screen_chunks;
use super::{draw_status, key_span};
use crate::app::{App, AssembleRow, QuizCursor};
use crate::collector::AnswerCollector;
use crate::config::DisplayConfig;
use crate::models::{QuestionKind, QuestionPrompt, QuizResult};
use crate::quiz::{QuizState, QuizView};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn draw_quiz(f: &mut Frame, app: &App) {
    let layout = calculate_screen_chunks(f.area());
    let Some(view) = app.quiz_view.as_ref() else {
        return;
    };

    let kind = match &view.state {
        QuizState::Presenting { question, .. } | QuizState::Answered { question, .. } => {
            Some(question.kind())
        }
        _ => None,
    };
    let header_text = match kind {
        Some(kind) => format!("Review - {}", kind.label()),
        None => "Review".to_string(),
    };
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            header_text,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(tally_title(view)));
    f.render_widget(header, layout.header_area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(view.progress.clamp(0.0, 1.0))
        .label("");
    f.render_widget(gauge, layout.progress_area);

    match &view.state {
        QuizState::Presenting {
            question,
            collector,
        } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Min(3)])
                .split(layout.body_area);
            draw_prompt(f, chunks[0], question.prompt(), &app.display);
            draw_collector(f, chunks[1], collector, app.cursor);
        }
        QuizState::Answered { question, result } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Min(3)])
                .split(layout.body_area);
            draw_prompt(f, chunks[0], question.prompt(), &app.display);
            draw_result(f, chunks[1], result);
        }
        QuizState::Loading => {
            let body = Paragraph::new("Fetching the next question...")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(body, layout.body_area);
        }
        QuizState::Exited(_) => {
            let body = Paragraph::new("Review ended.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(body, layout.body_area);
        }
    }

    let busy = match &view.state {
        QuizState::Loading => Some("Loading..."),
        QuizState::Presenting { .. } if view.busy => Some("Checking answer..."),
        _ => None,
    };
    draw_status(f, layout.status_area, app.notice.as_deref(), busy);

    let help = Paragraph::new(Line::from(help_spans(&view.state, kind)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn tally_title(view: &QuizView) -> String {
    let tally = view.tally;
    format!(
        " {}/{} correct · {} XP · {} gems ",
        tally.correct, tally.answered, tally.xp, tally.gems
    )
}

fn draw_prompt(f: &mut Frame, area: Rect, prompt: &QuestionPrompt, display: &DisplayConfig) {
    let mut text = Text::default();
    text.push_line(Line::from(Span::styled(
        prompt.prompt_text.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let mut reading = Vec::new();
    if let Some(word) = &prompt.word {
        reading.push(Span::from(word.as_str()));
    }
    if display.show_kana_prompt
        && let Some(kana) = &prompt.kana
    {
        reading.push(Span::from(format!("  {}", kana)));
    }
    if display.show_romaji
        && let Some(romaji) = &prompt.romaji
    {
        reading.push(Span::styled(
            format!("  ({})", romaji),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if !reading.is_empty() {
        text.push_line(Line::from(""));
        text.push_line(Line::from(reading));
    }

    let question = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, area);
}

fn draw_collector(f: &mut Frame, area: Rect, collector: &AnswerCollector, cursor: QuizCursor) {
    match collector {
        AnswerCollector::Choice { options, selected } => {
            let items: Vec<ListItem> = options
                .iter()
                .enumerate()
                .map(|(i, option)| {
                    let marker = if *selected == Some(i) { "●" } else { "○" };
                    let mut style = Style::default();
                    if *selected == Some(i) {
                        style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
                    }
                    if i == cursor.choice {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    ListItem::new(format!("{} {}", marker, option)).style(style)
                })
                .collect();
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title("Choose one"));
            f.render_widget(list, area);
        }
        AnswerCollector::Input { text } => {
            let content = if text.is_empty() {
                Span::styled(
                    "[Type your answer here...]",
                    Style::default().fg(Color::DarkGray),
                )
            } else {
                Span::from(text.as_str())
            };
            let input = Paragraph::new(Line::from(content))
                .block(Block::default().borders(Borders::ALL).title("Your Answer"));
            f.render_widget(input, area);

            let inner_width = area.width.saturating_sub(2);
            let cursor_x = area.x + 1 + (text.width() as u16).min(inner_width);
            f.set_cursor_position((cursor_x, area.y + 1));
        }
        AnswerCollector::Assemble { pool, assembled } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(3)])
                .split(area);
            let assembled_active = cursor.row == AssembleRow::Assembled;
            let sentence = Paragraph::new(token_line(assembled, assembled_active, cursor.token))
                .wrap(Wrap { trim: false })
                .block(row_block("Your sentence", assembled_active));
            f.render_widget(sentence, chunks[0]);
            let tokens = Paragraph::new(token_line(pool, !assembled_active, cursor.token))
                .wrap(Wrap { trim: false })
                .block(row_block("Tokens", !assembled_active));
            f.render_widget(tokens, chunks[1]);
        }
    }
}

fn token_line(tokens: &[String], active: bool, cursor: usize) -> Line<'_> {
    let mut spans = Vec::with_capacity(tokens.len() * 2);
    for (i, token) in tokens.iter().enumerate() {
        let style = if active && i == cursor {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("[{}]", token), style));
        spans.push(Span::from(" "));
    }
    Line::from(spans)
}

fn row_block(title: &str, active: bool) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        })
}

fn draw_result(f: &mut Frame, area: Rect, result: &QuizResult) {
    let mut text = Text::default();
    text.push_line(if result.correct {
        Line::from(Span::styled(
            "Correct!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            "Incorrect",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    });
    text.push_line(Line::from(""));
    text.push_line(Line::from(vec![
        Span::styled("Answer: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::from(result.primary_answer()),
    ]));
    if let Some(explanation) = &result.explanation {
        text.push_line(Line::from(""));
        text.push_line(Line::from(explanation.as_str()));
    }
    text.push_line(Line::from(""));
    let mut rewards = vec![Span::styled(
        format!("+{} XP", result.xp_gained),
        Style::default().fg(Color::Cyan),
    )];
    if result.gems_awarded > 0 {
        rewards.push(Span::styled(
            format!("  +{} gems", result.gems_awarded),
            Style::default().fg(Color::Magenta),
        ));
    }
    text.push_line(Line::from(rewards));

    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Result"));
    f.render_widget(panel, area);
}

fn help_spans(state: &QuizState, kind: Option<QuestionKind>) -> Vec<Span<'static>> {
    let mut spans = match (state, kind) {
        (QuizState::Presenting { .. }, Some(QuestionKind::MultipleChoice)) => vec![
            key_span("↑/↓"),
            Span::from(" Move  "),
            key_span("Enter"),
            Span::from(" Pick  "),
            key_span("Ctrl+S"),
            Span::from(" Submit  "),
        ],
        (QuizState::Presenting { .. }, Some(QuestionKind::Input)) => vec![
            key_span("Enter"),
            Span::from(" Submit  "),
        ],
        (QuizState::Presenting { .. }, Some(QuestionKind::Assemble)) => vec![
            key_span("←/→"),
            Span::from(" Move  "),
            key_span("Tab"),
            Span::from(" Switch row  "),
            key_span("Enter"),
            Span::from(" Place/Return  "),
            key_span("Ctrl+S"),
            Span::from(" Submit  "),
        ],
        (QuizState::Answered { .. }, _) => vec![key_span("Enter"), Span::from(" Next  ")],
        (QuizState::Loading, _) => vec![key_span("r"), Span::from(" Retry  ")],
        _ => Vec::new(),
    };
    spans.extend([key_span("Esc"), Span::from(" Quit to Menu")]);
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::service::StubService;
    use crate::input::UiCommand;
    use crate::models::QuizQuestion;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn prompt() -> QuestionPrompt {
        QuestionPrompt {
            question_id: "q1".to_string(),
            prompt_text: "What does this mean?".to_string(),
            word: Some("猫".to_string()),
            kana: Some("ねこ".to_string()),
            romaji: Some("neko".to_string()),
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw_quiz(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    async fn open_review(stub: Arc<StubService>) -> (App, UnboundedReceiver<crate::app::AppMsg>) {
        let (mut app, mut rx) = App::new(stub, DisplayConfig::default());
        app.menu_index = 1;
        app.handle(UiCommand::MenuSelect).await;
        let msg = rx.recv().await.unwrap();
        app.apply(msg).await;
        (app, rx)
    }

    #[tokio::test]
    async fn test_choice_question_and_result() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Ok(QuizQuestion::MultipleChoice {
            prompt: prompt(),
            options: vec!["cat".to_string(), "dog".to_string()],
        }));
        stub.push_result(Ok(QuizResult {
            correct: true,
            correct_answers: vec!["cat".to_string()],
            explanation: Some("猫 is cat.".to_string()),
            xp_gained: 10,
            gems_awarded: 2,
        }));
        let (mut app, mut rx) = open_review(stub).await;

        let screen = render(&app);
        assert!(screen.contains("What does this mean?"));
        assert!(screen.contains("neko"));
        assert!(screen.contains("○ dog"));

        app.handle(UiCommand::Activate).await;
        assert!(render(&app).contains("● cat"));

        app.handle(UiCommand::Submit).await;
        let msg = rx.recv().await.unwrap();
        app.apply(msg).await;
        let screen = render(&app);
        assert!(screen.contains("Correct!"));
        assert!(screen.contains("+10 XP"));
        assert!(screen.contains("+2 gems"));
        assert!(screen.contains("1/1 correct"));
    }

    #[tokio::test]
    async fn test_result_without_gems_hides_them() {
        let stub = Arc::new(StubService::new());
        stub.push_question(Ok(QuizQuestion::Input { prompt: prompt() }));
        stub.push_result(Ok(QuizResult {
            correct: false,
            correct_answers: vec!["cat".to_string(), "kitty".to_string()],
            explanation: None,
            xp_gained: 0,
            gems_awarded: 0,
        }));
        let (mut app, mut rx) = open_review(stub).await;
        assert!(render(&app).contains("[Type your answer here...]"));

        for c in "dog".chars() {
            app.handle(UiCommand::Type(c)).await;
        }
        assert!(render(&app).contains("dog"));
        app.handle(UiCommand::Submit).await;
        let msg = rx.recv().await.unwrap();
        app.apply(msg).await;

        let screen = render(&app);
        assert!(screen.contains("Incorrect"));
        assert!(screen.contains("Answer: cat"));
        assert!(!screen.contains("kitty"));
        assert!(!screen.contains("+0 gems"));
    }
}
