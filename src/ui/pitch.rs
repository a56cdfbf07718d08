use crate::pitch::{Geometry, Tone};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Line as CanvasLine, Points},
    },
    Frame,
};

const CONTOUR_COLOR: Color = Color::Cyan;
const DROP_COLOR: Color = Color::Red;

/// Draws the contour on a braille canvas, or the bare kana when the
/// pattern could not be rendered.
pub fn draw_pitch(f: &mut Frame, area: Rect, kana: &str, geometry: Option<&Geometry>) {
    let block = Block::default().borders(Borders::ALL).title("Pitch");
    let Some(geometry) = geometry else {
        let fallback = Paragraph::new(kana).block(block);
        f.render_widget(fallback, area);
        return;
    };

    // geometry grows downwards, the canvas grows upwards
    let flip = |y: f64| geometry.height - y;
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, geometry.width])
        .y_bounds([0.0, geometry.height])
        .paint(|ctx| {
            let contour = geometry.contour();
            for pair in contour.windows(2) {
                let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
                ctx.draw(&CanvasLine {
                    x1,
                    y1: flip(y1),
                    x2,
                    y2: flip(y2),
                    color: CONTOUR_COLOR,
                });
            }
            for drop in &geometry.drops {
                ctx.draw(&CanvasLine {
                    x1: drop.x,
                    y1: flip(drop.y_top),
                    x2: drop.x,
                    y2: flip(drop.y_bottom),
                    color: DROP_COLOR,
                });
            }
            let coords: Vec<(f64, f64)> = contour.iter().map(|&(x, y)| (x, flip(y))).collect();
            ctx.draw(&Points {
                coords: &coords,
                color: Color::White,
            });
            ctx.layer();
            for point in &geometry.points {
                let style = match point.tone {
                    Tone::High => Style::default().fg(Color::Yellow),
                    Tone::Low => Style::default(),
                };
                ctx.print(
                    point.x,
                    0.0,
                    Line::from(Span::styled(point.character.to_string(), style)),
                );
            }
        });
    f.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_fallback_shows_plain_kana() {
        let mut terminal = Terminal::new(TestBackend::new(30, 5)).unwrap();
        terminal
            .draw(|f| draw_pitch(f, f.area(), "ねこ", None))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("ね"));
        assert!(text.contains("Pitch"));
    }

    #[test]
    fn test_contour_draws_braille() {
        let geometry = pitch::render("にほん", Some("HLL")).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(30, 7)).unwrap();
        terminal
            .draw(|f| draw_pitch(f, f.area(), "にほん", Some(&geometry)))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.chars().any(|c| ('\u{2801}'..='\u{28FF}').contains(&c)));
        assert!(text.contains("に"));
    }
}
