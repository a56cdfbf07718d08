use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct ScreenLayout {
    pub header_area: Rect,
    pub progress_area: Rect,
    pub body_area: Rect,
    pub status_area: Rect,
    pub help_area: Rect,
}

pub struct CardLayout {
    pub word_area: Rect,
    pub pitch_area: Rect,
    pub detail_area: Rect,
}

/// Shared frame for the study and review screens.
pub fn calculate_screen_chunks(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    ScreenLayout {
        header_area: chunks[0],
        progress_area: chunks[1],
        body_area: chunks[2],
        status_area: chunks[3],
        help_area: chunks[4],
    }
}

pub fn calculate_card_chunks(area: Rect) -> CardLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(1),
        ])
        .split(area);

    CardLayout {
        word_area: chunks[0],
        pitch_area: chunks[1],
        detail_area: chunks[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_screen_chunks(area);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.progress_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.help_area.height, 3);
        // margin 1 on each side leaves 38 rows
        assert_eq!(layout.body_area.height, 38 - 8);
    }

    #[test]
    fn test_card_layout() {
        let layout = calculate_card_chunks(Rect::new(0, 0, 80, 20));
        assert_eq!(layout.word_area.height, 3);
        assert_eq!(layout.pitch_area.height, 7);
        assert_eq!(layout.detail_area.height, 10);
    }
}
