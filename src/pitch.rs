//! Pitch-accent contour geometry.
//!
//! Turns a kana reading and its per-mora `H`/`L` pattern into points, a
//! polyline and drop markers. Pure and deterministic; the caller draws it.

pub const CHAR_WIDTH: f64 = 40.0;
pub const PADDING: f64 = 20.0;
pub const DIAGRAM_HEIGHT: f64 = 50.0;
pub const HIGH_Y: f64 = 10.0;
pub const LOW_Y: f64 = 35.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    High,
    Low,
}

impl Tone {
    fn from_mark(mark: char) -> Self {
        if mark == 'H' { Tone::High } else { Tone::Low }
    }

    fn y(self) -> f64 {
        match self {
            Tone::High => HIGH_Y,
            Tone::Low => LOW_Y,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PitchPoint {
    pub x: f64,
    pub y: f64,
    pub character: char,
    pub tone: Tone,
}

/// Vertical high-to-low indicator between mora `after` and `after + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropMarker {
    pub after: usize,
    pub x: f64,
    pub y_top: f64,
    pub y_bottom: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub points: Vec<PitchPoint>,
    pub drops: Vec<DropMarker>,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    /// Contour polyline through every point, in mora order.
    pub fn contour(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.x, p.y)).collect()
    }
}

/// Returns `None` when there is nothing drawable: no pattern, an empty
/// reading, or a pattern whose length differs from the reading. Callers
/// show the kana as plain text in that case.
pub fn render(kana: &str, pattern: Option<&str>) -> Option<Geometry> {
    let pattern = pattern?;
    let chars: Vec<char> = kana.chars().collect();
    let marks: Vec<char> = pattern.chars().collect();
    if chars.is_empty() || chars.len() != marks.len() {
        return None;
    }

    let points: Vec<PitchPoint> = chars
        .iter()
        .zip(&marks)
        .enumerate()
        .map(|(i, (&character, &mark))| {
            let tone = Tone::from_mark(mark);
            PitchPoint {
                x: center_x(i),
                y: tone.y(),
                character,
                tone,
            }
        })
        .collect();

    let drops = points
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].tone == Tone::High && pair[1].tone == Tone::Low)
        .map(|(i, pair)| DropMarker {
            after: i,
            x: (pair[0].x + pair[1].x) / 2.0,
            y_top: HIGH_Y,
            y_bottom: LOW_Y,
        })
        .collect();

    Some(Geometry {
        points,
        drops,
        width: chars.len() as f64 * CHAR_WIDTH + 2.0 * PADDING,
        height: DIAGRAM_HEIGHT,
    })
}

fn center_x(index: usize) -> f64 {
    PADDING + index as f64 * CHAR_WIDTH + CHAR_WIDTH / 2.0
}
