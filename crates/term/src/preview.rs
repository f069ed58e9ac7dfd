//! Lays strips and status out into a [`FrameBuffer`].
//!
//! ```text
//! human amplifier  state: party  frame 1234
//!
//! buttons
//! ████████████████████████████████████████
//!
//! pyramid
//! ████████████████████████████████████████
//!
//!  0  1 [2] 3  4  5  6 [7] 8  9
//! digits toggle buttons, q quits
//! ```

use crate::fb::{Cell, FrameBuffer};
use crate::types::Pixel;

const TITLE: Pixel = Pixel::new(255, 200, 80);
const LABEL: Pixel = Pixel::new(150, 150, 150);
const HELD: Pixel = Pixel::new(80, 255, 80);

/// What the status lines show.
#[derive(Debug, Clone, Copy)]
pub struct PreviewStatus<'a> {
    pub state: &'a str,
    pub frame: u64,
    pub held: &'a [bool],
}

#[derive(Debug, Clone)]
pub struct StripPreview {
    labels: Vec<String>,
}

impl StripPreview {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Rows needed for `strips` strips plus the status lines.
    pub fn height(&self, strips: usize) -> u16 {
        let rows = 2 + strips * 3 + 2;
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    pub fn render(&self, fb: &mut FrameBuffer, strips: &[Vec<Pixel>], status: PreviewStatus<'_>) {
        fb.clear();
        let title = format!(
            "human amplifier  state: {}  frame {}",
            status.state, status.frame
        );
        fb.put_str(0, 0, &title, TITLE);

        let mut y: u16 = 2;
        for (i, pixels) in strips.iter().enumerate() {
            let label = self.labels.get(i).map_or("strip", String::as_str);
            fb.put_str(0, y, label, LABEL);
            for (x, color) in downsample(pixels, fb.width() as usize).into_iter().enumerate() {
                let Ok(x) = u16::try_from(x) else { break };
                fb.set(x, y + 1, Cell::led(color));
            }
            y = y.saturating_add(3);
        }

        let mut x: u16 = 0;
        for (button, &held) in status.held.iter().enumerate() {
            let text = if held {
                format!("[{button}]")
            } else {
                format!(" {button} ")
            };
            fb.put_str(x, y, &text, if held { HELD } else { LABEL });
            x = x.saturating_add(text.len() as u16);
        }
        fb.put_str(0, y.saturating_add(1), "digits toggle buttons, q quits", LABEL);
    }
}

/// Average `pixels` into at most `columns` colors.
pub fn downsample(pixels: &[Pixel], columns: usize) -> Vec<Pixel> {
    let columns = columns.min(pixels.len());
    if columns == 0 {
        return Vec::new();
    }
    (0..columns)
        .map(|c| {
            let start = c * pixels.len() / columns;
            let end = ((c + 1) * pixels.len() / columns).max(start + 1);
            average(&pixels[start..end])
        })
        .collect()
}

fn average(pixels: &[Pixel]) -> Pixel {
    let n = pixels.len().max(1) as u32;
    let (r, g, b) = pixels.iter().fold((0u32, 0u32, 0u32), |(r, g, b), p| {
        (r + p.r() as u32, g + p.g() as u32, b + p.b() as u32)
    });
    Pixel::new((r / n) as u8, (g / n) as u8, (b / n) as u8)
}
