//! Inline completion meter widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A compact single-line completion meter: filled bar plus percentage.
pub struct CompletionMeter {
    percent: u8,
    style: Style,
}

impl CompletionMeter {
    pub fn new(percent: u8) -> Self {
        Self {
            percent: percent.min(100),
            style: Style::default().fg(Color::LightGreen),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Widget for CompletionMeter {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let text = meter_text(self.percent, area.width as usize);
        for (i, ch) in text.chars().enumerate() {
            let x = area.x + i as u16;
            if x >= area.x + area.width {
                break;
            }
            buf.get_mut(x, area.y).set_char(ch).set_style(self.style);
        }
    }
}

/// Format a meter as inline text (for list rows and status messages).
/// The trailing label takes 5 cells ("100%" plus a space).
pub fn meter_text(percent: u8, width: usize) -> String {
    let percent = percent.min(100);
    let label = format!(" {percent:>3}%");
    if width <= label.len() {
        return label.trim_start().to_string();
    }
    let bar_width = width - label.len();
    let filled = (percent as usize * bar_width + 50) / 100;
    let mut bar = String::with_capacity(width);
    for i in 0..bar_width {
        bar.push(if i < filled { '█' } else { '░' });
    }
    bar.push_str(&label);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_text_width() {
        let text = meter_text(50, 15);
        assert_eq!(text.chars().count(), 15);
        assert!(text.ends_with(" 50%"));
    }

    #[test]
    fn test_meter_text_bounds() {
        assert!(meter_text(0, 12).contains("0%"));
        assert!(!meter_text(0, 12).contains('█'));
        assert!(!meter_text(100, 12).contains('░'));
        // Degenerate width still yields the label.
        assert_eq!(meter_text(42, 3), "42%");
    }
}
