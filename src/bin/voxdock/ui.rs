//! Landing page and overlay rendering. Everything here is presentational;
//! state lives in the controller and the status line.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use voxdock::pointer::Region;

pub(crate) struct ViewModel<'a> {
    pub(crate) overlay_visible: bool,
    pub(crate) opening: bool,
    pub(crate) notice: Option<&'a str>,
    pub(crate) spinner: &'static str,
    pub(crate) no_color: bool,
}

/// Centered overlay placement for a given terminal size. The event loop keeps
/// the controller's root region in sync with this, so containment tests and
/// rendering always agree.
pub(crate) fn overlay_region(cols: u16, rows: u16) -> Region {
    let width = ((u32::from(cols) * 3) / 5).max(24).min(u32::from(cols)) as u16;
    let height = ((u32::from(rows) * 3) / 5).max(7).min(u32::from(rows)) as u16;
    let x = cols.saturating_sub(width) / 2;
    let y = rows.saturating_sub(height) / 2;
    Region::new(x, y, width, height)
}

fn accent(no_color: bool) -> Style {
    if no_color {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD)
    }
}

fn dim(no_color: bool) -> Style {
    if no_color {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub(crate) fn draw(frame: &mut Frame, view: &ViewModel) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(frame, chunks[0], view);
    draw_body(frame, chunks[1], view);
    draw_status(frame, chunks[2], view);

    if view.overlay_visible {
        draw_overlay(frame, overlay_region(area.width, area.height), view);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, view: &ViewModel) {
    let header = Paragraph::new("VoxDock")
        .style(accent(view.no_color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_body(frame: &mut Frame, area: Rect, view: &ViewModel) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Talk your way through the terminal",
            accent(view.no_color),
        )),
        Line::from(""),
        Line::from("Hands-free sessions with a voice assistant, right where you work."),
        Line::from(""),
        Line::from("  • Live voice recognition inside a dismissable overlay"),
        Line::from("  • Microphone access negotiated before anything listens"),
        Line::from("  • Click anywhere outside the panel to put it away"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ▶ Talk to the assistant ", accent(view.no_color)),
            Span::styled("(press v or Enter)", dim(view.no_color)),
        ]),
    ];
    let body = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(body, area);
}

fn draw_status(frame: &mut Frame, area: Rect, view: &ViewModel) {
    let text = if let Some(notice) = view.notice {
        notice.to_string()
    } else if view.opening {
        format!("Requesting microphone access {} (Esc cancels)", view.spinner)
    } else {
        "v/Enter: assistant   Esc: dismiss   q: quit".to_string()
    };
    let status = Paragraph::new(text).style(dim(view.no_color));
    frame.render_widget(status, area);
}

fn draw_overlay(frame: &mut Frame, region: Region, view: &ViewModel) {
    let area = Rect::new(region.x, region.y, region.width, region.height);
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(" Assistant ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(accent(view.no_color));
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("● Listening", accent(view.no_color))),
        Line::from(""),
        Line::from("Voice recognition is active."),
        Line::from("Speak normally; the assistant hears you."),
        Line::from(""),
        Line::from(Span::styled(
            "Esc or click outside to dismiss",
            dim(view.no_color),
        )),
    ];
    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(content, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_region_is_centered() {
        let region = overlay_region(100, 40);
        assert_eq!(region.width, 60);
        assert_eq!(region.height, 24);
        assert_eq!(region.x, 20);
        assert_eq!(region.y, 8);
    }

    #[test]
    fn overlay_region_never_exceeds_a_tiny_terminal() {
        let region = overlay_region(10, 4);
        assert!(region.width <= 10);
        assert!(region.height <= 4);
        assert_eq!(region.x, 0);
    }
}
