// Painter - draws the surface host's views with ratatui
//
// The layout engine only decides where each surface is and what text it
// holds. This module turns that into widgets once per frame: panels first,
// overlays last (cleared underneath), the focused view highlighted according
// to its focus style, and the terminal cursor parked at the end of an
// editable focused view.

use crate::component::{BorderStyle, FocusStyle};
use crate::layout::{SurfaceHost, View, ViewRegistry};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const FOCUS_BORDER: Color = Color::Cyan;
const IDLE_BORDER: Color = Color::DarkGray;
const FOCUS_BACKGROUND: Color = Color::Rgb(30, 34, 42);
const TEXT: Color = Color::Gray;

/// Draw every visible view
pub fn draw(f: &mut Frame, host: &ViewRegistry) {
    let screen = f.area();
    let current = host.current_view();

    for view in host.views().filter(|v| v.is_visible()) {
        let area = view.dimensions().to_rect().intersection(screen);
        if area.width == 0 || area.height == 0 {
            continue;
        }
        let focused = current == Some(view.name()) && view.highlight;
        draw_view(f, view, area, focused);
    }
}

fn draw_view(f: &mut Frame, view: &View, area: Rect, focused: bool) {
    if view.is_overlay() {
        f.render_widget(Clear, area);
    }

    let (border_focus, background_focus) = match (focused, view.focus_style) {
        (false, _) | (true, FocusStyle::None) => (false, false),
        (true, FocusStyle::Border) => (true, false),
        (true, FocusStyle::Background) => (false, true),
        (true, FocusStyle::Both) => (true, true),
    };

    let mut block = Block::default();
    if view.frame && view.border_style == BorderStyle::None {
        // Same inner area as a bordered frame, just without the lines
        block = block.padding(Padding::uniform(1)).title(view.title.as_str());
    } else if view.frame {
        let border_color = if border_focus { FOCUS_BORDER } else { IDLE_BORDER };
        block = block
            .borders(Borders::ALL)
            .border_type(border_type(view.border_style))
            .border_style(Style::default().fg(border_color))
            .title(view.title.as_str());
        if border_focus {
            block = block.title_style(Style::default().fg(FOCUS_BORDER).add_modifier(Modifier::BOLD));
        }
    }
    let inner = block.inner(area);

    let mut style = Style::default().fg(TEXT);
    if background_focus {
        style = style.bg(FOCUS_BACKGROUND);
    }

    let lines = view.display_lines();
    let (start, end) = view.scroll().visible_range();
    let end = end.max(start).min(lines.len());
    let start = start.min(end);
    let visible: Vec<Line> = lines[start..end]
        .iter()
        .map(|l| Line::raw(l.as_str()))
        .collect();

    f.render_widget(Paragraph::new(visible).style(style).block(block), area);

    if focused && view.editable {
        if let Some(position) = cursor_position(&lines, start, inner) {
            f.set_cursor_position(position);
        }
    }
}

fn border_type(style: BorderStyle) -> BorderType {
    match style {
        BorderStyle::Double => BorderType::Double,
        BorderStyle::Rounded => BorderType::Rounded,
        BorderStyle::Thick => BorderType::Thick,
        BorderStyle::Single | BorderStyle::None => BorderType::Plain,
    }
}

/// End of the last display line, if it is on screen
fn cursor_position(lines: &[String], start: usize, inner: Rect) -> Option<Position> {
    if inner.width == 0 || inner.height == 0 {
        return None;
    }
    let last = lines.len().saturating_sub(1);
    let row = last.checked_sub(start)?;
    if row >= usize::from(inner.height) {
        return None;
    }
    let col = lines.get(last).map(|l| l.width()).unwrap_or(0);
    let col = col.min(usize::from(inner.width.saturating_sub(1)));
    // Both are bounded by the inner area, so they fit in u16
    Some(Position::new(inner.x + col as u16, inner.y + row as u16))
}
