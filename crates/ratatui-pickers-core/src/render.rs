use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::viewport::ViewportState;

/// Writes `input` at `(x, y)` using at most `max_cols` columns; returns the columns used.
///
/// Wide characters that would straddle the limit are dropped rather than split.
pub fn put_str(x: u16, y: u16, max_cols: u16, buf: &mut Buffer, input: &str, style: Style) -> u16 {
    let mut dx = 0u16;
    let mut tmp = [0u8; 4];

    for ch in input.chars() {
        let ch = if ch == '\t' { ' ' } else { ch };
        let w = UnicodeWidthChar::width(ch).unwrap_or(0) as u16;
        if w == 0 {
            continue;
        }
        if dx + w > max_cols {
            break;
        }
        if let Some(cell) = buf.cell_mut((x + dx, y)) {
            cell.set_style(style);
            cell.set_symbol(ch.encode_utf8(&mut tmp));
        }
        if w == 2 {
            if let Some(cell) = buf.cell_mut((x + dx + 1, y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
        }
        dx += w;
    }
    dx
}

/// Writes `input` centered within `width` columns starting at `x`.
pub fn put_centered(x: u16, y: u16, width: u16, buf: &mut Buffer, input: &str, style: Style) {
    let w = UnicodeWidthStr::width(input).min(width as usize) as u16;
    let pad = (width - w) / 2;
    put_str(x + pad, y, width - pad, buf, input, style);
}

pub fn render_scrollbar(area: Rect, buf: &mut Buffer, state: &ViewportState, style: Style) {
    buf.set_style(area, style);
    if area.height == 0 {
        return;
    }
    if !state.is_scrollable() {
        for dy in 0..area.height {
            buf.set_stringn(area.x, area.y + dy, " ", 1, style);
        }
        return;
    }

    let track_h = area.height as f64;
    let thumb_h = ((state.viewport_h as f64 / state.content_h as f64) * track_h)
        .round()
        .clamp(1.0, track_h) as u16;

    let max_y = state
        .content_h
        .saturating_sub(state.viewport_h as u32)
        .max(1) as f64;
    let thumb_top = ((state.y as f64 / max_y) * (track_h - thumb_h as f64))
        .round()
        .clamp(0.0, (track_h - thumb_h as f64).max(0.0)) as u16;

    for dy in 0..area.height {
        let ch = if dy >= thumb_top && dy < thumb_top + thumb_h {
            "█"
        } else {
            " "
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

/// Plain text of one buffer row; handy in tests.
pub fn row_text(buf: &Buffer, y: u16) -> String {
    let area = buf.area;
    (area.x..area.x + area.width)
        .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
        .collect()
}
