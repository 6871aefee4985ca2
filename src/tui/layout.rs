//! Search field, suggestion popup and preview pane.
//!
//! ```text
//! ┌─ Search ────────────────────────────────────────┐
//! │ > rus                                           │
//! ├──────────────────────────┐──────────────────────┤
//! │ rust                     │                      │
//! │ rust book                │   (preview pane)     │
//! │ ──────────────           │                      │
//! │ rust (programming lang.) │                      │
//! │ ──────────────           │                      │
//! │ [x] Use current page ... │                      │
//! │ [x] Preview highlighted  │                      │
//! └──────────────────────────┘──────────────────────┘
//!  [page: en.wikipedia.org] [ctx: wikipedia] ^G ^P ^W Esc
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::menu::{Anchor, CollectionKind, MenuController, Placement, SlotRef};
use crate::preview::PreviewState;

use super::app::SearchApp;

const POPUP_MAX_WIDTH: u16 = 48;

/// One row of the popup, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRow {
    Item {
        slot: SlotRef,
        label: String,
        active: bool,
    },
    Separator,
    Checkbox {
        label: &'static str,
        checked: bool,
    },
}

/// Draw the full TUI layout.
pub fn draw(f: &mut Frame, app: &mut SearchApp) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search field
            Constraint::Min(3),    // preview
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    let screen = f.area();
    app.set_search_area(outer[0]);
    draw_search_field(f, app, outer[0]);
    draw_preview(f, app, outer[1]);
    draw_status(f, app, outer[2]);

    // Popup last so it overlays the preview
    draw_popup(f, app.session.menu(), screen);
}

fn draw_search_field(f: &mut Frame, app: &SearchApp, area: Rect) {
    let border = if app.session.is_focused() {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    let text = app.session.search_text();
    let line = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::DarkGray)),
        Span::raw(text),
    ]);
    f.render_widget(Paragraph::new(line).block(block), area);

    if app.session.is_focused() {
        let x = inner.x + 2 + text.chars().count() as u16;
        f.set_cursor_position(Position::new(x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

fn draw_preview(f: &mut Frame, app: &SearchApp, area: Rect) {
    let (title, body, color) = match app.session.preview().state() {
        PreviewState::Hidden => (" Page ", app.session.page_url().unwrap_or(""), Color::DarkGray),
        PreviewState::Previewing(url) => (" Preview ", url.as_str(), Color::Yellow),
        PreviewState::Committed(url) => (" Page ", url.as_str(), Color::Green),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let para = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(block);
    f.render_widget(para, area);
}

fn draw_status(f: &mut Frame, app: &SearchApp, area: Rect) {
    let menu = app.session.menu();
    let on_off = |b: bool| if b { "on" } else { "off" };
    let context = app.session.query_context();

    let mut spans = vec![
        Span::styled(
            format!(" [page: {}]", app.session.page_url().unwrap_or("-")),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
    ];
    if !context.is_empty() {
        spans.push(Span::styled(
            format!("[ctx: {context}]"),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        format!(
            "[context {}] [preview {}]",
            on_off(menu.do_context_completions()),
            on_off(menu.do_preview())
        ),
        Style::default().fg(Color::Green),
    ));
    spans.push(Span::styled(
        "  ^G:Context ^P:Preview ^W:Close Tab:Jump Esc:Back",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_popup(f: &mut Frame, menu: &MenuController, screen: Rect) {
    if !menu.is_open() {
        return;
    }
    let Some((anchor, placement)) = menu.position() else {
        return;
    };
    let rows = menu_rows(menu);
    let area = popup_rect(anchor, placement, rows.len() as u16, screen);
    if area.height < 3 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .style(Style::default().bg(Color::Black));
    let rule = "─".repeat(area.width.saturating_sub(2) as usize);

    let lines: Vec<Line> = rows
        .iter()
        .map(|row| match row {
            MenuRow::Item { label, active, .. } => {
                let style = if *active {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(Span::styled(label.as_str(), style))
            }
            MenuRow::Separator => {
                Line::from(Span::styled(rule.as_str(), Style::default().fg(Color::DarkGray)))
            }
            MenuRow::Checkbox { label, checked } => {
                let mark = if *checked { "[x] " } else { "[ ] " };
                Line::from(vec![
                    Span::styled(mark, Style::default().fg(Color::Green)),
                    Span::styled(*label, Style::default().fg(Color::Gray)),
                ])
            }
        })
        .collect();

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Rows the popup shows: general items, context items, then the two toggles.
///
/// A separator follows each collection that currently shows items.
pub fn menu_rows(menu: &MenuController) -> Vec<MenuRow> {
    let mut rows = Vec::new();
    for kind in [CollectionKind::General, CollectionKind::Context] {
        for (slot, item) in menu.visible_items(kind) {
            rows.push(MenuRow::Item {
                slot,
                label: item.completion.clone(),
                active: menu.is_active(slot),
            });
        }
        if menu.separator_visible(kind) {
            rows.push(MenuRow::Separator);
        }
    }
    rows.push(MenuRow::Checkbox {
        label: "Use current page for suggestions",
        checked: menu.do_context_completions(),
    });
    rows.push(MenuRow::Checkbox {
        label: "Preview highlighted terms",
        checked: menu.do_preview(),
    });
    rows
}

/// Popup rectangle for `rows` content rows, clamped to `screen`.
pub fn popup_rect(anchor: Anchor, placement: Placement, rows: u16, screen: Rect) -> Rect {
    let width = POPUP_MAX_WIDTH
        .min(anchor.width.max(20))
        .min(screen.width.saturating_sub(anchor.x.saturating_sub(screen.x)));
    let wanted = rows.saturating_add(2);
    match placement {
        Placement::AfterStart => {
            let y = anchor.y.saturating_add(anchor.height);
            let room = screen.bottom().saturating_sub(y);
            Rect::new(anchor.x, y, width, wanted.min(room))
        }
        Placement::BeforeStart => {
            let room = anchor.y.saturating_sub(screen.y);
            let height = wanted.min(room);
            Rect::new(anchor.x, anchor.y - height, width, height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{Item, MenuHooks, MenuSettings};

    fn items(names: &[&str]) -> Vec<Item> {
        names
            .iter()
            .map(|n| Item::new(*n, "", format!("u:{n}")))
            .collect()
    }

    #[test]
    fn rows_follow_document_order() {
        let mut menu = MenuController::new(MenuSettings::default(), MenuHooks::new());
        menu.add_general_items(items(&["a", "b"]));
        menu.add_context_items(items(&["c"]));
        menu.activate(SlotRef::context(0));

        let rows = menu_rows(&menu);
        assert_eq!(rows.len(), 7);
        assert!(matches!(&rows[0], MenuRow::Item { label, active: false, .. } if label == "a"));
        assert_eq!(rows[2], MenuRow::Separator);
        assert!(matches!(&rows[3], MenuRow::Item { label, active: true, .. } if label == "c"));
        assert_eq!(rows[4], MenuRow::Separator);
        assert!(matches!(rows[5], MenuRow::Checkbox { checked: true, .. }));
    }

    #[test]
    fn empty_collections_leave_only_toggles() {
        let mut menu = MenuController::new(MenuSettings::default(), MenuHooks::new());
        menu.add_general_items(items(&["a"]));
        menu.add_general_items(Vec::new());
        menu.set_preview_enabled(false);

        let rows = menu_rows(&menu);
        assert_eq!(rows.len(), 2);
        assert!(matches!(rows[1], MenuRow::Checkbox { checked: false, .. }));
    }

    #[test]
    fn disabled_context_rows_are_skipped() {
        let mut menu = MenuController::new(MenuSettings::default(), MenuHooks::new());
        menu.add_context_items(items(&["c"]));
        menu.set_context_enabled(false);
        assert!(!menu_rows(&menu)
            .iter()
            .any(|r| matches!(r, MenuRow::Item { .. } | MenuRow::Separator)));
    }

    #[test]
    fn popup_hangs_below_and_clamps() {
        let screen = Rect::new(0, 0, 80, 20);
        let anchor = Anchor {
            x: 0,
            y: 0,
            width: 80,
            height: 3,
        };
        let r = popup_rect(anchor, Placement::AfterStart, 5, screen);
        assert_eq!(r, Rect::new(0, 3, POPUP_MAX_WIDTH, 7));

        let r = popup_rect(anchor, Placement::AfterStart, 40, screen);
        assert_eq!(r.bottom(), 20);
    }

    #[test]
    fn popup_above_anchor() {
        let screen = Rect::new(0, 0, 80, 20);
        let anchor = Anchor {
            x: 4,
            y: 15,
            width: 30,
            height: 3,
        };
        let r = popup_rect(anchor, Placement::BeforeStart, 3, screen);
        assert_eq!(r, Rect::new(4, 10, 30, 5));
    }
}
