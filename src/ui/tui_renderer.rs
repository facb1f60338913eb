use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};
use tui_input::Input;
use unicode_width::UnicodeWidthStr;

use crate::api::post_board::{format_when, Post};
use crate::config::config::IconConfig;
use crate::data::data_view::DataView;
use crate::data::source_catalog::{Category, League, PitcherRole, StatMode};
use crate::state::{AppState, TableStatus};
use crate::table_display::header_label;
use crate::ui::tui_app::{ComposeField, Focus, Overlay};
use crate::utils::logging::get_log_buffer;

/// Widest a column may grow before its text is clipped
const MAX_COLUMN_WIDTH: u16 = 24;
/// Rows sampled when sizing columns
const WIDTH_SAMPLE_ROWS: usize = 200;

/// Everything one frame needs, borrowed from the app
pub struct RenderContext<'a> {
    pub state: &'a AppState,
    pub view: &'a DataView,
    pub icons: &'a IconConfig,
    pub column_cursor: usize,
    pub focus: Focus,
    pub compose_field: ComposeField,
    pub search_input: &'a Input,
    pub title_input: &'a Input,
    pub body_input: &'a Input,
    pub posts: &'a [Post],
    pub posts_loading: bool,
    pub posts_enabled: bool,
    pub show_posts: bool,
    pub overlay: Overlay,
    pub status_message: &'a str,
}

/// Handles all rendering operations for the TUI
pub struct TuiRenderer;

impl TuiRenderer {
    pub fn render(f: &mut Frame, ctx: &RenderContext, table_state: &mut TableState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Selection
                Constraint::Length(3), // Search
                Constraint::Min(5),    // Table and posts
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        Self::render_selection(f, chunks[0], ctx);
        Self::render_search(f, chunks[1], ctx);

        if ctx.show_posts {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(chunks[2]);
            Self::render_table(f, body[0], ctx, table_state);
            Self::render_posts_column(f, body[1], ctx);
        } else {
            Self::render_table(f, chunks[2], ctx, table_state);
        }

        Self::render_status_line(f, chunks[3], ctx);

        let screen = f.area();
        match ctx.overlay {
            Overlay::None => {}
            Overlay::Help => Self::render_help(f, centered_rect(70, 80, screen)),
            Overlay::Logs => Self::render_logs(f, centered_rect(90, 80, screen)),
        }
    }

    /// Title plus the facet chips, bordered in the league color
    fn render_selection(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let selection = ctx.state.selection();
        let active = Style::default()
            .fg(Color::Black)
            .bg(league_color(selection.league))
            .add_modifier(Modifier::BOLD);
        let inactive = Style::default().fg(Color::Gray);
        let chip = |label: &'static str, on: bool| {
            Span::styled(format!(" {} ", label), if on { active } else { inactive })
        };

        let mut spans = vec![
            chip("Batter", selection.category == Category::Batter),
            chip("Pitcher", selection.category == Category::Pitcher),
        ];
        if selection.category == Category::Pitcher {
            spans.push(Span::raw(" "));
            spans.push(chip("SP", selection.role == PitcherRole::Starter));
            spans.push(chip("RP", selection.role == PitcherRole::Relief));
        }
        spans.push(Span::raw(format!(" {} ", ctx.icons.separator)));
        spans.push(chip("AL", selection.league == League::AL));
        spans.push(chip("NL", selection.league == League::NL));
        spans.push(Span::raw(format!(" {} ", ctx.icons.separator)));
        spans.push(chip("Classic", selection.mode == StatMode::Classic));
        spans.push(chip("Saber", selection.mode == StatMode::Saber));

        let title = ctx.state.title().replace('•', &ctx.icons.separator);
        let title_style = match ctx.state.status() {
            TableStatus::Ready | TableStatus::Loading => Style::default().add_modifier(Modifier::BOLD),
            _ => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        };

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", title), title_style))
                .border_style(Style::default().fg(league_color(selection.league))),
        );
        f.render_widget(paragraph, area);
    }

    fn render_search(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let focused = ctx.focus == Focus::Search;
        let hint = match ctx.state.table().name_column() {
            Some(column) => format!("Search by {} (/)", column),
            None if ctx.state.table().is_empty() => "Search (/)".to_string(),
            None => "Search (no player column)".to_string(),
        };

        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let paragraph = Paragraph::new(ctx.search_input.value())
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(hint));
        f.render_widget(paragraph, area);

        if focused {
            set_input_cursor(f, area, ctx.search_input);
        }
    }

    /// Render the stats table
    pub fn render_table(f: &mut Frame, area: Rect, ctx: &RenderContext, table_state: &mut TableState) {
        let view = ctx.view;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(league_color(ctx.state.selection().league)));

        if view.headers().is_empty() {
            let message = match ctx.state.status() {
                TableStatus::Loading => "Loading...".to_string(),
                TableStatus::LoadFailed(reason) => format!("No Data\n\n{}", reason),
                _ => "No Data".to_string(),
            };
            let empty_msg = Paragraph::new(message)
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true })
                .block(block.title("Players"));
            f.render_widget(empty_msg, area);
            return;
        }

        let labels: Vec<String> = view
            .headers()
            .iter()
            .map(|h| header_label(h, ctx.state.sort(), ctx.icons))
            .collect();

        let header_cells: Vec<Cell> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let style = if i == ctx.column_cursor && ctx.focus == Focus::Table {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                };
                Cell::from(label.as_str()).style(style)
            })
            .collect();
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        let rows: Vec<Row> = view
            .rows()
            .map(|row| {
                let cells: Vec<Cell> = view
                    .headers()
                    .iter()
                    .map(|h| match row.get(h) {
                        Some(value) if value.is_numeric() => Cell::from(
                            Line::from(value.to_string()).alignment(Alignment::Right),
                        ),
                        Some(value) => Cell::from(value.to_string()),
                        None => Cell::from(""),
                    })
                    .collect();
                Row::new(cells).height(1)
            })
            .collect();

        let widths: Vec<Constraint> = column_widths(view, &labels)
            .into_iter()
            .map(Constraint::Length)
            .collect();

        let title = if view.row_count() == view.source().row_count() {
            format!("Players ({})", view.row_count())
        } else {
            format!("Players ({} of {})", view.row_count(), view.source().row_count())
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(block.title(title))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        f.render_stateful_widget(table, area, table_state);
    }

    fn render_posts_column(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        Self::render_posts(f, chunks[0], ctx);
        Self::render_compose_field(
            f,
            chunks[1],
            "Title",
            ctx.title_input,
            ctx.focus == Focus::Compose && ctx.compose_field == ComposeField::Title,
        );
        Self::render_compose_field(
            f,
            chunks[2],
            "Body (Enter to post)",
            ctx.body_input,
            ctx.focus == Focus::Compose && ctx.compose_field == ComposeField::Body,
        );
    }

    /// Render the post board, newest first
    pub fn render_posts(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let block = Block::default().borders(Borders::ALL).title("Columns");

        let placeholder = if !ctx.posts_enabled {
            Some("Post board disabled in config")
        } else if ctx.posts_loading && ctx.posts.is_empty() {
            Some("Loading posts...")
        } else if ctx.posts.is_empty() {
            Some("No columns have been posted yet.")
        } else {
            None
        };

        if let Some(text) = placeholder {
            let paragraph = Paragraph::new(text)
                .style(Style::default().fg(Color::Gray))
                .block(block);
            f.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = ctx
            .posts
            .iter()
            .map(|post| {
                let mut lines = vec![
                    Line::from(Span::styled(
                        post.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format_when(&post.when),
                        Style::default().fg(Color::DarkGray),
                    )),
                ];
                lines.extend(post.body.lines().map(|l| Line::from(l.to_string())));
                lines.push(Line::from(""));
                ListItem::new(Text::from(lines))
            })
            .collect();

        f.render_widget(List::new(items).block(block), area);
    }

    fn render_compose_field(f: &mut Frame, area: Rect, title: &str, input: &Input, focused: bool) {
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let paragraph = Paragraph::new(input.value())
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        f.render_widget(paragraph, area);

        if focused {
            set_input_cursor(f, area, input);
        }
    }

    /// Render the main status line at the bottom of the screen
    pub fn render_status_line(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mode = match ctx.focus {
            Focus::Table => "TABLE",
            Focus::Search => "SEARCH",
            Focus::Compose => "COMPOSE",
        };

        let status_line = Line::from(vec![
            Span::styled(
                mode,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::styled(ctx.status_message, Style::default().fg(Color::White)),
            Span::raw(" | F1=Help | q=Quit"),
        ]);

        let status = Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray));
        f.render_widget(status, area);
    }

    /// Render the help popup
    pub fn render_help(f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from(Span::styled(
                "statboard help",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("SELECTION:"),
            Line::from("  b / p           - Batters / pitchers"),
            Line::from("  r               - Starters / relievers (pitchers)"),
            Line::from("  l               - Toggle AL / NL"),
            Line::from("  m               - Toggle classic / saber"),
            Line::from("  Ctrl+R          - Reload table and posts"),
            Line::from(""),
            Line::from("TABLE:"),
            Line::from("  ←/→             - Move header cursor"),
            Line::from("  s or Enter      - Sort by header (again to flip)"),
            Line::from("  ↑/↓ PgUp/PgDn   - Move rows"),
            Line::from("  Home/End        - First/last row"),
            Line::from("  /               - Search player names"),
            Line::from("  e               - Export view to CSV"),
            Line::from(""),
            Line::from("POSTS:"),
            Line::from("  F2              - Show/hide posts"),
            Line::from("  Tab             - Write a column (Tab switches fields)"),
            Line::from("  Enter on body   - Submit"),
            Line::from("  Esc             - Back to table"),
            Line::from(""),
            Line::from("  F1 help  F5 logs  q/Esc quit"),
        ];

        f.render_widget(Clear, area);
        let help_widget = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .style(Style::default().fg(Color::White));
        f.render_widget(help_widget, area);
    }

    /// Render the most recent log entries
    pub fn render_logs(f: &mut Frame, area: Rect) {
        let visible_height = area.height.saturating_sub(2) as usize;
        let entries = get_log_buffer()
            .map(|buffer| buffer.get_recent(visible_height))
            .unwrap_or_default();

        let lines: Vec<Line> = entries
            .iter()
            .map(|entry| {
                let color = match entry.level.as_str() {
                    "ERROR" => Color::Red,
                    "WARN" => Color::Yellow,
                    "DEBUG" | "TRACE" => Color::DarkGray,
                    _ => Color::White,
                };
                Line::from(Span::styled(
                    entry.format_for_display(),
                    Style::default().fg(color),
                ))
            })
            .collect();
        let has_error = entries.iter().any(|e| e.level == "ERROR");

        let (border_color, title) = if has_error {
            (Color::Red, "Logs [ERROR]")
        } else {
            (Color::Yellow, "Logs")
        };

        f.render_widget(Clear, area);
        let log_widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} - F5 to close", title))
                .border_style(Style::default().fg(border_color)),
        );
        f.render_widget(log_widget, area);
    }
}

pub fn league_color(league: League) -> Color {
    match league {
        League::AL => Color::Red,
        League::NL => Color::Blue,
    }
}

/// Width per column in terminal cells: the widest of the label and sampled
/// cells, capped. Wide glyphs such as Hangul count as two cells.
pub fn column_widths(view: &DataView, labels: &[String]) -> Vec<u16> {
    let mut widths: Vec<usize> = labels.iter().map(|l| l.width()).collect();

    for row in view.rows().take(WIDTH_SAMPLE_ROWS) {
        for (i, header) in view.headers().iter().enumerate() {
            let len = row.display(header).width();
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(len);
            }
        }
    }

    widths
        .into_iter()
        .map(|w| w.min(MAX_COLUMN_WIDTH as usize) as u16)
        .collect()
}

fn set_input_cursor(f: &mut Frame, area: Rect, input: &Input) {
    let max_x = area.width.saturating_sub(2);
    f.set_cursor_position((
        area.x + (input.visual_cursor() as u16).min(max_x) + 1,
        area.y + 1,
    ));
}

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
