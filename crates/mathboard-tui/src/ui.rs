use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use mathboard_core::inline::{self, Segment};
use mathboard_core::{expression_to_latex, typeset, Message, ViewMode};
use crate::app::{App, InputMode};

fn math_style() -> Style {
    Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC)
}

/// Turn text with `$...$` runs into styled lines. Math runs are converted to
/// readable unicode; newlines in either kind of segment start a new line.
fn inline_math_lines(text: &str, text_style: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();

    for segment in inline::segment(text) {
        let (content, style) = match &segment {
            Segment::Text(t) => (t.clone(), text_style),
            Segment::Math(m) => (inline::to_unicode(m), math_style()),
        };
        let mut pieces = content.split('\n').peekable();
        while let Some(piece) = pieces.next() {
            if !piece.is_empty() {
                spans.push(Span::styled(piece.to_string(), style));
            }
            if pieces.peek().is_some() {
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
        }
    }

    if !spans.is_empty() || lines.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

fn thinking_line(app: &App) -> Line<'static> {
    // Animated ellipsis: cycles through ".", "..", "..."
    let dots = ".".repeat((app.animation_frame as usize) + 1);
    Line::from(Span::styled(
        format!("Thinking{}", dots),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    ))
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, input, footer
    let [header_area, body_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        ViewMode::Tutor => render_tutor_screen(app, frame, body_area),
        ViewMode::Chat => render_chat_screen(app, frame, body_area),
    }

    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(" mathboard ", Style::default().fg(Color::Cyan).bold())];

    for (i, mode) in ViewMode::all().into_iter().enumerate() {
        let label = format!(" {} {} ", i + 1, mode.display_name());
        let style = if mode == app.screen {
            Style::default().bg(Color::Cyan).fg(Color::Black).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(label, style));
    }

    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        format!("v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::DarkGray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => (" EDIT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    let hints = match (app.input_mode, app.screen) {
        (InputMode::Editing, _) => "Enter send  Esc normal  Tab switch  PgUp/PgDn scroll  Ctrl-C quit",
        (InputMode::Normal, ViewMode::Tutor) => {
            "i edit  Tab switch  j/k explanation  J/K whiteboard  l LaTeX  q quit"
        }
        (InputMode::Normal, ViewMode::Chat) => "i edit  Tab switch  j/k scroll  g/G top/bottom  q quit",
    };

    let footer = Line::from(vec![
        Span::styled(mode_text, mode_style),
        Span::styled(format!(" {}", hints), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}

fn render_tutor_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [board_area, explanation_area] = Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Percentage(50),
    ])
    .areas(area);

    let (steps, explanation) = match app.tutor.last_ai() {
        Some(message) => (message.math_steps().to_vec(), message.text().to_string()),
        None => (Vec::new(), String::new()),
    };

    // Whiteboard: one typeset block per step
    let mut board_lines: Vec<Line> = Vec::new();
    if steps.is_empty() {
        board_lines.push(Line::from(Span::styled(
            "No math steps yet.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (idx, step) in steps.iter().enumerate() {
        let number = format!("{}. ", idx + 1);
        let indent = " ".repeat(number.chars().count());

        let rendered = if app.show_latex {
            vec![expression_to_latex(step)]
        } else {
            typeset(step).lines()
        };

        for (row, text) in rendered.into_iter().enumerate() {
            let prefix = if row == 0 { number.clone() } else { indent.clone() };
            board_lines.push(Line::from(vec![
                Span::styled(prefix, Style::default().fg(Color::Yellow).bold()),
                Span::styled(text, Style::default().fg(Color::White)),
            ]));
        }
        board_lines.push(Line::default());
    }

    let board_title = if app.show_latex { " Whiteboard (LaTeX) " } else { " Whiteboard " };
    let board = Paragraph::new(Text::from(board_lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(board_title),
    );
    app.whiteboard_max_scroll = max_scroll(&board, board_area);
    app.whiteboard_scroll = app.whiteboard_scroll.min(app.whiteboard_max_scroll);
    frame.render_widget(board.scroll((app.whiteboard_scroll, 0)), board_area);

    // Explanation: prose with inline math
    let mut lines = inline_math_lines(&explanation, Style::default());
    if app.tutor.is_sending() {
        lines.push(Line::default());
        lines.push(thinking_line(app));
    }

    let explanation_widget = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Explanation "),
        )
        .wrap(Wrap { trim: false });
    app.explanation_max_scroll = max_scroll(&explanation_widget, explanation_area);
    app.explanation_scroll = app.explanation_scroll.min(app.explanation_max_scroll);
    frame.render_widget(
        explanation_widget.scroll((app.explanation_scroll, 0)),
        explanation_area,
    );
}

/// Furthest a bordered paragraph can scroll while its last line stays in view.
/// `line_count` already includes the top and bottom borders.
fn max_scroll(paragraph: &Paragraph, area: Rect) -> u16 {
    let lines = paragraph.line_count(area.width.saturating_sub(2));
    (lines.min(u16::MAX as usize) as u16).saturating_sub(area.height)
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Chat ");

    let chat_text = if app.chat.messages().is_empty() && !app.chat.is_sending() {
        Text::from(Span::styled(
            "Start a conversation below...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in app.chat.messages() {
            match msg {
                Message::User(text) => {
                    lines.push(Line::from(Span::styled(
                        "You:",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )));
                    lines.extend(inline_math_lines(text, Style::default().fg(Color::Cyan)));
                }
                Message::AiText(_) | Message::AiStructured(_) => {
                    lines.push(Line::from(Span::styled(
                        "AI:",
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )));
                    lines.extend(inline_math_lines(msg.text(), Style::default()));
                }
            }
            lines.push(Line::default());
        }

        if app.chat.is_sending() {
            lines.push(Line::from(Span::styled(
                "AI:",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            lines.push(thinking_line(app));
        }

        Text::from(lines)
    };

    let paragraph = Paragraph::new(chat_text).block(block).wrap(Wrap { trim: false });

    // Clamp scroll now that the wrapped height is known
    app.chat_height = area.height.saturating_sub(2);
    app.chat_lines = paragraph
        .line_count(area.width.saturating_sub(2))
        .saturating_sub(2)
        .min(u16::MAX as usize) as u16;
    let limit = app.chat_lines.saturating_sub(app.chat_height);
    app.chat_scroll = app.chat_scroll.min(limit);

    frame.render_widget(paragraph.scroll((app.chat_scroll, 0)), area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let session = app.session();
    let loading = session.is_sending();
    let editing = app.input_mode == InputMode::Editing;

    let border_color = if loading {
        Color::DarkGray
    } else if editing {
        Color::Yellow
    } else {
        Color::Gray
    };
    let title = if loading {
        " Thinking... ".to_string()
    } else {
        format!(" Ask {} ", app.screen.display_name())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    if session.input().is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            app.screen.placeholder(),
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(placeholder, area);
        if editing && !loading {
            frame.set_cursor_position((area.x + 1, area.y + 1));
        }
        return;
    }

    // Horizontal scrolling keeps the cursor visible
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = session.cursor();
    let scroll_offset = if inner_width == 0 || cursor_pos < inner_width {
        0
    } else {
        cursor_pos - inner_width + 1
    };

    let visible_text: String = session
        .input()
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let text_color = if loading { Color::DarkGray } else { Color::Cyan };
    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(text_color))
        .block(block);
    frame.render_widget(input, area);

    if editing && !loading {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}
