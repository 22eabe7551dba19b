use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::App;
use crate::chat::Sender;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let status = if app.session.is_online() {
        Span::styled("● Online", Style::default().fg(Color::Green))
    } else {
        Span::styled("● Desconectado", Style::default().fg(Color::Red))
    };

    let title = Line::from(vec![
        Span::styled(" SQL RAG Agent ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
        status,
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store inner dimensions for scroll/wrap calculations (minus borders)
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let block = Block::default().borders(Borders::ALL).title(" Conversa ");

    let empty = app.session.messages().is_empty() && !app.session.is_loading();
    let text = if empty {
        Text::from(Span::styled(
            "Aguardando comando...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in app.session.messages() {
            let stamp = Span::styled(
                format!(" {}", msg.timestamp.format("%H:%M")),
                Style::default().fg(Color::DarkGray),
            );
            match msg.sender {
                Sender::User => {
                    lines.push(
                        Line::from(vec![
                            Span::styled(
                                "Você",
                                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                            ),
                            stamp,
                        ])
                        .alignment(Alignment::Right),
                    );
                    for line in msg.text.lines() {
                        lines.push(Line::from(line.to_string()).alignment(Alignment::Right));
                    }
                    lines.push(Line::default());
                }
                Sender::Bot => {
                    lines.push(Line::from(vec![
                        Span::styled(
                            "Bot",
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        ),
                        stamp,
                    ]));
                    for line in msg.text.lines() {
                        lines.push(Line::from(line.to_string()));
                    }
                    lines.push(Line::default());
                }
            }
        }

        if app.session.is_loading() {
            lines.push(Line::from(Span::styled(
                "Bot",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Digitando{}", dots),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let transcript = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.scroll, 0));

    frame.render_widget(transcript, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let border_color = if app.session.is_loading() {
        Color::DarkGray
    } else {
        Color::Yellow
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Pergunta ");

    // Horizontal scroll keeps the cursor inside the visible slice
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.cursor;

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    if app.input.is_empty() {
        let placeholder = Paragraph::new("Ex: Qual a estrutura da tabela Z_LOG?")
            .style(Style::default().fg(Color::DarkGray))
            .block(input_block);
        frame.render_widget(placeholder, area);
    } else {
        let visible_text: String = app
            .input
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();

        let input = Paragraph::new(visible_text)
            .style(Style::default().fg(Color::Cyan))
            .block(input_block);
        frame.render_widget(input, area);
    }

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled(" Enter ", Style::default().bg(Color::DarkGray).fg(Color::White)),
        Span::raw(" enviar  "),
        Span::styled(" ↑/↓ ", Style::default().bg(Color::DarkGray).fg(Color::White)),
        Span::raw(" rolar  "),
        Span::styled(" Esc ", Style::default().bg(Color::DarkGray).fg(Color::White)),
        Span::raw(" sair"),
    ]);

    let footer = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}
