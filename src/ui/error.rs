//! Full-screen error display for failures before the recorder screen starts.

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph, Wrap},
};
use std::io::{self, Stdout};
use std::time::Duration;

const ERROR_BG: Color = Color::Rgb(160, 20, 20);
const ERROR_FG: Color = Color::Rgb(255, 255, 255);

/// Red screen with a centered, wrapped message, dismissed by any key.
pub struct ErrorScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl ErrorScreen {
    /// Enters the alternate screen in raw mode.
    ///
    /// # Errors
    /// - If the terminal cannot be initialized
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    /// Shows `title` and `message` until a key is pressed.
    ///
    /// # Errors
    /// - If rendering or input polling fails
    pub fn show(&mut self, title: &str, message: &str) -> anyhow::Result<()> {
        loop {
            self.terminal
                .draw(|frame| render_error(frame, title, message))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Restores the terminal. Safe to call more than once.
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for ErrorScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Shows an error screen for `message` and restores the terminal afterwards.
///
/// Failures of the screen itself are logged and otherwise ignored, so the
/// caller can still report the original error.
pub fn report_fatal(title: &str, message: &str) {
    let shown = ErrorScreen::new().and_then(|mut screen| {
        screen.show(title, message)?;
        screen.cleanup()
    });
    if let Err(e) = shown {
        tracing::warn!("Could not display error screen: {}", e);
    }
}

fn render_error(frame: &mut Frame, title: &str, message: &str) {
    let area = frame.area();
    let style = Style::default().fg(ERROR_FG).bg(ERROR_BG);
    frame.render_widget(Block::default().style(style), area);

    let text_area = Rect {
        x: area.x + area.width / 10,
        y: area.y + area.height / 3,
        width: area.width * 8 / 10,
        height: area.height - area.height / 3,
    };

    let text = Text::from(vec![
        Line::styled(title, style.add_modifier(Modifier::BOLD)),
        Line::raw(""),
        Line::raw(message),
        Line::raw(""),
        Line::styled("press any key", style.add_modifier(Modifier::DIM)),
    ]);
    frame.render_widget(
        Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        text_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_render_error_wraps_message() {
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal
            .draw(|frame| {
                render_error(
                    frame,
                    "Configuration Error",
                    "Invalid config in /home/u/.config/taper/taper.toml",
                )
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Configuration Error"));
        assert!(text.contains("press any key"));
    }
}
