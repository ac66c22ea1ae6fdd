//! Full-screen terminal host for the recorder.
//!
//! Maps key presses and signals to [`ScreenEvent`]s, draws the status line,
//! the record/stop triggers and the recordings list, and shows notices and
//! the microphone consent prompt as centered modals.

use super::controller::{ListChange, Notice, NoticeLevel, ScreenController, ScreenEvent};
use super::list::ListPresenter;
use crate::recording::{CaptureBackend, PlaybackBackend};
use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};
use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(255, 255, 255);
const DISABLED_FG: Color = Color::Rgb(70, 70, 70);
const HELP_FG: Color = Color::Rgb(100, 100, 100);
const RECORD_RED: Color = Color::Rgb(220, 50, 50);

const NOTICE_DURATION: Duration = Duration::from_millis(1500);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The interactive recorder screen.
pub struct RecorderScreen<C: CaptureBackend, P: PlaybackBackend> {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    controller: ScreenController<C, P>,
    presenter: ListPresenter,
    notices: VecDeque<Notice>,
    shown_notice: Option<(Notice, Instant)>,
    /// Set by SIGUSR1: acts like the stop trigger
    stop_requested: Arc<AtomicBool>,
    /// Set by SIGTERM/SIGHUP: leave the screen
    quit_requested: Arc<AtomicBool>,
    restored: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum InputAction {
    Exit,
    Dispatch(ScreenEvent),
}

impl<C: CaptureBackend, P: PlaybackBackend> RecorderScreen<C, P> {
    /// Takes over the terminal and installs signal handlers.
    ///
    /// # Errors
    /// - If the terminal cannot be switched to raw/alternate mode
    /// - If a signal handler cannot be registered
    pub fn new(controller: ScreenController<C, P>) -> Result<Self> {
        let stop_requested = Arc::new(AtomicBool::new(false));
        let quit_requested = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&stop_requested))
            .map_err(|e| anyhow!("Failed to register signal handler: {e}"))?;
        for signal in [signal_hook::consts::SIGTERM, signal_hook::consts::SIGHUP] {
            signal_hook::flag::register(signal, Arc::clone(&quit_requested))
                .map_err(|e| anyhow!("Failed to register signal handler: {e}"))?;
        }

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            controller,
            presenter: ListPresenter::new(),
            notices: VecDeque::new(),
            shown_notice: None,
            stop_requested,
            quit_requested,
            restored: false,
        })
    }

    /// Runs until the user quits or a termination signal arrives.
    ///
    /// Audio handles are released on the way out, including on errors.
    pub fn run(&mut self) -> Result<()> {
        tracing::debug!("Recorder screen started");
        let result = self.event_loop();
        self.dispatch(ScreenEvent::Teardown);
        self.cleanup()?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        loop {
            if self.quit_requested.load(Ordering::Relaxed) {
                tracing::info!("Termination signal received, leaving recorder");
                return Ok(());
            }
            if self.stop_requested.swap(false, Ordering::Relaxed) {
                tracing::info!("Received SIGUSR1: stopping via external trigger");
                self.dispatch(ScreenEvent::Stop);
            }

            self.advance_notice();
            self.draw()?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    match map_key(&self.controller, &mut self.presenter, key) {
                        Some(InputAction::Exit) => return Ok(()),
                        Some(InputAction::Dispatch(event)) => self.dispatch(event),
                        None => {}
                    }
                }
            }
        }
    }

    fn dispatch(&mut self, event: ScreenEvent) {
        if let ListChange::InsertedAt(index) = self.controller.handle(event) {
            self.presenter
                .notify_inserted(index, self.controller.recordings().len());
        }
        self.notices.extend(self.controller.take_notices());
    }

    /// Expires the visible notice and promotes the next queued one.
    fn advance_notice(&mut self) {
        if let Some((_, shown_at)) = &self.shown_notice {
            if shown_at.elapsed() < NOTICE_DURATION {
                return;
            }
            self.shown_notice = None;
        }
        if let Some(next) = self.notices.pop_front() {
            self.shown_notice = Some((next, Instant::now()));
        }
    }

    fn draw(&mut self) -> Result<()> {
        let controller = &self.controller;
        let presenter = &mut self.presenter;
        let notice = self.shown_notice.as_ref().map(|(n, _)| n);

        self.terminal.draw(|frame| {
            let area = frame.area();
            let padding_block = Block::default()
                .padding(Padding::uniform(1))
                .style(Style::default().fg(FG).bg(BG));
            frame.render_widget(&padding_block, area);
            let inner = padding_block.inner(area);

            let [status_area, triggers_area, list_area, footer_area] = Layout::vertical([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(inner);

            let status_line = if controller.is_capturing() {
                Line::from(vec![
                    Span::styled("● ", Style::default().fg(RECORD_RED)),
                    Span::raw(controller.status()),
                ])
            } else {
                Line::from(Span::raw(controller.status()))
            };
            frame.render_widget(Paragraph::new(status_line), status_area);

            let triggers = Line::from(vec![
                trigger_span(" r  Record ", controller.record_enabled()),
                Span::raw("   "),
                trigger_span(" s  Stop ", controller.stop_enabled()),
            ]);
            frame.render_widget(Paragraph::new(triggers), triggers_area);

            presenter.render(frame, list_area, controller.recordings());

            frame.render_widget(
                Paragraph::new("↑↓ select, ↵ play, r record, s stop, q quit")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(HELP_FG)),
                footer_area,
            );

            if controller.permission_pending() {
                render_modal(
                    frame,
                    area,
                    "Allow taper to use the microphone? [y/n]",
                    Style::default().bg(Color::Yellow).fg(Color::Black),
                );
            } else if let Some(notice) = notice {
                let style = match notice.level {
                    NoticeLevel::Info => Style::default().bg(Color::Green).fg(Color::Black),
                    NoticeLevel::Error => Style::default().bg(Color::Red).fg(Color::White),
                };
                render_modal(frame, area, &notice.message, style);
            }
        })?;

        Ok(())
    }

    /// Restores the terminal. Safe to call more than once.
    fn cleanup(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        tracing::debug!("Recorder screen terminal cleanup complete");
        Ok(())
    }
}

impl<C: CaptureBackend, P: PlaybackBackend> Drop for RecorderScreen<C, P> {
    fn drop(&mut self) {
        self.controller.handle(ScreenEvent::Teardown);
        let _ = self.cleanup();
    }
}

/// Maps a key press to what the screen should do.
///
/// Navigation keys move the list highlight in place. While a microphone
/// request is pending only the y/n answer keys and Ctrl-C are live.
fn map_key<C: CaptureBackend, P: PlaybackBackend>(
    controller: &ScreenController<C, P>,
    presenter: &mut ListPresenter,
    key: KeyEvent,
) -> Option<InputAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputAction::Exit);
    }

    if controller.permission_pending() {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                Some(InputAction::Dispatch(ScreenEvent::PermissionResult(true)))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                Some(InputAction::Dispatch(ScreenEvent::PermissionResult(false)))
            }
            _ => None,
        };
    }

    let item_count = controller.recordings().len();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(InputAction::Exit),
        KeyCode::Char('r') if controller.record_enabled() => {
            Some(InputAction::Dispatch(ScreenEvent::Record))
        }
        KeyCode::Char('s') if controller.stop_enabled() => {
            Some(InputAction::Dispatch(ScreenEvent::Stop))
        }
        KeyCode::Up | KeyCode::Char('k') => {
            presenter.select_previous(item_count);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            presenter.select_next(item_count);
            None
        }
        KeyCode::Enter => presenter
            .selected()
            .map(|row| InputAction::Dispatch(ScreenEvent::Play(row))),
        _ => None,
    }
}

fn trigger_span(label: &'static str, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default().fg(BG).bg(FG).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DISABLED_FG).bg(Color::Rgb(25, 25, 25))
    };
    Span::styled(label, style)
}

/// Draws `message` in a small box centered on `screen_area`.
fn render_modal(frame: &mut Frame, screen_area: Rect, message: &str, style: Style) {
    let width = (message.chars().count() as u16)
        .saturating_add(4)
        .min(screen_area.width);
    let height = 3.min(screen_area.height);
    let modal_area = Rect {
        x: screen_area.x + screen_area.width.saturating_sub(width) / 2,
        y: screen_area.y + screen_area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let block = Block::default().borders(Borders::ALL).style(style);
    frame.render_widget(&block, modal_area);
    frame.render_widget(
        Paragraph::new(message)
            .style(style)
            .alignment(Alignment::Center),
        block.inner(modal_area),
    );
}
