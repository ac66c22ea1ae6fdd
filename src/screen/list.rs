//! Scrollable recordings list.

use crate::recording::RecordingList;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, ListState, Padding},
};

const NAME_FG: Color = Color::Rgb(255, 255, 255);
const DETAIL_FG: Color = Color::Rgb(100, 100, 100);
const HIGHLIGHT_BG: Color = Color::Rgb(20, 20, 20);

/// What one row of the list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingRow {
    pub name: String,
    pub duration: String,
    pub date: String,
}

/// Anything the presenter can draw rows from.
pub trait RowSource {
    fn item_count(&self) -> usize;
    fn bind(&self, index: usize) -> Option<RecordingRow>;
}

impl RowSource for RecordingList {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn bind(&self, index: usize) -> Option<RecordingRow> {
        self.get(index).map(|entry| RecordingRow {
            name: entry.name().to_string(),
            duration: entry.duration().to_string(),
            date: entry.display_date(),
        })
    }
}

/// Selection and rendering state for the recordings list.
#[derive(Debug, Default)]
pub struct ListPresenter {
    state: ListState,
}

impl ListPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row currently highlighted, if any.
    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Adjusts the highlight after a row was inserted at `index`.
    ///
    /// The highlight stays on the entry it was on; an empty list gets its
    /// first row selected.
    pub fn notify_inserted(&mut self, index: usize, item_count: usize) {
        match self.state.selected() {
            None => self.state.select(Some(0)),
            Some(selected) if selected >= index => {
                self.state.select(Some((selected + 1).min(item_count.saturating_sub(1))))
            }
            Some(_) => {}
        }
    }

    pub fn select_next(&mut self, item_count: usize) {
        if item_count == 0 {
            return;
        }
        let next = self
            .state
            .selected()
            .map_or(0, |i| (i + 1).min(item_count - 1));
        self.state.select(Some(next));
    }

    pub fn select_previous(&mut self, item_count: usize) {
        if item_count == 0 {
            return;
        }
        let previous = self.state.selected().map_or(0, |i| i.saturating_sub(1));
        self.state.select(Some(previous));
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, source: &impl RowSource) {
        let items: Vec<ListItem> = (0..source.item_count())
            .filter_map(|index| source.bind(index))
            .map(|row| {
                ListItem::new(vec![
                    Line::styled(row.name, Style::default().fg(NAME_FG)),
                    Line::styled(
                        format!("{} · {}", row.duration, row.date),
                        Style::default().fg(DETAIL_FG),
                    ),
                ])
            })
            .collect();

        let title = format!(" Recordings ({}) ", items.len());
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .padding(Padding::horizontal(1)),
            )
            .highlight_style(Style::default().bg(HIGHLIGHT_BG))
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::Recording;
    use chrono::{Local, TimeZone};
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;
    use std::time::Duration;

    fn list_with(count: u32) -> RecordingList {
        let mut list = RecordingList::new();
        for i in 0..count {
            let finished = Local.with_ymd_and_hms(2026, 3, 4, 10, 0, i).unwrap();
            list.insert_at_head(Recording::new(
                PathBuf::from(format!("/cache/recording_{i}.mp3")),
                Duration::from_secs(61 + i as u64),
                finished,
            ));
        }
        list
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_bind_projects_entry() {
        let list = list_with(2);
        assert_eq!(list.item_count(), 2);
        assert_eq!(
            list.bind(0),
            Some(RecordingRow {
                name: "Recording_20260304_100001".to_string(),
                duration: "1:02".to_string(),
                date: "Mar 4, 2026".to_string(),
            })
        );
        assert_eq!(list.bind(2), None);
    }

    #[test]
    fn test_insert_keeps_highlight_on_same_entry() {
        let mut presenter = ListPresenter::new();
        presenter.notify_inserted(0, 1);
        assert_eq!(presenter.selected(), Some(0));

        presenter.notify_inserted(0, 2);
        assert_eq!(presenter.selected(), Some(1));

        presenter.select_previous(2);
        assert_eq!(presenter.selected(), Some(0));
        presenter.notify_inserted(0, 3);
        assert_eq!(presenter.selected(), Some(1));
    }

    #[test]
    fn test_selection_clamps_to_list() {
        let mut presenter = ListPresenter::new();
        presenter.select_next(0);
        assert_eq!(presenter.selected(), None);

        presenter.select_next(2);
        presenter.select_next(2);
        presenter.select_next(2);
        assert_eq!(presenter.selected(), Some(1));

        presenter.select_previous(2);
        presenter.select_previous(2);
        assert_eq!(presenter.selected(), Some(0));
    }

    #[test]
    fn test_render_shows_rows() {
        let list = list_with(2);
        let mut presenter = ListPresenter::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();

        terminal
            .draw(|frame| presenter.render(frame, frame.area(), &list))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Recordings (2)"));
        assert!(text.contains("Recording_20260304_100001"));
        assert!(text.contains("1:02 · Mar 4, 2026"));
        assert!(text.contains("Recording_20260304_100000"));
    }
}
