use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, widgets::Paragraph, Terminal};
use tracing::trace;

use crate::error::{Error, Result};
use crate::sshconfig::SshHost;
use crate::view;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    Confirm,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Browsing,
    Confirmed,
    Cancelled,
}

/// Where key events come from. Blocks until the next one is available.
pub trait EventSource {
    fn next_event(&mut self) -> io::Result<Event>;
}

pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_event(&mut self) -> io::Result<Event> {
        event::read()
    }
}

#[derive(Debug)]
pub struct SelectBox {
    pub data: Vec<SshHost>,
    cursor: usize,
    selected: Option<usize>,
    status: Status,
}

impl SelectBox {
    pub fn new(data: Vec<SshHost>) -> Self {
        Self {
            data,
            cursor: 0,
            selected: None,
            status: Status::Browsing,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status != Status::Browsing
    }

    /// The confirmed host, if the session ended with a selection.
    pub fn selection(&self) -> Option<&SshHost> {
        match self.status {
            Status::Confirmed => self.selected.and_then(|i| self.data.get(i)),
            _ => None,
        }
    }

    pub fn into_selection(self) -> Option<SshHost> {
        match self.status {
            Status::Confirmed => self.selected.and_then(|i| self.data.into_iter().nth(i)),
            _ => None,
        }
    }

    pub fn apply(&mut self, action: Action) -> Status {
        match action {
            Action::Quit => {
                self.status = Status::Cancelled;
                trace!("selection cancelled");
            }
            // terminal states ignore navigation
            _ if self.is_finished() => {}
            Action::MoveUp => self.up(),
            Action::MoveDown => self.down(),
            Action::Confirm => {
                if self.cursor < self.data.len() {
                    self.selected = Some(self.cursor);
                    self.status = Status::Confirmed;
                    trace!(index = self.cursor, "selection confirmed");
                }
            }
        }
        self.status
    }

    fn up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    fn down(&mut self) {
        if self.cursor + 1 < self.data.len() {
            self.cursor += 1;
        }
    }

    /// Runs the picker until the user confirms a host or quits.
    pub fn select<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut impl EventSource,
    ) -> Result<Option<&SshHost>> {
        self.draw(terminal)?;
        while !self.is_finished() {
            match events.next_event().map_err(Error::Ui)? {
                Event::Key(key) => {
                    if let Some(action) = key_action(&key) {
                        self.apply(action);
                    }
                }
                Event::Resize(_, _) => {}
                _ => continue,
            }
            self.draw(terminal)?;
        }
        Ok(self.selection())
    }

    pub fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        let text = view::render(self);
        terminal
            .draw(|frame| frame.render_widget(Paragraph::new(text), frame.size()))
            .map_err(Error::Ui)?;
        Ok(())
    }
}

pub fn key_action(key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    use KeyCode::*;
    match key.code {
        Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        Char('q') | Esc => Some(Action::Quit),
        Up | Char('k') => Some(Action::MoveUp),
        Down | Char('j') => Some(Action::MoveDown),
        Enter | Char(' ') => Some(Action::Confirm),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sshconfig::DEFAULT_PORT;
    use ratatui::backend::TestBackend;
    use std::collections::VecDeque;

    impl EventSource for VecDeque<Event> {
        fn next_event(&mut self) -> io::Result<Event> {
            self.pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more events"))
        }
    }

    fn host(alias: &str) -> SshHost {
        SshHost {
            alias: alias.to_string(),
            hostname: format!("{alias}.lan"),
            user: String::new(),
            port: DEFAULT_PORT.to_string(),
        }
    }

    fn hosts(n: usize) -> Vec<SshHost> {
        (0..n).map(|i| host(&format!("h{i}"))).collect()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn move_down_stops_at_last_host() {
        let n = 4;
        let mut state = SelectBox::new(hosts(n));
        for _ in 0..n - 1 {
            state.apply(Action::MoveDown);
        }
        assert_eq!(state.cursor(), n - 1);
        state.apply(Action::MoveDown);
        assert_eq!(state.cursor(), n - 1);
    }

    #[test]
    fn move_up_stops_at_first_host() {
        let mut state = SelectBox::new(hosts(3));
        state.apply(Action::MoveUp);
        assert_eq!(state.cursor(), 0);
        state.apply(Action::MoveDown);
        state.apply(Action::MoveDown);
        state.apply(Action::MoveUp);
        state.apply(Action::MoveUp);
        state.apply(Action::MoveUp);
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn confirm_on_empty_list_keeps_browsing() {
        let mut state = SelectBox::new(Vec::new());
        assert_eq!(state.apply(Action::Confirm), Status::Browsing);
        assert_eq!(state.selected_index(), None);
        state.apply(Action::MoveDown);
        state.apply(Action::MoveUp);
        assert_eq!(state.status(), Status::Browsing);
        assert_eq!(state.apply(Action::Quit), Status::Cancelled);
    }

    #[test]
    fn confirm_selects_cursor() {
        let mut state = SelectBox::new(hosts(3));
        state.apply(Action::MoveDown);
        assert_eq!(state.apply(Action::Confirm), Status::Confirmed);
        assert_eq!(state.selected_index(), Some(1));
        assert_eq!(state.selection().map(|h| h.alias.as_str()), Some("h1"));
    }

    #[test]
    fn finished_state_ignores_navigation() {
        let mut state = SelectBox::new(hosts(3));
        state.apply(Action::Confirm);
        state.apply(Action::MoveDown);
        state.apply(Action::Confirm);
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.selected_index(), Some(0));

        let mut state = SelectBox::new(hosts(3));
        state.apply(Action::MoveDown);
        state.apply(Action::Quit);
        state.apply(Action::MoveDown);
        state.apply(Action::Confirm);
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.selected_index(), None);
        assert!(state.selection().is_none());
    }

    #[test]
    fn keys_map_to_actions() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(key_action(&press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(key_action(&press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            key_action(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(key_action(&press(KeyCode::Char('c'))), None);
        assert_eq!(key_action(&press(KeyCode::Char('k'))), Some(Action::MoveUp));
        assert_eq!(key_action(&press(KeyCode::Down)), Some(Action::MoveDown));
        assert_eq!(key_action(&press(KeyCode::Enter)), Some(Action::Confirm));
        assert_eq!(key_action(&press(KeyCode::Char(' '))), Some(Action::Confirm));

        let mut release = press(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(key_action(&release), None);
    }

    #[test]
    fn loop_returns_confirmed_host() {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let mut events: VecDeque<Event> = [
            key(KeyCode::Down),
            key(KeyCode::Char('j')),
            key(KeyCode::Char('k')),
            key(KeyCode::Enter),
            // never read: the loop stops at the confirmation
            key(KeyCode::Down),
        ]
        .into();

        let mut state = SelectBox::new(hosts(3));
        let selected = state.select(&mut terminal, &mut events).unwrap().cloned();
        assert_eq!(selected, Some(host("h1")));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn loop_returns_none_on_quit() {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let mut events: VecDeque<Event> = [key(KeyCode::Down), key(KeyCode::Char('q'))].into();

        let mut state = SelectBox::new(hosts(2));
        assert!(state.select(&mut terminal, &mut events).unwrap().is_none());
        assert_eq!(state.status(), Status::Cancelled);
    }

    #[test]
    fn empty_list_only_quits() {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let mut events: VecDeque<Event> = [
            key(KeyCode::Enter),
            key(KeyCode::Down),
            key(KeyCode::Char(' ')),
            key(KeyCode::Char('q')),
        ]
        .into();

        let mut state = SelectBox::new(Vec::new());
        assert!(state.select(&mut terminal, &mut events).unwrap().is_none());
        assert!(events.is_empty());

        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("No SSH hosts found in your config."));
    }

    #[test]
    fn event_read_failure_is_a_ui_error() {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let mut events = VecDeque::new();

        let mut state = SelectBox::new(hosts(1));
        let err = state.select(&mut terminal, &mut events).unwrap_err();
        assert!(matches!(err, Error::Ui(_)), "{err:?}");
    }
}
