use crate::help::Help;
use crate::strip::{STRIP_LINES, Strip, WeekStrip};
use crate::theme::BASE_STYLE;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, read};
use ratatui::{
    Terminal,
    backend::Backend,
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    widgets::{StatefulWidget, Widget},
};
use std::io::{self, Write};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct App {
    strip: WeekStrip,
    state: AppState,
}

impl App {
    pub(crate) fn new(strip: WeekStrip) -> App {
        App {
            strip,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()>
    where
        io::Error: From<B::Error>,
    {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        let transitions = self.strip.transitions();
        log::info!(
            "Quitting with {} selected after {} transition requests",
            self.strip.selected(),
            transitions.requests()
        );
        if let Some(last) = transitions.last() {
            log::debug!("Last transition requested: {last:?}");
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        io::Error: From<B::Error>,
    {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.strip.focus_previous_day().is_ok(),
                KeyCode::Char('l') | KeyCode::Right => self.strip.focus_next_day().is_ok(),
                KeyCode::Char('j') | KeyCode::Down => self.strip.one_week_forwards().is_ok(),
                KeyCode::Char('k') | KeyCode::Up => self.strip.one_week_backwards().is_ok(),
                KeyCode::Enter | KeyCode::Char(' ') => self.strip.press_focused(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.strip.jump_to_today();
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [strip_area] = Layout::vertical([STRIP_LINES])
            .flex(Flex::Center)
            .areas(area);
        Strip.render(strip_area, buf, &mut self.strip);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Quitting,
}
