use std::{cmp, io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use hotelres_core::{
    models::format_amount, BookingId, Hotel, ReservationStore, RoomCategory, RoomNumber,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_INPUT_LEN: usize = 48;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    selection_fg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            selection_fg: Color::White,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

/// Menu entries, numbered the way the classic console menu numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    Book,
    Cancel,
    View,
    Save,
    Load,
    Quit,
}

impl Action {
    const ALL: [Action; 7] = [
        Action::Search,
        Action::Book,
        Action::Cancel,
        Action::View,
        Action::Save,
        Action::Load,
        Action::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            Action::Search => "Search Rooms",
            Action::Book => "Book Room",
            Action::Cancel => "Cancel Reservation",
            Action::View => "View Reservations",
            Action::Save => "Save",
            Action::Load => "Load",
            Action::Quit => "Exit",
        }
    }

    fn shortcut(&self) -> char {
        match self {
            Action::Search => '1',
            Action::Book => '2',
            Action::Cancel => '3',
            Action::View => '4',
            Action::Save => '5',
            Action::Load => '6',
            Action::Quit => '0',
        }
    }

    fn from_shortcut(ch: char) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|action| action.shortcut() == ch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PromptKind {
    SearchCategory,
    GuestName,
    BookCategory { guest: String },
    BookingId,
}

impl PromptKind {
    fn title(&self) -> String {
        match self {
            PromptKind::SearchCategory => "Search Rooms".to_string(),
            PromptKind::GuestName => "Book Room".to_string(),
            PromptKind::BookCategory { guest } => format!("Book Room - {guest}"),
            PromptKind::BookingId => "Cancel Reservation".to_string(),
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            PromptKind::SearchCategory | PromptKind::BookCategory { .. } => {
                "Enter category (Standard/Deluxe/Suite)"
            }
            PromptKind::GuestName => "Enter your name",
            PromptKind::BookingId => "Enter Booking ID to cancel",
        }
    }
}

#[derive(Debug, Clone)]
struct InputPrompt {
    kind: PromptKind,
    input: String,
    /// Position in chars, not bytes.
    cursor: usize,
}

impl InputPrompt {
    fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
            cursor: 0,
        }
    }

    fn char_len(&self) -> usize {
        self.input.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(idx, _)| idx)
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.char_len() as isize;
        let next = (self.cursor as isize + delta).clamp(0, len);
        self.cursor = next as usize;
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    fn insert(&mut self, ch: char) {
        if self.char_len() >= MAX_INPUT_LEN || ch.is_control() {
            return;
        }
        if matches!(self.kind, PromptKind::BookingId) && !ch.is_ascii_digit() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.input.insert(at, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 && self.cursor <= self.char_len() {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.input.remove(at);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.input.remove(at);
        }
    }

    fn value(&self) -> String {
        self.input.trim().to_string()
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal front end driving a [`Hotel`] through the booking menu.
pub struct HotelApp {
    hotel: Hotel,
    store: ReservationStore,
    state: UiState,
    prompt: Option<InputPrompt>,
    theme: Theme,
}

impl HotelApp {
    pub fn new(hotel: Hotel, store: ReservationStore) -> Self {
        Self {
            hotel,
            store,
            state: UiState::default(),
            prompt: None,
            theme: Theme::default(),
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.state.set_status(message.into());
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let result: Result<()> = loop {
            if let Err(err) = terminal.draw(|frame| self.draw(frame)) {
                break Err(err.into());
            }
            if self.state.should_quit {
                break Ok(());
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => self.handle_event(event),
                Some(AppEvent::Tick) => {}
                None => break Ok(()),
            }
        };

        restore_terminal(&mut terminal)?;
        info!("Console closed");
        result
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
        } else {
            self.handle_menu_key(key);
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.should_quit = true
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.move_menu_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_menu_cursor(-1),
            KeyCode::Enter => {
                let action = Action::ALL[self.state.menu_cursor];
                self.trigger(action);
            }
            KeyCode::Char(ch) => {
                if let Some(action) = Action::from_shortcut(ch) {
                    self.state.menu_cursor = Action::ALL
                        .iter()
                        .position(|candidate| *candidate == action)
                        .unwrap_or(0);
                    self.trigger(action);
                }
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                self.set_status("Cancelled");
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    self.submit(prompt);
                }
            }
            KeyCode::Left => prompt.move_cursor(-1),
            KeyCode::Right => prompt.move_cursor(1),
            KeyCode::Home => prompt.move_home(),
            KeyCode::End => prompt.move_end(),
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Delete => prompt.delete(),
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    prompt.insert(ch);
                }
            }
            _ => {}
        }
    }

    fn trigger(&mut self, action: Action) {
        match action {
            Action::Search => self.prompt = Some(InputPrompt::new(PromptKind::SearchCategory)),
            Action::Book => self.prompt = Some(InputPrompt::new(PromptKind::GuestName)),
            Action::Cancel => self.prompt = Some(InputPrompt::new(PromptKind::BookingId)),
            Action::View => self.view_reservations(),
            Action::Save => self.save(),
            Action::Load => self.load(),
            Action::Quit => {
                self.state.should_quit = true;
                self.set_status("Goodbye!");
            }
        }
    }

    fn submit(&mut self, prompt: InputPrompt) {
        let value = prompt.value();
        match prompt.kind {
            PromptKind::SearchCategory => self.search(&value),
            PromptKind::GuestName => {
                if value.is_empty() {
                    self.set_status("Guest name must not be empty");
                } else {
                    self.prompt = Some(InputPrompt::new(PromptKind::BookCategory { guest: value }));
                }
            }
            PromptKind::BookCategory { guest } => self.book(&guest, &value),
            PromptKind::BookingId => match value.parse::<BookingId>() {
                Ok(id) => self.cancel(id),
                Err(_) => self.set_status(format!("'{value}' is not a booking id")),
            },
        }
    }

    fn search(&mut self, category: &str) {
        let rooms = self.hotel.search_rooms(category);
        let message = if rooms.is_empty() {
            format!("No available {category} rooms")
        } else {
            let listed = rooms
                .iter()
                .map(|number| format!("Room {number}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Available {category} rooms: {listed}")
        };
        self.state.highlighted = rooms;
        self.set_status(message);
    }

    fn book(&mut self, guest: &str, category: &str) {
        match self.hotel.book_room(guest, category) {
            Ok(reservation) => {
                let message = format!(
                    "Payment successful: ${} • {}",
                    format_amount(reservation.amount_paid),
                    self.hotel.summary(&reservation)
                );
                self.state.highlighted.clear();
                self.set_status(message);
            }
            Err(err) => self.set_status(format!("Booking failed: {err}")),
        }
    }

    fn cancel(&mut self, booking_id: BookingId) {
        match self.hotel.cancel_reservation(booking_id) {
            Ok(_) => {
                self.state.highlighted.clear();
                self.set_status(format!("Reservation {booking_id} cancelled."));
            }
            Err(err) => self.set_status(format!("Cancel failed: {err}")),
        }
    }

    fn view_reservations(&mut self) {
        let count = self.hotel.list_reservations().len();
        if count == 0 {
            self.set_status("No reservations yet.");
        } else {
            self.set_status(format!("{count} reservation(s) on record"));
        }
    }

    fn save(&mut self) {
        match self.store.save(&self.hotel) {
            Ok(count) => {
                let message = format!(
                    "{count} reservation(s) saved to {}",
                    self.store.path().display()
                );
                self.set_status(message);
            }
            Err(err) => {
                error!(?err, "Save failed");
                self.set_status(format!("Save failed: {err}"));
            }
        }
    }

    fn load(&mut self) {
        match self.store.load(&mut self.hotel) {
            Ok(count) => {
                self.state.highlighted.clear();
                let message = format!(
                    "{count} reservation(s) loaded from {}",
                    self.store.path().display()
                );
                self.set_status(message);
            }
            Err(err) => {
                error!(?err, "Load failed");
                self.set_status(format!("Load failed: {err}"));
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(area);

        self.render_title(frame, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(28),
                Constraint::Percentage(35),
                Constraint::Min(30),
            ])
            .split(rows[1]);
        self.render_menu(frame, columns[0]);
        self.render_rooms(frame, columns[1]);
        self.render_reservations(frame, columns[2]);
        self.render_status(frame, rows[2]);

        if let Some(prompt) = &self.prompt {
            self.render_prompt(frame, prompt);
        }
    }

    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            "=== Hotel Reservation System ===",
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, area);
    }

    fn render_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = Action::ALL
            .iter()
            .map(|action| ListItem::new(format!("{}. {}", action.shortcut(), action.label())))
            .collect();
        let mut list_state = ListState::default();
        list_state.select(Some(self.state.menu_cursor));

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_rooms(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .hotel
            .registry()
            .rooms()
            .iter()
            .map(|room| {
                let (label, color) = if room.available {
                    ("free", self.theme.success)
                } else {
                    ("booked", self.theme.danger)
                };
                let mut number_style = Style::default().fg(self.theme.primary_fg);
                if self.state.highlighted.contains(&room.number()) {
                    number_style = number_style
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD);
                }
                Line::from(vec![
                    Span::styled(format!("{:>4} ", room.number()), number_style),
                    Span::raw(format!("{:<9}", room.category().as_str())),
                    Span::styled(
                        format!("${:<6}", format_amount(room.category().price())),
                        Style::default().fg(self.theme.muted),
                    ),
                    Span::styled(label, Style::default().fg(color)),
                ])
            })
            .collect();

        let free = RoomCategory::ALL
            .iter()
            .map(|category| {
                format!(
                    "{} {}",
                    category.as_str(),
                    self.hotel.search_rooms(category.as_str()).len()
                )
            })
            .collect::<Vec<_>>()
            .join(" · ");
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Rooms ({free} free)")),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_reservations(&self, frame: &mut Frame, area: Rect) {
        let reservations = self.hotel.list_reservations();
        let lines: Vec<Line> = if reservations.is_empty() {
            vec![Line::from(Span::styled(
                "No reservations yet.",
                Style::default().fg(self.theme.muted),
            ))]
        } else {
            reservations
                .iter()
                .map(|reservation| {
                    let summary = self.hotel.summary(reservation).to_string();
                    if reservation.room.is_registered() {
                        Line::from(summary)
                    } else {
                        Line::from(Span::styled(summary, Style::default().fg(self.theme.warning)))
                    }
                })
                .collect()
        };

        let title = format!(
            "Reservations ({}) • next id {}",
            reservations.len(),
            self.hotel.next_booking_id()
        );
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let secondary = format!(
            "Data file: {} ({})",
            self.store.path().display(),
            self.store.format()
        );
        let paragraph = Paragraph::new(vec![
            Line::from(self.state.status.clone()),
            Line::from(Span::styled(secondary, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_prompt(&self, frame: &mut Frame, prompt: &InputPrompt) {
        let frame_area = frame.size();
        let mut width = cmp::min(60_u16, frame_area.width.saturating_sub(4));
        width = cmp::max(width, 24_u16);
        let height = 6_u16.min(frame_area.height.saturating_sub(2)).max(5_u16);
        let area = centered_rect(width, height, frame_area);

        frame.render_widget(Clear, area);

        let input_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(prompt.input.clone()),
        ]);
        let helper = Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" confirm  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]);

        let paragraph = Paragraph::new(vec![
            Line::from(prompt.kind.instruction()),
            input_line,
            Line::from(""),
            helper,
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(prompt.kind.title()),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);

        let cursor_x =
            (area.x + 3 + prompt.cursor as u16).min(area.x + area.width.saturating_sub(2));
        let cursor_y = area.y + 2;
        frame.set_cursor(cursor_x, cursor_y);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    menu_cursor: usize,
    status: String,
    highlighted: Vec<RoomNumber>,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            menu_cursor: 0,
            status: "Ready".to_string(),
            highlighted: Vec::new(),
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = format!("[{}] {}", Local::now().format("%H:%M:%S"), message);
    }

    fn move_menu_cursor(&mut self, delta: isize) {
        let last = Action::ALL.len() as isize - 1;
        let idx = (self.menu_cursor as isize + delta).clamp(0, last);
        self.menu_cursor = idx as usize;
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotelres_core::RecordFormat;

    fn app() -> HotelApp {
        let path = std::env::temp_dir().join(format!("hotelres-app-{}.txt", std::process::id()));
        HotelApp::new(Hotel::new(), ReservationStore::new(path, RecordFormat::Comma))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut HotelApp, text: &str) {
        for ch in text.chars() {
            app.handle_event(key(KeyCode::Char(ch)));
        }
        app.handle_event(key(KeyCode::Enter));
    }

    #[test]
    fn booking_through_prompts() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('2')));
        assert_eq!(
            app.prompt.as_ref().map(|p| p.kind.clone()),
            Some(PromptKind::GuestName)
        );

        type_text(&mut app, "Bob");
        assert!(matches!(
            app.prompt.as_ref().map(|p| &p.kind),
            Some(PromptKind::BookCategory { guest }) if guest == "Bob"
        ));

        type_text(&mut app, "deluxe");
        assert!(app.prompt.is_none());
        assert!(app.state.status.contains("Payment successful: $100.0"));
        assert_eq!(app.hotel.list_reservations().len(), 1);
        assert_eq!(app.hotel.search_rooms("Deluxe"), vec![202]);
    }

    #[test]
    fn accented_names_are_kept_and_editable() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('2')));
        for ch in "Josée".chars() {
            app.handle_event(key(KeyCode::Char(ch)));
        }
        app.handle_event(key(KeyCode::Backspace));
        app.handle_event(key(KeyCode::Left));
        app.handle_event(key(KeyCode::Delete));
        app.handle_event(key(KeyCode::Char('é')));
        app.handle_event(key(KeyCode::Enter));
        assert!(matches!(
            app.prompt.as_ref().map(|p| &p.kind),
            Some(PromptKind::BookCategory { guest }) if guest == "José"
        ));

        type_text(&mut app, "Suite");
        assert_eq!(app.hotel.list_reservations()[0].guest_name, "José");
    }

    #[test]
    fn search_highlights_matching_rooms() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('1')));
        type_text(&mut app, "Standard");
        assert_eq!(app.state.highlighted, vec![101, 102]);
        assert!(app.state.status.contains("Room 101, Room 102"));
    }

    #[test]
    fn cancel_prompt_accepts_digits_only() {
        let mut app = app();
        app.hotel.book_room("Alice", "Suite").expect("booking");
        app.handle_event(key(KeyCode::Char('3')));
        type_text(&mut app, "x1");
        assert!(app.state.status.contains("Reservation 1 cancelled."));
        assert!(app.hotel.list_reservations().is_empty());

        app.handle_event(key(KeyCode::Char('3')));
        type_text(&mut app, "9");
        assert!(app.state.status.contains("booking id 9 not found"));
    }

    #[test]
    fn escape_closes_prompt_then_quits() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('2')));
        app.handle_event(key(KeyCode::Esc));
        assert!(app.prompt.is_none());
        assert!(!app.state.should_quit);
        app.handle_event(key(KeyCode::Esc));
        assert!(app.state.should_quit);
    }

    #[test]
    fn menu_cursor_stays_in_range() {
        let mut state = UiState::default();
        state.move_menu_cursor(-3);
        assert_eq!(state.menu_cursor, 0);
        state.move_menu_cursor(20);
        assert_eq!(state.menu_cursor, Action::ALL.len() - 1);
    }
}
