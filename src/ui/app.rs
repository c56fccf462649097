use std::mem;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::debug;

use crate::models::Boat;
use crate::store::Inventory;

use super::forms::{BoatField, BoatForm, ConfirmRemove, PaymentForm};
use super::helpers::{centered_rect, location_label, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 10;

/// Fine-grained modes layered over the boat table.
enum Mode {
    Normal,
    AddingBoat(BoatForm),
    Paying(PaymentForm),
    ConfirmRemove(ConfirmRemove),
    ConfirmCharges,
    ConfirmQuit,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. The app owns the
/// inventory for the whole session and writes it back on `x`.
pub struct App {
    inventory: Inventory,
    data_path: PathBuf,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(inventory: Inventory, data_path: PathBuf) -> Self {
        Self {
            inventory,
            data_path,
            selected: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Feed one key press through the current mode. Returns `true` once the
    /// user has asked to leave.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBoat(form) => self.handle_add_boat(code, form),
            Mode::Paying(form) => self.handle_payment(code, form),
            Mode::ConfirmRemove(confirm) => self.handle_confirm_remove(code, confirm),
            Mode::ConfirmCharges => self.handle_confirm_charges(code),
            Mode::ConfirmQuit => self.handle_confirm_quit(code, &mut exit),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.clear_status();
                return Ok(Mode::ConfirmQuit);
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.inventory.len().saturating_sub(1),
            KeyCode::Char('i') | KeyCode::Char('I') => self.sort_inventory(),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('+') => {
                if self.inventory.is_full() {
                    self.set_status(
                        format!(
                            "Maximum number of boats reached ({}).",
                            self.inventory.capacity()
                        ),
                        StatusKind::Error,
                    );
                } else {
                    self.clear_status();
                    return Ok(Mode::AddingBoat(BoatForm::default()));
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char('-') => {
                if let Some(boat) = self.current_boat() {
                    let confirm = ConfirmRemove::from(self.selected, boat);
                    self.clear_status();
                    return Ok(Mode::ConfirmRemove(confirm));
                }
                self.set_status("No boat selected to remove.", StatusKind::Error);
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if let Some(boat) = self.current_boat() {
                    let form = PaymentForm::for_boat(self.selected, boat);
                    self.clear_status();
                    return Ok(Mode::Paying(form));
                }
                self.set_status("No boat selected for payment.", StatusKind::Error);
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.clear_status();
                return Ok(Mode::ConfirmCharges);
            }
            KeyCode::Char('x') | KeyCode::Char('X') => match self.save() {
                Ok(()) => *exit = true,
                Err(err) => {
                    let message = format!("Save failed: {}", surface_error(&err));
                    self.set_status(message, StatusKind::Error);
                }
            },
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_boat(&mut self, code: KeyCode, mut form: BoatForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add boat cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.cycle_field(1),
            KeyCode::BackTab | KeyCode::Up => form.cycle_field(-1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.add_boat(&form) {
                Ok(()) => return Mode::Normal,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingBoat(form)
    }

    fn handle_payment(&mut self, code: KeyCode, mut form: PaymentForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Payment cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.apply_payment(&form) {
                Ok(()) => return Mode::Normal,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Paying(form)
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmRemove) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.inventory.remove_at(confirm.index) {
                    Ok(boat) => {
                        self.clamp_selection();
                        self.set_status(format!("Removed {}.", boat.name), StatusKind::Info);
                    }
                    Err(err) => self.set_status(err.to_string(), StatusKind::Error),
                }
                Mode::Normal
            }
            _ => Mode::ConfirmRemove(confirm),
        }
    }

    fn handle_confirm_charges(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let total = self.inventory.apply_monthly_charges();
                self.set_status(
                    format!("Monthly charges applied (${total} total)."),
                    StatusKind::Info,
                );
                Mode::Normal
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Monthly charges not applied.", StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::ConfirmCharges,
        }
    }

    fn handle_confirm_quit(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                debug!("quitting without saving");
                *exit = true;
                Mode::Normal
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Mode::Normal,
            _ => Mode::ConfirmQuit,
        }
    }

    fn add_boat(&mut self, form: &BoatForm) -> Result<()> {
        let name = self.inventory.add_record(&form.to_record())?.name.clone();
        self.selected = self.inventory.len().saturating_sub(1);
        self.set_status(format!("Added {name}."), StatusKind::Info);
        Ok(())
    }

    fn apply_payment(&mut self, form: &PaymentForm) -> Result<()> {
        let amount = form.parse_amount()?;
        let payment = self.inventory.pay_at(form.index, amount)?;
        self.set_status(
            format!(
                "Payment of ${} accepted. {} now owes ${}.",
                payment.paid, payment.name, payment.remaining
            ),
            StatusKind::Info,
        );
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.inventory.save(&self.data_path)?;
        Ok(())
    }

    /// Sort by name and keep the cursor on the boat it was on.
    fn sort_inventory(&mut self) {
        let focused = self.current_boat().map(|boat| boat.name.clone());
        self.inventory.sort_by_name();
        if let Some(name) = focused {
            self.selected = self
                .inventory
                .iter()
                .position(|boat| boat.name == name)
                .unwrap_or(0);
        }
        self.set_status("Inventory sorted by name.", StatusKind::Info);
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_boat_table(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBoat(form) => self.draw_boat_form(frame, area, form),
            Mode::Paying(form) => self.draw_payment_form(frame, area, form),
            Mode::ConfirmRemove(confirm) => self.draw_confirm(
                frame,
                area,
                "Remove Boat",
                vec![
                    Line::from(format!("Remove {}?", confirm.name)),
                    Line::from(format!("Outstanding balance: ${}", confirm.owed)),
                ],
            ),
            Mode::ConfirmCharges => self.draw_confirm(
                frame,
                area,
                "Monthly Charges",
                vec![
                    Line::from(format!(
                        "Bill {} boats one month of storage?",
                        self.inventory.len()
                    )),
                    Line::from("Each run charges again."),
                ],
            ),
            Mode::ConfirmQuit => self.draw_confirm(
                frame,
                area,
                "Quit",
                vec![
                    Line::from("Quit without saving?"),
                    Line::from("Press x instead to save and exit."),
                ],
            ),
            Mode::Normal => {}
        }
    }

    fn draw_boat_table(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            "Boats {}/{}  Total owed ${}",
            self.inventory.len(),
            self.inventory.capacity(),
            self.inventory.total_owed()
        );
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.inventory.is_empty() {
            let message = Paragraph::new("No boats yet. Press 'a' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(["Name", "Length", "Place", "Location", "Owed"]).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let rows = self.inventory.iter().map(boat_row);
        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Length(16),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match &self.mode {
            Mode::AddingBoat(_) => &[
                ("[Tab]", " Next Field   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::Paying(_) => &[("[Enter]", " Pay   "), ("[Esc]", " Cancel")],
            Mode::ConfirmRemove(_) | Mode::ConfirmCharges | Mode::ConfirmQuit => {
                &[("[y]", " Yes   "), ("[n]", " No")]
            }
            Mode::Normal => &[
                ("[↑↓]", " Select   "),
                ("[i]", " Sort   "),
                ("[a]", " Add   "),
                ("[r]", " Remove   "),
                ("[p]", " Payment   "),
                ("[m]", " Month   "),
                ("[x]", " Save & Exit   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = keys
            .iter()
            .flat_map(|(key, action)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(action.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_boat_form(&self, frame: &mut Frame, area: Rect, form: &BoatForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Boat").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BoatField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch field • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let row = BoatField::ALL
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0);
        let prefix = form.active.label().len() as u16 + 2;
        let cursor_x = inner.x + prefix + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row as u16));
    }

    fn draw_payment_form(&self, frame: &mut Frame, area: Rect, form: &PaymentForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Payment").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(format!("{} owes ${}", form.name, form.owed)),
            Line::from(vec![
                Span::raw("Amount: "),
                Span::styled(form.amount.clone(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(""),
        ];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + "Amount: ".len() as u16 + form.amount.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y + 1));
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, title: &str, mut lines: Vec<Line>) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "y to confirm • n to cancel",
            Style::default().fg(Color::Gray),
        )));

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn current_boat(&self) -> Option<&Boat> {
        self.inventory.boats().get(self.selected)
    }

    fn move_selection(&mut self, offset: isize) {
        if self.inventory.is_empty() {
            return;
        }
        let last = self.inventory.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.inventory.len() {
            self.selected = self.inventory.len().saturating_sub(1);
        }
    }
}

fn boat_row(boat: &Boat) -> Row<'static> {
    Row::new(vec![
        Cell::from(boat.name.clone()),
        Cell::from(format!("{:>4}'", boat.length)),
        Cell::from(boat.place().as_str()),
        Cell::from(location_label(&boat.location)),
        Cell::from(format!("${:>10}", boat.amount_owed)),
    ])
}
