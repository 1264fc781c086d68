use std::mem;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use crossterm::event::KeyCode;
use log::warn;
use open::that as open_path;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::controller::ContactController;
use crate::error::ValidationError;
use crate::export::{export_contacts, ExportFormat};
use crate::models::{ContactId, ContactRecord, Field};

use super::forms::{ConfirmDelete, ContactForm};
use super::helpers::{centered_rect, offset_index, surface_error};

/// Title bar space above the table.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;
/// Marker, name, age, national id, email, phone.
const TABLE_WIDTHS: [Constraint; 6] = [
    Constraint::Length(1),
    Constraint::Percentage(28),
    Constraint::Length(4),
    Constraint::Length(12),
    Constraint::Percentage(36),
    Constraint::Length(11),
];
const SELECTED_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Magenta);

/// Fine-grained modes layered on top of the contact table.
enum Mode {
    Normal,
    Adding(ContactForm),
    Editing(ContactForm),
    ConfirmDelete(ConfirmDelete),
    Searching,
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

/// Central application state shared across the TUI.
pub struct App {
    controller: ContactController,
    /// Rows currently on screen: the controller's search result for `query`.
    visible: Vec<ContactRecord>,
    cursor: usize,
    query: String,
    mode: Mode,
    status: Option<StatusMessage>,
    export_dir: PathBuf,
    last_export: Option<PathBuf>,
}

impl App {
    pub fn new(controller: ContactController, export_dir: PathBuf) -> Self {
        let visible = controller.contacts().to_vec();
        Self {
            controller,
            visible,
            cursor: 0,
            query: String::new(),
            mode: Mode::Normal,
            status: None,
            export_dir,
            last_export: None,
        }
    }

    pub fn controller(&self) -> &ContactController {
        &self.controller
    }

    /// Release the store. Called once when the event loop ends.
    pub fn close(&mut self) -> Result<()> {
        self.controller.close()?;
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Adding(form) => self.handle_add_contact(code, form)?,
            Mode::Editing(form) => self.handle_edit_contact(code, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
            Mode::Searching => self.handle_search(code)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                if self.query.is_empty() {
                    *exit = true;
                } else {
                    self.set_query(String::new());
                    self.set_status("Search cleared.", StatusKind::Info);
                }
            }
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-PAGE_STEP),
            KeyCode::PageDown => self.move_cursor(PAGE_STEP),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.visible.len().saturating_sub(1),
            KeyCode::Char(' ') => self.toggle_selection(),
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                return Ok(Mode::Adding(ContactForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => return Ok(self.open_editor()),
            KeyCode::Char('-') | KeyCode::Char('d') => {
                let pending = self.controller.selected().map(ConfirmDelete::from);
                match pending {
                    Some(confirm) => {
                        self.clear_status();
                        return Ok(Mode::ConfirmDelete(confirm));
                    }
                    None => self.set_status(
                        ValidationError::NoSelection.to_string(),
                        StatusKind::Error,
                    ),
                }
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                self.clear_status();
                return Ok(Mode::Searching);
            }
            KeyCode::Char('c') => {
                self.controller.clear_selection();
                self.set_status("Selection cleared.", StatusKind::Info);
            }
            KeyCode::Char('p') | KeyCode::Char('P') => self.export(ExportFormat::Pdf),
            KeyCode::Char('x') | KeyCode::Char('X') => self.export(ExportFormat::Spreadsheet),
            KeyCode::Char('o') | KeyCode::Char('O') => self.open_last_export(),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_contact(&mut self, code: KeyCode, mut form: ContactForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add contact cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.cycle_field(true),
            KeyCode::BackTab | KeyCode::Up => form.cycle_field(false),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_contact(&form) {
                Ok(_) => keep_open = false,
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

        if keep_open {
            Ok(Mode::Adding(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_edit_contact(&mut self, code: KeyCode, mut form: ContactForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.cycle_field(true),
            KeyCode::BackTab | KeyCode::Up => form.cycle_field(false),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_existing_contact(&form) {
                Ok(_) => keep_open = false,
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

        if keep_open {
            Ok(Mode::Editing(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(_) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::Normal)
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    /// Incremental search: every keystroke re-filters the table.
    fn handle_search(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_query(String::new());
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                if !self.query.is_empty() {
                    self.set_status(
                        format!("{} contacts match '{}'.", self.visible.len(), self.query),
                        StatusKind::Info,
                    );
                }
                return Ok(Mode::Normal);
            }
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-PAGE_STEP),
            KeyCode::PageDown => self.move_cursor(PAGE_STEP),
            KeyCode::Backspace => {
                let mut query = mem::take(&mut self.query);
                query.pop();
                self.set_query(query);
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    let mut query = mem::take(&mut self.query);
                    query.push(ch);
                    self.set_query(query);
                }
            }
            _ => {}
        }
        Ok(Mode::Searching)
    }

    /// Open the edit form for the selected contact, from the table or the
    /// search bar.
    pub(crate) fn handle_ctrl_e(&mut self) -> Result<()> {
        if matches!(self.mode, Mode::Normal | Mode::Searching) {
            self.mode = self.open_editor();
        }
        Ok(())
    }

    /// Inside a form, wipe every field. Elsewhere, drop the selection and the
    /// search filter.
    pub(crate) fn handle_ctrl_l(&mut self) -> Result<()> {
        if let Mode::Adding(form) | Mode::Editing(form) = &mut self.mode {
            *form = ContactForm::default();
            return Ok(());
        }

        if matches!(self.mode, Mode::Normal | Mode::Searching) {
            self.mode = Mode::Normal;
            self.controller.clear_selection();
            self.set_query(String::new());
            self.set_status("Selection and search cleared.", StatusKind::Info);
        }
        Ok(())
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Adding(form) => self.draw_contact_form(frame, area, "Add Contact", form),
            Mode::Editing(form) => self.draw_contact_form(frame, area, "Edit Contact", form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching => self.draw_search_bar(frame, area),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let total = self.controller.contacts().len();
        let mut summary = vec![
            Span::styled("Contact Book", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  •  {total} contacts")),
        ];
        if !self.query.is_empty() {
            summary.push(Span::raw(format!(
                "  •  {} matching '{}'",
                self.visible.len(),
                self.query
            )));
        }

        let selection = match self.controller.selected() {
            Some(contact) => Line::from(vec![
                Span::raw("Selected: "),
                Span::styled(contact.name.clone(), Style::default().fg(Color::Magenta)),
            ]),
            None => Line::from(Span::styled(
                "No contact selected",
                Style::default().fg(Color::DarkGray),
            )),
        };

        let header = Paragraph::new(vec![Line::from(summary), selection])
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        if self.visible.is_empty() {
            let text = if self.query.is_empty() {
                "No contacts yet. Press '+' to add one.".to_string()
            } else {
                format!("No contacts match '{}'.", self.query)
            };
            let message = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Contacts"));
            frame.render_widget(message, area);
            return;
        }

        let selected_id = self.controller.selected_id();
        let rows = self
            .visible
            .iter()
            .map(|contact| contact_row(contact, selected_id));
        let header = Row::new(
            ["", "Name", "Age", "National ID", "Email", "Phone"]
                .into_iter()
                .map(Cell::from),
        )
        .style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );

        let table = Table::new(rows, TABLE_WIDTHS)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Contacts"))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(self.cursor));
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
            Mode::Adding(_) | Mode::Editing(_) => &[
                ("[Tab]", " Next field   "),
                ("[Enter]", " Save   "),
                ("[Ctrl+L]", " Clear   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[Y]", " Delete   "), ("[N/Esc]", " Keep")],
            Mode::Searching => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Keep filter   "),
                ("[Esc]", " Clear search"),
            ],
            Mode::Normal => &[
                ("[↑↓]", " Navigate   "),
                ("[Space]", " Select   "),
                ("[+]", " Add   "),
                ("[e]", " Edit   "),
                ("[-]", " Delete   "),
                ("[f]", " Search   "),
                ("[p/x]", " PDF/Spreadsheet   "),
                ("[o]", " Open export   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search by name");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", self.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + self.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_contact_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &ContactForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = Field::ALL
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
                "Enter to save • Tab to switch fields • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let row = Field::ALL
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0) as u16;
        let prefix = form.active.label().len() as u16 + 2;
        let cursor_x = inner.x + prefix + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete '{}' (#{})?", confirm.name, confirm.id)),
            Line::from("This cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
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

    fn save_new_contact(&mut self, form: &ContactForm) -> Result<()> {
        let contact = self.controller.add(&form.draft)?;
        self.reload(Some(contact.id));
        self.set_status(format!("Added {}.", contact.name), StatusKind::Info);
        Ok(())
    }

    fn save_existing_contact(&mut self, form: &ContactForm) -> Result<()> {
        let contact = self.controller.update(&form.draft)?;
        self.reload(Some(contact.id));
        self.set_status(format!("Updated {}.", contact.name), StatusKind::Info);
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) -> Result<()> {
        self.controller.delete(&confirm.name)?;
        self.reload(None);
        self.set_status(format!("Deleted {}.", confirm.name), StatusKind::Info);
        Ok(())
    }

    fn open_editor(&mut self) -> Mode {
        match self.controller.reload_selected() {
            Ok(Some(record)) => {
                self.clear_status();
                self.reload(None);
                Mode::Editing(ContactForm::from_record(&record))
            }
            Ok(None) => {
                self.set_status(ValidationError::NoSelection.to_string(), StatusKind::Error);
                Mode::Normal
            }
            Err(err) => {
                warn!("event=edit_open module=ui status=error err={err}");
                self.reload(None);
                self.set_status(err.to_string(), StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn toggle_selection(&mut self) {
        let Some(id) = self.visible.get(self.cursor).map(|contact| contact.id) else {
            return;
        };

        match self.controller.select(id) {
            Ok(true) => {
                let name = self
                    .controller
                    .selected()
                    .map(|contact| contact.name.clone())
                    .unwrap_or_default();
                self.set_status(format!("Selected {name}."), StatusKind::Info);
            }
            Ok(false) => self.set_status("Selection cleared.", StatusKind::Info),
            Err(err) => {
                self.reload(None);
                self.set_status(err.to_string(), StatusKind::Error);
            }
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let records = match self.controller.snapshot() {
            Ok(records) => records,
            Err(err) => {
                warn!("event=export module=ui status=error err={err}");
                let err = anyhow::Error::from(err);
                self.set_status(surface_error(&err), StatusKind::Error);
                return;
            }
        };

        match export_contacts(&records, format, &self.export_dir, Local::now()) {
            Ok(path) => {
                self.set_status(
                    format!(
                        "Exported {} contacts to {}. Press o to open.",
                        records.len(),
                        path.display()
                    ),
                    StatusKind::Info,
                );
                self.last_export = Some(path);
            }
            Err(err) => {
                warn!("event=export module=ui status=error format={format} err={err:#}");
                self.set_status(
                    format!("{format} export failed: {}", surface_error(&err)),
                    StatusKind::Error,
                );
            }
        }
    }

    fn open_last_export(&mut self) {
        let Some(path) = self.last_export.clone() else {
            self.set_status("Nothing exported yet.", StatusKind::Error);
            return;
        };

        if let Err(err) = open_path(&path) {
            self.set_status(format!("Failed to open export: {err}"), StatusKind::Error);
        } else {
            self.set_status(format!("Opened {}.", path.display()), StatusKind::Info);
        }
    }

    fn set_query(&mut self, query: String) {
        self.query = query;
        self.reload(None);
    }

    /// Repopulate the visible rows from the controller, keeping the cursor on
    /// `focus` when it is still listed.
    fn reload(&mut self, focus: Option<ContactId>) {
        self.visible = self.controller.search(&self.query);
        if self.visible.is_empty() {
            self.cursor = 0;
            return;
        }

        if let Some(id) = focus {
            if let Some(idx) = self.visible.iter().position(|contact| contact.id == id) {
                self.cursor = idx;
                return;
            }
        }

        if self.cursor >= self.visible.len() {
            self.cursor = self.visible.len() - 1;
        }
    }

    fn move_cursor(&mut self, offset: isize) {
        self.cursor = offset_index(self.cursor, offset, self.visible.len());
    }
}

fn contact_row(contact: &ContactRecord, selected: Option<ContactId>) -> Row<'static> {
    let is_selected = selected == Some(contact.id);
    let marker = if is_selected { "*" } else { " " };
    let row = Row::new(vec![
        Cell::from(marker),
        Cell::from(contact.name.clone()),
        Cell::from(contact.age.to_string()),
        Cell::from(contact.national_id.clone()),
        Cell::from(contact.email.clone()),
        Cell::from(contact.phone.clone()),
    ]);
    if is_selected {
        row.style(SELECTED_STYLE)
    } else {
        row
    }
}
