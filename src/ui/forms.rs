use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Boat, Money};

/// Internal representation of the "add boat" form fields. Each field holds
/// one column of a data-file record.
#[derive(Default, Clone)]
pub(crate) struct BoatForm {
    pub(crate) name: String,
    pub(crate) length: String,
    pub(crate) place: String,
    pub(crate) extra: String,
    pub(crate) owed: String,
    pub(crate) active: BoatField,
    pub(crate) error: Option<String>,
}

/// Fields available within the boat form, in tab order.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum BoatField {
    #[default]
    Name,
    Length,
    Place,
    Extra,
    Owed,
}

impl BoatField {
    pub(crate) const ALL: [BoatField; 5] = [
        BoatField::Name,
        BoatField::Length,
        BoatField::Place,
        BoatField::Extra,
        BoatField::Owed,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BoatField::Name => "Name",
            BoatField::Length => "Length",
            BoatField::Place => "Place",
            BoatField::Extra => "Extra",
            BoatField::Owed => "Owed",
        }
    }

    fn hint(self) -> &'static str {
        match self {
            BoatField::Name => "<required>",
            BoatField::Length => "<feet>",
            BoatField::Place => "<slip | land | trailor | storage>",
            BoatField::Extra => "<slip #, bay letter, trailer tag or storage #>",
            BoatField::Owed => "<0.00>",
        }
    }

    fn index(self) -> usize {
        BoatField::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

impl BoatForm {
    /// Move focus forward (`step = 1`) or backward (`step = -1`), wrapping.
    pub(crate) fn cycle_field(&mut self, step: isize) {
        let count = BoatField::ALL.len() as isize;
        let next = (self.active.index() as isize + step).rem_euclid(count);
        self.active = BoatField::ALL[next as usize];
    }

    fn value(&self, field: BoatField) -> &String {
        match field {
            BoatField::Name => &self.name,
            BoatField::Length => &self.length,
            BoatField::Place => &self.place,
            BoatField::Extra => &self.extra,
            BoatField::Owed => &self.owed,
        }
    }

    fn value_mut(&mut self, field: BoatField) -> &mut String {
        match field {
            BoatField::Name => &mut self.name,
            BoatField::Length => &mut self.length,
            BoatField::Place => &mut self.place,
            BoatField::Extra => &mut self.extra,
            BoatField::Owed => &mut self.owed,
        }
    }

    /// Append a character to the active field. Commas would split the record
    /// so they are refused everywhere.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let accepted = match self.active {
            BoatField::Length => ch.is_ascii_digit(),
            BoatField::Owed => ch.is_ascii_digit() || ch == '.',
            _ => !ch.is_control() && ch != ',',
        };
        if accepted {
            let field = self.active;
            self.value_mut(field).push(ch);
        }
        accepted
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Join the fields into a record line for the strict decoder. A blank
    /// amount means nothing is owed yet.
    pub(crate) fn to_record(&self) -> String {
        let owed = if self.owed.trim().is_empty() {
            "0"
        } else {
            self.owed.trim()
        };
        format!(
            "{},{},{},{},{}",
            self.name, self.length, self.place, self.extra, owed
        )
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BoatField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            field.hint().to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: BoatField) -> usize {
        self.value(field).chars().count()
    }
}

/// Amount entry for a payment against the selected boat.
#[derive(Clone)]
pub(crate) struct PaymentForm {
    /// Row of the boat being paid for.
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) owed: Money,
    pub(crate) amount: String,
    pub(crate) error: Option<String>,
}

impl PaymentForm {
    pub(crate) fn for_boat(index: usize, boat: &Boat) -> Self {
        Self {
            index,
            name: boat.name.clone(),
            owed: boat.amount_owed,
            amount: String::new(),
            error: None,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_ascii_digit() || (ch == '.' && !self.amount.contains('.')) {
            self.amount.push(ch);
            true
        } else {
            false
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.amount.pop();
    }

    pub(crate) fn parse_amount(&self) -> Result<Money> {
        let raw = self.amount.trim();
        if raw.is_empty() {
            return Err(anyhow!("Payment amount is required."));
        }
        raw.parse::<Money>()
            .context("Payment amount must be a number.")
    }
}

#[derive(Clone)]
pub(crate) struct ConfirmRemove {
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) owed: Money,
}

impl ConfirmRemove {
    /// Build the confirmation state from the boat being considered.
    pub(crate) fn from(index: usize, boat: &Boat) -> Self {
        Self {
            index,
            name: boat.name.clone(),
            owed: boat.amount_owed,
        }
    }
}
