use crate::error::{Error, Result};
use crate::request::TimesheetRequest;
use crate::SheetKind;
use chrono::NaiveDate;

pub const DEFAULT_TECHNICIAN_ROWS: usize = 2;
pub const DEFAULT_EQUIPMENT_ROWS: usize = 3;
pub const MAX_EQUIPMENT_ROWS: usize = 7;

/// Fixed equipment catalog offered by the form; a free-text entry stands in
/// for "Other (specify...)".
pub const EQUIPMENT_OPTIONS: [&str; 9] = [
    "BOP Can for 7\" Rams",
    "BOP Can for 9 5/8\" Rams",
    "ESP Welltest Toolbox Container c/w lifting tools",
    "ESP String (DHE) 300-1200 BPD + Cable",
    "ESP String (DHE) 1100-2500 BPD + Cable",
    "ESP String (DHE) 2300-4500 BPD + Cable",
    "Y-Tool Set: For 7\" or 9 5/8\" Casing",
    "Phoenix Multisensor '1', 257 deg F rated",
    "Generator",
];

/// Mutable row state backing the entry list: a per-kind row counter that
/// grows on demand and resets when the sheet kind changes. Owned by the
/// caller; the layout engine never sees it.
#[derive(Debug, Clone)]
pub struct FormSession {
    kind: SheetKind,
    entries: Vec<String>,
}

impl FormSession {
    pub fn new(kind: SheetKind) -> Self {
        FormSession {
            kind,
            entries: vec![String::new(); default_rows(kind)],
        }
    }

    pub fn row_count(&self) -> usize {
        self.entries.len()
    }

    /// Switch the sheet kind, resetting the rows to the new kind's default.
    /// A no-op when the kind is unchanged.
    pub fn set_kind(&mut self, kind: SheetKind) {
        if self.kind != kind {
            self.kind = kind;
            self.entries = vec![String::new(); default_rows(kind)];
        }
    }

    /// Add one blank row. Equipment sheets refuse past the cap and report
    /// `false`, matching the form's silent "+ Add" behavior.
    pub fn add_row(&mut self) -> bool {
        if self.kind == SheetKind::Equipment && self.entries.len() >= MAX_EQUIPMENT_ROWS {
            return false;
        }
        self.entries.push(String::new());
        true
    }

    pub fn set_entry(&mut self, index: usize, value: String) -> Result<()> {
        let count = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(Error::RowOutOfRange { index, count })?;
        *slot = value;
        Ok(())
    }

    /// Prompt label shown next to a row's input field.
    pub fn prompt_label(&self, index: usize) -> String {
        match self.kind {
            SheetKind::Personal if index == 0 => {
                "Installation & Commissioning Supervisor".to_string()
            }
            SheetKind::Personal => format!("Technician {}", index + 1),
            SheetKind::Equipment => format!("Select Equipment {}", index + 1),
        }
    }

    /// Consume the session into a generation request.
    #[allow(clippy::too_many_arguments)]
    pub fn into_request(
        self,
        month: u32,
        field_name: String,
        well_name: String,
        client_name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        representative: String,
    ) -> TimesheetRequest {
        TimesheetRequest {
            kind: self.kind,
            month,
            field_name,
            well_name,
            client_name,
            start_date,
            end_date,
            entries: self.entries,
            representative,
        }
    }
}

fn default_rows(kind: SheetKind) -> usize {
    match kind {
        SheetKind::Personal => DEFAULT_TECHNICIAN_ROWS,
        SheetKind::Equipment => DEFAULT_EQUIPMENT_ROWS,
    }
}
