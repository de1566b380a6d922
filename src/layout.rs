//! Grid layout computation.
//!
//! This module maps a collected `TimesheetRequest` onto an ordered stream of
//! cell and merge instructions plus the metadata the workbook writer needs
//! (column widths, frame bounds). It is a single-pass, stateless
//! transformation with no I/O.

use crate::error::{Error, Result};
use crate::request::TimesheetRequest;
use chrono::Datelike;

/// Row capacity of the xlsx worksheet grid.
const XLSX_MAX_ROWS: u32 = 1_048_576;

pub const TITLE_TEXT: &str = "Field Services Timesheet";
pub const CERTIFICATION_TEXT: &str = "The above certifies and represents the number of days \
     that lw Services have been provided at location";

/// Row index of the column header line. Rows 1 and 2 stay blank between the
/// title banner and the table.
pub const BASE_HEADER_ROW: u32 = 3;

/// What a single cell holds.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(String),
    Number(f64),
    Blank,
}

/// Named styles resolved once by the writer against the target workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTag {
    Title,
    Header,
    Center,
    BoldCenter,
    Subhead,
    Dark,
    FrameTop,
    FrameBottom,
    FrameSide,
    FrameTopCorner,
    FrameBottomCorner,
}

/// One write against the worksheet grid. Produced in bulk, consumed once.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Cell {
        row: u32,
        col: u16,
        content: CellContent,
        style: StyleTag,
    },
    Merge {
        first_row: u32,
        first_col: u16,
        last_row: u32,
        last_col: u16,
        value: String,
        style: StyleTag,
    },
}

impl Instruction {
    fn text(row: u32, col: u16, value: impl Into<String>, style: StyleTag) -> Self {
        Instruction::Cell {
            row,
            col,
            content: CellContent::Text(value.into()),
            style,
        }
    }

    fn number(row: u32, col: u16, value: f64, style: StyleTag) -> Self {
        Instruction::Cell {
            row,
            col,
            content: CellContent::Number(value),
            style,
        }
    }

    fn blank(row: u32, col: u16, style: StyleTag) -> Self {
        Instruction::Cell {
            row,
            col,
            content: CellContent::Blank,
            style,
        }
    }

    fn merge(
        first_row: u32,
        first_col: u16,
        last_row: u32,
        last_col: u16,
        value: impl Into<String>,
        style: StyleTag,
    ) -> Self {
        Instruction::Merge {
            first_row,
            first_col,
            last_row,
            last_col,
            value: value.into(),
            style,
        }
    }
}

/// Derived grid geometry. Everything below the data rows shifts with the
/// entry count so the sheet grows and shrinks coherently.
#[derive(Debug, Clone)]
pub struct GridLayout {
    pub base_header_row: u32,
    pub data_row_count: u32,
    pub day_column_count: u32,
    pub total_column_index: u16,
    pub info_block_start_row: u32,
}

impl GridLayout {
    pub fn for_request(request: &TimesheetRequest) -> Result<GridLayout> {
        request.validate()?;

        let data_row_count = request.entries.len();
        let day_column_count = request.days_in_month()?;

        // The layout occupies rows 0..=19 plus one row per entry.
        let rows_needed = data_row_count as u64 + 20;
        if rows_needed > u64::from(XLSX_MAX_ROWS) {
            return Err(Error::GridOverflow {
                rows: rows_needed,
                limit: XLSX_MAX_ROWS,
            });
        }
        let data_row_count = data_row_count as u32;

        Ok(GridLayout {
            base_header_row: BASE_HEADER_ROW,
            data_row_count,
            day_column_count,
            total_column_index: 4 + day_column_count as u16,
            info_block_start_row: BASE_HEADER_ROW + data_row_count + 6,
        })
    }

    pub fn first_data_row(&self) -> u32 {
        self.base_header_row + 1
    }

    pub fn last_data_row(&self) -> u32 {
        self.base_header_row + self.data_row_count
    }

    pub fn date_label_row(&self) -> u32 {
        self.last_data_row() + 1
    }

    pub fn certification_row(&self) -> u32 {
        self.last_data_row() + 4
    }

    pub fn frame_top_row(&self) -> u32 {
        1
    }

    pub fn frame_bottom_row(&self) -> u32 {
        self.info_block_start_row + 10
    }

    pub fn frame_right_col(&self) -> u16 {
        self.total_column_index + 1
    }

    /// Rows whose leftmost column is already written (and bordered) by the
    /// table itself: the header line, the data rows, and the full-width
    /// certification merge. The frame's left edge skips these.
    fn occupies_left_column(&self, row: u32) -> bool {
        (self.base_header_row..=self.last_data_row()).contains(&row)
            || row == self.certification_row()
    }
}

/// The complete plan for one worksheet: the instruction stream and the
/// writer metadata that is not cell-addressed.
#[derive(Debug, Clone)]
pub struct SheetPlan {
    pub layout: GridLayout,
    pub instructions: Vec<Instruction>,
    pub column_widths: Vec<(u16, f64)>,
}

/// Worksheet column for a day-of-month number.
fn day_column(day: u32) -> u16 {
    3 + day as u16
}

/// A day is worked for a row iff the row label is non-blank and the
/// day-of-month falls inside the requested range. Only day numbers are
/// compared; a range crossing a month boundary wraps to an empty range.
fn is_worked(label: &str, day: u32, start_day: u32, end_day: u32) -> bool {
    !label.trim().is_empty() && day >= start_day && day <= end_day
}

/// Compute the full instruction stream for a request.
pub fn plan(request: &TimesheetRequest) -> Result<SheetPlan> {
    let layout = GridLayout::for_request(request)?;
    let days = layout.day_column_count;
    let total_col = layout.total_column_index;
    let month_name = request.month_name()?;
    let mut out = Vec::new();

    // Banners spanning the full frame width.
    out.push(Instruction::merge(0, 0, 0, total_col, TITLE_TEXT, StyleTag::Title));
    out.push(Instruction::merge(
        layout.certification_row(),
        0,
        layout.certification_row(),
        total_col,
        CERTIFICATION_TEXT,
        StyleTag::Subhead,
    ));

    // Column headers.
    let header = layout.base_header_row;
    out.push(Instruction::text(header, 0, "#", StyleTag::Header));
    out.push(Instruction::text(header, 1, "Month", StyleTag::Header));
    out.push(Instruction::text(header, 2, request.kind.crew_header(), StyleTag::Header));
    out.push(Instruction::text(header, 3, "Field Name", StyleTag::Header));
    for day in 1..=days {
        out.push(Instruction::text(header, day_column(day), day.to_string(), StyleTag::Header));
    }
    out.push(Instruction::text(header, total_col, "Total", StyleTag::Header));

    // Data rows.
    let start_day = request.start_date.day();
    let end_day = request.end_date.day();
    for (i, label) in request.entries.iter().enumerate() {
        let row = layout.first_data_row() + i as u32;
        out.push(Instruction::number(row, 0, (i + 1) as f64, StyleTag::Center));

        if i == 0 {
            vertical_banner(&mut out, &layout, 1, month_name);
            vertical_banner(&mut out, &layout, 3, &request.field_name);
        }

        out.push(Instruction::text(row, 2, label.clone(), StyleTag::Center));

        let mut worked = 0u32;
        for day in 1..=days {
            if is_worked(label, day, start_day, end_day) {
                out.push(Instruction::text(row, day_column(day), request.well_name.clone(), StyleTag::Center));
                worked += 1;
            } else {
                out.push(Instruction::blank(row, day_column(day), StyleTag::Dark));
            }
        }
        out.push(Instruction::number(row, total_col, f64::from(worked), StyleTag::Center));
    }

    // Starting/ending date block.
    let date_row = layout.date_label_row();
    let start_text = request.start_date.format("%Y-%m-%d").to_string();
    let end_text = request.end_date.format("%Y-%m-%d").to_string();
    out.push(Instruction::text(date_row, 2, "Starting Date", StyleTag::Header));
    out.push(Instruction::text(date_row, 3, start_text, StyleTag::Center));
    out.push(Instruction::text(date_row + 1, 2, "Ending Date", StyleTag::Header));
    out.push(Instruction::text(date_row + 1, 3, end_text.clone(), StyleTag::Center));

    // Representative block on the left, client identity block on the right.
    let info = layout.info_block_start_row;
    representative_block(&mut out, info, 4, "SLB Representative", &request.representative);
    representative_block(&mut out, info + 4, 2, "Date", &end_text);
    representative_block(&mut out, info + 6, 2, "Signature", "");
    client_block(&mut out, info, "Client Name", &request.client_name);
    client_block(&mut out, info + 2, "Field Name", &request.field_name);
    client_block(&mut out, info + 4, "Client Representative", "");
    client_block(&mut out, info + 6, "Client Rep. Signature", "");
    client_block(&mut out, info + 8, "Date", "");

    frame(&mut out, &layout);

    let column_widths = column_widths(&layout);
    Ok(SheetPlan {
        layout,
        instructions: out,
        column_widths,
    })
}

/// Month and field-name cells span every data row. A merge cannot span a
/// single cell, so one data row degrades to a plain write.
fn vertical_banner(out: &mut Vec<Instruction>, layout: &GridLayout, col: u16, value: &str) {
    let first = layout.first_data_row();
    let last = layout.last_data_row();
    if first == last {
        out.push(Instruction::text(first, col, value, StyleTag::Center));
    } else {
        out.push(Instruction::merge(first, col, last, col, value, StyleTag::Center));
    }
}

fn representative_block(out: &mut Vec<Instruction>, first_row: u32, height: u32, label: &str, value: &str) {
    let last_row = first_row + height - 1;
    out.push(Instruction::merge(first_row, 1, last_row, 3, label, StyleTag::BoldCenter));
    out.push(Instruction::merge(first_row, 4, last_row, 9, value, StyleTag::Center));
}

fn client_block(out: &mut Vec<Instruction>, first_row: u32, label: &str, value: &str) {
    let last_row = first_row + 1;
    out.push(Instruction::merge(first_row, 18, last_row, 23, label, StyleTag::BoldCenter));
    out.push(Instruction::merge(first_row, 24, last_row, 31, value, StyleTag::Center));
}

/// Decorative outline around the used region, emitted last. The top edge
/// sits on the blank row under the title, the bottom edge one row past the
/// info blocks, and the vertical edges fill every row in between; where the
/// table already occupies column 0 its own bordered cells close the line.
/// The right edge lives one column past the total column and draws its left
/// border, as do the two corner cells.
fn frame(out: &mut Vec<Instruction>, layout: &GridLayout) {
    let top = layout.frame_top_row();
    let bottom = layout.frame_bottom_row();
    let right = layout.frame_right_col();

    for col in 0..=layout.total_column_index {
        out.push(Instruction::blank(top, col, StyleTag::FrameTop));
    }
    out.push(Instruction::blank(top, right, StyleTag::FrameTopCorner));

    for col in 0..=layout.total_column_index {
        out.push(Instruction::blank(bottom, col, StyleTag::FrameBottom));
    }
    out.push(Instruction::blank(bottom, right, StyleTag::FrameBottomCorner));

    for row in top + 1..bottom {
        if !layout.occupies_left_column(row) {
            out.push(Instruction::blank(row, 0, StyleTag::FrameSide));
        }
        out.push(Instruction::blank(row, right, StyleTag::FrameSide));
    }
}

fn column_widths(layout: &GridLayout) -> Vec<(u16, f64)> {
    let mut widths = vec![(0, 5.0), (1, 8.0), (2, 35.0), (3, 12.0)];
    for col in 4..=layout.frame_right_col() {
        widths.push((col, 5.0));
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SheetKind;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(entries: &[&str], start: NaiveDate, end: NaiveDate) -> TimesheetRequest {
        TimesheetRequest {
            kind: SheetKind::Personal,
            month: start.month(),
            field_name: "North Field".into(),
            well_name: "NW-12".into(),
            client_name: "Acme Oil".into(),
            start_date: start,
            end_date: end,
            entries: entries.iter().map(|e| e.to_string()).collect(),
            representative: "R. Diaz".into(),
        }
    }

    fn cell_at(plan: &SheetPlan, row: u32, col: u16) -> (&CellContent, StyleTag) {
        plan.instructions
            .iter()
            .find_map(|i| match i {
                Instruction::Cell {
                    row: r,
                    col: c,
                    content,
                    style,
                } if *r == row && *c == col => Some((content, *style)),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no cell at ({row}, {col})"))
    }

    fn total_for_row(plan: &SheetPlan, index: u32) -> f64 {
        let row = plan.layout.first_data_row() + index;
        match cell_at(plan, row, plan.layout.total_column_index) {
            (CellContent::Number(n), _) => *n,
            other => panic!("total cell is not a number: {other:?}"),
        }
    }

    fn merges(plan: &SheetPlan) -> Vec<(u32, u16, u32, u16, &str)> {
        plan.instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::Merge {
                    first_row,
                    first_col,
                    last_row,
                    last_col,
                    value,
                    ..
                } => Some((*first_row, *first_col, *last_row, *last_col, value.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn leap_february_gets_twenty_nine_day_columns() {
        // Scenario: one technician, working the whole of February 2024.
        let leap = plan(&request(&["Alice"], date(2024, 2, 1), date(2024, 2, 29))).unwrap();
        assert_eq!(leap.layout.day_column_count, 29);
        assert_eq!(leap.layout.total_column_index, 33);
        assert_eq!(total_for_row(&leap, 0), 29.0);

        // Non-leap February a year earlier.
        let plain = plan(&request(&["Alice"], date(2023, 2, 1), date(2023, 2, 28))).unwrap();
        assert_eq!(plain.layout.day_column_count, 28);
        assert_eq!(total_for_row(&plain, 0), 28.0);
    }

    #[test]
    fn blank_label_rows_count_nothing() {
        let plan = plan(&request(&["", "Bob"], date(2024, 3, 5), date(2024, 3, 10))).unwrap();
        assert_eq!(total_for_row(&plan, 0), 0.0);
        assert_eq!(total_for_row(&plan, 1), 6.0);

        // Every day cell in the blank row is a dark blank.
        let row = plan.layout.first_data_row();
        for day in 1..=plan.layout.day_column_count {
            let (content, style) = cell_at(&plan, row, 3 + day as u16);
            assert_eq!(content, &CellContent::Blank);
            assert_eq!(style, StyleTag::Dark);
        }
    }

    #[test]
    fn whitespace_only_label_is_blank() {
        let plan = plan(&request(&["   "], date(2024, 3, 1), date(2024, 3, 31))).unwrap();
        assert_eq!(total_for_row(&plan, 0), 0.0);
    }

    #[test]
    fn worked_days_carry_the_well_name() {
        let plan = plan(&request(&["Alice"], date(2024, 3, 5), date(2024, 3, 6))).unwrap();
        let row = plan.layout.first_data_row();
        let (content, style) = cell_at(&plan, row, day_column(5));
        assert_eq!(content, &CellContent::Text("NW-12".into()));
        assert_eq!(style, StyleTag::Center);
        let (content, _) = cell_at(&plan, row, day_column(4));
        assert_eq!(content, &CellContent::Blank);
    }

    #[test]
    fn single_data_row_writes_instead_of_merging() {
        let plan = plan(&request(&["Alice"], date(2024, 3, 1), date(2024, 3, 2))).unwrap();
        let first = plan.layout.first_data_row();
        // No merge anchors on the single data row.
        assert!(merges(&plan).iter().all(|&(r, _, _, _, _)| r != first));
        let (content, _) = cell_at(&plan, first, 1);
        assert_eq!(content, &CellContent::Text("March".into()));
        let (content, _) = cell_at(&plan, first, 3);
        assert_eq!(content, &CellContent::Text("North Field".into()));
    }

    #[test]
    fn month_and_field_merges_span_every_data_row() {
        let plan = plan(&request(&["A", "B", "C"], date(2024, 3, 1), date(2024, 3, 2))).unwrap();
        let first = plan.layout.first_data_row();
        let last = plan.layout.last_data_row();
        let merges = merges(&plan);
        assert!(merges.contains(&(first, 1, last, 1, "March")));
        assert!(merges.contains(&(first, 3, last, 3, "North Field")));
    }

    #[test]
    fn one_data_row_per_entry() {
        let plan = plan(&request(&["A", "B", "C", "D"], date(2024, 3, 1), date(2024, 3, 2))).unwrap();
        assert_eq!(plan.layout.data_row_count, 4);
        for i in 0..4 {
            let (content, _) = cell_at(&plan, plan.layout.first_data_row() + i, 0);
            assert_eq!(content, &CellContent::Number(f64::from(i + 1)));
        }
    }

    #[test]
    fn range_is_clipped_to_the_month_day_count() {
        // February is selected but the range runs to March 30; only days
        // 25..=28 exist in the 28-column grid.
        let plan = plan(&request(&["Alice"], date(2023, 2, 25), date(2023, 3, 30))).unwrap();
        assert_eq!(plan.layout.day_column_count, 28);
        assert_eq!(total_for_row(&plan, 0), 4.0);
    }

    #[test]
    fn day_range_uses_day_of_month_numbers_only() {
        // A range crossing the month boundary wraps to an empty day range:
        // start day 28 is greater than end day 3.
        let plan = plan(&request(&["Alice"], date(2024, 1, 28), date(2024, 2, 3))).unwrap();
        assert_eq!(total_for_row(&plan, 0), 0.0);
    }

    #[test]
    fn banners_span_the_full_width() {
        let plan = plan(&request(&["A", "B"], date(2024, 3, 1), date(2024, 3, 2))).unwrap();
        let total_col = plan.layout.total_column_index;
        let cert = plan.layout.certification_row();
        let merges = merges(&plan);
        assert!(merges.contains(&(0, 0, 0, total_col, TITLE_TEXT)));
        assert!(merges.iter().any(|&(r, c, _, lc, _)| r == cert && c == 0 && lc == total_col));
    }

    #[test]
    fn info_blocks_shift_with_the_row_count() {
        let two = plan(&request(&["A", "B"], date(2024, 3, 1), date(2024, 3, 2))).unwrap();
        let five = plan(&request(&["A", "B", "C", "D", "E"], date(2024, 3, 1), date(2024, 3, 2))).unwrap();
        assert_eq!(five.layout.info_block_start_row, two.layout.info_block_start_row + 3);
        assert_eq!(five.layout.certification_row(), two.layout.certification_row() + 3);
        assert_eq!(five.layout.frame_bottom_row(), two.layout.frame_bottom_row() + 3);
    }

    #[test]
    fn frame_edges_and_corners() {
        let plan = plan(&request(&["A", "B"], date(2024, 3, 1), date(2024, 3, 2))).unwrap();
        let layout = &plan.layout;
        let right = layout.frame_right_col();

        let (_, style) = cell_at(&plan, layout.frame_top_row(), 0);
        assert_eq!(style, StyleTag::FrameTop);
        let (_, style) = cell_at(&plan, layout.frame_top_row(), right);
        assert_eq!(style, StyleTag::FrameTopCorner);
        let (_, style) = cell_at(&plan, layout.frame_bottom_row(), right);
        assert_eq!(style, StyleTag::FrameBottomCorner);

        // The vertical edges cover every row between the horizontal edges.
        for row in layout.frame_top_row() + 1..layout.frame_bottom_row() {
            let (_, style) = cell_at(&plan, row, right);
            assert_eq!(style, StyleTag::FrameSide);
        }
    }

    #[test]
    fn frame_never_lands_on_table_cells() {
        let plan = plan(&request(&["A", "B"], date(2024, 3, 1), date(2024, 3, 2))).unwrap();
        let layout = &plan.layout;
        for row in layout.base_header_row..=layout.last_data_row() {
            let (content, style) = cell_at(&plan, row, 0);
            assert_ne!(style, StyleTag::FrameSide);
            assert_ne!(content, &CellContent::Blank);
        }
    }

    #[test]
    fn column_widths_cover_the_frame() {
        let plan = plan(&request(&["Alice"], date(2024, 2, 1), date(2024, 2, 29))).unwrap();
        assert_eq!(plan.column_widths[..4], [(0, 5.0), (1, 8.0), (2, 35.0), (3, 12.0)]);
        let last = plan.column_widths.last().copied().unwrap();
        assert_eq!(last, (plan.layout.frame_right_col(), 5.0));
    }

    #[test]
    fn empty_entries_are_rejected() {
        let err = plan(&request(&[], date(2024, 3, 1), date(2024, 3, 2))).unwrap_err();
        assert!(matches!(err, Error::EmptyEntries));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = plan(&request(&["Alice"], date(2024, 3, 9), date(2024, 3, 1))).unwrap_err();
        assert!(matches!(err, Error::DateRange { .. }));
    }

    #[test]
    fn absurd_row_counts_overflow_the_grid() {
        let entries = vec![String::from("x"); XLSX_MAX_ROWS as usize];
        let mut req = request(&["Alice"], date(2024, 3, 1), date(2024, 3, 2));
        req.entries = entries;
        let err = plan(&req).unwrap_err();
        assert!(matches!(err, Error::GridOverflow { .. }));
    }
}
