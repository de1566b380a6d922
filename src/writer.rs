use crate::error::Result;
use crate::layout::{CellContent, Instruction, SheetPlan, StyleTag};
use crate::SheetKind;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Image, Workbook, Worksheet};
use std::path::Path;

/// MIME type for the generated workbook, for embedding in download surfaces.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const DARK_FILL: u32 = 0x595959;
const LOGO_OFFSET: u32 = 5;
const LOGO_SCALE: f64 = 0.5;

/// Style table resolved once per workbook; every style tag maps to exactly
/// one prebuilt format.
struct Formats {
    title: Format,
    header: Format,
    center: Format,
    bold_center: Format,
    subhead: Format,
    dark: Format,
    frame_top: Format,
    frame_bottom: Format,
    frame_side: Format,
    frame_top_corner: Format,
    frame_bottom_corner: Format,
}

impl Formats {
    fn new() -> Formats {
        Formats {
            title: Format::new()
                .set_bold()
                .set_font_size(24)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            center: Format::new()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin),
            bold_center: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin),
            subhead: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            dark: Format::new().set_background_color(Color::RGB(DARK_FILL)),
            frame_top: Format::new().set_border_top(FormatBorder::Thin),
            frame_bottom: Format::new().set_border_bottom(FormatBorder::Thin),
            frame_side: Format::new().set_border_left(FormatBorder::Thin),
            frame_top_corner: Format::new()
                .set_border_top(FormatBorder::Thin)
                .set_border_left(FormatBorder::Thin),
            frame_bottom_corner: Format::new()
                .set_border_bottom(FormatBorder::Thin)
                .set_border_left(FormatBorder::Thin),
        }
    }

    fn resolve(&self, tag: StyleTag) -> &Format {
        match tag {
            StyleTag::Title => &self.title,
            StyleTag::Header => &self.header,
            StyleTag::Center => &self.center,
            StyleTag::BoldCenter => &self.bold_center,
            StyleTag::Subhead => &self.subhead,
            StyleTag::Dark => &self.dark,
            StyleTag::FrameTop => &self.frame_top,
            StyleTag::FrameBottom => &self.frame_bottom,
            StyleTag::FrameSide => &self.frame_side,
            StyleTag::FrameTopCorner => &self.frame_top_corner,
            StyleTag::FrameBottomCorner => &self.frame_bottom_corner,
        }
    }
}

/// Apply a sheet plan to a fresh workbook and return the finished bytes.
/// Generation is all-or-nothing: any write failure aborts with no output.
pub fn render(plan: &SheetPlan, logo: Option<&Path>) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let formats = Formats::new();

    for instruction in &plan.instructions {
        match instruction {
            Instruction::Cell {
                row,
                col,
                content,
                style,
            } => {
                let format = formats.resolve(*style);
                match content {
                    CellContent::Text(text) => {
                        worksheet.write_string_with_format(*row, *col, text, format)?;
                    }
                    CellContent::Number(value) => {
                        worksheet.write_number_with_format(*row, *col, *value, format)?;
                    }
                    CellContent::Blank => {
                        worksheet.write_blank(*row, *col, format)?;
                    }
                }
            }
            Instruction::Merge {
                first_row,
                first_col,
                last_row,
                last_col,
                value,
                style,
            } => {
                worksheet.merge_range(
                    *first_row,
                    *first_col,
                    *last_row,
                    *last_col,
                    value,
                    formats.resolve(*style),
                )?;
            }
        }
    }

    for &(col, width) in &plan.column_widths {
        worksheet.set_column_width(col, width)?;
    }

    if let Some(path) = logo {
        embed_logo(worksheet, path)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Anchor the decorative logo at the sheet corner. A missing or unreadable
/// asset degrades to a warning; generation proceeds without it.
fn embed_logo(worksheet: &mut Worksheet, path: &Path) -> Result<()> {
    match Image::new(path) {
        Ok(image) => {
            let image = image.set_scale_width(LOGO_SCALE).set_scale_height(LOGO_SCALE);
            worksheet.insert_image_with_offset(0, 0, &image, LOGO_OFFSET, LOGO_OFFSET)?;
        }
        Err(e) => {
            eprintln!("warning: logo {} not embedded: {}", path.display(), e);
        }
    }
    Ok(())
}

/// Download file name for a generated sheet.
pub fn file_name(kind: SheetKind, well_name: &str) -> String {
    format!("{}_{}.xlsx", kind.file_stem(), well_name)
}
