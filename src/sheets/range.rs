//! Range addressing for the spreadsheet-as-database layout.
//!
//! Every sheet carries a single header row at position 1, so data starts at
//! row 2. Addresses use the values-API `A1` notation:
//! `"<SheetName>!A<start>:<col><end>"`.

/// First data row; row 1 is the header.
pub const FIRST_DATA_ROW: u32 = 2;

/// Row span `[start, end]` for a 1-based page. Purely arithmetic: page 1 with
/// page size 20 covers rows [2, 21], page 2 covers [22, 41]. No clamping —
/// a page past the end of the data simply reads back fewer or zero rows.
pub fn page_rows(page: u32, page_size: u32) -> (u32, u32) {
    let start = (page - 1) * page_size + FIRST_DATA_ROW;
    let end = start + page_size - 1;
    (start, end)
}

/// Read range for one page of an entity sheet, bounded by the entity's fixed
/// schema width.
pub fn page_range(sheet: &str, page: u32, page_size: u32, last_column: char) -> String {
    let (start, end) = page_rows(page, page_size);
    format!("{}!A{}:{}{}", sheet, start, last_column, end)
}

/// Unbounded read of the whole data body, used by search-mode full scans.
pub fn full_range(sheet: &str, last_column: char) -> String {
    format!("{}!A{}:{}", sheet, FIRST_DATA_ROW, last_column)
}

/// Write target for exactly one row. `row_index` is the 1-based sheet
/// coordinate, not an offset into a returned page.
pub fn write_range(sheet: &str, row_index: u32) -> String {
    format!("{}!A{}", sheet, row_index)
}

/// Append target; the backend assigns the actual row position.
pub fn append_range(sheet: &str) -> String {
    format!("{}!A:A", sheet)
}

/// Key-column read used for exact row counts.
pub fn key_column_range(sheet: &str) -> String {
    format!("{}!A{}:A", sheet, FIRST_DATA_ROW)
}

/// A parsed range address. The seed backend resolves addresses through this
/// so that offline reads honor exactly the same row arithmetic as live ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedRange {
    pub sheet: String,
    pub start_row: u32,
    /// `None` for open-ended ranges such as `A2:H` or `A:A`.
    pub end_row: Option<u32>,
}

/// Parses the subset of A1 notation this service emits. Column letters are
/// ignored: entity rows are always read from column A across their fixed
/// width.
pub fn parse_range(range: &str) -> Option<ParsedRange> {
    let (sheet, cells) = range.split_once('!')?;
    let (start, end) = match cells.split_once(':') {
        Some(pair) => pair,
        None => (cells, cells),
    };

    let start_row = trailing_number(start).unwrap_or(1);
    let end_row = trailing_number(end);

    Some(ParsedRange {
        sheet: sheet.to_string(),
        start_row,
        end_row,
    })
}

fn trailing_number(cell: &str) -> Option<u32> {
    let digits: String = cell.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
