use crate::error::AllocationError;
use crate::models::allocation::AllocationInput;

const HEADER: [&str; 2] = ["asset class", "amount"];

/// Parse an `Asset Class,Amount` table. Amounts stay raw so the comparator
/// can count the ones that fail to parse.
pub fn parse_allocation_csv(text: &str) -> Result<Vec<AllocationInput>, AllocationError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or(AllocationError::MissingHeader)?;
    let header = split_line(header);
    let header_matches = header.len() == 2
        && header
            .iter()
            .zip(HEADER)
            .all(|(cell, expected)| cell.eq_ignore_ascii_case(expected));
    if !header_matches {
        return Err(AllocationError::MissingHeader);
    }

    lines
        .map(|(line_no, line)| {
            let mut cells = split_line(line);
            if cells.len() != 2 {
                return Err(AllocationError::MalformedRow { line: line_no });
            }
            let amount = cells.pop().unwrap_or_default();
            let asset_class = cells.pop().unwrap_or_default();
            Ok(AllocationInput {
                asset_class,
                amount,
            })
        })
        .collect()
}

/// Split one line on commas outside double quotes; cells are trimmed and unquoted.
fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}
