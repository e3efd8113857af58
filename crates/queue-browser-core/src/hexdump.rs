//! Hex-dump rendering of message payloads.

use std::collections::BTreeMap;

const BYTES_PER_ROW: usize = 16;

/// Width of a full row's hex column: 16 pairs, 15 separators, one extra gap
const HEX_COLUMN_WIDTH: usize = BYTES_PER_ROW * 3;

/// Payload rendered as rows of hex byte pairs keyed by offset
///
/// Offsets are eight uppercase hex digits, so the map's ordering matches the
/// payload's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexDump {
    pub hex: BTreeMap<String, String>,
    /// Printable-ASCII rendering of the whole payload, `.` for anything else
    pub content: String,
}

impl HexDump {
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hex = BTreeMap::new();
        let mut content = String::with_capacity(data.len());

        for (row, chunk) in data.chunks(BYTES_PER_ROW).enumerate() {
            hex.insert(format!("{:08X}", row * BYTES_PER_ROW), hex_row(chunk));
            content.extend(chunk.iter().map(|&b| printable(b)));
        }

        Self { hex, content }
    }

    /// Classic `offset: hex  ascii` text layout, one line per row
    ///
    /// Rows whose ASCII rendering is missing from `content` print an empty
    /// ASCII column.
    pub fn to_text(&self) -> String {
        let ascii: Vec<char> = self.content.chars().collect();
        let mut out = String::new();

        for (row, (offset, hex)) in self.hex.iter().enumerate() {
            let text: String = ascii
                .iter()
                .skip(row * BYTES_PER_ROW)
                .take(BYTES_PER_ROW)
                .collect();
            out.push_str(&format!(
                "{}: {:<width$}  {}\n",
                offset,
                hex,
                text,
                width = HEX_COLUMN_WIDTH
            ));
        }

        out
    }
}

fn hex_row(chunk: &[u8]) -> String {
    let mut row = String::with_capacity(HEX_COLUMN_WIDTH);
    for (i, byte) in chunk.iter().enumerate() {
        match i {
            0 => {}
            8 => row.push_str("  "),
            _ => row.push(' '),
        }
        row.push_str(&format!("{:02X}", byte));
    }
    row
}

fn printable(byte: u8) -> char {
    if (0x20..0x7f).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}

#[cfg(test)]
#[path = "hexdump_tests.rs"]
mod tests;
