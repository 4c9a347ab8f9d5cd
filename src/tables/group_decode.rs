/*
    i8086-biu-core

    Copyright 2024-2026 The i8086-biu-core contributors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    ---------------------------------------------------------------------------

    tables/group_decode.rs

    Loads the group-decode PLA's 38 input patterns (9 trits each) and 15
    output patterns (38 bits each) and precomputes them into the
    ones_mask/zeros_mask pairs and row masks the PLA evaluates per tick. See
    `gdr.rs` for the PLA itself.
*/

use super::TableSource;
use crate::error::CoreError;

const INPUT_COLUMNS: usize = 38;
const OUTPUT_ROWS: usize = 15;

fn trit_masks(pattern: &str) -> (u16, u16) {
    let mut ones: u16 = 0;
    let mut zeros: u16 = 0;
    for c in pattern.chars().rev() {
        ones = (ones << 1) | (c == '1') as u16;
        zeros = (zeros << 1) | (c == '0') as u16;
    }
    (ones, zeros)
}

fn bit_mask(pattern: &str) -> u64 {
    let mut mask: u64 = 0;
    for c in pattern.chars().rev() {
        mask = (mask << 1) | (c == '1') as u64;
    }
    mask
}

/// Precomputed form of the PLA tables: `(ones_mask, zeros_mask)` per input
/// column, and a 38-bit row mask per output row.
pub struct GroupDecodeTables {
    pub column_patterns: Vec<(u16, u16)>,
    pub row_masks: Vec<u64>,
}

pub fn read_group_decode<S: TableSource>(source: &S) -> anyhow::Result<GroupDecodeTables> {
    let input_text = source.read_table_file("group_input.txt")?;
    let output_text = source.read_table_file("group_output.txt")?;

    let column_patterns: Vec<(u16, u16)> = input_text
        .lines()
        .map(|line| {
            if line.len() != 9 {
                return Err(CoreError::TableLoad {
                    table: "group_decode",
                    reason: format!("input pattern '{line}' has length {}, expected 9", line.len()),
                }
                .into());
            }
            Ok(trit_masks(line))
        })
        .collect::<anyhow::Result<_>>()?;

    if column_patterns.len() != INPUT_COLUMNS {
        return Err(CoreError::TableLoad {
            table: "group_decode",
            reason: format!(
                "{} input patterns loaded, expected {INPUT_COLUMNS}",
                column_patterns.len()
            ),
        }
        .into());
    }

    let row_masks: Vec<u64> = output_text
        .lines()
        .map(|line| {
            if line.len() != INPUT_COLUMNS {
                return Err(CoreError::TableLoad {
                    table: "group_decode",
                    reason: format!(
                        "output pattern '{line}' has length {}, expected {INPUT_COLUMNS}",
                        line.len()
                    ),
                }
                .into());
            }
            Ok(bit_mask(line))
        })
        .collect::<anyhow::Result<_>>()?;

    if row_masks.len() != OUTPUT_ROWS {
        return Err(CoreError::TableLoad {
            table: "group_decode",
            reason: format!("{} output patterns loaded, expected {OUTPUT_ROWS}", row_masks.len()),
        }
        .into());
    }

    Ok(GroupDecodeTables {
        column_patterns,
        row_masks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trit_masks_distinguish_ones_zeros_and_wildcards() {
        let (ones, zeros) = trit_masks("1-0------");
        assert_eq!(ones, 0b1_0000_0000);
        assert_eq!(zeros, 0b0_0000_0010);
    }

    #[test]
    fn rejects_malformed_length() {
        let mut map = std::collections::HashMap::new();
        map.insert("group_input.txt".to_string(), "1".repeat(8));
        map.insert("group_output.txt".to_string(), "0".repeat(38));
        assert!(read_group_decode(&map).is_err());
    }
}
