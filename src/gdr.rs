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

    gdr.rs

    The group decode PLA. Intel calls it the "Group Decode ROM" but it's
    really a two-layer PLA: the lower layer pattern-matches a 9-bit opcode
    prefix into 38 columns, the upper layer NORs selected columns together
    into 15 rows of control signals. Purely combinational, no state.
*/

use crate::tables::GroupDecodeTables;

/// The 15 named output rows. Rows 12-14 carry the original author's own
/// uncertainty about their exact scope (see field docs); this crate
/// propagates them unresolved rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GroupRow {
    /// only set on in/out instructions
    IsIO = 0,
    /// load lower 3 bits (of first byte) into M
    LoadM = 1,
    /// replace lower 3 bits of the microcode address with the r bits of the mod R/M byte
    RToMicrocode = 2,
    IsPrefix = 3,
    /// run microcode after the first byte
    OneByte = 4,
    /// load bits 3-5 into N
    LoadN = 5,
    Flags = 6,
    /// set when the second byte is not a mod R/M byte
    IsAccumulator = 7,
    /// set when the M register is a segment register
    MovSeg = 8,
    /// read/write direction is based on bit 1
    DirectionInBit1 = 9,
    NoMicrocode = 10,
    /// width is in bit 0
    WidthInBit0 = 11,
    /// covers all ASCII instructions, and xlat
    Unk12 = 12,
    /// covers control flow and the immediate ALU instructions at 0x80-0x87
    Unk13 = 13,
    /// set for everything except inc/dec, some control flow, and some push/pop
    Unk14 = 14,
}

/// Ten of the 38 columns are tapped directly as additional control signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GroupColumn {
    LoadRegImm = 10,
    WidthInBit0 = 12,
    Cmc = 13,
    Hlt = 14,
    Rep = 31,
    SegmentOverride = 32,
    Lock = 33,
    Cli = 34,
    MovSeg = 36,
    PopSeg = 37,
}

/// Result of one PLA evaluation: the 38-bit column vector and the 15-bit row
/// vector it feeds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupDecodeOutput {
    pub columns: u64,
    pub rows: u16,
}

impl GroupDecodeOutput {
    pub fn row(&self, row: GroupRow) -> bool {
        self.rows & (1 << row as u8) != 0
    }

    pub fn column(&self, column: GroupColumn) -> bool {
        self.columns & (1 << column as u8) != 0
    }
}

pub struct GroupDecode {
    tables: GroupDecodeTables,
}

impl GroupDecode {
    pub fn new(tables: GroupDecodeTables) -> GroupDecode {
        GroupDecode { tables }
    }

    /// Evaluates the PLA for a 9-bit opcode prefix. Pure and idempotent:
    /// the same `input` always yields the same output, and evaluating twice
    /// in the same tick changes nothing (§8 invariant 6).
    pub fn decode(&self, input: u16) -> GroupDecodeOutput {
        let mut columns: u64 = 0;
        for (c, &(ones_mask, zeros_mask)) in self.tables.column_patterns.iter().enumerate() {
            let asserted = (!input & ones_mask) == 0 && (input & zeros_mask) == 0;
            if asserted {
                columns |= 1 << c;
            }
        }

        let mut rows: u16 = 0;
        for (r, &mask) in self.tables.row_masks.iter().enumerate() {
            if (columns & mask) == 0 {
                rows |= 1 << r;
            }
        }

        GroupDecodeOutput { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a synthetic table (the real die-extract patterns are an
    /// external collaborator) with one input pattern per column, each
    /// matching only a single literal 9-bit code, and output rows wired to
    /// NOR over one column each -- enough to exercise the two-layer
    /// AND-OR/NOR evaluation end to end.
    fn synthetic_tables() -> GroupDecodeTables {
        let mut column_patterns = Vec::with_capacity(38);
        for code in 0..38u16 {
            // ones_mask = code itself (require those bits set), zeros_mask
            // = the complement within 9 bits (require the rest clear): this
            // makes column `code` match only input == code (for code < 0x200).
            let ones_mask = code & 0x1ff;
            let zeros_mask = (!code) & 0x1ff;
            column_patterns.push((ones_mask, zeros_mask));
        }

        // row r asserts (NOR) when column r is NOT asserted.
        let row_masks: Vec<u64> = (0..15).map(|r| 1u64 << r).collect();

        GroupDecodeTables {
            column_patterns,
            row_masks,
        }
    }

    #[test]
    fn row_asserts_when_its_column_is_not_matched() {
        let gdr = GroupDecode::new(synthetic_tables());
        // input == 4 matches only column 4, so column 4 is asserted and
        // every other column (including 0, 7) is not -- every row other
        // than row 4 should assert.
        let out = gdr.decode(4);
        assert!(!out.row(GroupRow::OneByte)); // row 4 == OneByte, its column matched
        assert!(out.row(GroupRow::IsIO)); // row 0, column 0 did not match
        assert!(out.row(GroupRow::IsAccumulator)); // row 7, column 7 did not match
    }

    #[test]
    fn decode_is_pure_and_idempotent() {
        let gdr = GroupDecode::new(synthetic_tables());
        let a = gdr.decode(0x90);
        let b = gdr.decode(0x90);
        assert_eq!(a, b);
    }
}
