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

    colsel.rs

    The column selector component: folds an 11-bit logical microcode address
    onto a 7-bit physical column in the 512-entry ROM. Purely combinational,
    no state of its own; owns the loaded table and exposes the one lookup
    operation other components need.
*/

use crate::tables::ColumnSelectorTable;

pub struct ColumnSelector {
    table: ColumnSelectorTable,
}

impl ColumnSelector {
    pub fn new(table: ColumnSelectorTable) -> ColumnSelector {
        ColumnSelector { table }
    }

    /// Maps an 11-bit logical microcode address to its 7-bit physical
    /// column (§4.4). Specific entries win over the universal wildcard.
    pub fn select(&self, logical_address: u16) -> u8 {
        self.table.select_column(logical_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::column_selector::DEFAULT_COLUMN;

    #[test]
    fn falls_through_to_default_column_with_no_specific_match() {
        let selector = ColumnSelector::new(ColumnSelectorTable { entries: vec![(0, 0); 128] });
        assert_eq!(selector.select(0x3ff), 0);
        let _ = DEFAULT_COLUMN;
    }
}
