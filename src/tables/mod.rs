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

    tables/mod.rs

    Loads the three "die extract" tables (microcode word array, column
    selector, group-decode PLA patterns) from a `TableSource` and re-assembles
    them into the layouts the rest of the crate operates on. The die extracts
    themselves are out of scope (see crate docs); this module owns only the
    stitching and re-scrambling logic.
*/

pub mod column_selector;
pub mod group_decode;
pub mod microcode;

use std::{collections::HashMap, path::Path};

use anyhow::Context;

use crate::error::CoreError;

pub use column_selector::ColumnSelectorTable;
pub use group_decode::GroupDecodeTables;
pub use microcode::MicrocodeWord;

/// Supplies the raw text of a named die-extract file. Implemented for `&Path`
/// (reads `path.join(name)` from disk) and for `HashMap<String, String>`
/// (in-memory, for tests and for callers that embed the extracts as compiled-in
/// string constants).
pub trait TableSource {
    fn read_table_file(&self, name: &str) -> anyhow::Result<String>;
}

impl TableSource for &Path {
    fn read_table_file(&self, name: &str) -> anyhow::Result<String> {
        let path = self.join(name);
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    }
}

impl TableSource for HashMap<String, String> {
    fn read_table_file(&self, name: &str) -> anyhow::Result<String> {
        self.get(name)
            .cloned()
            .ok_or_else(|| CoreError::TableLoad {
                table: "die-extract",
                reason: format!("no in-memory entry named '{}'", name),
            }
            .into())
    }
}

/// The three tables a fully assembled core needs, loaded once at startup.
pub struct Tables {
    /// 512 entries, 21 bits each (address 0 is the reset entry point).
    pub microcode: Vec<MicrocodeWord>,
    pub column_selector: ColumnSelectorTable,
    pub group_decode: GroupDecodeTables,
}

/// Loads and assembles all three tables from `source`.
///
/// `variant_suffix` selects between the 8086 ("a") and 8088 (no suffix)
/// microcode extracts, per §6: "the a files have 8086, the non-a files have
/// 8088. They are mostly identical".
pub fn load_all<S: TableSource>(source: &S, is_8088: bool) -> anyhow::Result<Tables> {
    let microcode = microcode::read_microcode(source, is_8088)
        .context("loading microcode word table")?;
    let column_selector = column_selector::read_column_selector(source)
        .context("loading column selector table")?;
    let group_decode =
        group_decode::read_group_decode(source).context("loading group decode tables")?;

    Ok(Tables {
        microcode,
        column_selector,
        group_decode,
    })
}
