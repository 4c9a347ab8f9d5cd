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

    config.rs

    TOML-driven configuration for the core: which CPU variant to model, and
    where to find the die-extract table files.
*/

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::CoreError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Selects the 8-bit external data bus, 4-byte queue, and 9-cell
    /// register file of the 8088 variant. Defaults to the 8086 (false).
    pub is_8088: bool,
    /// Directory containing the die-extract table files (see spec §6).
    pub table_dir: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            is_8088: false,
            table_dir: PathBuf::from("tables"),
        }
    }
}

impl CoreConfig {
    pub fn from_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).map_err(|e| CoreError::ConfigParse(e.to_string()).into())
    }

    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CoreError::ConfigParse(format!("{}: {}", path.display(), e)))?;
        Self::from_str(&contents)
    }
}
