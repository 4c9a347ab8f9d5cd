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

    error.rs

    Defines the error type for this crate. Table-loading failures are the
    only user-visible error condition (see spec §7); everything else is a
    design-time invariant enforced with asserts/panics rather than Result.
*/

use std::{error::Error, fmt, fmt::Display};

#[derive(Debug)]
pub enum CoreError {
    /// A table failed to load: missing file, wrong length, or a malformed
    /// pattern. `table` names which of the three tables (microcode word
    /// array, column selector, group decode) was being built.
    TableLoad { table: &'static str, reason: String },
    /// A config file could not be parsed.
    ConfigParse(String),
}

impl Error for CoreError {}

impl Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::TableLoad { table, reason } => {
                write!(f, "failed to load table '{}': {}", table, reason)
            }
            CoreError::ConfigParse(reason) => {
                write!(f, "failed to parse configuration: {}", reason)
            }
        }
    }
}
