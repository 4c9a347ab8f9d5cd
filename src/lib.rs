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

    lib.rs

    A cycle-accurate functional model of the Intel 8086/8088 Bus Interface
    Unit and instruction-decode front end. This crate does not implement an
    execution unit, an ALU, or a disassembler: it owns the prefetch queue,
    the segmented-address adder, the two-layer group-decode PLA, the column
    selector that folds an 8K-entry logical microcode address space onto a
    512-entry physical ROM, and the instruction loader state machine that
    ties queue consumption to microcode execution.
*/

#![allow(dead_code)]

pub mod biu;
pub mod colsel;
pub mod config;
pub mod core_model;
pub mod error;
pub mod gdr;
pub mod loader;
pub mod regfile;
pub mod tables;
pub mod tracelogger;

pub use config::CoreConfig;
pub use core_model::Core;
pub use error::CoreError;
