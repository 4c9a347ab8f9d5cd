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

    regfile.rs

    The bus register file: a 10x16 (9x16 on the 8088) storage holding the
    segment registers, the prefetch IP, two internal temporaries, and the
    prefetch queue's backing words. One write port, one registered 16-bit
    read port, one combinational 8-bit queue-read port.
*/

use strum_macros::EnumIter;

/// Selects a bus register file cell, or "no register" (a sentinel accepted
/// on the B-read and write ports that produces no side effect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, strum_macros::Display)]
pub enum RegId {
    Cs,
    Ds,
    Ss,
    Es,
    Ip,
    Ind,
    Opr,
    Queue0,
    Queue1,
    Queue2,
    None_,
}

impl RegId {
    /// Index into the cell array, or `None` for the sentinel / for `Queue2`
    /// on an 8088 (which has only two queue words).
    fn cell_index(self, is_8088: bool) -> Option<usize> {
        match self {
            RegId::Cs => Some(0),
            RegId::Ds => Some(1),
            RegId::Ss => Some(2),
            RegId::Es => Some(3),
            RegId::Ip => Some(4),
            RegId::Ind => Some(5),
            RegId::Opr => Some(6),
            RegId::Queue0 => Some(7),
            RegId::Queue1 => Some(8),
            RegId::Queue2 if !is_8088 => Some(9),
            RegId::Queue2 => None,
            RegId::None_ => None,
        }
    }

    fn default_value(self) -> u16 {
        match self {
            RegId::Ip => 0xfff0,
            RegId::Cs => 0xf000,
            _ => 0xcccc,
        }
    }
}

/// Base index of the queue's backing cells.
const QUEUE_BASE: usize = 7;

/// The pending result of a tick, computed by `compute_next` over the
/// current committed state, applied atomically by `commit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegFileDelta {
    /// New value for the registered B-read port, if a real register (not
    /// `None_`) was presented this cycle.
    b_bus: Option<u16>,
    /// Write to apply this cycle, if write-enable was asserted on a real
    /// register.
    write: Option<(usize, u16)>,
}

pub struct BusRegFile {
    is_8088: bool,
    cells: Vec<u16>,
    /// Registered output of the B-read port (1-cycle latency, §4.1).
    b_bus: u16,
}

impl BusRegFile {
    pub fn new(is_8088: bool) -> BusRegFile {
        let num_regs = if is_8088 { 9 } else { 10 };
        let mut cells = vec![0u16; num_regs];
        for (i, cell) in cells.iter_mut().enumerate() {
            let reg = [
                RegId::Cs,
                RegId::Ds,
                RegId::Ss,
                RegId::Es,
                RegId::Ip,
                RegId::Ind,
                RegId::Opr,
                RegId::Queue0,
                RegId::Queue1,
                RegId::Queue2,
            ][i];
            *cell = reg.default_value();
        }
        BusRegFile {
            is_8088,
            cells,
            b_bus: RegId::None_.default_value(),
        }
    }

    pub fn queue_word_count(&self) -> usize {
        if self.is_8088 {
            2
        } else {
            3
        }
    }

    /// Current value on the registered B bus (the result of whatever
    /// selector was presented one cycle ago).
    pub fn b_bus(&self) -> u16 {
        self.b_bus
    }

    /// Direct, zero-latency peek at a cell, for components (like the BIU)
    /// that are privileged collaborators of their own register file rather
    /// than external bus masters going through the B-read port.
    pub fn peek(&self, reg: RegId) -> u16 {
        match reg.cell_index(self.is_8088) {
            Some(i) => self.cells[i],
            None => 0,
        }
    }

    /// Combinational queue-read port: `byte_index`'s upper bits select the
    /// backing word, the low bit selects high byte (1) vs low byte (0).
    pub fn q_read(&self, byte_index: u8) -> u8 {
        let word_index = (byte_index >> 1) as usize;
        let cell = QUEUE_BASE + word_index;
        let word = self.cells.get(cell).copied().unwrap_or(0);
        if byte_index & 1 != 0 {
            (word >> 8) as u8
        } else {
            (word & 0xff) as u8
        }
    }

    /// Computes the delta for presenting `b_read` on the B-read port and
    /// optionally writing `write` this cycle. Pure: does not mutate `self`.
    pub fn compute_next(&self, b_read: RegId, write: Option<(RegId, u16)>) -> RegFileDelta {
        let b_bus = b_read.cell_index(self.is_8088).map(|_| {
            // registered read uses the *current* (pre-write) cell contents
            self.peek(b_read)
        });
        let write = write.and_then(|(reg, data)| reg.cell_index(self.is_8088).map(|i| (i, data)));
        RegFileDelta { b_bus, write }
    }

    pub fn commit(&mut self, delta: RegFileDelta) {
        if let Some((i, data)) = delta.write {
            self.cells[i] = data;
        }
        if let Some(value) = delta.b_bus {
            self.b_bus = value;
        }
    }
}
