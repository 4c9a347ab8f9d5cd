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

    tables/microcode.rs

    The microcode word array: 512 entries of 21 bits each, reassembled from
    four text-file halves per side (left/right) the way Reenigne's die
    extracts lay them out, and the bit-level scramble used to pull the
    destination/source register fields, type, payload and flags-update bit
    back out of a raw word.
*/

use super::TableSource;
use crate::error::CoreError;

/// Register identity carried in a microcode word's destination or source
/// field. The raw 5-bit code is context-dependent: e.g. code `0x7` means
/// `no_dest` as a destination but `Q` (read next queue byte) as a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum MicrocodeReg {
    Es,
    Cs,
    Ss,
    Ds,
    Pc,
    Ind,
    Opr,
    NoDest,
    Al,
    Cl,
    Dl,
    Bl,
    TmpA,
    TmpB,
    TmpC,
    Flags,
    Ah,
    Ch,
    M,
    R,
    TmpAL,
    TmpBL,
    TmpAH,
    TmpBH,
    Ax,
    Cx,
    Dx,
    Bx,
    Sp,
    Bp,
    Si,
    Di,
    /// source-only: read next byte from the prefetch queue
    Q,
    /// source-only: result of the last ALU operation
    Sigma,
    /// source-only: all bits one
    Ones,
    Cr,
    /// source-only: all bits zero
    Zero,
}

impl MicrocodeReg {
    pub fn from_dest_code(code: u8) -> MicrocodeReg {
        use MicrocodeReg::*;
        match code & 0x1f {
            0x0 => Es,
            0x1 => Cs,
            0x2 => Ss,
            0x3 => Ds,
            0x4 => Pc,
            0x5 => Ind,
            0x6 => Opr,
            0x7 => NoDest,
            0x8 => Al,
            0x9 => Cl,
            0xa => Dl,
            0xb => Bl,
            0xc => TmpA,
            0xd => TmpB,
            0xe => TmpC,
            0xf => Flags,
            0x10 => Ah,
            0x11 => Ch,
            0x12 => M,
            0x13 => R,
            0x14 => TmpAL,
            0x15 => TmpBL,
            0x16 => TmpAH,
            0x17 => TmpBH,
            0x18 => Ax,
            0x19 => Cx,
            0x1a => Dx,
            0x1b => Bx,
            0x1c => Sp,
            0x1d => Bp,
            0x1e => Si,
            _ => Di,
        }
    }

    pub fn from_src_code(code: u8) -> MicrocodeReg {
        use MicrocodeReg::*;
        match code & 0x1f {
            0x7 => Q,
            0x14 => Sigma,
            0x15 => Ones,
            0x16 => Cr,
            0x17 => Zero,
            other => Self::from_dest_code(other),
        }
    }
}

/// A microcode word's type-dependent payload. Only the raw fields are
/// exposed: the arithmetic/jump/bus-operation semantics the type code
/// implies are an execution-unit concern and out of scope here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicrocodeOp {
    /// A documented, harmless "no information" slot: `typ == 4` with payload
    /// `0x7f`. Not an error — logged as an unknown op by the caller.
    Filler,
    /// Any other type/payload combination, carried uninterpreted.
    Op { type_field: u8, payload: u8 },
}

/// One 21-bit word of the microcode ROM, decoded into its named fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MicrocodeWord {
    raw: u32,
}

impl MicrocodeWord {
    pub fn from_raw(raw: u32) -> MicrocodeWord {
        MicrocodeWord { raw: raw & 0x1f_ffff }
    }

    pub fn raw(&self) -> u32 {
        self.raw
    }

    /// 5-bit destination field, bits `{20,19,18,17,16}` -> `dd` per the
    /// disassembler's `((d>>20)&1) + ((d>>18)&2) + ((d>>16)&4) + ((d>>14)&8)
    /// + ((d>>12)&0x10)` extraction.
    pub fn dest_code(&self) -> u8 {
        let d = self.raw;
        (((d >> 20) & 1) + ((d >> 18) & 2) + ((d >> 16) & 4) + ((d >> 14) & 8) + ((d >> 12) & 0x10))
            as u8
    }

    /// 5-bit source field, bits `{13,11,12,14,15}` -> `s` per the
    /// disassembler's `((d>>13)&1) + ((d>>10)&6) + ((d>>11)&0x18)` extraction.
    pub fn src_code(&self) -> u8 {
        let d = self.raw;
        (((d >> 13) & 1) + ((d >> 10) & 6) + ((d >> 11) & 0x18)) as u8
    }

    pub fn dest(&self) -> MicrocodeReg {
        MicrocodeReg::from_dest_code(self.dest_code())
    }

    pub fn src(&self) -> MicrocodeReg {
        MicrocodeReg::from_src_code(self.src_code())
    }

    pub fn type_field(&self) -> u8 {
        ((self.raw >> 7) & 7) as u8
    }

    pub fn payload(&self) -> u8 {
        (self.raw & 0x7f) as u8
    }

    pub fn updates_flags(&self) -> bool {
        (self.raw >> 10) & 1 != 0
    }

    /// `ONES -> Q` move used as a documented no-op.
    pub fn is_noop_move(&self) -> bool {
        self.src_code() == 0x15 && self.dest_code() == 0x07
    }

    pub fn op(&self) -> MicrocodeOp {
        let typ = self.type_field();
        let payload = self.payload();
        if typ == 4 && payload == 0x7f {
            MicrocodeOp::Filler
        } else {
            MicrocodeOp::Op {
                type_field: typ,
                payload,
            }
        }
    }

    /// Rebuilds the raw 21-bit word from its decoded fields, for the §8
    /// disassemble/reassemble round-trip.
    pub fn reassemble(dest_code: u8, src_code: u8, type_field: u8, payload: u8, updates_flags: bool) -> MicrocodeWord {
        let dd = dest_code as u32 & 0x1f;
        let s = src_code as u32 & 0x1f;
        let mut d: u32 = 0;
        d |= payload as u32 & 0x7f;
        d |= (type_field as u32 & 7) << 7;
        d |= (updates_flags as u32) << 10;
        d |= (s & 1) << 13;
        d |= ((s >> 1) & 3) << 11;
        d |= ((s >> 3) & 3) << 14;
        d |= (dd & 1) << 20;
        d |= ((dd >> 1) & 1) << 19;
        d |= ((dd >> 2) & 1) << 18;
        d |= ((dd >> 3) & 1) << 17;
        d |= ((dd >> 4) & 1) << 16;
        MicrocodeWord::from_raw(d)
    }
}

fn half_filenames(half: char, is_8088: bool) -> [String; 4] {
    let suffix = if is_8088 { "" } else { "a" };
    std::array::from_fn(|i| format!("{half}{i}{suffix}.txt"))
}

/// Reads and inverts one 84-row x 64-column half-plane (the `l` or `r` side),
/// then transposes it to 64 rows of 84 columns, per §6.
fn read_half<S: TableSource>(source: &S, half: char, is_8088: bool) -> anyhow::Result<Vec<Vec<u8>>> {
    let mut text = String::new();
    for name in half_filenames(half, is_8088) {
        text.push_str(&source.read_table_file(&name)?);
    }

    let rows: Vec<&str> = text.lines().collect();
    if rows.len() != 84 {
        return Err(CoreError::TableLoad {
            table: "microcode",
            reason: format!("half '{half}' has {} rows, expected 84", rows.len()),
        }
        .into());
    }

    let inverted: Vec<Vec<u8>> = rows
        .iter()
        .map(|row| row.bytes().map(|c| if c == b'1' { 0 } else { 1 }).collect())
        .collect();

    let cols = inverted[0].len();
    if cols != 64 {
        return Err(CoreError::TableLoad {
            table: "microcode",
            reason: format!("half '{half}' has {cols} columns, expected 64"),
        }
        .into());
    }

    let mut transposed = Vec::with_capacity(64);
    for y in 0..64 {
        let mut column = Vec::with_capacity(84);
        for row in &inverted {
            column.push(row[y]);
        }
        transposed.push(column);
    }
    Ok(transposed)
}

/// Reassembles the 512 x 21-bit microcode word array from the `l`/`r` text
/// extracts, per §6's stitching algorithm.
pub fn read_microcode<S: TableSource>(source: &S, is_8088: bool) -> anyhow::Result<Vec<MicrocodeWord>> {
    let left = read_half(source, 'l', is_8088)?;
    let right = read_half(source, 'r', is_8088)?;

    // interleave l/r rows
    let mut interleaved: Vec<&Vec<u8>> = Vec::with_capacity(128);
    for (l, r) in left.iter().zip(right.iter()) {
        interleaved.push(l);
        interleaved.push(r);
    }

    // split each 84-bit row into four 21-bit rows, columns (3-i), (3-i)+4, ...
    let mut words: Vec<u32> = Vec::with_capacity(512);
    for row in interleaved {
        for i in 0..4 {
            let mut value: u32 = 0;
            let mut x = 3 - i;
            while x < 84 {
                value = (value << 1) | row[x] as u32;
                x += 4;
            }
            words.push(value);
        }
    }

    if words.len() != 512 {
        return Err(CoreError::TableLoad {
            table: "microcode",
            reason: format!("assembled {} words, expected 512", words.len()),
        }
        .into());
    }

    words.reverse();
    Ok(words.into_iter().map(MicrocodeWord::from_raw).collect())
}
