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

    core_model.rs

    Wires the register file, BIU, instruction loader, group-decode PLA, and
    column selector into one cycle-driven `Core`. `tick()` advances the one
    synchronous process this crate fully owns: queue refill gated by queue
    consumption. Microcode sequencing past the loader's NXT/RNI pulses is an
    execution-unit concern and stays outside this crate (see SPEC_FULL.md's
    Non-goals) -- callers drive `nxt`/`rni`/`single_byte`/`no_microcode`
    themselves, e.g. from a real or stubbed microcode sequencer.
*/

use std::path::Path;

use crate::biu::{Biu, BiuInputs};
use crate::colsel::ColumnSelector;
use crate::config::CoreConfig;
use crate::gdr::GroupDecode;
use crate::loader::{InstructionLoader, LoaderInputs, LoaderOutputs};
use crate::regfile::BusRegFile;
use crate::tables::{self, MicrocodeWord};

pub struct Core {
    regfile: BusRegFile,
    biu: Biu,
    loader: InstructionLoader,
    gdr: GroupDecode,
    colsel: ColumnSelector,
    microcode: Vec<MicrocodeWord>,
}

impl Core {
    pub fn new(config: &CoreConfig) -> anyhow::Result<Core> {
        let table_dir: &Path = &config.table_dir;
        let tables = tables::load_all(&table_dir, config.is_8088)?;
        Ok(Core {
            regfile: BusRegFile::new(config.is_8088),
            biu: Biu::new(config.is_8088),
            loader: InstructionLoader::new(),
            gdr: GroupDecode::new(tables.group_decode),
            colsel: ColumnSelector::new(tables.column_selector),
            microcode: tables.microcode,
        })
    }

    pub fn regfile(&self) -> &BusRegFile {
        &self.regfile
    }

    pub fn biu(&self) -> &Biu {
        &self.biu
    }

    pub fn loader(&self) -> &InstructionLoader {
        &self.loader
    }

    pub fn gdr(&self) -> &GroupDecode {
        &self.gdr
    }

    pub fn colsel(&self) -> &ColumnSelector {
        &self.colsel
    }

    /// Looks up a microcode word by its physical ROM address (post column
    /// selection), per §4.4/§6.
    pub fn microcode_at(&self, physical_address: u8) -> Option<MicrocodeWord> {
        self.microcode.get(physical_address as usize).copied()
    }

    /// Advances the queue-refill/instruction-loader machinery by one bus
    /// cycle. `mem_data` is the word memory returns if this tick completes
    /// a queue-fetch bus cycle; `single_byte`, `no_microcode`, `nxt` and
    /// `rni` are this tick's microcode signals, driven by the caller's
    /// execution unit. `queue_ready` is derived here from the BIU's own
    /// queue state, not supplied by the caller.
    pub fn tick(
        &mut self,
        mem_data: u16,
        single_byte: bool,
        no_microcode: bool,
        nxt: bool,
        rni: bool,
        reset: bool,
    ) -> LoaderOutputs {
        let queue_ready = self.biu.peek_next_byte(&self.regfile).is_some();

        let loader_delta = self.loader.compute_next(LoaderInputs {
            queue_ready,
            nxt,
            rni,
            no_microcode,
            single_byte,
            reset,
        });
        let q_take: u8 = if loader_delta.takes_byte() { 1 } else { 0 };

        let (biu_delta, bus_request) = self.biu.compute_next(
            &self.regfile,
            BiuInputs {
                mem_data,
                q_take,
                reset,
            },
        );
        let rf_delta = self.regfile.compute_next(bus_request.b_read, bus_request.write);

        let outputs = self.loader.commit(loader_delta);
        self.biu.commit(biu_delta);
        self.regfile.commit(rf_delta);
        outputs
    }
}
