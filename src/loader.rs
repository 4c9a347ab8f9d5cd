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

    loader.rs

    The instruction loader: the 4-state machine that turns queue bytes into
    `first_clock`/`second_clock` pulses for the rest of instruction decoding,
    and tracks whether the execution unit's microcode is still running.
    `nxt`/`rni` are the microcode signals for "the next opcode is already
    known, start loading it while I finish" and "run the next instruction's
    microcode now".
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum LoaderState {
    WaitFirstByte,
    WaitSecondByte,
    ExecutingMicrocode,
    Prefetch,
}

/// Signals the loader reacts to this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoaderInputs {
    /// A queue byte is available to consume this tick.
    pub queue_ready: bool,
    /// Microcode asserts NXT: the next opcode is already known, begin
    /// loading it speculatively while the current instruction finishes.
    pub nxt: bool,
    /// Microcode asserts RNI: run the next instruction's microcode now.
    pub rni: bool,
    /// The opcode just dispatched has no microcode routine at all.
    pub no_microcode: bool,
    /// The current instruction is known to be a single byte, substituting
    /// for `queue_ready` where the queue itself isn't the gating factor.
    pub single_byte: bool,
    pub reset: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoaderOutputs {
    pub first_clock: bool,
    pub second_clock: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct LoaderDelta {
    next_state: LoaderState,
    outputs: LoaderOutputs,
}

impl LoaderDelta {
    /// Whether this tick's transition consumes a queue byte, without
    /// committing the transition. Lets a caller (the core tick driver)
    /// compute the BIU's `q_take` input from the same evaluation.
    pub fn takes_byte(&self) -> bool {
        self.outputs.first_clock || self.outputs.second_clock
    }
}

pub struct InstructionLoader {
    state: LoaderState,
}

impl InstructionLoader {
    pub fn new() -> InstructionLoader {
        InstructionLoader {
            state: LoaderState::WaitFirstByte,
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// Evaluates the transition table. Precedence, highest first: reset,
    /// then `no_microcode`, then the queue-ready path, then the two
    /// stalled-fallback paths that apply only when the queue-ready path
    /// didn't already claim this tick.
    pub fn compute_next(&self, inputs: LoaderInputs) -> LoaderDelta {
        let mut next_state = self.state;
        let mut outputs = LoaderOutputs::default();

        if inputs.reset {
            // On reset, execute the reset routine in microcode.
            next_state = LoaderState::ExecutingMicrocode;
        } else if inputs.no_microcode {
            // If there is no microcode, the loader always goes back to the
            // idle state.
            next_state = LoaderState::WaitFirstByte;
        } else if inputs.queue_ready || inputs.single_byte {
            match self.state {
                LoaderState::WaitFirstByte => {
                    outputs.first_clock = true;
                    next_state = LoaderState::WaitSecondByte;
                }
                LoaderState::WaitSecondByte | LoaderState::Prefetch => {
                    outputs.second_clock = true;
                    next_state = LoaderState::ExecutingMicrocode;
                }
                LoaderState::ExecutingMicrocode => {
                    // Loader stalls here until microcode executes an RNI
                    // (finish) or NXT (prefetch).
                    if inputs.rni || inputs.nxt {
                        outputs.first_clock = true;
                        next_state = if inputs.rni {
                            LoaderState::WaitSecondByte
                        } else {
                            LoaderState::Prefetch
                        };
                    }
                }
            }
        } else if self.state == LoaderState::ExecutingMicrocode {
            // Reached the end of microcode but the queue is empty.
            if inputs.rni {
                next_state = LoaderState::WaitFirstByte;
            }
        } else if self.state == LoaderState::Prefetch && inputs.rni {
            next_state = LoaderState::WaitSecondByte;
        }

        LoaderDelta { next_state, outputs }
    }

    pub fn commit(&mut self, delta: LoaderDelta) -> LoaderOutputs {
        self.state = delta.next_state;
        delta.outputs
    }
}

impl Default for InstructionLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(loader: &mut InstructionLoader, inputs: LoaderInputs) -> LoaderOutputs {
        let delta = loader.compute_next(inputs);
        loader.commit(delta)
    }

    #[test]
    fn stalls_in_wait_first_byte_with_empty_queue() {
        let mut loader = InstructionLoader::new();
        let out = step(&mut loader, LoaderInputs::default());
        assert_eq!(loader.state(), LoaderState::WaitFirstByte);
        assert!(!out.first_clock);
    }

    #[test]
    fn first_byte_pulses_first_clock_and_waits_for_second_byte() {
        let mut loader = InstructionLoader::new();
        let out = step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        assert!(out.first_clock);
        assert_eq!(loader.state(), LoaderState::WaitSecondByte);
    }

    #[test]
    fn second_byte_pulses_second_clock_and_starts_microcode() {
        let mut loader = InstructionLoader::new();
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        assert_eq!(loader.state(), LoaderState::WaitSecondByte);

        let out = step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        assert!(out.second_clock);
        assert_eq!(loader.state(), LoaderState::ExecutingMicrocode);
    }

    #[test]
    fn no_microcode_returns_to_wait_first_byte_from_any_state() {
        let mut loader = InstructionLoader::new();
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        assert_eq!(loader.state(), LoaderState::WaitSecondByte);
        step(
            &mut loader,
            LoaderInputs {
                no_microcode: true,
                ..Default::default()
            },
        );
        assert_eq!(loader.state(), LoaderState::WaitFirstByte);
    }

    #[test]
    fn executing_microcode_stalls_until_rni_or_nxt_with_queue_ready() {
        let mut loader = InstructionLoader::new();
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        assert_eq!(loader.state(), LoaderState::ExecutingMicrocode);

        // queue ready but neither rni nor nxt asserted: stalls in place,
        // no pulse.
        let out = step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        assert!(!out.first_clock);
        assert_eq!(loader.state(), LoaderState::ExecutingMicrocode);

        let out = step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                rni: true,
                ..Default::default()
            },
        );
        assert!(out.first_clock);
        assert_eq!(loader.state(), LoaderState::WaitSecondByte);
    }

    #[test]
    fn nxt_moves_to_prefetch_while_microcode_still_running() {
        let mut loader = InstructionLoader::new();
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        assert_eq!(loader.state(), LoaderState::ExecutingMicrocode);

        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                nxt: true,
                ..Default::default()
            },
        );
        assert_eq!(loader.state(), LoaderState::Prefetch);
    }

    #[test]
    fn prefetch_with_queue_ready_pulses_second_clock_into_microcode() {
        let mut loader = InstructionLoader::new();
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                nxt: true,
                ..Default::default()
            },
        );
        assert_eq!(loader.state(), LoaderState::Prefetch);

        let out = step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        assert!(out.second_clock);
        assert_eq!(loader.state(), LoaderState::ExecutingMicrocode);
    }

    #[test]
    fn prefetch_stalled_takes_the_rni_fallback_to_wait_second_byte() {
        let mut loader = InstructionLoader::new();
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                nxt: true,
                ..Default::default()
            },
        );
        assert_eq!(loader.state(), LoaderState::Prefetch);

        // queue empty now: the stalled-fallback path applies instead of
        // the queue-ready path.
        let out = step(
            &mut loader,
            LoaderInputs {
                rni: true,
                ..Default::default()
            },
        );
        assert!(!out.first_clock && !out.second_clock);
        assert_eq!(loader.state(), LoaderState::WaitSecondByte);
    }

    #[test]
    fn executing_microcode_with_empty_queue_and_rni_falls_back_to_wait_first_byte() {
        let mut loader = InstructionLoader::new();
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        assert_eq!(loader.state(), LoaderState::ExecutingMicrocode);

        let out = step(
            &mut loader,
            LoaderInputs {
                rni: true,
                ..Default::default()
            },
        );
        assert!(!out.first_clock);
        assert_eq!(loader.state(), LoaderState::WaitFirstByte);
    }

    #[test]
    fn reset_always_wins_and_enters_the_reset_microcode_routine() {
        let mut loader = InstructionLoader::new();
        step(
            &mut loader,
            LoaderInputs {
                queue_ready: true,
                ..Default::default()
            },
        );
        step(
            &mut loader,
            LoaderInputs {
                reset: true,
                queue_ready: true,
                ..Default::default()
            },
        );
        assert_eq!(loader.state(), LoaderState::ExecutingMicrocode);
    }
}
