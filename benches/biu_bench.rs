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

    benches/biu_bench.rs

    Benchmarks the queue-refill hot loop: the BIU/register-file tick pair
    run back to back with no loader consumption, so every cycle exercises
    the full `Idle -> QueueFetchStart -> QueueFetchAddrCalc ->
    QueueFetchIpInc -> QueueFetch` sequence.
*/

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use i8086_biu_core::biu::{Biu, BiuInputs};
use i8086_biu_core::regfile::{BusRegFile, RegId};

fn refill_loop(is_8088: bool, ticks: usize) -> u8 {
    let mut biu = Biu::new(is_8088);
    let mut regfile = BusRegFile::new(is_8088);

    for _ in 0..ticks {
        let (delta, req) = biu.compute_next(&regfile, BiuInputs { mem_data: 0x90c3, q_take: 0, reset: false });
        let rf_delta = regfile.compute_next(req.b_read, req.write);
        biu.commit(delta);
        regfile.commit(rf_delta);
    }
    biu.q_count()
}

fn bench_queue_refill(c: &mut Criterion) {
    c.bench_function("biu_refill_loop_8086", |b| {
        b.iter(|| black_box(refill_loop(false, 64)));
    });
    c.bench_function("biu_refill_loop_8088", |b| {
        b.iter(|| black_box(refill_loop(true, 64)));
    });
}

fn bench_q_read_port(c: &mut Criterion) {
    let regfile = BusRegFile::new(false);
    c.bench_function("regfile_q_read", |b| {
        b.iter(|| black_box(regfile.q_read(black_box(3))));
    });
    let _ = RegId::Queue0;
}

criterion_group!(benches, bench_queue_refill, bench_q_read_port);
criterion_main!(benches);
