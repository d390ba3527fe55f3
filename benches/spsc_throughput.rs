//! SPSC Queue Throughput Benchmark
//!
//! Measures steady-state hand-off throughput of YPQueue between one producer and one consumer
//! using Criterion.
//!
//! # Features
//! - Thread pinning: producer and consumer threads are pinned to different CPU cores using
//!   core_affinity to reduce cache contention.
//! - Synchronized start: a barrier makes both threads start together, so only steady-state
//!   hand-off is measured.
//! - Wall-clock timing: iter_custom measures elapsed time from producer start to consumer finish.
//! - Two scenarios: plain `u64` handles, and pool records circulating through a free list and a
//!   work queue.
//!
//! # Parameters Swept
//! - Capacities: 64, 256, 1024 slots
//! - Record sizes: 8, 64, 128 bytes (pool scenario)
//! - Consumer mode: blocking `pop` or polling `try_pop`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::{Barrier, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use yep_pq::{YPQueue, YPRecord, YPRecordPool};

/// Messages sent per measured iteration
const MESSAGES_PER_ITER: u64 = 100_000;

#[derive(Clone, Copy, Debug)]
enum ConsumerMode {
    Blocking,
    Polling,
}

/// Parameters for the benchmark sweep
struct BenchParams {
    capacity: usize,
    record_size: usize,
    mode: ConsumerMode,
}

impl BenchParams {
    fn id(&self) -> String {
        format!(
            "cap{}_record{}_{:?}",
            self.capacity, self.record_size, self.mode
        )
    }
}

/// Find two distinct CPU cores to pin threads to.
/// Returns (producer_core_id, consumer_core_id)
fn select_cores() -> Option<(core_affinity::CoreId, core_affinity::CoreId)> {
    let core_ids = core_affinity::get_core_ids()?;

    if core_ids.len() < 2 {
        return None;
    }

    // For simplicity, pick first and middle core
    Some((core_ids[0], core_ids[core_ids.len() / 2]))
}

fn pin(core: Option<core_affinity::CoreId>) {
    if let Some(core) = core {
        core_affinity::set_for_current(core);
    }
}

fn consume<T>(queue: &YPQueue<T>, mode: ConsumerMode) -> T {
    match mode {
        ConsumerMode::Blocking => queue.pop(),
        ConsumerMode::Polling => loop {
            match queue.try_pop() {
                Ok(item) => break item,
                Err(_) => thread::yield_now(),
            }
        },
    }
}

/// Run one timed iteration: the producer starts the clock after the barrier, the consumer stops
/// it after the last message.
fn timed_iteration<P, C>(
    cores: Option<(core_affinity::CoreId, core_affinity::CoreId)>,
    produce: P,
    consume: C,
) -> Duration
where
    P: FnOnce() + Send,
    C: FnOnce() + Send,
{
    let barrier = Barrier::new(2);
    let start_time = Mutex::new(None);
    let end_time = Mutex::new(None);

    thread::scope(|s| {
        s.spawn(|| {
            pin(cores.map(|(_, consumer)| consumer));
            barrier.wait();
            consume();
            *end_time.lock().unwrap() = Some(Instant::now());
        });

        s.spawn(|| {
            pin(cores.map(|(producer, _)| producer));
            barrier.wait();
            *start_time.lock().unwrap() = Some(Instant::now());
            produce();
        });
    });

    let start = start_time.into_inner().unwrap().expect("Start time not set");
    let end = end_time.into_inner().unwrap().expect("End time not set");
    end.duration_since(start)
}

/// Plain handles: the producer spins on a full queue, the consumer blocks or polls.
fn bench_handle_throughput(c: &mut Criterion, params: BenchParams) {
    let mut group = c.benchmark_group("spsc_handle_throughput");
    group.measurement_time(Duration::from_secs(3));
    group.sample_size(50);
    group.throughput(Throughput::Elements(MESSAGES_PER_ITER));

    let cores = select_cores();

    group.bench_with_input(
        BenchmarkId::from_parameter(params.id()),
        &params,
        |b, params| {
            b.iter_custom(|iters| {
                let mut total_duration = Duration::ZERO;

                for _ in 0..iters {
                    let queue = YPQueue::<u64>::new(params.capacity).unwrap();

                    total_duration += timed_iteration(
                        cores,
                        || {
                            let mut next = 0;
                            while next < MESSAGES_PER_ITER {
                                match queue.push(black_box(next)) {
                                    Ok(()) => next += 1,
                                    Err(_) => thread::yield_now(),
                                }
                            }
                        },
                        || {
                            for _ in 0..MESSAGES_PER_ITER {
                                black_box(consume(&queue, params.mode));
                            }
                        },
                    );
                }

                total_duration
            });
        },
    );

    group.finish();
}

/// Pool records: the producer takes a record from the free list, fills it and sends it over the
/// work queue; the consumer reads it and frees it.
fn bench_pool_throughput(c: &mut Criterion, params: BenchParams) {
    let mut group = c.benchmark_group("spsc_pool_throughput");
    group.measurement_time(Duration::from_secs(3));
    group.sample_size(50);
    group.throughput(Throughput::Elements(MESSAGES_PER_ITER));

    let cores = select_cores();

    group.bench_with_input(
        BenchmarkId::from_parameter(params.id()),
        &params,
        |b, params| {
            b.iter_custom(|iters| {
                let mut total_duration = Duration::ZERO;

                for _ in 0..iters {
                    let mut pool = YPRecordPool::new(params.capacity, params.record_size).unwrap();
                    let free_list = YPQueue::from_pool(&mut pool).unwrap();
                    let work_queue = YPQueue::<YPRecord>::new(params.capacity).unwrap();

                    total_duration += timed_iteration(
                        cores,
                        || {
                            for msg_num in 0..MESSAGES_PER_ITER {
                                let mut record = consume(&free_list, params.mode);
                                // Fill with pattern to prevent optimization
                                for (i, byte) in record.data_mut().iter_mut().enumerate() {
                                    *byte = ((msg_num as usize + i) % 256) as u8;
                                }
                                // never full: at most `capacity` records exist
                                work_queue.push(record).unwrap();
                            }
                        },
                        || {
                            for _ in 0..MESSAGES_PER_ITER {
                                let record = consume(&work_queue, params.mode);
                                black_box(record.data());
                                free_list.push(record).unwrap();
                            }
                        },
                    );
                }

                total_duration
            });
        },
    );

    group.finish();
}

/// Main benchmark entry point
fn spsc_throughput_benchmarks(c: &mut Criterion) {
    let capacities = [64, 256, 1024];
    let record_sizes = [8, 64, 128];
    let modes = [ConsumerMode::Blocking, ConsumerMode::Polling];

    for &capacity in &capacities {
        for &mode in &modes {
            bench_handle_throughput(
                c,
                BenchParams {
                    capacity,
                    record_size: 0,
                    mode,
                },
            );

            for &record_size in &record_sizes {
                bench_pool_throughput(
                    c,
                    BenchParams {
                        capacity,
                        record_size,
                        mode,
                    },
                );
            }
        }
    }
}

criterion_group!(benches, spsc_throughput_benchmarks);
criterion_main!(benches);
