use clap::Parser;
use clap::builder::RangedU64ValueParser;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Instant;
use test_support::utils::{read_id, stamp_id};
use yep_pq::{YPQueue, YPRecord, YPRecordPool};

/// Circulate fixed-size records between producers and a consumer, using a YPQueue seeded from a
/// YPRecordPool as the free list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of records in the pool
    #[arg(
        short = 'r',
        long,
        default_value = "64",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    records: usize,

    /// Size of each record in bytes (at least 8, the id is stamped at the front)
    #[arg(
        short = 's',
        long,
        default_value = "64",
        value_parser = RangedU64ValueParser::<usize>::new().range(8..)
    )]
    record_size: usize,

    /// Number of producer threads
    #[arg(short = 'p', long, default_value = "2")]
    producers: u64,

    /// Total number of messages to send
    #[arg(short = 'n', long, default_value = "100000")]
    msg_count: u64,

    /// Enable verbose logging
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    yep_pq::trace::init_tracing();
    let args = Args::parse();

    println!("Starting record pool test with:");
    println!("  Records: {}", args.records);
    println!("  Record size: {} bytes", args.record_size);
    println!("  Producers: {}", args.producers);
    println!("  Total messages: {}", args.msg_count);

    let mut pool = match YPRecordPool::new(args.records, args.record_size) {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create record pool: err {e}"),
    };

    let start_time = Instant::now();
    {
        let free_list = YPQueue::from_pool(&mut pool).unwrap();
        let work_queue = YPQueue::<YPRecord>::new(args.records).unwrap();
        let next_id = AtomicU64::new(0);
        let checksum = AtomicU64::new(0);

        thread::scope(|s| {
            for producer in 0..args.producers {
                let free_list = &free_list;
                let work_queue = &work_queue;
                let next_id = &next_id;
                thread::Builder::new()
                    .name(format!("producer_{producer}"))
                    .spawn_scoped(s, move || {
                        loop {
                            let id = next_id.fetch_add(1, Ordering::AcqRel);
                            if id >= args.msg_count {
                                break;
                            }

                            // blocks until the consumer frees a record
                            let mut record = free_list.pop();
                            stamp_id(id, record.data_mut());
                            if args.verbose {
                                println!("producer_{producer} sent {id} in {record:?}");
                            }

                            // every record is either free or queued here, so this never fills
                            work_queue.push(record).unwrap();
                        }
                    })
                    .unwrap();
            }

            // Consumer thread
            s.spawn(|| {
                for _ in 0..args.msg_count {
                    let record = work_queue.pop();
                    let id = read_id(record.data());
                    checksum.fetch_add(id, Ordering::Relaxed);
                    if args.verbose {
                        println!("consumer received {id} from {record:?}");
                    }
                    free_list.push(record).unwrap();
                }
            });
        });

        assert_eq!(free_list.len(), args.records, "records leaked from the free list");
        free_list.log_dump();

        let expected: u64 = (0..args.msg_count).sum();
        assert_eq!(checksum.load(Ordering::Relaxed), expected, "message ids mismatch");
    }

    println!(
        "Record pool test finished in {:?} us!",
        start_time.elapsed().as_micros()
    );

    let stamped = pool.records().filter(|record| read_id(record) != 0).count();
    println!("{stamped} of {} records hold a non-zero id", pool.record_count());
}
