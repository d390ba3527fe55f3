use clap::Parser;
use clap::builder::RangedU64ValueParser;
use std::thread;
use std::time::Duration;
use yep_pq::{YPQueue, YPQueueError};

/// Walk a YPQueue through fill, drain, wrap-around and a blocked-consumer hand-off
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Queue capacity (usable slots), at least 2 for the threaded phase
    #[arg(
        short = 'c',
        long,
        default_value = "10",
        value_parser = RangedU64ValueParser::<usize>::new().range(2..)
    )]
    capacity: usize,

    /// Number of push/pop round trips in the wrap-around phase
    #[arg(short = 'n', long, default_value = "10000")]
    iterations: u64,

    /// How long the consumer sits blocked before the producer starts, in milliseconds
    #[arg(short = 'd', long, default_value = "1000")]
    producer_delay_ms: u64,

    /// Print every pushed and popped value
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
}

fn fill(queue: &YPQueue<u64>, verbose: bool) {
    println!("-----------------------------");
    println!("filling queue");

    let mut value = 1;
    loop {
        let result = queue.push(value);
        if verbose {
            println!("pushed val:{value} result:{result:?}");
        }
        if result.is_err() {
            break;
        }
        value += 1;
    }

    println!("pushed {} values before the queue was full", value - 1);
}

fn empty(queue: &YPQueue<u64>, verbose: bool) {
    println!("-----------------------------");
    println!("emptying queue");

    let mut popped = 0;
    loop {
        match queue.try_pop() {
            Ok(value) => {
                popped += 1;
                if verbose {
                    println!("popped i:{popped} val:{value}");
                }
            }
            Err(YPQueueError::EmptyQueue) => break,
            Err(e) => panic!("unexpected error when popping: {e:?}"),
        }
    }

    println!("popped {popped} values before the queue was empty");
}

fn iterate(queue: &YPQueue<u64>, iterations: u64) {
    println!("-----------------------------");
    println!("iterations {iterations}");

    for i in 1..iterations {
        if let Err(e) = queue.push(i) {
            panic!("{i} push() returned an error {e}");
        }

        match queue.try_pop() {
            Ok(value) => assert_eq!(value, i, "popped out of order"),
            Err(e) => panic!("{i} try_pop() returned an error {e}"),
        }
    }
}

fn threads(queue: &YPQueue<u64>, delay: Duration, verbose: bool) {
    let count = queue.capacity() as u64 - 1;

    thread::scope(|s| {
        // Consumer thread, started first so it parks on the empty queue
        let consumer = s.spawn(|| {
            println!("consumer started");
            for expected in 1..=count {
                let value = queue.pop();
                if verbose {
                    println!("consumer popped {value}");
                }
                assert_eq!(value, expected, "consumer received values out of order");
            }
        });

        thread::sleep(delay);

        // Producer thread
        let producer = s.spawn(|| {
            println!("producer started");
            for value in 1..=count {
                let result = queue.push(value);
                if verbose {
                    println!("producer pushed val:{value} result:{result:?}");
                }
            }
        });

        println!("waiting for threads to exit");
        producer.join().unwrap();
        println!("joined with producer thread");
        consumer.join().unwrap();
        println!("joined with consumer thread");
    });
}

fn main() {
    yep_pq::trace::init_tracing();
    let args = Args::parse();

    let queue = YPQueue::<u64>::new(args.capacity).unwrap();
    println!("{}", queue.dump());

    fill(&queue, args.verbose);
    println!("{}", queue.dump());

    empty(&queue, args.verbose);
    println!("{}", queue.dump());

    iterate(&queue, args.iterations);
    queue.log_dump();

    threads(
        &queue,
        Duration::from_millis(args.producer_delay_ms),
        args.verbose,
    );
    println!("{}", queue.dump());
}
