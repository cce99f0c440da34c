//! mapmsg bench - latency demo untuk map message codec
//!
//! Mengukur encode, decode, dan typed get pada body dengan N field.
//!
//! Usage:
//!   cargo run --release --bin mapmsg_bench [OPTIONS]

use std::time::Instant;

use mapmsg::{decode, Encoder, MapMessage, Result};
use tracing::info;

/// Bench configuration
struct BenchConfig {
    fields: usize,
    iterations: usize,
    payload_size: usize,
    verbose: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            fields: 16,
            iterations: 100_000,
            payload_size: 64,
            verbose: false,
        }
    }
}

fn parse_args() -> BenchConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = BenchConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--fields" | "-f" => {
                if i + 1 < args.len() {
                    config.fields = args[i + 1].parse().unwrap_or(16);
                    i += 1;
                }
            }
            "--iterations" | "-n" => {
                if i + 1 < args.len() {
                    config.iterations = args[i + 1].parse().unwrap_or(100_000);
                    i += 1;
                }
            }
            "--payload" | "-p" => {
                if i + 1 < args.len() {
                    config.payload_size = args[i + 1].parse().unwrap_or(64);
                    i += 1;
                }
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--help" | "-h" => {
                println!("mapmsg bench - Map Message Codec Latency\n");
                println!("Usage: mapmsg_bench [OPTIONS]\n");
                println!("Options:");
                println!("  -f, --fields <N>       Fields per message (default: 16)");
                println!("  -n, --iterations <N>   Iterations per phase (default: 100000)");
                println!("  -p, --payload <BYTES>  Bytes field size (default: 64)");
                println!("  -v, --verbose          Debug logging (overridden by RUST_LOG)");
                println!("  -h, --help             Show this help");
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

/// Message contoh dengan campuran semua tipe primitive
fn build_message(config: &BenchConfig) -> Result<MapMessage> {
    let mut msg = MapMessage::new();
    let payload = vec![0xABu8; config.payload_size];

    for i in 0..config.fields {
        let name = format!("field_{i:04}");
        match i % 6 {
            0 => msg.set_int(&name, i as i32)?,
            1 => msg.set_long(&name, (i as i64) << 40)?,
            2 => msg.set_double(&name, i as f64 * 0.5)?,
            3 => msg.set_string(&name, format!("value-{i}"))?,
            4 => msg.set_boolean(&name, i % 2 == 0)?,
            _ => msg.set_bytes(&name, payload.clone())?,
        }
    }
    Ok(msg)
}

fn report(label: &str, iterations: usize, elapsed_ns: f64) {
    let per_op = elapsed_ns / iterations as f64;
    println!(
        "  {:<14} {:>10.2} ns/op ({:.3} μs/op, {:.2} M ops/sec)",
        label,
        per_op,
        per_op / 1000.0,
        1_000.0 / per_op
    );
}

fn run(config: BenchConfig) -> Result<()> {
    let msg = build_message(&config)?;
    let wire = msg.body_bytes()?;

    info!(
        fields = msg.len(),
        bytes = wire.len(),
        iterations = config.iterations,
        "starting map message benchmark"
    );

    println!("📊 Map Message Codec Benchmark");
    println!("------------------------------");
    println!("  Fields: {}  Wire size: {} bytes\n", msg.len(), wire.len());

    // Encode dengan buffer yang di-reuse
    let mut encoder = Encoder::new(wire.len());
    let start = Instant::now();
    for _ in 0..config.iterations {
        encoder.encode(msg.body())?;
    }
    report("encode", config.iterations, start.elapsed().as_nanos() as f64);

    let start = Instant::now();
    for _ in 0..config.iterations {
        decode(&wire)?;
    }
    report("decode", config.iterations, start.elapsed().as_nanos() as f64);

    // Typed get dengan coercion int → string
    let start = Instant::now();
    for _ in 0..config.iterations {
        msg.get_string("field_0000")?;
    }
    report("get_string", config.iterations, start.elapsed().as_nanos() as f64);

    let start = Instant::now();
    for _ in 0..config.iterations {
        msg.get_long("field_0000")?;
    }
    report("get_long", config.iterations, start.elapsed().as_nanos() as f64);

    Ok(())
}

fn main() {
    let config = parse_args();

    let default_filter = if config.verbose {
        "info,mapmsg=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    if let Err(e) = run(config) {
        eprintln!("❌ Benchmark error: {}", e);
        std::process::exit(1);
    }
}
