use ferric_bloom::BloomFilter;
use fnv::FnvHashSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn random_word(rng: &mut StdRng) -> String {
    let len = rng.gen_range(5..=12);
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

struct Row {
    capacity: i64,
    error_rate: f64,
    num_bits: usize,
    num_hashes: usize,
    insert_rate: f64,
    query_rate: f64,
    fill_percent: f64,
    expected_fpr: f64,
    measured_fpr: f64,
}

fn run(
    capacity: i64,
    error_rate: f64,
    rng: &mut StdRng,
) -> Result<Row, Box<dyn std::error::Error>> {
    let mut filter = BloomFilter::new(capacity, error_rate)?;

    // Exact reference set; keeps "absent" probes truly absent
    let mut inserted = FnvHashSet::default();
    while inserted.len() < capacity as usize {
        inserted.insert(random_word(rng));
    }

    let start = Instant::now();
    for word in &inserted {
        filter.add(word);
    }
    let insert_time = start.elapsed().as_secs_f64();

    let missing = inserted.iter().filter(|w| !filter.contains(*w)).count();
    if missing > 0 {
        warn!(missing, "inserted words reported absent");
    }

    let mut probes = Vec::with_capacity(capacity as usize);
    while probes.len() < capacity as usize {
        let word = random_word(rng);
        if !inserted.contains(&word) {
            probes.push(word);
        }
    }

    let start = Instant::now();
    let false_positives = probes.iter().filter(|w| filter.contains(*w)).count();
    let query_time = start.elapsed().as_secs_f64();

    let rate = |n: usize, secs: f64| if secs > 0.0 { n as f64 / secs } else { f64::INFINITY };

    Ok(Row {
        capacity,
        error_rate,
        num_bits: filter.num_bits(),
        num_hashes: filter.num_hashes(),
        insert_rate: rate(inserted.len(), insert_time),
        query_rate: rate(probes.len(), query_time),
        fill_percent: filter.stats().fill_ratio_percent,
        expected_fpr: filter.estimated_fpr(),
        measured_fpr: false_positives as f64 / probes.len() as f64,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 42,
    };
    let mut rng = StdRng::seed_from_u64(seed);

    let capacities = [100, 1_000, 10_000];
    let error_rates = [0.1, 0.01, 0.001];
    info!(seed, ?capacities, ?error_rates, "starting false positive sweep");

    let mut results = Vec::new();
    for &capacity in &capacities {
        for &error_rate in &error_rates {
            let row = run(capacity, error_rate, &mut rng)?;
            info!(
                capacity,
                error_rate,
                m = row.num_bits,
                k = row.num_hashes,
                measured_fpr = row.measured_fpr,
                "sweep point done"
            );
            results.push(row);
        }
    }

    println!(
        "capacity,error_rate,m,k,insert_rate,query_rate,fill_percent,expected_fpr,measured_fpr"
    );
    for row in &results {
        println!(
            "{},{},{},{},{:.0},{:.0},{:.2},{:.6},{:.6}",
            row.capacity,
            row.error_rate,
            row.num_bits,
            row.num_hashes,
            row.insert_rate,
            row.query_rate,
            row.fill_percent,
            row.expected_fpr,
            row.measured_fpr
        );
    }

    Ok(())
}
