//! Basic usage examples for ferric-bloom

use ferric_bloom::{BloomConfig, BloomFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Ferric Bloom Filter Examples ===\n");

    // Example 1: Sizing from capacity and error rate
    println!("1. Basic Bloom Filter:");
    let mut bloom = BloomFilter::new(1000, 0.01)?;
    println!(
        "  m = {} bits, k = {} hashes ({:.2} bits per element)",
        bloom.num_bits(),
        bloom.num_hashes(),
        bloom.bits_per_element()
    );

    let fruits = ["apple", "banana", "cherry", "damson", "elderberry"];
    for fruit in &fruits {
        bloom.add(fruit);
    }

    for fruit in &fruits {
        println!("  {} in filter: {}", fruit, bloom.contains(fruit));
    }
    for word in &["fig", "grape", "kiwi"] {
        println!("  {} in filter: {}", word, bloom.contains(word));
    }

    println!("  {}", bloom.stats());
    println!();

    // Example 2: Where an item lands
    println!("2. Probe positions for \"apple\":");
    for (index, on) in bloom.probe("apple") {
        println!("    bit {:>5} = {}", index, u8::from(on));
    }
    println!();

    // Example 3: Mixed item types share one hashing scheme
    println!("3. Mixed item types:");
    let mut mixed = BloomConfig::new(100, 0.05).build()?;
    mixed.add(&2024u32);
    mixed.add(b"\x00\x01raw".as_slice());
    println!("  \"2024\" in filter: {}", mixed.contains("2024"));
    println!(
        "  raw bytes in filter: {}",
        mixed.contains(b"\x00\x01raw".as_slice())
    );
    println!();

    // Example 4: Overfilling raises the false positive rate
    println!("4. Overfilling a small filter:");
    let mut small = BloomFilter::new(50, 0.01)?;
    for i in 0..200 {
        small.add(&format!("word-{}", i));
    }
    let false_positives = (0..1000)
        .filter(|i| small.contains(&format!("other-{}", i)))
        .count();
    println!(
        "  {} elements in a filter sized for {}: fill {:.1}%, estimated FPR {:.4}, measured {:.4}",
        small.len(),
        small.capacity(),
        small.fill_ratio() * 100.0,
        small.estimated_fpr(),
        false_positives as f64 / 1000.0
    );

    Ok(())
}
