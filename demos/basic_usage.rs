// Basic usage example for optcache
//
// Run with: cargo run --example basic_usage

use optcache::{JsonFileStore, SettingsCache};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // One JSON record per key under ./demo_config
    let store = JsonFileStore::new("./demo_config");
    let mut cache = SettingsCache::load(store, "plugin_opts")?;

    println!(
        "Loaded {} option(s) from record '{}'",
        cache.len(),
        cache.record_key()
    );

    cache.set("enabled", true);
    cache.set("greeting", "hello");
    cache.set("retries", 3);
    cache.set("endpoint", json!({"host": "localhost", "port": 5572}));

    // Setting an unchanged value does not mark the cache dirty again
    cache.set("enabled", true);

    println!("Dirty: {}", cache.is_dirty());
    for key in cache.keys() {
        println!("  {key} = {}", cache.get(&key).unwrap());
    }

    // Flushed once here; the drop at the end of main has nothing left to do
    cache.maybe_save()?;
    println!("Record flushed");

    Ok(())
}
