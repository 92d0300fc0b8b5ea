// Demonstrates the deferred write-back flush
//
// Run with: cargo run --example deferred_flush

use optcache::{MemoryStore, SettingsCache};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let store = MemoryStore::new();

    {
        let mut cache = SettingsCache::load(store.clone(), "plugin_opts")?;
        cache.set("theme", "dark");
        cache.set("font_size", 14);
        // No save call: the dirty cache flushes once when it goes out of scope
    }

    println!("Record after drop: {:?}", store.snapshot("plugin_opts"));

    {
        let mut cache = SettingsCache::load(store.clone(), "plugin_opts")?;
        let theme: Option<String> = cache.get_as("theme")?;
        println!("theme = {theme:?}");

        // Unchanged value: the cache stays clean and this drop writes nothing
        cache.set("theme", "dark");
    }

    println!("Record unchanged: {:?}", store.snapshot("plugin_opts"));

    Ok(())
}
