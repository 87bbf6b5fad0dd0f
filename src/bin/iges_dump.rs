//! Print the contents of an IGES file: Global section, entities, top-level
//! curves and read notifications.
//!
//! Usage: `iges_dump <file.igs> [spacing]`

use anyhow::Context;
use igesrust::{IgesReader, IgesReaderConfiguration};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        anyhow::bail!("usage: iges_dump <file.igs> [spacing]");
    };
    let spacing: Option<f64> = args
        .next()
        .map(|s| s.parse().with_context(|| format!("invalid spacing '{s}'")))
        .transpose()?;

    let config = IgesReaderConfiguration {
        failsafe: true,
        ..Default::default()
    };
    let doc = IgesReader::from_file(&path)
        .with_context(|| format!("failed to open {path}"))?
        .with_configuration(config)
        .read()
        .with_context(|| format!("failed to read {path}"))?;

    let global = &doc.global;
    println!("=== {path} ===");
    if !doc.start_section.is_empty() {
        println!("{}", doc.start_section);
    }
    println!(
        "  system: {}  units: {}  resolution: {}",
        global.sending_product_id.as_deref().unwrap_or("-"),
        global.units_name.as_deref().unwrap_or("-"),
        global.min_resolution.map_or("-".to_string(), |r| r.to_string()),
    );

    println!("\n--- Entities ({}) ---", doc.len());
    for (index, entity) in doc.entities().iter().enumerate() {
        let marker = if doc.is_absorbed(index) { " " } else { "*" };
        println!("{marker} {entity}");
    }

    println!("\n--- Curves ---");
    for index in doc.top_level_indices() {
        let Some(curve) = doc.curve(index) else {
            continue;
        };
        let sequence = doc.entities()[index].sequence();
        match curve.endpoints() {
            Some((start, end)) => println!(
                "  DE {sequence:<6} length {:>12.6}  {start} -> {end}{}",
                curve.length(),
                if curve.is_closed() { "  (closed)" } else { "" }
            ),
            None => println!("  DE {sequence:<6} empty"),
        }
        if let Some(dx) = spacing {
            for p in curve.arange(dx, true) {
                println!("      {p}");
            }
        }
    }

    if !doc.notifications.is_empty() {
        println!("\n--- Notifications ({}) ---", doc.notifications.len());
        for note in &doc.notifications {
            println!("  {note}");
        }
    }
    Ok(())
}
