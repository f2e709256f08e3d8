//! Bank record commands: show, add, remove.
//!
//! Mutations follow the store's wholesale model: `add` appends one
//! arity-checked record, `remove` reads everything and rewrites the file
//! without the matching rows.

use careerbank_core::{CollectionKind, CollectionStore};

/// Prints the records of a collection.
pub fn show(store: &CollectionStore, collection: &str) -> Result<(), Box<dyn std::error::Error>> {
    let spec = store.registry().spec_for(collection)?;

    println!("{}", "-".repeat(30));
    match spec.kind {
        CollectionKind::Tabular => {
            let layout = store.read_layout(collection)?;
            let rows = store.read_all(collection)?;

            println!("{}", layout.join(", "));
            for row in &rows {
                println!("{}", row.join(", "));
            }
            println!("{}", "-".repeat(30));
            println!("{} record(s)", rows.len());
        }
        CollectionKind::Structured => {
            let object = store.read_object(collection)?;
            for (key, value) in &object {
                match value.as_str() {
                    Some(text) => println!("{key}: {text}"),
                    None => println!("{key}: {value}"),
                }
            }
            println!("{}", "-".repeat(30));
        }
    }

    Ok(())
}

/// Appends one record to a tabular collection.
pub fn add(
    store: &CollectionStore,
    collection: &str,
    values: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    store.append(collection, values)?;
    println!("✓ Added record to {collection}");
    Ok(())
}

/// Removes records whose first field equals `key`, rewriting wholesale.
pub fn remove(
    store: &CollectionStore,
    collection: &str,
    key: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows = store.read_all(collection)?;
    let kept: Vec<Vec<String>> = rows
        .iter()
        .filter(|row| row.first().map(String::as_str) != Some(key))
        .cloned()
        .collect();

    let removed = rows.len() - kept.len();
    if removed == 0 {
        println!("No records in {collection} match {key:?}");
        return Ok(());
    }

    store.replace_all(collection, &kept)?;
    println!("✓ Removed {removed} record(s) from {collection}");
    Ok(())
}
