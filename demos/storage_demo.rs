/// Storage engine demonstration
///
/// This example demonstrates:
/// 1. Creating in-memory and RocksDB-backed vertex stores
/// 2. Creating, querying, updating and deleting vertices
/// 3. Using transactions, including rollback

use serde_json::json;
use tempfile::TempDir;
use vertexdb::{MemoryStorage, RocksDbStorage, VertexQuery, VertexStorage, VertexTransaction};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Vertex Store Demonstration ===\n");

    println!("1. In-Memory Store");
    println!("{}", "-".repeat(50));
    let storage = MemoryStorage::new();

    let alice = storage
        .create_vertex("Person", json!({
            "name": "Alice",
            "age": 30,
        }))
        .await?;
    println!("Created vertex: {} ({})", alice.id, alice.label);

    let bob = storage
        .create_vertex("Person", json!({
            "name": "Bob",
            "age": 25,
        }))
        .await?;
    println!("Created vertex: {} ({})", bob.id, bob.label);

    let found = storage
        .get_vertices(&VertexQuery::vertices([alice.id, bob.id]))
        .await?;
    println!("Query by id set returned {} vertices\n", found.len());

    println!("2. Transactions");
    println!("{}", "-".repeat(50));

    let mut tx = storage.begin_transaction().await?;
    let carol = tx.create_vertex("Person", json!({"name": "Carol"})).await?;
    println!("Created {} inside an open transaction", carol.id);
    println!(
        "Visible inside the transaction: {}",
        tx.get_vertex(carol.id).await?.is_some()
    );
    println!(
        "Visible outside before commit: {}",
        storage.get_vertex(carol.id).await?.is_some()
    );
    tx.commit().await?;
    println!(
        "Visible outside after commit: {}\n",
        storage.get_vertex(carol.id).await?.is_some()
    );

    let mut tx = storage.begin_transaction().await?;
    let ghost = tx.create_vertex("Person", json!({"name": "Ghost"})).await?;
    tx.rollback().await?;
    println!(
        "Rolled-back vertex {} visible: {}\n",
        ghost.id,
        storage.get_vertex(ghost.id).await?.is_some()
    );

    println!("3. RocksDB-Backed Store");
    println!("{}", "-".repeat(50));
    let temp_dir = TempDir::new()?;
    let storage = RocksDbStorage::new(temp_dir.path(), "demo_graph")?;

    let acme = storage
        .create_vertex("Company", json!({"name": "ACME"}))
        .await?;
    println!("Created vertex: {} ({})", acme.id, acme.label);

    storage
        .update_vertex(acme.id, json!({"name": "ACME", "founded": 1947}))
        .await?;
    let updated = storage.get_vertex(acme.id).await?.unwrap();
    println!("Updated properties: {}", updated.properties);

    storage.delete_vertex(acme.id).await?;
    let found = storage
        .get_vertices(&VertexQuery::vertices([acme.id]))
        .await?;
    println!("After delete, query returned {} vertices", found.len());

    println!("\nDone.");
    Ok(())
}
