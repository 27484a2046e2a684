//! Example browsing a repository with `ArtifactoryPath`
//!
//! Run against a server:
//! ```bash
//! cargo run --example browse -- https://example.jfrog.io/artifactory/libs-release
//! ```

use artpath::telemetry::{TelemetryOptions, init_telemetry};
use artpath::{ArtConfig, ArtifactoryPath, Status};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_telemetry(&TelemetryOptions::default())?;

    let uri = std::env::args()
        .nth(1)
        .ok_or("usage: browse <https://host/artifactory/repo/...>")?;

    let session = ArtConfig::from_env().session()?;
    let root = ArtifactoryPath::from_uri(&uri)?.with_session(session);

    println!("=== Browsing {root:?} ===\n");

    println!("1. Status:");
    match root.stat().await? {
        Status::File(file) => {
            println!("  file, {} bytes, sha256 {:?}", file.size, file.sha256);
            return Ok(());
        }
        Status::Directory(dir) => {
            println!("  folder with {} entries", dir.children.len());
            if let Some(modified) = dir.modified {
                println!("  last modified {modified}");
            }
        }
    }

    println!("\n2. Listing:");
    for child in root.iterdir().await? {
        let marker = if child.is_dir().await? { "/" } else { "" };
        println!("  {}{marker}", child.name());
    }

    println!("\n3. Tree (top-down):");
    for entry in root.walk(true).await? {
        println!(
            "  {} ({} folders, {} files)",
            entry.dir,
            entry.dirnames.len(),
            entry.filenames.len()
        );
    }

    println!("\n4. POM files:");
    for pom in root.glob("**/*.pom").await? {
        let head = pom.read_range(0, 64).await?;
        println!("  {pom}: {:?}...", String::from_utf8_lossy(&head));
    }

    Ok(())
}
