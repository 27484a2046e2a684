//! Example demonstrating configuration loading
//!
//! This example shows:
//! 1. Loading configuration from artpath.toml (or the environment)
//! 2. Loading an explicit config file with `${VAR}` references
//! 3. Building a session from the loaded configuration
//!
//! Run:
//! ```bash
//! ARTIFACTORY_URL=https://example.jfrog.io/artifactory \
//! ARTIFACTORY_TOKEN=... cargo run --example config_usage
//! ```

use anyhow::Result;
use artpath::{ArtConfig, ArtifactoryPath};

const SAMPLE_CONFIG: &str = r#"
[server]
base_uri = "https://example.jfrog.io/artifactory/"

[auth]
type = "api_key"
location = "header"
key = "${ARTPATH_DEMO_KEY}"

[http]
timeout_secs = 10
user_agent = "config-usage-demo"

[http.headers]
X-Request-Source = "demo"

[observability]
json_logs = false
log_filter = "artpath=debug"
"#;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== artpath Configuration Demo ===\n");

    println!("1. Loading default configuration...");
    let config = ArtConfig::load()?;
    match config.base_uri() {
        Ok(uri) => println!("   Server: {uri}"),
        Err(e) => println!("   No server configured:\n{e}"),
    }
    println!("   Auth method: {}", config.auth.method());
    println!("   Timeout: {}s", config.http.timeout_secs);

    println!("\n2. Loading an explicit config file...");
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("artpath.toml");
    std::fs::write(&path, SAMPLE_CONFIG)?;

    let config = ArtConfig::load_from(&path)?;
    println!("   Server: {}", config.base_uri()?);
    println!("   Auth method: {}", config.auth.method());
    println!("   Extra headers: {:?}", config.http.headers);
    println!("   Log filter: {}", config.observability.log_filter);

    println!("\n3. Building a session...");
    let session = config.session()?;
    let repo = ArtifactoryPath::new(["/libs-release"], config.base_uri()?).with_session(session);
    println!("   {repo:?}");
    println!("   Download URI: {}", repo.as_uri()?);
    println!("   Storage URI: {}", repo.storage_uri()?);

    println!("\n=== Demo Complete ===");
    Ok(())
}
