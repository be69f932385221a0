//! Issuer registry command line interface
//!
//! Hosts a claim registry on a local sled database and runs one operation per
//! invocation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use issuer_crypto::KeyPair;
use issuer_registry::{ClaimRegistry, Invocation, Outcome};
use issuer_storage::{RegistryStore, SledStorage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod args;
mod settings;

use settings::Settings;

#[derive(Parser)]
#[command(name = "issuer-cli")]
#[command(about = "Issuer claim registry command line interface", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./issuer.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Owner public key (hex) override
    #[arg(long, global = true)]
    public_key: Option<String>,

    /// Log level override
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format override: pretty or compact
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new owner keypair
    Keygen {
        /// Output directory for keys
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Key name/prefix
        #[arg(short, long, default_value = "issuer")]
        name: String,
    },
    /// Run a registry operation
    Invoke {
        /// Operation name, e.g. RegisterSchema
        operation: String,

        /// Positional arguments (`hex:<hex>`, `bool:<bool>` or text)
        args: Vec<String>,

        /// Private key file used to sign the invocation
        #[arg(short, long)]
        key: Option<PathBuf>,
    },
    /// Show a registered schema
    Schema {
        /// Schema name
        name: String,
    },
    /// Show issuer identity
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    apply_overrides(&cli, &mut settings);
    settings.validate()?;
    init_logging(&settings)?;

    match cli.command {
        Commands::Keygen { output, name } => generate_keypair(&output, &name),
        Commands::Invoke {
            operation,
            args,
            key,
        } => run_invocation(&settings, operation, &args, key.as_deref()),
        Commands::Schema { name } => show_schema(&settings, &name),
        Commands::Info => show_info(&settings),
    }
}

fn apply_overrides(cli: &Cli, settings: &mut Settings) {
    if let Some(data_dir) = &cli.data_dir {
        settings.data_dir = data_dir.clone();
    }
    if let Some(public_key) = &cli.public_key {
        settings.public_key = Some(public_key.clone());
    }
    if let Some(log_level) = &cli.log_level {
        settings.log_level = log_level.clone();
    }
    if let Some(log_format) = &cli.log_format {
        settings.log_format = log_format.clone();
    }
}

fn init_logging(settings: &Settings) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    // Results go to stdout, so logs stay on stderr.
    if settings.log_format == "compact" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}

fn open_registry(settings: &Settings) -> Result<ClaimRegistry<SledStorage>> {
    let issuer = settings.issuer_config()?;
    let db_path = settings.db_path();
    fs::create_dir_all(&db_path)
        .with_context(|| format!("failed to create data directory {}", db_path.display()))?;
    let store = SledStorage::new(&db_path)
        .with_context(|| format!("failed to open registry store at {}", db_path.display()))?;

    info!(issuer = issuer.name(), owner = %issuer.owner(), "opened registry");
    Ok(ClaimRegistry::new(issuer, store))
}

fn load_keypair(path: &Path) -> Result<KeyPair> {
    let private_hex = fs::read_to_string(path)
        .with_context(|| format!("failed to read private key file {}", path.display()))?;
    KeyPair::from_secret_hex(&private_hex)
        .with_context(|| format!("invalid private key in {}", path.display()))
}

fn invoke_registry(
    settings: &Settings,
    operation: String,
    raw_args: &[String],
    key: Option<&Path>,
) -> Result<Outcome> {
    let registry = open_registry(settings)?;
    let mut invocation = Invocation::new(operation, args::parse_arguments(raw_args)?);
    if let Some(path) = key {
        invocation = invocation.signed_by(&load_keypair(path)?);
    }

    let outcome = registry.execute(&invocation);
    registry.store().flush()?;

    if let Some(response) = outcome.envelope().filter(|response| !response.success) {
        warn!(
            operation = %invocation.operation,
            payload = ?response.payload,
            "invocation failed"
        );
    }
    Ok(outcome)
}

fn run_invocation(
    settings: &Settings,
    operation: String,
    raw_args: &[String],
    key: Option<&Path>,
) -> Result<()> {
    let outcome = invoke_registry(settings, operation, raw_args, key)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn show_schema(settings: &Settings, name: &str) -> Result<()> {
    let registry = open_registry(settings)?;
    match registry.schema_record(name)? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => anyhow::bail!("schema '{name}' is not registered"),
    }
    Ok(())
}

fn show_info(settings: &Settings) -> Result<()> {
    let issuer = settings.issuer_config()?;
    let info = serde_json::json!({
        "name": issuer.name(),
        "public_key": issuer.public_key_hex(),
        "owner": issuer.owner(),
        "data_dir": settings.data_dir,
    });
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

struct KeyFiles {
    private_path: PathBuf,
    public_path: PathBuf,
    keypair: KeyPair,
}

fn write_keypair(output: &Path, name: &str) -> Result<KeyFiles> {
    let keypair = KeyPair::generate();

    let private_path = output.join(format!("{name}_private.key"));
    let public_path = output.join(format!("{name}_public.key"));

    fs::write(&private_path, hex::encode(keypair.secret_key()))
        .context("Failed to write private key")?;
    fs::write(&public_path, hex::encode(keypair.public_key()))
        .context("Failed to write public key")?;

    Ok(KeyFiles {
        private_path,
        public_path,
        keypair,
    })
}

fn generate_keypair(output: &Path, name: &str) -> Result<()> {
    let files = write_keypair(output, name)?;

    println!("Keypair generated");
    println!("  Private key: {}", files.private_path.display());
    println!("  Public key:  {}", files.public_path.display());
    println!("  Owner address: {}", files.keypair.address());
    println!(
        "Set ISSUER_PUBLIC_KEY={}",
        hex::encode(files.keypair.public_key())
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use issuer_registry::{Payload, Response};
    use tempfile::TempDir;

    fn settings_for(dir: &TempDir, owner: &KeyPair) -> Settings {
        Settings {
            name: "Test Registrar".to_string(),
            public_key: Some(hex::encode(owner.public_key())),
            data_dir: dir.path().join("data"),
            log_level: "info".to_string(),
            log_format: "compact".to_string(),
        }
    }

    fn call(settings: &Settings, operation: &str, values: &[&str], key: Option<&Path>) -> Outcome {
        let raw_args: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let outcome = invoke_registry(settings, operation.to_string(), &raw_args, key);
        outcome.unwrap()
    }

    fn success_true() -> Outcome {
        Outcome::Envelope(Response::ok(Payload::Bool(true)))
    }

    #[test]
    fn test_keygen_writes_matching_key_files() {
        let dir = TempDir::new().unwrap();
        let files = write_keypair(dir.path(), "registrar").unwrap();

        assert_eq!(
            files.private_path,
            dir.path().join("registrar_private.key")
        );
        let loaded = load_keypair(&files.private_path).unwrap();
        assert_eq!(loaded.public_key(), files.keypair.public_key());

        let public_hex = fs::read_to_string(&files.public_path).unwrap();
        assert_eq!(public_hex, hex::encode(files.keypair.public_key()));
    }

    #[test]
    fn test_signed_and_unsigned_invocations() {
        let dir = TempDir::new().unwrap();
        let files = write_keypair(dir.path(), "owner").unwrap();
        let settings = settings_for(&dir, &files.keypair);
        let key = Some(files.private_path.as_path());

        let schema = ["diploma", "degree:string", "bool:true"];
        let registered = call(&settings, "RegisterSchema", &schema, key);
        assert_eq!(registered, success_true());

        let unsigned = call(&settings, "InjectClaim", &["claim-1"], None);
        let expected = Payload::Text("Only SmartContract owner can call this operation".into());
        assert_eq!(
            unsigned,
            Outcome::Envelope(Response {
                success: false,
                payload: expected,
            })
        );
        let valid = call(&settings, "IsValidClaim", &["claim-1"], None);
        assert_eq!(valid, Outcome::Bare(false));

        let signed = call(&settings, "InjectClaim", &["claim-1"], key);
        assert_eq!(signed, success_true());
        let valid = call(&settings, "IsValidClaim", &["claim-1"], None);
        assert_eq!(valid, Outcome::Bare(true));

        let details = call(&settings, "GetSchemaDetails", &["diploma"], None);
        assert_eq!(
            details,
            Outcome::Envelope(Response::ok(Payload::Text("degree:string".into())))
        );
    }

    #[test]
    fn test_other_key_is_not_owner() {
        let dir = TempDir::new().unwrap();
        let owner = write_keypair(dir.path(), "owner").unwrap();
        let other = write_keypair(dir.path(), "other").unwrap();
        let settings = settings_for(&dir, &owner.keypair);

        let key = Some(other.private_path.as_path());
        let outcome = call(&settings, "InjectClaim", &["claim-1"], key);
        assert!(!outcome.envelope().expect("envelope").success);

        let valid = call(&settings, "IsValidClaim", &["claim-1"], None);
        assert_eq!(valid, Outcome::Bare(false));
    }

    #[test]
    fn test_missing_public_key_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut settings = settings_for(&dir, &KeyPair::from_secret(&[7u8; 32]));
        settings.public_key = None;

        let result = invoke_registry(&settings, "Name".to_string(), &[], None);
        assert!(result.is_err());
    }
}
