use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbBackend};
use sea_orm_migration::MigratorTrait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use customers::{
    config::CustomersConfig,
    contract::{
        client::CustomersApi,
        error::CustomersError,
        model::{Customer, EditCustomerCommand, Gender},
    },
    domain::service::Service,
    gateways::local::CustomersLocalClient,
    infra::hashing::LegacySha256Hasher,
    infra::storage::{migrations::Migrator, SeaOrmCustomersRepository},
};

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    // Rebuild DSN with absolute path and normalized slashes
    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    } else {
        // create the database file on first use
        out.push_str("?mode=rwc");
    }
    Ok(out)
}

/// Shopcore Admin - customer administration for the Shopcore backend
#[derive(Parser)]
#[command(name = "shopcore-admin")]
#[command(about = "Shopcore Admin - customer administration for the Shopcore backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a customer
    Get {
        /// Customer id
        id: Uuid,
    },
    /// Apply a sparse edit to a customer; omitted flags leave fields unchanged
    Edit(EditArgs),
    /// Check configuration
    Check,
}

#[derive(Args)]
struct EditArgs {
    /// Customer id
    id: Uuid,

    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    /// One of: male, female, diverse
    #[arg(long)]
    gender: Option<String>,
    /// Plain-text password; stored only as a hash
    #[arg(long)]
    password: Option<String>,
    /// ISO date, e.g. 1990-05-17
    #[arg(long)]
    birthday: Option<NaiveDate>,
    #[arg(long)]
    enabled: Option<bool>,
    #[arg(long)]
    newsletter: Option<bool>,
    #[arg(long)]
    partner_offers: Option<bool>,
    /// Comma-separated group ids, e.g. --group-ids 1,2
    #[arg(long, value_delimiter = ',')]
    group_ids: Option<Vec<i64>>,
    #[arg(long)]
    default_group_id: Option<i64>,

    // B2B block
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    tax_id: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    credit_terms: Option<String>,
    #[arg(long)]
    risk_class: Option<String>,
}

impl EditArgs {
    fn into_command(self) -> Result<EditCustomerCommand> {
        let gender = self
            .gender
            .map(|g| {
                Gender::parse(&g)
                    .ok_or_else(|| anyhow!("Unknown gender '{}' (male, female, diverse)", g))
            })
            .transpose()?;

        Ok(EditCustomerCommand {
            customer_id: self.id,
            gender,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            birthday: self.birthday,
            enabled: self.enabled,
            partner_offers: self.partner_offers,
            newsletter: self.newsletter,
            group_ids: self.group_ids.map(|ids| ids.into_iter().collect()),
            default_group_id: self.default_group_id,
            company: self.company,
            tax_id: self.tax_id,
            website: self.website,
            credit_terms: self.credit_terms,
            risk_class: self.risk_class,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (verbosity)
    config.apply_cli_overrides(&args);

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.app.home_dir));
    tracing::info!("Shopcore admin starting");

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command {
        Commands::Check => check_config(config),
        Commands::Get { id } => {
            let client = build_client(&config).await?;
            match client.get_customer(id).await {
                Ok(customer) => {
                    print_customer(&customer);
                    Ok(())
                }
                Err(err) => Err(anyhow!("{}", describe_failure(&err))),
            }
        }
        Commands::Edit(edit) => {
            let client = build_client(&config).await?;
            let command = edit.into_command()?;
            match client.edit_customer(command).await {
                Ok(customer) => {
                    println!("Customer updated");
                    print_customer(&customer);
                    Ok(())
                }
                Err(err) => Err(anyhow!("{}", describe_failure(&err))),
            }
        }
    }
}

/// Wire database, repository, hasher and domain service into the contract client.
async fn build_client(config: &AppConfig) -> Result<Arc<dyn CustomersApi>> {
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("Database is not configured"))?;

    let mut dsn = db_config.url.trim().to_string();
    if dsn.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    // Absolutize sqlite DSNs to avoid cwd issues
    if dsn.starts_with("sqlite:") {
        dsn = absolutize_sqlite_dsn(&dsn, Path::new(&config.app.home_dir), true)?;
    }

    let mut opts = ConnectOptions::new(dsn.clone());
    if let Some(max_conns) = db_config.max_conns {
        opts.max_connections(max_conns);
    }
    opts.acquire_timeout(Duration::from_secs(5));

    tracing::info!("Connecting to database: {}", dsn);
    let db = Database::connect(opts).await?;

    if db.get_database_backend() == DbBackend::Sqlite {
        if let Some(ms) = db_config.busy_timeout_ms {
            use sea_orm::ConnectionTrait;
            db.execute_unprepared(&format!("PRAGMA busy_timeout = {}", ms))
                .await?;
        }
    }

    Migrator::up(&db, None).await?;

    let customers_config =
        CustomersConfig::from_module_value(config.module_config("customers"))?;
    let repo = Arc::new(SeaOrmCustomersRepository::new(db));
    let service = Arc::new(Service::new(
        repo,
        Arc::new(LegacySha256Hasher),
        customers_config.into(),
    ));

    Ok(Arc::new(CustomersLocalClient::new(service)))
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // AppConfig::load_* already normalized & created home_dir; make sure the
    // customers module section parses too.
    CustomersConfig::from_module_value(config.module_config("customers"))?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);

    Ok(())
}

/// One distinct message per failure kind; storage details stay in the logs.
fn describe_failure(err: &anyhow::Error) -> String {
    match err.downcast_ref::<CustomersError>() {
        Some(CustomersError::NotFound { id }) => format!("No customer with id {}", id),
        Some(CustomersError::EmailConflict { email }) => format!(
            "Email '{}' is already used by another registered customer",
            email
        ),
        Some(CustomersError::InvalidDefaultGroup { group_id }) => format!(
            "Default group {} must be one of the assigned groups",
            group_id
        ),
        Some(CustomersError::MissingField { field }) => {
            format!("Required field '{}' must not be empty", field)
        }
        Some(CustomersError::Validation { message }) => format!("Validation failed: {}", message),
        Some(CustomersError::Internal) => "Internal error, see logs for details".to_string(),
        None => err.to_string(),
    }
}

fn print_customer(customer: &Customer) {
    println!("id:               {}", customer.id);
    println!(
        "type:             {}",
        customer.customer_type().as_str()
    );
    println!("email:            {}", customer.email);
    println!("name:             {} {}", customer.first_name, customer.last_name);
    println!(
        "gender:           {}",
        customer.gender.map(|g| g.as_str()).unwrap_or("-")
    );
    println!(
        "birthday:         {}",
        customer
            .birthday
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("enabled:          {}", customer.enabled);
    println!("newsletter:       {}", customer.newsletter);
    println!("partner offers:   {}", customer.partner_offers);
    println!(
        "groups:           {:?} (default: {})",
        customer.group_ids.iter().collect::<Vec<_>>(),
        customer.default_group_id
    );
    if !customer.business.company.is_empty() {
        println!("company:          {}", customer.business.company);
    }
    if !customer.business.tax_id.is_empty() {
        println!("tax id:           {}", customer.business.tax_id);
    }
    if !customer.business.website.is_empty() {
        println!("website:          {}", customer.business.website);
    }
    if !customer.business.credit_terms.is_empty() {
        println!("credit terms:     {}", customer.business.credit_terms);
    }
    if !customer.business.risk_class.is_empty() {
        println!("risk class:       {}", customer.business.risk_class);
    }
}
