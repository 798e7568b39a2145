use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;
use vendor_performance::{
    config::{self, AppConfig},
    db::{self, DbPool},
    services::{NewVendor, VendorService},
    PerformanceMetrics,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize().await?;

    match cli.command {
        Commands::Migrate => {
            db::run_migrations(&context.db)
                .await
                .context("failed to run migrations")?;
            println!("Migrations applied");
        }
        Commands::Vendors(command) => handle_vendors_command(&context, command, cli.json).await?,
        Commands::Metrics(target) => {
            let metrics = context
                .vendor_service()
                .compute_metrics(target.vendor_id)
                .await
                .context("failed to compute vendor metrics")?;
            if cli.json {
                print_json(&metrics)?;
            } else {
                print_metrics(&metrics);
            }
        }
        Commands::Refresh(target) => {
            let vendor = context
                .vendor_service()
                .refresh_metrics(target.vendor_id)
                .await
                .context("failed to refresh vendor metrics")?;
            if cli.json {
                print_json(&vendor)?;
            } else {
                println!("Refreshed cached metrics for {} ({})", vendor, vendor.id);
                print_metrics(&vendor.cached_metrics());
            }
        }
        Commands::Snapshot(target) => {
            let service = context.vendor_service();
            let snapshot = service
                .record_snapshot(target.vendor_id)
                .await
                .context("failed to record performance snapshot")?;
            if cli.json {
                print_json(&snapshot)?;
            } else {
                println!("Recorded snapshot {} at {}", snapshot.id, snapshot.history_date);
                print_metrics(&snapshot.metrics());
            }
        }
        Commands::History(args) => {
            let service = context.vendor_service();
            let vendor = service
                .get_vendor(args.vendor_id)
                .await?
                .with_context(|| format!("vendor {} not found", args.vendor_id))?;
            let history = service
                .performance_history(args.vendor_id, Some(args.limit))
                .await
                .context("failed to load performance history")?;
            if cli.json {
                print_json(&history)?;
            } else if history.is_empty() {
                println!("No snapshots recorded for {}", vendor);
            } else {
                for snapshot in &history {
                    let m = snapshot.metrics();
                    println!(
                        "{}  on_time={:.2} quality={} fulfillment={:.2} response_secs={:.2}",
                        snapshot.describe(&vendor),
                        m.on_time_delivery_rate,
                        m.quality_rating_avg,
                        m.fulfillment_rate,
                        m.average_response_time
                    );
                }
            }
        }
    }

    Ok(())
}

async fn handle_vendors_command(
    context: &CliContext,
    command: VendorsCommands,
    json: bool,
) -> Result<()> {
    let service = context.vendor_service();

    match command {
        VendorsCommands::Create(args) => {
            let vendor = service
                .create_vendor(NewVendor {
                    name: args.name,
                    contact_details: args.contact_details,
                    address: args.address,
                })
                .await
                .context("failed to create vendor")?;
            if json {
                print_json(&vendor)?;
            } else {
                println!(
                    "Created vendor {} (id {}, code {})",
                    vendor, vendor.id, vendor.vendor_code
                );
            }
        }
        VendorsCommands::List(args) => {
            let vendors = service
                .list_vendors(args.limit, args.offset)
                .await
                .context("failed to list vendors")?;
            if json {
                print_json(&vendors)?;
            } else {
                for vendor in &vendors {
                    println!("{}  {}  {}", vendor.id, vendor.vendor_code, vendor);
                }
            }
        }
        VendorsCommands::Show(target) => {
            let vendor = service
                .get_vendor(target.vendor_id)
                .await?
                .with_context(|| format!("vendor {} not found", target.vendor_id))?;
            if json {
                print_json(&vendor)?;
            } else {
                println!("{} ({})", vendor, vendor.absolute_url());
                println!("  code:    {}", vendor.vendor_code);
                println!("  contact: {}", vendor.contact_details);
                println!("  address: {}", vendor.address);
                print_metrics(&vendor.cached_metrics());
            }
        }
        VendorsCommands::Delete(target) => {
            service
                .delete_vendor(target.vendor_id)
                .await
                .context("failed to delete vendor")?;
            println!("Deleted vendor {}", target.vendor_id);
        }
    }

    Ok(())
}

fn print_metrics(metrics: &PerformanceMetrics) {
    println!("  on-time delivery rate: {:.2}", metrics.on_time_delivery_rate);
    println!("  quality rating avg:    {}", metrics.quality_rating_avg);
    println!("  fulfillment rate:      {:.2}", metrics.fulfillment_rate);
    println!("  avg response time (s): {:.2}", metrics.average_response_time);
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

struct CliContext {
    db: Arc<DbPool>,
    config: AppConfig,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load configuration")?;
        config::init_tracing(config.log_level(), config.log_json);

        let db = db::establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to database")?;
        if config.auto_migrate {
            db::run_migrations(&db)
                .await
                .context("failed to run migrations")?;
        }

        Ok(Self {
            db: Arc::new(db),
            config,
        })
    }

    fn vendor_service(&self) -> VendorService {
        VendorService::new(self.db.clone(), &self.config)
    }
}

#[derive(Parser)]
#[command(name = "vendor-perf", about = "Vendor records and performance metrics", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    #[command(subcommand)]
    Vendors(VendorsCommands),
    /// Compute a vendor's metrics without storing them
    Metrics(VendorTarget),
    /// Recompute and store a vendor's cached metrics
    Refresh(VendorTarget),
    /// Recompute a vendor's metrics and append them to its history
    Snapshot(VendorTarget),
    /// Show a vendor's performance history, newest first
    History(HistoryArgs),
}

#[derive(Subcommand)]
enum VendorsCommands {
    Create(CreateVendorArgs),
    List(ListVendorsArgs),
    Show(VendorTarget),
    Delete(VendorTarget),
}

#[derive(Args)]
struct VendorTarget {
    #[arg(value_name = "VENDOR_ID")]
    vendor_id: Uuid,
}

#[derive(Args)]
struct CreateVendorArgs {
    #[arg(long)]
    name: String,
    #[arg(long = "contact")]
    contact_details: String,
    #[arg(long)]
    address: String,
}

#[derive(Args)]
struct ListVendorsArgs {
    #[arg(long, default_value_t = 50)]
    limit: u64,
    #[arg(long, default_value_t = 0)]
    offset: u64,
}

#[derive(Args)]
struct HistoryArgs {
    #[arg(value_name = "VENDOR_ID")]
    vendor_id: Uuid,
    #[arg(long, default_value_t = 20)]
    limit: u64,
}
