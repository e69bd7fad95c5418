use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use storefront::application::orders::OrderService;
use storefront::application::promos::PromoService;
use storefront::config::{
    DEFAULT_CURRENCY, DEFAULT_PAYMENT_API_BASE, DEFAULT_SITE_URL, DEFAULT_STORE_NAME,
    DEFAULT_VOUCHER_PREFIX, PaymentConfig, ServerConfig, Settings,
};
use storefront::domain::ports::{
    ClockRef, NotifierRef, OrderRepository, OrderRepositoryBox, PaymentProcessorRef,
    PromoRepositoryBox,
};
use storefront::infrastructure::clock::SystemClock;
use storefront::infrastructure::in_memory::{InMemoryOrderRepository, InMemoryPromoRepository};
use storefront::infrastructure::notifier::LogNotifier;
use storefront::infrastructure::stripe::HttpPaymentProcessor;
use storefront::interfaces::csv::order_report::OrderReportWriter;
use storefront::interfaces::http::{self, AppContext};
use storefront::interfaces::seed::Seed;
use storefront::telemetry;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true, env = "STOREFRONT_DB_PATH")]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Print every stored order as CSV
    Report,
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long, env = "STOREFRONT_BIND", default_value = "127.0.0.1:1337")]
    bind: SocketAddr,

    /// JSON file with products, giftcards and users
    #[arg(long, env = "STOREFRONT_SEED")]
    seed: PathBuf,

    #[arg(long, env = "PAYMENT_API_BASE", default_value = DEFAULT_PAYMENT_API_BASE)]
    payment_api_base: String,

    #[arg(long, env = "PAYMENT_SECRET_KEY", hide_env_values = true)]
    payment_secret_key: String,

    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = DEFAULT_CURRENCY)]
    currency: String,

    /// Reported to the processor when a request has no Origin header
    #[arg(long, env = "STOREFRONT_SITE_URL", default_value = DEFAULT_SITE_URL)]
    site_url: String,

    #[arg(long, env = "STOREFRONT_NAME", default_value = DEFAULT_STORE_NAME)]
    store_name: String,

    #[arg(long, env = "STOREFRONT_VOUCHER_PREFIX", default_value = DEFAULT_VOUCHER_PREFIX)]
    voucher_prefix: String,
}

impl ServeArgs {
    fn config(&self) -> ServerConfig {
        ServerConfig {
            bind: self.bind,
            settings: Settings {
                currency: self.currency.clone(),
                site_url: self.site_url.clone(),
                store_name: self.store_name.clone(),
                voucher_prefix: self.voucher_prefix.clone(),
            },
            payment: PaymentConfig {
                api_base: self.payment_api_base.clone(),
                secret_key: self.payment_secret_key.clone(),
            },
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<PathBuf>) -> Result<(OrderRepositoryBox, PromoRepositoryBox)> {
    use storefront::infrastructure::rocksdb::RocksDBStore;

    if let Some(db_path) = db_path {
        let store = RocksDBStore::open(&db_path).into_diagnostic()?;
        info!(path = %db_path.display(), "Using RocksDB storage");
        return Ok((Box::new(store.clone()), Box::new(store)));
    }
    Ok(in_memory_stores())
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<PathBuf>) -> Result<(OrderRepositoryBox, PromoRepositoryBox)> {
    if db_path.is_some() {
        miette::bail!("--db-path requires a build with the `storage-rocksdb` feature");
    }
    Ok(in_memory_stores())
}

fn in_memory_stores() -> (OrderRepositoryBox, PromoRepositoryBox) {
    info!("Using in-memory storage");
    (
        Box::new(InMemoryOrderRepository::new()),
        Box::new(InMemoryPromoRepository::new()),
    )
}

async fn serve(args: ServeArgs, db_path: Option<PathBuf>) -> Result<()> {
    let config = args.config();
    let seed = Seed::load(&args.seed).into_diagnostic()?;
    info!(
        products = seed.products.len(),
        giftcards = seed.giftcards.len(),
        users = seed.users.len(),
        "Loaded seed data"
    );

    let (orders, promos) = open_stores(db_path)?;
    let payments: PaymentProcessorRef = Arc::new(HttpPaymentProcessor::new(config.payment));
    let notifier: NotifierRef = Arc::new(LogNotifier);
    let clock: ClockRef = Arc::new(SystemClock);

    let state = Arc::new(AppContext {
        orders: OrderService::new(
            orders,
            Box::new(seed.product_catalog()),
            payments.clone(),
            notifier.clone(),
            clock.clone(),
            config.settings.clone(),
        ),
        promos: PromoService::new(
            promos,
            Box::new(seed.giftcard_catalog()),
            payments,
            notifier,
            clock,
            config.settings,
        ),
        users: Box::new(seed.user_directory()),
    });

    http::serve(config.bind, state).await.into_diagnostic()
}

async fn report(db_path: Option<PathBuf>) -> Result<()> {
    let (orders, _) = open_stores(db_path)?;
    let mut orders = orders.all().await.into_diagnostic()?;
    orders.sort_by_key(|order| order.id);

    let stdout = io::stdout();
    let mut writer = OrderReportWriter::new(stdout.lock());
    writer.write_orders(orders).into_diagnostic()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args, cli.db_path).await,
        Command::Report => report(cli.db_path).await,
    }
}
