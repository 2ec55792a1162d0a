/// Harmony Server - playlist and streaming API
use clap::{Parser, Subcommand};
use harmony_core::types::CreateUser;
use harmony_server::{
    config::ServerConfig,
    create_router,
    services::{AuthService, FileStorage},
    state::AppState,
};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "harmony-server")]
#[command(about = "Harmony playlist and streaming server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "HARMONY_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Email address (used to log in)
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "harmony_server=info,harmony_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => serve(&cli.config).await?,
        Commands::AddUser {
            username,
            email,
            password,
        } => add_user(&cli.config, username, email, &password).await?,
        Commands::ListUsers => list_users(&cli.config).await?,
    }

    Ok(())
}

async fn serve(config_path: &Path) -> anyhow::Result<()> {
    let config = ServerConfig::load_from(config_path)?;
    config.validate()?;

    tracing::info!("Starting Harmony Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let pool = harmony_storage::connect(&config.storage.database_url).await?;
    tracing::info!("Database connected");

    let file_storage = FileStorage::new(config.storage.media_path.clone());
    file_storage.initialize().await?;
    tracing::info!(path = %config.storage.media_path.display(), "File storage initialized");

    let auth_service = Arc::new(auth_service(&config));

    let app_state = AppState::new(pool, auth_service, Arc::new(file_storage));
    let app = create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.jwt_refresh_expiration_days,
    )
}

async fn add_user(
    config_path: &Path,
    username: String,
    email: String,
    password: &str,
) -> anyhow::Result<()> {
    let config = ServerConfig::load_from(config_path)?;
    let pool = harmony_storage::connect(&config.storage.database_url).await?;

    let password_hash = auth_service(&config).hash_password(password)?;
    let user = harmony_storage::users::create(
        &pool,
        CreateUser {
            username,
            email,
            password_hash,
        },
    )
    .await?;

    println!("Created user {} ({}) with id {}", user.username, user.email, user.id);

    Ok(())
}

async fn list_users(config_path: &Path) -> anyhow::Result<()> {
    let config = ServerConfig::load_from(config_path)?;
    let pool = harmony_storage::connect(&config.storage.database_url).await?;

    let users = harmony_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} <{}>", user.id, user.username, user.email);
    }

    Ok(())
}
