//! Pointflow - Member Points Transfer Service
//!
//! Entry point. Boot sequence:
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────────┐    ┌──────────┐
//! │  Config  │───▶│  Store   │───▶│ Orchestrator │───▶│ Gateway  │
//! │  (YAML)  │    │ (mem/pg) │    │ (pair locks) │    │  (HTTP)  │
//! └──────────┘    └──────────┘    └──────────────┘    └──────────┘
//! ```

use std::process::exit;
use std::sync::Arc;

use pointflow::account::Account;
use pointflow::config::{AppConfig, StoreBackend};
use pointflow::gateway::{self, state::AppState};
use pointflow::store::{MemoryStore, PgStore, Store};
use pointflow::transfer::{TransferOrchestrator, UuidKeyGenerator};

// ============================================================
// COMMAND LINE
// ============================================================

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

// ============================================================
// DEMO DATA
// ============================================================

/// Demo member accounts: (id, points, is_active).
/// Account 4 is inactive so the rejection paths can be exercised by hand.
const DEMO_ACCOUNTS: [(i64, i64, bool); 5] = [
    (1, 15_420, true),
    (2, 28_750, true),
    (3, 5_680, true),
    (4, 1_200, false),
    (5, 12_890, true),
];

/// Load the demo accounts unless the store already has them.
async fn seed_demo_accounts(store: &dyn Store) {
    match store.find_account(DEMO_ACCOUNTS[0].0).await {
        Ok(Some(_)) => {
            tracing::info!("Demo accounts already present, skipping seed");
            return;
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("❌ FATAL: Failed to check for demo accounts: {}", e);
            exit(1);
        }
    }

    for (id, points, is_active) in DEMO_ACCOUNTS {
        let mut account = Account::new(id, points);
        account.is_active = is_active;
        if let Err(e) = store.save_account(account).await {
            eprintln!("❌ FATAL: Failed to seed account {}: {}", id, e);
            exit(1);
        }
    }
    tracing::info!(count = DEMO_ACCOUNTS.len(), "Seeded demo accounts");
}

// ============================================================
// MAIN
// ============================================================

#[tokio::main]
async fn main() {
    let env = get_env();
    let app_config = AppConfig::load(&env);
    let _log_guard = pointflow::logging::init_logging(&app_config);

    tracing::info!("Starting Pointflow in {} mode", env);
    println!("=== Pointflow: Member Points Transfer Service ===");

    // Build the configured store backend
    let store: Arc<dyn Store> = match app_config.store.backend {
        StoreBackend::Memory => {
            println!("💾 Store backend: in-memory");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let url = match app_config.store.postgres_url.as_deref() {
                Some(url) => url,
                None => {
                    eprintln!("❌ FATAL: store.backend is postgres but store.postgres_url is not set");
                    exit(1);
                }
            };
            println!("💾 Store backend: PostgreSQL");
            let pg = match PgStore::connect(url).await {
                Ok(pg) => pg,
                Err(e) => {
                    eprintln!("❌ FATAL: Failed to connect to PostgreSQL: {}", e);
                    exit(1);
                }
            };
            if let Err(e) = pg.init_schema().await {
                eprintln!("❌ FATAL: Failed to initialize database schema: {}", e);
                exit(1);
            }
            Arc::new(pg)
        }
    };

    if app_config.store.seed_demo_accounts {
        seed_demo_accounts(store.as_ref()).await;
    }

    // Orchestrator with server-minted idempotency keys
    let orchestrator = Arc::new(TransferOrchestrator::new(
        store.clone(),
        Arc::new(UuidKeyGenerator),
    ));

    let state = Arc::new(AppState::new(orchestrator, store));

    // Allow --port to override the YAML value
    let port = get_port_override().unwrap_or(app_config.gateway.port);

    gateway::run_server(state, &app_config.gateway.host, port).await;
}
