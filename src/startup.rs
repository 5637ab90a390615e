use std::net::TcpListener;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, dev::Server, web, App, HttpServer};
use anyhow::Context;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use secrecy::ExposeSecret;
use tracing_actix_web::TracingLogger;

use crate::{configuration::{SessionSettings, Settings}, routes::{add_item, add_vendor, create_items_order, health_check, json_error_handler, list_all_orders, list_items, list_orders, list_vendors, login, logout, place_order, signup}, session_state::RequireLogin, utils::{get_connection_pool, DbPool}};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    pub async fn new(settings: Settings) -> Result<Self, anyhow::Error>{
        let pool = get_connection_pool(&settings.database)
            .context("Failed to build connection pool")?;
        run_migrations(&pool)?;

        let listener = TcpListener::bind((settings.application.host.as_str(), settings.application.port))
            .context("Failed to bind listener")?;
        let port = listener.local_addr()?.port();

        let server = run(listener, pool, &settings.session)?;

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error>{
        self.server.await
    }
}

#[tracing::instrument(
    "Running pending migrations",
    skip_all
)]
pub fn run_migrations(pool: &DbPool) -> Result<(), anyhow::Error>{
    let mut conn = pool.get()
        .context("Failed to get connection to run migrations")?;

    let applied = conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    tracing::info!(count = applied.len(), "Applied pending migrations");
    Ok(())
}

fn session_key(settings: &SessionSettings) -> Result<Key, anyhow::Error>{
    Key::try_from(settings.secret_key.expose_secret().as_bytes())
        .map_err(|_| anyhow::anyhow!("session.secret_key must be at least 64 bytes long"))
}

pub fn run(
    listener: TcpListener,
    pool: DbPool,
    session_settings: &SessionSettings
) -> Result<Server, anyhow::Error>{
    let pool = web::Data::new(pool);
    let secret_key = session_key(session_settings)?;
    let secure_cookie = session_settings.secure_cookie;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(secure_cookie)
                    .build()
            )
            .wrap(TracingLogger::default())
            .app_data(pool.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/health", web::get().to(health_check))
            .route("/signup", web::post().to(signup))
            .route("/login", web::post().to(login))
            .service(web::resource("/logout").wrap(RequireLogin).route(web::post().to(logout)))
            .service(web::resource("/add_vendor").wrap(RequireLogin).route(web::post().to(add_vendor)))
            .service(web::resource("/list_vendors").wrap(RequireLogin).route(web::get().to(list_vendors)))
            .service(web::resource("/add_item").wrap(RequireLogin).route(web::post().to(add_item)))
            .service(web::resource("/list_items").wrap(RequireLogin).route(web::get().to(list_items)))
            .service(web::resource("/create_items_order").wrap(RequireLogin).route(web::post().to(create_items_order)))
            .service(web::resource("/place_order").wrap(RequireLogin).route(web::post().to(place_order)))
            .service(web::resource("/list_orders").wrap(RequireLogin).route(web::post().to(list_orders)))
            .service(web::resource("/list_all_orders").wrap(RequireLogin).route(web::get().to(list_all_orders)))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
