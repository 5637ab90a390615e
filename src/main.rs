use food_ordering::{configuration::Settings, startup::Application, telemetry::{get_subscriber, init_subscriber}};

#[actix_web::main]
async fn main() -> anyhow::Result<()>{
    let subscriber = get_subscriber("food_ordering".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = Settings::get()?;

    let application = Application::new(config).await?;
    tracing::info!(host = %application.host, port = application.port, "Server started");
    application.run_until_stopped().await?;
    Ok(())
}
