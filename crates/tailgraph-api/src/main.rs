use actix_web::{App, HttpServer, web};
use tracing::{error, info};

use tailgraph_api::config::Config;
use tailgraph_api::middleware::AccessLog;
use tailgraph_api::routes;
use tailgraph_api::schema::build_schema;
use tailgraph_api::upstream::Upstream;

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(distribute)]
    {
        fmt().json().with_env_filter(filter).init();
    }

    #[cfg(not(distribute))]
    {
        fmt().pretty().with_env_filter(filter).init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };
    info!(
        addr = %config.bind_addr,
        version = env!("GIT_VERSION"),
        upstream = %config.upstream.api_base_host,
        tailnet = %config.upstream.tailnet_domain,
        timeout_s = config.upstream.timeout.as_secs(),
        "starting tailgraph-api"
    );

    let upstream = Upstream::new(&config.upstream).map_err(std::io::Error::other)?;
    let schema = web::Data::new(build_schema(upstream, config.max_page_size));

    HttpServer::new(move || {
        App::new()
            .app_data(schema.clone())
            .wrap(AccessLog)
            .configure(routes::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
