use crate::cli::ServeArgs;
use crate::infra::{
    default_skill_catalog, AppState, InMemoryMemberDirectory, InMemoryTutoringStore,
};
use crate::routes::with_tutoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mentorhub::config::AppConfig;
use mentorhub::error::AppError;
use mentorhub::telemetry;
use mentorhub::workflows::roster::RosterImporter;
use mentorhub::workflows::tutoring::{SystemClock, TutoringWorkflowService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = Arc::new(InMemoryMemberDirectory::default());
    for skill in default_skill_catalog() {
        directory.insert_skill(skill);
    }
    if let Some(path) = args.roster.take() {
        let members = RosterImporter::from_path(&path)?;
        let seeded = members.len();
        for member in members {
            directory.insert_member(member);
        }
        info!(
            members = seeded,
            roster = %path.display(),
            "member directory seeded from roster export"
        );
    }

    let store = Arc::new(InMemoryTutoringStore::default());
    let tutoring_service = Arc::new(TutoringWorkflowService::new(
        store,
        directory,
        Arc::new(SystemClock),
        config.tutoring.clone(),
    ));

    let app = with_tutoring_routes(tutoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "tutoring workflow service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
