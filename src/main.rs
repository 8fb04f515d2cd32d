use gurukul::audit::FileAuditSink;
use gurukul::config::CONFIG;
use gurukul::{GurukulError, Institute};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), GurukulError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(CONFIG.log_level.clone())),
        )
        .init();

    info!(data_dir = %CONFIG.data_dir.display(), "starting institute backend");

    let audit = FileAuditSink::new(CONFIG.data_dir.join("audit.log"));
    let institute = Institute::open(&CONFIG.data_dir, CONFIG.bcrypt_cost, audit).await?;

    info!(
        courses = institute.courses().count().await,
        teachers = institute.teachers().count().await,
        students = institute.students().count().await,
        payments = institute.payments().count().await,
        attendance_records = institute.attendance().record_count().await,
        accounts = institute.accounts().count().await,
        "snapshots loaded"
    );

    let outstanding = institute.outstanding_fees_report().await;
    info!(open_obligations = outstanding.len(), "fee ledger ready");

    Ok(())
}
