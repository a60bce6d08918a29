use std::sync::Arc;

use anyhow::Context;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::{BirthdaysConfig, NotificationsConfig};
use crate::contract::client::BirthdaysApi;
use crate::domain::ports::{Notifier, SystemClock};
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::BirthdaysLocalClient;
use crate::infra::notify::{LogNotifier, SmtpNotifier};
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::SeaOrmBirthdaysRepository;

/// Name of the module's section under `modules` in the app config.
pub const MODULE_NAME: &str = "birthdays";

/// Wired birthdays module: domain service plus its REST and in-process faces.
#[derive(Clone)]
pub struct Birthdays {
    service: Arc<Service>,
}

impl Birthdays {
    /// Run migrations and wire infra adapters to the domain service.
    pub async fn init(cfg: BirthdaysConfig, db: DatabaseConnection) -> anyhow::Result<Self> {
        info!("Initializing birthdays module");
        debug!(
            "Loaded birthdays config: age {}..={} years, smtp configured: {}",
            cfg.min_age_years,
            cfg.max_age_years,
            cfg.notifications.smtp.is_some()
        );
        anyhow::ensure!(
            cfg.min_age_years <= cfg.max_age_years,
            "birthdays: min_age_years ({}) exceeds max_age_years ({})",
            cfg.min_age_years,
            cfg.max_age_years
        );

        Self::migrate(&db).await?;

        let notifier = build_notifier(&cfg.notifications)?;
        let service = Service::new(
            Arc::new(SeaOrmBirthdaysRepository::new(db)),
            notifier,
            Arc::new(SystemClock),
            ServiceConfig {
                age_bounds: cfg.age_bounds(),
                alert: cfg.alert_recipients(),
            },
        );
        Ok(Self::from_service(Arc::new(service)))
    }

    pub fn from_service(service: Arc<Service>) -> Self {
        Self { service }
    }

    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running birthdays database migrations");
        Migrator::up(db, None)
            .await
            .context("birthdays migrations failed")?;
        info!("Birthdays database migrations completed successfully");
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn BirthdaysApi> {
        Arc::new(BirthdaysLocalClient::new(self.service.clone()))
    }

    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering birthdays REST routes");
        routes::register_routes(router, self.service.clone())
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        routes::openapi()
    }
}

fn build_notifier(cfg: &NotificationsConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    match &cfg.smtp {
        Some(smtp) => Ok(Arc::new(SmtpNotifier::new(smtp)?)),
        None => {
            info!("No SMTP relay configured, notifications go to the log");
            Ok(Arc::new(LogNotifier))
        }
    }
}
