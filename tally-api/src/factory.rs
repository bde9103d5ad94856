//! Composition root. The only place that picks concrete outbound adapters.

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderName;
use sqlx::PgPool;
use url::Url;

use crate::{
    adapters::outbound::{
        notify::{TracingNotifier, WebhookNotifier},
        postgres::{
            PostgresBoardStore, PostgresFinanceStore, PostgresHabitRepository,
            PostgresHealthProbe, PostgresUserRepository,
        },
    },
    app_state::{AppState, IdentityHeader},
    config::Settings,
    domain::{
        ports::outbound::{Clock, Notifier, SystemClock},
        services::{
            BoardServiceImpl, BudgetingServiceImpl, HabitServiceImpl, OverviewServiceImpl,
            PortfolioServiceImpl, ProfileServiceImpl,
        },
    },
};

fn notifier(settings: &Settings) -> anyhow::Result<Arc<dyn Notifier>> {
    match settings.notifications.webhook_url.as_deref() {
        Some(raw) if !raw.trim().is_empty() => {
            let url = Url::parse(raw).context("invalid notifications.webhook_url")?;
            tracing::info!("delivering notifications to {url}");
            Ok(Arc::new(WebhookNotifier::new(url)))
        }
        _ => {
            tracing::info!("no notification webhook configured, notifications are only logged");
            Ok(Arc::new(TracingNotifier))
        }
    }
}

pub fn identity_header(settings: &Settings) -> anyhow::Result<IdentityHeader> {
    let name = HeaderName::try_from(settings.application.identity_header.as_str())
        .context("invalid application.identity_header")?;
    Ok(IdentityHeader(name))
}

/// Wire every service against Postgres.
pub fn build_app_state(pool: PgPool, settings: &Settings) -> anyhow::Result<AppState> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let finance = Arc::new(PostgresFinanceStore::new(pool.clone()));
    let board = Arc::new(PostgresBoardStore::new(pool.clone()));
    let habits = Arc::new(PostgresHabitRepository::new(pool.clone()));
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));

    Ok(AppState {
        budgeting: Arc::new(BudgetingServiceImpl::new(
            finance.clone(),
            finance.clone(),
            finance.clone(),
            clock.clone(),
        )),
        portfolio: Arc::new(PortfolioServiceImpl::new(finance.clone(), finance.clone())),
        overview: Arc::new(OverviewServiceImpl::new(
            finance.clone(),
            finance.clone(),
            finance.clone(),
            finance.clone(),
            finance,
            clock.clone(),
        )),
        board: Arc::new(BoardServiceImpl::new(
            board,
            users.clone(),
            notifier(settings)?,
            clock.clone(),
        )),
        habits: Arc::new(HabitServiceImpl::new(habits, clock)),
        profiles: Arc::new(ProfileServiceImpl::new(users)),
        health: Arc::new(PostgresHealthProbe::new(pool)),
        identity_header: identity_header(settings)?,
    })
}

/// The same wiring over in-memory stores, for router tests.
#[cfg(test)]
pub fn in_memory_app_state(today: time::Date) -> AppState {
    use crate::adapters::outbound::memory::{
        AlwaysHealthy, FixedClock, MemoryBoardStore, MemoryFinanceStore, MemoryHabitRepository,
        MemoryUserRepository, RecordingNotifier,
    };

    let clock: Arc<dyn Clock> = Arc::new(FixedClock(today));
    let finance = Arc::new(MemoryFinanceStore::new());
    let users = Arc::new(MemoryUserRepository::new());

    AppState {
        budgeting: Arc::new(BudgetingServiceImpl::new(
            finance.clone(),
            finance.clone(),
            finance.clone(),
            clock.clone(),
        )),
        portfolio: Arc::new(PortfolioServiceImpl::new(finance.clone(), finance.clone())),
        overview: Arc::new(OverviewServiceImpl::new(
            finance.clone(),
            finance.clone(),
            finance.clone(),
            finance.clone(),
            finance,
            clock.clone(),
        )),
        board: Arc::new(BoardServiceImpl::new(
            Arc::new(MemoryBoardStore::new()),
            users.clone(),
            Arc::new(RecordingNotifier::new()),
            clock.clone(),
        )),
        habits: Arc::new(HabitServiceImpl::new(
            Arc::new(MemoryHabitRepository::new()),
            clock,
        )),
        profiles: Arc::new(ProfileServiceImpl::new(users)),
        health: Arc::new(AlwaysHealthy),
        identity_header: IdentityHeader(HeaderName::from_static("x-user-id")),
    }
}
