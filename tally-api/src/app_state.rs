use std::sync::Arc;

use axum::{extract::FromRef, http::HeaderName};

use crate::domain::ports::{
    inbound::{
        BoardService, BudgetingService, HabitService, OverviewService, PortfolioService,
        ProfileService,
    },
    outbound::HealthProbe,
};

/// Name of the header the identity gateway puts the caller's user id in.
#[derive(Debug, Clone)]
pub struct IdentityHeader(pub HeaderName);

#[derive(Clone)]
pub struct AppState {
    pub budgeting: Arc<dyn BudgetingService>,
    pub portfolio: Arc<dyn PortfolioService>,
    pub overview: Arc<dyn OverviewService>,
    pub board: Arc<dyn BoardService>,
    pub habits: Arc<dyn HabitService>,
    pub profiles: Arc<dyn ProfileService>,
    pub health: Arc<dyn HealthProbe>,
    pub identity_header: IdentityHeader,
}

impl FromRef<AppState> for IdentityHeader {
    fn from_ref(state: &AppState) -> Self {
        state.identity_header.clone()
    }
}
