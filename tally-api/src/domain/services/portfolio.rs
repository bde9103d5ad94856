use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    models::{
        monthly_instalment, CreateEmiRequest, CreateInvestmentRequest, Emi, EmiFilter, EmiId,
        Investment, InvestmentId, NewEmi, NewInvestment, SipProjection, UpdateEmiRequest,
        UpdateInvestmentRequest, UserId, MAX_INVESTMENT_NAME_LEN,
    },
    ports::{
        inbound::PortfolioService,
        outbound::{EmiRepository, InvestmentRepository},
    },
    FinanceError,
};

fn non_negative(value: f64, field: &str) -> Result<(), FinanceError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FinanceError::invalid(format!("{field} cannot be negative")));
    }
    Ok(())
}

fn validate_emi(emi: &NewEmi) -> Result<(), FinanceError> {
    if emi.loan_name.trim().is_empty() {
        return Err(FinanceError::invalid("Loan name is required"));
    }
    non_negative(emi.principal, "Principal")?;
    non_negative(emi.roi, "Rate of interest")?;
    if emi.tenure_months < 1 {
        return Err(FinanceError::invalid("Tenure must be at least 1 month"));
    }
    Ok(())
}

fn validate_investment(investment: &NewInvestment) -> Result<(), FinanceError> {
    if investment.investment_type.trim().is_empty() {
        return Err(FinanceError::invalid("Investment type is required"));
    }
    let name = investment.investment_name.trim();
    if name.is_empty() || name.chars().count() > MAX_INVESTMENT_NAME_LEN {
        return Err(FinanceError::invalid(
            "Investment name is required and cannot exceed 100 characters",
        ));
    }
    non_negative(investment.amount_invested, "Amount invested")?;
    non_negative(investment.current_value, "Current value")?;
    non_negative(investment.roi, "ROI")?;
    if investment.duration_months.is_some_and(|d| d < 1) {
        return Err(FinanceError::invalid("Duration must be at least 1 month"));
    }
    Ok(())
}

pub struct PortfolioServiceImpl<M, I> {
    emis: Arc<M>,
    investments: Arc<I>,
}

impl<M: EmiRepository, I: InvestmentRepository> PortfolioServiceImpl<M, I> {
    pub fn new(emis: Arc<M>, investments: Arc<I>) -> Self {
        Self { emis, investments }
    }
}

#[async_trait]
impl<M: EmiRepository, I: InvestmentRepository> PortfolioService for PortfolioServiceImpl<M, I> {
    async fn create_emi(
        &self,
        user_id: UserId,
        request: CreateEmiRequest,
    ) -> Result<Emi, FinanceError> {
        let emi = NewEmi {
            user_id,
            emi_amount: monthly_instalment(request.principal, request.roi, request.tenure_months),
            loan_name: request.loan_name.trim().to_string(),
            principal: request.principal,
            roi: request.roi,
            tenure_months: request.tenure_months,
            due_date: request.due_date,
            is_preclosed: request.is_preclosed,
        };
        validate_emi(&emi)?;
        self.emis.create(&emi).await
    }

    async fn get_emi(&self, user_id: UserId, id: EmiId) -> Result<Emi, FinanceError> {
        self.emis
            .get(user_id, id)
            .await?
            .ok_or(FinanceError::NotFound("EMI"))
    }

    async fn list_emis(
        &self,
        user_id: UserId,
        filter: EmiFilter,
    ) -> Result<Vec<Emi>, FinanceError> {
        self.emis.list(user_id, &filter).await
    }

    async fn update_emi(
        &self,
        user_id: UserId,
        id: EmiId,
        request: UpdateEmiRequest,
    ) -> Result<Emi, FinanceError> {
        let mut emi = self.get_emi(user_id, id).await?;
        if let Some(loan_name) = request.loan_name {
            emi.loan_name = loan_name.trim().to_string();
        }
        if let Some(principal) = request.principal {
            emi.principal = principal;
        }
        if let Some(roi) = request.roi {
            emi.roi = roi;
        }
        if let Some(tenure) = request.tenure_months {
            emi.tenure_months = tenure;
        }
        if let Some(due_date) = request.due_date {
            emi.due_date = due_date;
        }
        if let Some(is_preclosed) = request.is_preclosed {
            emi.is_preclosed = is_preclosed;
        }
        emi.emi_amount = monthly_instalment(emi.principal, emi.roi, emi.tenure_months);

        validate_emi(&NewEmi {
            user_id,
            loan_name: emi.loan_name.clone(),
            principal: emi.principal,
            roi: emi.roi,
            tenure_months: emi.tenure_months,
            due_date: emi.due_date,
            emi_amount: emi.emi_amount,
            is_preclosed: emi.is_preclosed,
        })?;
        self.emis.update(&emi).await
    }

    async fn delete_emi(&self, user_id: UserId, id: EmiId) -> Result<(), FinanceError> {
        if !self.emis.delete(user_id, id).await? {
            return Err(FinanceError::NotFound("EMI"));
        }
        Ok(())
    }

    async fn create_investment(
        &self,
        user_id: UserId,
        request: CreateInvestmentRequest,
    ) -> Result<Investment, FinanceError> {
        let investment = NewInvestment {
            user_id,
            investment_type: request.investment_type.trim().to_string(),
            investment_name: request.investment_name.trim().to_string(),
            amount_invested: request.amount_invested,
            current_value: request.current_value,
            start_date: request.start_date,
            roi: request.roi,
            duration_months: request.duration_months,
        };
        validate_investment(&investment)?;
        self.investments.create(&investment).await
    }

    async fn get_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
    ) -> Result<Investment, FinanceError> {
        self.investments
            .get(user_id, id)
            .await?
            .ok_or(FinanceError::NotFound("Investment"))
    }

    async fn list_investments(&self, user_id: UserId) -> Result<Vec<Investment>, FinanceError> {
        self.investments.list(user_id).await
    }

    async fn update_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
        request: UpdateInvestmentRequest,
    ) -> Result<Investment, FinanceError> {
        let mut investment = self.get_investment(user_id, id).await?;
        if let Some(kind) = request.investment_type {
            investment.investment_type = kind.trim().to_string();
        }
        if let Some(name) = request.investment_name {
            investment.investment_name = name.trim().to_string();
        }
        if let Some(amount) = request.amount_invested {
            investment.amount_invested = amount;
        }
        if let Some(value) = request.current_value {
            investment.current_value = value;
        }
        if let Some(start_date) = request.start_date {
            investment.start_date = start_date;
        }
        if let Some(roi) = request.roi {
            investment.roi = roi;
        }
        if let Some(duration) = request.duration_months {
            investment.duration_months = Some(duration);
        }

        validate_investment(&NewInvestment {
            user_id,
            investment_type: investment.investment_type.clone(),
            investment_name: investment.investment_name.clone(),
            amount_invested: investment.amount_invested,
            current_value: investment.current_value,
            start_date: investment.start_date,
            roi: investment.roi,
            duration_months: investment.duration_months,
        })?;
        self.investments.update(&investment).await
    }

    async fn delete_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
    ) -> Result<(), FinanceError> {
        if !self.investments.delete(user_id, id).await? {
            return Err(FinanceError::NotFound("Investment"));
        }
        Ok(())
    }

    fn calculate_sip(
        &self,
        monthly_amount: f64,
        duration_months: i32,
        roi: f64,
    ) -> Result<SipProjection, FinanceError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(monthly_amount) || duration_months < 1 || !positive(roi) {
            return Err(FinanceError::invalid(
                "Monthly amount, duration and ROI are required and must be positive",
            ));
        }
        Ok(SipProjection::calculate(monthly_amount, duration_months, roi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::memory::MemoryFinanceStore;
    use time::macros::date;

    const USER: UserId = UserId::new(1);

    fn service() -> PortfolioServiceImpl<MemoryFinanceStore, MemoryFinanceStore> {
        let store = Arc::new(MemoryFinanceStore::new());
        PortfolioServiceImpl::new(store.clone(), store)
    }

    fn car_loan() -> CreateEmiRequest {
        CreateEmiRequest {
            loan_name: "Car".to_string(),
            principal: 100_000.0,
            roi: 12.0,
            tenure_months: 12,
            due_date: date!(2024 - 02 - 05),
            is_preclosed: false,
        }
    }

    #[tokio::test]
    async fn emi_amount_is_recomputed_on_update() {
        let svc = service();
        let emi = svc.create_emi(USER, car_loan()).await.unwrap();
        assert_eq!(emi.emi_amount, 8885.0);

        let updated = svc
            .update_emi(
                USER,
                emi.id,
                UpdateEmiRequest {
                    roi: Some(0.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.emi_amount, 8333.0);
    }

    #[tokio::test]
    async fn emi_filters_by_preclosure() {
        let svc = service();
        svc.create_emi(USER, car_loan()).await.unwrap();
        svc.create_emi(
            USER,
            CreateEmiRequest {
                is_preclosed: true,
                ..car_loan()
            },
        )
        .await
        .unwrap();

        let active = svc.list_emis(USER, EmiFilter::active()).await.unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn zero_tenure_is_rejected() {
        let svc = service();
        let result = svc
            .create_emi(
                USER,
                CreateEmiRequest {
                    tenure_months: 0,
                    ..car_loan()
                },
            )
            .await;
        assert!(matches!(result, Err(FinanceError::Invalid(_))));
    }

    #[tokio::test]
    async fn negative_rate_is_rejected() {
        let svc = service();
        let result = svc
            .create_emi(
                USER,
                CreateEmiRequest {
                    roi: -2400.0,
                    ..car_loan()
                },
            )
            .await;
        assert!(matches!(result, Err(FinanceError::Invalid(_))));

        let emi = svc.create_emi(USER, car_loan()).await.unwrap();
        let result = svc
            .update_emi(
                USER,
                emi.id,
                UpdateEmiRequest {
                    roi: Some(-1.0),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(FinanceError::Invalid(_))));
        assert_eq!(svc.get_emi(USER, emi.id).await.unwrap().roi, 12.0);
    }

    #[tokio::test]
    async fn foreign_investments_are_not_found() {
        let svc = service();
        let investment = svc
            .create_investment(
                USER,
                CreateInvestmentRequest {
                    investment_type: "Stocks".to_string(),
                    investment_name: "Index fund".to_string(),
                    amount_invested: 5000.0,
                    current_value: 5200.0,
                    start_date: date!(2024 - 01 - 01),
                    roi: 8.0,
                    duration_months: Some(24),
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            svc.get_investment(UserId::new(2), investment.id).await,
            Err(FinanceError::NotFound(_))
        ));
    }

    #[test]
    fn sip_requires_positive_inputs() {
        let svc = service();
        assert!(svc.calculate_sip(1000.0, 12, 0.0).is_err());
        assert_eq!(svc.calculate_sip(1000.0, 12, 12.0).unwrap().future_value, 12809.0);
    }
}
