//! Carries out a copy decision: simulated in dry-run mode, submitted otherwise.

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::api::{OrderGateway, OrderResponse};
use crate::error::{CopyError, Result};

use super::Decision;

/// What happened when a decision was executed.
#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    /// Nothing to execute
    Skipped,
    /// Dry run: the order that would have been placed
    Simulated { asset_id: String, amount: Decimal },
    /// Accepted by the venue
    Submitted(OrderResponse),
}

/// Executes at most one order per decision.
pub struct OrderExecutor<'a, G: OrderGateway + ?Sized> {
    dry_run: bool,
    gateway: Option<&'a G>,
}

impl<'a, G: OrderGateway + ?Sized> OrderExecutor<'a, G> {
    /// `gateway` is only used when `dry_run` is off.
    pub fn new(dry_run: bool, gateway: Option<&'a G>) -> Self {
        Self { dry_run, gateway }
    }

    /// Execute `decision`. Only [`Decision::PlaceOrder`] produces an order,
    /// and a failed submission is returned as-is without a retry.
    pub async fn execute(&self, decision: &Decision) -> Result<ExecutionOutcome> {
        let Decision::PlaceOrder {
            asset_id, amount, ..
        } = decision
        else {
            return Ok(ExecutionOutcome::Skipped);
        };

        if self.dry_run {
            info!(asset_id = %asset_id, amount = %amount, "Dry run, order not submitted");
            return Ok(ExecutionOutcome::Simulated {
                asset_id: asset_id.clone(),
                amount: *amount,
            });
        }

        let gateway = self
            .gateway
            .ok_or_else(|| CopyError::Order("live execution requires an order gateway".to_string()))?;

        info!(asset_id = %asset_id, amount = %amount, "Submitting market buy");
        let response = gateway.market_buy(asset_id, *amount).await?;

        if !response.success {
            warn!(error = %response.error_msg, "Order rejected");
            return Err(CopyError::Order(if response.error_msg.is_empty() {
                "order rejected".to_string()
            } else {
                response.error_msg
            }));
        }

        info!(
            order_id = ?response.order_id,
            status = ?response.status,
            "Order accepted"
        );
        Ok(ExecutionOutcome::Submitted(response))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// Records submitted orders and answers with a canned response.
    pub(crate) struct RecordingGateway {
        pub orders: Mutex<Vec<(String, Decimal)>>,
        pub response: OrderResponse,
    }

    impl RecordingGateway {
        pub(crate) fn accepting() -> Self {
            Self {
                orders: Mutex::new(Vec::new()),
                response: OrderResponse {
                    success: true,
                    order_id: Some("0xorder".to_string()),
                    status: Some("matched".to_string()),
                    ..OrderResponse::default()
                },
            }
        }

        pub(crate) fn rejecting(msg: &str) -> Self {
            Self {
                orders: Mutex::new(Vec::new()),
                response: OrderResponse {
                    success: false,
                    error_msg: msg.to_string(),
                    ..OrderResponse::default()
                },
            }
        }

        pub(crate) fn submitted(&self) -> usize {
            self.orders.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl OrderGateway for RecordingGateway {
        async fn market_buy(&self, token_id: &str, amount: Decimal) -> Result<OrderResponse> {
            self.orders
                .lock()
                .unwrap()
                .push((token_id.to_string(), amount));
            Ok(self.response.clone())
        }
    }

    fn place(asset_id: &str, amount: Decimal) -> Decision {
        Decision::PlaceOrder {
            asset_id: asset_id.to_string(),
            side: crate::models::TradeSide::Buy,
            amount,
        }
    }

    #[tokio::test]
    async fn test_dry_run_never_submits() {
        let gateway = RecordingGateway::accepting();
        let executor = OrderExecutor::new(true, Some(&gateway));

        let outcome = executor.execute(&place("A1", dec!(1))).await.unwrap();

        assert!(matches!(
            outcome,
            ExecutionOutcome::Simulated { ref asset_id, amount } if asset_id == "A1" && amount == dec!(1)
        ));
        assert_eq!(gateway.submitted(), 0);
    }

    #[tokio::test]
    async fn test_live_submits_exactly_once() {
        let gateway = RecordingGateway::accepting();
        let executor = OrderExecutor::new(false, Some(&gateway));

        let outcome = executor.execute(&place("A1", dec!(2.5))).await.unwrap();

        assert!(matches!(outcome, ExecutionOutcome::Submitted(ref r) if r.success));
        let orders = gateway.orders.lock().unwrap();
        assert_eq!(orders.as_slice(), &[("A1".to_string(), dec!(2.5))]);
    }

    #[tokio::test]
    async fn test_non_order_decisions_are_skipped() {
        let gateway = RecordingGateway::accepting();
        let executor = OrderExecutor::new(false, Some(&gateway));

        let held = Decision::AlreadyHeld(crate::models::PositionKey::new("M1", 0));
        for decision in [Decision::NoQualifyingActivity, held] {
            let outcome = executor.execute(&decision).await.unwrap();
            assert!(matches!(outcome, ExecutionOutcome::Skipped));
        }
        assert_eq!(gateway.submitted(), 0);
    }

    #[tokio::test]
    async fn test_rejected_order_is_error() {
        let gateway = RecordingGateway::rejecting("not enough balance");
        let executor = OrderExecutor::new(false, Some(&gateway));

        let err = executor.execute(&place("A1", dec!(1))).await.unwrap_err();
        assert!(matches!(err, CopyError::Order(ref msg) if msg == "not enough balance"));
        assert_eq!(gateway.submitted(), 1);
    }

    #[tokio::test]
    async fn test_live_without_gateway_fails() {
        let executor: OrderExecutor<'_, RecordingGateway> = OrderExecutor::new(false, None);
        let err = executor.execute(&place("A1", dec!(1))).await.unwrap_err();
        assert!(matches!(err, CopyError::Order(_)));
    }

    #[tokio::test]
    async fn test_dry_run_without_gateway() {
        let executor: OrderExecutor<'_, RecordingGateway> = OrderExecutor::new(true, None);
        let outcome = executor.execute(&place("A9", dec!(1))).await.unwrap();
        assert!(matches!(outcome, ExecutionOutcome::Simulated { .. }));
    }
}
