//! Single copy run: look up the target's latest bet, compare it with the
//! operator's holdings and act on the resulting decision.
//!
//! Prints the operator-facing progress report as it goes:
//! - [1] the target's latest qualifying bet
//! - [2] the target's trades on that position (optional)
//! - [3] the operator's holdings and whether the position is already held
//! - [4] the order, simulated or submitted

use tracing::info;

use crate::api::{ActivityResponse, ActivitySource, HoldingsSource, OrderGateway, ProfileSource};
use crate::error::Result;
use crate::models::{Position, Trade};
use crate::trading::{
    format_history_line, ActivityFeedReader, CopyConfig, CopyDecisionEngine, Decision,
    ExecutionOutcome, OrderExecutor, PositionHistoryCollector,
};

const RULE_WIDTH: usize = 60;
const FOUND_TITLE_LEN: usize = 50;
const HOLDING_TITLE_LEN: usize = 40;

/// Everything a run looked at before deciding.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub target_name: String,
    pub latest: Option<Trade>,
    pub history: Vec<ActivityResponse>,
    pub holdings: Vec<Position>,
    pub decision: Decision,
}

/// Copy bot for one target and one operator account.
///
/// Holds no state between runs: every run re-reads the feeds, so running it
/// again after a fill reports the position as already held.
pub struct CopyBot<'a, D: ?Sized> {
    config: &'a CopyConfig,
    data: &'a D,
    engine: CopyDecisionEngine,
}

impl<'a, D> CopyBot<'a, D>
where
    D: ActivitySource + HoldingsSource + ProfileSource + ?Sized,
{
    pub fn new(config: &'a CopyConfig, data: &'a D) -> Self {
        Self {
            config,
            data,
            engine: CopyDecisionEngine::new(config.bet_amount),
        }
    }

    /// Read the feeds and decide. Any failed read aborts the run.
    pub async fn evaluate(&self) -> Result<Evaluation> {
        let target_name = self
            .data
            .get_profile_name(&self.config.target_address)
            .await?;
        self.print_header(&target_name);

        println!("[1] Fetching target's latest bet...");
        let reader = ActivityFeedReader::new(self.data, self.config.activity_limit);
        let filter = &self.config.title_filter;
        let latest = reader
            .latest_qualifying_trade(&self.config.target_address, |t| filter.matches(t))
            .await?;

        let Some(trade) = latest else {
            println!("    No recent bets found. Nothing to copy.");
            return Ok(Evaluation {
                target_name,
                latest: None,
                history: Vec::new(),
                holdings: Vec::new(),
                decision: Decision::NoQualifyingActivity,
            });
        };

        println!("    Found: {}", truncate(&trade.title, FOUND_TITLE_LEN));
        println!(
            "    Position: {:.1} {} @ {:.1}¢",
            trade.size,
            trade.outcome,
            trade.price_cents()
        );

        let history = if self.config.show_history {
            self.report_history(&trade).await?
        } else {
            Vec::new()
        };

        println!("\n[3] Checking your positions...");
        let holdings = self
            .data
            .get_positions(&self.config.funder_address)
            .await?;
        print_holdings(&holdings);

        let decision = self.engine.decide(Some(&trade), &holdings);
        match &decision {
            Decision::AlreadyHeld(_) => println!("    Already in this market. Nothing to do!"),
            _ => println!("    Not in this market yet. Proceeding..."),
        }

        info!(
            target = %self.config.target_address,
            position = %trade.key(),
            decision = %decision,
            "Run evaluated"
        );

        Ok(Evaluation {
            target_name,
            latest: Some(trade),
            history,
            holdings,
            decision,
        })
    }

    /// Execute the decision from [`CopyBot::evaluate`].
    ///
    /// `gateway` is only consulted in live mode.
    pub async fn execute<G>(&self, evaluation: &Evaluation, gateway: Option<&G>) -> Result<ExecutionOutcome>
    where
        G: OrderGateway + ?Sized,
    {
        if !evaluation.decision.is_place_order() {
            return Ok(ExecutionOutcome::Skipped);
        }

        println!("\n[4] Placing bet...");
        let executor = OrderExecutor::new(self.config.dry_run, gateway);
        let outcome = executor.execute(&evaluation.decision).await?;

        let outcome_label = evaluation
            .latest
            .as_ref()
            .map(|t| t.outcome.as_str())
            .unwrap_or_default();
        match &outcome {
            ExecutionOutcome::Simulated { amount, .. } => {
                println!("    DRY RUN - would buy ${:.2} of {}", amount, outcome_label)
            }
            ExecutionOutcome::Submitted(_) => println!(
                "    Done! Bought ${:.2} of {}",
                self.config.bet_amount, outcome_label
            ),
            ExecutionOutcome::Skipped => {}
        }

        Ok(outcome)
    }

    fn print_header(&self, target_name: &str) {
        println!("\n{}", "=".repeat(RULE_WIDTH));
        println!("  Copying: {}", target_name);
        println!("  Bet amount: ${}", self.config.bet_amount);
        println!("  Mode: {}", self.config.mode_label());
        println!("{}\n", "=".repeat(RULE_WIDTH));
    }

    async fn report_history(&self, trade: &Trade) -> Result<Vec<ActivityResponse>> {
        println!("\n[2] Target bets for this same position:");
        let collector = PositionHistoryCollector::new(self.data);
        let history = collector
            .trades_for_position(
                &self.config.target_address,
                &trade.key(),
                self.config.history_limit,
            )
            .await?;

        if history.is_empty() {
            println!("    No recent bets found for this exact position.");
        }
        for (idx, bet) in history.iter().enumerate() {
            println!("    {}", format_history_line(idx + 1, bet));
        }
        Ok(history)
    }
}

/// Print an account's holdings in the run report format.
pub fn print_holdings(holdings: &[Position]) {
    if holdings.is_empty() {
        println!("    You have no open positions");
        return;
    }
    println!("    Your open positions:");
    for pos in holdings {
        println!(
            "      - {}: {}",
            truncate(&pos.title, HOLDING_TITLE_LEN),
            pos.outcome
        );
    }
}

/// Keep at most `max_chars` characters.
pub fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
