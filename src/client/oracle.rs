use std::sync::Arc;

use alloy::primitives::{Address, I256};
use tracing::info;

use crate::{
    chain::ChainPort,
    core::{FlowError, FlowResult, PriceQuote},
};

/// Service for validated price observations
pub struct OracleService {
    chain: Arc<dyn ChainPort>,
    max_age_secs: u64,
}

impl OracleService {
    pub fn new(chain: Arc<dyn ChainPort>, max_age_secs: u64) -> Self {
        Self {
            chain,
            max_age_secs,
        }
    }

    /// Latest price from `feed`, validated before use.
    ///
    /// Rounds that never updated, non-positive answers, and observations
    /// older than the configured window are all rejected here; callers
    /// never size a plan against a quote that failed validation.
    pub async fn latest_quote(&self, feed: Address) -> FlowResult<PriceQuote> {
        let handle = self.chain.price_feed(feed);
        let round = handle.latest_round().await?;
        let decimals = handle.decimals().await?;

        if round.updated_at == 0 {
            return Err(FlowError::OracleUnavailable(format!(
                "feed {} round {} has never updated",
                feed, round.round_id
            )));
        }

        if round.answer <= I256::ZERO {
            return Err(FlowError::OracleUnavailable(format!(
                "feed {} round {} answered {}, expected a positive rate",
                feed, round.round_id, round.answer
            )));
        }

        let now = self.chain.latest_block_timestamp().await?;
        let age_secs = now.saturating_sub(round.updated_at);
        if age_secs > self.max_age_secs {
            return Err(FlowError::OracleUnavailable(format!(
                "feed {} round {} is {}s old, limit is {}s",
                feed, round.round_id, age_secs, self.max_age_secs
            )));
        }

        let quote = PriceQuote {
            rate: round.answer,
            decimals,
            round_id: round.round_id,
            updated_at: round.updated_at,
        };

        info!(
            %feed,
            rate = %quote.rate,
            decimals = quote.decimals,
            age_secs,
            "price quote"
        );

        Ok(quote)
    }
}
