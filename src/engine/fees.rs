//! Fee schedule: maker and taker basis points applied to trade notionals.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const BPS_DENOMINATOR: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Configurable fee schedule for maker and taker fees.
///
/// Fees are expressed in basis points (1 bps = 0.01%), computed on the trade
/// notional (price × quantity) and rounded half-even to `precision` decimal
/// places. Negative values represent rebates, the common arrangement for
/// makers providing liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Maker fee in basis points (negative = rebate).
    pub maker_fee_bps: Decimal,
    /// Taker fee in basis points.
    pub taker_fee_bps: Decimal,
    /// Decimal places of the rounded fee amounts.
    pub precision: u32,
}

impl FeeSchedule {
    /// Create a new fee schedule rounding to `precision` decimal places.
    #[must_use = "FeeSchedule does nothing unless used"]
    pub fn new(maker_fee_bps: Decimal, taker_fee_bps: Decimal, precision: u32) -> Self {
        Self {
            maker_fee_bps,
            taker_fee_bps,
            precision,
        }
    }

    /// Calculate the fee for one transaction: `notional × bps / 10000`,
    /// half-even rounded. Positive results are charges, negative rebates.
    #[must_use = "Fee calculation result must be used"]
    #[inline]
    pub fn calculate_fee(&self, notional: Decimal, is_maker: bool) -> Decimal {
        let bps = if is_maker {
            self.maker_fee_bps
        } else {
            self.taker_fee_bps
        };
        (notional * bps / BPS_DENOMINATOR)
            .round_dp_with_strategy(self.precision, RoundingStrategy::MidpointNearestEven)
    }

    /// Fee charged to the maker for a trade of this notional.
    #[must_use]
    #[inline]
    pub fn maker_fee(&self, notional: Decimal) -> Decimal {
        self.calculate_fee(notional, true)
    }

    /// Fee charged to the taker for a trade of this notional.
    #[must_use]
    #[inline]
    pub fn taker_fee(&self, notional: Decimal) -> Decimal {
        self.calculate_fee(notional, false)
    }

    /// True when the maker side is paid a rebate.
    #[must_use]
    #[inline]
    pub fn has_maker_rebate(&self) -> bool {
        self.maker_fee_bps < Decimal::ZERO
    }

    /// True when both sides trade free.
    #[must_use]
    #[inline]
    pub fn is_zero_fee(&self) -> bool {
        self.maker_fee_bps.is_zero() && self.taker_fee_bps.is_zero()
    }

    /// A schedule with zero fees on both sides.
    #[must_use]
    pub fn zero_fee() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO, 8)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::zero_fee()
    }
}
