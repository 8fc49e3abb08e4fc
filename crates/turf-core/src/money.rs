//! # Money Module
//!
//! Provides the `Money` and `Percent` types for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A quotation chains eight derived values (invoice, profit, tithe, ...)  │
//! │  Rounding at every step compounds the error down the pipeline.          │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal, full precision internally               │
//! │    Round to 2 places ONLY when displaying or persisting                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use turf_core::money::{Money, Percent};
//!
//! let price = Money::new(Decimal::new(1099, 2)); // 10.99
//! let total = price * Decimal::from(3);          // 32.97
//! let invoice = Percent::from(5).of(total);      // 1.6485 (not rounded yet)
//!
//! assert_eq!(invoice.to_persisted(), "1.65");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Number of fraction digits shown to users and written to storage.
pub const DISPLAY_DECIMALS: u32 = 2;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount held at full decimal precision.
///
/// ## Design Decisions
/// - **Decimal (signed)**: negative amounts are allowed (returns, credits)
/// - **Saturating arithmetic**: no numeric input can make the engine panic
/// - **Serde as string**: `"1234.5600"` survives JSON without float ambiguity
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.unit_sale_price × quantity ──► gross_revenue                 │
/// │  LineItem.unit_cost × quantity ────────► product_cost ──► total_costs  │
/// │  CostEntry.total_value() ──────────────────────────────► total_costs   │
/// │                                                                         │
/// │  gross_revenue ──► invoice ──► company_profit ──► tithe ──► net_profit │
/// │  gross_revenue ──► discount ──► final_total ──► commission             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal at full precision.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to two fraction digits, half away from zero.
    ///
    /// Only for presentation and persistence. Calculations keep the
    /// unrounded value.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use turf_core::money::Money;
    ///
    /// let m = Money::new(Decimal::new(34285714, 6)); // 34.285714
    /// assert_eq!(m.rounded().amount(), Decimal::new(3429, 2));
    /// ```
    pub fn rounded(&self) -> Money {
        Money(round_for_display(self.0))
    }

    /// Fixed two-decimal string used at the persistence boundary.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use turf_core::money::Money;
    ///
    /// assert_eq!(Money::new(Decimal::from(50)).to_persisted(), "50.00");
    /// assert_eq!(Money::new(Decimal::new(192, 1)).to_persisted(), "19.20");
    /// ```
    pub fn to_persisted(&self) -> String {
        format_fixed(self.0)
    }

    /// Absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Divides by another amount, returning `None` when the divisor is zero.
    pub fn checked_ratio(&self, divisor: Money) -> Option<Decimal> {
        self.0.checked_div(divisor.0)
    }
}

/// Rounds a decimal to [`DISPLAY_DECIMALS`] places, half away from zero.
pub fn round_for_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a decimal with exactly two fraction digits (`"1234.50"`).
pub fn format_fixed(value: Decimal) -> String {
    let rounded = round_for_display(value);
    if rounded.is_zero() {
        // -0.001 rounds to a signed zero; never print "-0.00"
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

// =============================================================================
// Percent Type
// =============================================================================

/// A percentage expressed in hundredths: `Percent::from(10)` is 10%.
///
/// Discount, commission and cost percentages all travel as this type, so the
/// `/ 100` happens in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(Decimal);

impl Percent {
    /// Creates a percentage from its value in hundredths (10 = 10%).
    #[inline]
    pub const fn from_decimal(value: Decimal) -> Self {
        Percent(value)
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(Decimal::ZERO)
    }

    /// Returns the percentage value (10 for 10%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the fraction (0.10 for 10%).
    pub fn as_fraction(&self) -> Decimal {
        self.0 / ONE_HUNDRED
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the percentage is strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Applies the percentage to a base amount: `base * value / 100`.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use turf_core::money::{Money, Percent};
    ///
    /// let base = Money::new(Decimal::from(1000));
    /// assert_eq!(Percent::from(10).of(base).amount(), Decimal::from(100));
    /// ```
    pub fn of(&self, base: Money) -> Money {
        base * self.as_fraction()
    }

    /// Two-decimal string used at the persistence boundary.
    pub fn to_persisted(&self) -> String {
        format_fixed(self.0)
    }
}

impl From<i32> for Percent {
    fn from(value: i32) -> Self {
        Percent(Decimal::from(value))
    }
}

impl From<Decimal> for Percent {
    fn from(value: Decimal) -> Self {
        Percent(value)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}%", format_fixed(self.0)))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount rounded to two places.
///
/// ## Note
/// This is for debugging and logs. Currency symbols and localization belong
/// to the rendering collaborator.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format_fixed(self.0))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Money(Decimal::from(value))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a decimal factor (quantity, rate).
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        Money(self.0.saturating_mul(factor))
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
