//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};

/// Non-negative amount of money.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Money(Decimal);

impl Money {
    /// Zero [`Money`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Number of decimal places [`Money`] totals are rounded to.
    pub const CENTS_SCALE: u32 = 2;

    /// Creates a new [`Money`] if the provided `amount` is non-negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative() || amount.is_zero()).then_some(Self(amount))
    }

    /// Rounds the provided non-negative `amount` to cents, away from zero on
    /// a midpoint, and normalizes it to exactly two decimal places.
    ///
    /// Negative amounts are clamped to [`Money::ZERO`].
    #[must_use]
    pub fn round_to_cents(amount: Decimal) -> Self {
        Self::new(amount).unwrap_or(Self::ZERO).to_cents()
    }

    /// Returns this [`Money`] rounded to cents.
    ///
    /// See [`Money::round_to_cents()`] for details.
    #[must_use]
    pub fn to_cents(self) -> Self {
        let mut rounded = self.0.round_dp_with_strategy(
            Self::CENTS_SCALE,
            RoundingStrategy::MidpointAwayFromZero,
        );
        rounded.rescale(Self::CENTS_SCALE);
        Self(rounded)
    }

    /// Returns the underlying [`Decimal`] amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Indicates whether this [`Money`] is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Indicates whether this [`Money`] is strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        !self.0.is_zero()
    }

    /// Indicates whether this [`Money`] has no fractions of a cent.
    #[must_use]
    pub fn is_cents(self) -> bool {
        self.0.round_dp(Self::CENTS_SCALE) == self.0
    }

    /// Adds the `other` [`Money`], returning [`None`] on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtracts the `other` [`Money`], returning [`None`] if the result would
    /// be negative.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        Self::new(self.0.checked_sub(other.0)?)
    }

    /// Sums up the provided [`Money`], returning [`None`] on overflow.
    pub fn checked_sum<I>(iter: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        iter.into_iter().try_fold(Self::ZERO, Self::checked_add)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl TryFrom<Decimal> for Money {
    type Error = &'static str;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount).ok_or("negative `Money` amount")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| "invalid amount")?;
        Self::new(amount).ok_or("negative amount")
    }
}

#[cfg(feature = "postgres")]
mod postgres {
    //! Module providing integration with [`postgres_types`] crate.

    use std::error::Error as StdError;

    use postgres_types::{
        accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql,
        Type,
    };
    use rust_decimal::Decimal;

    use super::Money;

    impl FromSql<'_> for Money {
        accepts!(NUMERIC);

        fn from_sql(
            ty: &Type,
            raw: &[u8],
        ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
            let amount = Decimal::from_sql(ty, raw)?;
            Self::new(amount).ok_or_else(|| {
                format!("negative `Money` amount: {amount}").into()
            })
        }
    }

    impl ToSql for Money {
        accepts!(NUMERIC);
        to_sql_checked!();

        fn to_sql(
            &self,
            ty: &Type,
            w: &mut BytesMut,
        ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
            self.0.to_sql(ty, w)
        }
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Non-negative amount of money as a decimal string, e.g. `"40.00"`.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Money;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(Money::new(decimal("-0.01")).is_none());
        assert!(Money::from_str("-5").is_err());
        assert!(Money::from_str("abc").is_err());

        assert_eq!(Money::new(Decimal::ZERO), Some(Money::ZERO));
        assert_eq!(
            Money::from_str("12.345").unwrap().amount(),
            decimal("12.345"),
        );
    }

    #[test]
    fn rounds_to_cents_away_from_zero() {
        assert_eq!(
            Money::round_to_cents(decimal("0.125")).to_string(),
            "0.13",
        );
        assert_eq!(
            Money::round_to_cents(decimal("0.124")).to_string(),
            "0.12",
        );
        assert_eq!(
            Money::round_to_cents(decimal("2.675")).to_string(),
            "2.68",
        );
        assert_eq!(Money::round_to_cents(decimal("40")).to_string(), "40.00");
        assert_eq!(Money::round_to_cents(decimal("-3")), Money::ZERO);
    }

    #[test]
    fn sums() {
        let total = Money::checked_sum(
            ["10.10", "0.20", "5"]
                .into_iter()
                .map(|s| Money::from_str(s).unwrap()),
        );
        assert_eq!(total.map(Money::amount), Some(decimal("15.30")));

        assert_eq!(
            Money::from_str("5")
                .unwrap()
                .checked_sub(Money::from_str("7").unwrap()),
            None,
        );
        assert_eq!(
            Money::from_str("7")
                .unwrap()
                .checked_sub(Money::from_str("5").unwrap())
                .map(Money::amount),
            Some(decimal("2")),
        );
    }

    #[test]
    fn overflows_into_none() {
        let max = Money::new(Decimal::MAX).unwrap();
        let cent = Money::from_str("0.01").unwrap();

        assert_eq!(max.checked_add(cent), None);
        assert_eq!(Money::checked_sum([cent, max, cent]), None);
        assert_eq!(
            Money::checked_sum([cent, cent]).map(Money::amount),
            Some(decimal("0.02")),
        );
    }

    #[test]
    fn detects_fractions_of_cent() {
        assert!(Money::from_str("39.99").unwrap().is_cents());
        assert!(Money::from_str("40").unwrap().is_cents());
        assert!(Money::from_str("40.000").unwrap().is_cents());

        assert!(!Money::from_str("39.994").unwrap().is_cents());
        assert!(!Money::from_str("0.009").unwrap().is_cents());
    }
}
