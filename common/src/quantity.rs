//! [`Quantity`] definitions.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;

/// Strictly positive amount of something measured in some unit.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Creates a new [`Quantity`] if the provided `value` is positive.
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        (value > Decimal::ZERO).then_some(Self(value))
    }

    /// Returns the underlying [`Decimal`] value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl From<Quantity> for Decimal {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Quantity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| "invalid number")?;
        Self::new(value).ok_or("must be positive")
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

    use super::Quantity;

    impl FromSql<'_> for Quantity {
        accepts!(NUMERIC);

        fn from_sql(
            ty: &Type,
            raw: &[u8],
        ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
            let value = Decimal::from_sql(ty, raw)?;
            Self::new(value).ok_or_else(|| {
                format!("non-positive `Quantity`: {value}").into()
            })
        }
    }

    impl ToSql for Quantity {
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

    /// Positive decimal quantity as a string, e.g. `"2.5"`.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Quantity = super::Quantity;

    impl Quantity {
        fn to_output<S: ScalarValue>(q: &Quantity) -> Value<S> {
            Value::scalar(q.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Quantity` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Quantity` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Quantity;

    #[test]
    fn accepts_only_positive() {
        assert!(Quantity::from_str("0").is_err());
        assert!(Quantity::from_str("-1").is_err());
        assert!(Quantity::from_str("one").is_err());

        assert_eq!(Quantity::from_str(" 2.50 ").unwrap().to_string(), "2.5");
        assert_eq!(Quantity::from_str("3").unwrap().to_string(), "3");
    }
}
