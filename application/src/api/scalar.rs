//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use derive_more::{AsRef, Display, From, Into};
use juniper::{
    GraphQLScalar, GraphQLType, InputValue, ParseScalarResult,
    ParseScalarValue, ScalarToken, ScalarValue, Value,
};

/// Helper for `#[graphql(with = ..)]` attribute, representing a type as a
/// string GraphQL scalar through the [`FromStr`]/[`Display`] impls of the
/// `As` type it wraps.
///
/// The target type must implement [`AsRef`] and [`TryFrom`] for `As`.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Outputs the `value` as a string.
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Parses the target type from a string `input`.
    ///
    /// # Errors
    ///
    /// If the `input` is not a string, or is not a valid `As`, or the parsed
    /// `As` isn't convertible into the target type.
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = T::name(&()).unwrap_or_default();
        let s = input.as_string_value().ok_or_else(|| {
            format!("Expected `{name}` string, found: {input}")
        })?;
        let parsed = s
            .parse::<As>()
            .map_err(|e| format!("Invalid `{name}` \"{s}\": {e}"))?;
        T::try_from(parsed).map_err(|e| format!("Invalid `{name}`: {e}"))
    }

    /// Parses the provided [`ScalarToken`] as a string.
    ///
    /// # Errors
    ///
    /// If the token is not a string.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

/// Exact decimal number, possibly negative, as a string.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = Via::<rust_decimal::Decimal>)]
pub struct Decimal(rust_decimal::Decimal);

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, InputValue};

    use super::{Decimal, Via};

    #[test]
    fn parses_strings_only() {
        let parsed = Via::<rust_decimal::Decimal>::from_input::<
            Decimal,
            DefaultScalarValue,
        >(&InputValue::scalar("-12.50"));
        assert_eq!(parsed.unwrap().to_string(), "-12.50");

        let err = Via::<rust_decimal::Decimal>::from_input::<
            Decimal,
            DefaultScalarValue,
        >(&InputValue::scalar(12))
        .unwrap_err();
        assert!(err.starts_with("Expected `Decimal` string"), "{err}");

        let err = Via::<rust_decimal::Decimal>::from_input::<
            Decimal,
            DefaultScalarValue,
        >(&InputValue::scalar("twelve"))
        .unwrap_err();
        assert!(err.starts_with("Invalid `Decimal` \"twelve\""), "{err}");
    }
}
