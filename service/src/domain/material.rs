//! [`Material`] definitions.

use std::{fmt, str::FromStr};

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use rust_decimal::Decimal;

/// Raw material bought from [`Supplier`]s and consumed by [`Part`]s.
///
/// [`Part`]: crate::domain::Part
/// [`Supplier`]: crate::domain::Supplier
#[derive(Clone, Debug)]
pub struct Material {
    /// ID of this [`Material`].
    pub id: Id,

    /// Unique [`Code`] of this [`Material`].
    pub code: Code,

    /// [`Name`] of this [`Material`].
    pub name: Name,

    /// [`Unit`] this [`Material`] is measured in.
    pub unit: Unit,

    /// [`Stock`] of this [`Material`], if it's stock-tracked.
    pub stock: Option<Stock>,

    /// [`DateTime`] when this [`Material`] was created.
    pub created_at: CreationDateTime,
}

impl Material {
    /// Indicates whether this [`Material`] is stock-tracked.
    #[must_use]
    pub fn is_stock_tracked(&self) -> bool {
        self.stock.is_some()
    }
}

define_id! {
    #[doc = "ID of a [`Material`]."]
    pub struct Id;
}

define_text! {
    #[doc = "Unique code of a [`Material`], like `STEEL-2MM`."]
    pub struct Code(
        max_len = 32,
        check = |s: &str| s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')),
    );
}

define_text! {
    #[doc = "Name of a [`Material`]."]
    pub struct Name(max_len = 256);
}

define_kind! {
    #[doc = "Unit a [`Material`] is measured in."]
    enum Unit {
        #[doc = "Kilograms."]
        Kilogram = 1,

        #[doc = "Grams."]
        Gram = 2,

        #[doc = "Liters."]
        Liter = 3,

        #[doc = "Milliliters."]
        Milliliter = 4,

        #[doc = "Meters."]
        Meter = 5,

        #[doc = "Centimeters."]
        Centimeter = 6,

        #[doc = "Square meters."]
        SquareMeter = 7,

        #[doc = "Countable pieces."]
        Piece = 8,
    }
}

/// Stock levels of a stock-tracked [`Material`].
///
/// Both quantities are either known together or not tracked at all.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Stock {
    /// Quantity currently available.
    pub current: StockQuantity,

    /// Quantity at or below which the stock is considered low.
    pub alert: StockQuantity,
}

impl Stock {
    /// Indicates whether the current quantity reached the alert threshold.
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.current <= self.alert
    }

    /// Returns this [`Stock`] increased by the provided quantity, or
    /// [`None`] if it overflows.
    #[must_use]
    pub fn restocked(self, quantity: common::Quantity) -> Option<Self> {
        Some(Self {
            current: StockQuantity(
                self.current.0.checked_add(quantity.value())?,
            ),
            alert: self.alert,
        })
    }
}

/// Non-negative quantity of a [`Material`] in stock.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StockQuantity(Decimal);

impl StockQuantity {
    /// Creates a new [`StockQuantity`] if the given `value` is non-negative.
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        (value >= Decimal::ZERO).then_some(Self(value))
    }

    /// Returns the underlying [`Decimal`] value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for StockQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for StockQuantity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `StockQuantity`")
    }
}

/// Addition of a quantity to the [`Stock`] of a stock-tracked [`Material`].
///
/// Not stock-tracked [`Material`]s are left untouched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Restock {
    /// ID of the [`Material`] to restock.
    pub material_id: Id,

    /// Quantity to add.
    pub quantity: common::Quantity,
}

impl Restock {
    /// Indicates whether this [`Restock`] overflows the [`Stock`] of the
    /// provided [`Material`].
    #[must_use]
    pub fn overflows(&self, material: &Material) -> bool {
        material
            .stock
            .is_some_and(|s| s.restocked(self.quantity).is_none())
    }
}

/// [`DateTime`] when a [`Material`] was created.
pub type CreationDateTime = DateTimeOf<(Material, unit::Creation)>;

#[cfg(feature = "postgres")]
mod postgres {
    //! Module providing integration with [`postgres_types`] crate.

    use std::error::Error as StdError;

    use postgres_types::{
        accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql,
        Type,
    };
    use rust_decimal::Decimal;

    use super::StockQuantity;

    impl FromSql<'_> for StockQuantity {
        accepts!(NUMERIC);

        fn from_sql(
            ty: &Type,
            raw: &[u8],
        ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
            let value = Decimal::from_sql(ty, raw)?;
            Self::new(value).ok_or_else(|| {
                format!("negative `StockQuantity`: {value}").into()
            })
        }
    }

    impl ToSql for StockQuantity {
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

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::Quantity;

    use super::{Code, Name, Stock, StockQuantity};

    fn stock(current: &str, alert: &str) -> Stock {
        Stock {
            current: StockQuantity::from_str(current).unwrap(),
            alert: StockQuantity::from_str(alert).unwrap(),
        }
    }

    #[test]
    fn validates_code() {
        assert!(Code::new("STEEL-2MM").is_some());
        assert!(Code::new("pvc_pipe.20").is_some());

        assert!(Code::new("").is_none());
        assert!(Code::new(" STEEL").is_none());
        assert!(Code::new("STEEL 2MM").is_none());
        assert!(Code::new("A".repeat(33)).is_none());
    }

    #[test]
    fn validates_name() {
        assert!(Name::new("Stainless steel sheet").is_some());
        assert!(Name::new("Stainless steel sheet ").is_none());
        assert!(Name::new("").is_none());
    }

    #[test]
    fn stock_quantity_is_non_negative() {
        assert!(StockQuantity::from_str("0").is_ok());
        assert!(StockQuantity::from_str("-0.5").is_err());
    }

    #[test]
    fn detects_low_stock() {
        assert!(stock("5", "5").is_low());
        assert!(stock("4.9", "5").is_low());
        assert!(!stock("5.1", "5").is_low());
    }

    #[test]
    fn restocks() {
        let restocked = stock("1.5", "2")
            .restocked(Quantity::from_str("3").unwrap())
            .unwrap();
        assert_eq!(restocked, stock("4.5", "2"));
        assert!(!restocked.is_low());
    }

    #[test]
    fn restock_overflow_is_none() {
        let full = stock("79228162514264337593543950335", "1");

        assert_eq!(full.restocked(Quantity::from_str("1").unwrap()), None);
        assert_eq!(
            stock("79228162514264337593543950334", "1")
                .restocked(Quantity::from_str("1").unwrap()),
            Some(full),
        );
    }
}
