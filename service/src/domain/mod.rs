//! Domain definitions.

/// Defines a validated, trimmed, non-empty text newtype.
///
/// An extra `check` predicate may restrict the allowed contents further.
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        pub struct $name:ident(
            max_len = $max:literal $(, check = $check:expr)? $(,)?
        );
    ) => {
        #[doc = $doc]
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            Hash,
            PartialEq,
        )]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::FromSql, ::postgres_types::ToSql),
            postgres(transparent),
        )]
        #[as_ref(forward)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!(
                "Creates a new [`", stringify!($name), "`] if the given \
                 `value` is valid.",
            )]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                Self::check(&value).then_some(Self(value))
            }

            #[doc = concat!(
                "Checks whether the given `value` is a valid [`",
                stringify!($name),
                "`].",
            )]
            fn check(value: &str) -> bool {
                value.trim() == value
                    && !value.is_empty()
                    && value.chars().count() <= $max
                    $(&& ($check)(value))?
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }
    };
}

/// Defines a random [UUID]-backed identifier of an entity.
///
/// [UUID]: https://wikipedia.org/wiki/Universally_unique_identifier
macro_rules! define_id {
    (#[doc = $doc:literal] pub struct Id;) => {
        #[doc = $doc]
        #[derive(
            Clone,
            Copy,
            Debug,
            Default,
            ::derive_more::Display,
            Eq,
            ::derive_more::From,
            ::derive_more::FromStr,
            Hash,
            ::derive_more::Into,
            Ord,
            PartialEq,
            PartialOrd,
        )]
        #[cfg_attr(
            feature = "serde",
            derive(::serde::Deserialize, ::serde::Serialize),
            serde(transparent),
        )]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::ToSql, ::postgres_types::FromSql),
            postgres(transparent),
        )]
        pub struct Id(::uuid::Uuid);

        impl Id {
            /// Creates a new random [`Id`].
            #[must_use]
            pub fn new() -> Self {
                Self(::uuid::Uuid::new_v4())
            }
        }
    };
}

pub mod item;
pub mod machine;
pub mod material;
pub mod part;
pub mod priced_item;
pub mod purchase_order;
pub mod request_for_quotation;
pub mod supplier;

pub use self::{
    item::Item, machine::Machine, material::Material, part::Part,
    priced_item::PricedItem, purchase_order::{Payment, PurchaseOrder},
    request_for_quotation::RequestForQuotation, supplier::Supplier,
};

#[cfg(all(test, feature = "serde"))]
mod spec {
    use serde::{
        de::{value, IntoDeserializer},
        Deserialize as _,
    };

    use super::material;

    #[test]
    fn deserializes_id_from_uuid() {
        let uuid = "67e55044-10b1-426f-9247-bb680e5fe0c8";

        let id = material::Id::deserialize(
            IntoDeserializer::<value::Error>::into_deserializer(uuid),
        )
        .unwrap();

        assert_eq!(id.to_string(), uuid);
    }
}
