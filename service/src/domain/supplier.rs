//! [`Supplier`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};

use crate::domain::material;
#[cfg(doc)]
use crate::domain::Material;

/// Company [`Material`]s are bought from.
#[derive(Clone, Debug)]
pub struct Supplier {
    /// ID of this [`Supplier`].
    pub id: Id,

    /// [`Name`] of this [`Supplier`].
    pub name: Name,

    /// [`Contact`] details of this [`Supplier`].
    pub contact: Contact,

    /// [`DateTime`] when this [`Supplier`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Supplier`] was deleted, if it was.
    ///
    /// Deleted [`Supplier`]s are kept for the orders already placed with them.
    pub deleted_at: Option<DeletionDateTime>,
}

impl Supplier {
    /// Indicates whether this [`Supplier`] is deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Optional contact details of a [`Supplier`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Contact {
    /// [`Email`] of a [`Supplier`].
    pub email: Option<Email>,

    /// [`Phone`] of a [`Supplier`].
    pub phone: Option<Phone>,

    /// Postal [`Address`] of a [`Supplier`].
    pub address: Option<Address>,
}

define_id! {
    #[doc = "ID of a [`Supplier`]."]
    pub struct Id;
}

define_text! {
    #[doc = "Name of a [`Supplier`]."]
    pub struct Name(max_len = 256);
}

define_text! {
    #[doc = "Email address of a [`Supplier`]."]
    pub struct Email(
        max_len = 256,
        check = |s: &str| matches!(
            s.split_once('@'),
            Some((local, domain))
                if !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !s.contains(char::is_whitespace)
        ),
    );
}

define_text! {
    #[doc = "Phone number of a [`Supplier`]."]
    pub struct Phone(
        max_len = 32,
        check = |s: &str| s.len() >= 3
            && s.chars().any(|c| c.is_ascii_digit())
            && s.chars().all(|c| {
                c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')')
            }),
    );
}

define_text! {
    #[doc = "Postal address of a [`Supplier`]."]
    pub struct Address(max_len = 512);
}

/// [`DateTime`] when a [`Supplier`] was created.
pub type CreationDateTime = DateTimeOf<(Supplier, unit::Creation)>;

/// [`DateTime`] when a [`Supplier`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Supplier, unit::Deletion)>;

/// Entry of a [`Supplier`]'s catalog: a [`Material`] the [`Supplier`] sells.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CatalogEntry {
    /// ID of the [`Supplier`] selling the [`Material`].
    pub supplier_id: Id,

    /// ID of the [`Material`] being sold.
    pub material_id: material::Id,

    /// [`DateTime`] when this [`CatalogEntry`] was created.
    pub created_at: CatalogEntryCreationDateTime,

    /// [`DateTime`] when this [`CatalogEntry`] was removed, if it was.
    pub deleted_at: Option<CatalogEntryDeletionDateTime>,
}

impl CatalogEntry {
    /// Indicates whether this [`CatalogEntry`] is still active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// [`DateTime`] when a [`CatalogEntry`] was created.
pub type CatalogEntryCreationDateTime =
    DateTimeOf<(CatalogEntry, unit::Creation)>;

/// [`DateTime`] when a [`CatalogEntry`] was removed.
pub type CatalogEntryDeletionDateTime =
    DateTimeOf<(CatalogEntry, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use super::{Email, Phone};

    #[test]
    fn validates_email() {
        assert!(Email::new("sales@acme.example").is_some());

        assert!(Email::new("sales.acme.example").is_none());
        assert!(Email::new("@acme.example").is_none());
        assert!(Email::new("sales@").is_none());
        assert!(Email::new("sales@acme@example").is_none());
        assert!(Email::new("sa les@acme.example").is_none());
    }

    #[test]
    fn validates_phone() {
        assert!(Phone::new("+1 (555) 010-9999").is_some());
        assert!(Phone::new("555").is_some());

        assert!(Phone::new("12").is_none());
        assert!(Phone::new("call me").is_none());
        assert!(Phone::new("+-()").is_none());
    }
}
