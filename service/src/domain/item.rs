//! [`Item`] definitions.

use common::define_kind;
use derive_more::From;

use crate::domain::{material, part};
#[cfg(doc)]
use crate::domain::{Material, Part};

/// Catalog item: either a [`Material`] or a [`Part`].
#[derive(Clone, Copy, Debug, Eq, From, Hash, PartialEq)]
pub enum Item {
    /// [`Material`] item.
    Material(material::Id),

    /// [`Part`] item.
    Part(part::Id),
}

impl Item {
    /// Returns [`Kind`] of this [`Item`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Material(_) => Kind::Material,
            Self::Part(_) => Kind::Part,
        }
    }

    /// Returns the [`material::Id`] of this [`Item`], if it's a [`Material`].
    #[must_use]
    pub fn material_id(&self) -> Option<material::Id> {
        match self {
            Self::Material(id) => Some(*id),
            Self::Part(_) => None,
        }
    }

    /// Returns the [`part::Id`] of this [`Item`], if it's a [`Part`].
    #[must_use]
    pub fn part_id(&self) -> Option<part::Id> {
        match self {
            Self::Material(_) => None,
            Self::Part(id) => Some(*id),
        }
    }

    /// Reconstructs an [`Item`] from its [`Kind`] and the two optional
    /// references, as they're stored.
    ///
    /// [`None`] is returned unless exactly the reference matching the `kind`
    /// is present.
    #[must_use]
    pub fn from_parts(
        kind: Kind,
        material_id: Option<material::Id>,
        part_id: Option<part::Id>,
    ) -> Option<Self> {
        match (kind, material_id, part_id) {
            (Kind::Material, Some(id), None) => Some(Self::Material(id)),
            (Kind::Part, None, Some(id)) => Some(Self::Part(id)),
            (Kind::Material | Kind::Part, ..) => None,
        }
    }
}

define_kind! {
    #[doc = "Kind of an [`Item`]."]
    enum Kind {
        #[doc = "[`Material`] item."]
        Material = 1,

        #[doc = "[`Part`] item."]
        Part = 2,
    }
}

#[cfg(test)]
mod spec {
    use super::{Item, Kind};
    use crate::domain::{material, part};

    #[test]
    fn restores_only_consistent_items() {
        let m = material::Id::new();
        let p = part::Id::new();

        assert_eq!(
            Item::from_parts(Kind::Material, Some(m), None),
            Some(Item::Material(m)),
        );
        assert_eq!(
            Item::from_parts(Kind::Part, None, Some(p)),
            Some(Item::Part(p)),
        );

        assert_eq!(Item::from_parts(Kind::Material, None, None), None);
        assert_eq!(Item::from_parts(Kind::Material, Some(m), Some(p)), None);
        assert_eq!(Item::from_parts(Kind::Part, Some(m), None), None);
    }
}
