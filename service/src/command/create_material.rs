//! [`Command`] for creating a new [`Material`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::material::{Code, Name, Stock, Unit};
use crate::{
    domain::{material, Material, PricedItem},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Material`].
///
/// A new unpriced [`PricedItem`] is created along with the [`Material`].
#[derive(Clone, Debug)]
pub struct CreateMaterial {
    /// Unique [`Code`] of a new [`Material`].
    pub code: material::Code,

    /// [`Name`] of a new [`Material`].
    pub name: material::Name,

    /// [`Unit`] a new [`Material`] is measured in.
    pub unit: material::Unit,

    /// [`Stock`] of a new [`Material`], if it should be tracked.
    pub stock: Option<material::Stock>,
}

impl<Db> Command<CreateMaterial> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<Material>, &'l material::Code>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Material>, Err = Traced<database::Error>>
        + Database<Insert<PricedItem>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Material;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateMaterial,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateMaterial {
            code,
            name,
            unit,
            stock,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(&code)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::CodeTaken(code)));
        }

        let material = Material {
            id: material::Id::new(),
            code,
            name,
            unit,
            stock,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(material.clone()))
            .await
            .map_err(|e| {
                // Concurrent creation of the same `material::Code`.
                if e.as_ref().is_unique_violation(Some("materials_code_key")) {
                    tracerr::new!(E::CodeTaken(material.code.clone()))
                } else {
                    tracerr::map_from(e)
                }
            })
            .map(drop)?;
        tx.execute(Insert(PricedItem::unpriced(material.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(material)
    }
}

/// Error of [`CreateMaterial`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Material`] with the provided [`Code`] already exists.
    #[display("`Material(code: {_0})` already exists")]
    CodeTaken(#[error(not(source))] material::Code),
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use crate::{
        domain::material, infra::database::memory::Memory, Command as _,
        Service,
    };

    use super::{CreateMaterial, ExecutionError};

    fn create(code: &str) -> CreateMaterial {
        CreateMaterial {
            code: material::Code::from_str(code).unwrap(),
            name: material::Name::from_str("Steel sheet").unwrap(),
            unit: material::Unit::Kilogram,
            stock: None,
        }
    }

    #[tokio::test]
    async fn creates_unpriced_item_along() {
        let db = Memory::default();
        let service = Service::new(db.clone());

        let material = service.execute(create("STEEL-2MM")).await.unwrap();

        assert!(db.state().materials.contains_key(&material.id));
        assert_eq!(db.priced_item(material.id).unit_price, None);
    }

    #[tokio::test]
    async fn rejects_taken_code() {
        let db = Memory::default();
        let service = Service::new(db.clone());
        _ = service.execute(create("STEEL-2MM")).await.unwrap();

        let err = service.execute(create("STEEL-2MM")).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::CodeTaken(code) if code.to_string() == "STEEL-2MM",
        ));
        assert_eq!(db.state().materials.len(), 1);
        assert_eq!(db.state().priced_items.len(), 1);
    }
}
