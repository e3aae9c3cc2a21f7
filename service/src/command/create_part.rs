//! [`Command`] for creating a new [`Part`].

use std::collections::HashMap;

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::part::{Code, Components, Name};
use crate::{
    domain::{material, part, Material, Part, PricedItem},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Part`].
///
/// A new unpriced [`PricedItem`] is created along with the [`Part`].
#[derive(Clone, Debug)]
pub struct CreatePart {
    /// Unique [`Code`] of a new [`Part`].
    pub code: part::Code,

    /// [`Name`] of a new [`Part`].
    pub name: part::Name,

    /// [`Components`] a new [`Part`] is made of.
    pub materials: part::Components,
}

impl<Db> Command<CreatePart> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<Part>, &'l part::Code>>,
            Ok = Option<Part>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<material::Id, Material>, Vec<material::Id>>>,
            Ok = HashMap<material::Id, Material>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Part>, Err = Traced<database::Error>>
        + Database<Insert<PricedItem>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Part;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreatePart) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePart {
            code,
            name,
            materials,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(&code)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::CodeTaken(code)));
        }

        let ids = materials.iter().map(|c| c.material_id).collect::<Vec<_>>();
        let existing = self
            .database()
            .execute(Select(By::<HashMap<_, Material>, _>::new(ids)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(c) =
            materials.iter().find(|c| !existing.contains_key(&c.material_id))
        {
            return Err(tracerr::new!(E::MaterialNotExists(c.material_id)));
        }

        let part = Part {
            id: part::Id::new(),
            code,
            name,
            materials,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(part.clone()))
            .await
            .map_err(|e| {
                // Concurrent creation of the same `part::Code`.
                if e.as_ref().is_unique_violation(Some("parts_code_key")) {
                    tracerr::new!(E::CodeTaken(part.code.clone()))
                } else {
                    tracerr::map_from(e)
                }
            })
            .map(drop)?;
        tx.execute(Insert(PricedItem::unpriced(part.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(part)
    }
}

/// Error of [`CreatePart`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Part`] with the provided [`Code`] already exists.
    #[display("`Part(code: {_0})` already exists")]
    CodeTaken(#[error(not(source))] part::Code),

    /// [`Material`] with the provided ID does not exist.
    #[display("`Material(id: {_0})` does not exist")]
    MaterialNotExists(#[error(not(source))] material::Id),
}
