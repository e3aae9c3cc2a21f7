//! [`Command`] for creating a new [`Machine`].

use std::collections::HashMap;

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::machine::{Code, Elements, Name};
use crate::{
    domain::{machine, material, part, Item, Machine, Material, Part},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Machine`].
#[derive(Clone, Debug)]
pub struct CreateMachine {
    /// Unique [`Code`] of a new [`Machine`].
    pub code: machine::Code,

    /// [`Name`] of a new [`Machine`].
    pub name: machine::Name,

    /// [`Elements`] a new [`Machine`] is assembled from.
    pub elements: machine::Elements,
}

impl<Db> Command<CreateMachine> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<Machine>, &'l machine::Code>>,
            Ok = Option<Machine>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<material::Id, Material>, Vec<material::Id>>>,
            Ok = HashMap<material::Id, Material>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<part::Id, Part>, Vec<part::Id>>>,
            Ok = HashMap<part::Id, Part>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Machine>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Machine;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateMachine,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateMachine {
            code,
            name,
            elements,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(&code)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::CodeTaken(code)));
        }

        let material_ids = elements
            .iter()
            .filter_map(|e| e.item.material_id())
            .collect::<Vec<_>>();
        let materials = self
            .database()
            .execute(Select(By::<HashMap<_, Material>, _>::new(material_ids)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let part_ids = elements
            .iter()
            .filter_map(|e| e.item.part_id())
            .collect::<Vec<_>>();
        let parts = self
            .database()
            .execute(Select(By::<HashMap<_, Part>, _>::new(part_ids)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        for e in elements.iter() {
            match e.item {
                Item::Material(id) if !materials.contains_key(&id) => {
                    return Err(tracerr::new!(E::MaterialNotExists(id)));
                }
                Item::Part(id) if !parts.contains_key(&id) => {
                    return Err(tracerr::new!(E::PartNotExists(id)));
                }
                Item::Material(_) | Item::Part(_) => {}
            }
        }

        let machine = Machine {
            id: machine::Id::new(),
            code,
            name,
            elements,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(machine.clone()))
            .await
            .map_err(|e| {
                // Concurrent creation of the same `machine::Code`.
                if e.as_ref().is_unique_violation(Some("machines_code_key")) {
                    tracerr::new!(E::CodeTaken(machine.code.clone()))
                } else {
                    tracerr::map_from(e)
                }
            })
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(machine)
    }
}

/// Error of [`CreateMachine`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Machine`] with the provided [`Code`] already exists.
    #[display("`Machine(code: {_0})` already exists")]
    CodeTaken(#[error(not(source))] machine::Code),

    /// [`Material`] with the provided ID does not exist.
    #[display("`Material(id: {_0})` does not exist")]
    MaterialNotExists(#[error(not(source))] material::Id),

    /// [`Part`] with the provided ID does not exist.
    #[display("`Part(id: {_0})` does not exist")]
    PartNotExists(#[error(not(source))] part::Id),
}
