//! [`Command`] for updating an existing [`Material`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::material::{Code, Name, Stock, Unit};
use crate::{
    domain::{material, Material},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Material`].
///
/// The [`Code`] of a [`Material`] never changes.
#[derive(Clone, Debug)]
pub struct UpdateMaterial {
    /// ID of the [`Material`] to update.
    pub material_id: material::Id,

    /// New [`Name`] of the [`Material`].
    pub name: material::Name,

    /// New [`Unit`] of the [`Material`].
    pub unit: material::Unit,

    /// New [`Stock`] of the [`Material`], if it should be tracked.
    pub stock: Option<material::Stock>,
}

impl<Db> Command<UpdateMaterial> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Material>, material::Id>>,
            Ok = Option<Material>,
            Err = Traced<database::Error>,
        > + Database<Update<Material>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Material;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateMaterial,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateMaterial {
            material_id,
            name,
            unit,
            stock,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut material = tx
            .execute(Select(By::<Option<Material>, _>::new(material_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::MaterialNotExists(material_id))
            .map_err(tracerr::wrap!())?;

        material.name = name;
        material.unit = unit;
        material.stock = stock;

        tx.execute(Update(material.clone()))
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

/// Error of [`UpdateMaterial`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Material`] with the provided ID does not exist.
    #[display("`Material(id: {_0})` does not exist")]
    MaterialNotExists(#[error(not(source))] material::Id),
}
