//! Division Use Cases

use std::sync::Arc;

use auth::CurrentUser;
use kernel::id::DivisionId;

use crate::domain::entity::division::{Division, DivisionSummary};
use crate::domain::repository::ClinicStore;
use crate::error::{ClinicError, ClinicResult};

pub struct DivisionsUseCase<R: ClinicStore> {
    repo: Arc<R>,
}

impl<R: ClinicStore> DivisionsUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, _actor: &CurrentUser) -> ClinicResult<Vec<DivisionSummary>> {
        self.repo.list_divisions().await
    }

    pub async fn get(&self, _actor: &CurrentUser, id: &DivisionId) -> ClinicResult<Division> {
        self.find(id).await
    }

    pub async fn create(&self, actor: &CurrentUser, name: &str) -> ClinicResult<Division> {
        actor.ensure_can_write()?;
        let division = Division::new(name)?;
        self.repo.create_division(&division).await?;

        tracing::info!(division_id = %division.division_id, name = %division.name, "Division created");
        Ok(division)
    }

    pub async fn rename(
        &self,
        actor: &CurrentUser,
        id: &DivisionId,
        name: &str,
    ) -> ClinicResult<Division> {
        actor.ensure_can_write()?;
        let mut division = self.find(id).await?;
        division.rename(name)?;
        self.repo.update_division(&division).await?;
        Ok(division)
    }

    /// Players of the division are kept, without a division
    pub async fn delete(&self, actor: &CurrentUser, id: &DivisionId) -> ClinicResult<()> {
        actor.ensure_can_write()?;
        if !self.repo.delete_division(id).await? {
            return Err(ClinicError::NotFound("Division"));
        }
        tracing::info!(division_id = %id, by = %actor.public_id, "Division deleted");
        Ok(())
    }

    async fn find(&self, id: &DivisionId) -> ClinicResult<Division> {
        self.repo
            .find_division(id)
            .await?
            .ok_or(ClinicError::NotFound("Division"))
    }
}
