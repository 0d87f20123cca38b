//! # Stage Catalog
//!
//! Ordered list of stage names shared by every evidence item of a case.
//! A stage's id is its position, so ids are dense and start at 0.

use super::access_control::CallContext;
use super::entities::Stage;
use super::errors::CustodyError;
use super::value_objects::Entity;
use shared_types::entities::StageId;

/// Append-only ordered stage catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageCatalog {
    stages: Vec<Stage>,
}

impl StageCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from names, assigning ids in order.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stages = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Stage {
                id: i as StageId,
                name: name.into(),
            })
            .collect();
        Self { stages }
    }

    fn get(&self, id: StageId) -> Option<&Stage> {
        usize::try_from(id).ok().and_then(|i| self.stages.get(i))
    }

    /// Append a stage and return its id.
    pub fn add_new_stage(
        &mut self,
        ctx: &CallContext<'_>,
        name: &str,
    ) -> Result<StageId, CustodyError> {
        ctx.require_admin()?;

        let id = self.stages.len() as StageId;
        self.stages.push(Stage {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    /// Rename an existing stage.
    pub fn update_stage_name(
        &mut self,
        ctx: &CallContext<'_>,
        id: StageId,
        name: &str,
    ) -> Result<(), CustodyError> {
        ctx.require_admin()?;

        let stage = usize::try_from(id)
            .ok()
            .and_then(|i| self.stages.get_mut(i))
            .ok_or(CustodyError::NotFound(Entity::Stage(id)))?;
        stage.name = name.to_string();
        Ok(())
    }

    /// Name of a stage.
    pub fn stage_name(&self, id: StageId) -> Result<&str, CustodyError> {
        self.get(id)
            .map(|s| s.name.as_str())
            .ok_or(CustodyError::NotFound(Entity::Stage(id)))
    }

    /// All stage names in catalog order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.name.clone()).collect()
    }

    /// Stages in catalog order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// True if `id` names a stage.
    #[must_use]
    pub fn contains(&self, id: StageId) -> bool {
        self.get(id).is_some()
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True when the catalog has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
