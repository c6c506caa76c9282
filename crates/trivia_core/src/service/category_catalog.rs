//! Category lookup.

use crate::model::category::{Category, CategoryId};
use crate::repo::category_repo::CategoryRepository;
use crate::service::ServiceResult;
use std::collections::BTreeMap;

/// Read-only view over the category repository.
pub struct CategoryCatalog<C: CategoryRepository> {
    repo: C,
}

impl<C: CategoryRepository> CategoryCatalog<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    /// Returns every category as `id -> label`.
    pub fn list_all(&self) -> ServiceResult<BTreeMap<CategoryId, String>> {
        Ok(self
            .repo
            .list_categories()?
            .into_iter()
            .map(|category| (category.id, category.label))
            .collect())
    }

    pub fn get(&self, id: CategoryId) -> ServiceResult<Option<Category>> {
        Ok(self.repo.get_category(id)?)
    }
}
