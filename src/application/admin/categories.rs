//! Category management.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::admin::ensure_non_empty;
use crate::application::repos::{
    CategoriesRepo, CreateCategoryParams, RepoError, UpdateCategoryParams,
};
use crate::domain::entities::{CategoryRecord, CategoryWithCount};
use crate::domain::slug::{SlugAsyncError, SlugError, generate_unique_slug_async};

#[derive(Debug, Error)]
pub enum AdminCategoryError {
    #[error("constraint violation: {0}")]
    ConstraintViolation(&'static str),
    #[error("category not found")]
    NotFound,
    #[error("category still holds {0} articles")]
    NotEmpty(u64),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct AdminCategoryService {
    categories: Arc<dyn CategoriesRepo>,
}

impl AdminCategoryService {
    pub fn new(categories: Arc<dyn CategoriesRepo>) -> Self {
        Self { categories }
    }

    pub async fn list(&self) -> Result<Vec<CategoryWithCount>, AdminCategoryError> {
        Ok(self.categories.list_with_counts().await?)
    }

    pub async fn load(&self, id: Uuid) -> Result<CategoryRecord, AdminCategoryError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or(AdminCategoryError::NotFound)
    }

    pub async fn create(&self, name: String) -> Result<CategoryRecord, AdminCategoryError> {
        ensure_non_empty(&name, "name").map_err(AdminCategoryError::ConstraintViolation)?;
        let slug = self.unique_slug(&name).await?;
        Ok(self
            .categories
            .create_category(CreateCategoryParams { name, slug })
            .await?)
    }

    pub async fn rename(
        &self,
        id: Uuid,
        name: String,
    ) -> Result<CategoryRecord, AdminCategoryError> {
        ensure_non_empty(&name, "name").map_err(AdminCategoryError::ConstraintViolation)?;

        let existing = self.load(id).await?;
        let slug = if existing.name == name {
            existing.slug
        } else {
            self.unique_slug(&name).await?
        };

        Ok(self
            .categories
            .update_category(UpdateCategoryParams { id, name, slug })
            .await?)
    }

    /// Deleting a category with articles would orphan them, so the count is
    /// checked first and reported back to the form.
    pub async fn delete(&self, id: Uuid) -> Result<(), AdminCategoryError> {
        let in_use = self.categories.count_articles_in(id).await?;
        if in_use > 0 {
            return Err(AdminCategoryError::NotEmpty(in_use));
        }

        match self.categories.delete_category(id).await {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound) => Err(AdminCategoryError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    async fn unique_slug(&self, name: &str) -> Result<String, AdminCategoryError> {
        let categories = self.categories.clone();
        match generate_unique_slug_async(name, move |candidate| {
            let categories = categories.clone();
            let candidate = candidate.to_string();
            async move { categories.slug_exists(&candidate).await.map(|taken| !taken) }
        })
        .await
        {
            Ok(slug) => Ok(slug),
            Err(SlugAsyncError::Slug(err)) => match err {
                SlugError::EmptyInput | SlugError::Unrepresentable { .. } => {
                    Err(AdminCategoryError::ConstraintViolation("name"))
                }
                SlugError::Exhausted { .. } => {
                    Err(AdminCategoryError::ConstraintViolation("slug"))
                }
            },
            Err(SlugAsyncError::Predicate(err)) => Err(AdminCategoryError::Repo(err)),
        }
    }
}
