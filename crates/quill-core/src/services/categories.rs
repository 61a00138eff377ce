use std::sync::Arc;

use crate::domain::{
    Category, CategoryChanges, CategoryDraft, CategoryUpdate, CategoryWithCount, NewCategory,
    Violations, slugify,
};
use crate::error::{DomainError, RepoError};
use crate::ports::CategoryRepository;

const ENTITY: &str = "category";

/// Listing, lookup and mutation of categories.
#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    pub async fn list(&self) -> Result<Vec<CategoryWithCount>, DomainError> {
        self.categories
            .list_with_counts()
            .await
            .map_err(|e| e.into_domain(ENTITY, "all"))
    }

    pub async fn by_slug(&self, slug: &str) -> Result<Category, DomainError> {
        self.categories
            .find_by_slug(slug)
            .await
            .map_err(|e| e.into_domain(ENTITY, slug))?
            .ok_or_else(|| DomainError::not_found(ENTITY, slug))
    }

    pub async fn create(&self, input: NewCategory) -> Result<Category, DomainError> {
        let slug = validate_name(Some(&input.name))?.unwrap_or_default();

        let draft = CategoryDraft {
            name: input.name.trim().to_string(),
            description: input.description,
            slug: slug.clone(),
        };
        let category = self
            .categories
            .insert(draft)
            .await
            .map_err(|e| write_error(e, &slug))?;

        tracing::info!(category_id = category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    pub async fn update(&self, input: CategoryChanges) -> Result<Category, DomainError> {
        let slug = validate_name(input.name.as_deref())?;
        let slug_hint = slug.clone().unwrap_or_default();
        let id = input.id;

        let changes = CategoryUpdate {
            name: input.name.map(|n| n.trim().to_string()),
            slug,
            description: input.description,
        };
        let category = self
            .categories
            .update(id, changes)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::not_found(ENTITY, id),
                other => write_error(other, &slug_hint),
            })?;

        tracing::info!(category_id = category.id, slug = %category.slug, "Category updated");
        Ok(category)
    }

    /// Remove a category. Its posts stay; only their links to it go.
    pub async fn delete(&self, id: i32) -> Result<Category, DomainError> {
        let category = self
            .categories
            .delete(id)
            .await
            .map_err(|e| e.into_domain(ENTITY, id))?;

        tracing::info!(category_id = category.id, "Category deleted");
        Ok(category)
    }
}

/// Check a (possibly absent) name and derive its slug.
fn validate_name(name: Option<&str>) -> Result<Option<String>, DomainError> {
    let Some(name) = name else {
        return Ok(None);
    };
    let mut violations = Violations::new();
    violations.text("name", name, Category::NAME_MAX);
    let slug = slugify(name);
    if violations.is_empty() && slug.is_empty() {
        violations.add("name", "must contain at least one letter or digit");
    }
    violations.finish()?;
    Ok(Some(slug))
}

fn write_error(err: RepoError, slug: &str) -> DomainError {
    match err {
        RepoError::Constraint(_) => {
            DomainError::Duplicate(format!("a category with slug '{slug}' already exists"))
        }
        other => other.into_domain(ENTITY, slug),
    }
}
