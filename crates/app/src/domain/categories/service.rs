//! Categories service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::categories::{
        data::{NewCategory, slugify},
        errors::CategoriesServiceError,
        records::CategoryRecord,
        repository::PgCategoriesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCategoriesService {
    db: Db,
    repository: PgCategoriesRepository,
}

impl PgCategoriesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCategoriesRepository::new(),
        }
    }
}

#[async_trait]
impl CategoriesService for PgCategoriesService {
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, CategoriesServiceError> {
        let name = category.name.trim();

        if name.is_empty() {
            return Err(CategoriesServiceError::MissingRequiredData);
        }

        let slug = slugify(name);

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_category(&mut tx, category.uuid, name, &slug)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        let categories = self.repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }
}

#[automock]
#[async_trait]
pub trait CategoriesService: Send + Sync {
    /// Create a category, deriving its slug from the display name.
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, CategoriesServiceError>;

    /// All categories sorted by display name.
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CategoriesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::categories::records::CategoryUuid, test::TestContext};

    use super::*;

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            uuid: CategoryUuid::new(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn create_category_derives_slug() -> TestResult {
        let ctx = TestContext::new().await;

        let category = ctx
            .categories
            .create_category(new_category(" Home Decor "))
            .await?;

        assert_eq!(category.name, "Home Decor");
        assert_eq!(category.slug, "home_decor");

        Ok(())
    }

    #[tokio::test]
    async fn create_category_duplicate_name_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.categories
            .create_category(new_category("Curtain"))
            .await?;

        let result = ctx.categories.create_category(new_category("Curtain")).await;

        assert!(
            matches!(result, Err(CategoriesServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_category_blank_name_returns_missing_required_data() {
        let ctx = TestContext::new().await;

        let result = ctx.categories.create_category(new_category("   ")).await;

        assert!(
            matches!(result, Err(CategoriesServiceError::MissingRequiredData)),
            "expected MissingRequiredData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_categories_sorted_by_name() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.categories
            .create_category(new_category("Shukas"))
            .await?;

        ctx.categories
            .create_category(new_category("Beadwork"))
            .await?;

        let names: Vec<String> = ctx
            .categories
            .list_categories()
            .await?
            .into_iter()
            .map(|category| category.name)
            .collect();

        assert_eq!(names, vec!["Beadwork".to_string(), "Shukas".to_string()]);

        Ok(())
    }
}
