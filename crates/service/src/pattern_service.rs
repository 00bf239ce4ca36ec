//! Read and authoring operations on the pattern catalog.

use std::collections::HashSet;
use std::sync::Arc;

use stitchtrack_core::{Category, DifficultyLevel, Material, Pattern, Step};
use stitchtrack_storage::traits::{CatalogStore, PatternStore};

use crate::error::{Result, ServiceError};

/// A complete pattern as accepted by the import path: the pattern itself
/// plus its ordered steps and material list.
#[derive(Debug, Clone)]
pub struct PatternImport {
    pub pattern: Pattern,
    pub steps: Vec<Step>,
    pub materials: Vec<Material>,
}

pub struct PatternService {
    patterns: Arc<dyn PatternStore>,
    catalog: Arc<dyn CatalogStore>,
}

impl PatternService {
    pub fn new(patterns: Arc<dyn PatternStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self { patterns, catalog }
    }

    /// Pattern by id, or `NotFound` for the empty-state UI.
    pub async fn get_pattern(&self, id: &str) -> Result<Pattern> {
        self.patterns
            .get_pattern(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("pattern", id))
    }

    /// Public patterns, newest first.
    pub async fn list_patterns(&self, limit: usize) -> Result<Vec<Pattern>> {
        Ok(self.patterns.list_patterns(true, limit).await?)
    }

    pub async fn list_steps(&self, pattern_id: &str) -> Result<Vec<Step>> {
        self.get_pattern(pattern_id).await?;
        Ok(self.patterns.list_steps(pattern_id).await?)
    }

    pub async fn list_materials(&self, pattern_id: &str) -> Result<Vec<Material>> {
        self.get_pattern(pattern_id).await?;
        Ok(self.patterns.list_materials(pattern_id).await?)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.catalog.list_categories().await?)
    }

    pub async fn list_difficulty_levels(&self) -> Result<Vec<DifficultyLevel>> {
        Ok(self.catalog.list_difficulty_levels().await?)
    }

    /// Validates and persists a designer-authored pattern with its steps and
    /// materials. Validation runs fully before the first write.
    pub async fn import_pattern(&self, import: &PatternImport) -> Result<()> {
        validate_import(import)?;

        self.patterns.save_pattern(&import.pattern).await?;
        for step in &import.steps {
            self.patterns.save_step(step).await?;
        }
        for material in &import.materials {
            self.patterns.save_material(material).await?;
        }
        tracing::info!(
            pattern_id = %import.pattern.id,
            steps = import.steps.len(),
            materials = import.materials.len(),
            "imported pattern"
        );
        Ok(())
    }
}

fn validate_import(import: &PatternImport) -> Result<()> {
    if import.pattern.title.trim().is_empty() {
        return Err(ServiceError::InvalidInput("pattern title is empty".into()));
    }
    let mut seen_orders = HashSet::new();
    for step in &import.steps {
        if step.pattern_id != import.pattern.id {
            return Err(ServiceError::InvalidInput(format!(
                "step {} belongs to a different pattern",
                step.id
            )));
        }
        if step.description.trim().is_empty() {
            return Err(ServiceError::InvalidInput(format!(
                "step {} has an empty description",
                step.step_order
            )));
        }
        if !seen_orders.insert(step.step_order) {
            return Err(ServiceError::InvalidInput(format!(
                "duplicate step_order {}",
                step.step_order
            )));
        }
    }
    for material in &import.materials {
        if material.pattern_id != import.pattern.id {
            return Err(ServiceError::InvalidInput(format!(
                "material {} belongs to a different pattern",
                material.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_storage;
    use stitchtrack_core::{Material, Pattern, Step};

    fn sample_import() -> PatternImport {
        let pattern = Pattern::new("Spiral coaster");
        let steps = vec![
            Step::new(&pattern.id, 1, "Magic ring, 6 sc"),
            Step::new(&pattern.id, 2, "2 sc in each stitch"),
        ];
        let materials = vec![Material::new(&pattern.id, "Cotton yarn", "1 skein")];
        PatternImport { pattern, steps, materials }
    }

    #[tokio::test]
    async fn import_then_read_back() {
        let (service, _storage, _dir) = test_storage::pattern_service();
        let import = sample_import();
        service.import_pattern(&import).await.unwrap();

        let pattern = service.get_pattern(&import.pattern.id).await.unwrap();
        assert_eq!(pattern.title, "Spiral coaster");
        assert_eq!(service.list_steps(&pattern.id).await.unwrap().len(), 2);
        assert_eq!(service.list_materials(&pattern.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn import_rejects_duplicate_step_order() {
        let (service, storage, _dir) = test_storage::pattern_service();
        let mut import = sample_import();
        import.steps[1].step_order = 1;

        let err = service.import_pattern(&import).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        // validation failed before any write
        assert_eq!(storage.get_stats().unwrap().pattern_count, 0);
    }

    #[tokio::test]
    async fn missing_pattern_is_not_found() {
        let (service, _storage, _dir) = test_storage::pattern_service();
        let err = service.get_pattern("nope").await.unwrap_err();
        assert!(err.is_not_found());
        let err = service.list_steps("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
