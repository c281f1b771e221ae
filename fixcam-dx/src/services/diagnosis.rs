//! Diagnosis pipeline orchestrator
//!
//! One linear sequence per request: normalized media → rendered prompt →
//! inference → record extraction → assembly → atomic insert. Each stage
//! may block on network I/O but holds no cross-request state. Assembly
//! plus persistence is all-or-nothing; a failed stage leaves nothing
//! behind.

use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info};

use crate::db;
use crate::error::DiagnosisError;
use crate::models::Project;
use crate::services::gemini_client::VisionModel;
use crate::services::media_normalizer::NormalizedMedia;
use crate::services::project_assembler;
use crate::services::prompt_builder;
use crate::services::response_extractor;

/// Diagnosis pipeline with its injected inference dependency
pub struct DiagnosisPipeline {
    vision: Arc<dyn VisionModel>,
}

impl DiagnosisPipeline {
    pub fn new(vision: Arc<dyn VisionModel>) -> Self {
        Self { vision }
    }

    /// Run one diagnosis request end to end and persist the result.
    pub async fn run(
        &self,
        pool: &SqlitePool,
        media: NormalizedMedia,
        description: Option<&str>,
    ) -> Result<Project, DiagnosisError> {
        debug!(mime = %media.mime, is_video = media.is_video, "Starting diagnosis");

        let prompt = prompt_builder::build_analysis_prompt(description);

        let raw = self
            .vision
            .analyze(prompt_builder::SYSTEM_CONTEXT, &prompt, &media)
            .await?;
        debug!(chars = raw.len(), "Inference complete");

        let record = response_extractor::extract_record(&raw)?;

        let project = project_assembler::assemble(record, &media)?;

        db::projects::insert_project(pool, &project).await?;

        info!(
            project_id = %project.id,
            title = %project.title,
            steps = project.steps.len(),
            skill_level = project.skill_level,
            "Project created"
        );

        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedVision {
        response: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VisionModel for CannedVision {
        async fn analyze(
            &self,
            _system_context: &str,
            _prompt: &str,
            _media: &NormalizedMedia,
        ) -> Result<String, DiagnosisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    fn media() -> NormalizedMedia {
        NormalizedMedia {
            bytes: vec![1, 2, 3],
            mime: "image/jpeg".to_string(),
            is_video: false,
            primary_image: "data:image/jpeg;base64,cHJpbWFyeQ==".to_string(),
            thumbnail_image: "data:image/jpeg;base64,dGh1bWI=".to_string(),
        }
    }

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    const FENCED_RESPONSE: &str = "```json\n{\"title\": \"Fix Leaky Faucet\", \"skill_level\": 2, \
        \"steps\": [{\"step_number\": 1, \"title\": \"Shut off water\", \
        \"description\": \"Close both valves\"}], \
        \"materials\": [{\"name\": \"Cartridge\"}], \"tools\": []}\n```";

    #[tokio::test]
    async fn test_pipeline_persists_project() {
        let pool = test_pool().await;
        let vision = Arc::new(CannedVision {
            response: FENCED_RESPONSE.to_string(),
            calls: AtomicUsize::new(0),
        });
        let pipeline = DiagnosisPipeline::new(vision.clone());

        let project = pipeline
            .run(&pool, media(), Some("leaking faucet"))
            .await
            .unwrap();

        assert_eq!(project.title, "Fix Leaky Faucet");
        assert_eq!(vision.calls.load(Ordering::SeqCst), 1);

        let stored = db::projects::find_project(&pool, &project.id).await.unwrap();
        assert_eq!(stored.steps[0].id, project.steps[0].id);
    }

    #[tokio::test]
    async fn test_unparseable_response_persists_nothing() {
        let pool = test_pool().await;
        let pipeline = DiagnosisPipeline::new(Arc::new(CannedVision {
            response: "I cannot analyze this image".to_string(),
            calls: AtomicUsize::new(0),
        }));

        let result = pipeline.run(&pool, media(), None).await;
        assert!(matches!(
            result,
            Err(DiagnosisError::MalformedResponse { .. })
        ));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
