use crate::error::AppError;
use crate::pipeline::domain::result::{AnalysisKind, AnalysisResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Row shape handed to persistence: flat columns plus the nested payload as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: AnalysisKind,
    pub created_at: DateTime<Utc>,
    pub score: f64,
    pub grade: String,
    pub confidence: f64,
    pub label: String,
    pub mock_landmarks: bool,
    pub frame_id: Option<Uuid>,
    pub device_model: Option<String>,
    pub payload: serde_json::Value,
}

impl AnalysisRecord {
    pub fn from_result(result: &AnalysisResult) -> Result<Self, AppError> {
        Ok(Self {
            id: result.id(),
            user_id: result.user_id(),
            kind: result.kind(),
            created_at: result.timestamp(),
            score: result.score(),
            grade: result.grade().letter().to_string(),
            confidence: result.confidence(),
            label: result.label().to_string(),
            mock_landmarks: result.source().is_mock(),
            frame_id: result.frame_id(),
            device_model: result.device().device_model.clone(),
            payload: serde_json::to_value(result.payload())?,
        })
    }
}

/// Persistence collaborator for finished analyses. Results are append-only.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save(&self, result: &AnalysisResult) -> Result<AnalysisRecord, AppError>;

    /// Save results from one run together: either all are stored or none are.
    async fn save_all(&self, results: &[AnalysisResult]) -> Result<Vec<AnalysisRecord>, AppError>;

    /// Most recent result of `kind` for `user_id`.
    async fn latest(
        &self,
        user_id: Uuid,
        kind: AnalysisKind,
    ) -> Result<Option<AnalysisResult>, AppError>;

    /// All results of `kind` for `user_id`, oldest first.
    async fn history(&self, user_id: Uuid, kind: AnalysisKind)
        -> Result<Vec<AnalysisResult>, AppError>;

    async fn record(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError>;
}

#[derive(Default)]
pub struct InMemoryResultStore {
    rows: RwLock<Vec<(AnalysisRecord, AnalysisResult)>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn save(&self, result: &AnalysisResult) -> Result<AnalysisRecord, AppError> {
        self.save_all(std::slice::from_ref(result))
            .await?
            .pop()
            .ok_or_else(|| AppError::Store("nothing was saved".to_string()))
    }

    async fn save_all(&self, results: &[AnalysisResult]) -> Result<Vec<AnalysisRecord>, AppError> {
        let records = results
            .iter()
            .map(AnalysisRecord::from_result)
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = self.rows.write().await;
        for (i, record) in records.iter().enumerate() {
            let stored = rows.iter().any(|(r, _)| r.id == record.id);
            let repeated = records[..i].iter().any(|r| r.id == record.id);
            if stored || repeated {
                return Err(AppError::Store(format!("result {} already stored", record.id)));
            }
        }
        rows.extend(records.iter().cloned().zip(results.iter().cloned()));
        Ok(records)
    }

    async fn latest(
        &self,
        user_id: Uuid,
        kind: AnalysisKind,
    ) -> Result<Option<AnalysisResult>, AppError> {
        Ok(self.history(user_id, kind).await?.pop())
    }

    async fn history(
        &self,
        user_id: Uuid,
        kind: AnalysisKind,
    ) -> Result<Vec<AnalysisResult>, AppError> {
        let rows = self.rows.read().await;
        let mut results: Vec<AnalysisResult> = rows
            .iter()
            .filter(|(record, _)| record.user_id == user_id && record.kind == kind)
            .map(|(_, result)| result.clone())
            .collect();
        results.sort_by_key(|r| r.timestamp());
        Ok(results)
    }

    async fn record(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|(r, _)| r.id == id).map(|(r, _)| r.clone()))
    }
}
