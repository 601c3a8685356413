use crate::{
    common::frame::Frame,
    config::Settings,
    error::AppError,
    pipeline::{
        domain::{
            body::BodyMeasurements,
            result::AnalysisResult,
            trend::{score_series, trend_of, Trend},
            AnalysisDelta,
        },
        orchestration::{select_best_frame, AnalysisPipeline, BodyPipeline, PipelineBuilder},
    },
    store::{AnalysisRecord, ResultStore},
};
use std::sync::Arc;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum AnalysisJob {
    Face(Frame),
    /// Burst of frames from one capture session; only the best one is analysed.
    FaceSession(Vec<Frame>),
    Body {
        frame: Frame,
        measurements: Option<BodyMeasurements>,
    },
}

/// One stored result and its change since the user's previous result of the same kind.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub record: AnalysisRecord,
    pub delta: Option<AnalysisDelta>,
    /// Score direction over the user's whole history; `None` until there are two results.
    pub trend: Option<Trend>,
}

pub type AnalysisReply = Result<Vec<AnalysisOutcome>, AppError>;

pub struct AnalysisRequest {
    pub job: AnalysisJob,
    pub reply: Option<oneshot::Sender<AnalysisReply>>,
}

pub struct Coordinator {
    pipeline_task: tokio::task::JoinHandle<()>,
    request_tx: Sender<AnalysisRequest>,
    cancel_token: CancellationToken,
}

impl Coordinator {
    fn new(
        settings: Settings,
        face: AnalysisPipeline,
        body: BodyPipeline,
        store: Arc<dyn ResultStore>,
    ) -> Self {
        let cancel_token = CancellationToken::new();
        let (request_tx, request_rx) =
            tokio::sync::mpsc::channel(settings.coordinator.request_buffer_size);

        Self {
            pipeline_task: Self::start_pipeline_task(
                face,
                body,
                store,
                request_rx,
                cancel_token.clone(),
            ),
            request_tx,
            cancel_token,
        }
    }

    fn start_pipeline_task(
        mut face: AnalysisPipeline,
        mut body: BodyPipeline,
        store: Arc<dyn ResultStore>,
        mut request_rx: Receiver<AnalysisRequest>,
        cancel_token: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let request = tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    request = request_rx.recv() => match request {
                        Some(request) => request,
                        None => break,
                    },
                };

                // Cancelling abandons the in-flight run; nothing partial is stored.
                let reply = tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::warn!("Analysis cancelled mid-run");
                        break;
                    }
                    reply = Self::run(&mut face, &mut body, store.as_ref(), request.job) => reply,
                };

                if let Err(e) = &reply {
                    tracing::error!("Analysis failed ({}): {}", e.kind(), e);
                }
                if let Some(reply_tx) = request.reply {
                    if reply_tx.send(reply).is_err() {
                        tracing::debug!("Requester went away before the reply");
                    }
                }
            }
            tracing::info!("Coordinator stopped");
        })
    }

    async fn run(
        face: &mut AnalysisPipeline,
        body: &mut BodyPipeline,
        store: &dyn ResultStore,
        job: AnalysisJob,
    ) -> AnalysisReply {
        let ctx = match job {
            AnalysisJob::Face(frame) => face.process(frame).await?,
            AnalysisJob::FaceSession(frames) => {
                let count = frames.len();
                let gate = face.preprocessor().gate().clone();
                let (frame, report) = select_best_frame(tokio_stream::iter(frames), &gate)
                    .await
                    .ok_or_else(|| {
                        AppError::InvalidInputImage(format!(
                            "none of the {} session frames is usable",
                            count
                        ))
                    })?;
                tracing::info!(
                    "Picked frame {} of {} (sharpness {:.1})",
                    frame.frame_id(),
                    count,
                    report.sharpness
                );
                face.process(frame).await?
            }
            AnalysisJob::Body {
                frame,
                measurements,
            } => body.process(frame, measurements).await?,
        };

        let results = ctx.into_results();
        let mut deltas = Vec::with_capacity(results.len());
        for result in &results {
            let previous = store.latest(result.user_id(), result.kind()).await?;
            let delta = previous
                .as_ref()
                .map(|previous| result.delta_from(previous))
                .transpose()?;
            if let Some(delta) = &delta {
                tracing::info!(
                    "{} score changed by {:+.1} since {}",
                    delta.kind.name(),
                    delta.score,
                    delta.from
                );
            }
            deltas.push(delta);
        }

        // Results of one run are stored together or not at all.
        let records = store.save_all(&results).await?;

        let mut outcomes = Vec::with_capacity(results.len());
        for ((result, record), delta) in results.into_iter().zip(records).zip(deltas) {
            let history = store.history(result.user_id(), result.kind()).await?;
            let trend = (history.len() >= 2)
                .then(|| trend_of(&score_series(&history, result.user_id(), result.kind())));
            outcomes.push(AnalysisOutcome {
                result,
                record,
                delta,
                trend,
            });
        }
        Ok(outcomes)
    }

    /// Queue a job and wait for its outcome.
    pub async fn analyze(&self, job: AnalysisJob) -> AnalysisReply {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.submit(AnalysisRequest {
            job,
            reply: Some(reply_tx),
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| AppError::Pipeline("Coordinator dropped the request".to_string()))?
    }

    /// Queue a request without waiting for it to run.
    pub async fn submit(&self, request: AnalysisRequest) -> Result<(), AppError> {
        self.request_tx
            .send(request)
            .await
            .map_err(|_| AppError::Pipeline("Coordinator is not running".to_string()))
    }

    pub fn stop(&self) {
        self.cancel_token.cancel();
        self.pipeline_task.abort();
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct CoordinatorBuilder {
    settings: Settings,
    face: Option<AnalysisPipeline>,
    body: Option<BodyPipeline>,
    store: Option<Arc<dyn ResultStore>>,
}

impl CoordinatorBuilder {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            face: None,
            body: None,
            store: None,
        }
    }

    // Adjusts the request buffer size, this will override the loaded settings.
    pub fn request_buffer_size(mut self, request_buffer_size: usize) -> Self {
        self.settings.coordinator.request_buffer_size = request_buffer_size;
        self
    }

    pub fn face_pipeline(mut self, pipeline: AnalysisPipeline) -> Self {
        self.face = Some(pipeline);
        self
    }

    pub fn body_pipeline(mut self, pipeline: BodyPipeline) -> Self {
        self.body = Some(pipeline);
        self
    }

    /// Face and body pipelines from one builder, so both share its detector and catalogue.
    pub fn pipelines(self, builder: &PipelineBuilder) -> Self {
        self.face_pipeline(builder.build_face())
            .body_pipeline(builder.build_body())
    }

    pub fn store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<Coordinator, AppError> {
        let face = self
            .face
            .ok_or(AppError::Pipeline("Face pipeline not set".to_string()))?;
        let body = self
            .body
            .ok_or(AppError::Pipeline("Body pipeline not set".to_string()))?;
        let store = self
            .store
            .ok_or(AppError::Pipeline("Result store not set".to_string()))?;
        if self.settings.coordinator.request_buffer_size == 0 {
            return Err(AppError::Settings(
                "Request buffer size must be greater than 0".to_string(),
            ));
        }
        Ok(Coordinator::new(self.settings, face, body, store))
    }
}
