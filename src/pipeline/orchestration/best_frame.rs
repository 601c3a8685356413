use crate::common::Frame;
use crate::pipeline::services::image::{QualityGate, QualityReport};
use std::cmp::Ordering;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

/// Frames that pass every check beat frames that don't; then the sharper one wins.
fn better(candidate: &QualityReport, current: &QualityReport) -> bool {
    match candidate.passed().cmp(&current.passed()) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => candidate.sharpness > current.sharpness,
    }
}

/// Pick the best frame of a capture burst. Structurally invalid frames are skipped.
pub async fn select_best_frame<S>(frames: S, gate: &QualityGate) -> Option<(Frame, QualityReport)>
where
    S: Stream<Item = Frame>,
{
    let assessed = frames.filter_map(|frame| match gate.assess(frame.image()) {
        Ok(report) => Some((frame, report)),
        Err(e) => {
            debug!("Skipping frame {}: {}", frame.frame_id(), e);
            None
        }
    });
    tokio::pin!(assessed);

    let mut best: Option<(Frame, QualityReport)> = None;
    while let Some((frame, report)) = assessed.next().await {
        let replace = match &best {
            Some((_, current)) => better(&report, current),
            None => true,
        };
        if replace {
            best = Some((frame, report));
        }
    }
    best
}
