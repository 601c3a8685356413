use complexion::common::{DeviceMetadata, Frame};
use complexion::pipeline::domain::body::BodyMeasurements;
use complexion::{
    AnalysisJob, AppError, CoordinatorBuilder, InMemoryResultStore, PipelineBuilder, Settings,
};
use image::{ImageBuffer, Rgb, RgbImage};
use serde_json::json;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

const USAGE: &str =
    "Usage: complexion [IMAGE...] [--config FILE] [--device MODEL] [--body HEIGHT_CM WEIGHT_KG]";

#[derive(Debug, Default)]
struct Args {
    /// Several images are treated as one capture session.
    images: Vec<PathBuf>,
    config: Option<PathBuf>,
    device: Option<String>,
    body: Option<BodyMeasurements>,
}

fn parse_number(value: Option<String>, what: &str) -> Result<f64, AppError> {
    let value = value.ok_or_else(|| AppError::InvalidMeasurement(format!("missing {}", what)))?;
    value
        .parse()
        .map_err(|_| AppError::InvalidMeasurement(format!("{} '{}' is not a number", what, value)))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, AppError> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--body" => {
                parsed.body = Some(BodyMeasurements {
                    height_cm: parse_number(args.next(), "height")?,
                    weight_kg: parse_number(args.next(), "weight")?,
                });
            }
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| AppError::Settings("--config needs a file".to_string()))?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--device" => {
                let model = args
                    .next()
                    .ok_or_else(|| AppError::Settings("--device needs a model name".to_string()))?;
                parsed.device = Some(model);
            }
            _ if !arg.starts_with("--") => parsed.images.push(PathBuf::from(arg)),
            other => {
                return Err(AppError::Settings(format!("unexpected argument '{}'\n{}", other, USAGE)))
            }
        }
    }
    Ok(parsed)
}

fn init_logging(settings: &Settings) {
    let level = Level::from_str(&settings.logging.level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
}

/// Evenly lit, lightly textured skin-tone frame for runs without a photo.
fn synthetic_frame(user_id: Uuid) -> Frame {
    let image: RgbImage = ImageBuffer::from_fn(512, 512, |x, y| {
        let shade = ((x * 7 + y * 13) % 24) as u8;
        Rgb([214 - shade, 168 - shade, 140 - shade])
    });
    Frame::from_rgb(user_id, image, chrono::Utc::now())
}

fn load_frame(path: &PathBuf, user_id: Uuid) -> Result<Frame, AppError> {
    let image = image::open(path)
        .map_err(|e| AppError::InvalidInputImage(format!("{}: {}", path.display(), e)))?;
    Ok(Frame::new(user_id, image, chrono::Utc::now()))
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = parse_args(env::args().skip(1))?;
    let settings = Settings::load(args.config.as_deref())?;
    init_logging(&settings);

    let user_id = Uuid::new_v4();
    let device = DeviceMetadata {
        device_model: args.device.clone(),
        ..DeviceMetadata::default()
    };
    let frames: Vec<Frame> = if args.images.is_empty() {
        tracing::info!("No image given, analysing a synthetic frame");
        vec![synthetic_frame(user_id).with_device(device)]
    } else {
        args.images
            .iter()
            .map(|path| Ok(load_frame(path, user_id)?.with_device(device.clone())))
            .collect::<Result<_, AppError>>()?
    };

    let store = Arc::new(InMemoryResultStore::new());
    let coordinator = CoordinatorBuilder::new(settings.clone())
        .pipelines(&PipelineBuilder::new(settings))
        .store(store)
        .build()?;

    let body_frame = frames[0].clone();
    let mut jobs = vec![if frames.len() > 1 {
        AnalysisJob::FaceSession(frames)
    } else {
        AnalysisJob::Face(body_frame.clone())
    }];
    if args.body.is_some() {
        jobs.push(AnalysisJob::Body {
            frame: body_frame,
            measurements: args.body,
        });
    }

    let mut records = Vec::new();
    for job in jobs {
        match coordinator.analyze(job).await {
            Ok(outcomes) => records.extend(outcomes.into_iter().map(|o| o.record)),
            Err(e) => {
                tracing::error!("Analysis failed ({}): {}", e.kind(), e);
                println!("{}", json!({ "error": e.user_message() }));
                coordinator.stop();
                return Ok(());
            }
        }
    }
    coordinator.stop();

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, AppError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_image_and_body() {
        let parsed = args(&["face.jpg", "--body", "175", "70"]).unwrap();
        assert_eq!(parsed.images, vec![PathBuf::from("face.jpg")]);
        assert_eq!(
            parsed.body,
            Some(BodyMeasurements {
                height_cm: 175.0,
                weight_kg: 70.0
            })
        );
    }

    #[test]
    fn rejects_non_numeric_measurements() {
        assert!(matches!(
            args(&["--body", "tall", "70"]),
            Err(AppError::InvalidMeasurement(_))
        ));
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&[]).unwrap().images.is_empty());
    }

    #[test]
    fn several_images_form_a_session() {
        let parsed = args(&["a.jpg", "--device", "Pixel 8", "b.jpg"]).unwrap();
        assert_eq!(parsed.images, vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]);
        assert_eq!(parsed.device.as_deref(), Some("Pixel 8"));
        assert!(args(&["--device"]).is_err());
    }
}
