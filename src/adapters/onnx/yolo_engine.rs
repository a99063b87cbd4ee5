use anyhow::Result;
use image::{imageops::FilterType, RgbImage};
use ndarray::{s, Array4, ArrayViewD, Axis, IxDyn};
use ort::session::Session;
use ort::value::Value;
use std::fs;

use crate::domain::detection::Detection;
use crate::domain::model::YoloParams;

const COCO_CLASSES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich",
    "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch",
    "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote",
    "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator", "book",
    "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

pub struct OnnxYoloEngine {
    session: Session,
}

impl OnnxYoloEngine {
    pub fn load(path: &str) -> Result<Self> {
        #[allow(unused_mut)]
        let mut builder = Session::builder()?.with_intra_threads(4)?;

        // CUDA es opcional: si está disponible se registra, si no continuamos en CPU.
        #[cfg(feature = "cuda")]
        {
            let cuda = ort::execution_providers::CUDAExecutionProvider::default().build();
            if let Ok(builder_with_cuda) = builder.clone().with_execution_providers([cuda]) {
                builder = builder_with_cuda;
            }
        }

        // Con `ort` sin default-features, usamos commit_from_memory.
        let model_bytes = fs::read(path)?;
        let session = builder.commit_from_memory(&model_bytes)?;

        Ok(Self { session })
    }

    pub fn infer(&mut self, rgb: &RgbImage, params: &YoloParams) -> Result<Vec<Detection>> {
        let imgsz = params.input_size as usize;
        let resized = image::imageops::resize(rgb, imgsz as u32, imgsz as u32, FilterType::Nearest);

        let mut input = Array4::<f32>::zeros((1, 3, imgsz, imgsz));
        for (x, y, pixel) in resized.enumerate_pixels() {
            input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
            input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
            input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
        }

        let input_shape = vec![1, 3, imgsz as i64, imgsz as i64];
        let input_tensor = Value::from_array((input_shape, input.into_raw_vec()))?;

        let outputs = self.session.run(ort::inputs![input_tensor])?;
        let (shape_out, data_out) = outputs[0].try_extract_tensor::<f32>()?;

        let dims: Vec<usize> = shape_out.into_iter().map(|&x| x as usize).collect();
        let array_view = ArrayViewD::from_shape(IxDyn(&dims), data_out)?;
        let view = array_view.index_axis(Axis(0), 0);

        let num_candidates = view.shape()[1];
        let sx = rgb.width() as f32 / imgsz as f32;
        let sy = rgb.height() as f32 / imgsz as f32;

        let mut candidates = Vec::new();

        for i in 0..num_candidates {
            let scores = view.slice(s![4.., i]);
            let Some((class_id, &max_score)) = scores
                .indexed_iter()
                .max_by(|(_, a), (_, b)| (*a).total_cmp(*b))
            else {
                continue;
            };

            if max_score > params.conf_threshold {
                let cx = view[[0, i]];
                let cy = view[[1, i]];
                let w = view[[2, i]];
                let h = view[[3, i]];

                candidates.push(Detection {
                    label: COCO_CLASSES.get(class_id).unwrap_or(&"object").to_string(),
                    confidence: max_score,
                    bbox: [
                        (cx - w / 2.0) * sx,
                        (cy - h / 2.0) * sy,
                        (cx + w / 2.0) * sx,
                        (cy + h / 2.0) * sy,
                    ],
                });
            }
        }

        Ok(non_max_suppression(
            candidates,
            params.iou_threshold,
            params.max_detections,
        ))
    }
}

fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let ix = (a[2].min(b[2]) - a[0].max(b[0])).max(0.0);
    let iy = (a[3].min(b[3]) - a[1].max(b[1])).max(0.0);
    let inter = ix * iy;
    let area_a = (a[2] - a[0]).max(0.0) * (a[3] - a[1]).max(0.0);
    let area_b = (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0);
    let union = area_a + area_b - inter;
    if union <= 0.0 {
        0.0
    } else {
        inter / union
    }
}

/// Supresión de no-máximos clásica: orden por confianza descendente y
/// descarte de cajas que solapen por encima del umbral con una ya aceptada.
fn non_max_suppression(
    mut candidates: Vec<Detection>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Detection> {
    candidates.sort_unstable_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<Detection> = Vec::new();
    for det in candidates {
        if kept.len() >= max_detections {
            break;
        }
        if kept.iter().all(|k| iou(&k.bbox, &det.bbox) <= iou_threshold) {
            kept.push(det);
        }
    }
    kept
}
