use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Un objeto reconocido en la imagen. Las coordenadas del cuadro son
/// `[x1, y1, x2, y2]` en píxeles de la imagen original (x1<x2, y1<y2),
/// tal y como las entrega el detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    #[serde(rename = "box")]
    pub bbox: [f32; 4],
}

/// Resultado de una ejecución completa del detector sobre una imagen subida.
/// El orden de `detections` es el orden de salida del detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub image_url: String,
    pub detections: Vec<Detection>,
}

/// Referencia a una imagen ya persistida en el almacén de subidas.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub path: PathBuf,      // filesystem path
    pub public_url: String, // e.g. "/static/uploads/<token>.jpg"
}

pub fn summarize_detections(detections: &[Detection]) -> String {
    let mut counts = HashMap::new();
    for det in detections {
        *counts.entry(&det.label).or_insert(0) += 1;
    }
    counts
        .iter()
        .map(|(label, count)| format!("{} {}", count, label))
        .collect::<Vec<_>>()
        .join(", ")
}
