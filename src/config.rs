use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::model::YoloParams;

/// Configuración del servidor de detección.
#[derive(Parser, Debug, Clone)]
#[command(name = "yolo-upload-server", version, about = "Servidor HTTP de detección de objetos sobre imágenes subidas")]
pub struct ServerConfig {
    /// Puerto de escucha HTTP
    #[arg(long, default_value_t = 8090)]
    pub port: u16,

    /// Directorio de ficheros estáticos (subidas y resultado persistido)
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    /// Ruta al modelo YOLO en formato ONNX
    #[arg(long, default_value = "models/yolov8n.onnx")]
    pub model_path: String,

    /// Lado del tensor de entrada del modelo
    #[arg(long, default_value_t = 640)]
    pub imgsz: u32,

    /// Umbral mínimo de confianza
    #[arg(long, default_value_t = 0.25)]
    pub conf_thres: f32,

    /// Umbral IoU para la supresión de no-máximos
    #[arg(long, default_value_t = 0.45)]
    pub iou_thres: f32,

    /// Máximo de detecciones por imagen
    #[arg(long, default_value_t = 100)]
    pub max_det: usize,

    /// Inferencias simultáneas permitidas (1 = serializadas)
    #[arg(long, default_value_t = 1)]
    pub max_inflight: usize,

    /// Timeout de cada inferencia, en segundos
    #[arg(long, default_value_t = 30)]
    pub infer_timeout_secs: u64,
}

impl ServerConfig {
    pub fn yolo_params(&self) -> YoloParams {
        YoloParams {
            input_size: self.imgsz,
            conf_threshold: self.conf_thres,
            iou_threshold: self.iou_thres,
            max_detections: self.max_det,
        }
    }

    pub fn infer_timeout(&self) -> Duration {
        Duration::from_secs(self.infer_timeout_secs)
    }
}
