//! Utilidad de depuración: ejecuta el detector contra una cámara V4L2 en
//! vivo. Bucle productor/consumidor explícito: se tira de la cámara frame a
//! frame y se para con Ctrl-C. Opcionalmente escribe frames anotados a disco.

use anyhow::Result;
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use yolo_upload_server::adapters::annotate::draw_detections;
use yolo_upload_server::adapters::onnx::yolo_engine::OnnxYoloEngine;
use yolo_upload_server::adapters::v4l2::capture::{CaptureConfig, V4l2FrameSource};
use yolo_upload_server::domain::detection::summarize_detections;
use yolo_upload_server::domain::model::YoloParams;

#[derive(Parser, Debug)]
#[command(name = "livecam", version, about = "Detección YOLO en vivo sobre una cámara V4L2")]
struct Args {
    /// Dispositivo de vídeo
    #[arg(long, default_value = "/dev/video0")]
    device: String,

    /// FourCC del formato de captura (MJPG o YUYV)
    #[arg(long, default_value = "MJPG")]
    fourcc: String,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Ruta al modelo YOLO en formato ONNX
    #[arg(long, default_value = "models/yolov8n.onnx")]
    model_path: String,

    #[arg(long, default_value_t = 640)]
    imgsz: u32,

    #[arg(long, default_value_t = 0.25)]
    conf_thres: f32,

    #[arg(long, default_value_t = 0.45)]
    iou_thres: f32,

    /// Guardar un frame anotado cada N frames (0 = no guardar)
    #[arg(long, default_value_t = 0)]
    save_every: u32,

    /// Directorio de salida para los frames anotados
    #[arg(long, default_value = "livecam_out")]
    out_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let stop = Arc::new(AtomicBool::new(false));
    let stop_signal = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C recibido, parando la captura...");
            stop_signal.store(true, Ordering::Relaxed);
        }
    });

    tokio::task::spawn_blocking(move || run_loop(args, stop)).await?
}

fn run_loop(args: Args, stop: Arc<AtomicBool>) -> Result<()> {
    let mut source = V4l2FrameSource::open(&CaptureConfig {
        device_path: args.device.clone(),
        fourcc: args.fourcc.clone(),
        width: args.width,
        height: args.height,
        fps: args.fps,
    })?;
    let mut engine = OnnxYoloEngine::load(&args.model_path)?;
    let params = YoloParams {
        input_size: args.imgsz,
        conf_threshold: args.conf_thres,
        iou_threshold: args.iou_thres,
        ..YoloParams::default()
    };

    if args.save_every > 0 {
        std::fs::create_dir_all(&args.out_dir)?;
    }

    let (w, h) = source.dimensions();
    info!("Bucle en vivo iniciado ({}x{})", w, h);

    let mut frame_n: u32 = 0;
    let mut fps_est: f32 = 0.0;
    let mut last_t = Instant::now();

    while !stop.load(Ordering::Relaxed) {
        let mut rgb = match source.next_rgb() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Error capturando frame: {}", e);
                std::thread::sleep(std::time::Duration::from_millis(10));
                continue;
            }
        };

        let t_infer = Instant::now();
        let detections = engine.infer(&rgb, &params).unwrap_or_default();
        let infer_ms = t_infer.elapsed().as_secs_f32() * 1000.0;

        // Estimación suavizada de FPS, como en el dashboard
        let dt = last_t.elapsed().as_secs_f32().max(0.001);
        last_t = Instant::now();
        fps_est = 0.9 * fps_est + 0.1 * (1.0 / dt);

        frame_n += 1;
        info!(
            "frame {} | {:.1} FPS | inferencia {:.1} ms | [{}]",
            frame_n,
            fps_est,
            infer_ms,
            summarize_detections(&detections)
        );

        if args.save_every > 0 && frame_n % args.save_every == 0 {
            draw_detections(&mut rgb, &detections);
            let out = format!("{}/frame_{:06}.jpg", args.out_dir, frame_n);
            if let Err(e) = rgb.save(&out) {
                warn!("No se pudo guardar {}: {}", out, e);
            }
        }
    }

    info!("Captura detenida tras {} frames", frame_n);
    Ok(())
}
