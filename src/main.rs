use clap::Parser;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};

use yolo_upload_server::adapters::{
    fs::{result_store::FsResultStore, upload_store::FsUploadStore},
    http::{router, state::HttpState},
    onnx::detector::OnnxDetector,
};
use yolo_upload_server::application::services::DetectionService;
use yolo_upload_server::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Inicializar logs (RUST_LOG=info por defecto)
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cfg = ServerConfig::parse();

    tracing::info!("🔧 Inicializando adaptadores de infraestructura...");

    // 2. Instanciar Adaptadores (Capa de Infraestructura)
    // Usamos Arc porque serán compartidos entre el servicio y el servidor HTTP.
    let uploads = Arc::new(FsUploadStore::new(&cfg.static_dir)?);
    let results = Arc::new(FsResultStore::new(&cfg.static_dir)?);
    let detector = Arc::new(OnnxDetector::load(&cfg.model_path, cfg.yolo_params())?);

    // 3. Instanciar el Servicio (Capa de Aplicación - Caso de Uso)
    let detection = Arc::new(DetectionService::new(
        uploads,
        detector,
        results,
        cfg.max_inflight,
        cfg.infer_timeout(),
    ));

    // 4. Configurar el Estado de la API
    let state = HttpState { detection };

    // 5. Configurar el Router de Axum, Archivos Estáticos y CORS
    // Las imágenes subidas se sirven bajo /static/uploads/...; el CORS
    // permisivo cubre al frontend servido desde otro origen.
    let app = router(state)
        .nest_service("/static", ServeDir::new(&cfg.static_dir))
        .layer(CorsLayer::permissive());

    // 6. Lanzar el Servidor
    let addr = format!("0.0.0.0:{}", cfg.port);

    tracing::info!("🚀 Servidor de detección iniciado en http://{}", addr);
    tracing::info!("📂 Archivos estáticos servidos desde {:?}", cfg.static_dir);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
