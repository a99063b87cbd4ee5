pub mod detector;
pub mod yolo_engine;
