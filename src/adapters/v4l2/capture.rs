use anyhow::{anyhow, Result};
use image::{ImageFormat, Rgb, RgbImage};
use v4l::format::FourCC;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::Device;

/// Configuración para abrir la cámara del modo en vivo.
pub struct CaptureConfig {
    pub device_path: String,
    pub fourcc: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// Productor de frames sobre V4L2. El consumidor tira de él frame a frame
/// con `next_rgb`; no hay bucle interno ni hilos propios.
pub struct V4l2FrameSource {
    stream: Stream<'static>,
    fourcc: FourCC,
    width: u32,
    height: u32,
}

impl V4l2FrameSource {
    /// Abre el dispositivo y negocia formato y tasa de frames. El driver
    /// puede ajustar los valores pedidos a los más cercanos que soporte.
    pub fn open(cfg: &CaptureConfig) -> Result<Self> {
        let dev = Device::with_path(&cfg.device_path)?;

        let b = cfg.fourcc.as_bytes();
        if b.len() != 4 {
            return Err(anyhow!("FourCC debe tener 4 caracteres"));
        }
        let mut fmt = dev.format()?;
        fmt.fourcc = FourCC::new(&[b[0], b[1], b[2], b[3]]);
        fmt.width = cfg.width;
        fmt.height = cfg.height;
        let actual_fmt = dev.set_format(&fmt)?;

        let mut params = dev.params()?;
        params.interval.numerator = 1;
        params.interval.denominator = cfg.fps;
        let _ = dev.set_params(&params);

        // El stream MMAP exige que el dispositivo viva 'static.
        let dev_static: &'static Device = Box::leak(Box::new(dev));
        let stream = Stream::with_buffers(dev_static, v4l::buffer::Type::VideoCapture, 4)?;

        tracing::info!(
            "Cámara abierta: {}x{} [{}] a {} FPS",
            actual_fmt.width,
            actual_fmt.height,
            actual_fmt.fourcc,
            cfg.fps
        );

        Ok(Self {
            stream,
            fourcc: actual_fmt.fourcc,
            width: actual_fmt.width,
            height: actual_fmt.height,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bloquea hasta el siguiente frame y lo devuelve como RGB listo para
    /// la inferencia.
    pub fn next_rgb(&mut self) -> Result<RgbImage> {
        let (data, _) = self.stream.next()?;
        let fcc = self.fourcc.str().map_err(|_| anyhow!("FourCC inválido"))?;

        match fcc {
            // MJPG es una secuencia de JPEGs independientes.
            "MJPG" => Ok(image::load_from_memory_with_format(data, ImageFormat::Jpeg)?.to_rgb8()),
            "YUYV" => Ok(yuyv_to_rgb(data, self.width, self.height)),
            _ => Err(anyhow!("Formato de cámara {} no soportado", fcc)),
        }
    }
}

/// Convierte un buffer YUYV (YUV 4:2:2) a RGB con las fórmulas BT.601.
/// Cada bloque de 4 bytes [Y0, U, Y1, V] define dos píxeles contiguos.
fn yuyv_to_rgb(yuyv: &[u8], w: u32, h: u32) -> RgbImage {
    let to_rgb = |y: f32, u: f32, v: f32| -> Rgb<u8> {
        Rgb([
            (y + 1.402 * v).clamp(0.0, 255.0) as u8,
            (y - 0.344136 * u - 0.714136 * v).clamp(0.0, 255.0) as u8,
            (y + 1.772 * u).clamp(0.0, 255.0) as u8,
        ])
    };

    let mut out = RgbImage::new(w, h);
    for (i, chunk) in yuyv.chunks_exact(4).enumerate() {
        let u = chunk[1] as f32 - 128.0;
        let v = chunk[3] as f32 - 128.0;

        let px = i as u32 * 2;
        let (x, y) = (px % w, px / w);
        if y >= h {
            break;
        }
        out.put_pixel(x, y, to_rgb(chunk[0] as f32, u, v));
        if x + 1 < w {
            out.put_pixel(x + 1, y, to_rgb(chunk[2] as f32, u, v));
        }
    }
    out
}
