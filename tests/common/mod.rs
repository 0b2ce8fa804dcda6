//! Shared utilities for integration tests.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use image_transformer::{Server, ServerConfig};

/// Encode a solid-color RGBA image as PNG bytes.
pub fn rgba_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Encode an RGB (no alpha channel) PNG, which the validator rejects.
#[allow(dead_code)]
pub fn rgb_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Start a server on an ephemeral port and return it with its base URL.
/// The server must be kept alive for the duration of the test.
pub async fn start_server() -> (Server, String) {
    start_server_with(ServerConfig::default()).await
}

/// Start a server with a custom configuration on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server_with(config: ServerConfig) -> (Server, String) {
    let server = Server::new(config);
    let addr = server.start("127.0.0.1:0").await.unwrap();
    (server, format!("http://{}", addr))
}

/// Decode PNG response bytes and return (width, height).
#[allow(dead_code)]
pub fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    let image = image::load_from_memory(bytes).unwrap();
    (image.width(), image.height())
}
