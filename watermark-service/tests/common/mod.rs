#![allow(dead_code)]

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use service_core::config::Config as CoreConfig;
use std::io::Cursor;
use tempfile::TempDir;
use watermark_service::config::{LimitSettings, LogoSettings, QrSettings, WatermarkConfig};
use watermark_service::startup::Application;

pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub const TEST_LINK: &str = "https://example.com";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub config: WatermarkConfig,
    _assets: TempDir,
}

/// Configuration pointing at a freshly written 100x100 opaque blue logo.
pub fn test_config(assets: &TempDir) -> WatermarkConfig {
    let logo_path = assets.path().join("logo.png");
    RgbaImage::from_pixel(100, 100, BLUE)
        .save(&logo_path)
        .expect("Failed to write test logo");

    WatermarkConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
        logo: LogoSettings { path: logo_path },
        qr: QrSettings::default(),
        limits: LimitSettings::default(),
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut WatermarkConfig)) -> Self {
        let assets = tempfile::tempdir().expect("Failed to create asset dir");
        let mut config = test_config(&assets);
        customize(&mut config);

        let app = Application::build(config.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            config,
            _assets: assets,
        }
    }

    pub async fn post_watermark(&self, body: &serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/watermark", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn png_base64(image: &DynamicImage) -> String {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .expect("Failed to encode PNG");
    general_purpose::STANDARD.encode(buffer.get_ref())
}

pub fn decode_base64_png(encoded: &str) -> DynamicImage {
    let bytes = general_purpose::STANDARD
        .decode(encoded)
        .expect("Response image is not base64");
    image::load_from_memory(&bytes).expect("Response image is not decodable")
}

pub fn solid_base(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, RED))
}
