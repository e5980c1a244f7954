// src/bin/seed_gallery.rs
// Bulk-upload a directory of images through the running gallery service
//
// Usage: seed_gallery <directory>   (or SEED_DIR in .env)
use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

#[derive(Deserialize, Debug)]
struct UploadedImage {
    title: String,
    category: String,
}

#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize, Debug, Default)]
struct ErrorDetail {
    code: String,
    message: String,
}

#[derive(Debug)]
struct SeedResult {
    file_name: String,
    outcome: Result<UploadedImage, String>,
    duration_secs: f64,
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

struct GallerySeeder {
    base_url: String,
    client: Client,
    results: Vec<SeedResult>,
}

impl GallerySeeder {
    fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            results: Vec::new(),
        })
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn collect_images(dir: &Path) -> Result<Vec<(PathBuf, &'static str)>> {
        let mut images = Vec::new();

        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("Cannot read directory {}", dir.display()))?
        {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            match content_type_for(&path) {
                Some(content_type) => images.push((path, content_type)),
                None => println!(
                    "{}⏭️  Skipping {} (not a supported image){}",
                    YELLOW,
                    path.display(),
                    RESET
                ),
            }
        }

        images.sort();
        Ok(images)
    }

    async fn upload(&self, path: &Path, content_type: &str) -> Result<UploadedImage, String> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| "file name is not valid UTF-8".to_string())?;

        let bytes = tokio::fs::read(path).await.map_err(|e| e.to_string())?;

        let response = self
            .client
            .post(format!("{}/gallery/images", self.base_url))
            .query(&[("file_name", file_name)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status().is_success() {
            response
                .json::<UploadedImage>()
                .await
                .map_err(|e| format!("Failed to parse response JSON: {}", e))
        } else {
            let status = response.status();
            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            Err(format!(
                "HTTP {} - {} {}",
                status, body.error.code, body.error.message
            ))
        }
    }

    async fn run(&mut self, dir: &Path) -> Result<()> {
        println!("\n{}🔍 Checking service status...{}", CYAN, RESET);
        if !self.check_service_health().await {
            bail!("Service unavailable at {}", self.base_url);
        }
        println!("{}✅ Service available{}\n", GREEN, RESET);

        let images = Self::collect_images(dir)?;
        println!("{}📷 Images to upload: {}{}\n", BOLD, images.len(), RESET);

        let total = images.len();
        for (i, (path, content_type)) in images.iter().enumerate() {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("{}[{}/{}] Uploading {}...{}", CYAN, i + 1, total, file_name, RESET);

            let start_time = Instant::now();
            let outcome = self.upload(path, content_type).await;
            let duration_secs = start_time.elapsed().as_secs_f64();

            match &outcome {
                Ok(image) => println!(
                    "{}✅ {} -> {} \"{}\" ({:.1}s){}",
                    GREEN, file_name, image.category, image.title, duration_secs, RESET
                ),
                Err(err) => println!("{}❌ {}: {}{}", RED, file_name, err, RESET),
            }

            self.results.push(SeedResult {
                file_name,
                outcome,
                duration_secs,
            });
        }

        self.print_summary();
        Ok(())
    }

    fn print_summary(&self) {
        println!("\n\n{}📋 Upload Summary{}", BOLD, RESET);
        println!("──────────────────────────────────────────────────────────────────");
        println!(
            "{:<36} {:<12} {:>10}",
            "File", "Category", "Duration"
        );
        println!("──────────────────────────────────────────────────────────────────");

        let mut uploaded = 0;
        for res in &self.results {
            let category = match &res.outcome {
                Ok(image) => {
                    uploaded += 1;
                    image.category.as_str()
                }
                Err(_) => "❌",
            };
            println!(
                "{:<36} {:<12} {:>9.1}s",
                res.file_name, category, res.duration_secs
            );
        }

        println!("──────────────────────────────────────────────────────────────────");
        println!(
            "  • Uploaded: {}{}{}   • Failed: {}{}{}",
            GREEN,
            uploaded,
            RESET,
            RED,
            self.results.len() - uploaded,
            RESET
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let dir = env::args()
        .nth(1)
        .or_else(|| env::var("SEED_DIR").ok())
        .context("Pass an image directory or set SEED_DIR")?;
    let base_url =
        env::var("GALLERY_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

    let mut seeder = GallerySeeder::new(base_url)?;
    seeder.run(Path::new(&dir)).await
}
