//! Persistence of uploaded and cleaned demo images
//!
//! Decoding and encoding live here so the cleanup pipeline only ever sees
//! in-memory rasters.

use crate::config::StoragePaths;
use crate::error::AppError;
use image::{DynamicImage, GenericImageView, GrayImage, ImageFormat};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const FALLBACK_NAME: &str = "upload.png";

/// Reads and writes demo images under the configured directories
#[derive(Debug, Clone)]
pub struct ImageStore {
    uploaded_dir: PathBuf,
    cleaned_dir: PathBuf,
    sample_path: PathBuf,
    max_pixels: u64,
}

impl ImageStore {
    pub fn new(paths: &StoragePaths, max_pixels: u64) -> Self {
        Self {
            uploaded_dir: paths.uploaded_dir.clone(),
            cleaned_dir: paths.cleaned_dir.clone(),
            sample_path: paths.sample_image(),
            max_pixels,
        }
    }

    /// Decode an uploaded byte buffer into a grayscale raster
    pub fn decode(&self, bytes: &[u8]) -> Result<GrayImage, AppError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| AppError::InvalidImage(e.to_string()))?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(AppError::InvalidImage("image has no pixels".to_string()));
        }
        if width as u64 * height as u64 > self.max_pixels {
            return Err(AppError::TooManyPixels {
                width,
                height,
                max: self.max_pixels,
            });
        }

        Ok(image.into_luma8())
    }

    /// Store the original upload byte-for-byte and return its path
    pub fn save_upload(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
        let path = self.uploaded_dir.join(name);
        write_atomically(&self.uploaded_dir, &path, |file| {
            file.write_all(bytes).map_err(|e| e.to_string())
        })?;
        tracing::debug!("Saved upload to {}", path.display());
        Ok(path)
    }

    /// Encode the cleaned image as `cleaned_<name>` in the format implied by
    /// the extension (PNG when the extension is unknown)
    pub fn save_cleaned(&self, name: &str, image: &GrayImage) -> Result<String, AppError> {
        let file_name = cleaned_name(name);
        let path = self.cleaned_dir.join(&file_name);
        let format = ImageFormat::from_path(&path).unwrap_or(ImageFormat::Png);

        // Not every encoder takes single-channel input
        let encodable = match format {
            ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp | ImageFormat::Tiff => {
                DynamicImage::ImageLuma8(image.clone())
            }
            _ => DynamicImage::ImageRgba8(DynamicImage::ImageLuma8(image.clone()).to_rgba8()),
        };

        write_atomically(&self.cleaned_dir, &path, |file| {
            encodable
                .write_to(file, format)
                .map_err(|e| format!("Failed to encode {}: {}", file_name, e))
        })?;
        tracing::debug!("Saved cleaned image to {}", path.display());
        Ok(file_name)
    }

    /// Raw bytes of the bundled sample scan
    pub fn load_sample(&self) -> Result<Vec<u8>, AppError> {
        if !self.sample_path.is_file() {
            return Err(AppError::SampleNotFound(
                self.sample_path.display().to_string(),
            ));
        }
        std::fs::read(&self.sample_path)
            .map_err(|e| AppError::Storage(format!("Failed to read sample image: {}", e)))
    }
}

/// Name under which the cleaned version of `name` is stored
pub fn cleaned_name(name: &str) -> String {
    format!("cleaned_{}", name)
}

/// Reduce a client-supplied file name to a safe single path component
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Write through a temp file in `dir` and move it into place once complete
fn write_atomically<F>(dir: &Path, path: &Path, write: F) -> Result<(), AppError>
where
    F: FnOnce(&mut BufWriter<&mut std::fs::File>) -> Result<(), String>,
{
    let mut temp_file = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| AppError::Storage(format!("Failed to create temp file: {}", e)))?;

    {
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        write(&mut writer).map_err(AppError::Storage)?;
        writer
            .flush()
            .map_err(|e| AppError::Storage(format!("Failed to write temp file: {}", e)))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| AppError::Storage(format!("Failed to persist {}: {}", path.display(), e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use std::io::Cursor;

    fn store(root: &Path) -> ImageStore {
        let paths = StoragePaths::new(
            &root.join("static"),
            &root.join("frontend"),
            &root.join("contact"),
        );
        std::fs::create_dir_all(&paths.uploaded_dir).unwrap();
        std::fs::create_dir_all(&paths.cleaned_dir).unwrap();
        ImageStore::new(&paths, 10_000)
    }

    fn png_bytes(img: &GrayImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_sanitize_filename_strips_paths() {
        assert_eq!(sanitize_filename("score.png"), "score.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\scans\\page 1.jpg"), "page_1.jpg");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename(""), "upload.png");
        assert_eq!(sanitize_filename("dir/"), "upload.png");
    }

    #[test]
    fn test_decode_converts_to_grayscale() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let rgb = image::RgbImage::from_pixel(8, 6, image::Rgb([200, 200, 200]));
        let mut buf = Cursor::new(Vec::new());
        rgb.write_to(&mut buf, ImageFormat::Png).unwrap();

        let gray = store.decode(buf.get_ref()).unwrap();
        assert_eq!(gray.dimensions(), (8, 6));
        assert_eq!(gray.get_pixel(0, 0).0[0], 200);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let err = store.decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AppError::InvalidImage(_)));
    }

    #[test]
    fn test_decode_rejects_oversized_images() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let img = GrayImage::new(200, 100);
        let err = store.decode(&png_bytes(&img)).unwrap_err();
        assert!(matches!(err, AppError::TooManyPixels { width: 200, height: 100, .. }));
    }

    #[test]
    fn test_save_cleaned_round_trips_png() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let img = GrayImage::from_fn(5, 4, |x, y| Luma([(x * 40 + y) as u8]));

        let name = store.save_cleaned("score.png", &img).unwrap();

        assert_eq!(name, "cleaned_score.png");
        let reloaded = image::open(dir.path().join("static/cleaned_images/cleaned_score.png"))
            .unwrap()
            .into_luma8();
        assert_eq!(reloaded, img);
    }

    #[test]
    fn test_save_cleaned_unknown_extension_falls_back_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let img = GrayImage::from_pixel(3, 3, Luma([7]));

        let name = store.save_cleaned("scan.xyz", &img).unwrap();

        let bytes = std::fs::read(dir.path().join("static/cleaned_images").join(name)).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_save_upload_keeps_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let path = store.save_upload("raw.bin", b"\x01\x02\x03").unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"\x01\x02\x03");
    }

    #[test]
    fn test_load_sample_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let err = store.load_sample().unwrap_err();
        assert!(matches!(err, AppError::SampleNotFound(_)));

        std::fs::write(dir.path().join("static/uploaded_images/noised.jpg"), b"jpg").unwrap();
        assert_eq!(store.load_sample().unwrap(), b"jpg");
    }
}
