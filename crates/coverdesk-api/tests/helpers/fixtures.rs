use axum_test::multipart::{MultipartForm, Part};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode test image");
    buffer
}

pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

/// A cover submission form for the seeded manga.
pub fn cover_form(volume_title: &str, volume_number: i32, image: Vec<u8>) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(image))
        .file_name("cover.jpg")
        .mime_type("image/jpeg");
    MultipartForm::new()
        .add_text("manga_id", super::TEST_MANGA_ID.to_string())
        .add_text("volume_title", volume_title.to_string())
        .add_text("volume_number", volume_number.to_string())
        .add_text("submission_notes", "first print cover")
        .add_part("image", part)
}
