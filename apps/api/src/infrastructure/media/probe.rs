use image::ImageReader;
use std::io::Cursor;

/// Width and height read from the image header, if `data` is a recognised image.
///
/// Only the header is decoded; the payload itself is never validated.
pub fn probe_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?;
    let format = reader.format()?;
    match reader.into_dimensions() {
        Ok(dimensions) => Some(dimensions),
        Err(err) => {
            tracing::debug!(?format, error = %err, "could not read image dimensions");
            None
        }
    }
}

/// MIME type guessed from magic bytes.
pub fn sniff_content_type(data: &[u8]) -> Option<&'static str> {
    image::guess_format(data).ok().map(|format| format.to_mime_type())
}
