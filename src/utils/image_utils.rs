// Used when we can't figure out what an uploaded file is.
pub const FALLBACK_MIME_TYPE: &'static str = "application/octet-stream";

// Leading bytes of the image formats a browser would
// happily display. WebP is a RIFF container so it gets
// a special case below.
const SIGNATURES: [(&'static [u8], &'static str); 5] = [
  (&[0xFF, 0xD8, 0xFF], "image/jpeg"),
  (&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], "image/png"),
  (b"GIF87a", "image/gif"),
  (b"GIF89a", "image/gif"),
  (b"BM", "image/bmp")
];

/// Guesses the image type from the first bytes of the data.
pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
  if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
    return Some("image/webp");
  }
  SIGNATURES.iter()
    .find(|(signature, _)| data.starts_with(signature))
    .map(|(_, mime)| *mime)
}

/// Picks the MIME type we store alongside an image.
///
/// The Content-Type declared by the client wins when it is an
/// image type. Browsers tend to send application/octet-stream
/// for anything they don't recognize, in which case we sniff.
pub fn resolve_mime_type(declared: Option<&str>, data: &[u8]) -> String {
  match declared {
    Some(mime) if mime.starts_with("image/") => mime.to_string(),
    _ => detect_mime_type(data)
      .unwrap_or(FALLBACK_MIME_TYPE)
      .to_string()
  }
}

pub fn data_url(mime_type: &str, base64_data: &str) -> String {
  format!("data:{};base64,{}", mime_type, base64_data)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detects_jpeg_and_png() {
    let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
    assert_eq!(Some("image/jpeg"), detect_mime_type(&jpeg));
    assert_eq!(Some("image/png"), detect_mime_type(&png));
  }

  #[test]
  fn detects_webp() {
    let webp = b"RIFF\x24\x00\x00\x00WEBPVP8 ";
    assert_eq!(Some("image/webp"), detect_mime_type(webp));
  }

  #[test]
  fn unknown_data_is_not_detected() {
    assert_eq!(None, detect_mime_type(b"hello world"));
    assert_eq!(None, detect_mime_type(&[]));
  }

  #[test]
  fn declared_image_type_wins() {
    let jpeg = [0xFF, 0xD8, 0xFF, 0xE0];
    assert_eq!("image/png", resolve_mime_type(Some("image/png"), &jpeg));
  }

  #[test]
  fn octet_stream_gets_sniffed() {
    let gif = b"GIF89a\x01\x00";
    assert_eq!(
      "image/gif",
      resolve_mime_type(Some("application/octet-stream"), gif)
    );
    assert_eq!(FALLBACK_MIME_TYPE, resolve_mime_type(None, b"nope"));
  }

  #[test]
  fn builds_data_url() {
    assert_eq!(
      "data:image/jpeg;base64,AAEC",
      data_url("image/jpeg", "AAEC")
    );
  }
}
