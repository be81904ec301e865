// crates/framedeck-api/src/multipart.rs
//
// Minimal multipart/form-data body builder — text fields plus one file
// part, which is all /upload and /process accept. The whole body is built
// in memory; uploads are bounded by the server's own size cap.

use uuid::Uuid;

pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        // Random enough that it cannot collide with field content.
        let boundary = format!("framedeck-{}", Uuid::new_v4().simple());
        Self { boundary, body: Vec::new() }
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Append a plain text field.
    pub fn text(&mut self, name: &str, value: &str) {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
    }

    /// Append a file part.
    pub fn file(&mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
    }

    /// Close the body with the terminating boundary.
    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_fields_are_framed_with_crlf() {
        let mut form = MultipartForm::new();
        form.text("quality", "2");
        let boundary = form.boundary.clone();
        let body = String::from_utf8(form.finish()).unwrap();

        assert!(body.starts_with(&format!("--{boundary}\r\n")));
        assert!(body.contains("Content-Disposition: form-data; name=\"quality\"\r\n\r\n2\r\n"));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn file_part_carries_filename_and_content_type() {
        let mut form = MultipartForm::new();
        form.file("video", "a.mp4", "application/octet-stream", b"\x00\x01");
        let body = form.finish();
        let text = String::from_utf8_lossy(&body);

        assert!(text.contains("name=\"video\"; filename=\"a.mp4\""));
        assert!(text.contains("Content-Type: application/octet-stream\r\n\r\n"));
        // Raw bytes survive untouched between header and trailing CRLF.
        let header_end = body
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .unwrap()
            + 4;
        assert_eq!(&body[header_end..header_end + 2], b"\x00\x01");
    }

    #[test]
    fn boundaries_are_unique_per_form() {
        assert_ne!(MultipartForm::new().boundary, MultipartForm::new().boundary);
    }
}
