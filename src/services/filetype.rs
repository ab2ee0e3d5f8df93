/// Display category of a stored file, derived from its MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Image,
    Pdf,
    Other,
}

/// Classify a MIME type. Only images and PDFs are previewable.
pub fn classify(mime_type: &str) -> FileCategory {
    if mime_type.starts_with("image/") {
        FileCategory::Image
    } else if mime_type == "application/pdf" {
        FileCategory::Pdf
    } else {
        FileCategory::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("image/png"), FileCategory::Image);
        assert_eq!(classify("image/svg+xml"), FileCategory::Image);
        assert_eq!(classify("application/pdf"), FileCategory::Pdf);
        assert_eq!(classify("application/pdf+extra"), FileCategory::Other);
        assert_eq!(classify("text/plain"), FileCategory::Other);
        assert_eq!(classify("application/zip"), FileCategory::Other);
        assert_eq!(classify(""), FileCategory::Other);
    }
}
