use folio_state::LocalFile;

pub const MB: usize = 1024 * 1024;

pub fn image(name: &str, size: usize) -> LocalFile {
    LocalFile::new(name, "image/png", vec![0xABu8; size])
}

pub fn text(name: &str) -> LocalFile {
    LocalFile::new(name, "text/plain", b"hello".to_vec())
}

pub fn pdf(name: &str) -> LocalFile {
    LocalFile::new(name, "application/pdf", b"%PDF-1.7".to_vec())
}
