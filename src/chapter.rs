use crate::{extract, Client};
use eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};

/// A chapter (episode) of the serie.
#[derive(Debug)]
pub struct Chapter {
    /// Chapter number, 1-based.
    number: u32,
    /// Viewer URL, derived from the sample href.
    url: String,
}

impl Chapter {
    pub(crate) fn new(number: u32, url: String) -> Self {
        Self { number, url }
    }

    /// Returns the chapter number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Returns the chapter viewer URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the name of the chapter's directory.
    pub fn directory(&self) -> PathBuf {
        format!("chapter_{}", self.number).into()
    }

    /// Retrieves the chapter page and lists its images, in reading order.
    ///
    /// A chapter without extractable images yields an empty list.
    pub fn fetch_images(&self, client: &Client) -> Result<Vec<Image>> {
        let html = client
            .get_html(&self.url)
            .with_context(|| format!("get chapter {} page", self.number))?;

        Ok(extract::image_urls(&html)
            .into_iter()
            .enumerate()
            .map(|(i, url)| Image {
                url,
                ordinal: i + 1,
            })
            .collect())
    }
}

/// One image of a chapter.
#[derive(Debug)]
pub struct Image {
    /// Source URL.
    url: String,
    /// 1-based position within the chapter.
    ordinal: usize,
}

impl Image {
    /// Returns the image source URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the image position within its chapter.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Returns the image filename.
    pub fn filename(&self) -> PathBuf {
        format!("image_{}.jpg", self.ordinal).into()
    }

    /// Tests if the image is already present on disk.
    pub fn is_present_at(&self, dir: &Path) -> bool {
        dir.join(self.filename()).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_directory_name() {
        let chapter = Chapter::new(7, "/ep-7".to_owned());

        assert_eq!(chapter.directory(), PathBuf::from("chapter_7"));
    }

    #[test]
    fn image_filename_uses_ordinal() {
        let image = Image {
            url: "https://cdn.test/x.jpg".to_owned(),
            ordinal: 3,
        };

        assert_eq!(image.filename(), PathBuf::from("image_3.jpg"));
    }

    #[test]
    fn image_presence_tracks_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = Image {
            url: "https://cdn.test/x.jpg".to_owned(),
            ordinal: 1,
        };

        assert!(!image.is_present_at(dir.path()));

        std::fs::write(dir.path().join("image_1.jpg"), b"bytes")
            .expect("write image");

        assert!(image.is_present_at(dir.path()));
    }
}
