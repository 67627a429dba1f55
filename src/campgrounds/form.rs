use axum::extract::{multipart::MultipartError, Multipart};
use time::OffsetDateTime;

use crate::images::is_image_filename;

pub(crate) const IMAGES_ONLY: &str = "Only image files are allowed!";
pub(crate) const IMAGE_REQUIRED: &str = "Please choose an image to upload";
pub(crate) const NAME_REQUIRED: &str = "A campground needs a name";

pub(crate) struct Upload {
    pub(crate) filename: String,
    pub(crate) bytes: Vec<u8>,
}

impl Upload {
    /// The name the image host stores it under: upload time, then the
    /// original name.
    pub(crate) fn hosted_name(&self) -> String {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        format!("{millis}{}", self.filename)
    }
}

#[derive(Default)]
pub(crate) struct CampgroundForm {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) image: Option<Upload>,
}

impl CampgroundForm {
    pub(crate) async fn read(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().unwrap_or_default().to_owned();
            match field_name.as_str() {
                "name" => form.name = field.text().await?.trim().to_owned(),
                "description" => form.description = field.text().await?,
                "image" => {
                    let filename = field.file_name().unwrap_or_default().to_owned();
                    let bytes = field.bytes().await?;
                    // browsers send an empty part when no file was picked
                    if !filename.is_empty() {
                        form.image = Some(Upload { filename, bytes: bytes.to_vec() });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// The first reason this submission may not be stored, if any.
    /// Runs before anything is uploaded or written.
    pub(crate) fn problem(&self, image_required: bool) -> Option<&'static str> {
        if self.name.is_empty() {
            return Some(NAME_REQUIRED);
        }
        match &self.image {
            None if image_required => Some(IMAGE_REQUIRED),
            Some(upload) if !is_image_filename(&upload.filename) => Some(IMAGES_ONLY),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, filename: Option<&str>) -> CampgroundForm {
        CampgroundForm {
            name: name.to_owned(),
            description: String::new(),
            image: filename.map(|filename| Upload { filename: filename.to_owned(), bytes: vec![1, 2, 3] }),
        }
    }

    #[test]
    fn creating_needs_a_name_and_an_image() {
        assert_eq!(form("", Some("a.png")).problem(true), Some(NAME_REQUIRED));
        assert_eq!(form("Camp", None).problem(true), Some(IMAGE_REQUIRED));
        assert_eq!(form("Camp", Some("a.exe")).problem(true), Some(IMAGES_ONLY));
        assert_eq!(form("Camp", Some("a.png")).problem(true), None);
    }

    #[test]
    fn editing_may_keep_the_old_image() {
        assert_eq!(form("Camp", None).problem(false), None);
        assert_eq!(form("Camp", Some("a.pdf")).problem(false), Some(IMAGES_ONLY));
    }

    #[test]
    fn hosted_name_keeps_original_suffix() {
        let upload = Upload { filename: "tent.png".to_owned(), bytes: vec![] };
        let hosted = upload.hosted_name();
        assert!(hosted.ends_with("tent.png"));
        assert!(hosted.trim_end_matches("tent.png").chars().all(|c| c.is_ascii_digit()));
    }
}
