use serde::Serialize;

use crate::types::{Project, ProjectImage};

/// Label of the project's main image in the gallery.
pub const MAIN_IMAGE_LABEL: &str = "الواجهة الرئيسية";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    /// `main` for the project's main image, else the image row id
    pub id: String,
    pub url: String,
    pub label: String,
}

/// The project's main image (when set) followed by its gallery images.
pub fn gallery_images(project: &Project, images: &[ProjectImage]) -> Vec<GalleryImage> {
    let main = project
        .main_image
        .as_deref()
        .filter(|url| !url.is_empty())
        .map(|url| GalleryImage {
            id: "main".to_string(),
            url: url.to_string(),
            label: MAIN_IMAGE_LABEL.to_string(),
        });

    main.into_iter()
        .chain(images.iter().map(|image| GalleryImage {
            id: image.id.clone(),
            url: image.image_url.clone(),
            label: image.kind.label().to_string(),
        }))
        .collect()
}

/// Full-screen viewer position over a gallery of `len` images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lightbox {
    index: Option<usize>,
    len: usize,
}

impl Lightbox {
    pub fn new(len: usize) -> Self {
        Self { index: None, len }
    }

    /// Open at `index`; out-of-range indices are ignored.
    pub fn open(&mut self, index: usize) {
        if index < self.len {
            self.index = Some(index);
        }
    }

    pub fn close(&mut self) {
        self.index = None;
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_open(&self) -> bool {
        self.index.is_some()
    }

    /// Advance, wrapping from the last image to the first.
    pub fn next(&mut self) {
        if let Some(i) = self.index {
            self.index = Some(if i + 1 < self.len { i + 1 } else { 0 });
        }
    }

    /// Go back, wrapping from the first image to the last.
    pub fn previous(&mut self) {
        if let Some(i) = self.index {
            self.index = Some(if i > 0 { i - 1 } else { self.len - 1 });
        }
    }

    /// `3 / 7` style position, when open.
    pub fn position(&self) -> Option<String> {
        self.index.map(|i| format!("{} / {}", i + 1, self.len))
    }
}

/// One image opened in the lightbox, with the images either side of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightboxView<'a> {
    pub position: String,
    pub current: &'a GalleryImage,
    pub previous: &'a GalleryImage,
    pub next: &'a GalleryImage,
}

/// Open the lightbox on the `number`th image (1-based).
pub fn open_lightbox(images: &[GalleryImage], number: usize) -> Option<LightboxView<'_>> {
    let mut lightbox = Lightbox::new(images.len());
    lightbox.open(number.checked_sub(1)?);
    let index = lightbox.index()?;
    let position = lightbox.position()?;

    let mut previous = lightbox;
    previous.previous();
    let mut next = lightbox;
    next.next();

    Some(LightboxView {
        position,
        current: &images[index],
        previous: &images[previous.index()?],
        next: &images[next.index()?],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageKind;

    fn image(id: &str, kind: ImageKind) -> ProjectImage {
        ProjectImage {
            id: id.to_string(),
            project_id: "p1".to_string(),
            image_url: format!("https://cdn.test/{id}.jpg"),
            kind,
        }
    }

    #[test]
    fn test_main_image_comes_first() {
        let project = Project {
            main_image: Some("https://cdn.test/main.jpg".to_string()),
            ..Default::default()
        };
        let images = gallery_images(
            &project,
            &[image("i1", ImageKind::Exterior), image("i2", ImageKind::Plan)],
        );

        let labels: Vec<&str> = images.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec![MAIN_IMAGE_LABEL, "صورة خارجية", "صورة"]);
        assert_eq!(images[0].id, "main");
    }

    #[test]
    fn test_without_main_image() {
        let images = gallery_images(&Project::default(), &[image("i1", ImageKind::Interior)]);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].label, "صورة داخلية");
    }

    #[test]
    fn test_lightbox_wraps() {
        let mut lightbox = Lightbox::new(3);
        lightbox.next();
        assert!(!lightbox.is_open());

        lightbox.open(2);
        lightbox.next();
        assert_eq!(lightbox.index(), Some(0));
        lightbox.previous();
        assert_eq!(lightbox.index(), Some(2));
        assert_eq!(lightbox.position().as_deref(), Some("3 / 3"));

        lightbox.close();
        assert_eq!(lightbox.index(), None);
    }

    #[test]
    fn test_lightbox_ignores_out_of_range() {
        let mut lightbox = Lightbox::new(0);
        lightbox.open(0);
        assert!(!lightbox.is_open());
    }

    #[test]
    fn test_open_lightbox_shows_neighbours() {
        let project = Project {
            main_image: Some("https://cdn.test/main.jpg".to_string()),
            ..Default::default()
        };
        let images = gallery_images(
            &project,
            &[image("i1", ImageKind::Exterior), image("i2", ImageKind::Plan)],
        );

        let view = open_lightbox(&images, 1).unwrap();
        assert_eq!(view.position, "1 / 3");
        assert_eq!(view.current.id, "main");
        assert_eq!(view.previous.id, "i2");
        assert_eq!(view.next.id, "i1");

        assert!(open_lightbox(&images, 0).is_none());
        assert!(open_lightbox(&images, 4).is_none());
    }
}
