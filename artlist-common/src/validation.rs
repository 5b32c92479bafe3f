//! Form input normalization and field-level validation

use serde::Serialize;

/// Add-form submission, values trimmed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistForm {
    pub name: String,
    pub description: String,
    pub image_url: String,
    /// Pending-list entry the form was populated from, if any
    pub original_name: String,
}

impl ArtistForm {
    pub fn new(name: &str, description: &str, image_url: &str, original_name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            image_url: image_url.trim().to_string(),
            original_name: original_name.trim().to_string(),
        }
    }

    /// Required-field checks; the duplicate check needs the master list
    pub fn validate(&self) -> FieldErrors {
        FieldErrors {
            name: required(&self.name, FieldErrors::NAME_REQUIRED),
            description: required(&self.description, FieldErrors::DESCRIPTION_REQUIRED),
            image: required(&self.image_url, FieldErrors::IMAGE_REQUIRED),
        }
    }
}

/// Edit-form submission; the image URL may be left empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistEdit {
    pub name: String,
    pub description: String,
    pub image_url: String,
}

impl ArtistEdit {
    pub fn new(name: &str, description: &str, image_url: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            image_url: image_url.trim().to_string(),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        FieldErrors {
            name: required(&self.name, FieldErrors::NAME_REQUIRED),
            description: required(&self.description, FieldErrors::DESCRIPTION_REQUIRED),
            image: None,
        }
    }
}

/// Per-field messages shown next to the inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl FieldErrors {
    pub const NAME_REQUIRED: &'static str = "Name is required.";
    pub const DESCRIPTION_REQUIRED: &'static str = "Description is required.";
    pub const IMAGE_REQUIRED: &'static str = "Image URL is required.";
    pub const NAME_TAKEN: &'static str = "This name is already in the master list!";
    pub const THUMBNAIL_FAILED: &'static str =
        "Warning: could not create thumbnail from image URL.";

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.image.is_none()
    }

    pub fn name_taken() -> Self {
        Self {
            name: Some(Self::NAME_TAKEN.to_string()),
            ..Self::default()
        }
    }

    pub fn thumbnail_failed() -> Self {
        Self {
            image: Some(Self::THUMBNAIL_FAILED.to_string()),
            ..Self::default()
        }
    }
}

fn required(value: &str, message: &str) -> Option<String> {
    value.trim().is_empty().then(|| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_values_are_trimmed() {
        let form = ArtistForm::new("  Ada ", "\tdesc\n", " http://x ", " Ada");
        assert_eq!(form.name, "Ada");
        assert_eq!(form.description, "desc");
        assert_eq!(form.image_url, "http://x");
        assert_eq!(form.original_name, "Ada");
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_every_missing_field_gets_a_message() {
        let errors = ArtistForm::new(" ", "", "", "").validate();
        assert_eq!(errors.name.as_deref(), Some(FieldErrors::NAME_REQUIRED));
        assert_eq!(errors.description.as_deref(), Some(FieldErrors::DESCRIPTION_REQUIRED));
        assert_eq!(errors.image.as_deref(), Some(FieldErrors::IMAGE_REQUIRED));
    }

    #[test]
    fn test_edit_does_not_require_image_url() {
        let errors = ArtistEdit::new("Ada", "desc", "").validate();
        assert!(errors.is_empty());

        let errors = ArtistEdit::new("", "", "").validate();
        assert!(errors.name.is_some());
        assert!(errors.description.is_some());
        assert!(errors.image.is_none());
    }
}
