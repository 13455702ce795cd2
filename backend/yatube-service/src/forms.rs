//! Form binding and validation for the post and comment forms.
//!
//! Fields are an explicit tagged set of kinds — plain text, a reference
//! picked from existing choices, a file upload — sharing one
//! `validate(raw) -> Result<value, message>` contract. A bound form
//! keeps the submitted values next to per-field error messages so an
//! invalid submission re-renders with everything the user typed.

use std::collections::{BTreeMap, HashMap};

use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use serde::Deserialize;

use crate::error::{AppError, Result};

/// Validation error messages
pub mod messages {
    pub const TEXT_REQUIRED: &str = "Text must not be empty";
    pub const NOT_AN_IMAGE: &str = "Upload a valid image";
    pub const EXPECTED_TEXT: &str = "Expected a text value";
    pub const UNKNOWN_GROUP: &str = "Group does not exist";
}

/// An uploaded file as received from the form
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A raw submitted field before validation
#[derive(Debug, Clone)]
pub enum RawField {
    Text(String),
    File(Upload),
}

/// A validated field value
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Reference(String),
    Upload(Upload),
}

/// The kinds of field a form can declare
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Free text, optionally required non-empty
    Text { required: bool },
    /// A reference resolved against existing records (by slug); existence
    /// is checked by the caller, which owns database access
    ChoiceRef,
    /// An optional file upload that must decode as an image
    File,
}

impl FieldKind {
    /// Validate a raw submission against this kind.
    pub fn validate(&self, raw: Option<&RawField>) -> std::result::Result<Option<FieldValue>, &'static str> {
        match (self, raw) {
            (FieldKind::Text { required }, None) => {
                if *required {
                    Err(messages::TEXT_REQUIRED)
                } else {
                    Ok(None)
                }
            }
            (FieldKind::Text { required }, Some(RawField::Text(value))) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    if *required {
                        Err(messages::TEXT_REQUIRED)
                    } else {
                        Ok(None)
                    }
                } else {
                    Ok(Some(FieldValue::Text(trimmed.to_string())))
                }
            }
            (FieldKind::Text { .. }, Some(RawField::File(_))) => Err(messages::EXPECTED_TEXT),
            (FieldKind::ChoiceRef, None) => Ok(None),
            (FieldKind::ChoiceRef, Some(RawField::Text(value))) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(FieldValue::Reference(trimmed.to_string())))
                }
            }
            (FieldKind::ChoiceRef, Some(RawField::File(_))) => Err(messages::EXPECTED_TEXT),
            (FieldKind::File, None) => Ok(None),
            // Browsers submit an empty file part when the input is left blank
            (FieldKind::File, Some(RawField::Text(value))) if value.is_empty() => Ok(None),
            (FieldKind::File, Some(RawField::Text(_))) => Err(messages::NOT_AN_IMAGE),
            (FieldKind::File, Some(RawField::File(upload))) => {
                if upload.bytes.is_empty() {
                    return Ok(None);
                }
                match image::guess_format(&upload.bytes) {
                    Ok(_) => Ok(Some(FieldValue::Upload(upload.clone()))),
                    Err(_) => Err(messages::NOT_AN_IMAGE),
                }
            }
        }
    }
}

/// Per-field error messages, ordered for stable rendering
pub type FormErrors = BTreeMap<&'static str, Vec<String>>;

/// The post form: text (required), group (optional choice), image
/// (optional upload).
#[derive(Debug, Default)]
pub struct PostForm {
    pub text: String,
    pub group: Option<String>,
    pub image: Option<Upload>,
    errors: FormErrors,
}

impl PostForm {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("text", FieldKind::Text { required: true }),
        ("group", FieldKind::ChoiceRef),
        ("image", FieldKind::File),
    ];

    /// Bind raw submitted fields, collecting per-field errors. Submitted
    /// values are preserved even when invalid.
    pub fn bind(fields: &HashMap<String, RawField>) -> Self {
        let mut form = PostForm::default();

        for &(name, kind) in Self::FIELDS {
            match kind.validate(fields.get(name)) {
                Ok(Some(FieldValue::Text(value))) => form.text = value,
                Ok(Some(FieldValue::Reference(value))) => form.group = Some(value),
                Ok(Some(FieldValue::Upload(upload))) => form.image = Some(upload),
                Ok(None) => {}
                Err(message) => {
                    // keep whatever text was typed so it re-renders
                    if name == "text" {
                        if let Some(RawField::Text(value)) = fields.get(name) {
                            form.text = value.clone();
                        }
                    }
                    form.add_error(name, message);
                }
            }
        }

        form
    }

    pub fn add_error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// The JSON rendering of the form for 200 responses: submitted
    /// values plus field errors.
    pub fn render(&self, is_edit: bool) -> serde_json::Value {
        serde_json::json!({
            "form": {
                "values": {
                    "text": self.text,
                    "group": self.group,
                },
                "errors": self.errors,
            },
            "is_edit": is_edit,
        })
    }
}

/// The comment form: a single required text field, urlencoded.
#[derive(Debug, Deserialize)]
pub struct CommentFormData {
    #[serde(default)]
    pub text: String,
}

/// Validate comment text with the same field contract the post form uses.
pub fn validate_comment_text(raw: &str) -> Option<String> {
    let kind = FieldKind::Text { required: true };
    match kind.validate(Some(&RawField::Text(raw.to_string()))) {
        Ok(Some(FieldValue::Text(value))) => Some(value),
        _ => None,
    }
}

/// Drain a multipart payload into named raw fields, enforcing the upload
/// size cap across all parts.
pub async fn collect_multipart(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<HashMap<String, RawField>> {
    let mut fields = HashMap::new();
    let mut received = 0usize;

    while let Some(mut field) = payload.try_next().await? {
        let (name, filename) = {
            let Some(disposition) = field.content_disposition() else {
                continue;
            };
            let Some(name) = disposition.get_name() else {
                continue;
            };
            (
                name.to_string(),
                disposition.get_filename().map(|f| f.to_string()),
            )
        };

        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            received += chunk.len();
            if received > max_bytes {
                return Err(AppError::BadRequest(
                    "upload exceeds the size limit".to_string(),
                ));
            }
            data.extend_from_slice(&chunk);
        }

        let raw = match filename {
            Some(filename) if !filename.is_empty() => RawField::File(Upload {
                filename,
                bytes: data,
            }),
            _ => RawField::Text(String::from_utf8(data).map_err(|_| {
                AppError::BadRequest("form field is not valid UTF-8".to_string())
            })?),
        };
        fields.insert(name, raw);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_fields(entries: &[(&str, &str)]) -> HashMap<String, RawField> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), RawField::Text(v.to_string())))
            .collect()
    }

    #[test]
    fn empty_text_is_a_field_error() {
        let form = PostForm::bind(&text_fields(&[("text", "")]));
        assert!(!form.is_valid());
        assert_eq!(
            form.errors().get("text").map(|e| e[0].as_str()),
            Some(messages::TEXT_REQUIRED)
        );
    }

    #[test]
    fn whitespace_only_text_is_rejected() {
        let form = PostForm::bind(&text_fields(&[("text", "   \n\t ")]));
        assert!(!form.is_valid());
    }

    #[test]
    fn missing_text_field_is_rejected() {
        let form = PostForm::bind(&HashMap::new());
        assert!(!form.is_valid());
    }

    #[test]
    fn valid_text_without_group_binds() {
        let form = PostForm::bind(&text_fields(&[("text", "Тестовый пост")]));
        assert!(form.is_valid());
        assert_eq!(form.text, "Тестовый пост");
        assert!(form.group.is_none());
        assert!(form.image.is_none());
    }

    #[test]
    fn empty_group_choice_means_no_group() {
        let form = PostForm::bind(&text_fields(&[("text", "hi there"), ("group", "")]));
        assert!(form.is_valid());
        assert!(form.group.is_none());
    }

    #[test]
    fn group_slug_is_preserved() {
        let form = PostForm::bind(&text_fields(&[("text", "hi there"), ("group", "cats")]));
        assert_eq!(form.group.as_deref(), Some("cats"));
    }

    #[test]
    fn non_image_upload_is_rejected() {
        let mut fields = text_fields(&[("text", "hi there")]);
        fields.insert(
            "image".to_string(),
            RawField::File(Upload {
                filename: "notes.txt".to_string(),
                bytes: b"plain text".to_vec(),
            }),
        );
        let form = PostForm::bind(&fields);
        assert!(!form.is_valid());
        assert_eq!(
            form.errors().get("image").map(|e| e[0].as_str()),
            Some(messages::NOT_AN_IMAGE)
        );
    }

    #[test]
    fn valid_png_upload_binds() {
        // Smallest possible PNG signature followed by padding; guess_format
        // only sniffs the magic bytes.
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0u8; 16]);

        let mut fields = text_fields(&[("text", "hi there")]);
        fields.insert(
            "image".to_string(),
            RawField::File(Upload {
                filename: "pic.png".to_string(),
                bytes,
            }),
        );
        let form = PostForm::bind(&fields);
        assert!(form.is_valid());
        assert!(form.image.is_some());
    }

    #[test]
    fn empty_file_part_means_no_image() {
        let mut fields = text_fields(&[("text", "hi there")]);
        fields.insert(
            "image".to_string(),
            RawField::File(Upload {
                filename: "pic.png".to_string(),
                bytes: Vec::new(),
            }),
        );
        let form = PostForm::bind(&fields);
        assert!(form.is_valid());
        assert!(form.image.is_none());
    }

    #[test]
    fn invalid_form_preserves_submitted_text() {
        let mut fields = text_fields(&[("text", "  ")]);
        fields.insert(
            "image".to_string(),
            RawField::File(Upload {
                filename: "notes.txt".to_string(),
                bytes: b"nope".to_vec(),
            }),
        );
        let form = PostForm::bind(&fields);
        let rendered = form.render(false);
        assert_eq!(rendered["form"]["values"]["text"], "  ");
        assert_eq!(rendered["is_edit"], false);
    }

    #[test]
    fn comment_text_validation_matches_post_contract() {
        assert_eq!(validate_comment_text("  hello  "), Some("hello".to_string()));
        assert_eq!(validate_comment_text("   "), None);
        assert_eq!(validate_comment_text(""), None);
    }
}
