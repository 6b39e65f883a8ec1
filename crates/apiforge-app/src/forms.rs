// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use url::Url;

use crate::{FieldType, FormatKind, ModelFieldDoc};

pub const MAX_FIELD_NAME_LEN: usize = 40;
pub const MAX_FIELD_DESCRIPTION_LEN: usize = 200;
pub const MAX_MODEL_NAME_LEN: usize = 40;
pub const MAX_MODEL_DESCRIPTION_LEN: usize = 100;
pub const MAX_URL_DESCRIPTION_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNameError {
    Required,
    TooLong,
    Duplicate,
}

impl std::fmt::Display for FieldNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => f.write_str("field name is required"),
            Self::TooLong => f.write_str("field name must be 40 characters or fewer"),
            Self::Duplicate => f.write_str("another field already uses this name"),
        }
    }
}

impl std::error::Error for FieldNameError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionError {
    TooLong,
}

impl std::fmt::Display for DescriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLong => f.write_str("description is too long"),
        }
    }
}

impl std::error::Error for DescriptionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DraftErrors {
    pub field_name: Option<FieldNameError>,
    pub description: Option<DescriptionError>,
}

impl DraftErrors {
    pub const fn is_empty(&self) -> bool {
        self.field_name.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDraft {
    pub field_name: String,
    pub is_required: bool,
    pub is_array: bool,
    pub field_type: FieldType,
    pub format: FormatKind,
    pub enumeration: String,
    pub description: String,
}

impl Default for FieldDraft {
    fn default() -> Self {
        Self {
            field_name: String::new(),
            is_required: true,
            is_array: false,
            field_type: FieldType::String,
            format: FieldType::String.default_format(),
            enumeration: String::new(),
            description: String::new(),
        }
    }
}

impl FieldDraft {
    pub fn from_field(field: &ModelFieldDoc) -> Self {
        Self {
            field_name: field.field_name.value.clone(),
            is_required: field.is_required.value,
            is_array: field.is_array.value,
            field_type: field.field_type.value,
            format: field.format.value,
            enumeration: field.enumeration.value.clone(),
            description: field.description.value.clone(),
        }
    }

    /// Applies a field-type change and keeps the format inside the new
    /// type's allowed set. Returns whether the format had to be reset.
    pub fn set_field_type(&mut self, field_type: FieldType) -> bool {
        self.field_type = field_type;
        if field_type.allows(self.format) {
            return false;
        }
        self.format = field_type.default_format();
        true
    }

    pub fn validate(&self, sibling_names: &[&str]) -> DraftErrors {
        let mut errors = DraftErrors::default();
        if self.field_name.trim().is_empty() {
            errors.field_name = Some(FieldNameError::Required);
        } else if self.field_name.chars().count() > MAX_FIELD_NAME_LEN {
            errors.field_name = Some(FieldNameError::TooLong);
        } else if sibling_names.iter().any(|name| *name == self.field_name) {
            errors.field_name = Some(FieldNameError::Duplicate);
        }
        if self.description.chars().count() > MAX_FIELD_DESCRIPTION_LEN {
            errors.description = Some(DescriptionError::TooLong);
        }
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelNameError {
    Required,
    TooLong,
    Duplicate,
}

impl std::fmt::Display for ModelNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => f.write_str("model name is required"),
            Self::TooLong => f.write_str("model name must be 40 characters or fewer"),
            Self::Duplicate => f.write_str("another model already uses this name"),
        }
    }
}

impl std::error::Error for ModelNameError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelNameErrors {
    pub name: Option<ModelNameError>,
    pub description: Option<DescriptionError>,
}

impl ModelNameErrors {
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelNameDraft {
    pub name: String,
    pub description: String,
}

impl ModelNameDraft {
    pub fn validate(&self, existing_names: &[&str]) -> ModelNameErrors {
        let mut errors = ModelNameErrors::default();
        if self.name.trim().is_empty() {
            errors.name = Some(ModelNameError::Required);
        } else if self.name.chars().count() > MAX_MODEL_NAME_LEN {
            errors.name = Some(ModelNameError::TooLong);
        } else if existing_names.iter().any(|name| *name == self.name) {
            errors.name = Some(ModelNameError::Duplicate);
        }
        if self.description.chars().count() > MAX_MODEL_DESCRIPTION_LEN {
            errors.description = Some(DescriptionError::TooLong);
        }
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlLabelError {
    Required,
}

impl std::fmt::Display for UrlLabelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => f.write_str("a label is required"),
        }
    }
}

impl std::error::Error for UrlLabelError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlValueError {
    Required,
    Invalid,
}

impl std::fmt::Display for UrlValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => f.write_str("a URL is required"),
            Self::Invalid => f.write_str("enter an absolute http(s) URL"),
        }
    }
}

impl std::error::Error for UrlValueError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectUrlErrors {
    pub label: Option<UrlLabelError>,
    pub url: Option<UrlValueError>,
    pub description: Option<DescriptionError>,
}

impl ProjectUrlErrors {
    pub const fn is_empty(&self) -> bool {
        self.label.is_none() && self.url.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectUrlDraft {
    pub label: String,
    pub url: String,
    pub description: String,
}

impl ProjectUrlDraft {
    pub fn validate(&self) -> ProjectUrlErrors {
        let mut errors = ProjectUrlErrors::default();
        if self.label.trim().is_empty() {
            errors.label = Some(UrlLabelError::Required);
        }
        if self.url.trim().is_empty() {
            errors.url = Some(UrlValueError::Required);
        } else {
            let parsed = Url::parse(self.url.trim());
            let is_http = parsed
                .as_ref()
                .map(|url| matches!(url.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !is_http {
                errors.url = Some(UrlValueError::Invalid);
            }
        }
        if self.description.chars().count() > MAX_URL_DESCRIPTION_LEN {
            errors.description = Some(DescriptionError::TooLong);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FieldDraft, FieldNameError, ModelNameDraft, ModelNameError, ProjectUrlDraft, UrlValueError,
    };
    use crate::{FieldType, FormatKind};

    #[test]
    fn blank_draft_defaults() {
        let draft = FieldDraft::default();
        assert_eq!(draft.field_type, FieldType::String);
        assert_eq!(draft.format, FormatKind::None);
        assert!(draft.is_required);
        assert!(!draft.is_array);
        assert!(draft.field_name.is_empty());
    }

    #[test]
    fn blank_draft_fails_required_name() {
        let errors = FieldDraft::default().validate(&[]);
        assert_eq!(errors.field_name, Some(FieldNameError::Required));
    }

    #[test]
    fn long_field_name_rejected() {
        let draft = FieldDraft {
            field_name: "f".repeat(41),
            ..FieldDraft::default()
        };
        assert_eq!(
            draft.validate(&[]).field_name,
            Some(FieldNameError::TooLong)
        );
    }

    #[test]
    fn duplicate_field_name_is_case_sensitive() {
        let draft = FieldDraft {
            field_name: "userId".to_owned(),
            ..FieldDraft::default()
        };
        assert_eq!(
            draft.validate(&["userId"]).field_name,
            Some(FieldNameError::Duplicate)
        );
        assert!(draft.validate(&["userid"]).is_empty());
    }

    #[test]
    fn long_description_rejected() {
        let draft = FieldDraft {
            field_name: "ok".to_owned(),
            description: "d".repeat(201),
            ..FieldDraft::default()
        };
        let errors = draft.validate(&[]);
        assert!(errors.field_name.is_none());
        assert!(errors.description.is_some());
    }

    #[test]
    fn field_type_change_preserves_still_valid_format() {
        let mut draft = FieldDraft {
            field_type: FieldType::Number,
            format: FormatKind::None,
            ..FieldDraft::default()
        };
        assert!(!draft.set_field_type(FieldType::String));
        assert_eq!(draft.format, FormatKind::None);
    }

    #[test]
    fn field_type_change_resets_invalid_format() {
        let mut draft = FieldDraft {
            field_type: FieldType::Number,
            format: FormatKind::Double,
            ..FieldDraft::default()
        };
        assert!(draft.set_field_type(FieldType::Integer));
        assert_eq!(draft.format, FormatKind::Int32);

        assert!(draft.set_field_type(FieldType::Object));
        assert_eq!(draft.format, FormatKind::NewModel);
    }

    #[test]
    fn model_name_limits() {
        let draft = ModelNameDraft {
            name: "User".to_owned(),
            description: String::new(),
        };
        assert!(draft.validate(&["Order"]).is_empty());
        assert_eq!(
            draft.validate(&["User"]).name,
            Some(ModelNameError::Duplicate)
        );

        let long = ModelNameDraft {
            name: "User".to_owned(),
            description: "d".repeat(101),
        };
        assert!(long.validate(&[]).description.is_some());
    }

    #[test]
    fn project_url_requires_absolute_http() {
        let draft = ProjectUrlDraft {
            label: "prod".to_owned(),
            url: "https://api.example.com/v1".to_owned(),
            description: String::new(),
        };
        assert!(draft.validate().is_empty());

        let relative = ProjectUrlDraft {
            url: "/v1".to_owned(),
            ..draft.clone()
        };
        assert_eq!(relative.validate().url, Some(UrlValueError::Invalid));

        let ftp = ProjectUrlDraft {
            url: "ftp://example.com".to_owned(),
            ..draft
        };
        assert_eq!(ftp.validate().url, Some(UrlValueError::Invalid));
    }
}
