// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::{FieldDraft, FieldType, FormatKind, ModelFieldId, ModelId, ProjectUrlId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpsert {
    pub field_name: String,
    pub is_required: bool,
    pub is_array: bool,
    pub field_type: FieldType,
    pub format: FormatKind,
    pub enumeration: String,
    pub description: String,
    /// Present when editing an existing field; the persistence collaborator
    /// updates this document instead of creating one.
    pub target: Option<ModelFieldId>,
}

impl FieldUpsert {
    pub fn from_draft(draft: &FieldDraft, target: Option<ModelFieldId>) -> Self {
        Self {
            field_name: draft.field_name.clone(),
            is_required: draft.is_required,
            is_array: draft.is_array,
            field_type: draft.field_type,
            format: draft.format,
            enumeration: draft.enumeration.clone(),
            description: draft.description.clone(),
            target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Intent {
    UpsertField(FieldUpsert),
    DeleteField {
        field_id: ModelFieldId,
    },
    UpsertModel {
        name: String,
        description: String,
        target: Option<ModelId>,
    },
    UpsertProjectUrl {
        label: String,
        url: String,
        description: String,
        target: Option<ProjectUrlId>,
    },
    DeleteProjectUrl {
        url_id: ProjectUrlId,
    },
}

impl Intent {
    pub const fn kind(&self) -> IntentKind {
        match self {
            Self::UpsertField(_) => IntentKind::UpsertField,
            Self::DeleteField { .. } => IntentKind::DeleteField,
            Self::UpsertModel { .. } => IntentKind::UpsertModel,
            Self::UpsertProjectUrl { .. } => IntentKind::UpsertProjectUrl,
            Self::DeleteProjectUrl { .. } => IntentKind::DeleteProjectUrl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentKind {
    UpsertField,
    DeleteField,
    UpsertModel,
    UpsertProjectUrl,
    DeleteProjectUrl,
}

impl IntentKind {
    pub const ALL: [Self; 5] = [
        Self::UpsertField,
        Self::DeleteField,
        Self::UpsertModel,
        Self::UpsertProjectUrl,
        Self::DeleteProjectUrl,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpsertField => "upsert_field",
            Self::DeleteField => "delete_field",
            Self::UpsertModel => "upsert_model",
            Self::UpsertProjectUrl => "upsert_project_url",
            Self::DeleteProjectUrl => "delete_project_url",
        }
    }
}
