// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::ids::*;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct DocTimestamp {
    pub seconds: i64,
    pub nanoseconds: i32,
}

impl DocTimestamp {
    pub const fn new(seconds: i64, nanoseconds: i32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    pub fn from_datetime(value: OffsetDateTime) -> Self {
        Self {
            seconds: value.unix_timestamp(),
            nanoseconds: value.nanosecond() as i32,
        }
    }

    pub fn to_datetime(self) -> Result<OffsetDateTime> {
        let base = OffsetDateTime::from_unix_timestamp(self.seconds)?;
        Ok(base + Duration::nanoseconds(i64::from(self.nanoseconds)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSettings {
    pub updated_at: DocTimestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMemberSettings {
    pub seq: i64,
    pub updated_at: DocTimestamp,
}

/// One attribute value plus its own last-writer metadata, so concurrent
/// editors conflict per attribute rather than per record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell<T> {
    pub value: T,
    pub created_at: DocTimestamp,
    pub updated_at: DocTimestamp,
    pub created_by: MemberId,
    pub updated_by: MemberId,
    #[serde(default)]
    pub settings_by_member: BTreeMap<MemberId, MemberSettings>,
}

impl<T> Cell<T> {
    pub fn new(value: T, author: MemberId, at: DocTimestamp) -> Self {
        let settings_by_member =
            BTreeMap::from([(author.clone(), MemberSettings { updated_at: at })]);
        Self {
            value,
            created_at: at,
            updated_at: at,
            created_by: author.clone(),
            updated_by: author,
            settings_by_member,
        }
    }

    pub fn touch(&mut self, value: T, author: MemberId, at: DocTimestamp) {
        self.value = value;
        self.updated_at = at;
        self.updated_by = author.clone();
        self.settings_by_member
            .insert(author, MemberSettings { updated_at: at });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Number,
    String,
    Boolean,
    Object,
}

impl FieldType {
    pub const ALL: [Self; 5] = [
        Self::Integer,
        Self::Number,
        Self::String,
        Self::Boolean,
        Self::Object,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    pub const fn formats(self) -> &'static [FormatKind] {
        match self {
            Self::Integer => &[FormatKind::Int32, FormatKind::Int64],
            Self::Number => &[FormatKind::None, FormatKind::Float, FormatKind::Double],
            Self::String => &[
                FormatKind::None,
                FormatKind::Date,
                FormatKind::DateTime,
                FormatKind::Password,
                FormatKind::Byte,
                FormatKind::Binary,
            ],
            Self::Boolean => &[FormatKind::None],
            Self::Object => &[FormatKind::NewModel],
        }
    }

    pub fn default_format(self) -> FormatKind {
        self.formats()[0]
    }

    pub fn allows(self, format: FormatKind) -> bool {
        self.formats().contains(&format)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatKind {
    None,
    NewModel,
    Int32,
    Int64,
    Float,
    Double,
    Byte,
    Binary,
    Date,
    DateTime,
    Password,
}

impl FormatKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::NewModel => "new-model",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float => "float",
            Self::Double => "double",
            Self::Byte => "byte",
            Self::Binary => "binary",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Password => "password",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "new-model" => Some(Self::NewModel),
            "int32" => Some(Self::Int32),
            "int64" => Some(Self::Int64),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            "byte" => Some(Self::Byte),
            "binary" => Some(Self::Binary),
            "date" => Some(Self::Date),
            "date-time" => Some(Self::DateTime),
            "password" => Some(Self::Password),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDoc {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub members: BTreeMap<MemberId, bool>,
    #[serde(default)]
    pub owners: BTreeMap<MemberId, bool>,
    #[serde(default)]
    pub managers: BTreeMap<MemberId, bool>,
    #[serde(default)]
    pub guests: BTreeMap<MemberId, bool>,
    #[serde(default)]
    pub invitees: BTreeMap<MemberId, bool>,
    #[serde(default)]
    pub settings_by_member: BTreeMap<MemberId, ProjectMemberSettings>,
    pub created_at: DocTimestamp,
    pub updated_at: DocTimestamp,
    pub created_by: MemberId,
    pub updated_by: MemberId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUrlDoc {
    pub id: ProjectUrlId,
    pub project_id: ProjectId,
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settings_by_member: BTreeMap<MemberId, MemberSettings>,
    pub created_at: DocTimestamp,
    pub updated_at: DocTimestamp,
    pub created_by: MemberId,
    pub updated_by: MemberId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDoc {
    pub id: ModelId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub extends: Option<ModelId>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub referenced_by_field: BTreeMap<ModelFieldId, bool>,
    #[serde(default)]
    pub extended_by_model: BTreeMap<ModelId, bool>,
    #[serde(default)]
    pub settings_by_member: BTreeMap<MemberId, MemberSettings>,
    pub created_at: DocTimestamp,
    pub updated_at: DocTimestamp,
    pub created_by: MemberId,
    pub updated_by: MemberId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFieldDoc {
    pub id: ModelFieldId,
    pub project_id: ProjectId,
    pub model_id: ModelId,
    #[serde(default)]
    pub reference_model_id: Option<ModelId>,
    pub field_name: Cell<String>,
    pub is_required: Cell<bool>,
    pub is_array: Cell<bool>,
    pub field_type: Cell<FieldType>,
    pub format: Cell<FormatKind>,
    #[serde(rename = "enum")]
    pub enumeration: Cell<String>,
    pub description: Cell<String>,
    #[serde(default)]
    pub settings_by_member: BTreeMap<MemberId, MemberSettings>,
    pub created_at: DocTimestamp,
    pub updated_at: DocTimestamp,
    pub created_by: MemberId,
    pub updated_by: MemberId,
}
