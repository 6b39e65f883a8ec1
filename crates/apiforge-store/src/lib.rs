// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use apiforge_app::{
    IntentKind, ModelDoc, ModelFieldDoc, ModelFieldId, ModelFormId, ModelId, ProjectDoc,
    ProjectId, ProjectUrlDoc,
};
use log::debug;

mod maps;

pub use maps::{NestedMap, RecordMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Projects,
    CurrentProject,
    ProjectUrls,
    Models,
    Fields,
    ModelForms,
    ModelFields,
}

impl Category {
    pub const ALL: [Self; 7] = [
        Self::Projects,
        Self::CurrentProject,
        Self::ProjectUrls,
        Self::Models,
        Self::Fields,
        Self::ModelForms,
        Self::ModelFields,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::CurrentProject => "project",
            Self::ProjectUrls => "project_urls",
            Self::Models => "models",
            Self::Fields => "fields",
            Self::ModelForms => "model_forms",
            Self::ModelFields => "model_fields",
        }
    }
}

/// A full replacement for one category slice, as delivered by the remote
/// listener pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlicePayload {
    Projects(Vec<ProjectDoc>),
    CurrentProject(ProjectDoc),
    ProjectUrls(BTreeMap<ProjectId, Vec<ProjectUrlDoc>>),
    Models(BTreeMap<ProjectId, BTreeMap<ModelId, ModelDoc>>),
    Fields(BTreeMap<ModelId, BTreeMap<ModelFieldId, ModelFieldDoc>>),
    ModelForms(BTreeMap<ModelFormId, ModelId>),
    ModelFields(Vec<ModelFieldDoc>),
}

impl SlicePayload {
    pub const fn category(&self) -> Category {
        match self {
            Self::Projects(_) => Category::Projects,
            Self::CurrentProject(_) => Category::CurrentProject,
            Self::ProjectUrls(_) => Category::ProjectUrls,
            Self::Models(_) => Category::Models,
            Self::Fields(_) => Category::Fields,
            Self::ModelForms(_) => Category::ModelForms,
            Self::ModelFields(_) => Category::ModelFields,
        }
    }
}

/// Local mirror of the remote nested collections. A slice that was never
/// received stays absent, which readers can tell apart from present-but-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataState {
    projects: Option<Vec<ProjectDoc>>,
    current_project: Option<ProjectDoc>,
    project_urls: Option<RecordMap<ProjectId, Vec<ProjectUrlDoc>>>,
    models: Option<NestedMap<ProjectId, ModelId, ModelDoc>>,
    fields: Option<NestedMap<ModelId, ModelFieldId, ModelFieldDoc>>,
    model_forms: Option<RecordMap<ModelFormId, ModelId>>,
    model_fields: Option<Vec<ModelFieldDoc>>,
}

impl DataState {
    pub fn receive(&mut self, payload: SlicePayload) {
        match payload {
            SlicePayload::Projects(projects) => self.projects = Some(projects),
            SlicePayload::CurrentProject(project) => self.current_project = Some(project),
            SlicePayload::ProjectUrls(urls) => self.project_urls = Some(urls.into()),
            SlicePayload::Models(models) => self.models = Some(models.into()),
            SlicePayload::Fields(fields) => self.fields = Some(fields.into()),
            SlicePayload::ModelForms(forms) => self.model_forms = Some(forms.into()),
            SlicePayload::ModelFields(fields) => self.model_fields = Some(fields),
        }
    }

    /// Applies several top-level slice replacements in one state update.
    pub fn receive_batch(&mut self, payloads: impl IntoIterator<Item = SlicePayload>) {
        for payload in payloads {
            self.receive(payload);
        }
    }

    pub fn clear(&mut self, category: Category) {
        match category {
            Category::Projects => self.projects = None,
            Category::CurrentProject => self.current_project = None,
            Category::ProjectUrls => self.project_urls = None,
            Category::Models => self.models = None,
            Category::Fields => self.fields = None,
            Category::ModelForms => self.model_forms = None,
            Category::ModelFields => self.model_fields = None,
        }
    }

    pub fn receive_project_urls(&mut self, project_id: ProjectId, urls: Vec<ProjectUrlDoc>) {
        self.project_urls
            .get_or_insert_with(RecordMap::new)
            .receive_record(project_id, urls);
    }

    pub fn clear_project_urls(&mut self, project_id: &ProjectId) -> bool {
        self.project_urls
            .as_mut()
            .is_some_and(|urls| urls.clear_record(project_id))
    }

    pub fn receive_model_branch(&mut self, project_id: ProjectId, models: BTreeMap<ModelId, ModelDoc>) {
        self.models
            .get_or_insert_with(NestedMap::new)
            .receive_branch(project_id, models);
    }

    pub fn receive_model(&mut self, project_id: ProjectId, model: ModelDoc) {
        self.models
            .get_or_insert_with(NestedMap::new)
            .receive_record(project_id, model.id.clone(), model);
    }

    pub fn clear_model_branch(&mut self, project_id: &ProjectId) -> bool {
        self.models
            .as_mut()
            .is_some_and(|models| models.clear_branch(project_id))
    }

    pub fn clear_model(&mut self, project_id: &ProjectId, model_id: &ModelId) -> bool {
        self.models
            .as_mut()
            .is_some_and(|models| models.clear_record(project_id, model_id))
    }

    pub fn receive_field_branch(
        &mut self,
        model_id: ModelId,
        fields: BTreeMap<ModelFieldId, ModelFieldDoc>,
    ) {
        self.fields
            .get_or_insert_with(NestedMap::new)
            .receive_branch(model_id, fields);
    }

    pub fn receive_field(&mut self, model_id: ModelId, field: ModelFieldDoc) {
        self.fields
            .get_or_insert_with(NestedMap::new)
            .receive_record(model_id, field.id.clone(), field);
    }

    pub fn clear_field_branch(&mut self, model_id: &ModelId) -> bool {
        self.fields
            .as_mut()
            .is_some_and(|fields| fields.clear_branch(model_id))
    }

    pub fn clear_field(&mut self, model_id: &ModelId, field_id: &ModelFieldId) -> bool {
        self.fields
            .as_mut()
            .is_some_and(|fields| fields.clear_record(model_id, field_id))
    }

    pub fn receive_model_form(&mut self, form_id: ModelFormId, model_id: ModelId) {
        self.model_forms
            .get_or_insert_with(RecordMap::new)
            .receive_record(form_id, model_id);
    }

    pub fn clear_model_form(&mut self, form_id: &ModelFormId) -> bool {
        self.model_forms
            .as_mut()
            .is_some_and(|forms| forms.clear_record(form_id))
    }

    pub fn projects(&self) -> Option<&[ProjectDoc]> {
        self.projects.as_deref()
    }

    pub const fn current_project(&self) -> Option<&ProjectDoc> {
        self.current_project.as_ref()
    }

    pub const fn project_urls(&self) -> Option<&RecordMap<ProjectId, Vec<ProjectUrlDoc>>> {
        self.project_urls.as_ref()
    }

    pub const fn models(&self) -> Option<&NestedMap<ProjectId, ModelId, ModelDoc>> {
        self.models.as_ref()
    }

    pub const fn fields(&self) -> Option<&NestedMap<ModelId, ModelFieldId, ModelFieldDoc>> {
        self.fields.as_ref()
    }

    pub const fn model_forms(&self) -> Option<&RecordMap<ModelFormId, ModelId>> {
        self.model_forms.as_ref()
    }

    pub fn model_fields(&self) -> Option<&[ModelFieldDoc]> {
        self.model_fields.as_deref()
    }
}

/// Process-wide list of in-flight intent type tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressState {
    in_flight: Vec<IntentKind>,
}

impl ProgressState {
    pub fn begin(&mut self, kind: IntentKind) {
        self.in_flight.push(kind);
    }

    /// Removes one occurrence of the tag. Finishing an intent that was never
    /// started is benign.
    pub fn finish(&mut self, kind: IntentKind) -> bool {
        match self.in_flight.iter().position(|tag| *tag == kind) {
            Some(index) => {
                self.in_flight.remove(index);
                true
            }
            None => {
                debug!("finish for idle intent {} ignored", kind.as_str());
                false
            }
        }
    }

    pub fn is_pending(&self, kind: IntentKind) -> bool {
        self.in_flight.contains(&kind)
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}

/// Everything the model-form UI reads about one open model form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFormContext<'a> {
    pub model: Option<&'a ModelDoc>,
    pub existing_model_names: Vec<&'a str>,
    pub model_fields: Option<&'a [ModelFieldDoc]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreState {
    pub data: DataState,
    pub progress: ProgressState,
}

impl StoreState {
    pub fn current_project_urls(&self) -> Option<&[ProjectUrlDoc]> {
        let project = self.data.current_project()?;
        let urls = self.data.project_urls()?;
        urls.record(&project.id).map(Vec::as_slice)
    }

    /// The current project's models, chronologically ordered with the id as a
    /// deterministic tiebreaker.
    pub fn current_project_models(&self) -> Option<Vec<&ModelDoc>> {
        let project = self.data.current_project()?;
        let models = self.data.models()?;
        let mut list: Vec<&ModelDoc> = models
            .branch(&project.id)
            .map(|branch| branch.values().collect())
            .unwrap_or_default();
        list.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Some(list)
    }

    pub fn model_form_context(&self, form_id: &ModelFormId) -> ModelFormContext<'_> {
        let model_id = self
            .data
            .model_forms()
            .and_then(|forms| forms.record(form_id));
        let mut model = None;
        let mut existing_model_names = Vec::new();
        if let (Some(models), Some(project)) = (self.data.models(), self.data.current_project())
            && let Some(branch) = models.branch(&project.id)
        {
            for (id, doc) in branch {
                if Some(id) == model_id {
                    model = Some(doc);
                } else {
                    existing_model_names.push(doc.name.as_str());
                }
            }
        }
        ModelFormContext {
            model,
            existing_model_names,
            model_fields: self.data.model_fields(),
        }
    }

    pub fn is_submitting(&self, kind: IntentKind) -> bool {
        self.progress.is_pending(kind)
    }
}
