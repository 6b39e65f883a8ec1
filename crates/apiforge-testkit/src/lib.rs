// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use apiforge_app::{
    Cell, ConfirmTicket, DocTimestamp, EditorCommand, EditorContext, EditorEffect, FieldEditor,
    FieldType, FieldUpsert, FormatKind, Intent, MemberId, ModelDoc, ModelFieldDoc, ModelFieldId,
    ModelId, ProjectDoc, ProjectId, ProjectUrlDoc, ProjectUrlId,
};
use apiforge_store::{SlicePayload, StoreState};

pub mod fixtures {
    use super::*;

    pub const AUTHOR: &str = "member-1";

    pub fn member(id: &str) -> MemberId {
        MemberId::new(id)
    }

    pub const fn ts(seconds: i64) -> DocTimestamp {
        DocTimestamp::new(seconds, 0)
    }

    pub fn cell<T>(value: T, seconds: i64) -> Cell<T> {
        Cell::new(value, member(AUTHOR), ts(seconds))
    }

    pub fn project(id: &str, title: &str, seconds: i64) -> ProjectDoc {
        let author = member(AUTHOR);
        ProjectDoc {
            id: ProjectId::new(id),
            title: title.to_owned(),
            description: String::new(),
            members: BTreeMap::from([(author.clone(), true)]),
            owners: BTreeMap::from([(author.clone(), true)]),
            managers: BTreeMap::new(),
            guests: BTreeMap::new(),
            invitees: BTreeMap::new(),
            settings_by_member: BTreeMap::new(),
            created_at: ts(seconds),
            updated_at: ts(seconds),
            created_by: author.clone(),
            updated_by: author,
        }
    }

    pub fn project_url(
        project_id: &str,
        id: &str,
        label: &str,
        url: &str,
        seconds: i64,
    ) -> ProjectUrlDoc {
        let author = member(AUTHOR);
        ProjectUrlDoc {
            id: ProjectUrlId::new(id),
            project_id: ProjectId::new(project_id),
            label: label.to_owned(),
            url: url.to_owned(),
            description: String::new(),
            settings_by_member: BTreeMap::new(),
            created_at: ts(seconds),
            updated_at: ts(seconds),
            created_by: author.clone(),
            updated_by: author,
        }
    }

    pub fn model(project_id: &str, id: &str, name: &str, seconds: i64) -> ModelDoc {
        let author = member(AUTHOR);
        ModelDoc {
            id: ModelId::new(id),
            project_id: ProjectId::new(project_id),
            name: name.to_owned(),
            extends: None,
            description: String::new(),
            referenced_by_field: BTreeMap::new(),
            extended_by_model: BTreeMap::new(),
            settings_by_member: BTreeMap::new(),
            created_at: ts(seconds),
            updated_at: ts(seconds),
            created_by: author.clone(),
            updated_by: author,
        }
    }

    pub fn field(
        project_id: &str,
        model_id: &str,
        id: &str,
        name: &str,
        seconds: i64,
    ) -> ModelFieldDoc {
        let author = member(AUTHOR);
        ModelFieldDoc {
            id: ModelFieldId::new(id),
            project_id: ProjectId::new(project_id),
            model_id: ModelId::new(model_id),
            reference_model_id: None,
            field_name: cell(name.to_owned(), seconds),
            is_required: cell(true, seconds),
            is_array: cell(false, seconds),
            field_type: cell(FieldType::String, seconds),
            format: cell(FormatKind::None, seconds),
            enumeration: cell(String::new(), seconds),
            description: cell(String::new(), seconds),
            settings_by_member: BTreeMap::new(),
            created_at: ts(seconds),
            updated_at: ts(seconds),
            created_by: author.clone(),
            updated_by: author,
        }
    }

    /// Parses a listener snapshot of model fields, as the remote pipeline
    /// would deliver it.
    pub fn fields_from_json(json: &str) -> Result<Vec<ModelFieldDoc>> {
        serde_json::from_str(json).context("parse model-field snapshot")
    }
}

/// In-memory stand-in for the persistence collaborator. Applies intents to
/// its own idea of the remote collections and echoes the result back into the
/// store the way the listener pipeline would.
#[derive(Debug, Clone)]
pub struct ScriptedRemote {
    project_id: ProjectId,
    model_id: ModelId,
    author: MemberId,
    clock_seconds: i64,
    next_id: u64,
}

impl ScriptedRemote {
    pub fn new(project_id: ProjectId, model_id: ModelId) -> Self {
        Self {
            project_id,
            model_id,
            author: fixtures::member(fixtures::AUTHOR),
            clock_seconds: 1_000,
            next_id: 0,
        }
    }

    fn tick(&mut self) -> DocTimestamp {
        self.clock_seconds += 1;
        DocTimestamp::new(self.clock_seconds, 0)
    }

    fn mint(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    pub fn apply(&mut self, intent: Intent, store: &mut StoreState) -> Result<()> {
        let kind = intent.kind();
        store.progress.begin(kind);
        let outcome = self.write(intent, store);
        store.progress.finish(kind);
        outcome
    }

    fn write(&mut self, intent: Intent, store: &mut StoreState) -> Result<()> {
        match intent {
            Intent::UpsertField(upsert) => self.write_field(upsert, store),
            Intent::DeleteField { field_id } => {
                store.data.clear_field(&self.model_id, &field_id);
                Ok(())
            }
            Intent::UpsertModel {
                name,
                description,
                target,
            } => self.write_model(name, description, target, store),
            Intent::UpsertProjectUrl {
                label,
                url,
                description,
                target,
            } => self.write_project_url(label, url, description, target, store),
            Intent::DeleteProjectUrl { url_id } => {
                let project_id = self.project_id.clone();
                let mut urls = store
                    .current_project_urls()
                    .map(<[ProjectUrlDoc]>::to_vec)
                    .unwrap_or_default();
                urls.retain(|url| url.id != url_id);
                store.data.receive_project_urls(project_id, urls);
                Ok(())
            }
        }
    }

    fn write_field(&mut self, upsert: FieldUpsert, store: &mut StoreState) -> Result<()> {
        let model_id = self.model_id.clone();
        let at = self.tick();
        let author = self.author.clone();
        let doc = match upsert.target {
            Some(field_id) => {
                let Some(existing) = store.data.fields().and_then(|fields| {
                    fields.record(&model_id, &field_id).cloned()
                }) else {
                    bail!("update target {field_id} does not exist");
                };
                let mut doc = existing;
                doc.field_name.touch(upsert.field_name, author.clone(), at);
                doc.is_required.touch(upsert.is_required, author.clone(), at);
                doc.is_array.touch(upsert.is_array, author.clone(), at);
                doc.field_type.touch(upsert.field_type, author.clone(), at);
                doc.format.touch(upsert.format, author.clone(), at);
                doc.enumeration.touch(upsert.enumeration, author.clone(), at);
                doc.description.touch(upsert.description, author.clone(), at);
                doc.updated_at = at;
                doc.updated_by = author;
                doc
            }
            None => {
                let id = ModelFieldId::new(self.mint("field"));
                ModelFieldDoc {
                    id,
                    project_id: self.project_id.clone(),
                    model_id: model_id.clone(),
                    reference_model_id: None,
                    field_name: Cell::new(upsert.field_name, author.clone(), at),
                    is_required: Cell::new(upsert.is_required, author.clone(), at),
                    is_array: Cell::new(upsert.is_array, author.clone(), at),
                    field_type: Cell::new(upsert.field_type, author.clone(), at),
                    format: Cell::new(upsert.format, author.clone(), at),
                    enumeration: Cell::new(upsert.enumeration, author.clone(), at),
                    description: Cell::new(upsert.description, author.clone(), at),
                    settings_by_member: BTreeMap::new(),
                    created_at: at,
                    updated_at: at,
                    created_by: author.clone(),
                    updated_by: author,
                }
            }
        };
        store.data.receive_field(model_id, doc);
        Ok(())
    }

    fn write_model(
        &mut self,
        name: String,
        description: String,
        target: Option<ModelId>,
        store: &mut StoreState,
    ) -> Result<()> {
        let project_id = self.project_id.clone();
        let at = self.tick();
        let author = self.author.clone();
        let doc = match target {
            Some(model_id) => {
                let Some(existing) = store.data.models().and_then(|models| {
                    models.record(&project_id, &model_id).cloned()
                }) else {
                    bail!("update target {model_id} does not exist");
                };
                let mut doc = existing;
                doc.name = name;
                doc.description = description;
                doc.updated_at = at;
                doc.updated_by = author;
                doc
            }
            None => {
                let mut doc = fixtures::model(
                    project_id.as_str(),
                    &self.mint("model"),
                    &name,
                    at.seconds,
                );
                doc.description = description;
                doc
            }
        };
        store.data.receive_model(project_id, doc);
        Ok(())
    }

    fn write_project_url(
        &mut self,
        label: String,
        url: String,
        description: String,
        target: Option<ProjectUrlId>,
        store: &mut StoreState,
    ) -> Result<()> {
        let project_id = self.project_id.clone();
        let at = self.tick();
        let mut urls = store
            .current_project_urls()
            .map(<[ProjectUrlDoc]>::to_vec)
            .unwrap_or_default();
        match target {
            Some(url_id) => {
                let Some(existing) = urls.iter_mut().find(|doc| doc.id == url_id) else {
                    bail!("update target {url_id} does not exist");
                };
                existing.label = label;
                existing.url = url;
                existing.description = description;
                existing.updated_at = at;
                existing.updated_by = self.author.clone();
            }
            None => {
                let mut doc = fixtures::project_url(
                    project_id.as_str(),
                    &self.mint("url"),
                    &label,
                    &url,
                    at.seconds,
                );
                doc.description = description;
                urls.push(doc);
            }
        }
        store.data.receive_project_urls(project_id, urls);
        Ok(())
    }
}

/// Drives the field editor through the cooperative event loop the real UI
/// provides: effects are routed back as store writes, pending timers, confirm
/// dialogs, and close signals.
#[derive(Debug)]
pub struct EditorHarness {
    pub editor: FieldEditor,
    pub store: StoreState,
    pub remote: ScriptedRemote,
    pub has_model_name: bool,
    pub emitted: Vec<Intent>,
    pub close_requests: usize,
    pub model_name_focuses: usize,
    pub open_confirms: Vec<(ConfirmTicket, ModelFieldId)>,
    pub closed_confirms: Vec<ConfirmTicket>,
    project_id: ProjectId,
    model_id: ModelId,
    pending_blur: Vec<u64>,
}

impl EditorHarness {
    pub fn new() -> Self {
        let project_id = ProjectId::new("p1");
        let model_id = ModelId::new("m1");
        let mut store = StoreState::default();
        store.data.receive_batch([
            SlicePayload::CurrentProject(fixtures::project("p1", "Petstore", 1)),
            SlicePayload::Models(BTreeMap::from([(
                project_id.clone(),
                BTreeMap::from([(model_id.clone(), fixtures::model("p1", "m1", "Pet", 2))]),
            )])),
            SlicePayload::Fields(BTreeMap::from([(model_id.clone(), BTreeMap::new())])),
        ]);
        Self {
            editor: FieldEditor::default(),
            store,
            remote: ScriptedRemote::new(project_id.clone(), model_id.clone()),
            has_model_name: true,
            emitted: Vec::new(),
            close_requests: 0,
            model_name_focuses: 0,
            open_confirms: Vec::new(),
            closed_confirms: Vec::new(),
            project_id,
            model_id,
            pending_blur: Vec::new(),
        }
    }

    /// Pushes a field into the store the way the listener would, bypassing
    /// the intent pipeline.
    pub fn seed_field(&mut self, id: &str, name: &str, seconds: i64) {
        let field = fixtures::field(
            self.project_id.as_str(),
            self.model_id.as_str(),
            id,
            name,
            seconds,
        );
        self.store.data.receive_field(self.model_id.clone(), field);
    }

    pub fn fields(&self) -> Vec<ModelFieldDoc> {
        self.store
            .data
            .fields()
            .and_then(|fields| fields.branch(&self.model_id))
            .map(|branch| branch.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn field_named(&self, name: &str) -> Option<ModelFieldDoc> {
        self.fields()
            .into_iter()
            .find(|field| field.field_name.value == name)
    }

    pub fn pending_blur_count(&self) -> usize {
        self.pending_blur.len()
    }

    pub fn dispatch(&mut self, command: EditorCommand) -> Result<()> {
        let fields = self.fields();
        let ctx = EditorContext {
            fields: &fields,
            has_model_name: self.has_model_name,
        };
        let effects = self.editor.dispatch(command, &ctx);
        self.process(effects)
    }

    /// Fires every pending blur timer in schedule order.
    pub fn settle(&mut self) -> Result<()> {
        while !self.pending_blur.is_empty() {
            let epoch = self.pending_blur.remove(0);
            self.dispatch(EditorCommand::BlurElapsed { epoch })?;
        }
        Ok(())
    }

    fn process(&mut self, effects: Vec<EditorEffect>) -> Result<()> {
        for effect in effects {
            match effect {
                EditorEffect::ScheduleBlurCheck { epoch, .. } => self.pending_blur.push(epoch),
                EditorEffect::CancelBlurCheck { epoch } => {
                    self.pending_blur.retain(|pending| *pending != epoch);
                }
                EditorEffect::EmitIntent(intent) => {
                    self.emitted.push(intent.clone());
                    self.remote.apply(intent, &mut self.store)?;
                }
                EditorEffect::OpenConfirm { ticket, field_id } => {
                    self.open_confirms.push((ticket, field_id));
                }
                EditorEffect::CloseConfirm { ticket } => self.closed_confirms.push(ticket),
                EditorEffect::FocusModelName => self.model_name_focuses += 1,
                EditorEffect::RequestClose => self.close_requests += 1,
            }
        }
        Ok(())
    }
}

impl Default for EditorHarness {
    fn default() -> Self {
        Self::new()
    }
}
