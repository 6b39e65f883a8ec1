// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;

use log::debug;

use crate::{
    ConfirmGate, ConfirmTicket, DraftErrors, FieldDraft, FieldType, FieldUpsert, FormatKind,
    Intent, ModelFieldDoc, ModelFieldId,
};

/// Settle delay between an input losing focus and the blur decision, long
/// enough for focus to land on a sibling input in the same row.
pub const BLUR_SETTLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Idle,
    Creating,
    Editing(ModelFieldId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldColumn {
    FieldName,
    IsRequired,
    IsArray,
    FieldType,
    Format,
    Enumeration,
    Description,
}

#[derive(Debug, Clone, Copy)]
pub struct EditorContext<'a> {
    pub fields: &'a [ModelFieldDoc],
    pub has_model_name: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftInput {
    FieldName(String),
    IsRequired(bool),
    IsArray(bool),
    FieldType(FieldType),
    Format(FormatKind),
    Enumeration(String),
    Description(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    AddField,
    OpenField {
        field_id: ModelFieldId,
        column: FieldColumn,
    },
    Input(DraftInput),
    FocusRow,
    FocusModelName,
    Blur,
    BlurElapsed {
        epoch: u64,
    },
    Submit,
    Escape,
    RequestDelete {
        field_id: ModelFieldId,
    },
    ResolveDelete {
        ticket: ConfirmTicket,
        confirmed: bool,
    },
    Detach,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEffect {
    ScheduleBlurCheck {
        epoch: u64,
        delay: Duration,
    },
    CancelBlurCheck {
        epoch: u64,
    },
    EmitIntent(Intent),
    OpenConfirm {
        ticket: ConfirmTicket,
        field_id: ModelFieldId,
    },
    CloseConfirm {
        ticket: ConfirmTicket,
    },
    FocusModelName,
    RequestClose,
}

/// Per-table controller for the inline field rows. At most one row is ever
/// open; every transition goes through `dispatch`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEditor {
    mode: EditorMode,
    draft: FieldDraft,
    baseline: FieldDraft,
    focus_column: Option<FieldColumn>,
    row_focused: bool,
    blur_epoch: u64,
    pending_blur: Option<u64>,
    confirm: ConfirmGate,
    pending_delete: Option<(ConfirmTicket, ModelFieldId)>,
}

impl Default for FieldEditor {
    fn default() -> Self {
        Self {
            mode: EditorMode::Idle,
            draft: FieldDraft::default(),
            baseline: FieldDraft::default(),
            focus_column: None,
            row_focused: false,
            blur_epoch: 0,
            pending_blur: None,
            confirm: ConfirmGate::default(),
            pending_delete: None,
        }
    }
}

impl FieldEditor {
    pub const fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub const fn draft(&self) -> &FieldDraft {
        &self.draft
    }

    pub const fn baseline(&self) -> &FieldDraft {
        &self.baseline
    }

    pub const fn focus_column(&self) -> Option<FieldColumn> {
        self.focus_column
    }

    pub const fn pending_blur(&self) -> Option<u64> {
        self.pending_blur
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Idle
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.baseline
    }

    pub fn errors(&self, ctx: &EditorContext<'_>) -> DraftErrors {
        let siblings = self.sibling_names(ctx);
        self.draft.validate(&siblings)
    }

    pub fn dispatch(
        &mut self,
        command: EditorCommand,
        ctx: &EditorContext<'_>,
    ) -> Vec<EditorEffect> {
        match command {
            EditorCommand::AddField => self.add_field(),
            EditorCommand::OpenField { field_id, column } => self.open_field(field_id, column, ctx),
            EditorCommand::Input(input) => self.stage_input(input),
            EditorCommand::FocusRow => self.focus_row(ctx),
            EditorCommand::FocusModelName => self.focus_model_name(),
            EditorCommand::Blur => self.blur(),
            EditorCommand::BlurElapsed { epoch } => self.blur_elapsed(epoch, ctx),
            EditorCommand::Submit => self.submit(ctx),
            EditorCommand::Escape => self.escape(),
            EditorCommand::RequestDelete { field_id } => self.request_delete(field_id),
            EditorCommand::ResolveDelete { ticket, confirmed } => {
                self.resolve_delete(ticket, confirmed)
            }
            EditorCommand::Detach => self.detach(),
        }
    }

    fn add_field(&mut self) -> Vec<EditorEffect> {
        let mut effects = Vec::new();
        self.cancel_pending_blur(&mut effects);
        self.mode = EditorMode::Creating;
        self.baseline = FieldDraft::default();
        self.draft = self.baseline.clone();
        self.focus_column = Some(FieldColumn::FieldName);
        self.row_focused = false;
        effects
    }

    fn open_field(
        &mut self,
        field_id: ModelFieldId,
        column: FieldColumn,
        ctx: &EditorContext<'_>,
    ) -> Vec<EditorEffect> {
        let mut effects = Vec::new();
        if self.mode == EditorMode::Creating {
            // The pending new row takes precedence: the click cancels
            // creation and is otherwise swallowed.
            self.cancel_pending_blur(&mut effects);
            self.close_row();
            return effects;
        }
        if let EditorMode::Editing(current) = &self.mode
            && *current == field_id
        {
            self.focus_column = Some(column);
            return effects;
        }
        let Some(field) = ctx.fields.iter().find(|field| field.id == field_id) else {
            return effects;
        };
        self.cancel_pending_blur(&mut effects);
        if let EditorMode::Editing(previous) = self.mode.clone()
            && self.is_dirty()
            && self.errors(ctx).is_empty()
        {
            // Never lose valid input when switching rows.
            effects.push(EditorEffect::EmitIntent(Intent::UpsertField(
                FieldUpsert::from_draft(&self.draft, Some(previous)),
            )));
        }
        self.mode = EditorMode::Editing(field_id);
        self.baseline = FieldDraft::from_field(field);
        self.draft = self.baseline.clone();
        self.focus_column = Some(column);
        effects
    }

    fn stage_input(&mut self, input: DraftInput) -> Vec<EditorEffect> {
        if self.mode == EditorMode::Idle {
            return Vec::new();
        }
        match input {
            DraftInput::FieldName(value) => self.draft.field_name = value,
            DraftInput::IsRequired(value) => self.draft.is_required = value,
            DraftInput::IsArray(value) => self.draft.is_array = value,
            DraftInput::FieldType(field_type) => {
                self.draft.set_field_type(field_type);
            }
            DraftInput::Format(format) => {
                if self.draft.field_type.allows(format) {
                    self.draft.format = format;
                } else {
                    debug!(
                        "format {} rejected for field type {}",
                        format.as_str(),
                        self.draft.field_type.as_str()
                    );
                }
            }
            DraftInput::Enumeration(value) => self.draft.enumeration = value,
            DraftInput::Description(value) => self.draft.description = value,
        }
        Vec::new()
    }

    fn focus_row(&mut self, ctx: &EditorContext<'_>) -> Vec<EditorEffect> {
        if !ctx.has_model_name {
            // The model name takes input priority over any open row.
            let mut effects = Vec::new();
            self.cancel_pending_blur(&mut effects);
            self.close_row();
            effects.push(EditorEffect::FocusModelName);
            return effects;
        }
        self.row_focused = true;
        let mut effects = Vec::new();
        self.cancel_pending_blur(&mut effects);
        effects
    }

    fn focus_model_name(&mut self) -> Vec<EditorEffect> {
        if self.mode == EditorMode::Idle {
            return Vec::new();
        }
        let mut effects = Vec::new();
        self.cancel_pending_blur(&mut effects);
        self.close_row();
        effects
    }

    fn blur(&mut self) -> Vec<EditorEffect> {
        self.row_focused = false;
        if self.mode == EditorMode::Idle {
            return Vec::new();
        }
        let mut effects = Vec::new();
        self.cancel_pending_blur(&mut effects);
        self.blur_epoch += 1;
        self.pending_blur = Some(self.blur_epoch);
        effects.push(EditorEffect::ScheduleBlurCheck {
            epoch: self.blur_epoch,
            delay: BLUR_SETTLE,
        });
        effects
    }

    fn blur_elapsed(&mut self, epoch: u64, ctx: &EditorContext<'_>) -> Vec<EditorEffect> {
        if self.pending_blur != Some(epoch) {
            debug!("stale blur check (epoch {epoch}) ignored");
            return Vec::new();
        }
        self.pending_blur = None;
        if self.row_focused || self.mode == EditorMode::Idle {
            return Vec::new();
        }
        if self.mode == EditorMode::Creating && !self.is_dirty() {
            // Untouched new row: silent discard.
            self.close_row();
            return Vec::new();
        }
        if !self.errors(ctx).is_empty() {
            // The row stays open until the errors are fixed or the edit is
            // cancelled; an invalid draft is never committed or retried.
            return Vec::new();
        }
        if self.is_dirty() {
            return self.commit();
        }
        self.close_row();
        Vec::new()
    }

    fn submit(&mut self, ctx: &EditorContext<'_>) -> Vec<EditorEffect> {
        if self.mode == EditorMode::Idle {
            return Vec::new();
        }
        if !self.errors(ctx).is_empty() {
            return Vec::new();
        }
        let mut effects = Vec::new();
        self.cancel_pending_blur(&mut effects);
        effects.extend(self.commit());
        effects
    }

    fn escape(&mut self) -> Vec<EditorEffect> {
        let mut effects = Vec::new();
        if self.mode == EditorMode::Idle {
            effects.push(EditorEffect::RequestClose);
            return effects;
        }
        self.cancel_pending_blur(&mut effects);
        self.close_row();
        effects
    }

    fn request_delete(&mut self, field_id: ModelFieldId) -> Vec<EditorEffect> {
        let mut effects = Vec::new();
        if let Some((ticket, pending)) = self.pending_delete.take() {
            if pending == field_id {
                self.pending_delete = Some((ticket, pending));
                return effects;
            }
            self.confirm.release(ticket);
            effects.push(EditorEffect::CloseConfirm { ticket });
        }
        let ticket = self.confirm.open();
        self.pending_delete = Some((ticket, field_id.clone()));
        effects.push(EditorEffect::OpenConfirm { ticket, field_id });
        effects
    }

    fn resolve_delete(&mut self, ticket: ConfirmTicket, confirmed: bool) -> Vec<EditorEffect> {
        if !self.confirm.release(ticket) {
            // Already resolved or replaced; double release is benign.
            return Vec::new();
        }
        let Some((_ticket, field_id)) = self.pending_delete.take() else {
            return Vec::new();
        };
        let mut effects = vec![EditorEffect::CloseConfirm { ticket }];
        if confirmed {
            effects.push(EditorEffect::EmitIntent(Intent::DeleteField { field_id }));
        }
        effects
    }

    fn detach(&mut self) -> Vec<EditorEffect> {
        let mut effects = Vec::new();
        self.cancel_pending_blur(&mut effects);
        if let Some((ticket, _)) = self.pending_delete.take() {
            self.confirm.release(ticket);
            effects.push(EditorEffect::CloseConfirm { ticket });
        }
        self.close_row();
        effects
    }

    fn commit(&mut self) -> Vec<EditorEffect> {
        let target = match &self.mode {
            EditorMode::Editing(id) => Some(id.clone()),
            _ => None,
        };
        let intent = Intent::UpsertField(FieldUpsert::from_draft(&self.draft, target));
        self.close_row();
        vec![EditorEffect::EmitIntent(intent)]
    }

    fn close_row(&mut self) {
        self.mode = EditorMode::Idle;
        self.baseline = FieldDraft::default();
        self.draft = self.baseline.clone();
        self.focus_column = None;
        self.row_focused = false;
    }

    fn cancel_pending_blur(&mut self, effects: &mut Vec<EditorEffect>) {
        if let Some(epoch) = self.pending_blur.take() {
            effects.push(EditorEffect::CancelBlurCheck { epoch });
        }
    }

    fn sibling_names<'a>(&self, ctx: &EditorContext<'a>) -> Vec<&'a str> {
        let exclude = match &self.mode {
            EditorMode::Editing(id) => Some(id),
            _ => None,
        };
        ctx.fields
            .iter()
            .filter(|field| exclude != Some(&field.id))
            .map(|field| field.field_name.value.as_str())
            .collect()
    }
}
