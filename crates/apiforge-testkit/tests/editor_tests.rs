// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use apiforge_app::{
    DraftInput, EditorCommand, EditorMode, FieldColumn, FieldType, FormatKind, Intent, IntentKind,
    ModelFieldId, ModelId, ProjectId,
};
use apiforge_testkit::{EditorHarness, ScriptedRemote, fixtures};

#[test]
fn new_field_commits_on_blur_and_lands_in_store() -> Result<()> {
    let mut harness = EditorHarness::new();
    harness.dispatch(EditorCommand::AddField)?;
    harness.dispatch(EditorCommand::FocusRow)?;
    harness.dispatch(EditorCommand::Input(DraftInput::FieldName(
        "petId".to_owned(),
    )))?;
    harness.dispatch(EditorCommand::Input(DraftInput::FieldType(
        FieldType::Integer,
    )))?;
    harness.dispatch(EditorCommand::Blur)?;
    harness.settle()?;

    assert_eq!(*harness.editor.mode(), EditorMode::Idle);
    let field = harness.field_named("petId").expect("field was persisted");
    assert_eq!(field.field_type.value, FieldType::Integer);
    assert_eq!(field.format.value, FormatKind::Int32);
    assert_eq!(harness.emitted.len(), 1);
    assert!(harness.store.progress.is_idle());
    Ok(())
}

#[test]
fn repeated_add_commands_keep_a_single_open_row() -> Result<()> {
    let mut harness = EditorHarness::new();
    harness.seed_field("f1", "id", 5);

    for _ in 0..4 {
        harness.dispatch(EditorCommand::AddField)?;
        assert_eq!(*harness.editor.mode(), EditorMode::Creating);
    }

    // A click on an existing row while a new row is pending cancels the
    // creation instead of opening an edit.
    harness.dispatch(EditorCommand::OpenField {
        field_id: ModelFieldId::new("f1"),
        column: FieldColumn::FieldName,
    })?;
    assert_eq!(*harness.editor.mode(), EditorMode::Idle);
    assert!(harness.emitted.is_empty());
    Ok(())
}

#[test]
fn format_stays_in_the_allowed_set_across_type_changes() -> Result<()> {
    let mut harness = EditorHarness::new();
    harness.dispatch(EditorCommand::AddField)?;

    let walk = [
        FieldType::Number,
        FieldType::String,
        FieldType::Integer,
        FieldType::Boolean,
        FieldType::Object,
        FieldType::String,
    ];
    for field_type in walk {
        harness.dispatch(EditorCommand::Input(DraftInput::FieldType(field_type)))?;
        let draft = harness.editor.draft();
        assert!(
            field_type.allows(draft.format),
            "format {} escaped the {} set",
            draft.format.as_str(),
            field_type.as_str()
        );
    }

    // A still-valid format survives the type change untouched.
    harness.dispatch(EditorCommand::Input(DraftInput::FieldType(
        FieldType::Number,
    )))?;
    harness.dispatch(EditorCommand::Input(DraftInput::Format(FormatKind::None)))?;
    harness.dispatch(EditorCommand::Input(DraftInput::FieldType(
        FieldType::String,
    )))?;
    assert_eq!(harness.editor.draft().format, FormatKind::None);
    Ok(())
}

#[test]
fn unchanged_draft_never_commits_at_blur() -> Result<()> {
    let mut harness = EditorHarness::new();
    harness.seed_field("f1", "id", 5);

    harness.dispatch(EditorCommand::OpenField {
        field_id: ModelFieldId::new("f1"),
        column: FieldColumn::Description,
    })?;
    harness.dispatch(EditorCommand::FocusRow)?;
    harness.dispatch(EditorCommand::Blur)?;
    harness.settle()?;

    assert!(harness.emitted.is_empty());
    assert_eq!(*harness.editor.mode(), EditorMode::Idle);
    Ok(())
}

#[test]
fn duplicate_name_blocks_commit_until_fixed() -> Result<()> {
    let mut harness = EditorHarness::new();
    harness.seed_field("f1", "id", 5);
    harness.seed_field("f2", "name", 6);

    harness.dispatch(EditorCommand::OpenField {
        field_id: ModelFieldId::new("f2"),
        column: FieldColumn::FieldName,
    })?;
    harness.dispatch(EditorCommand::Input(DraftInput::FieldName("id".to_owned())))?;
    harness.dispatch(EditorCommand::Blur)?;
    harness.settle()?;

    assert!(harness.emitted.is_empty(), "duplicate names never commit");
    assert_eq!(
        *harness.editor.mode(),
        EditorMode::Editing(ModelFieldId::new("f2")),
        "the row stays open with its error"
    );

    harness.dispatch(EditorCommand::Input(DraftInput::FieldName(
        "ownerId".to_owned(),
    )))?;
    harness.dispatch(EditorCommand::Blur)?;
    harness.settle()?;

    assert_eq!(harness.emitted.len(), 1);
    let updated = harness.field_named("ownerId").expect("rename persisted");
    assert_eq!(updated.id, ModelFieldId::new("f2"));
    assert!(harness.field_named("name").is_none());
    Ok(())
}

#[test]
fn focus_return_during_settle_keeps_the_row_open() -> Result<()> {
    let mut harness = EditorHarness::new();
    harness.dispatch(EditorCommand::AddField)?;
    harness.dispatch(EditorCommand::Input(DraftInput::FieldName(
        "status".to_owned(),
    )))?;
    harness.dispatch(EditorCommand::Blur)?;
    assert_eq!(harness.pending_blur_count(), 1);

    harness.dispatch(EditorCommand::FocusRow)?;
    assert_eq!(harness.pending_blur_count(), 0, "timer cancelled");
    harness.settle()?;

    assert_eq!(*harness.editor.mode(), EditorMode::Creating);
    assert!(harness.emitted.is_empty());
    Ok(())
}

#[test]
fn escape_with_a_row_open_closes_it_quietly() -> Result<()> {
    let mut harness = EditorHarness::new();
    harness.dispatch(EditorCommand::AddField)?;
    harness.dispatch(EditorCommand::Input(DraftInput::FieldName(
        "draft".to_owned(),
    )))?;
    harness.dispatch(EditorCommand::Escape)?;

    assert_eq!(*harness.editor.mode(), EditorMode::Idle);
    assert!(harness.emitted.is_empty());
    assert_eq!(harness.close_requests, 0);

    harness.dispatch(EditorCommand::Escape)?;
    assert_eq!(harness.close_requests, 1, "exactly one close signal");
    Ok(())
}

#[test]
fn switching_rows_persists_the_previous_valid_edit() -> Result<()> {
    let mut harness = EditorHarness::new();
    harness.seed_field("f1", "id", 5);
    harness.seed_field("f2", "name", 6);

    harness.dispatch(EditorCommand::OpenField {
        field_id: ModelFieldId::new("f1"),
        column: FieldColumn::FieldName,
    })?;
    harness.dispatch(EditorCommand::Input(DraftInput::FieldName(
        "petId".to_owned(),
    )))?;
    harness.dispatch(EditorCommand::OpenField {
        field_id: ModelFieldId::new("f2"),
        column: FieldColumn::FieldName,
    })?;

    assert_eq!(
        *harness.editor.mode(),
        EditorMode::Editing(ModelFieldId::new("f2"))
    );
    let renamed = harness.field_named("petId").expect("edit was not lost");
    assert_eq!(renamed.id, ModelFieldId::new("f1"));
    Ok(())
}

#[test]
fn model_name_priority_closes_the_row() -> Result<()> {
    let mut harness = EditorHarness::new();
    harness.has_model_name = false;
    harness.dispatch(EditorCommand::AddField)?;
    harness.dispatch(EditorCommand::FocusRow)?;

    assert_eq!(*harness.editor.mode(), EditorMode::Idle);
    assert_eq!(harness.model_name_focuses, 1);
    Ok(())
}

#[test]
fn delete_flow_removes_the_field_once() -> Result<()> {
    let mut harness = EditorHarness::new();
    harness.seed_field("f1", "id", 5);

    harness.dispatch(EditorCommand::RequestDelete {
        field_id: ModelFieldId::new("f1"),
    })?;
    let ticket = harness.open_confirms.last().expect("dialog opened").0;

    harness.dispatch(EditorCommand::ResolveDelete {
        ticket,
        confirmed: true,
    })?;
    assert!(harness.fields().is_empty(), "field removed from the store");
    assert_eq!(harness.emitted.len(), 1);

    // A duplicated resolution of the same dialog must not emit again.
    harness.dispatch(EditorCommand::ResolveDelete {
        ticket,
        confirmed: true,
    })?;
    assert_eq!(harness.emitted.len(), 1);
    assert_eq!(harness.closed_confirms, vec![ticket]);
    Ok(())
}

#[test]
fn declined_delete_leaves_the_store_alone() -> Result<()> {
    let mut harness = EditorHarness::new();
    harness.seed_field("f1", "id", 5);

    harness.dispatch(EditorCommand::RequestDelete {
        field_id: ModelFieldId::new("f1"),
    })?;
    let ticket = harness.open_confirms.last().expect("dialog opened").0;
    harness.dispatch(EditorCommand::ResolveDelete {
        ticket,
        confirmed: false,
    })?;

    assert!(harness.emitted.is_empty());
    assert_eq!(harness.fields().len(), 1);
    Ok(())
}

#[test]
fn editing_commit_updates_cell_metadata() -> Result<()> {
    let mut harness = EditorHarness::new();
    harness.seed_field("f1", "id", 5);

    harness.dispatch(EditorCommand::OpenField {
        field_id: ModelFieldId::new("f1"),
        column: FieldColumn::Description,
    })?;
    harness.dispatch(EditorCommand::Input(DraftInput::Description(
        "primary key".to_owned(),
    )))?;
    harness.dispatch(EditorCommand::Submit)?;

    let field = harness.field_named("id").expect("field still present");
    assert_eq!(field.description.value, "primary key");
    assert!(
        field.description.updated_at > field.description.created_at,
        "the touched cell carries fresh last-writer metadata"
    );
    Ok(())
}

#[test]
fn model_and_url_intents_flow_through_the_remote() -> Result<()> {
    let mut harness = EditorHarness::new();
    let mut remote = ScriptedRemote::new(ProjectId::new("p1"), ModelId::new("m1"));

    remote.apply(
        Intent::UpsertModel {
            name: "Owner".to_owned(),
            description: "pet owner".to_owned(),
            target: None,
        },
        &mut harness.store,
    )?;
    let models = harness
        .store
        .current_project_models()
        .expect("models resolve");
    assert!(models.iter().any(|model| model.name == "Owner"));

    remote.apply(
        Intent::UpsertModel {
            name: "Pet2".to_owned(),
            description: String::new(),
            target: Some(ModelId::new("m1")),
        },
        &mut harness.store,
    )?;
    let models = harness
        .store
        .current_project_models()
        .expect("models resolve");
    assert!(models.iter().any(|model| model.name == "Pet2"));

    remote.apply(
        Intent::UpsertProjectUrl {
            label: "prod".to_owned(),
            url: "https://api.example.com".to_owned(),
            description: String::new(),
            target: None,
        },
        &mut harness.store,
    )?;
    let urls = harness.store.current_project_urls().expect("urls resolve");
    assert_eq!(urls.len(), 1);
    let url_id = urls[0].id.clone();

    remote.apply(
        Intent::DeleteProjectUrl { url_id },
        &mut harness.store,
    )?;
    let urls = harness.store.current_project_urls().expect("urls resolve");
    assert!(urls.is_empty());
    assert!(harness.store.progress.is_idle());
    Ok(())
}

#[test]
fn progress_reports_submitting_while_an_intent_is_in_flight() {
    let mut harness = EditorHarness::new();
    harness.store.progress.begin(IntentKind::UpsertField);
    assert!(harness.store.is_submitting(IntentKind::UpsertField));
    assert!(!harness.store.is_submitting(IntentKind::DeleteField));
    harness.store.progress.finish(IntentKind::UpsertField);
    assert!(!harness.store.is_submitting(IntentKind::UpsertField));
}

#[test]
fn listener_snapshot_round_trips_into_the_harness_store() -> Result<()> {
    let mut harness = EditorHarness::new();
    let field = fixtures::field("p1", "m1", "f9", "tag", 7);
    let json = serde_json::to_string(&vec![field])?;
    let fields = fixtures::fields_from_json(&json)?;
    for field in fields {
        harness
            .store
            .data
            .receive_field(ModelId::new("m1"), field);
    }
    assert!(harness.field_named("tag").is_some());
    Ok(())
}
