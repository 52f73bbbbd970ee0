//! End-to-end product editor flows against the in-memory backend.

use std::sync::Arc;

use serde_json::json;
use turbo_catalog::prelude::*;
use turbo_catalog::schema::ResolveOutcome;
use turbo_catalog::wire::{AttributeConfig, AttributeConfigOption, CategorySchemaResponse};

fn phone_schema() -> CategorySchemaResponse {
    serde_json::from_value(json!({
        "attributeConfigs": [
            {
                "id": "attr-color", "code": "main_color", "label": "Main color",
                "isRequired": true, "isFilterable": true, "displayOrder": 1,
                "dataType": "SELECT",
                "optionsValue": [
                    { "id": "opt-black", "label": "Black", "active": true },
                    { "id": "opt-gold", "label": "Gold", "active": false }
                ]
            },
            {
                "id": "attr-screen", "code": "screen", "label": "Screen size",
                "isRequired": false, "displayOrder": 2, "unit": "inch",
                "dataType": "NUMBER"
            },
            {
                "id": "attr-nfc", "code": "nfc", "label": "NFC",
                "isRequired": true, "displayOrder": 3, "dataType": "BOOLEAN"
            }
        ]
    }))
    .unwrap()
}

fn backend() -> Arc<InMemoryBackend> {
    Arc::new(InMemoryBackend::new().with_schema("phones", phone_schema()))
}

async fn filled_editor(backend: Arc<InMemoryBackend>) -> ProductEditor<Arc<InMemoryBackend>> {
    let mut editor = ProductEditor::new(backend, EditorConfig::default());
    let outcome = editor.select_category("phones".into()).await;
    assert!(matches!(outcome, ResolveOutcome::Applied { attributes: 3, .. }));

    let base = editor.base_mut();
    base.name = "Phone X".into();
    base.slug = "phone-x".into();
    base.brand_id = Some("brand-acme".into());
    base.warranty = "12 months".into();
    base.price = Some(Money::from_major(100));
    base.stock = Some(5);

    let thumb = editor.pick_image("front.png", "image/png", vec![1u8, 2, 3]);
    editor.set_thumbnail(Some(thumb));
    editor.add_gallery_image(ImageSource::url("https://cdn.example/side.png"));

    editor
        .set_attribute(&"attr-color".into(), AttrValue::Option("opt-black".into()))
        .unwrap();
    editor
        .set_attribute(&"attr-screen".into(), AttrValue::Text("6.1".into()))
        .unwrap();
    editor
        .set_attribute(&"attr-nfc".into(), AttrValue::Bool(false))
        .unwrap();
    editor
}

fn add_color_size(editor: &mut ProductEditor<Arc<InMemoryBackend>>) -> (GroupId, GroupId) {
    editor.set_has_variants(true);
    let color = editor.add_group();
    editor.set_group_name(&color, "Color").unwrap();
    editor.add_option_value(&color, "Red").unwrap();
    editor.add_option_value(&color, "Blue").unwrap();
    let size = editor.add_group();
    editor.set_group_name(&size, "Size").unwrap();
    editor.add_option_value(&size, "S").unwrap();
    editor.add_option_value(&size, "M").unwrap();
    (color, size)
}

#[tokio::test]
async fn test_single_sku_product_created() {
    let backend = backend();
    let mut editor = filled_editor(backend.clone()).await;

    let receipt = editor.submit().await.unwrap();
    assert_eq!(receipt.sku_ids.len(), 1);

    let stored = backend.product(&receipt.product_id).unwrap();
    assert_eq!(stored.skus.len(), 1);
    assert_eq!(stored.skus[0].price, Some(Money::from_major(100)));
    assert_eq!(stored.skus[0].stock, Some(5));
    assert!(stored.skus[0].selections.is_empty());
    assert_eq!(stored.thumbnail.as_deref(), Some("memory://uploads/front.png"));

    let specs: Vec<_> = stored.specs.iter().map(|s| s.value.clone()).collect();
    assert_eq!(specs, vec![json!("opt-black"), json!(6.1), json!(false)]);

    let notes = editor.take_notifications();
    assert_eq!(notes.last().unwrap().level, NotificationLevel::Info);
    assert_eq!(editor.draft().base_sku_id.as_ref(), receipt.sku_ids.first());
}

#[tokio::test]
async fn test_variant_product_create_then_edit_round_trip() {
    let backend = backend();
    let mut editor = filled_editor(backend.clone()).await;
    add_color_size(&mut editor);

    let names: Vec<&str> = editor.skus().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Red / S", "Red / M", "Blue / S", "Blue / M"]);
    let keys: Vec<SkuKey> = editor.skus().iter().map(|s| s.key.clone()).collect();
    for (i, key) in keys.iter().enumerate() {
        let sku = editor.sku_mut(key).unwrap();
        sku.price = Some(Money::from_major(100 + i as i64));
        sku.stock = Some(10);
        sku.sku_code = format!("PX-{}", i);
    }

    let receipt = editor.submit().await.unwrap();
    assert_eq!(receipt.sku_ids.len(), 4);

    // Reload: the persisted matrix must come back with the same ids.
    let mut reloaded = ProductEditor::load(backend.clone(), EditorConfig::default(), &receipt.product_id)
        .await
        .unwrap();
    let report = reloaded.last_matrix_report().unwrap();
    assert_eq!(report.kept, 4);
    assert_eq!(report.created, 0);
    assert!(report.dropped.is_empty());

    let mut loaded: Vec<SkuId> = reloaded.skus().iter().filter_map(|s| s.id.clone()).collect();
    let mut saved = receipt.sku_ids.clone();
    loaded.sort();
    saved.sort();
    assert_eq!(loaded, saved);
    assert_eq!(reloaded.skus()[1].price, Some(Money::from_major(101)));
    assert_eq!(
        reloaded.draft().attributes[0].value,
        AttrValue::Option("opt-black".into())
    );
    assert_eq!(reloaded.draft().attributes[1].value, AttrValue::Text("6.1".into()));

    // Soft-deactivate Blue: two rows drop and are reported as orphaned.
    let color = reloaded.groups()[0].id.clone();
    let blue = reloaded.groups()[0].values[1].id.clone();
    assert_eq!(
        reloaded.deactivate_option_value(&color, &blue).unwrap(),
        turbo_catalog::variant::Deactivation::SoftDeactivated
    );
    assert_eq!(reloaded.skus().len(), 2);

    let submission = reloaded.assemble().unwrap();
    assert!(submission.is_update());
    assert_eq!(submission.orphaned_sku_ids.len(), 2);
    assert!(submission.attributes[0].values.iter().any(|v| !v.active));

    reloaded.submit().await.unwrap();
    assert_eq!(backend.product_count(), 1);
}

#[tokio::test]
async fn test_required_select_blocks_without_network() {
    let backend = backend();
    let mut editor = filled_editor(backend.clone()).await;
    editor
        .set_attribute(&"attr-color".into(), AttrValue::Empty)
        .unwrap();

    let err = editor.submit().await.unwrap_err();
    let CatalogError::Validation(errors) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.iter().next().unwrap().field, "specs.main_color");
    assert!(editor.field_error("specs.main_color").is_some());
    assert_eq!(backend.submission_count(), 0);
}

#[tokio::test]
async fn test_failed_submit_keeps_key_and_resubmits_once() {
    let backend = backend();
    let mut editor = filled_editor(backend.clone()).await;
    let key = editor.idempotency_key().clone();

    backend.set_offline(true);
    let err = editor.submit().await.unwrap_err();
    assert!(matches!(err, CatalogError::Network(_)));
    assert_eq!(editor.take_notifications().last().unwrap().level, NotificationLevel::Error);
    assert_eq!(editor.idempotency_key(), &key);
    assert!(editor.can_submit());

    backend.set_offline(false);
    let pending = editor.begin_submit().unwrap();
    let first = backend
        .submit_product(&pending.submission, &pending.idempotency_key)
        .await;
    // A client timeout makes the editor retry the very same request.
    let retried = backend
        .submit_product(&pending.submission, &pending.idempotency_key)
        .await
        .unwrap();
    let receipt = editor.finish_submit(pending, first).unwrap();

    assert_eq!(receipt, retried);
    assert_eq!(backend.product_count(), 1);
    assert_ne!(editor.idempotency_key(), &key);
}

#[tokio::test]
async fn test_submit_while_in_flight_is_busy() {
    let backend = backend();
    let mut editor = filled_editor(backend.clone()).await;

    let pending = editor.begin_submit().unwrap();
    assert!(!editor.can_submit());
    assert!(matches!(editor.submit().await, Err(CatalogError::Busy(_))));
    editor.finish_submit(pending, Err(CatalogError::Network("timeout".into()))).unwrap_err();
    assert!(editor.can_submit());

    let request = editor.begin_category_change("phones".into());
    assert!(matches!(editor.submit().await, Err(CatalogError::Busy(_))));
    editor.apply_schema(&request, Ok(phone_schema()));
    assert!(editor.can_submit());
    assert_eq!(backend.submission_count(), 0);
}

#[tokio::test]
async fn test_late_schema_response_does_not_clobber_newer_category() {
    let backend = backend();
    let laptops = CategorySchemaResponse {
        attribute_configs: vec![AttributeConfig {
            id: "attr-ram".into(),
            code: "ram".into(),
            label: "RAM".into(),
            is_required: false,
            is_filterable: false,
            display_order: 0,
            unit: Some("GB".into()),
            data_type: DataType::Select,
            options_value: vec![AttributeConfigOption {
                id: "ram-16".into(),
                value: Some("16".into()),
                label: "16 GB".into(),
                active: true,
            }],
        }],
    };
    let mut editor = ProductEditor::new(backend, EditorConfig::default());

    let slow = editor.begin_category_change("laptops".into());
    let fast = editor.begin_category_change("phones".into());
    editor.apply_schema(&fast, Ok(phone_schema()));
    let outcome = editor.apply_schema(&slow, Ok(laptops));

    assert!(matches!(outcome, ResolveOutcome::Stale));
    assert_eq!(editor.draft().base.category_id, Some("phones".into()));
    let codes: Vec<&str> = editor.draft().attributes.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, vec!["main_color", "screen", "nfc"]);
}

#[tokio::test]
async fn test_incomplete_variants_block_submission() {
    let backend = backend();
    let mut editor = filled_editor(backend.clone()).await;
    let (color, _) = add_color_size(&mut editor);
    let ids: Vec<OptionValueId> = editor.groups()[0].values.iter().map(|v| v.id.clone()).collect();
    for id in &ids {
        editor.deactivate_option_value(&color, id).unwrap();
    }
    assert!(editor.skus().is_empty());

    let err = editor.submit().await.unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    assert_eq!(
        editor.field_error("skus").map(|e| e.kind),
        Some(FieldErrorKind::Incomplete)
    );
    assert_eq!(backend.submission_count(), 0);
}
