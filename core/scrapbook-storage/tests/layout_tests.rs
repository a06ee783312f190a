mod common;

use common::{Fixture, draft, photo, sticker, text};
use pretty_assertions::assert_eq;
use scrapbook_model::{ElementProperties, ElementSpec, ElementType, PagePatch, ordering};
use scrapbook_storage::{LayoutUpdate, StoreError};
use scrapbook_types::{ErrorKind, PageId, UserId};
use serde_json::json;

fn elements_only(drafts: Vec<scrapbook_model::ElementDraft>) -> LayoutUpdate {
    LayoutUpdate {
        page: PagePatch::default(),
        elements: Some(drafts),
    }
}

fn specs(layout: &scrapbook_model::PageLayout) -> Vec<ElementSpec> {
    layout.elements.iter().map(|e| e.to_spec()).collect()
}

// ── replace-all ──────────────────────────────────────────────────

#[test]
fn sticker_replaces_text_and_photo() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let p1 = fx.page(&book, 0);

    fx.layouts
        .replace_layout(&p1.id, &owner, &elements_only(vec![text(0, "hello"), photo(5, "https://img.example.com/a.jpg")]))
        .unwrap();

    let update = LayoutUpdate {
        page: PagePatch {
            background_color: Some("#fff".into()),
            background_image_url: None,
        },
        elements: Some(vec![draft(json!({
            "type": "sticker",
            "xPos": 10,
            "yPos": 20,
            "zIndex": 1,
            "scale": 2,
            "properties": { "stickerId": "star" }
        }))]),
    };
    fx.layouts.replace_layout(&p1.id, &owner, &update).unwrap();

    let layout = fx.layouts.page_layout(&p1.id, &owner).unwrap();
    assert_eq!(layout.page.background_color.as_deref(), Some("#fff"));
    assert_eq!(layout.elements.len(), 1);

    let el = &layout.elements[0];
    assert_eq!(el.element_type, ElementType::Sticker);
    assert_eq!((el.x_pos, el.y_pos), (10.0, 20.0));
    assert_eq!(el.z_index, 1);
    assert_eq!(el.scale, 2.0);
    assert_eq!(el.rotation, 0.0);
    match &el.properties {
        ElementProperties::Sticker(s) => assert_eq!(s.sticker_id, "star"),
        other => panic!("expected sticker properties, got {other:?}"),
    }
    assert!(layout.elements.iter().all(|e| e.element_type == ElementType::Sticker));
}

#[test]
fn result_matches_submitted_set_in_render_order() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);

    let drafts = vec![
        text(7, "top"),
        photo(-2, "https://img.example.com/bg.jpg"),
        sticker(3, "heart"),
        text(3, "same layer, later"),
    ];
    fx.layouts.replace_layout(&page.id, &owner, &elements_only(drafts.clone())).unwrap();

    let mut expected: Vec<ElementSpec> = drafts.iter().map(|d| d.validate().unwrap()).collect();
    ordering::sort_for_render(&mut expected);

    let layout = fx.layouts.page_layout(&page.id, &owner).unwrap();
    assert_eq!(specs(&layout), expected);
    assert!(ordering::is_render_ordered(&layout.elements));
    assert!(layout.elements.iter().all(|e| e.page_id == page.id));
}

#[test]
fn empty_list_deletes_everything() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);

    fx.layouts
        .replace_layout(&page.id, &owner, &elements_only(vec![text(0, "a"), text(1, "b")]))
        .unwrap();
    fx.layouts.replace_layout(&page.id, &owner, &elements_only(vec![])).unwrap();

    let layout = fx.layouts.page_layout(&page.id, &owner).unwrap();
    assert!(layout.elements.is_empty());
}

#[test]
fn absent_elements_leave_existing_ones() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);

    fx.layouts
        .replace_layout(&page.id, &owner, &elements_only(vec![text(0, "keep me")]))
        .unwrap();
    let before = fx.layouts.page_layout(&page.id, &owner).unwrap();

    let update = LayoutUpdate {
        page: PagePatch {
            background_color: Some("#123456".into()),
            background_image_url: None,
        },
        elements: None,
    };
    fx.layouts.replace_layout(&page.id, &owner, &update).unwrap();

    let after = fx.layouts.page_layout(&page.id, &owner).unwrap();
    assert_eq!(after.elements, before.elements);
    assert_eq!(after.page.background_color.as_deref(), Some("#123456"));
}

#[test]
fn omitted_background_fields_are_untouched() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);

    let first = LayoutUpdate {
        page: PagePatch {
            background_color: Some("#000".into()),
            background_image_url: Some("https://img.example.com/paper.png".into()),
        },
        elements: None,
    };
    fx.layouts.replace_layout(&page.id, &owner, &first).unwrap();

    let second = LayoutUpdate {
        page: PagePatch {
            background_color: Some("#fff".into()),
            background_image_url: None,
        },
        elements: Some(vec![]),
    };
    fx.layouts.replace_layout(&page.id, &owner, &second).unwrap();

    let layout = fx.layouts.page_layout(&page.id, &owner).unwrap();
    assert_eq!(layout.page.background_color.as_deref(), Some("#fff"));
    assert_eq!(
        layout.page.background_image_url.as_deref(),
        Some("https://img.example.com/paper.png")
    );
    assert!(layout.elements.is_empty());
}

#[test]
fn replacing_twice_is_idempotent() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);
    let update = elements_only(vec![sticker(2, "star"), text(1, "caption")]);

    fx.layouts.replace_layout(&page.id, &owner, &update).unwrap();
    let first = fx.layouts.page_layout(&page.id, &owner).unwrap();
    fx.layouts.replace_layout(&page.id, &owner, &update).unwrap();
    let second = fx.layouts.page_layout(&page.id, &owner).unwrap();

    assert_eq!(specs(&first), specs(&second));
    // Fresh identities on every replacement.
    assert!(first.elements.iter().all(|a| second.elements.iter().all(|b| a.id != b.id)));
}

#[test]
fn replace_bumps_scrapbook_updated_at() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);
    std::thread::sleep(std::time::Duration::from_millis(5));

    fx.layouts.replace_layout(&page.id, &owner, &elements_only(vec![text(0, "x")])).unwrap();

    let detail = fx.scrapbooks.get(&book.id, &owner).unwrap();
    assert!(detail.scrapbook.updated_at > book.updated_at);
}

// ── authorization ────────────────────────────────────────────────

#[test]
fn non_owner_is_forbidden_and_nothing_changes() {
    let fx = Fixture::new();
    let u1 = UserId::new();
    let u2 = UserId::new();
    let book = fx.scrapbook(&u1, false);
    let page = fx.page(&book, 0);
    fx.layouts
        .replace_layout(&page.id, &u1, &elements_only(vec![text(0, "mine"), photo(1, "https://img.example.com/me.jpg")]))
        .unwrap();
    let before = fx.layouts.page_layout(&page.id, &u1).unwrap();

    let attack = LayoutUpdate {
        page: PagePatch {
            background_color: Some("#f00".into()),
            background_image_url: None,
        },
        elements: Some(vec![]),
    };
    let err = fx.layouts.replace_layout(&page.id, &u2, &attack).unwrap_err();
    assert!(matches!(err, StoreError::Forbidden { entity: "page", .. }));
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let after = fx.layouts.page_layout(&page.id, &u1).unwrap();
    assert_eq!(after, before);
}

#[test]
fn unknown_page_is_not_found() {
    let fx = Fixture::new();
    let err = fx
        .layouts
        .replace_layout(&PageId::new(), &UserId::new(), &elements_only(vec![text(0, "x")]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

fn bad_scale_batch() -> LayoutUpdate {
    elements_only(vec![
        text(0, "fine"),
        draft(json!({
            "type": "photo", "xPos": 0, "yPos": 0, "scale": -1, "zIndex": 1,
            "properties": { "imageUrl": "https://img.example.com/x.jpg" }
        })),
    ])
}

#[test]
fn stranger_is_forbidden_even_with_malformed_payload() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);
    fx.layouts.replace_layout(&page.id, &owner, &elements_only(vec![sticker(0, "kept")])).unwrap();

    let err = fx.layouts.replace_layout(&page.id, &UserId::new(), &bad_scale_batch()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let layout = fx.layouts.page_layout(&page.id, &owner).unwrap();
    assert_eq!(layout.elements.len(), 1);
    assert_eq!(layout.elements[0].element_type, ElementType::Sticker);
}

#[test]
fn missing_page_is_not_found_even_with_malformed_payload() {
    let fx = Fixture::new();
    let err = fx
        .layouts
        .replace_layout(&PageId::new(), &UserId::new(), &bad_scale_batch())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn add_element_checks_ownership_before_payload() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);
    let bad = draft(json!({
        "type": "balloon", "xPos": 0, "yPos": 0, "zIndex": 0, "properties": {}
    }));

    let err = fx.layouts.add_element(&page.id, &UserId::new(), &bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    let err = fx.layouts.add_element(&PageId::new(), &owner, &bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = fx.layouts.add_element(&page.id, &owner, &bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

// ── validation ───────────────────────────────────────────────────

#[test]
fn invalid_element_rejects_whole_batch() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);
    fx.layouts.replace_layout(&page.id, &owner, &elements_only(vec![text(0, "old")])).unwrap();

    let bad = elements_only(vec![
        sticker(1, "ok"),
        draft(json!({
            "type": "photo", "xPos": 0, "yPos": 0, "scale": 0, "zIndex": 1,
            "properties": { "imageUrl": "https://img.example.com/x.jpg" }
        })),
    ]);
    let err = fx.layouts.replace_layout(&page.id, &owner, &bad).unwrap_err();
    match err {
        StoreError::Validation(v) => assert_eq!(v.field, "elements[1].scale"),
        other => panic!("expected validation error, got {other:?}"),
    }

    let layout = fx.layouts.page_layout(&page.id, &owner).unwrap();
    assert_eq!(layout.elements.len(), 1);
    assert_eq!(layout.elements[0].element_type, ElementType::Text);
}

#[test]
fn invalid_background_url_is_rejected() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);

    let update = LayoutUpdate {
        page: PagePatch {
            background_color: None,
            background_image_url: Some("not a url".into()),
        },
        elements: None,
    };
    let err = fx.layouts.replace_layout(&page.id, &owner, &update).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

// ── atomicity ────────────────────────────────────────────────────

#[test]
fn failed_insert_rolls_back_delete_and_patch() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);
    fx.layouts
        .replace_layout(&page.id, &owner, &elements_only(vec![text(0, "survivor"), photo(4, "https://img.example.com/s.jpg")]))
        .unwrap();
    let before = fx.layouts.page_layout(&page.id, &owner).unwrap();

    fx.db
        .execute_batch(
            "CREATE TRIGGER fail_insert BEFORE INSERT ON page_elements
             WHEN NEW.z_index = 999
             BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
        )
        .unwrap();

    let update = LayoutUpdate {
        page: PagePatch {
            background_color: Some("#abcdef".into()),
            background_image_url: None,
        },
        elements: Some(vec![sticker(1, "first"), sticker(999, "boom"), sticker(2, "never")]),
    };
    let err = fx.layouts.replace_layout(&page.id, &owner, &update).unwrap_err();
    assert!(matches!(err, StoreError::Database(_)));
    assert_eq!(err.kind(), ErrorKind::Storage);

    let after = fx.layouts.page_layout(&page.id, &owner).unwrap();
    assert_eq!(after, before);
}

// ── add_element ──────────────────────────────────────────────────

#[test]
fn add_element_is_additive() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);
    fx.layouts.replace_layout(&page.id, &owner, &elements_only(vec![text(5, "existing")])).unwrap();

    let added = fx.layouts.add_element(&page.id, &owner, &sticker(1, "moon")).unwrap();
    assert_eq!(added.page_id, page.id);
    assert_eq!(added.element_type, ElementType::Sticker);

    let layout = fx.layouts.page_layout(&page.id, &owner).unwrap();
    assert_eq!(layout.elements.len(), 2);
    assert_eq!(layout.elements[0].id, added.id);
    assert_eq!(layout.elements[1].element_type, ElementType::Text);
}

#[test]
fn add_element_requires_ownership() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);

    let err = fx.layouts.add_element(&page.id, &UserId::new(), &text(0, "x")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert!(fx.layouts.page_layout(&page.id, &owner).unwrap().elements.is_empty());
}

// ── reads ────────────────────────────────────────────────────────

#[test]
fn private_page_hidden_from_others() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, true);
    let page = fx.page(&book, 0);

    assert!(fx.layouts.page_layout(&page.id, &owner).is_ok());
    let err = fx.layouts.page_layout(&page.id, &UserId::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[test]
fn public_page_readable_by_anyone() {
    let fx = Fixture::new();
    let owner = UserId::new();
    let book = fx.scrapbook(&owner, false);
    let page = fx.page(&book, 0);
    fx.layouts.replace_layout(&page.id, &owner, &elements_only(vec![text(0, "hi")])).unwrap();

    let layout = fx.layouts.page_layout(&page.id, &UserId::new()).unwrap();
    assert_eq!(layout.elements.len(), 1);
}
