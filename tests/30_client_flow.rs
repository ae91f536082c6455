mod common;

use anyhow::Result;

use common::{ensure_server, unique_name, VALID_TOKEN};
use potluck_api::client::{
    FormController, ItemDraft, ItemsApi, ItemsView, SortDirection, SortField, SubmitOutcome,
};

fn token() -> Option<String> {
    Some(VALID_TOKEN.to_string())
}

#[tokio::test]
async fn view_fetches_and_sorts_the_collection() -> Result<()> {
    let server = ensure_server().await?;
    let api = ItemsApi::new(&server.base_url);

    let first = api.create_item(&unique_name("zeta"), "Wine", VALID_TOKEN).await?;
    let second = api.create_item(&unique_name("alpha"), "Bread", VALID_TOKEN).await?;

    let mut view = ItemsView::new(api.clone());
    view.fetch(true).await;

    assert!(view.error.is_none(), "fetch failed: {:?}", view.error);
    assert!(!view.loading && !view.refreshing);
    let names: Vec<String> = view.items.iter().map(|i| i.name.clone()).collect();
    let mut sorted = names.clone();
    sorted.sort_by_key(|n| n.to_lowercase());
    assert_eq!(names, sorted, "default fetch applies name-ascending order");

    // Toggling the active field reverses the order exactly
    view.handle_sort(SortField::Name);
    assert_eq!(view.sort_direction, SortDirection::Desc);
    let reversed: Vec<String> = view.items.iter().map(|i| i.name.clone()).collect();
    let mut expected = sorted.clone();
    expected.reverse();
    assert_eq!(reversed, expected);

    api.delete_item(&first.id, VALID_TOKEN).await?;
    api.delete_item(&second.id, VALID_TOKEN).await?;
    Ok(())
}

#[tokio::test]
async fn controller_creates_then_silently_refreshes() -> Result<()> {
    let server = ensure_server().await?;
    let api = ItemsApi::new(&server.base_url);
    let name = unique_name("create-flow");

    let mut controller = FormController::new();
    controller.form = ItemDraft {
        name: name.clone(),
        value: "Pie".to_string(),
    };
    controller.submit()?;
    assert!(controller.is_awaiting_verification());

    let outcome = controller.on_verification(&api, token()).await?;
    let created = match outcome {
        SubmitOutcome::Completed(Some(item)) => item,
        other => panic!("expected a created item, got {:?}", other),
    };
    assert!(controller.is_idle());
    assert_eq!(controller.form, ItemDraft::default(), "form cleared on success");

    // Mutation is followed by a silent re-read, not a local patch
    let mut view = ItemsView::new(api.clone());
    view.fetch(false).await;
    assert!(view.error.is_none());
    assert!(view.items.iter().any(|i| i.id == created.id && i.name == name));

    api.delete_item(&created.id, VALID_TOKEN).await?;
    Ok(())
}

#[tokio::test]
async fn controller_updates_through_the_shared_form() -> Result<()> {
    let server = ensure_server().await?;
    let api = ItemsApi::new(&server.base_url);
    let name = unique_name("update-flow");

    let created = api.create_item(&name, "Pie", VALID_TOKEN).await?;

    let mut controller = FormController::new();
    controller.open_edit(&created);
    controller.form.value = "Cake".to_string();
    controller.submit()?;

    let outcome = controller.on_verification(&api, token()).await?;
    assert!(matches!(outcome, SubmitOutcome::Completed(Some(_))));

    let mut view = ItemsView::new(api.clone());
    view.fetch(false).await;
    let updated = view
        .items
        .iter()
        .find(|i| i.id == created.id)
        .expect("updated item still listed");
    assert_eq!(updated.name, name);
    assert_eq!(updated.value, "Cake");

    api.delete_item(&created.id, VALID_TOKEN).await?;
    Ok(())
}

#[tokio::test]
async fn controller_deletes_by_id() -> Result<()> {
    let server = ensure_server().await?;
    let api = ItemsApi::new(&server.base_url);

    let created = api.create_item(&unique_name("delete-flow"), "Pie", VALID_TOKEN).await?;

    let mut controller = FormController::new();
    controller.request_delete(&created.id)?;

    let outcome = controller.on_verification(&api, token()).await?;
    assert!(matches!(outcome, SubmitOutcome::Completed(None)));

    let mut view = ItemsView::new(api.clone());
    view.fetch(false).await;
    assert!(view.items.iter().all(|i| i.id != created.id));

    Ok(())
}

#[tokio::test]
async fn controller_surfaces_server_rejection_and_keeps_the_form() -> Result<()> {
    let server = ensure_server().await?;
    let api = ItemsApi::new(&server.base_url);
    let draft = ItemDraft {
        name: unique_name("rejected"),
        value: "Pie".to_string(),
    };

    let mut controller = FormController::new();
    controller.form = draft.clone();
    controller.submit()?;

    // The oracle denies this token, so the server answers 400
    let outcome = controller
        .on_verification(&api, Some("bogus".to_string()))
        .await?;
    assert!(matches!(outcome, SubmitOutcome::Failed));
    assert!(controller.is_idle());
    let message = controller.error.clone().expect("error surfaced inline");
    assert!(message.contains("reCAPTCHA verification failed"), "got: {message}");
    assert_eq!(controller.form, draft, "form preserved for retry");

    // And nothing landed in the store
    let mut view = ItemsView::new(api.clone());
    view.fetch(true).await;
    assert!(view.items.iter().all(|i| i.name != draft.name));

    Ok(())
}
