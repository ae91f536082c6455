use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::client::{
    FormController, ItemDraft, ItemsApi, ItemsView, SortDirection, SortField, StaticTokenSource,
    SubmitOutcome, TokenSource,
};

#[derive(Subcommand)]
pub enum ItemsCommands {
    #[command(about = "List all items")]
    List {
        #[arg(long, value_enum, help = "Sort field")]
        sort: Option<SortKey>,
        #[arg(long, help = "Sort descending instead of ascending")]
        desc: bool,
    },

    #[command(about = "Add an item to the list")]
    Add {
        #[arg(help = "Who is bringing it")]
        name: String,
        #[arg(help = "What they are bringing")]
        value: String,
        #[arg(long, help = "Verification token (falls back to RECAPTCHA_TOKEN)")]
        token: Option<String>,
    },

    #[command(about = "Update an existing item")]
    Update {
        #[arg(help = "Item ID")]
        id: String,
        #[arg(help = "Who is bringing it")]
        name: String,
        #[arg(help = "What they are bringing")]
        value: String,
        #[arg(long, help = "Verification token (falls back to RECAPTCHA_TOKEN)")]
        token: Option<String>,
    },

    #[command(about = "Delete an item")]
    Delete {
        #[arg(help = "Item ID")]
        id: String,
        #[arg(long, help = "Verification token (falls back to RECAPTCHA_TOKEN)")]
        token: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SortKey {
    Id,
    Name,
    Value,
}

impl From<SortKey> for SortField {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Id => SortField::Id,
            SortKey::Name => SortField::Name,
            SortKey::Value => SortField::Value,
        }
    }
}

pub async fn handle(
    cmd: ItemsCommands,
    output_format: OutputFormat,
    base_url: &str,
) -> anyhow::Result<()> {
    let api = ItemsApi::new(base_url);

    match cmd {
        ItemsCommands::List { sort, desc } => {
            let mut view = ItemsView::new(api);
            if let Some(key) = sort {
                view.sort_field = key.into();
            }
            if desc {
                view.sort_direction = SortDirection::Desc;
            }

            view.fetch(true).await;

            if let Some(error) = &view.error {
                output_error(&output_format, error)?;
                anyhow::bail!("failed to fetch items");
            }

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&view.items)?);
                }
                OutputFormat::Text => {
                    for item in &view.items {
                        println!("{:<24} {:<32} {}", item.name, item.value, item.id);
                    }
                    println!("Total items: {}", view.items.len());
                }
            }
            Ok(())
        }

        ItemsCommands::Add { name, value, token } => {
            let mut controller = FormController::new();
            controller.form = ItemDraft { name, value };
            controller.submit()?;

            match complete_action(&mut controller, &api, token).await? {
                SubmitOutcome::Completed(item) => {
                    let id = item.map(|i| i.id).unwrap_or_default();
                    let total = silent_refresh(&api).await;
                    output_success(
                        &output_format,
                        "Item added",
                        Some(json!({ "id": id, "total": total })),
                    )
                }
                SubmitOutcome::Failed => report_failure(&controller, &output_format),
            }
        }

        ItemsCommands::Update { id, name, value, token } => {
            // Edit goes through the shared form, loaded from the live item
            let mut view = ItemsView::new(api.clone());
            view.fetch(true).await;

            if let Some(error) = &view.error {
                output_error(&output_format, error)?;
                anyhow::bail!("failed to fetch items");
            }

            let Some(item) = view.items.iter().find(|i| i.id == id) else {
                output_error(&output_format, &format!("Item not found: {}", id))?;
                anyhow::bail!("item not found");
            };

            let mut controller = FormController::new();
            controller.open_edit(item);
            controller.form = ItemDraft { name, value };
            controller.submit()?;

            match complete_action(&mut controller, &api, token).await? {
                SubmitOutcome::Completed(_) => {
                    let total = silent_refresh(&api).await;
                    output_success(
                        &output_format,
                        "Item updated",
                        Some(json!({ "id": id, "total": total })),
                    )
                }
                SubmitOutcome::Failed => report_failure(&controller, &output_format),
            }
        }

        ItemsCommands::Delete { id, token } => {
            let mut controller = FormController::new();
            controller.request_delete(&id)?;

            match complete_action(&mut controller, &api, token).await? {
                SubmitOutcome::Completed(_) => {
                    let total = silent_refresh(&api).await;
                    output_success(
                        &output_format,
                        "Item deleted",
                        Some(json!({ "id": id, "total": total })),
                    )
                }
                SubmitOutcome::Failed => report_failure(&controller, &output_format),
            }
        }
    }
}

/// Acquire a token from the headless source and run the recorded action.
async fn complete_action(
    controller: &mut FormController,
    api: &ItemsApi,
    token_flag: Option<String>,
) -> anyhow::Result<SubmitOutcome> {
    let source = StaticTokenSource(token_flag.or_else(|| std::env::var("RECAPTCHA_TOKEN").ok()));
    let token = source.acquire().await;
    Ok(controller.on_verification(api, token).await?)
}

/// The post-mutation re-read: fetch without the blocking flag and report
/// the refreshed count.
async fn silent_refresh(api: &ItemsApi) -> Option<usize> {
    let mut view = ItemsView::new(api.clone());
    view.fetch(false).await;
    match view.error {
        None => Some(view.items.len()),
        Some(_) => None,
    }
}

fn report_failure(controller: &FormController, output_format: &OutputFormat) -> anyhow::Result<()> {
    let message = controller.error.as_deref().unwrap_or("Action failed");
    output_error(output_format, message)?;
    anyhow::bail!("{}", message)
}
