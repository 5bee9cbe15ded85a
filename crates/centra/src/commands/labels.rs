//! Label command handlers.

use futures_util::TryStreamExt;
use tabled::Tabled;

use centra_api::{CentraClient, Label, LabelQuery};

use crate::cli::{GlobalOpts, LabelListArgs, LabelsArgs, LabelsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LabelRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl From<&Label> for LabelRow {
    fn from(l: &Label) -> Self {
        Self {
            id: l.id.clone(),
            key: l.key.clone(),
            value: l.value.clone(),
        }
    }
}

fn label_query(args: LabelListArgs) -> LabelQuery {
    LabelQuery {
        key: args.key,
        value: args.value,
        search: args.search,
        limit: args.limit,
        ..LabelQuery::default()
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &CentraClient,
    args: LabelsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LabelsCommand::List(list) => {
            let labels: Vec<Label> = client.labels(label_query(list)).try_collect().await?;
            let out = output::render_list(
                &global.output,
                &labels,
                |l| LabelRow::from(l),
                Label::display_name,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LabelsCommand::Add {
            key,
            value,
            asset_ids,
        } => {
            let id = client.add_label_to_assets(&asset_ids, &key, &value).await?;
            output::print_output(&id, global.quiet);
            if !global.quiet {
                eprintln!("Label '{key}: {value}' added to {} asset(s)", asset_ids.len());
            }
            Ok(())
        }

        LabelsCommand::Delete { name } => {
            if !util::confirm(
                &format!("Delete label '{name}'? Assets lose it as well."),
                "labels delete",
                global.yes,
            )? {
                return Ok(());
            }
            let id = client.delete_label_by_name(&name).await?;
            output::print_output(&id, global.quiet);
            if !global.quiet {
                eprintln!("Label deleted");
            }
            Ok(())
        }
    }
}
