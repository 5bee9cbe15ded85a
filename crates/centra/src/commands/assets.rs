//! Asset command handlers.

use futures_util::TryStreamExt;
use tabled::Tabled;

use centra_api::{Asset, AssetQuery, AssetStatus, CentraClient};

use crate::cli::{AssetListArgs, AssetStatusArg, AssetsArgs, AssetsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "IP Addresses")]
    ips: String,
    #[tabled(rename = "Labels")]
    labels: String,
    #[tabled(rename = "Last Seen (UTC)")]
    last_seen: String,
}

impl From<&Asset> for AssetRow {
    fn from(a: &Asset) -> Self {
        Self {
            id: a.id.clone(),
            name: a.name.clone().unwrap_or_default(),
            status: a.status.clone().unwrap_or_default(),
            ips: a.ip_addresses.join(", "),
            labels: a
                .labels
                .iter()
                .map(|l| match (&l.key, &l.value) {
                    (Some(k), Some(v)) => format!("{k}: {v}"),
                    _ => l.id.clone(),
                })
                .collect::<Vec<_>>()
                .join(", "),
            last_seen: util::format_millis(a.last_seen),
        }
    }
}

impl From<AssetStatusArg> for AssetStatus {
    fn from(s: AssetStatusArg) -> Self {
        match s {
            AssetStatusArg::On => Self::On,
            AssetStatusArg::Off => Self::Off,
            AssetStatusArg::Deleted => Self::Deleted,
        }
    }
}

fn asset_query(args: AssetListArgs) -> AssetQuery {
    AssetQuery {
        sort: args.sort,
        status: args.status.into_iter().map(AssetStatus::from).collect(),
        search: args.search,
        labels: args.label,
        limit: args.limit,
        objects_per_page: args.page_size,
        ..AssetQuery::default()
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &CentraClient,
    args: AssetsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AssetsCommand::List(list) => {
            if list.page_size == 0 {
                return Err(CliError::Validation {
                    field: "page-size".into(),
                    reason: "must be at least 1".into(),
                });
            }
            let assets: Vec<Asset> = client.assets(asset_query(list)).try_collect().await?;
            let out = output::render_list(
                &global.output,
                &assets,
                |a| AssetRow::from(a),
                |a| a.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
