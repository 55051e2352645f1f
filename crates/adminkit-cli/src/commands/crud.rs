//! Resource commands: list, get, create, update and delete.

use std::io;

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;

use adminkit_core::{Entity, EntityId, PageMeta, PageRequest, Record, ResourceKind};
use adminkit_http::ResourceStore;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Collection: users, roles, permissions, customers, leads, projects, tasks
    pub kind: ResourceKind,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Entities per page
    #[arg(long, default_value_t = 10)]
    pub per_page: u32,

    /// Fetch the whole collection in one unpaginated call
    #[arg(long, conflicts_with_all = ["page", "per_page"])]
    pub all: bool,

    /// Only show users holding this role
    #[arg(long)]
    pub role: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    pub kind: ResourceKind,

    pub id: EntityId,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    pub kind: ResourceKind,

    /// Entity as a JSON object, or '-' to read it from stdin
    #[arg(long)]
    pub data: String,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub kind: ResourceKind,

    pub id: EntityId,

    /// Entity as a JSON object, or '-' to read it from stdin
    #[arg(long)]
    pub data: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub kind: ResourceKind,

    pub id: EntityId,
}

pub async fn list(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let session = session::open_authenticated(global)?;

    if let Some(role) = &args.role {
        if args.kind != ResourceKind::Users {
            bail!("--role only applies to users");
        }
        let users = session.users();
        let meta = fetch(&users, &args).await?;
        print_items(&users.users_by_role(role), args.pretty)?;
        return print_page_info(meta.as_ref());
    }

    let store = session.records(args.kind);
    let meta = fetch(&store, &args).await?;
    print_items(&store.items(), args.pretty)?;
    print_page_info(meta.as_ref())
}

pub async fn get(global: &GlobalArgs, args: GetArgs) -> Result<()> {
    let session = session::open_authenticated(global)?;

    let record: Record = session
        .resource(args.kind)
        .get(&args.id)
        .await
        .with_context(|| format!("Failed to fetch {}/{}", args.kind, args.id))?;

    output::json_pretty(&record)
}

pub async fn create(global: &GlobalArgs, args: CreateArgs) -> Result<()> {
    let session = session::open_authenticated(global)?;
    let record = read_record(&args.data)?;

    let created = session
        .resource(args.kind)
        .create(&record)
        .await
        .with_context(|| format!("Failed to create {} entry", args.kind))?;

    output::success(&format!("Created {} entry", args.kind));
    output::json_pretty(&created)
}

pub async fn update(global: &GlobalArgs, args: UpdateArgs) -> Result<()> {
    let session = session::open_authenticated(global)?;
    let record = read_record(&args.data)?;

    let updated = session
        .resource(args.kind)
        .update(&args.id, &record)
        .await
        .with_context(|| format!("Failed to update {}/{}", args.kind, args.id))?;

    output::success(&format!("Updated {}/{}", args.kind, args.id));
    output::json_pretty(&updated)
}

pub async fn delete(global: &GlobalArgs, args: DeleteArgs) -> Result<()> {
    let session = session::open_authenticated(global)?;

    session
        .resource::<Record>(args.kind)
        .delete(&args.id)
        .await
        .with_context(|| format!("Failed to delete {}/{}", args.kind, args.id))?;

    output::success(&format!("Deleted {}/{}", args.kind, args.id));

    Ok(())
}

/// Fill `store` as requested; pagination metadata only for paged fetches.
async fn fetch<T: Entity>(store: &ResourceStore<T>, args: &ListArgs) -> Result<Option<PageMeta>> {
    let kind = store.resource().kind();

    if args.all {
        store
            .fetch_all()
            .await
            .with_context(|| format!("Failed to list {}", kind))?;
        return Ok(None);
    }

    let meta = store
        .fetch(PageRequest::new(args.page, args.per_page))
        .await
        .with_context(|| format!("Failed to list {}", kind))?;
    Ok(Some(meta))
}

fn print_items<T: Serialize>(items: &[T], pretty: bool) -> Result<()> {
    if items.is_empty() {
        output::note("No records found.");
        return Ok(());
    }

    for item in items {
        if pretty {
            output::json_pretty(item)?;
        } else {
            output::json(item)?;
        }
    }

    Ok(())
}

fn print_page_info(meta: Option<&PageMeta>) -> Result<()> {
    let Some(meta) = meta else {
        return Ok(());
    };

    eprintln!();
    output::note(&format!(
        "Page {} of {} ({} total)",
        meta.current_page, meta.last_page, meta.total
    ));
    if meta.has_next() {
        output::note(&format!("Next page: --page {}", meta.current_page + 1));
    }

    Ok(())
}

fn read_record(data: &str) -> Result<Record> {
    let json = if data == "-" {
        io::read_to_string(io::stdin()).context("Failed to read stdin")?
    } else {
        data.to_string()
    };

    serde_json::from_str(&json).context("Entity data must be a JSON object")
}
