//! Roster editing commands: add, edit and remove members.
//!
//! Members are stored under their NIF, so the NIF cannot be edited; remove
//! the member and add it again instead.

use std::io::Write;

use anyhow::{Context as _, Result, bail};
use canteras_lib::prelude::*;

use super::Context;
use crate::display::spinner;

/// New values for a member's fields. `None` keeps the stored value.
#[derive(Default)]
pub(crate) struct MemberFields {
    pub(crate) name: Option<String>,
    pub(crate) number: Option<String>,
    pub(crate) password: Option<String>,
}

/// Add a new member. Fails if a member with the same NIF exists.
pub(crate) async fn add_member(
    ctx: &Context,
    dni: &str,
    fields: MemberFields,
    out: &mut impl Write,
) -> Result<()> {
    let member = Member::from_input(
        dni,
        fields.name.as_deref().unwrap_or_default(),
        fields.number.as_deref().unwrap_or_default(),
        fields.password.as_deref().unwrap_or_default(),
    )
    .context("Please fill in every field")?;

    if find_member(ctx, &member.dni).await?.is_some() {
        bail!("A member with NIF {} already exists, use edit instead", member.dni);
    }

    store(ctx, &member).await?;
    writeln!(out, "Member added: {} ({})", member.name, member.dni)?;
    Ok(())
}

/// Update the given fields of an existing member.
pub(crate) async fn edit_member(
    ctx: &Context,
    dni: &str,
    fields: MemberFields,
    out: &mut impl Write,
) -> Result<()> {
    let dni = dni.trim();
    let Some(current) = find_member(ctx, dni).await? else {
        bail!("No member with NIF {dni}");
    };

    let number = fields.number.unwrap_or_else(|| current.number_text());
    let member = Member::from_input(
        dni,
        fields.name.as_deref().unwrap_or(&current.name),
        &number,
        fields.password.as_deref().unwrap_or(&current.password),
    )
    .context("Please fill in every field")?;

    store(ctx, &member).await?;
    writeln!(out, "Member updated: {} ({})", member.name, member.dni)?;
    Ok(())
}

/// Remove a member. Requires `confirmed`, the CLI's `--yes`.
pub(crate) async fn remove_member(
    ctx: &Context,
    dni: &str,
    confirmed: bool,
    out: &mut impl Write,
) -> Result<()> {
    let dni = dni.trim();
    let Some(member) = find_member(ctx, dni).await? else {
        bail!("No member with NIF {dni}");
    };
    if !confirmed {
        bail!("Refusing to remove member \"{}\" ({dni}) without --yes", member.name);
    }

    let source = ctx.source()?;
    let collection = &ctx.settings().collection;
    let pb = spinner(ctx.quiet(), format!("Removing {dni}"));
    let result = source.delete_document(collection, dni).await;
    pb.finish_and_clear();
    result.with_context(|| format!("Could not remove member {dni}"))?;

    writeln!(out, "Member removed: {} ({dni})", member.name)?;
    Ok(())
}

async fn find_member(ctx: &Context, dni: &str) -> Result<Option<Member>> {
    let source = ctx.source()?;
    let document = source
        .fetch_document(&ctx.settings().collection, dni)
        .await
        .with_context(|| format!("Could not read member {dni}"))?;
    Ok(document.as_ref().map(Member::from_document).transpose()?)
}

async fn store(ctx: &Context, member: &Member) -> Result<()> {
    let source = ctx.source()?;
    let document = member.to_document()?;
    let collection = &ctx.settings().collection;

    let pb = spinner(ctx.quiet(), format!("Saving {}", member.dni));
    let result = source.put_document(collection, &document).await;
    pb.finish_and_clear();
    result.with_context(|| format!("Could not save member {}", member.dni))?;

    tracing::info!(dni = %member.dni, collection = %collection, "member saved");
    Ok(())
}
