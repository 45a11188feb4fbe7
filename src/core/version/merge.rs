// ─── Descriptor Merge Engine ───
// Flattens an `inheritsFrom` chain into one self-contained descriptor.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, info};

use super::descriptor::{Arguments, ArgumentToken, SchemaGeneration, VersionDescriptor};
use crate::core::error::{LauncherError, LauncherResult};

/// Local descriptor lookup (`versions/<id>/<id>.json` on disk).
pub trait DescriptorSource: Send + Sync {
    /// Load one raw descriptor, `NotFound` when it is not stored locally.
    fn load(&self, id: &str) -> LauncherResult<VersionDescriptor>;

    fn exists(&self, id: &str) -> bool;
}

/// Makes a missing parent descriptor available to the [`DescriptorSource`].
#[async_trait]
pub trait ParentFetcher: Send + Sync {
    async fn fetch_if_missing(&self, id: &str) -> LauncherResult<()>;
}

/// Fetcher for fully offline resolution: a missing parent stays missing.
pub struct LocalOnly;

#[async_trait]
impl ParentFetcher for LocalOnly {
    async fn fetch_if_missing(&self, id: &str) -> LauncherResult<()> {
        Err(LauncherError::not_found(
            format!("version descriptor {} (offline)", id),
            id,
        ))
    }
}

/// Load `id` and merge every ancestor into it.
///
/// Missing parents are fetched first. A parent that cannot be fetched or
/// loaded, or an id that repeats in the chain, fails with `Merge`. The
/// returned descriptor has no parent and exactly the argument schema of the
/// root ancestor.
pub async fn resolve_full<S, F>(id: &str, source: &S, fetcher: &F) -> LauncherResult<VersionDescriptor>
where
    S: DescriptorSource + ?Sized,
    F: ParentFetcher + ?Sized,
{
    let mut chain = vec![source.load(id)?];
    let mut visited = HashSet::from([id.to_string()]);

    loop {
        let Some(parent_id) = chain
            .last()
            .and_then(|d| d.parent_id())
            .map(str::to_string)
        else {
            break;
        };

        if !visited.insert(parent_id.clone()) {
            return Err(LauncherError::merge(
                id,
                format!("cyclic inheritance through {}", parent_id),
            ));
        }

        if !source.exists(&parent_id) {
            debug!("Parent {} missing locally, fetching", parent_id);
            fetcher
                .fetch_if_missing(&parent_id)
                .await
                .map_err(|e| parent_unavailable(id, &parent_id, e))?;
        }

        let parent = source
            .load(&parent_id)
            .map_err(|e| parent_unavailable(id, &parent_id, e))?;
        chain.push(parent);
    }

    let depth = chain.len();
    let Some(mut merged) = chain.pop() else {
        return Err(LauncherError::merge(id, "empty inheritance chain"));
    };
    let root_schema = merged.schema();

    while let Some(child) = chain.pop() {
        merged = merge_parent(child, merged);
    }

    if let Some(schema) = root_schema {
        normalize_schema(&mut merged, schema);
    }
    merged.inherits_from = None;

    info!("Resolved {} through {} descriptor(s)", id, depth);
    Ok(merged)
}

fn parent_unavailable(id: &str, parent_id: &str, cause: LauncherError) -> LauncherError {
    LauncherError::Merge {
        id: id.to_string(),
        reason: format!("parent {} unavailable", parent_id),
        source: Some(Box::new(cause)),
    }
}

/// Merge one child onto its already-resolved parent.
///
/// Libraries run child first. Scalar fields take the child's value when it
/// has one. Argument lists are inherited when the child's is absent and
/// appended after the child's otherwise.
pub fn merge_parent(child: VersionDescriptor, parent: VersionDescriptor) -> VersionDescriptor {
    let mut libraries = child.libraries;
    libraries.extend(parent.libraries);

    let jar = child.jar.or(parent.jar).or_else(|| Some(parent.id.clone()));

    VersionDescriptor {
        id: child.id,
        inherits_from: child.inherits_from,
        main_class: child.main_class.or(parent.main_class),
        minecraft_arguments: child.minecraft_arguments.or(parent.minecraft_arguments),
        arguments: merge_arguments(child.arguments, parent.arguments),
        libraries,
        asset_index: child.asset_index.or(parent.asset_index),
        assets: child.assets.or(parent.assets),
        downloads: child.downloads.or(parent.downloads),
        jar,
        version_type: child.version_type.or(parent.version_type),
        java_version: child.java_version.or(parent.java_version),
    }
}

fn merge_arguments(child: Option<Arguments>, parent: Option<Arguments>) -> Option<Arguments> {
    match (child, parent) {
        (None, parent) => parent,
        (child, None) => child,
        (Some(child), Some(parent)) => Some(Arguments {
            game: append_tokens(child.game, parent.game),
            jvm: append_tokens(child.jvm, parent.jvm),
        }),
    }
}

fn append_tokens(
    child: Option<Vec<ArgumentToken>>,
    parent: Option<Vec<ArgumentToken>>,
) -> Option<Vec<ArgumentToken>> {
    match (child, parent) {
        (None, parent) => parent,
        (Some(mut child), Some(parent)) => {
            child.extend(parent);
            Some(child)
        }
        (child, None) => child,
    }
}

/// Keep only the argument representation of the root's generation.
fn normalize_schema(descriptor: &mut VersionDescriptor, root: SchemaGeneration) {
    match root {
        SchemaGeneration::Modern => {
            if descriptor.minecraft_arguments.take().is_some() {
                debug!("Dropping legacy arguments of {}: root is modern", descriptor.id);
            }
        }
        SchemaGeneration::Legacy => {
            if descriptor.arguments.take().is_some() {
                debug!("Dropping structured arguments of {}: root is legacy", descriptor.id);
            }
        }
    }
}
