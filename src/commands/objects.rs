//! Object commands: get, list, delete, patch, annotate, apply.

use super::{print_json, to_labels, to_namespace};
use crate::cli::{AnnotateArgs, ApplyArgs, ApplyUriArgs, GetArgs, PatchArgs, SelectArgs};
use kubernetes_cli::exit_codes;
use kubernetes_cli::{Manifest, Result, Session};

pub fn cmd_get(session: &mut Session<'_>, args: GetArgs) -> Result<i32> {
    let object = session.get_object(&args.kind, &args.namespace, &args.name)?;
    print_json(&object)
}

pub fn cmd_list(session: &mut Session<'_>, args: SelectArgs) -> Result<i32> {
    let namespace = to_namespace(args.namespace, args.all_namespaces);
    let objects = session.get_objects(&args.kind, &namespace, &to_labels(args.labels))?;
    print_json(&objects)
}

pub fn cmd_delete(session: &mut Session<'_>, args: GetArgs) -> Result<i32> {
    session.delete_object(&args.kind, &args.namespace, &args.name)?;
    Ok(exit_codes::SUCCESS)
}

pub fn cmd_delete_all(session: &mut Session<'_>, args: SelectArgs) -> Result<i32> {
    let namespace = to_namespace(args.namespace, args.all_namespaces);
    session.delete_objects(&args.kind, &namespace, &to_labels(args.labels))?;
    Ok(exit_codes::SUCCESS)
}

pub fn cmd_patch(session: &mut Session<'_>, args: PatchArgs) -> Result<i32> {
    session.patch_object(
        &args.kind,
        &args.namespace,
        &args.name,
        &args.patch,
        args.patch_type,
    )?;
    Ok(exit_codes::SUCCESS)
}

pub fn cmd_annotate(session: &mut Session<'_>, args: AnnotateArgs) -> Result<i32> {
    session.annotate(
        &args.kind,
        &args.namespace,
        &args.name,
        &to_labels(args.annotations),
        !args.no_overwrite,
    )?;
    Ok(exit_codes::SUCCESS)
}

pub fn cmd_apply(session: &mut Session<'_>, args: ApplyArgs) -> Result<i32> {
    let manifest = Manifest::load(&args.file)?;
    session.apply(&manifest, args.dry_run)?;
    Ok(exit_codes::SUCCESS)
}

pub fn cmd_apply_uri(session: &mut Session<'_>, args: ApplyUriArgs) -> Result<i32> {
    session.apply_uri(&args.uri, args.dry_run)?;
    Ok(exit_codes::SUCCESS)
}
