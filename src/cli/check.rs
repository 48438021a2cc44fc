//! `docket check`: report broken local links.

use anyhow::{Result, bail};

use super::{CheckArgs, resolve_root};
use crate::links::check_links;
use crate::log;
use crate::utils::plural_count;

/// Run the link check; fails when any broken link is found.
pub fn check(args: &CheckArgs) -> Result<()> {
    let root = resolve_root(&args.path)?;
    let report = check_links(&root)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
        log!("check"; "{}", report);
    }

    if !report.is_clean() {
        bail!("link check failed in {}", plural_count(report.file_count(), "file"));
    }
    Ok(())
}
