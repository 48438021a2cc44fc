//! `docket sidebar`: print the compiled navigation.

use anyhow::Result;

use super::{SidebarArgs, resolve_root};
use crate::config::DocsConfig;
use crate::sidebar::{SidebarOptions, compile_dir};

pub fn print_sidebar(args: &SidebarArgs) -> Result<()> {
    let root = resolve_root(&args.path)?;
    let config = DocsConfig::load(&root);
    let options = SidebarOptions::default().with_collapse_folders(config.sidebar.collapse_folders);
    let items = compile_dir(&root, &options)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&items)?
    } else {
        serde_json::to_string(&items)?
    };
    println!("{json}");
    Ok(())
}
