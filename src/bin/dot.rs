// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use dotlink::{
    link::{
        report::{Report, Reportable},
        Linker,
    },
    profile::{parse_profile_list, FlatMapping, DEFAULT_PROFILE},
    root::DotfilesRoot,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::{
    io::{stderr, stdout},
    path::PathBuf,
    process::exit,
};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "dot [options] <command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    /// Path to dotfiles directory instead of $DOT_DIR or ~/.dotfiles.
    #[arg(short, long, global = true, value_name = "path")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        let root = DotfilesRoot::locate(self.root)?;
        match self.command {
            Command::Link(opts) => run_link(&root, opts),
            Command::Check(opts) => run_check(&root, opts),
            Command::Clean(opts) => run_clean(&root, opts),
            Command::List(opts) => run_list(&root, opts),
            Command::Root => run_root(&root),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Link dotfiles of selected profiles into place.
    #[command(override_usage = "dot link [options]")]
    Link(LinkOptions),

    /// Check that dotfiles of selected profiles are correctly linked.
    #[command(override_usage = "dot check [options]")]
    Check(ProfileOptions),

    /// Remove links of selected profiles.
    #[command(override_usage = "dot clean [options]")]
    Clean(ProfileOptions),

    /// List link state of every dotfile of selected profiles.
    #[command(override_usage = "dot list [options]")]
    List(ProfileOptions),

    /// Show path to dotfiles directory.
    #[command(override_usage = "dot root")]
    Root,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ProfileOptions {
    /// Comma separated list of profiles to use.
    #[arg(short, long, default_value = DEFAULT_PROFILE, value_name = "profiles")]
    pub profile: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct LinkOptions {
    #[command(flatten)]
    pub profiles: ProfileOptions,

    /// Show what would be done without touching anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(stderr);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

// Nothing gets touched unless every requested profile exists.
fn resolve_mapping(
    root: &DotfilesRoot,
    opts: &ProfileOptions,
) -> Result<(Vec<String>, FlatMapping)> {
    let table = root.load_profiles()?;
    let profiles = parse_profile_list(&opts.profile);
    let mapping = table.merge(&profiles)?;

    Ok((profiles, mapping))
}

fn render<E: Reportable>(report: &Report<E>) -> Result<()> {
    report.render(&mut stdout().lock(), &mut stderr().lock())?;
    Ok(())
}

fn run_link(root: &DotfilesRoot, opts: LinkOptions) -> Result<()> {
    let (_, mapping) = resolve_mapping(root, &opts.profiles)?;
    let linker = Linker::with_user_home(root.as_path());
    render(&linker.link(&mapping, opts.dry_run))
}

fn run_check(root: &DotfilesRoot, opts: ProfileOptions) -> Result<()> {
    let (_, mapping) = resolve_mapping(root, &opts)?;
    let linker = Linker::with_user_home(root.as_path());
    let report = linker.check(&mapping);
    render(&report)?;
    report.verdict()?;

    Ok(())
}

fn run_clean(root: &DotfilesRoot, opts: ProfileOptions) -> Result<()> {
    let (_, mapping) = resolve_mapping(root, &opts)?;
    let linker = Linker::with_user_home(root.as_path());
    render(&linker.clean(&mapping))
}

fn run_list(root: &DotfilesRoot, opts: ProfileOptions) -> Result<()> {
    let (profiles, mapping) = resolve_mapping(root, &opts)?;
    let linker = Linker::with_user_home(root.as_path());
    render(&linker.list(profiles, &mapping))
}

fn run_root(root: &DotfilesRoot) -> Result<()> {
    println!("{}", root.as_path().display());
    Ok(())
}
