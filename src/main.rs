mod archive;
mod args;
mod config;
mod context;
mod error;
mod manifest;
mod packager;
mod platform;
mod plugin;
mod result;
mod staging;
mod tpl;
mod utils;

use args::Args;
use config::PackConfig;
use context::Context;
use packager::Packager;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    let args = Args::parse();

    let base_dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let ctx = Context::new(base_dir, args.verbose);

    // Resolve everything up front so a missing SDK root fails before staging is touched
    let config = PackConfig::resolve(&ctx, &args)?;

    cliclack::intro("stagepack")?;

    if ctx.verbose {
        cliclack::log::info(format!(
            "Staging {} into {} ({} plugin(s))",
            config.list.display(),
            config.staging.display(),
            config.plugins.len()
        ))?;
    }

    let report = Packager::new(&ctx, &config).run()?;

    cliclack::log::success(format!(
        "{} listed file(s), {} plugin(s), {} archive entries",
        report.copied, report.plugins, report.entries
    ))?;

    cliclack::outro(format!("Archive created: {}", report.archive.display()))?;
    Ok(())
}
