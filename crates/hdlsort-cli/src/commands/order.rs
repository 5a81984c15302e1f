use miette::Result;

use hdlsort_core::config::OutputOptions;
use hdlsort_ops::ops_order;
use hdlsort_util::errors::HdlSortError;
use hdlsort_util::progress::{status, status_warn};

use crate::cli::OrderArgs;

pub fn exec(args: OrderArgs) -> Result<()> {
    let (mut config, library_name) = super::load_config(&args.source)?;

    if let Some(strategy) = args.strategy {
        config.ordering.strategy = strategy;
    }
    if args.cross_library {
        config.ordering.cross_library = true;
    }

    if !args.use_entity.is_empty() || !args.top.is_empty() {
        let library = config.library_mut(&library_name);
        library.use_entity.extend(args.use_entity.iter().cloned());
        library.top.extend(args.top.iter().cloned());
    }

    if args.has_output_flags() {
        let mut opts = OutputOptions {
            execute: args.execute.clone(),
            output: args.output.clone(),
            archive: args.archive.clone(),
            ..OutputOptions::default()
        };
        if let Some(format) = &args.format {
            opts.format = format.clone();
        }
        opts.print = opts.execute.is_none() && opts.output.is_none() && opts.archive.is_none();

        if args.all {
            config.output = Some(opts);
        } else {
            config.library_mut(&library_name).output = Some(opts);
        }
    }

    let mut stdout = std::io::stdout().lock();
    let result = ops_order::order(&config, &mut stdout)?;
    let plan = &result.plan;

    super::report(&plan.diagnostics);
    status(
        "Ordered",
        &format!(
            "{} files ({} units from {} sources)",
            plan.files.len(),
            plan.unit_count,
            plan.file_count
        ),
    );

    let failed: usize = result.groups.iter().map(|g| g.drivers.commands_failed).sum();
    if failed > 0 {
        status_warn("Finished", &format!("{failed} command(s) exited with an error"));
    }

    let warnings = plan.diagnostics.warning_count();
    if args.deny_warnings && warnings > 0 {
        return Err(HdlSortError::Generic {
            message: format!("{warnings} warning(s) reported and --deny-warnings is set"),
        }
        .into());
    }

    Ok(())
}
