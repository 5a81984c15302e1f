use miette::Result;

use hdlsort_ops::ops_units;
use hdlsort_util::progress::status;

use crate::cli::SourceArgs;

pub fn exec(source: &SourceArgs, json: bool) -> Result<()> {
    let (config, _) = super::load_config(source)?;
    let analysis = ops_units::units(&config)?;
    super::report(&analysis.diagnostics);

    let units = analysis.corpus.units();
    if json {
        println!("{}", ops_units::render_json(units)?);
    } else {
        print!("{}", ops_units::render_text(units));
    }
    status(
        "Found",
        &format!("{} units in {} files", units.len(), analysis.file_count),
    );
    Ok(())
}
