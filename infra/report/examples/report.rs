//! Error report demo printing the same report in every format.
//!
//! Run with `cargo run -p beacon-report --example report`.

use beacon_report::{Report, Result, WrapErr, eyre, install_default};

fn main() -> Result<()> {
    install_default("report")?;

    let err = chained_error();
    println!("{{err}} >> {err}");
    println!("{{err:?}} >> {err:?}");
    println!("{{err:#}} >> {err:#}");
    println!("{{err:#?}} >> {err:#?}");

    Ok(())
}

fn chained_error() -> Report {
    || -> Result<()> { Err(eyre::eyre!("source failure")) }()
        .wrap_err("while loading the demo fixture")
        .wrap_err("demo bootstrap failed")
        .unwrap_err()
}
