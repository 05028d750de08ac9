use clap::{App, Arg};
use postroll::build::build_site;
use postroll::config::Config;
use std::path::Path;

fn main() {
    let matches = App::new("postroll")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds the all-posts index page for a static blog")
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .takes_value(true)
                .required(true)
                .help("The directory into which the site is built"),
        )
        .arg(
            Arg::with_name("project")
                .value_name("PROJECT_DIR")
                .help("The project directory; defaults to the current directory"),
        )
        .get_matches();

    // `output` is marked required, so clap guarantees it's present.
    let output = Path::new(matches.value_of("output").unwrap());
    let project = Path::new(matches.value_of("project").unwrap_or("."));

    if let Err(err) = run(project, output) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(project: &Path, output: &Path) -> anyhow::Result<()> {
    let config = Config::from_directory(project, output)?;
    build_site(config)?;
    Ok(())
}
