use anyhow::Result;
use trendr::{init_tracing_once, DbConfig, TrendrImport};

const DB_NAME: &str = "trendr";
const DB_USER: &str = "";
const DB_PASSWORD: &str = "";
const DB_HOST: &str = "localhost";
const DB_PORT: u16 = 8889;

// Relative to the project root
const DATA_PATH: &str = "data";
const EXCLUDE_FILE: &str = "50_subreddits_list.csv";
const PLOTS_PATH: &str = "sentiment_plots";

fn main() -> Result<()> {
    init_tracing_once();

    let db = DbConfig {
        host: DB_HOST.to_string(),
        port: DB_PORT,
        dbname: DB_NAME.to_string(),
        user: DB_USER.to_string(),
        password: DB_PASSWORD.to_string(),
    };

    let import = TrendrImport::new()
        .db(db)
        .data_dir(DATA_PATH)
        .exclude_file(EXCLUDE_FILE)
        .output_dir(PLOTS_PATH)
        .progress(true);

    // A failed stage is reported, not propagated: the run ends normally either way.
    match import.run() {
        Ok(report) => println!(
            "Imported {} posts from {} files into {} subreddits; {} keywords, {} plots",
            report.posts,
            report.files_loaded,
            report.subreddits,
            report.keywords,
            report.plots.len()
        ),
        Err(failure) => println!("Error: {failure}"),
    }
    Ok(())
}
