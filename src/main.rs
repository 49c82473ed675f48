use argparse::{ArgumentParser, Collect, Store, StoreOption, StoreTrue};
use house_price_regression::config::RegressionConfig;
use house_price_regression::loader::DataSource;
use house_price_regression::session::{CpuSession, ModelStatus};
use house_price_regression::storage::{FileStore, ModelStore};
use house_price_regression::{RegressionError, Result};
use log::error;
use std::process;

const DEFAULT_DATA: &str = "http://localhost:3000/dist/kc_house_data.csv";

struct Options {
    data: String,
    store: String,
    config: Option<String>,
    seed: Option<u64>,
    verbose: bool,
    commands: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            data: DEFAULT_DATA.into(),
            store: ".models".into(),
            config: None,
            seed: None,
            verbose: false,
            commands: Vec::new(),
        }
    }
}

impl Options {
    fn parse() -> Self {
        let mut options = Options::default();
        {
            let mut ap = ArgumentParser::new();
            ap.set_description("Train and query a house price regression on sqft_living.");
            ap.refer(&mut options.data)
                .add_option(&["-d", "--data"], Store, "CSV file path or http(s) URL");
            ap.refer(&mut options.store)
                .add_option(&["-s", "--store"], Store, "directory for saved models");
            ap.refer(&mut options.config)
                .add_option(&["-c", "--config"], StoreOption, "JSON configuration file");
            ap.refer(&mut options.seed)
                .add_option(&["--seed"], StoreOption, "seed for shuffling and training");
            ap.refer(&mut options.verbose)
                .add_option(&["-v", "--verbose"], StoreTrue, "log every epoch at info level");
            ap.refer(&mut options.commands).add_argument(
                "commands",
                Collect,
                "commands run in order: train, test, save, load, predict <sqft>, line <n>, models",
            );
            ap.parse_args_or_exit();
        }
        options
    }
}

/// Formats `x` with five significant digits: fixed notation for exponents in
/// `-6..5`, otherwise scientific (`1.2346e5`).
fn sig5(x: f64) -> String {
    if x == 0.0 || !x.is_finite() {
        return format!("{}", x);
    }
    // The exponent is taken after rounding, so 99999.9 becomes 1.0000e5.
    let scientific = format!("{:.4e}", x);
    let exponent = scientific
        .split_once('e')
        .and_then(|(_, e)| e.parse::<i32>().ok());
    match exponent {
        Some(e) if (-6..5).contains(&e) => format!("{:.*}", (4 - e) as usize, x),
        _ => scientific,
    }
}

fn status_line(status: ModelStatus) -> String {
    match status {
        ModelStatus::Untrained => "Untrained".to_string(),
        ModelStatus::Trained { saved: None } => "Trained (unsaved)".to_string(),
        ModelStatus::Trained { saved: Some(at) } => format!("Trained (saved {})", at),
        ModelStatus::Loaded { date_saved } => format!("Trained (loaded {})", date_saved),
    }
}

fn run_command<'a, I>(
    session: &mut CpuSession<FileStore>,
    command: &str,
    args: &mut I,
) -> Result<()>
where
    I: Iterator<Item = &'a String>,
{
    match command {
        "train" => {
            println!("Training...");
            let result = session.train(|report| {
                println!("Epoch {}: loss {}", report.epoch + 1, sig5(report.loss));
            })?;
            println!("{}", status_line(session.status()));
            println!("Loss: {}", sig5(result.loss));
            if let Some(val_loss) = result.val_loss {
                println!("Validation loss: {}", sig5(val_loss));
            }
        }
        "test" => {
            let loss = session.test()?;
            println!("Set loss: {}", sig5(loss));
        }
        "save" => {
            session.save()?;
            println!("{}", status_line(session.status()));
        }
        "load" => {
            session.load()?;
            println!("{}", status_line(session.status()));
        }
        "predict" => {
            let input = args.next().ok_or_else(|| {
                RegressionError::InvalidInput("predict needs a square footage".into())
            })?;
            let prediction = session.predict(input)?;
            println!("The predicted house price $ {:.0}", prediction.price);
        }
        "line" => {
            let points = match args.next() {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    RegressionError::InvalidInput(format!("'{}' is not a point count", raw))
                })?,
                None => session.config().prediction_line_points,
            };
            for (square_feet, price) in session.prediction_line(points)? {
                println!("{:.1}\t{:.0}", square_feet, price);
            }
        }
        "models" => {
            for (key, info) in session.store().list_models()? {
                println!("{}\tsaved {}\t{} bytes", key, info.date_saved, info.size);
            }
        }
        other => {
            return Err(RegressionError::InvalidInput(format!(
                "unknown command '{}'",
                other
            )))
        }
    }
    Ok(())
}

fn run(options: Options) -> Result<bool> {
    let mut config = match &options.config {
        Some(path) => RegressionConfig::from_json_file(path)?,
        None => RegressionConfig::default(),
    };
    if let Some(seed) = options.seed {
        config = config.with_seed(seed);
    }
    if options.verbose {
        config = config.with_verbose(true);
    }

    let source = DataSource::parse(&options.data);
    println!("Loading data...");
    let mut session = CpuSession::from_source(&source, config, FileStore::new(&options.store))?;
    let (n_train, n_test) = session.split_sizes();
    println!("Data loaded: {} training, {} testing", n_train, n_test);
    println!("{}", status_line(session.status()));

    let mut all_ok = true;
    let mut args = options.commands.iter();
    while let Some(command) = args.next() {
        if let Err(e) = run_command(&mut session, command, &mut args) {
            error!("{}: {}", command, e);
            all_ok = false;
        }
    }
    Ok(all_ok)
}

fn main() {
    env_logger::init();

    match run(Options::parse()) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
