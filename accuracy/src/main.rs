use std::error::Error;
use std::{
    path::Path,
    sync::Arc,
    time::{Instant, SystemTime},
};

use distance::damerau_levenshtein;
use hmmspell::archive::meta::ModelMetadata;
use hmmspell::archive::ModelArchive;
use hmmspell::corpus::Corpus;
use hmmspell::speller::suggestion::Suggestion;
use hmmspell::speller::{Speller, SpellerConfig};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use structopt::clap::{App, AppSettings, Arg};

static CFG: SpellerConfig = SpellerConfig::default();

fn load_words(
    path: &str,
    max_words: Option<usize>,
) -> Result<Vec<(String, String)>, Box<dyn Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    Ok(rdr
        .records()
        .filter_map(Result::ok)
        .filter_map(|r| {
            r.get(0)
                .and_then(|x| r.get(1).map(|y| (x.to_string(), y.to_string())))
        })
        .take(max_words.unwrap_or(std::usize::MAX))
        .collect())
}

#[derive(Debug, Default, Serialize, PartialOrd, Ord, PartialEq, Eq, Clone, Copy)]
struct Time {
    secs: u64,
    subsec_nanos: u32,
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let ms = self.secs * 1000 + (self.subsec_nanos as u64 / 1_000_000);
        write!(f, "{}ms", ms)
    }
}

impl From<std::time::Duration> for Time {
    fn from(duration: std::time::Duration) -> Time {
        Time {
            secs: duration.as_secs(),
            subsec_nanos: duration.subsec_nanos(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AccuracyResult<'a> {
    input: &'a str,
    expected: &'a str,
    distance: usize,
    suggestions: Vec<Suggestion>,
    position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    time: Time,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    metadata: &'a ModelMetadata,
    config: &'a SpellerConfig,
    summary: Summary,
    results: Vec<AccuracyResult<'a>>,
    start_timestamp: Time,
    total_time: Time,
}

#[derive(Serialize, Default, Debug, Clone)]
struct Summary {
    total_words: u32,
    first_position: u32,
    top_five: u32,
    any_position: u32,
    failed: u32,
    only_wrong: u32,
    slowest_lookup: Time,
    fastest_lookup: Time,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let percent =
            |v: u32| -> String { format!("{:.2}%", v as f32 / self.total_words as f32 * 100f32) };

        write!(
            f,
            "[#1] {} [^5] {} [any] {} [fail] {} [wrong] {} [fast] {} [slow] {}",
            percent(self.first_position),
            percent(self.top_five),
            percent(self.any_position),
            percent(self.failed),
            percent(self.only_wrong),
            self.fastest_lookup,
            self.slowest_lookup
        )
    }
}

impl Summary {
    fn new(results: &[AccuracyResult<'_>]) -> Summary {
        let mut summary = Summary::default();

        results.iter().for_each(|result| {
            summary.total_words += 1;

            if let Some(position) = result.position {
                summary.any_position += 1;

                if position == 0 {
                    summary.first_position += 1;
                }

                if position < 5 {
                    summary.top_five += 1;
                }
            } else if result.error.is_some() {
                summary.failed += 1;
            } else {
                summary.only_wrong += 1;
            }
        });

        summary.slowest_lookup = results.iter().map(|x| x.time).max().unwrap_or_default();
        summary.fastest_lookup = results.iter().map(|x| x.time).min().unwrap_or_default();

        summary
    }
}

fn load_archive(model: Option<&str>, corpus: Option<&str>) -> Result<ModelArchive, Box<dyn Error>> {
    match (model, corpus) {
        (Some(path), None) => Ok(ModelArchive::open(Path::new(path))?),
        (None, Some(path)) => {
            let corpus = Corpus::open(Path::new(path))?;
            Ok(ModelArchive::train(&corpus, Some(path))?)
        }
        (Some(_), Some(_)) => Err("Give either a model or a corpus, not both".into()),
        (None, None) => Err("No model or corpus given".into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let matches = App::new("hmmspell-accuracy")
        .setting(AppSettings::ArgRequiredElseHelp)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Accuracy testing for hmmspell.")
        .arg(
            Arg::with_name("config")
                .short("c")
                .takes_value(true)
                .help("Provide JSON config file to override test defaults"),
        )
        .arg(
            Arg::with_name("words")
                .value_name("WORDS")
                .help("The 'input -> expected' list in tab-delimited value file (TSV)"),
        )
        .arg(
            Arg::with_name("model")
                .value_name("MODEL")
                .help("Use the given trained model"),
        )
        .arg(
            Arg::with_name("corpus")
                .long("corpus")
                .takes_value(true)
                .help("Train a model on the given corpus instead of loading one"),
        )
        .arg(
            Arg::with_name("json-output")
                .short("o")
                .value_name("JSON-OUTPUT")
                .help("The file path for the JSON report output"),
        )
        .arg(
            Arg::with_name("max-words")
                .short("w")
                .takes_value(true)
                .help("Truncate typos list to max number of words specified"),
        )
        .get_matches();

    let cfg: SpellerConfig = match matches.value_of("config") {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            serde_json::from_reader(file)?
        }
        None => CFG.clone(),
    };
    cfg.validate()?;

    let archive = match load_archive(matches.value_of("model"), matches.value_of("corpus")) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}; aborting.", e);
            std::process::exit(1);
        }
    };

    let words = match matches.value_of("words") {
        Some(path) => load_words(
            path,
            matches
                .value_of("max-words")
                .and_then(|x| x.parse::<usize>().ok()),
        )?,
        None => {
            eprintln!("No word list for given path; aborting.");
            std::process::exit(1);
        }
    };

    let pb = ProgressBar::new(words.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{pos}/{len} [{percent}%] {wide_bar} {elapsed_precise}"),
    );

    let speller: Arc<dyn Speller + Send + Sync> = archive.speller();

    let start_time = Instant::now();
    let results = words
        .par_iter()
        .progress_with(pb)
        .map(|(input, expected)| {
            let now = Instant::now();
            let result = speller.suggest_with_config(&input.to_lowercase(), &cfg);
            let time = Time::from(now.elapsed());

            let (suggestions, error) = match result {
                Ok(suggestions) => (suggestions, None),
                Err(e) => {
                    log::warn!("No suggestions for {:?}: {}", input, e);
                    (vec![], Some(e.to_string()))
                }
            };

            let position = suggestions
                .iter()
                .position(|x| x.value() == expected.as_str());

            let distance = damerau_levenshtein(input, expected);
            AccuracyResult {
                input,
                expected,
                distance,
                time,
                suggestions,
                position,
                error,
            }
        })
        .collect::<Vec<_>>();

    let total_time = Time::from(start_time.elapsed());
    let start_timestamp = Time::from(
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default(),
    );

    let summary = Summary::new(&results);
    println!("{}", summary);

    if let Some(path) = matches.value_of("json-output") {
        let output = std::fs::File::create(path)?;
        let report = Report {
            metadata: archive.metadata(),
            config: &cfg,
            summary,
            results,
            start_timestamp,
            total_time,
        };
        println!("Writing JSON report…");
        serde_json::to_writer_pretty(output, &report)?;
    }

    println!("Done!");
    Ok(())
}
