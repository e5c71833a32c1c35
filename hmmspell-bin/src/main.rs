use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use gumdrop::Options;
use serde::Serialize;

use hmmspell::align::align;
use hmmspell::archive::ModelArchive;
use hmmspell::corpus::Corpus;
use hmmspell::speller::suggestion::Suggestion;
use hmmspell::speller::{Speller, SpellerConfig};

trait OutputWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool);
    fn write_suggestions(&mut self, word: &str, suggestions: &[Suggestion]);
    fn finish(&mut self) -> anyhow::Result<()>;
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool) {
        println!(
            "Input: {}\t\t[{}]",
            &word,
            if is_correct { "CORRECT" } else { "INCORRECT" }
        );
    }

    fn write_suggestions(&mut self, _word: &str, suggestions: &[Suggestion]) {
        for sugg in suggestions {
            println!("{}\t\t{}", sugg.value, sugg.weight);
        }
        println!();
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct SuggestionRequest {
    word: String,
    is_correct: bool,
    suggestions: Vec<Suggestion>,
}

#[derive(Serialize)]
struct JsonWriter {
    results: Vec<SuggestionRequest>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter { results: vec![] }
    }
}

impl OutputWriter for JsonWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool) {
        self.results.push(SuggestionRequest {
            word: word.to_owned(),
            is_correct,
            suggestions: vec![],
        });
    }

    fn write_suggestions(&mut self, _word: &str, suggestions: &[Suggestion]) {
        if let Some(last) = self.results.last_mut() {
            last.suggestions = suggestions.to_vec();
        }
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

fn run(
    speller: Arc<dyn Speller + Send + Sync>,
    words: Vec<String>,
    writer: &mut dyn OutputWriter,
    is_always_suggesting: bool,
    suggest_cfg: &SpellerConfig,
) -> anyhow::Result<()> {
    for word in words {
        let is_correct = speller.is_correct(&word);
        writer.write_correction(&word, is_correct);

        if is_always_suggesting || !is_correct {
            let suggestions = speller.suggest_with_config(&word.to_lowercase(), suggest_cfg)?;
            writer.write_suggestions(&word, &suggestions);
        }
    }

    writer.finish()
}

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "train a model from a typo corpus and save it")]
    Train(TrainArgs),

    #[options(help = "get suggestions for provided input")]
    Suggest(SuggestArgs),

    #[options(help = "print the alignment of a correct and a typed word")]
    Align(AlignArgs),

    #[options(help = "correct lines of text read from the terminal")]
    Interactive(InteractiveArgs),
}

#[derive(Debug, Options)]
struct TrainArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "corpus of `correct: typo typo ...` lines", required)]
    corpus: PathBuf,

    #[options(help = "where to write the trained model", required)]
    output: PathBuf,
}

#[derive(Debug, Options)]
struct SuggestArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(no_short, help = "train on this corpus before suggesting")]
    corpus: Option<PathBuf>,

    #[options(help = "trained model to be used")]
    model: Option<PathBuf>,

    #[options(help = "JSON speller configuration")]
    config: Option<PathBuf>,

    #[options(short = "S", help = "always show suggestions even if word is correct")]
    always_suggest: bool,

    #[options(help = "maximum number of results, 0 for all")]
    nbest: Option<usize>,

    #[options(short = "d", help = "maximum edit distance of candidates")]
    max_distance: Option<usize>,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "words to be processed")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct AlignArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(free, required, help = "the correct word")]
    correct: String,

    #[options(free, required, help = "the typed word")]
    typed: String,
}

#[derive(Debug, Options)]
struct InteractiveArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(no_short, help = "train on this corpus before correcting")]
    corpus: Option<PathBuf>,

    #[options(help = "trained model to be used")]
    model: Option<PathBuf>,
}

fn load_speller(
    corpus: Option<&Path>,
    model: Option<&Path>,
) -> anyhow::Result<Arc<dyn Speller + Send + Sync>> {
    let archive = match (corpus, model) {
        (Some(path), None) => {
            let corpus = Corpus::open(path)?;
            ModelArchive::train(&corpus, path.to_str())?
        }
        (None, Some(path)) => ModelArchive::open(path)?,
        _ => anyhow::bail!("Exactly one of --corpus or --model is required"),
    };

    Ok(archive.speller())
}

fn load_config(args: &SuggestArgs) -> anyhow::Result<SpellerConfig> {
    let mut suggest_cfg = match &args.config {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open config {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => SpellerConfig::default(),
    };

    if let Some(v) = args.nbest {
        if v == 0 {
            suggest_cfg.n_best = None;
        } else {
            suggest_cfg.n_best = Some(v);
        }
    }

    if let Some(v) = args.max_distance {
        suggest_cfg.max_distance = v;
    }

    suggest_cfg.validate()?;
    Ok(suggest_cfg)
}

fn train(args: TrainArgs) -> anyhow::Result<()> {
    let corpus = Corpus::open(&args.corpus)?;
    let archive = ModelArchive::train(&corpus, args.corpus.to_str())?;
    archive.save(&args.output)?;

    let metadata = archive.metadata();
    eprintln!(
        "Trained on {} pairs, {} words, alphabet {:?}",
        metadata.pairs, metadata.vocabulary_size, metadata.alphabet
    );

    Ok(())
}

fn suggest(args: SuggestArgs) -> anyhow::Result<()> {
    let suggest_cfg = load_config(&args)?;

    let mut writer: Box<dyn OutputWriter> = if args.use_json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    };

    let words = if args.inputs.is_empty() {
        eprintln!("Reading from stdin...");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        buffer
            .lines()
            .map(|x| x.trim().to_string())
            .filter(|x| !x.is_empty())
            .collect()
    } else {
        args.inputs.clone()
    };

    let speller = load_speller(args.corpus.as_deref(), args.model.as_deref())?;
    run(
        speller,
        words,
        &mut *writer,
        args.always_suggest,
        &suggest_cfg,
    )
}

fn align_words(args: AlignArgs) -> anyhow::Result<()> {
    let (correct, typed) = align(&args.correct, &args.typed).to_strings();
    println!("{}", correct);
    println!("{}", typed);
    Ok(())
}

fn interactive(args: InteractiveArgs) -> anyhow::Result<()> {
    let speller = load_speller(args.corpus.as_deref(), args.model.as_deref())?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("Enter your text without punctuation: ");
        io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        println!("Corrected text: {}", speller.correct_line(&line)?);
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse_args_default_or_exit();

    match args.command {
        None => Ok(()),
        Some(Command::Train(args)) => train(args),
        Some(Command::Suggest(args)) => suggest(args),
        Some(Command::Align(args)) => align_words(args),
        Some(Command::Interactive(args)) => interactive(args),
    }
}
