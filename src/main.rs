use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tracing::{info, warn};

use semeval::config::Config;
use semeval::embeddings::WordVectors;
use semeval::output::{self, terminal};
use semeval::relatedness::{tokenize_expression, RelatednessStore};

/// Semeval: lexical-semantic queries over precomputed vector spaces.
///
/// Scores figurative associations (metaphor interpretation and
/// metaphoricity) from a co-occurrence matrix, and answers similarity,
/// analogy and neighbourhood queries over word vectors.
#[derive(Parser)]
#[command(name = "semeval", version, about)]
struct Cli {
    /// Language of the models to query (default: SEMEVAL_LANG or eng)
    #[arg(long, short, global = true)]
    lang: Option<String>,

    /// Print results as JSON; failures print {"error": "..."}
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ranked relatedness profile of a term
    Related {
        term: String,

        /// Keep only the top K terms (0 keeps all)
        #[arg(long, default_value = "0")]
        k: usize,

        /// Use raw matrix values instead of L1-normalized ones
        #[arg(long)]
        raw: bool,

        /// Also list terms with zero or negative relatedness
        #[arg(long)]
        keep_nonpositive: bool,
    },

    /// Interpret the metaphor "TENOR is VEHICLE" by combined rank
    Interpret {
        tenor: String,
        vehicle: String,

        /// Show only the first N features (0 shows all)
        #[arg(long, default_value = "20")]
        top: usize,

        /// L1-normalize both relatedness rows first
        #[arg(long)]
        normalize: bool,
    },

    /// Metaphoricity of an expression for "TENOR is VEHICLE"
    Metaphoricity {
        tenor: String,
        vehicle: String,

        /// The expression text; tokenized on spaces and punctuation
        expression: String,

        /// Truncate both profiles to their top K terms (0 uses all)
        #[arg(long, default_value = "0")]
        k: usize,

        /// Use raw matrix values instead of L1-normalized ones
        #[arg(long)]
        raw: bool,
    },

    /// Cosine similarity between two words
    Similarity { w1: String, w2: String },

    /// Cosine similarity between two word lists
    NSimilarity {
        #[arg(long, num_args = 1.., required = true)]
        ws1: Vec<String>,

        #[arg(long, num_args = 1.., required = true)]
        ws2: Vec<String>,
    },

    /// Words most similar to the positive words and unlike the negative ones
    MostSimilar {
        #[arg(long, num_args = 1..)]
        positive: Vec<String>,

        #[arg(long, num_args = 1..)]
        negative: Vec<String>,

        #[arg(long, default_value = "10")]
        topn: usize,

        /// Use the additive combination instead of multiplicative (cosmul)
        #[arg(long)]
        additive: bool,
    },

    /// Nearest neighbours of a word
    Neighbours {
        word: String,

        #[arg(long, default_value = "50")]
        topn: usize,

        /// Return every word at or above this similarity instead of top N
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Solve "A is to B as C is to ?"
    Analogy {
        a: String,
        b: String,
        c: String,

        #[arg(long, default_value = "10")]
        topn: usize,
    },

    /// The single word that best summarizes a word list
    Theme {
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Mean vector of the known words in a list
    Centroid {
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Vector of a single word
    Vector { word: String },

    /// Mean vector of a text
    ToVector { text: String },

    /// Project a word into another language's vector space
    Align {
        word: String,

        /// Target language
        #[arg(long)]
        to: String,

        #[arg(long, default_value = "10")]
        topn: usize,
    },

    /// List the vocabulary of the vector space
    Vocabulary {
        /// Show only the first N words
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show which artifacts are available
    Status {
        /// Languages to check (default: the configured language)
        langs: Vec<String>,
    },
}

fn main() -> ExitCode {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("semeval=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                println!("{}", output::error_json(format!("{e:#}")));
            } else {
                eprintln!("{} {e:#}", "Error:".red().bold());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let lang = cli.lang.clone().unwrap_or_else(|| config.default_lang.clone());
    let json = cli.json;

    match cli.command {
        Commands::Related {
            term,
            k,
            raw,
            keep_nonpositive,
        } => {
            let store = load_store(&config, &lang)?;
            let profile = store.ranked_relatedness(&term, !raw, !keep_nonpositive, k);
            if json {
                return emit(&profile);
            }
            match profile {
                Some(profile) => terminal::display_profile(&term, &profile),
                None => println!("'{term}' is not in the {lang} relatedness model."),
            }
        }

        Commands::Interpret {
            tenor,
            vehicle,
            top,
            normalize,
        } => {
            let store = load_store(&config, &lang)?;
            let mut features = store.interpret_with(&tenor, &vehicle, normalize);
            if top > 0 {
                features.truncate(top);
            }
            if json {
                return emit(&features);
            }
            terminal::display_interpretation(&tenor, &vehicle, &features);
        }

        Commands::Metaphoricity {
            tenor,
            vehicle,
            expression,
            k,
            raw,
        } => {
            let store = load_store(&config, &lang)?;
            let tokens = tokenize_expression(&expression);
            let score = store
                .metaphoricity(&tenor, &vehicle, &tokens, k, !raw)
                .inspect_err(|e| warn!(k, error = %e, "Metaphoricity rejected"))?;
            if json {
                return emit(&score);
            }
            terminal::display_metaphoricity(&tenor, &vehicle, &tokens, &score);
        }

        Commands::Similarity { w1, w2 } => {
            let vectors = load_vectors(&config, &lang)?;
            let score = vectors
                .similarity(&w1, &w2)
                .with_context(|| format!("'{w1}' or '{w2}' is not in the {lang} vocabulary"))?;
            if json {
                return emit(&serde_json::json!({ "w1": w1, "w2": w2, "score": score }));
            }
            println!("similarity({w1}, {w2}) = {score:.6}");
        }

        Commands::NSimilarity { ws1, ws2 } => {
            let vectors = load_vectors(&config, &lang)?;
            let score = vectors.n_similarity(&ws1, &ws2)?;
            if json {
                return emit(&score);
            }
            println!("n_similarity = {score:.6}");
        }

        Commands::MostSimilar {
            positive,
            negative,
            topn,
            additive,
        } => {
            let vectors = load_vectors(&config, &lang)?;
            let words = if additive {
                vectors.most_similar(&positive, &negative, topn)?
            } else {
                vectors.most_similar_cosmul(&positive, &negative, topn)?
            };
            if json {
                return emit(&words);
            }
            terminal::display_words("Most similar", &words);
        }

        Commands::Neighbours {
            word,
            topn,
            threshold,
        } => {
            let vectors = load_vectors(&config, &lang)?;
            let words = match threshold {
                Some(t) => vectors.neighbours_threshold(&word, t)?,
                None => vectors.neighbours(&word, topn)?,
            };
            if json {
                return emit(&words);
            }
            terminal::display_words(&format!("Neighbours of '{word}'"), &words);
        }

        Commands::Analogy { a, b, c, topn } => {
            let vectors = load_vectors(&config, &lang)?;
            let words = vectors.analogy(&a, &b, &c, topn)?;
            if json {
                return emit(&words);
            }
            terminal::display_words(&format!("{a} : {b} :: {c} : ?"), &words);
        }

        Commands::Theme { words } => {
            let vectors = load_vectors(&config, &lang)?;
            let theme = vectors.theme(&words)?;
            if json {
                return emit(&theme);
            }
            terminal::display_words("Theme", std::slice::from_ref(&theme));
        }

        Commands::Centroid { words } => {
            let vectors = load_vectors(&config, &lang)?;
            let centroid = vectors.centroid(&words);
            if json {
                return emit(&centroid);
            }
            match centroid {
                Some(v) => terminal::display_vector("Centroid", &v),
                None => println!("None of the words are in the {lang} vocabulary."),
            }
        }

        Commands::Vector { word } => {
            let vectors = load_vectors(&config, &lang)?;
            let v = vectors
                .vector(&word)
                .with_context(|| format!("'{word}' is not in the {lang} vocabulary"))?;
            if json {
                return emit(&v);
            }
            terminal::display_vector(&word, v);
        }

        Commands::ToVector { text } => {
            let vectors = load_vectors(&config, &lang)?;
            let tokens = tokenize_expression(&text);
            let v = vectors.to_vector(&tokens)?;
            if json {
                return emit(&v);
            }
            terminal::display_vector("Text vector", &v);
        }

        Commands::Align { word, to, topn } => {
            let source = load_vectors(&config, &lang)?;
            let target = load_vectors(&config, &to)?;
            let words = WordVectors::align(&source, &target, &word, topn)?
                .with_context(|| format!("'{word}' is not in the {lang} vocabulary"))?;
            if json {
                return emit(&words);
            }
            terminal::display_words(&format!("'{word}' ({lang}) in {to}"), &words);
        }

        Commands::Vocabulary { limit } => {
            let vectors = load_vectors(&config, &lang)?;
            let vocab = vectors.vocabulary();
            let shown = &vocab[..limit.unwrap_or(vocab.len()).min(vocab.len())];
            if json {
                return emit(&shown);
            }
            for word in shown {
                println!("{word}");
            }
        }

        Commands::Status { langs } => {
            let langs = if langs.is_empty() { vec![lang] } else { langs };
            let statuses = semeval::status::collect(&config, &langs);
            if json {
                return emit(&statuses);
            }
            semeval::status::show(&config, &statuses);
        }
    }

    Ok(())
}

/// Check artifacts and load the relatedness store for `lang`.
fn load_store(config: &Config, lang: &str) -> Result<RelatednessStore> {
    config.require_relatedness(lang)?;
    let paths = config.relatedness_paths(lang);
    info!(lang, "Loading relatedness store");
    RelatednessStore::open_paths(&paths)
        .with_context(|| format!("Failed to load relatedness store for '{lang}'"))
}

/// Check and load the word-vector space for `lang`.
fn load_vectors(config: &Config, lang: &str) -> Result<WordVectors> {
    config.require_vectors(lang)?;
    info!(lang, "Loading word vectors");
    WordVectors::load(&config.vectors_path(lang))
        .with_context(|| format!("Failed to load word vectors for '{lang}'"))
}

/// Print a result as a single JSON line.
fn emit<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", output::to_json(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_most_similar_defaults_to_cosmul() {
        let cli = Cli::try_parse_from(["semeval", "most-similar", "--positive", "king"]).unwrap();
        match cli.command {
            Commands::MostSimilar { additive, topn, .. } => {
                assert!(!additive);
                assert_eq!(topn, 10);
            }
            _ => panic!("expected most-similar"),
        }

        let cli = Cli::try_parse_from([
            "semeval",
            "most-similar",
            "--positive",
            "king",
            "--additive",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::MostSimilar { additive: true, .. }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["semeval", "related", "life", "--json", "-l", "fin"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.lang.as_deref(), Some("fin"));
    }
}
