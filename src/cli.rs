use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "thali-id")]
#[command(about = "Identify Indian dishes from image-classifier labels", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Disambiguate a label list into a meal
    Detect {
        /// JSON file: a label array, or a label-detection response with --vision
        #[arg(required = true)]
        input: PathBuf,

        /// Input is a raw label-detection response
        #[arg(long)]
        vision: bool,

        /// Include the nutrition prompt in the report
        #[arg(long)]
        prompt: bool,

        /// Output JSON file (default: print a summary)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,
    },

    /// Write the label-detection request body for an image
    Request {
        /// Food photo
        #[arg(required = true)]
        image: PathBuf,

        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the on-device path with a recorded classifier output
    Local {
        /// Food photo
        #[arg(required = true)]
        image: PathBuf,

        /// JSON file of {category, probability} predictions
        #[arg(short, long)]
        predictions: PathBuf,

        /// Dataset index checked by file name before classifying
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Include the nutrition prompt in the report
        #[arg(long)]
        prompt: bool,

        /// Output JSON file (default: print a summary)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,
    },

    /// Index a dataset of one image folder per dish
    Index {
        /// Folder holding the dish folders
        #[arg(required = true)]
        root: PathBuf,

        /// Output JSON file
        #[arg(short, long, default_value = "dataset_index.json")]
        output: PathBuf,
    },

    /// Colour profile of an image or of every image in a folder
    Profile {
        /// Image file or folder
        #[arg(required = true)]
        path: PathBuf,

        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, export or validate the dish taxonomy
    Taxonomy {
        /// Write the taxonomy in effect as JSON
        #[arg(long)]
        export: Option<PathBuf>,

        /// Validate a taxonomy JSON file
        #[arg(long)]
        check: Option<PathBuf>,
    },

    /// Parse a saved nutrition-service reply
    Nutrition {
        /// Reply text (JSON, optionally fenced)
        #[arg(required = true)]
        input: PathBuf,

        /// Meal name that was sent
        #[arg(short, long)]
        meal: String,

        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or edit settings
    Config {
        /// Show settings
        #[arg(long)]
        show: bool,

        /// Minimum cloud label score (0.0-1.0)
        #[arg(long)]
        set_min_score: Option<f32>,

        /// Taxonomy JSON file to use instead of the built-in tables
        #[arg(long)]
        set_taxonomy: Option<PathBuf>,
    },
}
