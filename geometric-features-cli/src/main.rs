//! Command line tools for manipulating geometric feature collections.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "geometric-features")]
#[command(author, version, about = "Manipulate collections of geometric features", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append features from one or more files to the output file
    Merge {
        /// Feature files to append
        #[arg(short = 'f', long = "feature-file", value_name = "FILE", num_args = 1..)]
        feature_files: Vec<PathBuf>,
        /// Directory whose *.geojson files are all appended
        #[arg(short = 'd', long = "features-directory", value_name = "DIR")]
        features_dir: Option<PathBuf>,
        /// Semicolon separated list of tags a feature must have to be appended
        #[arg(short, long, value_name = "\"TAG1;TAG2\"")]
        tags: Option<String>,
        /// Output file
        #[arg(short, long, default_value = commands::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Combine all features of a file into a single feature
    Combine {
        /// Feature file with the features to combine
        #[arg(short = 'f', long = "feature-file", value_name = "FILE")]
        feature_file: PathBuf,
        /// Name of the new feature
        #[arg(short = 'n', long = "new-feature-name")]
        name: String,
        /// Output file
        #[arg(short, long, default_value = commands::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Remove the parts of features covered by masking features
    Difference {
        /// Feature file with the features to mask
        #[arg(short = 'f', long = "feature-file", value_name = "FILE")]
        feature_file: PathBuf,
        /// Feature file with the masks
        #[arg(short = 'm', long = "mask-file", value_name = "FILE")]
        mask_file: PathBuf,
        /// Output file
        #[arg(short, long, default_value = commands::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Intersect features with the intersection of another set of features
    Intersect {
        /// Feature file with the features to intersect
        #[arg(short = 'f', long = "feature-file", value_name = "FILE")]
        feature_file: PathBuf,
        /// Feature file with the features to intersect with
        #[arg(short = 'i', long = "intersection-file", value_name = "FILE")]
        intersection_file: PathBuf,
        /// Group name of the output
        #[arg(short = 'g', long = "group-name")]
        group_name: Option<String>,
        /// Output file
        #[arg(short, long, default_value = commands::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Split features crossing the antimeridian
    FixAntimeridian {
        /// Feature file with the features to fix
        #[arg(short = 'f', long = "feature-file", value_name = "FILE")]
        feature_file: PathBuf,
        /// Output file
        #[arg(short, long, default_value = commands::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Split features crossing the prime meridian, moving their western parts by 360 degrees
    FixPrimeMeridian {
        /// Feature file with the features to fix
        #[arg(short = 'f', long = "feature-file", value_name = "FILE")]
        feature_file: PathBuf,
        /// Output file
        #[arg(short, long, default_value = commands::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Simplify geometries of the features
    Simplify {
        /// Feature file with the features to simplify
        #[arg(short = 'f', long = "feature-file", value_name = "FILE")]
        feature_file: PathBuf,
        /// Maximum allowed deviation from the original shapes, in degrees
        #[arg(short, long, default_value = "0.0")]
        tolerance: f64,
        /// Output file
        #[arg(short, long, default_value = commands::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Subdivide long segments of lines and polygons
    Subdivide {
        /// Feature file with the features to subdivide
        #[arg(short = 'f', long = "feature-file", value_name = "FILE")]
        feature_file: PathBuf,
        /// Maximum segment length, in degrees
        #[arg(short = 'm', long = "max-degrees", default_value = "1.0")]
        max_degrees: f64,
        /// Output file
        #[arg(short, long, default_value = commands::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Add or remove tags of all features
    Tag {
        /// Feature file with the features to tag
        #[arg(short = 'f', long = "feature-file", value_name = "FILE")]
        feature_file: PathBuf,
        /// Tags to add or remove
        #[arg(short = 't', long = "tag", required = true, num_args = 1..)]
        tags: Vec<String>,
        /// Remove the tags instead of adding them
        #[arg(short, long)]
        remove: bool,
        /// Output file
        #[arg(short, long, default_value = commands::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Set the group name of a feature file in place
    SetGroupName {
        /// Feature file to modify
        #[arg(short = 'f', long = "feature-file", value_name = "FILE")]
        feature_file: PathBuf,
        /// New group name
        #[arg(short = 'g', long = "group")]
        group_name: String,
    },
    /// Write each feature to its own file in the feature cache layout
    Split {
        /// Feature file with the features to split
        #[arg(short = 'f', long = "feature-file", value_name = "FILE")]
        feature_file: PathBuf,
        /// Root directory of the split features (the cache location by default)
        #[arg(short = 'd', long = "destination", value_name = "DIR")]
        destination: Option<PathBuf>,
    },
    /// Read features from the feature cache
    Read {
        /// Component of the features, e.g. ocean
        #[arg(short = 'c', long = "component")]
        component: String,
        /// Object type of the features: region, transect or point
        #[arg(short = 'b', long = "object-type")]
        object_type: String,
        /// Names of the features to read
        #[arg(short = 'n', long = "feature-names", num_args = 1..)]
        names: Option<Vec<String>>,
        /// Tags of the features to read
        #[arg(short = 't', long = "tags", num_args = 1..)]
        tags: Option<Vec<String>>,
        /// Read features with any of the tags rather than all of them
        #[arg(long)]
        any_tag: bool,
        /// Location of the feature cache
        #[arg(long, value_name = "DIR")]
        cache: Option<PathBuf>,
        /// Catalog of the features (features_and_tags.json in the cache by default)
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,
        /// Directory to copy features missing from the cache from
        #[arg(long, value_name = "DIR")]
        mirror: Option<PathBuf>,
        /// Output file
        #[arg(short, long, default_value = commands::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Rebuild the catalog of the features in the cache
    Catalog {
        /// Location of the feature cache
        #[arg(long, value_name = "DIR")]
        cache: Option<PathBuf>,
        /// Output file
        #[arg(short, long, default_value = geometric_features::catalog::CATALOG_FILE_NAME)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Merge {
            feature_files,
            features_dir,
            tags,
            output,
        } => commands::merge(&feature_files, features_dir.as_deref(), tags.as_deref(), &output),
        Commands::Combine {
            feature_file,
            name,
            output,
        } => commands::combine(&feature_file, &name, &output),
        Commands::Difference {
            feature_file,
            mask_file,
            output,
        } => commands::difference(&feature_file, &mask_file, &output),
        Commands::Intersect {
            feature_file,
            intersection_file,
            group_name,
            output,
        } => commands::intersect(
            &feature_file,
            &intersection_file,
            group_name.as_deref(),
            &output,
        ),
        Commands::FixAntimeridian {
            feature_file,
            output,
        } => commands::fix_antimeridian(&feature_file, &output),
        Commands::FixPrimeMeridian {
            feature_file,
            output,
        } => commands::fix_prime_meridian(&feature_file, &output),
        Commands::Simplify {
            feature_file,
            tolerance,
            output,
        } => commands::simplify(&feature_file, tolerance, &output),
        Commands::Subdivide {
            feature_file,
            max_degrees,
            output,
        } => commands::subdivide(&feature_file, max_degrees, &output),
        Commands::Tag {
            feature_file,
            tags,
            remove,
            output,
        } => commands::tag(&feature_file, &tags, remove, &output),
        Commands::SetGroupName {
            feature_file,
            group_name,
        } => commands::set_group_name(&feature_file, &group_name),
        Commands::Split {
            feature_file,
            destination,
        } => commands::split(&feature_file, destination.as_deref()),
        Commands::Read {
            component,
            object_type,
            names,
            tags,
            any_tag,
            cache,
            catalog,
            mirror,
            output,
        } => commands::read(
            &commands::ReadQuery {
                component,
                object_type,
                names,
                tags,
                all_tags: !any_tag,
            },
            cache.as_deref(),
            catalog.as_deref(),
            mirror.as_deref(),
            &output,
        ),
        Commands::Catalog { cache, output } => commands::catalog(cache.as_deref(), &output),
    }
}
