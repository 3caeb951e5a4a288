//! Calmerge CLI - merge benchmark result files into one aligned table
//!
//! ```bash
//! calmerge run1.txt run2.txt                      # merge by workload identity
//! calmerge --normalize-to 1 run1.txt run2.txt     # ratios against column 1
//! calmerge --average --print-spec 2,1 a.txt b.txt # column means, reordered
//! calmerge --print-names a.txt b.txt              # column ID to name mapping
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use calmerge::{
    column_report, load_conventions, logs, merge_inputs, parse_print_spec, render_json, run, split_list,
    Conventions, FormatError, Formatter, MergeMode, MergeOptions, NormalizeTarget, PipelineOptions,
    PipelineResult, RunOptions,
};
use calmerge::config::DEFAULT_DECIMALS;
use calmerge::logs::LogStream;
use calmerge::parser::DEFAULT_SEPARATOR;

#[derive(Parser, Debug)]
#[command(name = "calmerge")]
#[command(about = "Merge benchmark result files into one aligned table", long_about = None)]
struct Cli {
    /// Result files, merged in the given order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Only write results to stdout
    #[arg(long)]
    quiet: bool,

    /// Number of decimals to use when printing results
    #[arg(long, default_value_t = DEFAULT_DECIMALS)]
    decimals: usize,

    /// Separator between columns (regex)
    #[arg(long, default_value = DEFAULT_SEPARATOR)]
    separator: String,

    /// Comma separated list of one-indexed column IDs to include in output (e.g. 2,3,1)
    #[arg(long)]
    print_spec: Option<String>,

    /// Column, column,row or max to normalize to
    #[arg(long)]
    normalize_to: Option<String>,

    /// Print the column ID to column name mapping for the provided files
    #[arg(long = "print-names")]
    print_names: bool,

    /// Prefix the columns from each file with these prefixes (comma separated)
    #[arg(long = "col-prefix")]
    col_prefix: Option<String>,

    /// Rename the columns to the names in this list (comma separated)
    #[arg(long = "col-names")]
    col_names: Option<String>,

    /// Rename the rows to the names in this list (comma separated)
    #[arg(long = "row-names")]
    row_names: Option<String>,

    /// Print output to this file
    #[arg(long)]
    outfile: Option<PathBuf>,

    /// Print the average values
    #[arg(long)]
    average: bool,

    /// Print the share of rows where each column has the minimum value
    #[arg(long = "min-histogram")]
    min_histogram: bool,

    /// Print the average values for each workload type
    #[arg(long = "typed-average")]
    typed_average: bool,

    /// Do not color code output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Transpose the output table
    #[arg(long)]
    invert: bool,

    /// Keep rows in first-seen order
    #[arg(long = "disable-row-sort")]
    disable_row_sort: bool,

    /// Keep only rows whose key matches this regex
    #[arg(long = "filter-pattern")]
    filter_pattern: Option<String>,

    /// Sort each column in ascending order
    #[arg(long = "sort-cols")]
    sort_cols: bool,

    /// Sort the rows by the values of this one-indexed column, largest first
    #[arg(long = "sort-after-column")]
    sort_after_column: Option<usize>,

    /// Merge line by line, ignoring row identifiers
    #[arg(long = "pure-merge")]
    pure_merge: bool,

    /// Split results into one block of columns per workload type
    #[arg(long = "split-wl-types")]
    split_wl_types: bool,

    /// Keep rows holding error markers
    #[arg(long = "keep-error-rows")]
    keep_error_rows: bool,

    /// Emit the final table as JSON
    #[arg(long)]
    json: bool,

    /// JSON file with sentinel tokens and workload types
    #[arg(long)]
    conventions: Option<PathBuf>,
}

/// A set option with an empty value counts as unset.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Cli {
    fn run_options(&self) -> PipelineResult<RunOptions> {
        let conventions = match &self.conventions {
            Some(path) => load_conventions(path)?,
            None => Conventions::default(),
        };

        let normalize_to = non_empty(&self.normalize_to)
            .map(str::parse::<NormalizeTarget>)
            .transpose()?;

        let pipeline = PipelineOptions {
            columns: non_empty(&self.print_spec).map(parse_print_spec).transpose()?,
            filter_pattern: non_empty(&self.filter_pattern).map(str::to_string),
            split_workload_types: self.split_wl_types,
            column_names: non_empty(&self.col_names).map(split_list),
            row_names: non_empty(&self.row_names).map(split_list),
            average: self.average,
            typed_average: self.typed_average,
            sort_columns: self.sort_cols,
            min_histogram: self.min_histogram,
            normalize_to,
            sort_after_column: self.sort_after_column,
            invert: self.invert,
        };

        Ok(RunOptions {
            separator: self.separator.clone(),
            decimals: self.decimals,
            column_prefixes: non_empty(&self.col_prefix).map(split_list).unwrap_or_default(),
            keep_error_rows: self.keep_error_rows,
            quiet: self.quiet,
            merge: MergeOptions {
                mode: if self.pure_merge { MergeMode::Pure } else { MergeMode::Identity },
                preserve_row_order: self.disable_row_sort,
            },
            pipeline,
            conventions,
        })
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logs::init(cli.quiet, LogStream::for_output(cli.json, cli.outfile.is_some()));

    if let Err(e) = execute(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn execute(cli: &Cli) -> PipelineResult<()> {
    let options = cli.run_options()?;

    if cli.print_names {
        let outcome = merge_inputs(cli.files.as_slice(), &options)?;
        print!("{}", column_report(&outcome.matrix, &outcome.provenance));
        return Ok(());
    }

    let output = run(cli.files.as_slice(), &options)?;

    let text = if cli.json {
        render_json(&output.table.matrix)? + "\n"
    } else {
        Formatter::new(options.colored_output(cli.no_color)).render(&output.table)?
    };

    write_output(&text, cli.outfile.as_deref())?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), FormatError> {
    match path {
        Some(p) => fs::write(p, content)?,
        None => print!("{}", content),
    }
    Ok(())
}
