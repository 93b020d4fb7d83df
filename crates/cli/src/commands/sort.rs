//! Sorting Comparison Commands

use anyhow::Result;
use clap::Subcommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use swelab_sortbench::{
    benchmark, builtin_sort_by_key, record, sample_employees, BenchmarkRow, Record, DEFAULT_SIZES,
};

use crate::output::{print_list, print_success, status_marker, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum SortCommands {
    /// Time the library sort against bubble sort on generated records
    Bench {
        /// Dataset sizes to compare
        #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SIZES)]
        sizes: Vec<usize>,

        /// Field to sort by
        #[arg(long, default_value = "value")]
        key: String,

        /// Seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Sort the sample employee records
    Demo,
}

/// Benchmark row display wrapper
#[derive(Serialize)]
pub struct BenchmarkDisplay {
    pub size: usize,
    pub builtin_secs: f64,
    pub bubble_secs: f64,
    pub speedup: Option<f64>,
    pub verified: bool,
}

impl From<BenchmarkRow> for BenchmarkDisplay {
    fn from(row: BenchmarkRow) -> Self {
        Self {
            size: row.size,
            builtin_secs: row.builtin_secs,
            bubble_secs: row.bubble_secs,
            speedup: row.speedup,
            verified: row.verified,
        }
    }
}

impl TableDisplay for BenchmarkDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Size", "Library sort", "Bubble sort", "Speedup", "Verified"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.size.to_string(),
            format!("{:.6}s", self.builtin_secs),
            format!("{:.6}s", self.bubble_secs),
            self.speedup
                .map(|s| format!("{:.2}x", s))
                .unwrap_or_else(|| "-".to_string()),
            status_marker(self.verified),
        ]
    }
}

/// Employee display wrapper
#[derive(Serialize)]
pub struct EmployeeDisplay {
    pub name: String,
    pub salary: String,
    pub experience: String,
}

impl From<&Record> for EmployeeDisplay {
    fn from(record: &Record) -> Self {
        let field = |key: &str| record.get(key).map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        Self {
            name: field("name"),
            salary: field("salary"),
            experience: field("experience"),
        }
    }
}

impl TableDisplay for EmployeeDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Salary", "Experience"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.salary.clone(), self.experience.clone()]
    }
}

/// Execute sort commands
pub fn execute(cmd: SortCommands, format: OutputFormat) -> Result<()> {
    match cmd {
        SortCommands::Bench { sizes, key, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let rows: Vec<BenchmarkDisplay> = benchmark(&sizes, &key, &mut rng)?
                .into_iter()
                .map(BenchmarkDisplay::from)
                .collect();
            print_list(&rows, format);
            if format != OutputFormat::Json {
                print_success("Both implementations produced identical output");
            }
        }
        SortCommands::Demo => {
            let employees = sample_employees();
            print_employees("Original data", &employees, format);
            print_employees(
                "Sorted by salary (ascending)",
                &builtin_sort_by_key(&employees, "salary", false),
                format,
            );
            print_employees(
                "Sorted by experience (descending)",
                &builtin_sort_by_key(&employees, "experience", true),
                format,
            );

            let mut with_missing = employees;
            with_missing.push(record([("name", "Eve")]));
            print_employees(
                "Missing salary sorts as 0",
                &builtin_sort_by_key(&with_missing, "salary", false),
                format,
            );
        }
    }
    Ok(())
}

fn print_employees(title: &str, records: &[Record], format: OutputFormat) {
    if format != OutputFormat::Json {
        println!("\n{}:", title);
    }
    let rows: Vec<EmployeeDisplay> = records.iter().map(EmployeeDisplay::from).collect();
    print_list(&rows, format);
}
