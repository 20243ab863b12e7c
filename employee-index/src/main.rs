use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use employee_index::config::settings;
use employee_index::logging::{init_tracing, LogFormat};
use employee_index::output::{print_json, print_line};
use employee_index::workflows::{
    run_collection_tasks, run_full_index, CollectionReport, CollectionTasks, FullIndexOptions,
};
use employee_index::{Dependencies, IndexingError, Settings};
use employee_index_ingest::{EmployeeCsv, ShapeOptions};
use employee_index_repository::{DeleteOutcome, IndexMapping, IndexState};
use employee_index_shared::{fields, EmployeeDocument, SearchHit};

#[derive(Parser)]
#[command(name = "employee-index")]
#[command(about = "Load employee records into OpenSearch and query them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// OpenSearch URL [default: http://localhost:9200]
    #[arg(long, env = "OPENSEARCH_URL", global = true)]
    opensearch_url: Option<String>,

    /// Request timeout in seconds [default: 60]
    #[arg(long, env = "OPENSEARCH_TIMEOUT_SECS", global = true)]
    timeout: Option<String>,

    /// Employee CSV file [default: employee_data.csv]
    #[arg(long, env = "EMPLOYEE_CSV", global = true)]
    csv: Option<String>,

    /// Fully mapped employee index [default: employee_index]
    #[arg(long, env = "EMPLOYEE_INDEX", global = true)]
    employee_index: Option<String>,

    /// Collection loaded without Department [default: jai_hash]
    #[arg(long, env = "NAME_COLLECTION", global = true)]
    name_collection: Option<String>,

    /// Collection loaded without Gender [default: 2706]
    #[arg(long, env = "PHONE_COLLECTION", global = true)]
    phone_collection: Option<String>,

    /// Log output format, pretty or json
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty", global = true)]
    log_format: LogFormat,
}

impl Cli {
    /// Resolved value of a setting, from its flag or environment variable.
    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            settings::OPENSEARCH_URL => self.opensearch_url.clone(),
            settings::OPENSEARCH_TIMEOUT_SECS => self.timeout.clone(),
            settings::EMPLOYEE_CSV => self.csv.clone(),
            settings::EMPLOYEE_INDEX => self.employee_index.clone(),
            settings::NAME_COLLECTION => self.name_collection.clone(),
            settings::PHONE_COLLECTION => self.phone_collection.clone(),
            _ => None,
        }
    }

    fn settings(&self) -> Result<Settings, IndexingError> {
        Settings::from_lookup(|key| self.lookup(key))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the full employee index and run a sample query
    Index {
        /// Field of the sample query
        #[arg(long, default_value = fields::ETHNICITY)]
        field: String,
        /// Value of the sample query
        #[arg(long, default_value = "Asian")]
        value: String,
    },
    /// Load both collections, delete one employee and print searches and facets
    Tasks {
        /// Keep rows with missing values
        #[arg(long)]
        keep_incomplete: bool,
        /// Employee deleted from the name collection
        #[arg(long, default_value = "E02003")]
        delete_id: String,
    },
    /// Create an index unless it exists
    Create {
        index: String,
        #[arg(long, value_enum, default_value_t = MappingKind::Collection)]
        mapping: MappingKind,
        /// Drop the index first if it exists
        #[arg(long)]
        recreate: bool,
    },
    /// Print the number of documents in an index
    Count { index: String },
    /// Match a value against a column
    Search {
        index: String,
        column: String,
        value: String,
    },
    /// Delete an employee by ID
    Delete {
        index: String,
        employee_id: String,
        #[arg(long, default_value = fields::EMPLOYEE_ID)]
        id_field: String,
    },
    /// Print document counts per department
    Facet {
        index: String,
        #[arg(long, value_enum, default_value_t = MappingKind::Collection)]
        mapping: MappingKind,
    },
    /// Check that the cluster is reachable and healthy
    Health,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MappingKind {
    /// All fourteen employee columns with explicit types
    Full,
    /// ID, name, department and gender only
    Collection,
}

impl MappingKind {
    fn mapping(self) -> IndexMapping {
        match self {
            MappingKind::Full => IndexMapping::full_employee(),
            MappingKind::Collection => IndexMapping::collection(),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if let Err(e) = run(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        for cause in e.chain().skip(1) {
            eprintln!("  Caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

async fn read_csv(settings: &Settings) -> Result<EmployeeCsv> {
    let csv = EmployeeCsv::load(&settings.csv_path)
        .await
        .with_context(|| format!("Failed to load {}", settings.csv_path.display()))?;
    info!(
        path = %settings.csv_path.display(),
        rows = csv.len(),
        encoding = ?csv.encoding(),
        "Loaded CSV"
    );
    Ok(csv)
}

fn sources(hits: &[SearchHit]) -> Vec<&EmployeeDocument> {
    hits.iter().map(|hit| &hit.source).collect()
}

async fn run(cli: Cli) -> Result<()> {
    let settings = cli.settings().context("Failed to read settings")?;

    let deps = Dependencies::connect(&settings)?;
    if !matches!(cli.command, Commands::Health) {
        deps.verify_health().await?;
    }

    match cli.command {
        Commands::Health => {
            let healthy = deps.client.health_check().await?;
            print_line("Healthy", healthy)?;
            if !healthy {
                anyhow::bail!("OpenSearch cluster at {} is unhealthy", settings.opensearch_url);
            }
        }
        Commands::Index { field, value } => {
            let csv = read_csv(&settings).await?;
            let mut options = FullIndexOptions::new(&settings.employee_index);
            options.query_field = field;
            options.query_value = value;

            let report = run_full_index(&deps, &csv, &options).await?;
            print_line("Indexed", report.summary.succeeded)?;
            print_line("Failed", report.summary.failed)?;
            print_json(
                &format!("{} = {}", options.query_field, options.query_value),
                &sources(&report.hits),
            )?;
        }
        Commands::Tasks {
            keep_incomplete,
            delete_id,
        } => {
            let csv = read_csv(&settings).await?;
            let shape_options = if keep_incomplete {
                ShapeOptions::default().keep_incomplete()
            } else {
                ShapeOptions::default()
            };
            let mut tasks =
                CollectionTasks::new(&settings.name_collection, &settings.phone_collection)
                    .with_shape_options(shape_options);
            tasks.delete_employee_id = delete_id;

            let report = run_collection_tasks(&deps, &csv, &tasks).await?;
            print_collection_report(&tasks, &report)?;
        }
        Commands::Create {
            index,
            mapping,
            recreate,
        } => {
            if recreate {
                deps.client.recreate_index(&index, &mapping.mapping()).await?;
                print_line("Recreated", &index)?;
            } else {
                match deps.client.ensure_index(&index, &mapping.mapping()).await? {
                    IndexState::Created => print_line("Created", &index)?,
                    IndexState::AlreadyExists => print_line("Already exists", &index)?,
                }
            }
        }
        Commands::Count { index } => {
            let count = deps.client.employee_count(&index).await?;
            print_line(&format!("Employee count in {}", index), count)?;
        }
        Commands::Search {
            index,
            column,
            value,
        } => {
            let hits = deps.client.search_by_column(&index, &column, &value).await?;
            print_json(&format!("{} = {} in {}", column, value, index), &sources(&hits))?;
        }
        Commands::Delete {
            index,
            employee_id,
            id_field,
        } => {
            let outcome = deps
                .client
                .delete_employee_by_id(&index, &id_field, &employee_id)
                .await?;
            print_deletion(&index, &employee_id, outcome)?;
        }
        Commands::Facet { index, mapping } => {
            let buckets = deps
                .client
                .department_facet(&index, &mapping.mapping())
                .await?;
            print_json(&format!("Department facet in {}", index), &buckets)?;
        }
    }

    Ok(())
}

fn print_deletion(index: &str, employee_id: &str, outcome: DeleteOutcome) -> Result<()> {
    match outcome {
        DeleteOutcome::Deleted(n) => print_line(
            &format!("Deleted employee {} from {}", employee_id, index),
            n,
        )?,
        DeleteOutcome::NotFound => print_line(
            &format!("Employee {} not found in", employee_id),
            index,
        )?,
    }
    Ok(())
}

fn print_collection_report(tasks: &CollectionTasks, report: &CollectionReport) -> Result<()> {
    print_line("Employee ID column", &report.id_column)?;
    print_line("Rows dropped with missing values", report.dropped_rows)?;
    print_line(
        &format!("Employee count in {}", tasks.name_collection),
        report.initial_count,
    )?;
    print_line(
        &format!("Indexed into {}", tasks.name_collection),
        report.name_indexed.succeeded,
    )?;
    print_line(
        &format!("Indexed into {}", tasks.phone_collection),
        report.phone_indexed.succeeded,
    )?;
    print_deletion(&tasks.name_collection, &tasks.delete_employee_id, report.deletion)?;
    print_line(
        &format!("Updated employee count in {}", tasks.name_collection),
        report.updated_count,
    )?;

    for search in &report.searches {
        print_json(
            &format!("{} = {} in {}", search.column, search.value, search.index),
            &sources(&search.hits),
        )?;
    }
    for facet in &report.facets {
        print_json(&format!("Department facet in {}", facet.index), &facet.buckets)?;
    }
    Ok(())
}
