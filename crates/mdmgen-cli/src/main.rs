mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mdmgen_generate::{
    EntityCounts, GenerateOptions, GenerationEngine, GenerationError, LinkCounts, OutputFormat,
};
use thiserror::Error;

use logging::{LoggingError, init_logging};

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
}

#[derive(Parser, Debug)]
#[command(
    name = "mdmgen",
    version,
    about = "Generate linked CRM, HR and Salesforce datasets for MDM testing"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate, link and write all six collections.
    Generate(GenerateArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of CRM contacts.
    #[arg(long, env = "NUM_CRM_CONTACTS", default_value_t = 1000)]
    crm_contacts: usize,
    /// Number of CRM organizations.
    #[arg(long, env = "NUM_CRM_ORGANIZATIONS", default_value_t = 100)]
    crm_organizations: usize,
    /// Number of HR employees.
    #[arg(long, env = "NUM_HR_EMPLOYEES", default_value_t = 1000)]
    hr_employees: usize,
    /// Number of Salesforce contacts.
    #[arg(long, env = "NUM_SALESFORCE_CONTACTS", default_value_t = 1000)]
    salesforce_contacts: usize,
    /// Number of Salesforce organizations.
    #[arg(long, env = "NUM_SALESFORCE_ORGANIZATIONS", default_value_t = 100)]
    salesforce_organizations: usize,
    /// CRM contacts sampled for an organization link [default: half of the contacts].
    #[arg(long, env = "NUM_CRM_CONTACTS_TO_ORGANIZATIONS")]
    crm_contacts_to_organizations: Option<usize>,
    /// CRM contacts sampled for an HR employee link [default: half of the contacts].
    #[arg(long, env = "NUM_CRM_CONTACTS_TO_HR_EMPLOYEES")]
    crm_contacts_to_hr_employees: Option<usize>,
    /// CRM contacts sampled for a Salesforce contact link [default: half of the contacts].
    #[arg(long, env = "NUM_CRM_CONTACTS_TO_SALESFORCE_CONTACTS")]
    crm_contacts_to_salesforce_contacts: Option<usize>,
    /// CRM organizations sampled for a Salesforce organization link [default: half of the organizations].
    #[arg(long, env = "NUM_CRM_ORGANIZATIONS_TO_SALESFORCE_ORGANIZATIONS")]
    crm_organizations_to_salesforce_organizations: Option<usize>,
    /// HR employees sampled for a Salesforce contact link [default: half of the employees].
    #[arg(long, env = "NUM_HR_EMPLOYEES_TO_SALESFORCE_CONTACTS")]
    hr_employees_to_salesforce_contacts: Option<usize>,
    /// Output directory. Earlier artifacts of the same format are removed.
    #[arg(long, env = "MDMGEN_OUT_DIR", default_value = "data")]
    out_dir: PathBuf,
    /// Artifact format.
    #[arg(long, env = "MDMGEN_FORMAT", value_enum, default_value_t = FormatArg::Json)]
    format: FormatArg,
    /// Seed for a reproducible run. Drawn from OS entropy when omitted.
    #[arg(long, env = "MDMGEN_SEED")]
    seed: Option<u64>,
    /// Append JSON log lines to this file.
    #[arg(long, env = "MDMGEN_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl GenerateArgs {
    fn into_options(self) -> GenerateOptions {
        let counts = EntityCounts {
            crm_contacts: self.crm_contacts,
            crm_organizations: self.crm_organizations,
            hr_employees: self.hr_employees,
            salesforce_contacts: self.salesforce_contacts,
            salesforce_organizations: self.salesforce_organizations,
        };
        let halved = LinkCounts::halved(&counts);
        let links = LinkCounts {
            crm_contacts_to_organizations: self
                .crm_contacts_to_organizations
                .unwrap_or(halved.crm_contacts_to_organizations),
            crm_contacts_to_hr_employees: self
                .crm_contacts_to_hr_employees
                .unwrap_or(halved.crm_contacts_to_hr_employees),
            crm_contacts_to_salesforce_contacts: self
                .crm_contacts_to_salesforce_contacts
                .unwrap_or(halved.crm_contacts_to_salesforce_contacts),
            crm_organizations_to_salesforce_organizations: self
                .crm_organizations_to_salesforce_organizations
                .unwrap_or(halved.crm_organizations_to_salesforce_organizations),
            hr_employees_to_salesforce_contacts: self
                .hr_employees_to_salesforce_contacts
                .unwrap_or(halved.hr_employees_to_salesforce_contacts),
        };

        GenerateOptions {
            out_dir: self.out_dir,
            format: self.format.into(),
            counts,
            links,
            seed: self.seed,
        }
    }
}

fn main() -> Result<(), CliError> {
    // Variables from `./.env` feed the `env` fallbacks; a missing file is fine.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    init_logging(args.log_file.as_deref())?;

    let options = args.into_options();
    tracing::info!(
        event = "config_loaded",
        crm_contacts = options.counts.crm_contacts,
        crm_organizations = options.counts.crm_organizations,
        hr_employees = options.counts.hr_employees,
        salesforce_contacts = options.counts.salesforce_contacts,
        salesforce_organizations = options.counts.salesforce_organizations
    );

    let result = GenerationEngine::new(options).run()?;

    println!("out_dir={} seed={}", result.out_dir.display(), result.seed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> GenerateArgs {
        let mut argv = vec!["mdmgen", "generate"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).expect("parse cli").command {
            Command::Generate(args) => args,
        }
    }

    #[test]
    fn link_counts_default_to_half_of_sources() {
        let options = parse(&["--crm-contacts", "11", "--crm-organizations", "5"]).into_options();
        assert_eq!(options.links.crm_contacts_to_organizations, 5);
        assert_eq!(options.links.crm_contacts_to_salesforce_contacts, 5);
        assert_eq!(options.links.crm_organizations_to_salesforce_organizations, 2);
    }

    #[test]
    fn explicit_link_count_overrides_default() {
        let options = parse(&["--crm-contacts-to-hr-employees", "3"]).into_options();
        assert_eq!(options.links.crm_contacts_to_hr_employees, 3);
        assert_eq!(options.links.crm_contacts_to_organizations, 500);
    }

    #[test]
    fn rejects_non_numeric_counts() {
        let result = Cli::try_parse_from(["mdmgen", "generate", "--hr-employees", "many"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_format_and_seed() {
        let options = parse(&["--format", "csv", "--seed", "42"]).into_options();
        assert_eq!(options.format, OutputFormat::Csv);
        assert_eq!(options.seed, Some(42));
    }

    #[test]
    fn counts_fall_back_to_env_file_values() {
        let dir = std::env::temp_dir().join(format!("mdmgen-cli-env-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create env dir");
        let env_file = dir.join(".env");
        std::fs::write(&env_file, "NUM_SALESFORCE_ORGANIZATIONS=7\n").expect("write env file");

        dotenvy::from_path(&env_file).expect("load env file");
        let options = parse(&[]).into_options();
        assert_eq!(options.counts.salesforce_organizations, 7);

        let options = parse(&["--salesforce-organizations", "3"]).into_options();
        assert_eq!(options.counts.salesforce_organizations, 3);
    }
}
