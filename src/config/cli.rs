use crate::config::{AppSettings, StorageBackend};
use crate::core::validators::{sanitize_gsm, GSM_MAX_LENGTH};
use crate::domain::model::StudentDraft;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "edulist")]
#[command(about = "Manage students, courses and exam scores")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Directory the collections are stored in")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, help = "Keep data in memory only for this run")]
    pub memory: bool,

    #[arg(long, help = "Start empty instead of with sample data")]
    pub no_seed: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Config file values with command-line flags applied on top.
    pub fn settings(&self) -> Result<AppSettings> {
        let mut settings = AppSettings::load(self.config.as_deref())?;

        if let Some(dir) = &self.data_dir {
            settings.backend = StorageBackend::File(dir.clone());
        }
        if self.memory {
            settings.backend = StorageBackend::Memory;
        }
        if self.no_seed {
            settings.seed = false;
        }
        settings.verbose = self.verbose;
        settings.json_logs |= self.json_logs;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Student records
    #[command(subcommand)]
    Students(StudentsCommand),

    /// Course catalogue
    #[command(subcommand)]
    Courses(CoursesCommand),

    /// Exam scores
    #[command(subcommand)]
    Exams(ExamsCommand),

    /// Export completed courses as CSV
    Report {
        #[arg(long, help = "Output file, stdout when omitted")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum StudentsCommand {
    List {
        #[arg(long, help = "Filter by name, number, email or GSM")]
        search: Option<String>,
    },
    Show {
        id: u64,
    },
    Add(StudentArgs),
    Update {
        id: u64,
        #[command(flatten)]
        student: StudentArgs,
    },
    Delete {
        id: u64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct StudentArgs {
    #[arg(long)]
    pub full_name: String,

    #[arg(long)]
    pub number: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub gsm: String,
}

impl From<StudentArgs> for StudentDraft {
    fn from(args: StudentArgs) -> Self {
        Self {
            full_name: args.full_name,
            number: args.number,
            email: args.email,
            gsm_number: sanitize_gsm(&args.gsm, GSM_MAX_LENGTH),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum CoursesCommand {
    List,
    Add {
        name: String,
    },
    Update {
        id: u64,
        name: String,
    },
    Delete {
        id: u64,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ExamsCommand {
    Add {
        #[arg(long)]
        student: u64,

        #[arg(long)]
        course: u64,

        #[arg(long, allow_hyphen_values = true)]
        score: String,
    },
    Delete {
        id: u64,
    },
}
