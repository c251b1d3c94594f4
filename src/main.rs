use anyhow::Context;
use clap::Parser;
use edulist::config::cli::{Command, CoursesCommand, ExamsCommand, StudentsCommand};
use edulist::core::report::write_completion_report;
use edulist::domain::model::{CourseDraft, Student, StudentDraft};
use edulist::domain::ports::Storage;
use edulist::utils::logger;
use edulist::{CliConfig, EdulistError, Repository, Roster};

type App = Roster<Box<dyn Storage>>;

fn main() {
    let config = CliConfig::parse();

    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(
        settings.verbose,
        settings.json_logs,
        settings.log_level.as_deref(),
    );
    tracing::debug!("Settings: {:?}", settings);

    let repository = Repository::load(settings.open_storage(), settings.seed);
    let mut roster = Roster::new(repository);

    if let Err(e) = run(&mut roster, config.command) {
        match e.downcast_ref::<EdulistError>() {
            Some(EdulistError::Validation(errors)) => {
                for (field, kind) in errors {
                    eprintln!("❌ {}: {}", field, kind);
                }
                std::process::exit(2);
            }
            _ => {
                tracing::error!("Command failed: {:#}", e);
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run(roster: &mut App, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Students(cmd) => students(roster, cmd),
        Command::Courses(cmd) => courses(roster, cmd),
        Command::Exams(cmd) => exams(roster, cmd),
        Command::Report { output } => {
            let rows = match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("cannot create {}", path.display()))?;
                    let rows = write_completion_report(roster.repository(), file)?;
                    println!("✅ {} rows written to {}", rows, path.display());
                    rows
                }
                None => write_completion_report(roster.repository(), std::io::stdout())?,
            };
            tracing::debug!("Report finished with {} rows", rows);
            Ok(())
        }
    }
}

fn print_student_row(roster: &App, student: &Student) {
    println!(
        "{:>4}  {:<24} {:<10} {:<28} {:<13} {:>3}",
        student.id,
        student.full_name,
        student.number,
        student.email,
        student.gsm_number,
        roster.repository().exam_count_for_student(student.id)
    );
}

fn students(roster: &mut App, command: StudentsCommand) -> anyhow::Result<()> {
    match command {
        StudentsCommand::List { search } => {
            let repository = roster.repository();
            let matches: Vec<&Student> = match &search {
                Some(term) => repository.search_students(term),
                None => repository.students().iter().collect(),
            };
            if matches.is_empty() {
                println!("No students found.");
                return Ok(());
            }
            println!(
                "{:>4}  {:<24} {:<10} {:<28} {:<13} {:>3}",
                "ID", "Full name", "Number", "Email", "GSM", "Exams"
            );
            for student in matches {
                print_student_row(roster, student);
            }
        }
        StudentsCommand::Show { id } => {
            let student = roster
                .repository()
                .student(id)
                .ok_or(EdulistError::MissingReference {
                    entity: "Student",
                    id,
                })?;
            println!(
                "{} ({}) <{}> {}",
                student.full_name, student.number, student.email, student.gsm_number
            );

            let completed = roster.completed_courses(id);
            if !completed.is_empty() {
                println!("\nCompleted courses:");
                for item in &completed {
                    let scores: Vec<String> = item.scores.iter().map(|s| s.to_string()).collect();
                    println!(
                        "  {:<20} average {}  scores: {}",
                        item.course.name,
                        item.average_display(),
                        scores.join(", ")
                    );
                }
            }

            let progress = roster.course_progress(id);
            if progress.is_empty() {
                println!("\nNo exam results yet.");
            } else {
                println!("\nExam results:");
            }
            for course in progress {
                let name = course.course_name.as_deref().unwrap_or("Unknown course");
                let status = if course.completed {
                    "completed".to_string()
                } else {
                    format!("{} more needed", course.remaining)
                };
                println!("  {} [{}]", name, status);
                for result in &course.results {
                    println!("    #{:<4} {}", result.id, result.score);
                }
            }
        }
        StudentsCommand::Add(args) => {
            let student = roster.register_student(StudentDraft::from(args))?;
            println!("✅ Student added with id {}", student.id);
        }
        StudentsCommand::Update { id, student } => {
            roster.edit_student(id, StudentDraft::from(student))?;
            println!("✅ Student {} updated", id);
        }
        StudentsCommand::Delete { id } => {
            let exams = roster.repository().exam_count_for_student(id);
            roster.remove_student(id)?;
            println!("✅ Student {} deleted along with {} exam results", id, exams);
        }
    }
    Ok(())
}

fn courses(roster: &mut App, command: CoursesCommand) -> anyhow::Result<()> {
    match command {
        CoursesCommand::List => {
            let repository = roster.repository();
            if repository.courses().is_empty() {
                println!("No courses yet.");
                return Ok(());
            }
            println!("{:>4}  {:<24} {:>5}", "ID", "Course", "Exams");
            for course in repository.courses() {
                println!(
                    "{:>4}  {:<24} {:>5}",
                    course.id,
                    course.name,
                    repository.exam_count_for_course(course.id)
                );
            }
        }
        CoursesCommand::Add { name } => {
            let course = roster.register_course(CourseDraft { name })?;
            println!("✅ Course added with id {}", course.id);
        }
        CoursesCommand::Update { id, name } => {
            roster.edit_course(id, CourseDraft { name })?;
            println!("✅ Course {} updated", id);
        }
        CoursesCommand::Delete { id } => {
            let exams = roster.repository().exam_count_for_course(id);
            roster.remove_course(id)?;
            println!("✅ Course {} deleted along with {} exam results", id, exams);
        }
    }
    Ok(())
}

fn exams(roster: &mut App, command: ExamsCommand) -> anyhow::Result<()> {
    match command {
        ExamsCommand::Add {
            student,
            course,
            score,
        } => {
            let result = roster.record_exam_result(Some(student), Some(course), &score)?;
            println!("✅ Exam result {} recorded", result.id);
        }
        ExamsCommand::Delete { id } => {
            roster.remove_exam_result(id)?;
            println!("✅ Exam result {} deleted", id);
        }
    }
    Ok(())
}
