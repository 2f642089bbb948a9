//! Department CLI - command-line front end over `department_core`.
//!
//! Usage:
//!   department_cli --db <PATH> init              - Create the departments table
//!   department_cli --db <PATH> add <NAME> <LOC>  - Create a department
//!   department_cli --db <PATH> list              - List all departments
//!   department_cli --db <PATH> show <ID>         - Show one department
//!   department_cli --db <PATH> update <ID> --location <LOC>
//!   department_cli --db <PATH> delete <ID>

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use department_core::{
    core_version, default_log_level, init_logging, open_db, open_db_in_memory, DepartmentHandle,
    DepartmentId, DepartmentRepository, IdentityMap, SqliteDepartmentRepository,
};
use log::info;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "department_cli")]
#[command(about = "Manage departments stored in a SQLite table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file (in-memory when omitted)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error; only valid together with --log-dir
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Print departments as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the departments table
    Init,
    /// Drop the departments table
    Drop,
    /// Create a department
    Add { name: String, location: String },
    /// List all departments
    List,
    /// Show a department by id
    Show { id: DepartmentId },
    /// Show the first department with this name
    Find { name: String },
    /// Change a department's name and/or location
    Update {
        id: DepartmentId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete a department by id
    Delete { id: DepartmentId },
    /// Print the core library version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let conn = match cli.db.as_ref() {
        Some(path) => open_db(path)
            .with_context(|| format!("failed to open database `{}`", path.display()))?,
        None => open_db_in_memory().context("failed to open in-memory database")?,
    };
    let cache = IdentityMap::new();
    let repo = SqliteDepartmentRepository::new(&conn, &cache);

    info!("event=cli_command module=cli status=start");
    match cli.command {
        Commands::Init => repo.create_table()?,
        Commands::Drop => repo.drop_table()?,
        Commands::Add { name, location } => {
            let department = repo.create(name.as_str(), location.as_str())?;
            write_department(out, &department, cli.json)?;
        }
        Commands::List => {
            let departments = repo.get_all()?;
            if cli.json {
                let rows = departments
                    .iter()
                    .map(|department| department.borrow().clone())
                    .collect::<Vec<_>>();
                writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
            } else {
                for department in &departments {
                    writeln!(out, "{}", department.borrow())?;
                }
            }
        }
        Commands::Show { id } => match repo.find_by_id(id)? {
            Some(department) => write_department(out, &department, cli.json)?,
            None => writeln!(out, "not found")?,
        },
        Commands::Find { name } => match repo.find_by_name(&name)? {
            Some(department) => write_department(out, &department, cli.json)?,
            None => writeln!(out, "not found")?,
        },
        Commands::Update { id, name, location } => {
            let Some(department) = repo.find_by_id(id)? else {
                bail!("department {id} not found");
            };
            {
                let mut current = department.borrow_mut();
                if let Some(name) = name {
                    current.name = Some(name);
                }
                if let Some(location) = location {
                    current.location = Some(location);
                }
            }
            repo.update(&department)?;
            write_department(out, &department, cli.json)?;
        }
        Commands::Delete { id } => {
            let Some(department) = repo.find_by_id(id)? else {
                bail!("department {id} not found");
            };
            repo.delete(&department)?;
            writeln!(out, "deleted {id}")?;
        }
        Commands::Version => writeln!(out, "department_core version={}", core_version())?,
    }
    info!("event=cli_command module=cli status=ok");

    Ok(())
}

fn write_department(
    out: &mut impl Write,
    department: &DepartmentHandle,
    json: bool,
) -> anyhow::Result<()> {
    let department = department.borrow();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&*department)?)?;
    } else {
        writeln!(out, "{department}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, Cli};
    use clap::Parser;
    use std::path::Path;

    fn run_args(db: &Path, args: &[&str]) -> anyhow::Result<String> {
        let db = db.to_str().unwrap();
        let argv = ["department_cli", "--db", db]
            .into_iter()
            .chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn add_then_list_and_show() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("departments.db");

        run_args(&db, &["init"]).unwrap();
        let added = run_args(&db, &["add", "Eng", "HQ"]).unwrap();
        assert_eq!(added.trim(), "<Department 1: Eng, HQ>");
        run_args(&db, &["add", "Ops", "Annex"]).unwrap();

        let listed = run_args(&db, &["list"]).unwrap();
        assert_eq!(
            listed.lines().collect::<Vec<_>>(),
            vec!["<Department 1: Eng, HQ>", "<Department 2: Ops, Annex>"]
        );

        let shown = run_args(&db, &["show", "2"]).unwrap();
        assert_eq!(shown.trim(), "<Department 2: Ops, Annex>");
        let found = run_args(&db, &["find", "Eng"]).unwrap();
        assert_eq!(found.trim(), "<Department 1: Eng, HQ>");
    }

    #[test]
    fn list_json_prints_department_array() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("departments.db");

        run_args(&db, &["init"]).unwrap();
        run_args(&db, &["add", "Eng", "HQ"]).unwrap();

        let listed = run_args(&db, &["--json", "list"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&listed).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["name"], "Eng");
        assert_eq!(value[0]["location"], "HQ");
    }

    #[test]
    fn missing_ids_print_not_found_or_fail() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("departments.db");
        run_args(&db, &["init"]).unwrap();

        assert_eq!(run_args(&db, &["show", "42"]).unwrap().trim(), "not found");
        assert_eq!(run_args(&db, &["find", "Nobody"]).unwrap().trim(), "not found");

        let update_err = run_args(&db, &["update", "42", "--location", "X"]).unwrap_err();
        assert!(update_err.to_string().contains("department 42 not found"));
        let delete_err = run_args(&db, &["delete", "42"]).unwrap_err();
        assert!(delete_err.to_string().contains("department 42 not found"));
    }

    #[test]
    fn update_and_delete_persist_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("departments.db");
        run_args(&db, &["init"]).unwrap();
        run_args(&db, &["add", "Eng", "HQ"]).unwrap();

        let updated = run_args(&db, &["update", "1", "--location", "Remote"]).unwrap();
        assert_eq!(updated.trim(), "<Department 1: Eng, Remote>");
        assert_eq!(
            run_args(&db, &["show", "1"]).unwrap().trim(),
            "<Department 1: Eng, Remote>"
        );

        assert_eq!(run_args(&db, &["delete", "1"]).unwrap().trim(), "deleted 1");
        assert_eq!(run_args(&db, &["show", "1"]).unwrap().trim(), "not found");
        assert!(run_args(&db, &["list"]).unwrap().is_empty());
    }

    #[test]
    fn commands_without_table_fail() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("departments.db");

        assert!(run_args(&db, &["list"]).is_err());
    }

    #[test]
    fn log_level_requires_log_dir() {
        let err = Cli::try_parse_from(["department_cli", "--log-level", "info", "version"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from([
            "department_cli",
            "--log-level",
            "info",
            "--log-dir",
            "/tmp/department-logs",
            "version",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("info"));
    }
}
